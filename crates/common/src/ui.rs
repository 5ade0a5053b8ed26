//! User interface implementations

use std::sync::{Arc, Mutex};
use std::time::Duration;

use anyhow::Result;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use stratus_runtime::deps::{MessageStyle, ProgressIndicator, UserInterface};

/// Production UI implementation using indicatif
pub struct RealUserInterface;

impl UserInterface for RealUserInterface {
    fn create_spinner(&self) -> Box<dyn ProgressIndicator> {
        let pb = ProgressBar::new_spinner();
        if let Ok(spinner_style) =
            ProgressStyle::default_spinner().template("{spinner:.cyan} {msg} {elapsed:.dim}")
        {
            pb.set_style(spinner_style);
        }
        Box::new(RealProgressIndicator { pb })
    }

    fn print(&self, message: &str) {
        println!("{message}");
    }

    fn print_styled(&self, message: &str, msg_style: MessageStyle) {
        println!("{}", styled(message, msg_style));
    }

    fn is_interactive(&self) -> bool {
        console::user_attended()
    }

    fn prompt_confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        use dialoguer::{Confirm, theme::ColorfulTheme};

        Confirm::with_theme(&ColorfulTheme::default())
            .with_prompt(prompt)
            .default(default)
            .interact()
            .map_err(|e| anyhow::anyhow!("Failed to get confirmation: {e}"))
    }
}

/// Apply a [`MessageStyle`] to a message
pub fn styled(message: &str, msg_style: MessageStyle) -> String {
    match msg_style {
        MessageStyle::Green => style(message).green().to_string(),
        MessageStyle::Yellow => style(message).yellow().to_string(),
        MessageStyle::Error => style(message).red().bold().to_string(),
        MessageStyle::Success => style(message).green().bold().to_string(),
    }
}

struct RealProgressIndicator {
    pb: ProgressBar,
}

impl ProgressIndicator for RealProgressIndicator {
    fn set_message(&self, message: &str) {
        self.pb.set_message(message.to_string());
    }

    fn finish_and_clear(&self) {
        self.pb.finish_and_clear();
    }

    fn enable_steady_tick(&self, duration: Duration) {
        self.pb.enable_steady_tick(duration);
    }
}

// Test implementations for mocking

/// What happened to the spinners handed out by a [`TestUserInterface`]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SpinnerLog {
    /// Number of spinners created
    pub created: usize,
    /// Number of times a steady tick was enabled
    pub started: usize,
    /// Number of times a spinner was cleared
    pub finished: usize,
    /// Every message set on any spinner, in order
    pub messages: Vec<String>,
}

/// Test UI implementation that captures output
pub struct TestUserInterface {
    /// Plain and styled output, in order
    pub output: Arc<Mutex<Vec<String>>>,
    /// Styled output with its style
    pub styled_output: Arc<Mutex<Vec<(String, MessageStyle)>>>,
    /// Spinner lifecycle
    pub spinners: Arc<Mutex<SpinnerLog>>,
    /// Answers returned by `prompt_confirm`, consumed front to back
    pub confirmations: Arc<Mutex<Vec<bool>>>,
    /// Value reported by `is_interactive`
    pub interactive: bool,
}

impl Default for TestUserInterface {
    fn default() -> Self {
        Self::new()
    }
}

impl TestUserInterface {
    /// Create a non-interactive test UI
    pub fn new() -> Self {
        Self {
            output: Arc::new(Mutex::new(Vec::new())),
            styled_output: Arc::new(Mutex::new(Vec::new())),
            spinners: Arc::new(Mutex::new(SpinnerLog::default())),
            confirmations: Arc::new(Mutex::new(Vec::new())),
            interactive: false,
        }
    }

    /// Make the UI interactive and queue answers for confirmation prompts
    #[must_use]
    pub fn with_confirmations(mut self, answers: &[bool]) -> Self {
        self.interactive = true;
        self.confirmations = Arc::new(Mutex::new(answers.to_vec()));
        self
    }

    /// All printed lines
    pub fn get_output(&self) -> Vec<String> {
        self.output.lock().unwrap().clone()
    }

    /// All styled lines with their style
    pub fn get_styled_output(&self) -> Vec<(String, MessageStyle)> {
        self.styled_output.lock().unwrap().clone()
    }

    /// Snapshot of the spinner lifecycle
    pub fn spinner_log(&self) -> SpinnerLog {
        self.spinners.lock().unwrap().clone()
    }

    /// Whether any printed line contains `needle`
    pub fn output_contains(&self, needle: &str) -> bool {
        self.get_output().iter().any(|line| line.contains(needle))
    }
}

impl UserInterface for TestUserInterface {
    fn create_spinner(&self) -> Box<dyn ProgressIndicator> {
        self.spinners.lock().unwrap().created += 1;
        Box::new(TestProgressIndicator {
            log: Arc::clone(&self.spinners),
        })
    }

    fn print(&self, message: &str) {
        self.output.lock().unwrap().push(message.to_string());
    }

    fn print_styled(&self, message: &str, style: MessageStyle) {
        // Add to both styled output and regular output for easier testing
        self.styled_output
            .lock()
            .unwrap()
            .push((message.to_string(), style));
        self.output.lock().unwrap().push(message.to_string());
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }

    fn prompt_confirm(&self, _prompt: &str, default: bool) -> Result<bool> {
        let mut answers = self.confirmations.lock().unwrap();
        if answers.is_empty() {
            Ok(default)
        } else {
            Ok(answers.remove(0))
        }
    }
}

struct TestProgressIndicator {
    log: Arc<Mutex<SpinnerLog>>,
}

impl ProgressIndicator for TestProgressIndicator {
    fn set_message(&self, message: &str) {
        self.log.lock().unwrap().messages.push(message.to_string());
    }

    fn finish_and_clear(&self) {
        self.log.lock().unwrap().finished += 1;
    }

    fn enable_steady_tick(&self, _duration: Duration) {
        self.log.lock().unwrap().started += 1;
    }
}

#[cfg(test)]
#[path = "ui_tests.rs"]
mod tests;
