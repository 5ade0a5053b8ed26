//! Waiting for remote resources to settle
//!
//! Creating or resizing a resource returns before the provider has finished
//! with it. [`wait_for`] polls the resource on a fixed interval until its
//! status is terminal, showing a spinner with the elapsed time meanwhile.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::debug;

use stratus_common::format_elapsed;
use stratus_runtime::DEFAULT_POLL_INTERVAL_SECS;
use stratus_runtime::api_client::types;
use stratus_runtime::deps::{AsyncRuntime, Clock, ProgressIndicator, UserInterface};

/// A remote resource that carries a lifecycle status
pub trait StatusResource {
    /// Resource ID
    fn id(&self) -> &str;

    /// Current lifecycle status as reported by the provider
    fn status(&self) -> &str;
}

impl StatusResource for types::ObjectStore {
    fn id(&self) -> &str {
        &self.id
    }

    fn status(&self) -> &str {
        &self.status
    }
}

/// Errors that end a wait
#[derive(Debug, Error)]
pub enum WaitError {
    /// Looking the resource up failed; never retried
    #[error("failed to check the status of {id}")]
    Lookup {
        /// Resource being waited on
        id: String,
        /// Underlying lookup error
        #[source]
        source: anyhow::Error,
    },

    /// The resource reached a failure status
    #[error("{id} entered status `{status}`")]
    Failed {
        /// Resource being waited on
        id: String,
        /// Status that matched the failure predicate
        status: String,
    },

    /// The timeout elapsed before a terminal status was seen
    #[error("timed out after {}s waiting for {id}", .elapsed.as_secs())]
    TimedOut {
        /// Resource being waited on
        id: String,
        /// Time spent waiting
        elapsed: Duration,
    },
}

/// Polling cadence and limit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaitOptions {
    /// Delay between lookups
    pub interval: Duration,
    /// Give up once this much time has passed; `None` waits forever
    pub timeout: Option<Duration>,
}

impl Default for WaitOptions {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            timeout: None,
        }
    }
}

impl WaitOptions {
    /// Default interval with an optional timeout in seconds
    pub fn with_timeout_secs(timeout: Option<u64>) -> Self {
        Self {
            timeout: timeout.map(Duration::from_secs),
            ..Self::default()
        }
    }
}

/// Status predicate
pub type StatusPredicate<'a> = &'a (dyn Fn(&str) -> bool + Send + Sync);

/// What to wait for
pub struct WaitRequest<'a> {
    /// Resource ID, used in messages and errors
    pub id: &'a str,
    /// Spinner message
    pub message: &'a str,
    /// Status that ends the wait successfully
    pub is_terminal: StatusPredicate<'a>,
    /// Status that ends the wait with [`WaitError::Failed`]
    pub is_failed: Option<StatusPredicate<'a>>,
    /// Interval and timeout
    pub options: WaitOptions,
}

/// A resource that reached its terminal status
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Waited<T> {
    /// Last observed resource
    pub resource: T,
    /// Time from the first lookup to the terminal observation
    pub elapsed: Duration,
}

/// Dependencies for waiting
pub struct WaitDependencies {
    /// Spinner output
    pub ui: Arc<dyn UserInterface>,
    /// Elapsed time measurement
    pub clock: Arc<dyn Clock>,
    /// Sleeping between lookups
    pub async_runtime: Arc<dyn AsyncRuntime>,
}

/// Poll `lookup` until the resource reaches a terminal status
///
/// The first lookup happens immediately. A lookup error aborts the wait at
/// once. The spinner is started once and cleared once, whichever way the wait
/// ends, including when the returned future is dropped mid-wait.
pub async fn wait_for<T, F, Fut>(
    request: &WaitRequest<'_>,
    deps: &WaitDependencies,
    lookup: F,
) -> Result<Waited<T>, WaitError>
where
    T: StatusResource,
    F: FnMut() -> Fut,
    Fut: Future<Output = anyhow::Result<T>>,
{
    let spinner = SpinnerGuard(deps.ui.create_spinner());
    spinner.0.enable_steady_tick(deps.clock.duration_from_millis(100));
    spinner.0.set_message(request.message);

    poll(request, deps, spinner.0.as_ref(), lookup).await
}

/// Clears the spinner when dropped, so an interrupted wait leaves no spinner line
struct SpinnerGuard(Box<dyn ProgressIndicator>);

impl Drop for SpinnerGuard {
    fn drop(&mut self) {
        self.0.finish_and_clear();
    }
}

async fn poll<T, F, Fut>(
    request: &WaitRequest<'_>,
    deps: &WaitDependencies,
    spinner: &dyn ProgressIndicator,
    mut lookup: F,
) -> Result<Waited<T>, WaitError>
where
    T: StatusResource,
    F: FnMut() -> Fut,
    Fut: Future<Output = anyhow::Result<T>>,
{
    let started = deps.clock.now();
    let mut attempts: u32 = 0;

    loop {
        attempts += 1;
        let resource = lookup().await.map_err(|source| WaitError::Lookup {
            id: request.id.to_string(),
            source,
        })?;
        let elapsed = deps.clock.now().saturating_duration_since(started);
        let status = resource.status();
        debug!(id = request.id, status, attempts, "Polled resource status");

        if (request.is_terminal)(status) {
            return Ok(Waited { resource, elapsed });
        }

        if let Some(is_failed) = request.is_failed
            && is_failed(status)
        {
            return Err(WaitError::Failed {
                id: request.id.to_string(),
                status: status.to_string(),
            });
        }

        if let Some(timeout) = request.options.timeout
            && elapsed >= timeout
        {
            return Err(WaitError::TimedOut {
                id: request.id.to_string(),
                elapsed,
            });
        }

        spinner.set_message(&format!(
            "{} ({status}, {})",
            request.message,
            format_elapsed(elapsed)
        ));
        deps.async_runtime.sleep(request.options.interval).await;
    }
}

#[cfg(test)]
#[path = "wait_tests.rs"]
mod tests;
