//! Per-invocation settings shared by every command handler

use stratus_common::{OutputError, Renderer};

use crate::validation::ValidationError;

/// Resolved global flags for one command invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandContext {
    /// Region every request is scoped to
    pub region: Option<String>,
    /// How results are printed
    pub output: Renderer,
    /// Skip confirmation prompts
    pub yes: bool,
}

impl CommandContext {
    /// Build a context from the global flags
    pub fn from_flags(
        region: Option<String>,
        output: &str,
        fields: Option<&str>,
        pretty: bool,
        yes: bool,
    ) -> anyhow::Result<Self> {
        let output = Renderer::parse(output, fields, pretty).map_err(|e| match e {
            OutputError::MissingFields => anyhow::Error::from(ValidationError::MissingFields),
            other => anyhow::Error::from(other),
        })?;
        Ok(Self {
            region: region.filter(|r| !r.trim().is_empty()),
            output,
            yes,
        })
    }

    /// The region, or [`ValidationError::MissingRegion`]
    pub fn region(&self) -> Result<&str, ValidationError> {
        self.region.as_deref().ok_or(ValidationError::MissingRegion)
    }

    /// Whether human readable output was requested
    pub const fn is_human(&self) -> bool {
        self.output.is_human()
    }

    /// Reject `--fields` names the command cannot print
    ///
    /// Handlers call this before their first API request.
    pub fn check_fields(&self, available: &[&str]) -> Result<(), OutputError> {
        self.output.check_fields(available)
    }
}
