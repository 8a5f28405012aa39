//! Result and error types for Comprar.

use thiserror::Error;

/// Result type for Comprar operations
pub type ComprarResult<T> = Result<T, ComprarError>;

/// Errors that can occur while driving the storefront
#[derive(Debug, Error)]
pub enum ComprarError {
    /// No matching element became visible before the timeout elapsed
    #[error("Element not visible within {timeout_ms}ms: {locator}")]
    ElementNotVisible {
        /// Rendering of the locator that failed to match
        locator: String,
        /// Timeout that elapsed, in milliseconds
        timeout_ms: u64,
    },

    /// No matching element became clickable before the timeout elapsed
    #[error("Element not clickable within {timeout_ms}ms: {locator}")]
    ElementNotClickable {
        /// Rendering of the locator that failed to match
        locator: String,
        /// Timeout that elapsed, in milliseconds
        timeout_ms: u64,
    },

    /// No matching element appeared in the document before the timeout elapsed
    #[error("Element not present within {timeout_ms}ms: {locator}")]
    ElementNotPresent {
        /// Rendering of the locator that failed to match
        locator: String,
        /// Timeout that elapsed, in milliseconds
        timeout_ms: u64,
    },

    /// A custom wait condition did not hold before the timeout elapsed
    #[error("Condition '{condition}' not met within {timeout_ms}ms")]
    ConditionTimeout {
        /// Description of the condition that was waited for
        condition: String,
        /// Timeout that elapsed, in milliseconds
        timeout_ms: u64,
    },

    /// The browser session could not be created
    #[error("Failed to create browser session: {message}")]
    SessionCreation {
        /// Error message
        message: String,
    },

    /// Navigation failed
    #[error("Navigation to {url} failed: {message}")]
    Navigation {
        /// URL that failed to load
        url: String,
        /// Error message
        message: String,
    },

    /// Any other fault surfaced while performing an action on the page
    #[error("Interaction failed: {message}")]
    Interaction {
        /// Error message
        message: String,
    },

    /// Screenshot capture failed
    #[error("Screenshot failed: {message}")]
    Screenshot {
        /// Error message
        message: String,
    },

    /// A step handler whose behavior has not been built yet.
    ///
    /// Distinct from pass and fail: suites report it as pending coverage.
    #[error("Step not yet implemented: {step}")]
    NotYetImplemented {
        /// The step phrase that is pending
        step: String,
    },

    /// Configuration could not be loaded or parsed
    #[error("Configuration error: {message}")]
    Config {
        /// Error message
        message: String,
    },

    /// Report generation failed
    #[error("Report error: {message}")]
    Report {
        /// Error message
        message: String,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl ComprarError {
    /// Whether this error is one of the wait-timeout family.
    ///
    /// Query predicates treat these as "absent", an ordinary outcome.
    #[must_use]
    pub const fn is_wait_timeout(&self) -> bool {
        matches!(
            self,
            Self::ElementNotVisible { .. }
                | Self::ElementNotClickable { .. }
                | Self::ElementNotPresent { .. }
                | Self::ConditionTimeout { .. }
        )
    }

    /// Whether this error marks a pending (unimplemented) step.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        matches!(self, Self::NotYetImplemented { .. })
    }

    /// Short tag used in diagnostic screenshot filenames.
    #[must_use]
    pub const fn reason_tag(&self) -> &'static str {
        match self {
            Self::ElementNotVisible { .. } => "not_visible",
            Self::ElementNotClickable { .. } => "not_clickable",
            Self::ElementNotPresent { .. } => "not_present",
            Self::ConditionTimeout { .. } => "condition_timeout",
            Self::SessionCreation { .. } => "session_creation",
            Self::Navigation { .. } => "navigation",
            Self::Interaction { .. } => "interaction",
            Self::Screenshot { .. } => "screenshot",
            Self::NotYetImplemented { .. } => "pending",
            Self::Config { .. } => "config",
            Self::Report { .. } => "report",
            Self::Io(_) => "io",
            Self::Json(_) => "json",
        }
    }
}
