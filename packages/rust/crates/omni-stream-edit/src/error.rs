//! Error types for edit extraction.
//!
//! Follows ODF-REP: Library crates use `thiserror` for explicit error enums.
//! None of these escape a parse call; the session turns them into diagnostics.

use thiserror::Error;

/// Error types for the extraction pipeline.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// A strategy produced an inconsistent span or capture.
    #[error("Strategy `{strategy}` failed: {message}")]
    Strategy {
        /// Name of the failing strategy.
        strategy: &'static str,
        /// What went wrong.
        message: String,
    },

    /// Settings contain an unusable value.
    #[error("Invalid settings: {0}")]
    Settings(String),

    /// Reading a settings file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Settings file is not valid YAML for [`crate::ExtractorSettings`].
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

impl ExtractError {
    pub(crate) fn strategy(strategy: &'static str, message: impl Into<String>) -> Self {
        Self::Strategy {
            strategy,
            message: message.into(),
        }
    }
}
