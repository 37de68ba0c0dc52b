//! Error types

/// Errors raised by the simulation engine
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SimError {
    /// Launch intent outside {-1, 0, 1}
    #[error("invalid launch intent {0}: expected -1 (left), 0 (still) or 1 (right)")]
    InvalidLaunchIntent(i32),
}

/// Settings errors
#[derive(thiserror::Error, Debug)]
pub enum SettingsError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Value out of range
    #[error("Invalid setting: {0}")]
    Invalid(String),
}

impl From<serde_json::Error> for SettingsError {
    fn from(err: serde_json::Error) -> Self {
        SettingsError::Parse(err.to_string())
    }
}
