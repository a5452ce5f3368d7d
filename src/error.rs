//! Error types for Interview Assist.

/// Top-level error type for the crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Source error: {0}")]
    Source(#[from] SourceError),

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Setup error: {0}")]
    Setup(#[from] SetupError),

    #[error("Keystore error: {0}")]
    Keystore(#[from] KeystoreError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Any failure to obtain questions or feedback from a source.
///
/// The session state machine treats every variant uniformly (the source
/// is unavailable, the transition is blocked, the user may retry); the
/// sub-causes exist for logging.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("No API key configured for {provider}")]
    MissingCredential { provider: String },

    #[error("Request to {provider} failed: {reason}")]
    Http { provider: String, reason: String },

    #[error("{provider} returned status {status}")]
    Status { provider: String, status: u16 },

    #[error("Could not parse {provider} response: {reason}")]
    UnparsableResponse { provider: String, reason: String },
}

impl SourceError {
    /// Short sub-cause label for logging.
    pub fn label(&self) -> &'static str {
        match self {
            Self::MissingCredential { .. } => "missing_credential",
            Self::Http { .. } => "http",
            Self::Status { .. } => "status",
            Self::UnparsableResponse { .. } => "unparsable_response",
        }
    }
}

/// Session state machine errors.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("Cannot {action} while in the {stage} stage")]
    InvalidTransition { action: String, stage: String },

    #[error("Cannot {action}: a source call is already in flight")]
    RequestInFlight { action: String },
}

/// Setup validation errors, raised by the presentation layer before
/// `submit_setup`; the machine itself does not re-validate.
#[derive(Debug, thiserror::Error)]
pub enum SetupError {
    #[error("{field} must not be empty")]
    EmptyField { field: &'static str },

    #[error("At least one skill is required")]
    NoSkills,

    #[error("At most {max} skills are allowed (got {count})")]
    TooManySkills { max: usize, count: usize },

    #[error("Skill #{index} is empty")]
    EmptySkill { index: usize },
}

/// Key-file persistence errors.
#[derive(Debug, thiserror::Error)]
pub enum KeystoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for the crate.
pub type Result<T> = std::result::Result<T, Error>;
