use thiserror::Error;

/// Main error type for the rewatch supervisor
#[derive(Debug, Error)]
pub enum RewatchError {
    // Configuration errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Invalid configuration file: {0}")]
    InvalidConfig(String),

    #[error("post_change_command not provided in {0}")]
    MissingCommand(String),

    // Process errors
    #[error("Failed to spawn process: {0}")]
    SpawnError(String),

    /// Carries the composed "<exit error>\n<captured stderr>" message
    #[error("{0}")]
    CommandFailed(String),

    // IO errors (automatically converted from std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for rewatch operations
pub type Result<T> = std::result::Result<T, RewatchError>;
