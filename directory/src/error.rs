//! Error types for the user directory.

/// Error types for directory operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The remote record store failed (transport, timeout, or non-2xx reply).
    #[error("Backend error: {0}")]
    Backend(String),

    /// Stored or returned data could not be parsed into records.
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("User not found: {0}")]
    NotFound(String),

    /// The local storage medium is unavailable.
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid email or password, or inactive user")]
    InvalidCredentials,

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),
}

impl From<rusqlite::Error> for Error {
    fn from(e: rusqlite::Error) -> Self {
        Error::Storage(e.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;
