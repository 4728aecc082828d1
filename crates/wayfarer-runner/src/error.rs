//! Error types for the decision runner.
//!
//! Uses `thiserror` for typed errors that surface from the HTTP client and
//! the environment configuration. Decision calls never bubble these up to
//! the turn loop; they are logged and resolved to the fallback decision.

/// Errors that can occur while talking to the decision service.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// The request could not be sent or the connection failed.
    #[error("HTTP error: {0}")]
    Http(String),

    /// The service answered with a non-success status.
    #[error("decision service returned {0}")]
    Status(String),

    /// The call exceeded its deadline.
    #[error("timeout: decision service did not answer within {0} ms")]
    Timeout(u128),

    /// The service reported that it could not decide.
    #[error("decision service error: {0}")]
    Service(String),

    /// Configuration is invalid or missing.
    #[error("config error: {0}")]
    Config(String),

    /// Serialization or deserialization failure.
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
}
