use std::fmt;

use five9_core::ServiceError;

/// Errors raised while talking to the web service.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionError {
    /// The session could not be established.
    Creation(Box<SessionError>),
    Credentials(String),
    Fault { code: String, message: String },
    /// Non-success HTTP status without a SOAP fault in the body.
    Http { status: u16, body: String },
    Transport(String),
    Decode(String),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Creation(cause) => write!(f, "Could not create session: {}", cause),
            SessionError::Credentials(message) => write!(f, "Credential error: {}", message),
            SessionError::Fault { code, message } => {
                write!(f, "Service fault ({}): {}", code, message)
            }
            SessionError::Http { status, body } => {
                let excerpt: String = body.chars().take(200).collect();
                write!(f, "HTTP {}: {}", status, excerpt)
            }
            SessionError::Transport(message) => write!(f, "Transport error: {}", message),
            SessionError::Decode(message) => write!(f, "Unexpected response: {}", message),
        }
    }
}

impl std::error::Error for SessionError {}

impl From<reqwest::Error> for SessionError {
    fn from(error: reqwest::Error) -> Self {
        SessionError::Transport(error.to_string())
    }
}

impl From<roxmltree::Error> for SessionError {
    fn from(error: roxmltree::Error) -> Self {
        SessionError::Decode(error.to_string())
    }
}

impl From<serde_json::Error> for SessionError {
    fn from(error: serde_json::Error) -> Self {
        SessionError::Decode(error.to_string())
    }
}

impl From<SessionError> for ServiceError {
    fn from(error: SessionError) -> Self {
        match error {
            SessionError::Fault { code, message } => ServiceError::Fault { code, message },
            SessionError::Decode(message) => ServiceError::Decode(message),
            other => ServiceError::Transport(other.to_string()),
        }
    }
}
