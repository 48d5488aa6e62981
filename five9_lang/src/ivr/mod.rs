//! IVR script definitions.
//!
//! IVR scripts are stored as XML. Script functions keep their JavaScript
//! bodies base64-encoded and compressed; this module recovers them and
//! reports which script variables each IVR touches.

mod functions;
mod variables;

pub use functions::{IvrFunction, decode_function_body, extract_functions};
pub use variables::variable_usage;

/// Error type for IVR script processing
#[derive(Debug, Clone, PartialEq)]
pub enum IvrError {
    Xml(String),
}

impl std::fmt::Display for IvrError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IvrError::Xml(msg) => write!(f, "Malformed IVR script XML: {}", msg),
        }
    }
}

impl std::error::Error for IvrError {}

impl From<roxmltree::Error> for IvrError {
    fn from(error: roxmltree::Error) -> Self {
        IvrError::Xml(error.to_string())
    }
}
