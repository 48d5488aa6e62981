use std::fmt;

/// Failure of a CLI command. Details are reported through `ui` before the
/// error is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliError {
    InputError,
    FileError,
    SessionError,
    RemoteError,
    TransformError,
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::InputError => write!(f, "Invalid input"),
            CliError::FileError => write!(f, "File operation failed"),
            CliError::SessionError => write!(f, "Could not connect to Five9"),
            CliError::RemoteError => write!(f, "Remote operation failed"),
            CliError::TransformError => write!(f, "Could not transform content"),
        }
    }
}

impl std::error::Error for CliError {}
