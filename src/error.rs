use std::path::PathBuf;

/// Result type alias for the library
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the library
#[derive(Debug)]
pub enum Error {
    IoError(std::io::Error),
    OutputDirectory { path: PathBuf, source: std::io::Error },
    WriteError { path: PathBuf, source: std::io::Error },
    SerializationError(String),
    InvalidRules(String),
    InvalidArgument(String),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::IoError(e) => write!(f, "IO error: {}", e),
            Error::OutputDirectory { path, source } => {
                write!(f, "Failed to create output directory {}: {}", path.display(), source)
            }
            Error::WriteError { path, source } => {
                write!(f, "Failed to write {}: {}", path.display(), source)
            }
            Error::SerializationError(msg) => write!(f, "Serialization error: {}", msg),
            Error::InvalidRules(msg) => write!(f, "Invalid DTO rules: {}", msg),
            Error::InvalidArgument(msg) => write!(f, "Invalid argument: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::IoError(e) => Some(e),
            Error::OutputDirectory { source, .. } => Some(source),
            Error::WriteError { source, .. } => Some(source),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::IoError(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::SerializationError(format!("JSON serialization error: {}", err))
    }
}

impl From<serde_yaml::Error> for Error {
    fn from(err: serde_yaml::Error) -> Self {
        Error::InvalidRules(format!("YAML parse error: {}", err))
    }
}
