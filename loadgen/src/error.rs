use std::{error::Error, fmt, path::PathBuf};

use goose::GooseError;
use payload::PayloadErr;

/// The load generator's result type.
pub type Result<T> = std::result::Result<T, LoadgenErr>;

/// Start-up failures. Any of them stops the run before a request is sent.
#[derive(Debug)]
pub enum LoadgenErr {
    /// The model could not be resolved or its samples could not be loaded.
    Payload(PayloadErr),
    /// A required environment variable is not set.
    MissingVar(&'static str),
    /// An environment variable holds a value that cannot be used.
    InvalidVar {
        var: &'static str,
        value: String,
        reason: String,
    },
    /// The resource configuration file cannot be read or parsed.
    ConfigFile { path: PathBuf, reason: String },
    /// goose rejected its configuration or failed while running.
    Harness(GooseError),
}

impl fmt::Display for LoadgenErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Payload(e) => write!(f, "payload error: {e}"),
            Self::MissingVar(var) => write!(f, "missing environment variable {var}"),
            Self::InvalidVar { var, value, reason } => {
                write!(f, "invalid value '{value}' for {var}: {reason}")
            }
            Self::ConfigFile { path, reason } => {
                write!(f, "bad resource config {}: {reason}", path.display())
            }
            Self::Harness(e) => write!(f, "load test harness error: {e}"),
        }
    }
}

impl Error for LoadgenErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Payload(e) => Some(e),
            Self::Harness(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PayloadErr> for LoadgenErr {
    fn from(value: PayloadErr) -> Self {
        Self::Payload(value)
    }
}

impl From<GooseError> for LoadgenErr {
    fn from(value: GooseError) -> Self {
        Self::Harness(value)
    }
}

/// Failure of a single prediction request. Never fatal to the user issuing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportErr {
    /// The service answered with a non-success status.
    Status(u16),
    /// The request never produced a response (connect error, timeout, ...).
    Request(String),
    /// The harness failed to record or dispatch the request.
    Harness(String),
}

impl fmt::Display for TransportErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(status) => write!(f, "service answered with status {status}"),
            Self::Request(e) => write!(f, "request failed: {e}"),
            Self::Harness(e) => write!(f, "harness failed: {e}"),
        }
    }
}

impl Error for TransportErr {}
