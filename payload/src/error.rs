use std::{error::Error, fmt, io, path::PathBuf};

/// The payload module's result type.
pub type Result<T> = std::result::Result<T, PayloadErr>;

/// Which class of start-up failure an error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrKind {
    Configuration,
    Resource,
}

/// Failures while resolving a model or building its request bodies.
#[derive(Debug)]
pub enum PayloadErr {
    EmptyModelIdentifier,
    UnrecognizedModel { identifier: String },
    EmptyBodySet,
    Resource { path: PathBuf, source: io::Error },
}

impl PayloadErr {
    /// Returns whether this is a configuration or a resource failure.
    pub fn kind(&self) -> ErrKind {
        match self {
            Self::Resource { .. } => ErrKind::Resource,
            _ => ErrKind::Configuration,
        }
    }

    pub(crate) fn resource(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Resource {
            path: path.into(),
            source,
        }
    }
}

impl fmt::Display for PayloadErr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyModelIdentifier => write!(f, "model identifier is empty"),
            Self::UnrecognizedModel { identifier } => write!(
                f,
                "unrecognized model name: {identifier}, unable to generate requests"
            ),
            Self::EmptyBodySet => write!(f, "no request bodies to cycle through"),
            Self::Resource { path, source } => {
                write!(f, "cannot read sample asset {}: {source}", path.display())
            }
        }
    }
}

impl Error for PayloadErr {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Resource { source, .. } => Some(source),
            _ => None,
        }
    }
}
