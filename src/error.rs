use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, LocatorError>;

/// Failures surfaced by the locator.
///
/// "No face" and "several faces" are not errors; see `locate::Outcome`.
#[derive(Debug, Error)]
pub enum LocatorError {
    #[error("usage: {0}")]
    Usage(String),

    #[error("failed to load detector model {}: {source}", path.display())]
    ModelLoad {
        path: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("failed to decode image {}: {source}", path.display())]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("inference failed: {0}")]
    Inference(String),

    #[error("path not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("i/o error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl LocatorError {
    /// Process exit code for a fatal error of this kind.
    pub fn exit_code(&self) -> i32 {
        match self {
            LocatorError::Usage(_) => 1,
            LocatorError::ModelLoad { .. } => 2,
            LocatorError::ImageDecode { .. } | LocatorError::Inference(_) => 3,
            LocatorError::Io { .. } => 3,
            LocatorError::NotFound(_) => 4,
            LocatorError::Config(_) => 5,
        }
    }

    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            LocatorError::NotFound(path)
        } else {
            LocatorError::Io { path, source }
        }
    }
}
