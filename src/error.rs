use std::path::PathBuf;

use thiserror::Error;

/// Failures reported by a [`crate::system::provider::MetricsProvider`].
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("{0} is not available on this platform")]
    Unsupported(&'static str),

    #[error("{0} could not be read from the host")]
    Unavailable(&'static str),

    #[error("failed to resolve host `{host}`: {source}")]
    Resolve {
        host: String,
        #[source]
        source: std::io::Error,
    },

    #[error("no address found for host `{0}`")]
    NoAddress(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Outcomes of a file census that are not a table of counts.
#[derive(Error, Debug)]
pub enum CensusError {
    #[error("Error: directory '{}' not found", .0.display())]
    NotFound(PathBuf),

    #[error("Error: '{}' is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("Error: permission denied for directory '{}'", .0.display())]
    PermissionDenied(PathBuf),

    #[error("No files found in '{}'", .0.display())]
    NoFiles(PathBuf),

    #[error("Error: failed to read '{}': {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Template rendering failures. No output is written when the template
/// itself cannot be loaded.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("template '{}' not found", .0.display())]
    TemplateNotFound(PathBuf),

    #[error("template '{}' could not be read: {source}", .path.display())]
    TemplateUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write '{}': {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl CensusError {
    pub(crate) fn from_io(path: PathBuf, source: std::io::Error) -> Self {
        match source.kind() {
            std::io::ErrorKind::NotFound => Self::NotFound(path),
            std::io::ErrorKind::PermissionDenied => Self::PermissionDenied(path),
            _ => Self::Io { path, source },
        }
    }
}
