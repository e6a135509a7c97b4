use std::path::PathBuf;

use thiserror::Error;

/// Every failure the library can report. All of them are fatal to a run.
#[derive(Error, Debug)]
pub enum HeartError {
    #[error("cannot access '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{}:{line}: {message}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("shape mismatch in {context}: expected {expected}, got {got}")]
    Shape {
        context: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("model JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid model: {0}")]
    InvalidModel(String),

    #[error("minibatch contains no records")]
    EmptyBatch,
}

pub type Result<T> = std::result::Result<T, HeartError>;

impl HeartError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        HeartError::Io { path: path.into(), source }
    }

    pub(crate) fn shape(context: &'static str, expected: usize, got: usize) -> Self {
        HeartError::Shape { context, expected, got }
    }
}
