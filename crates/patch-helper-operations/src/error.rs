use std::path::PathBuf;

use thiserror::Error;

/// Failure inside a single check. The runner records it and moves on.
#[derive(Debug, Error)]
pub enum CheckError {
    #[error("failed to probe '{path}'")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot derive a class name from '{path}'")]
    InvalidAppPath { path: String },
}

#[derive(Debug, Error)]
pub enum OperationError {
    #[error(transparent)]
    Parse(#[from] patch_helper_parse::ParseError),

    #[error(transparent)]
    Host(#[from] patch_helper_host::HostError),

    #[error("failed to read patch file '{path}'")]
    PatchRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, OperationError>;
