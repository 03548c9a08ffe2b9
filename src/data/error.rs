use std::path::PathBuf;

use thiserror::Error;

/// Why a metadata table could not be produced.
#[derive(Error, Debug)]
pub enum DataUnavailable {
    #[error("metadata file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },

    #[error("{} is missing required column '{column}'", path.display())]
    MissingColumn { path: PathBuf, column: &'static str },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),
}

impl DataUnavailable {
    pub(crate) fn parse(path: &std::path::Path, message: impl std::fmt::Display) -> Self {
        DataUnavailable::Parse {
            path: path.to_path_buf(),
            message: message.to_string(),
        }
    }

    /// True for the missing-file case, as opposed to a malformed file.
    pub fn is_not_found(&self) -> bool {
        matches!(self, DataUnavailable::FileNotFound(_))
    }
}
