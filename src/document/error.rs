use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Failure of a document file operation.
///
/// Each variant carries the path involved and the underlying I/O error.
/// Content that is not valid UTF-8 is reported as a [`DocumentError::Read`]
/// with [`io::ErrorKind::InvalidData`].
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl DocumentError {
    pub(super) fn read(path: &Path, source: io::Error) -> Self {
        Self::Read {
            path: path.to_path_buf(),
            source,
        }
    }

    pub(super) fn write(path: &Path, source: io::Error) -> Self {
        Self::Write {
            path: path.to_path_buf(),
            source,
        }
    }

    /// The file the failed operation targeted.
    pub fn path(&self) -> &Path {
        match self {
            Self::Read { path, .. } | Self::Write { path, .. } => path,
        }
    }

    /// Short title for a user-facing notice.
    pub const fn title(&self) -> &'static str {
        match self {
            Self::Read { .. } => "Open failed",
            Self::Write { .. } => "Save failed",
        }
    }
}
