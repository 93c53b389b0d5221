use std::io;

use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

/// Represents all possible errors in the fsys crate.
#[derive(Error, Debug, Clone, Serialize, Deserialize, PartialEq, Hash, Eq)]
pub enum Error {
    /// Nothing exists at the given path.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The OS refused access to the given path.
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Error indicating that a file already exists at the specified path.
    #[error("File already exists: {0}")]
    FileExists(String),

    /// A directory could not be removed because it still has entries.
    #[error("Directory not empty: {0}")]
    DirectoryNotEmpty(String),

    /// A read ran past the end of the stream.
    #[error("End of stream: {0}")]
    EndOfStream(String),

    /// An operation needing an open handle was called on a closed one.
    #[error("File not open: {0}")]
    NotOpen(String),

    /// Error indicating a failure to read data.
    #[error("Failed to read {what}: {how}")]
    Read {
        /// The item that failed to be read.
        what: String,
        /// The reason for the failure.
        how: String,
    },

    /// Error indicating a failure to write data to a file.
    #[error("Failed to write {what}: {how}")]
    Write {
        /// The item that failed to be written.
        what: String,
        /// The reason for the failure.
        how: String,
    },

    /// Error indicating a failure to create a file or directory.
    #[error("Failed to create {what}: {how}")]
    Create {
        /// The item that failed to be created.
        what: String,
        /// The reason for the failure.
        how: String,
    },

    /// Error indicating a failure to delete a file or directory.
    #[error("Failed to delete {what}: {how}")]
    Delete {
        /// The item that failed to be deleted.
        what: String,
        /// The reason for the failure.
        how: String,
    },

    /// Error indicating a failure to copy a file.
    #[error("Failed to copy {what}: {how}")]
    Copy {
        /// The source and destination of the copy.
        what: String,
        /// The reason for the failure.
        how: String,
    },

    /// Error indicating a failure to parse data.
    #[error("Failed to parse {what}: {how}")]
    Parse {
        /// The item that failed to be parse.
        what: String,
        /// The reason for the failure.
        how: String,
    },

    /// Error indicating an invalid path.
    #[error("Invalid path: {what}")]
    InvalidPath {
        /// The invalid path description.
        what: String,
    },
}

/// The operation that produced an `io::Error`, used to pick the fallback
/// variant when the error kind has no dedicated variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Op {
    Read,
    Write,
    Create,
    Delete,
    Copy,
}

impl Error {
    /// Classifies an `io::Error` raised while performing `op` on `what`.
    pub(crate) fn from_io(what: impl Into<String>, op: Op, err: io::Error) -> Self {
        let what = what.into();
        match err.kind() {
            io::ErrorKind::NotFound => Error::NotFound(what),
            io::ErrorKind::PermissionDenied => Error::PermissionDenied(what),
            io::ErrorKind::AlreadyExists => Error::FileExists(what),
            io::ErrorKind::DirectoryNotEmpty => Error::DirectoryNotEmpty(what),
            io::ErrorKind::UnexpectedEof => Error::EndOfStream(what),
            _ => {
                let how = err.to_string();
                match op {
                    Op::Read => Error::Read { what, how },
                    Op::Write => Error::Write { what, how },
                    Op::Create => Error::Create { what, how },
                    Op::Delete => Error::Delete { what, how },
                    Op::Copy => Error::Copy { what, how },
                }
            }
        }
    }
}
