use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Everything an archive operation driver can fail with.
#[derive(Debug, Error)]
pub enum StarError {
    #[error("io error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    #[error("archive is corrupt: {reason}")]
    CorruptArchive { reason: String },

    #[error("archive cannot hold more than {max} files")]
    CapacityExceeded { max: usize },

    #[error("directory is full, no empty slot available")]
    DirectoryFull,

    #[error("input file is missing: {path}")]
    FileMissing { path: PathBuf },

    #[error("no files given to add")]
    NoFiles,

    #[error("file not found in archive: {name}")]
    FileNotInArchive { name: String },
}
