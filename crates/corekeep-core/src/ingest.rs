//! Dump stream persistence.
//!
//! The kernel hands this process the raw dump on standard input; the writer
//! streams it into the freshly named file and syncs it before the retention
//! pass runs.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

use thiserror::Error;

/// Errors from persisting the dump stream.
#[derive(Error, Debug)]
pub enum IngestError {
    /// The destination file could not be created.
    #[error("cannot open {path}: {source}")]
    Open {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Reading the stream, writing the file, or syncing it failed.
    #[error("cannot write {path}: {source}")]
    Copy {
        path: String,
        #[source]
        source: io::Error,
    },
}

impl IngestError {
    /// The underlying OS error number, for use as the process exit status.
    #[must_use]
    pub fn os_code(&self) -> i32 {
        let source = match self {
            Self::Open { source, .. } | Self::Copy { source, .. } => source,
        };
        source.raw_os_error().unwrap_or(1)
    }
}

/// Stream `input` into `dest` and sync it to stable storage.
///
/// Returns the number of bytes written. On failure a partial file may be
/// left behind; it is never cleaned up.
pub fn write_dump<R: Read>(mut input: R, dest: &Path) -> Result<u64, IngestError> {
    let mut file = File::create(dest).map_err(|source| IngestError::Open {
        path: dest.display().to_string(),
        source,
    })?;

    let written = io::copy(&mut input, &mut file).map_err(|source| IngestError::Copy {
        path: dest.display().to_string(),
        source,
    })?;
    file.sync_all().map_err(|source| IngestError::Copy {
        path: dest.display().to_string(),
        source,
    })?;

    tracing::debug!(path = %dest.display(), bytes = written, "Wrote dump");
    Ok(written)
}
