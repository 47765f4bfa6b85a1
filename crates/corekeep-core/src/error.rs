//! Crate-wide error type.

use thiserror::Error;

use crate::ingest::IngestError;
use crate::notify::NotifyError;
use crate::retention::RetentionError;

/// Umbrella error for operations spanning more than one module.
///
/// The per-module enums stay the precise surface of each module; this type
/// exists so callers of the combined pipeline (and library consumers using
/// `?` across modules) have a single error to hold.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Retention(#[from] RetentionError),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Notify(#[from] NotifyError),

    /// Configuration rejected by validation.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Crate-wide result alias.
pub type Result<T, E = Error> = std::result::Result<T, E>;
