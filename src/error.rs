//! Error taxonomy for record storage and ingestion.
//!
//! | Category | Variants | Handling |
//! |----------|----------|----------|
//! | Record level | `MalformedRecord`, `InvalidNumber`, `ValidationFailed` | skipped (and logged) while streaming, surfaced by explicit parse/serialize |
//! | System | `Io` | fatal to the enclosing operation |
//! | Argument | `InvalidArgument`, `Config` | fatal, checked before any work |
//! | Fleet | `DuplicateId`, `UnknownCar`, `NotAvailable` | returned by [`RentalService`](crate::RentalService) |
//!
//! Nothing in the crate retries; callers decide.

use std::path::PathBuf;

/// Crate-wide result alias.
pub type Result<T, E = StoreError> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Fewer than four delimited fields.
    #[error("malformed car record: {line}")]
    MalformedRecord { line: String },

    /// The price field is not a decimal number.
    #[error("invalid price '{value}' in car record: {line}")]
    InvalidNumber { value: String, line: String },

    /// The record was assembled but breaks a validation rule.
    #[error("validation failed ({reasons}) for: {line}")]
    ValidationFailed { line: String, reasons: String },

    /// A file could not be opened, read, written, or renamed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("car with id {0} already exists")]
    DuplicateId(String),

    #[error("no car with id {0}")]
    UnknownCar(String),

    #[error("car {id} is not available (status: {status})")]
    NotAvailable { id: String, status: String },
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.into(),
            source,
        }
    }

    /// `true` for the line-level errors that streaming contains and skips.
    #[must_use]
    pub fn is_record_level(&self) -> bool {
        matches!(
            self,
            StoreError::MalformedRecord { .. }
                | StoreError::InvalidNumber { .. }
                | StoreError::ValidationFailed { .. }
        )
    }
}
