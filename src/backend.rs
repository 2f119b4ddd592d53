//! Durable storage behind the repository.
//!
//! A backend owns no cache. It only loads a full snapshot and persists a full
//! snapshot. Two media are provided:
//! - [`FileBackend`] delegates to a [`RecordPipeline`] bound to one path.
//! - [`MemoryBackend`] keeps the last persisted snapshot in process memory,
//!   for tests and ephemeral sessions.
//!
//! [`create_backend`] picks one from a [`BackendKind`], once, at startup.

use crate::error::{Result, StoreError};
use crate::io::pipeline::RecordPipeline;
use crate::record::CarRecord;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

/// Load/persist capability over a record collection.
pub trait StorageBackend {
    /// Read the full snapshot.
    ///
    /// # Errors
    /// Backend-specific; for files, [`StoreError::Io`].
    fn load_cars(&mut self) -> Result<Vec<CarRecord>>;

    /// Overwrite the full snapshot.
    ///
    /// # Errors
    /// Backend-specific; for files, [`StoreError::ValidationFailed`] or
    /// [`StoreError::Io`].
    fn persist_cars(&mut self, records: &[CarRecord]) -> Result<()>;

    /// Human-readable storage descriptor for diagnostics.
    fn name(&self) -> String;
}

impl<B: StorageBackend + ?Sized> StorageBackend for Box<B> {
    fn load_cars(&mut self) -> Result<Vec<CarRecord>> {
        (**self).load_cars()
    }

    fn persist_cars(&mut self, records: &[CarRecord]) -> Result<()> {
        (**self).persist_cars(records)
    }

    fn name(&self) -> String {
        (**self).name()
    }
}

/// File-backed storage: one delimited text file.
#[derive(Debug, Clone)]
pub struct FileBackend {
    pipeline: RecordPipeline,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            pipeline: RecordPipeline::new(path),
        }
    }

    #[must_use]
    pub fn pipeline(&self) -> &RecordPipeline {
        &self.pipeline
    }
}

impl StorageBackend for FileBackend {
    fn load_cars(&mut self) -> Result<Vec<CarRecord>> {
        self.pipeline.read_all()
    }

    fn persist_cars(&mut self, records: &[CarRecord]) -> Result<()> {
        self.pipeline.write_all(records).map(|_| ())
    }

    fn name(&self) -> String {
        format!("file:{}", self.pipeline.path().display())
    }
}

/// In-process storage holding the last persisted snapshot verbatim.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    records: Vec<CarRecord>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing snapshot.
    pub fn with_records(seed: Vec<CarRecord>) -> Self {
        Self { records: seed }
    }

    /// The snapshot as last persisted.
    #[must_use]
    pub fn records(&self) -> &[CarRecord] {
        &self.records
    }
}

impl StorageBackend for MemoryBackend {
    fn load_cars(&mut self) -> Result<Vec<CarRecord>> {
        Ok(self.records.clone())
    }

    fn persist_cars(&mut self, records: &[CarRecord]) -> Result<()> {
        self.records = records.to_vec();
        Ok(())
    }

    fn name(&self) -> String {
        "in-memory".to_string()
    }
}

/// Which storage medium to construct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    File,
    Memory,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::File => f.write_str("file"),
            BackendKind::Memory => f.write_str("memory"),
        }
    }
}

impl FromStr for BackendKind {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "file" => Ok(BackendKind::File),
            "memory" => Ok(BackendKind::Memory),
            other => Err(StoreError::Config(format!(
                "unknown backend '{other}' (expected 'file' or 'memory')"
            ))),
        }
    }
}

/// Construct the backend for `kind`. `path` is ignored for memory storage.
pub fn create_backend(kind: BackendKind, path: impl Into<PathBuf>) -> Box<dyn StorageBackend> {
    match kind {
        BackendKind::File => Box::new(FileBackend::new(path)),
        BackendKind::Memory => Box::new(MemoryBackend::new()),
    }
}
