//! Store configuration, resolved once at process start.
//!
//! ```
//! use fleetstore::{BackendKind, StoreConfig};
//!
//! let config = StoreConfig::default()
//!     .with_backend(BackendKind::Memory)
//!     .with_chunk_size(512);
//! config.validate()?;
//! let backend = config.open_backend()?;
//! assert_eq!(backend.name(), "in-memory");
//! # Ok::<(), fleetstore::StoreError>(())
//! ```
//!
//! The JSON form mirrors the struct:
//!
//! ```json
//! { "backend": "file", "path": "data/cars.txt", "chunk_size": 4096 }
//! ```

use crate::backend::{BackendKind, StorageBackend, create_backend};
use crate::error::{Result, StoreError};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default record file.
pub const DEFAULT_CARS_FILE: &str = "cars.txt";

/// Default ingest chunk size.
pub const DEFAULT_CHUNK_SIZE: usize = 4096;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Storage medium.
    pub backend: BackendKind,
    /// Record file for the file backend.
    pub path: PathBuf,
    /// Records per committed chunk during batch ingestion.
    pub chunk_size: usize,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            backend: BackendKind::File,
            path: PathBuf::from(DEFAULT_CARS_FILE),
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}

impl StoreConfig {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_backend(mut self, backend: BackendKind) -> Self {
        self.backend = backend;
        self
    }

    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }

    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Load from a JSON file. Missing keys take their defaults.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// fails [`validate`](Self::validate).
    pub fn from_json_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("read config {}", path.display()))?;
        let config: Self = serde_json::from_str(&text)
            .with_context(|| format!("parse config {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("validate config {}", path.display()))?;
        Ok(config)
    }

    /// # Errors
    /// [`StoreError::InvalidArgument`] for a zero chunk size,
    /// [`StoreError::Config`] for an empty file path with the file backend.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(StoreError::InvalidArgument(
                "chunk_size must be greater than zero".into(),
            ));
        }
        if self.backend == BackendKind::File && self.path.as_os_str().is_empty() {
            return Err(StoreError::Config(
                "file backend requires a non-empty path".into(),
            ));
        }
        Ok(())
    }

    /// Validate and construct the configured backend.
    ///
    /// # Errors
    /// See [`validate`](Self::validate).
    pub fn open_backend(&self) -> Result<Box<dyn StorageBackend>> {
        self.validate()?;
        Ok(create_backend(self.backend, self.path.clone()))
    }
}
