//! Storage doubles for tests.

use crate::backend::{FileBackend, MemoryBackend, StorageBackend};
use crate::error::{Result, StoreError};
use crate::record::CarRecord;
use std::io;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// A [`MemoryBackend`] that counts calls and can be told to fail.
///
/// While failing, `load_cars` and `persist_cars` return
/// [`StoreError::Io`] and leave the stored snapshot untouched. Failed calls
/// are still counted.
#[derive(Debug, Clone, Default)]
pub struct RecordingBackend {
    inner: MemoryBackend,
    loads: usize,
    persists: usize,
    failing: bool,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(seed: Vec<CarRecord>) -> Self {
        Self {
            inner: MemoryBackend::with_records(seed),
            ..Self::default()
        }
    }

    pub fn set_failing(&mut self, failing: bool) {
        self.failing = failing;
    }

    #[must_use]
    pub fn load_calls(&self) -> usize {
        self.loads
    }

    #[must_use]
    pub fn persist_calls(&self) -> usize {
        self.persists
    }

    /// The snapshot as last persisted.
    #[must_use]
    pub fn records(&self) -> &[CarRecord] {
        self.inner.records()
    }

    fn injected_failure(&self) -> StoreError {
        StoreError::Io {
            path: PathBuf::from("recording-backend"),
            source: io::Error::other("injected failure"),
        }
    }
}

impl StorageBackend for RecordingBackend {
    fn load_cars(&mut self) -> Result<Vec<CarRecord>> {
        self.loads += 1;
        if self.failing {
            return Err(self.injected_failure());
        }
        self.inner.load_cars()
    }

    fn persist_cars(&mut self, records: &[CarRecord]) -> Result<()> {
        self.persists += 1;
        if self.failing {
            return Err(self.injected_failure());
        }
        self.inner.persist_cars(records)
    }

    fn name(&self) -> String {
        format!("recording({})", self.inner.name())
    }
}

/// A record file path inside a temporary directory.
///
/// The directory and everything in it (including `.tmp` staging files) is
/// removed when this value is dropped.
pub struct ScratchStore {
    dir: TempDir,
    path: PathBuf,
}

impl ScratchStore {
    /// # Errors
    /// Returns an error if the temporary directory cannot be created.
    pub fn new() -> io::Result<Self> {
        Self::with_file_name("cars.txt")
    }

    /// # Errors
    /// Returns an error if the temporary directory cannot be created.
    pub fn with_file_name(name: &str) -> io::Result<Self> {
        let dir = TempDir::new()?;
        let path = dir.path().join(name);
        Ok(Self { dir, path })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The temporary directory itself.
    #[must_use]
    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    /// A sibling path in the same temporary directory.
    #[must_use]
    pub fn sibling(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    /// A [`FileBackend`] bound to [`path`](Self::path).
    #[must_use]
    pub fn backend(&self) -> FileBackend {
        FileBackend::new(&self.path)
    }
}
