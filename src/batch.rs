//! Chunked batch ingestion.
//!
//! [`BatchProcessor::ingest`] streams a source file through a
//! [`RecordPipeline`] and commits it to the repository in chunks of
//! `chunk_size` records: each full chunk is bulk-upserted and flushed before
//! the next one is read. Peak memory stays bounded by the chunk, and the
//! repository is durable after every chunk.
//!
//! Malformed lines are skipped (and counted) by the pipeline. An I/O or
//! persist failure aborts the ingest; chunks already committed stay
//! committed.
//!
//! ```
//! use fleetstore::{BatchProcessor, CarRepository, MemoryBackend};
//! use std::fs;
//!
//! let dir = tempfile::tempdir()?;
//! let src = dir.path().join("fleet.txt");
//! fs::write(&src, "c1,Atlas,good,100,Available\nc2,Nimbus,fair,90,Available\nc3,Vertex,excellent,150,Available\n")?;
//!
//! let mut repo = CarRepository::open(MemoryBackend::new())?;
//! let metrics = BatchProcessor::new(&mut repo).ingest(&src, 2)?;
//! assert_eq!(metrics.processed_records, 3);
//! assert_eq!(metrics.batches, 2);
//! assert_eq!(repo.total_records(), 3);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use crate::backend::StorageBackend;
use crate::error::{Result, StoreError};
use crate::io::pipeline::RecordPipeline;
use crate::metrics::BatchMetrics;
use crate::record::CarRecord;
use crate::repository::CarRepository;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

pub struct BatchProcessor<'a, B: StorageBackend> {
    repository: &'a mut CarRepository<B>,
}

impl<'a, B: StorageBackend> BatchProcessor<'a, B> {
    pub fn new(repository: &'a mut CarRepository<B>) -> Self {
        Self { repository }
    }

    /// Ingest one source file in chunks of `chunk_size` records.
    ///
    /// The source may be gzip or zstd compressed. A missing source ingests
    /// nothing.
    ///
    /// # Errors
    /// - [`StoreError::InvalidArgument`] if `chunk_size` is zero (before any I/O).
    /// - [`StoreError::Io`] if the source cannot be read.
    /// - Any error from flushing the repository.
    pub fn ingest(&mut self, path: impl AsRef<Path>, chunk_size: usize) -> Result<BatchMetrics> {
        if chunk_size == 0 {
            return Err(StoreError::InvalidArgument(
                "chunk_size must be greater than zero".into(),
            ));
        }

        let path = path.as_ref();
        let start = Instant::now();
        let mut metrics = BatchMetrics::default();
        let mut buffer: Vec<CarRecord> = Vec::with_capacity(chunk_size);

        let summary = RecordPipeline::for_ingest(path).stream(|record| {
            buffer.push(record);
            metrics.processed_records += 1;
            if buffer.len() >= chunk_size {
                self.commit_chunk(&mut buffer)?;
                metrics.batches += 1;
            }
            Ok(())
        })?;

        if !buffer.is_empty() {
            self.commit_chunk(&mut buffer)?;
            metrics.batches += 1;
        }

        metrics.skipped_lines = summary.skipped;
        metrics.duration = start.elapsed();

        info!(
            source = %path.display(),
            backend = %self.repository.backend_name(),
            processed = metrics.processed_records,
            skipped = metrics.skipped_lines,
            batches = metrics.batches,
            duration = ?metrics.duration,
            "ingest finished"
        );
        Ok(metrics)
    }

    /// Ingest every file matching `pattern`, in sorted path order.
    ///
    /// Metrics are summed across files.
    ///
    /// # Errors
    /// Returns an error for an invalid pattern or zero `chunk_size`, or the
    /// first failing file's error (with the file path as context). Files
    /// ingested before the failure stay committed.
    #[cfg(feature = "io-glob")]
    pub fn ingest_glob(&mut self, pattern: &str, chunk_size: usize) -> anyhow::Result<BatchMetrics> {
        use anyhow::Context;

        if chunk_size == 0 {
            return Err(StoreError::InvalidArgument(
                "chunk_size must be greater than zero".into(),
            )
            .into());
        }

        let files = crate::io::glob::expand_glob(pattern)?;
        let mut total = BatchMetrics::default();
        for file in &files {
            let m = self
                .ingest(file, chunk_size)
                .with_context(|| format!("ingest {}", file.display()))?;
            total.merge(&m);
        }
        Ok(total)
    }

    fn commit_chunk(&mut self, buffer: &mut Vec<CarRecord>) -> Result<()> {
        let size = buffer.len();
        self.repository.bulk_upsert(buffer.drain(..));
        self.repository.flush()?;
        debug!(records = size, "chunk committed");
        Ok(())
    }
}
