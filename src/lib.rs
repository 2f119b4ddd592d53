//! # Fleetstore
//!
//! A **record storage layer** for a car-rental fleet. Fleetstore keeps every
//! vehicle in an in-memory repository, persists it as a plain delimited text
//! file, and ingests large record files in bounded-memory chunks.
//!
//! ## Key Features
//!
//! - **Line codec** - one comma-separated record per line, with a legacy
//!   four-field layout still accepted on input
//! - **Skip-bad-lines streaming** - malformed lines are logged and counted,
//!   never fatal
//! - **Transactional writes** - stage to `<file>.tmp`, sync, then rename over
//!   the target; readers see the old file or the new one, never a mix
//! - **Pluggable storage** - file or in-memory backends behind one trait
//! - **Dirty-tracked repository** - flush only writes when something changed
//! - **Chunked ingestion** - commit every `chunk_size` records, with metrics
//! - **Compressed sources** - gzip and zstd ingest files are detected
//!   automatically (optional via feature flags)
//!
//! ## Quick Start
//!
//! ```
//! use fleetstore::*;
//!
//! # fn main() -> anyhow::Result<()> {
//! let dir = tempfile::tempdir()?;
//! let config = StoreConfig::default().with_path(dir.path().join("cars.txt"));
//!
//! let repo = CarRepository::open(config.open_backend()?)?;
//! let mut service = RentalService::new(repo);
//! service.add_car(CarRecord::new("car-001", "Horizon", Condition::Excellent, 2500.0))?;
//! service.rent_car("car-001", "42")?;
//!
//! // The file now holds the rented car.
//! let on_disk = RecordPipeline::new(config.path.clone()).read_all()?;
//! assert_eq!(on_disk[0].status, "Rented by user 42");
//! # Ok(())
//! # }
//! ```
//!
//! ## Core Concepts
//!
//! ### Records
//!
//! A [`CarRecord`] has an id, a model, a [`Condition`], a daily price and a
//! free-text status. [`CarRecord::AVAILABLE`] marks a rentable car. The
//! [`validation`] module defines what a well-formed record is, and the
//! [`codec`] module converts between records and lines:
//!
//! ```text
//! car-001,Horizon,excellent,2500,Available
//! ```
//!
//! ### Pipeline
//!
//! A [`RecordPipeline`] is bound to one file. It reads it fully
//! ([`read_all`](RecordPipeline::read_all)), pushes it through a callback
//! ([`stream`](RecordPipeline::stream)), or yields it lazily
//! ([`records`](RecordPipeline::records)). A missing file reads as empty.
//! Writes go through the [`TransactionalFileWriter`].
//!
//! ### Backends and the repository
//!
//! A [`StorageBackend`] loads and persists full snapshots. The
//! [`CarRepository`] owns one, caches every record keyed by id, and persists
//! on [`flush`](CarRepository::flush) only when dirty.
//!
//! ### Batch ingestion
//!
//! [`BatchProcessor::ingest`] streams a source file into the repository,
//! flushing every `chunk_size` records, and reports [`BatchMetrics`]:
//!
//! ```
//! use fleetstore::*;
//! use fleetstore::testing::write_fleet_file;
//!
//! # fn main() -> anyhow::Result<()> {
//! let dir = tempfile::tempdir()?;
//! let source = dir.path().join("import.txt");
//! write_fleet_file(&source, 1000)?;
//!
//! let mut repo = CarRepository::open(MemoryBackend::new())?;
//! let metrics = BatchProcessor::new(&mut repo).ingest(&source, 256)?;
//! assert_eq!(metrics.processed_records, 1000);
//! assert_eq!(metrics.batches, 4);
//! # Ok(())
//! # }
//! ```
//!
//! ## Logging
//!
//! Fleetstore emits [`tracing`] events (skipped lines and failed renames at
//! `warn`, ingest summaries at `info`, flushes and chunk commits at `debug`).
//! It never installs a subscriber.
//!
//! ## Feature Flags
//!
//! - `compression-gzip` - Read gzip-compressed ingest sources (default)
//! - `compression-zstd` - Read zstd-compressed ingest sources (default)
//! - `io-glob` - Multi-file ingest via glob patterns (default)
//!
//! ## Module Overview
//!
//! - [`record`] - The record type and condition vocabulary
//! - [`validation`] - Record rules
//! - [`codec`] - Line parsing and serialization
//! - [`io`] - Streaming reader, transactional writer, compression, globbing
//! - [`backend`] - Storage backends and the backend factory
//! - [`repository`] - The in-memory record cache
//! - [`batch`] - Chunked ingestion
//! - [`service`] - Rental operations
//! - [`config`] - Store configuration
//! - [`testing`] - Fixtures and storage doubles

pub mod backend;
pub mod batch;
pub mod codec;
pub mod config;
pub mod error;
pub mod io;
pub mod metrics;
pub mod record;
pub mod repository;
pub mod service;
pub mod testing;
pub mod validation;

pub use backend::{BackendKind, FileBackend, MemoryBackend, StorageBackend, create_backend};
pub use batch::BatchProcessor;
pub use config::StoreConfig;
pub use error::{Result, StoreError};
pub use io::pipeline::{RecordPipeline, Records, StreamSummary};
pub use io::writer::TransactionalFileWriter;
pub use metrics::BatchMetrics;
pub use record::{CarRecord, Condition};
pub use repository::CarRepository;
pub use service::RentalService;
