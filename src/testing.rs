//! Test support for code built on fleetstore.
//!
//! - **Fixtures**: a small hand-written fleet and a deterministic synthetic
//!   fleet of any size, plus a helper that writes one to disk.
//! - **Mock storage**: [`RecordingBackend`] counts loads and persists and can
//!   be switched to fail, and [`ScratchStore`] gives a file path inside a
//!   temporary directory that disappears on drop.
//!
//! ```
//! use fleetstore::testing::*;
//! use fleetstore::CarRepository;
//!
//! let backend = RecordingBackend::with_records(sample_fleet());
//! let mut repo = CarRepository::open(backend)?;
//! repo.flush()?;
//! assert_eq!(repo.backend().persist_calls(), 0);
//! # Ok::<(), fleetstore::StoreError>(())
//! ```

pub mod fixtures;
pub mod mock_backend;

pub use fixtures::*;
pub use mock_backend::*;
