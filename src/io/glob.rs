//! Source discovery for multi-file ingestion.
//!
//! Fleet exports often arrive as one file per day or per depot. A pattern
//! such as `exports/cars-*.txt.gz` names the whole set, and
//! [`BatchProcessor::ingest_glob`](crate::BatchProcessor::ingest_glob) feeds
//! the matches through one repository in the order returned here.
//!
//! ```no_run
//! use fleetstore::io::glob::expand_glob;
//!
//! let sources = expand_glob("exports/cars-*.txt")?;
//! # use anyhow::Error; Ok::<(), Error>(())
//! ```

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::debug;

/// Ingest sources matching `pattern`, in ascending path order.
///
/// Only regular files are returned. An empty result is not an error.
///
/// # Errors
///
/// Returns an error if the pattern is invalid or a matched entry cannot be
/// inspected.
pub fn expand_glob(pattern: &str) -> Result<Vec<PathBuf>> {
    let entries =
        glob::glob(pattern).with_context(|| format!("invalid ingest pattern: {pattern}"))?;

    let mut sources = entries
        .map(|entry| entry.with_context(|| format!("unreadable match for {pattern}")))
        .filter(|entry| entry.as_ref().map_or(true, |path| path.is_file()))
        .collect::<Result<Vec<_>>>()?;
    sources.sort();

    debug!(pattern, sources = sources.len(), "ingest sources resolved");
    Ok(sources)
}
