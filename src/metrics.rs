//! Throughput metrics for batch ingestion.
//!
//! [`BatchMetrics`] is returned by every ingest. It can be merged across
//! files, printed, or exported as JSON:
//!
//! ```
//! use fleetstore::BatchMetrics;
//! use std::time::Duration;
//!
//! let m = BatchMetrics {
//!     processed_records: 1000,
//!     skipped_lines: 2,
//!     batches: 4,
//!     duration: Duration::from_millis(250),
//! };
//! assert_eq!(m.records_per_second(), 4000.0);
//! assert_eq!(m.to_json()["batches"], 4);
//! ```

use anyhow::Result;
use serde_json::{Value, json};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchMetrics {
    /// Records parsed from the source and handed to the repository.
    pub processed_records: usize,
    /// Non-empty source lines skipped as malformed or invalid.
    pub skipped_lines: usize,
    /// Chunks committed (bulk upsert + flush).
    pub batches: usize,
    /// Wall-clock time of the whole ingest.
    pub duration: Duration,
}

impl BatchMetrics {
    /// Processed records per second of wall-clock time; `0.0` for a zero duration.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn records_per_second(&self) -> f64 {
        let secs = self.duration.as_secs_f64();
        if secs > 0.0 {
            self.processed_records as f64 / secs
        } else {
            0.0
        }
    }

    /// Accumulate another run into this one (counts and durations add).
    pub fn merge(&mut self, other: &BatchMetrics) {
        self.processed_records += other.processed_records;
        self.skipped_lines += other.skipped_lines;
        self.batches += other.batches;
        self.duration += other.duration;
    }

    #[must_use]
    pub fn to_json(&self) -> Value {
        json!({
            "processed_records": self.processed_records,
            "skipped_lines": self.skipped_lines,
            "batches": self.batches,
            "duration_ms": self.duration.as_millis(),
            "records_per_second": self.records_per_second(),
        })
    }

    /// Print the metrics to stdout in a human-readable format.
    pub fn print(&self) {
        println!("\n========== Ingest Metrics ==========");
        println!(
            "Execution Time: {:.3}s ({} ms)",
            self.duration.as_secs_f64(),
            self.duration.as_millis()
        );
        println!("------------------------------------");
        println!("processed_records: {}", self.processed_records);
        println!("skipped_lines: {}", self.skipped_lines);
        println!("batches: {}", self.batches);
        println!("records_per_second: {:.1}", self.records_per_second());
        println!("====================================\n");
    }

    /// Save the metrics to a JSON file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be created or written to.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let mut file = File::create(path)?;
        let formatted = serde_json::to_string_pretty(&self.to_json())?;
        file.write_all(formatted.as_bytes())?;
        Ok(())
    }
}
