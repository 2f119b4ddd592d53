//! Pre-built fleets for tests and benchmarks.

use crate::codec::serialize_record;
use crate::error::Result;
use crate::io::writer::TransactionalFileWriter;
use crate::record::{CarRecord, Condition};
use std::path::Path;

const MODELS: [&str; 5] = ["Atlas", "Falcon", "Nimbus", "Aurora", "Vertex"];

/// Five hand-written cars, one per condition, one of them rented.
///
/// # Example
///
/// ```
/// use fleetstore::testing::sample_fleet;
///
/// let fleet = sample_fleet();
/// assert_eq!(fleet.len(), 5);
/// assert_eq!(fleet.iter().filter(|c| c.is_available()).count(), 4);
/// ```
#[must_use]
pub fn sample_fleet() -> Vec<CarRecord> {
    vec![
        CarRecord::new("car-001", "Horizon", Condition::Excellent, 2500.0),
        CarRecord::new("car-002", "Meridian", Condition::Good, 1800.0),
        CarRecord::new("car-003", "Solstice", Condition::Fair, 1200.0),
        CarRecord::new("car-004", "Tempest", Condition::MinorDamages, 950.0)
            .with_status("Rented by user 7"),
        CarRecord::new("car-005", "Drifter", Condition::MajorDamages, 600.0),
    ]
}

/// `n` valid, available cars with ids `car-1` to `car-n`.
///
/// Output depends only on `n`: models and conditions cycle, and prices fall
/// in `1800.0..=7500.0`.
#[must_use]
pub fn synthetic_fleet(n: usize) -> Vec<CarRecord> {
    (1..=n).map(synthetic_car).collect()
}

fn synthetic_car(i: usize) -> CarRecord {
    let model = MODELS[i % MODELS.len()];
    let condition = Condition::ALL[i % Condition::ALL.len()];
    // 58 steps of 100 between 1800 and 7500.
    #[allow(clippy::cast_precision_loss)]
    let price = 1800.0 + ((i * 37) % 58) as f64 * 100.0;
    CarRecord::new(format!("car-{i}"), model, condition, price)
}

/// Write `synthetic_fleet(n)` to `path` in the record line format.
///
/// # Errors
/// [`StoreError::Io`](crate::StoreError::Io) if the file cannot be written.
pub fn write_fleet_file(path: impl AsRef<Path>, n: usize) -> Result<usize> {
    let lines = synthetic_fleet(n)
        .iter()
        .map(serialize_record)
        .collect::<Result<Vec<_>>>()?;
    TransactionalFileWriter::new(path.as_ref()).write(lines)
}
