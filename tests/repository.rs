//! Repository semantics: keyed cache, dirty tracking, and idempotent flush.

use fleetstore::testing::{RecordingBackend, ScratchStore, sample_fleet};
use fleetstore::{CarRecord, CarRepository, Condition, MemoryBackend, StoreError};

#[test]
fn open_loads_the_backend_snapshot() -> anyhow::Result<()> {
    let repo = CarRepository::open(RecordingBackend::with_records(sample_fleet()))?;
    assert_eq!(repo.total_records(), 5);
    assert_eq!(repo.backend().load_calls(), 1);
    assert!(!repo.pending_changes());
    Ok(())
}

#[test]
fn all_and_available_are_sorted_by_id() -> anyhow::Result<()> {
    let mut repo = CarRepository::open(MemoryBackend::new())?;
    for id in ["c3", "c1", "c2"] {
        repo.upsert(CarRecord::new(id, "Atlas", Condition::Good, 10.0));
    }
    repo.update("c2", |car| car.mark_rented("5"));

    let all: Vec<_> = repo.all().into_iter().map(|c| c.id).collect();
    let available: Vec<_> = repo.available().into_iter().map(|c| c.id).collect();
    assert_eq!(all, ["c1", "c2", "c3"]);
    assert_eq!(available, ["c1", "c3"]);
    Ok(())
}

#[test]
fn upsert_is_last_write_wins() -> anyhow::Result<()> {
    let mut repo = CarRepository::open(MemoryBackend::new())?;
    repo.upsert(CarRecord::new("c1", "Atlas", Condition::Good, 10.0));
    repo.upsert(CarRecord::new("c1", "Falcon", Condition::Fair, 20.0));

    assert_eq!(repo.total_records(), 1);
    assert_eq!(repo.find("c1").map(|c| c.model.as_str()), Some("Falcon"));
    Ok(())
}

#[test]
fn duplicate_ids_in_snapshot_keep_the_later_record() -> anyhow::Result<()> {
    let seed = vec![
        CarRecord::new("c1", "Atlas", Condition::Good, 10.0),
        CarRecord::new("c1", "Falcon", Condition::Good, 12.0),
    ];
    let repo = CarRepository::open(MemoryBackend::with_records(seed))?;
    assert_eq!(repo.total_records(), 1);
    assert_eq!(repo.find("c1").map(|c| c.model.as_str()), Some("Falcon"));
    Ok(())
}

#[test]
fn flush_only_persists_when_dirty() -> anyhow::Result<()> {
    let mut repo = CarRepository::open(RecordingBackend::new())?;

    repo.flush()?;
    assert_eq!(repo.backend().persist_calls(), 0);

    repo.upsert(CarRecord::new("c1", "Atlas", Condition::Good, 10.0));
    repo.flush()?;
    repo.flush()?;
    assert_eq!(repo.backend().persist_calls(), 1);
    assert_eq!(repo.backend().records().len(), 1);

    repo.bulk_upsert(Vec::new());
    repo.flush()?;
    assert_eq!(repo.backend().persist_calls(), 1);
    Ok(())
}

#[test]
fn update_of_unknown_id_changes_nothing() -> anyhow::Result<()> {
    let mut repo = CarRepository::open(RecordingBackend::new())?;
    assert!(!repo.update("ghost", |car| car.mark_available()));
    assert!(!repo.pending_changes());
    Ok(())
}

#[test]
fn update_that_changes_id_moves_the_entry() -> anyhow::Result<()> {
    let mut repo = CarRepository::open(MemoryBackend::with_records(sample_fleet()))?;
    assert!(repo.update("car-001", |car| car.id = "car-100".into()));

    assert!(!repo.contains("car-001"));
    assert_eq!(repo.find("car-100").map(|c| c.model.as_str()), Some("Horizon"));
    assert_eq!(repo.total_records(), 5);
    Ok(())
}

#[test]
fn failed_flush_stays_dirty_and_retries() -> anyhow::Result<()> {
    let mut repo = CarRepository::open(RecordingBackend::new())?;
    repo.upsert(CarRecord::new("c1", "Atlas", Condition::Good, 10.0));

    repo.backend_mut().set_failing(true);
    assert!(matches!(repo.flush(), Err(StoreError::Io { .. })));
    assert!(repo.pending_changes());
    assert!(repo.backend().records().is_empty());

    repo.backend_mut().set_failing(false);
    repo.flush()?;
    assert!(!repo.pending_changes());
    assert_eq!(repo.backend().persist_calls(), 2);
    assert_eq!(repo.backend().records().len(), 1);
    Ok(())
}

#[test]
fn load_failure_surfaces_from_open() {
    let mut backend = RecordingBackend::new();
    backend.set_failing(true);
    assert!(matches!(
        CarRepository::open(backend),
        Err(StoreError::Io { .. })
    ));
}

#[test]
fn rent_scenario_persists_one_rented_record() -> anyhow::Result<()> {
    let store = ScratchStore::new()?;
    {
        let mut repo = CarRepository::open(store.backend())?;
        repo.upsert(CarRecord::new("c1", "Atlas", Condition::Good, 10.0));
        repo.flush()?;
        repo.update("c1", |car| car.mark_rented("u7"));
        repo.flush()?;
    }

    let reopened = CarRepository::open(store.backend())?;
    let all = reopened.all();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].status, "Rented by user u7");
    assert!(reopened.available().is_empty());
    Ok(())
}

#[test]
fn reload_discards_pending_changes() -> anyhow::Result<()> {
    let mut repo = CarRepository::open(MemoryBackend::with_records(sample_fleet()))?;
    repo.upsert(CarRecord::new("extra", "Atlas", Condition::Good, 10.0));
    repo.reload()?;

    assert!(!repo.contains("extra"));
    assert!(!repo.pending_changes());
    Ok(())
}

#[test]
fn unwritable_record_fails_flush_instead_of_vanishing() -> anyhow::Result<()> {
    let store = ScratchStore::new()?;
    let mut repo = CarRepository::open(store.backend())?;
    repo.upsert(CarRecord::new("c0", "Vertex", Condition::Fair, 12.0));
    repo.flush()?;

    repo.upsert(CarRecord::new("c1", "Atlas,GT", Condition::Good, 10.0));
    assert!(matches!(
        repo.flush(),
        Err(StoreError::ValidationFailed { .. })
    ));
    assert!(repo.pending_changes());

    // The previous snapshot is still intact on disk.
    let reopened = CarRepository::open(store.backend())?;
    assert_eq!(reopened.total_records(), 1);
    assert!(reopened.contains("c0"));
    Ok(())
}
