//! Storage backends, the backend factory, and store configuration.

use fleetstore::testing::{ScratchStore, sample_fleet};
use fleetstore::{
    BackendKind, FileBackend, StorageBackend, StoreConfig, StoreError, create_backend,
};
use std::fs;

#[test]
fn file_backend_round_trips_a_snapshot() -> anyhow::Result<()> {
    let store = ScratchStore::new()?;
    let mut backend = FileBackend::new(store.path());

    assert!(backend.load_cars()?.is_empty());
    backend.persist_cars(&sample_fleet())?;
    assert_eq!(backend.load_cars()?, sample_fleet());
    assert_eq!(backend.name(), format!("file:{}", store.path().display()));
    Ok(())
}

#[test]
fn file_backend_persist_overwrites_previous_snapshot() -> anyhow::Result<()> {
    let store = ScratchStore::new()?;
    let mut backend = FileBackend::new(store.path());
    backend.persist_cars(&sample_fleet())?;
    backend.persist_cars(&sample_fleet()[..2])?;

    assert_eq!(backend.load_cars()?.len(), 2);
    assert_eq!(fs::read_to_string(store.path())?.lines().count(), 2);
    Ok(())
}

#[test]
fn factory_builds_working_backends() -> anyhow::Result<()> {
    let store = ScratchStore::new()?;
    for kind in [BackendKind::File, BackendKind::Memory] {
        let mut backend = create_backend(kind, store.path());
        backend.persist_cars(&sample_fleet())?;
        assert_eq!(backend.load_cars()?, sample_fleet(), "backend {kind}");
    }
    Ok(())
}

#[test]
fn config_defaults() {
    let config = StoreConfig::default();
    assert_eq!(config.backend, BackendKind::File);
    assert_eq!(config.path, std::path::PathBuf::from("cars.txt"));
    assert_eq!(config.chunk_size, 4096);
    assert!(config.validate().is_ok());
}

#[test]
fn config_rejects_zero_chunk_and_empty_path() {
    let zero = StoreConfig::new().with_chunk_size(0);
    assert!(matches!(zero.validate(), Err(StoreError::InvalidArgument(_))));

    let no_path = StoreConfig::new().with_path("");
    assert!(matches!(no_path.validate(), Err(StoreError::Config(_))));
    assert!(no_path.open_backend().is_err());

    // Memory storage does not need a path.
    let memory = StoreConfig::new()
        .with_backend(BackendKind::Memory)
        .with_path("");
    assert!(memory.validate().is_ok());
}

#[test]
fn config_from_json_fills_defaults() -> anyhow::Result<()> {
    let store = ScratchStore::with_file_name("store.json")?;
    fs::write(store.path(), r#"{ "backend": "memory" }"#)?;

    let config = StoreConfig::from_json_file(store.path())?;
    assert_eq!(config.backend, BackendKind::Memory);
    assert_eq!(config.chunk_size, 4096);
    assert_eq!(config.open_backend()?.name(), "in-memory");
    Ok(())
}

#[test]
fn config_from_json_rejects_invalid_values() -> anyhow::Result<()> {
    let store = ScratchStore::with_file_name("store.json")?;

    fs::write(store.path(), r#"{ "chunk_size": 0 }"#)?;
    let err = StoreConfig::from_json_file(store.path()).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<StoreError>(),
        Some(StoreError::InvalidArgument(_))
    ));

    fs::write(store.path(), r#"{ "backend": "sqlite" }"#)?;
    assert!(StoreConfig::from_json_file(store.path()).is_err());

    assert!(StoreConfig::from_json_file(store.sibling("absent.json")).is_err());
    Ok(())
}
