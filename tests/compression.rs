//! Compressed ingest sources are detected by extension or magic bytes.

#[cfg(any(feature = "compression-gzip", feature = "compression-zstd"))]
mod compression_tests {
    use fleetstore::io::compression::{auto_detect_reader, builtin_codecs};
    use fleetstore::testing::{ScratchStore, sample_fleet};
    use fleetstore::{RecordPipeline, codec::serialize_record};
    use std::fs::{self, File};
    use std::io::{BufRead, Write};

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init();
    }

    fn fleet_text() -> anyhow::Result<String> {
        let mut text = String::new();
        for car in sample_fleet() {
            text.push_str(&serialize_record(&car)?);
            text.push('\n');
        }
        Ok(text)
    }

    #[cfg(feature = "compression-gzip")]
    fn gzip(bytes: &[u8]) -> anyhow::Result<Vec<u8>> {
        use flate2::{Compression, write::GzEncoder};
        let mut enc = GzEncoder::new(Vec::new(), Compression::default());
        enc.write_all(bytes)?;
        Ok(enc.finish()?)
    }

    #[test]
    fn builtin_codecs_follow_features() {
        let names: Vec<String> = builtin_codecs().iter().map(|c| c.name().to_string()).collect();
        #[cfg(feature = "compression-gzip")]
        assert!(names.iter().any(|n| n == "gzip"));
        #[cfg(feature = "compression-zstd")]
        assert!(names.iter().any(|n| n == "zstd"));
    }

    #[test]
    fn plain_text_passes_through() -> anyhow::Result<()> {
        let store = ScratchStore::new()?;
        fs::write(store.path(), "hello\nworld\n")?;

        let reader = auto_detect_reader(File::open(store.path())?, store.path())?;
        let lines = reader.lines().collect::<Result<Vec<_>, _>>()?;
        assert_eq!(lines, ["hello", "world"]);
        Ok(())
    }

    #[cfg(feature = "compression-gzip")]
    #[test]
    fn gzip_source_by_extension() -> anyhow::Result<()> {
        init_tracing();
        let store = ScratchStore::with_file_name("cars.txt.gz")?;
        fs::write(store.path(), gzip(fleet_text()?.as_bytes())?)?;

        let cars = RecordPipeline::for_ingest(store.path()).read_all()?;
        assert_eq!(cars, sample_fleet());
        Ok(())
    }

    #[cfg(feature = "compression-gzip")]
    #[test]
    fn gzip_source_by_magic_bytes() -> anyhow::Result<()> {
        init_tracing();
        let store = ScratchStore::with_file_name("cars.dump")?;
        fs::write(store.path(), gzip(fleet_text()?.as_bytes())?)?;

        let cars = RecordPipeline::for_ingest(store.path()).read_all()?;
        assert_eq!(cars.len(), sample_fleet().len());
        Ok(())
    }

    #[cfg(feature = "compression-zstd")]
    #[test]
    fn zstd_source_by_extension() -> anyhow::Result<()> {
        let store = ScratchStore::with_file_name("cars.txt.zst")?;
        let compressed = zstd::stream::encode_all(fleet_text()?.as_bytes(), 3)?;
        fs::write(store.path(), compressed)?;

        let cars = RecordPipeline::for_ingest(store.path()).read_all()?;
        assert_eq!(cars, sample_fleet());
        Ok(())
    }

    #[cfg(feature = "compression-gzip")]
    #[test]
    fn storage_pipeline_does_not_decompress() -> anyhow::Result<()> {
        let store = ScratchStore::with_file_name("cars.txt.gz")?;
        fs::write(store.path(), gzip(fleet_text()?.as_bytes())?)?;

        // Compressed bytes are just bad lines to a plain pipeline.
        let cars = RecordPipeline::new(store.path()).read_all()?;
        assert!(cars.is_empty());
        Ok(())
    }
}
