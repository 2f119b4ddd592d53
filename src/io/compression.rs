//! Transparent decompression of ingest sources.
//!
//! Large fleet dumps are often shipped compressed. [`auto_detect_reader`]
//! wraps a source reader with the matching decoder so the record pipeline
//! can stream `cars.txt.gz` exactly like `cars.txt`.
//!
//! ## Built-in Codecs
//!
//! When enabled via feature flags:
//! - **Gzip** (`.gz`) - via `flate2` crate (feature: `compression-gzip`)
//! - **Zstd** (`.zst`) - via `zstd` crate (feature: `compression-zstd`)
//!
//! ## Detection
//!
//! File extensions are checked first, falling back to magic bytes only when
//! the extension is not recognised. Plain text passes through buffered.
//!
//! The codec list is built per call from [`builtin_codecs`]; there is no
//! process-wide registry.

use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// Read buffer size for (decompressed) sources.
pub const READ_BUFFER_BYTES: usize = 1 << 16;

/// A decompression codec.
pub trait CompressionCodec: Send + Sync {
    /// Human-readable codec name (e.g., "gzip", "zstd").
    fn name(&self) -> &str;

    /// File extensions associated with this codec (e.g., `&[".gz", ".gzip"]`).
    ///
    /// Extensions include the leading dot and are lowercase.
    fn extensions(&self) -> &[&str];

    /// Optional magic byte signature for content-based detection.
    fn magic_bytes(&self) -> Option<&[u8]>;

    /// Wrap a reader with decompression.
    fn wrap_reader_dyn(&self, reader: Box<dyn Read>) -> std::io::Result<Box<dyn Read>>;
}

/// Codecs compiled into this build.
#[must_use]
pub fn builtin_codecs() -> Vec<Arc<dyn CompressionCodec>> {
    #[allow(unused_mut)]
    let mut codecs: Vec<Arc<dyn CompressionCodec>> = Vec::new();
    #[cfg(feature = "compression-gzip")]
    codecs.push(Arc::new(GzipCodec));
    #[cfg(feature = "compression-zstd")]
    codecs.push(Arc::new(ZstdCodec));
    codecs
}

fn detect_from_extension(
    codecs: &[Arc<dyn CompressionCodec>],
    path: &Path,
) -> Option<Arc<dyn CompressionCodec>> {
    let path_str = path.to_string_lossy().to_lowercase();
    codecs
        .iter()
        .find(|codec| codec.extensions().iter().any(|ext| path_str.ends_with(ext)))
        .cloned()
}

/// Peeks at the buffered head of the stream; the reader is not advanced.
fn detect_from_magic<R: BufRead>(
    codecs: &[Arc<dyn CompressionCodec>],
    reader: &mut R,
) -> std::io::Result<Option<Arc<dyn CompressionCodec>>> {
    let buf = reader.fill_buf()?;
    if buf.is_empty() {
        return Ok(None);
    }
    Ok(codecs
        .iter()
        .find(|codec| codec.magic_bytes().is_some_and(|magic| buf.starts_with(magic)))
        .cloned())
}

/// Wrap `reader` with a decoder if `path_hint` or the content says it is compressed.
///
/// # Errors
/// Returns an error if peeking at the stream fails or the decoder cannot be
/// initialised.
pub fn auto_detect_reader<R: Read + 'static>(
    reader: R,
    path_hint: impl AsRef<Path>,
) -> std::io::Result<Box<dyn BufRead>> {
    let codecs = builtin_codecs();

    let path_hint = path_hint.as_ref();

    if let Some(codec) = detect_from_extension(&codecs, path_hint) {
        debug!(codec = codec.name(), path = %path_hint.display(), "codec chosen by extension");
        let inner = codec.wrap_reader_dyn(Box::new(reader))?;
        return Ok(Box::new(BufReader::with_capacity(READ_BUFFER_BYTES, inner)));
    }

    let mut buffered = BufReader::with_capacity(READ_BUFFER_BYTES, reader);
    if let Some(codec) = detect_from_magic(&codecs, &mut buffered)? {
        debug!(codec = codec.name(), path = %path_hint.display(), "codec chosen by magic bytes");
        let inner = codec.wrap_reader_dyn(Box::new(buffered))?;
        return Ok(Box::new(BufReader::with_capacity(READ_BUFFER_BYTES, inner)));
    }

    Ok(Box::new(buffered))
}

// ============================================================================
// Built-in Codec Implementations
// ============================================================================

#[cfg(feature = "compression-gzip")]
struct GzipCodec;

#[cfg(feature = "compression-gzip")]
impl CompressionCodec for GzipCodec {
    fn name(&self) -> &str {
        "gzip"
    }

    fn extensions(&self) -> &[&str] {
        &[".gz", ".gzip"]
    }

    fn magic_bytes(&self) -> Option<&[u8]> {
        Some(&[0x1f, 0x8b])
    }

    fn wrap_reader_dyn(&self, reader: Box<dyn Read>) -> std::io::Result<Box<dyn Read>> {
        use flate2::read::MultiGzDecoder;
        Ok(Box::new(MultiGzDecoder::new(reader)))
    }
}

#[cfg(feature = "compression-zstd")]
struct ZstdCodec;

#[cfg(feature = "compression-zstd")]
impl CompressionCodec for ZstdCodec {
    fn name(&self) -> &str {
        "zstd"
    }

    fn extensions(&self) -> &[&str] {
        &[".zst", ".zstd"]
    }

    fn magic_bytes(&self) -> Option<&[u8]> {
        Some(&[0x28, 0xb5, 0x2f, 0xfd])
    }

    fn wrap_reader_dyn(&self, reader: Box<dyn Read>) -> std::io::Result<Box<dyn Read>> {
        zstd::stream::read::Decoder::new(reader).map(|d| Box::new(d) as Box<dyn Read>)
    }
}
