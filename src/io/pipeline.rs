//! Line-by-line record I/O for a single path.
//!
//! [`RecordPipeline`] is the only component that touches record files:
//! - [`read_all`](RecordPipeline::read_all) loads a whole file,
//! - [`stream`](RecordPipeline::stream) pushes records into a consumer,
//! - [`records`](RecordPipeline::records) pulls them lazily,
//! - [`write_all`](RecordPipeline::write_all) replaces the file through a
//!   [`TransactionalFileWriter`].
//!
//! # Reading rules
//! - A missing file is an empty dataset, not an error.
//! - Empty lines are skipped silently; a trailing `\r` is stripped.
//! - A line that fails to parse (or is not UTF-8) is logged at `warn` and
//!   skipped; reading continues.
//! - An existing file that cannot be opened or read is fatal
//!   ([`StoreError::Io`]).

use crate::codec::{parse_line, serialize_record};
use crate::error::{Result, StoreError};
use crate::io::compression::{READ_BUFFER_BYTES, auto_detect_reader};
use crate::io::writer::TransactionalFileWriter;
use crate::record::CarRecord;
use serde::Serialize;
use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Counts reported by a finished stream.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct StreamSummary {
    /// Records handed to the consumer.
    pub parsed: usize,
    /// Non-empty lines that failed to parse.
    pub skipped: usize,
}

/// Record file I/O bound to one path.
#[derive(Debug, Clone)]
pub struct RecordPipeline {
    path: PathBuf,
    decompress: bool,
}

impl RecordPipeline {
    /// Pipeline over a plain-text record file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            decompress: false,
        }
    }

    /// Pipeline over an ingest source that may be gzip or zstd compressed.
    ///
    /// Writes through this pipeline are still plain text.
    pub fn for_ingest(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            decompress: true,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load every valid record in file order.
    ///
    /// # Errors
    /// [`StoreError::Io`] if the file exists but cannot be read.
    pub fn read_all(&self) -> Result<Vec<CarRecord>> {
        let mut out = Vec::new();
        self.stream(|record| {
            out.push(record);
            Ok(())
        })?;
        Ok(out)
    }

    /// Feed each valid record to `consumer`.
    ///
    /// Bad lines are skipped and counted. An error returned by the consumer
    /// stops the stream and is propagated.
    ///
    /// # Errors
    /// [`StoreError::Io`] on open/read failure of an existing file, or
    /// whatever the consumer returns.
    pub fn stream<F>(&self, mut consumer: F) -> Result<StreamSummary>
    where
        F: FnMut(CarRecord) -> Result<()>,
    {
        let mut records = self.records()?;
        for record in records.by_ref() {
            consumer(record?)?;
        }
        Ok(records.summary())
    }

    /// Lazy iterator over valid records.
    ///
    /// Items are `Err` only for I/O failures; the iterator ends after one.
    ///
    /// # Errors
    /// [`StoreError::Io`] if the file exists but cannot be opened.
    pub fn records(&self) -> Result<Records> {
        let file = match File::open(&self.path) {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Ok(Records::empty(self.path.clone()));
            }
            Err(e) => return Err(StoreError::io(&self.path, e)),
        };

        let reader: Box<dyn BufRead> = if self.decompress {
            auto_detect_reader(file, &self.path).map_err(|e| StoreError::io(&self.path, e))?
        } else {
            Box::new(BufReader::with_capacity(READ_BUFFER_BYTES, file))
        };

        Ok(Records {
            path: self.path.clone(),
            reader: Some(reader),
            buf: Vec::new(),
            line_no: 0,
            summary: StreamSummary::default(),
        })
    }

    /// Serialize every record and atomically replace the file.
    ///
    /// Validation failures are fatal here: nothing is written unless every
    /// record serializes.
    ///
    /// # Errors
    /// [`StoreError::ValidationFailed`] for an invalid record, or
    /// [`StoreError::Io`] from the writer.
    pub fn write_all(&self, records: &[CarRecord]) -> Result<usize> {
        let lines = records
            .iter()
            .map(serialize_record)
            .collect::<Result<Vec<_>>>()?;
        TransactionalFileWriter::new(&self.path).write(lines)
    }
}

/// Pull-style record stream produced by [`RecordPipeline::records`].
pub struct Records {
    path: PathBuf,
    reader: Option<Box<dyn BufRead>>,
    buf: Vec<u8>,
    line_no: usize,
    summary: StreamSummary,
}

impl Records {
    fn empty(path: PathBuf) -> Self {
        Self {
            path,
            reader: None,
            buf: Vec::new(),
            line_no: 0,
            summary: StreamSummary::default(),
        }
    }

    /// Counts so far; final once the iterator is exhausted.
    #[must_use]
    pub fn summary(&self) -> StreamSummary {
        self.summary
    }

    fn skip(&mut self, error: &dyn std::fmt::Display) {
        self.summary.skipped += 1;
        warn!(
            path = %self.path.display(),
            line = self.line_no,
            error = %error,
            "skipping car record line"
        );
    }
}

impl Iterator for Records {
    type Item = Result<CarRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let reader = self.reader.as_mut()?;
            self.buf.clear();
            match reader.read_until(b'\n', &mut self.buf) {
                Ok(0) => {
                    self.reader = None;
                    return None;
                }
                Ok(_) => {}
                Err(e) => {
                    self.reader = None;
                    return Some(Err(StoreError::io(&self.path, e)));
                }
            }
            self.line_no += 1;

            let mut bytes = self.buf.as_slice();
            if let Some(rest) = bytes.strip_suffix(b"\n") {
                bytes = rest;
            }
            if let Some(rest) = bytes.strip_suffix(b"\r") {
                bytes = rest;
            }

            let line = match std::str::from_utf8(bytes) {
                Ok(line) => line,
                Err(e) => {
                    self.skip(&e);
                    continue;
                }
            };

            match parse_line(line) {
                Ok(Some(record)) => {
                    self.summary.parsed += 1;
                    return Some(Ok(record));
                }
                Ok(None) => {}
                Err(e) => self.skip(&e),
            }
        }
    }
}

impl std::iter::FusedIterator for Records {}
