//! Write-to-temp then rename.
//!
//! [`TransactionalFileWriter`] never exposes a half-written target: the full
//! dataset goes to `<target>.tmp`, is flushed and synced, and only then is
//! renamed over the target. A reader sees either the previous complete file
//! or the new complete file.
//!
//! The two phases are public ([`stage`](TransactionalFileWriter::stage) and
//! [`commit`](TransactionalFileWriter::commit)) so callers and tests can
//! observe the state between them.

use crate::error::{Result, StoreError};
use std::ffi::OsString;
use std::fs::{File, create_dir_all};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Output buffer size for staged writes.
pub const WRITE_BUFFER_BYTES: usize = 1 << 16;

/// Atomic whole-file writer bound to one target path.
#[derive(Debug, Clone)]
pub struct TransactionalFileWriter {
    target: PathBuf,
}

impl TransactionalFileWriter {
    pub fn new(target: impl Into<PathBuf>) -> Self {
        Self {
            target: target.into(),
        }
    }

    /// The target as given.
    #[must_use]
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Sibling temporary path: the target with `.tmp` appended.
    #[must_use]
    pub fn temp_path(&self) -> PathBuf {
        temp_path_for(&self.target)
    }

    /// Write every line (newline terminated) and atomically replace the target.
    ///
    /// # Errors
    /// [`StoreError::Io`] if the directories or temporary file cannot be
    /// created or written (the target is untouched), or if the final rename
    /// fails (the temporary file is left in place for inspection).
    pub fn write<I, S>(&self, lines: I) -> Result<usize>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let staged = self.stage(lines)?;
        self.commit()?;
        Ok(staged)
    }

    /// Phase one: write all lines to the temporary file and sync it.
    ///
    /// Returns the number of lines written. On failure the partial temporary
    /// file is removed.
    ///
    /// # Errors
    /// [`StoreError::Io`] on any directory, create, write, or sync failure.
    pub fn stage<I, S>(&self, lines: I) -> Result<usize>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let target = self.resolved_target()?;
        if let Some(parent) = target.parent()
            && !parent.as_os_str().is_empty()
        {
            create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
        }

        let temp = temp_path_for(&target);
        let file = File::create(&temp).map_err(|e| StoreError::io(&temp, e))?;

        match write_lines(file, lines) {
            Ok(count) => {
                debug!(
                    target = %target.display(),
                    temp = %temp.display(),
                    lines = count,
                    "staged transactional write"
                );
                Ok(count)
            }
            Err(e) => {
                warn!(temp = %temp.display(), error = %e, "write failed, removing temp file");
                let _ = std::fs::remove_file(&temp);
                Err(StoreError::io(&temp, e))
            }
        }
    }

    /// Phase two: rename the staged temporary file onto the target.
    ///
    /// # Errors
    /// [`StoreError::Io`] if the rename fails. The temporary file is kept.
    pub fn commit(&self) -> Result<()> {
        let target = self.resolved_target()?;
        let temp = temp_path_for(&target);

        // rename(2) replaces an existing target in one step, so the old file
        // is never removed ahead of time.
        std::fs::rename(&temp, &target).map_err(|e| {
            warn!(
                temp = %temp.display(),
                target = %target.display(),
                error = %e,
                "rename failed, temp file left in place"
            );
            StoreError::io(&target, e)
        })?;
        debug!(target = %target.display(), "transactional write committed");
        Ok(())
    }

    fn resolved_target(&self) -> Result<PathBuf> {
        std::path::absolute(&self.target).map_err(|e| StoreError::io(&self.target, e))
    }
}

fn temp_path_for(target: &Path) -> PathBuf {
    let mut name = OsString::from(target.as_os_str());
    name.push(".tmp");
    PathBuf::from(name)
}

fn write_lines<I, S>(file: File, lines: I) -> std::io::Result<usize>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut w = BufWriter::with_capacity(WRITE_BUFFER_BYTES, file);
    let mut count = 0usize;
    for line in lines {
        w.write_all(line.as_ref().as_bytes())?;
        w.write_all(b"\n")?;
        count += 1;
    }
    w.flush()?;
    let file = w.into_inner().map_err(std::io::IntoInnerError::into_error)?;
    file.sync_all()?;
    Ok(count)
}
