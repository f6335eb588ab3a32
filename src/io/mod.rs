//! On-disk formats of the XY data: NumPy `.npy` arrays and `.npz` archives.

mod npy;
mod npz;

use std::{fs, io::{Seek, SeekFrom, Write}, path::{Path, PathBuf}};

use anyhow::{Context, Result};
use tempfile::NamedTempFile;

pub(crate) use npy::{read_f64_2d, write_f64_2d};
pub(crate) use npz::{read_xy, write_xy};

/// Write-then-rename wrapper, so readers never observe a partially written file.
pub(crate) struct PendingWrite {
    target: PathBuf,
    tmp: NamedTempFile,
}

impl PendingWrite {
    /// Open a temporary file next to `target`, creating parent directories.
    pub(crate) fn open(target: &Path) -> Result<Self> {
        let parent = match target.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent)
            .with_context(|| format!("[io] Failed to create directory {}", parent.display()))?;
        let tmp = NamedTempFile::new_in(parent)
            .with_context(|| format!("[io] Failed to create temp file in {}", parent.display()))?;

        Ok(Self { target: target.to_path_buf(), tmp })
    }

    /// Flush and atomically move the temporary file onto the target, replacing it.
    pub(crate) fn commit(mut self) -> Result<()> {
        self.tmp.flush().context("[io] Failed to flush temp file")?;
        self.tmp.as_file().sync_all().ok(); // best-effort fsync
        self.tmp.persist(&self.target)
            .with_context(|| format!("[io] Failed to rename to {}", self.target.display()))?;
        Ok(())
    }
}

impl Write for PendingWrite {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> { self.tmp.write(buf) }

    fn flush(&mut self) -> std::io::Result<()> { self.tmp.flush() }
}

impl Seek for PendingWrite {
    fn seek(&mut self, pos: SeekFrom) -> std::io::Result<u64> { self.tmp.as_file_mut().seek(pos) }
}
