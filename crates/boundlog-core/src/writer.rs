//! Size-bounded append-only file.
//!
//! A [`BoundedFile`] appends raw bytes to a single file and keeps it from
//! growing without limit by retaining only the last `max_entries` lines.
//! Trimming always drops the oldest whole lines: the file never starts
//! with a partial line after a trim.
//!
//! All operations on one instance go through a single mutex, so the
//! handle is always positioned at end-of-file when an append starts.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::error::{LogFileError, LogFileResult};

/// Bytes read per step of the backward newline scan.
const SCAN_CHUNK: usize = 8 * 1024;

/// Writer that appends to a file capped at `max_entries` lines.
///
/// Share one instance between several handlers with an `Arc`; never
/// reopen the same path twice in one process.
#[derive(Debug)]
pub struct BoundedFile {
    /// Path to the backing file
    path: PathBuf,

    /// Maximum number of lines kept by [`BoundedFile::truncate`]
    max_entries: usize,

    /// Readable append-mode handle; trims rewrite the file through it
    file: Mutex<File>,
}

impl BoundedFile {
    /// Open or create a bounded file.
    ///
    /// A missing file (and any missing parent directories) is created
    /// empty. An existing file is first trimmed to `max_entries` lines;
    /// if that trim fails the file is opened untrimmed.
    pub fn open(path: impl AsRef<Path>, max_entries: usize) -> LogFileResult<Self> {
        Self::open_with(path, max_entries, trim_in_place)
    }

    /// [`BoundedFile::open`] with the pre-open trim supplied by the caller.
    fn open_with<F>(path: impl AsRef<Path>, max_entries: usize, trim: F) -> LogFileResult<Self>
    where
        F: FnOnce(&mut File, usize) -> io::Result<Option<u64>>,
    {
        if max_entries == 0 {
            return Err(LogFileError::InvalidMaxEntries);
        }
        let path = path.as_ref().to_path_buf();

        let existed = path.exists();
        if !existed {
            create_file(&path).map_err(|source| LogFileError::Create {
                path: path.clone(),
                source,
            })?;
        }

        let mut file = open_for_append(&path).map_err(|source| LogFileError::Open {
            path: path.clone(),
            source,
        })?;

        if existed {
            match trim(&mut file, max_entries) {
                Ok(Some(dropped)) => log_trim(&path, dropped, max_entries),
                Ok(None) => {}
                Err(e) => warn!(
                    path = %path.display(),
                    error = %e,
                    "Could not trim existing log file, opening it untrimmed",
                ),
            }
        }

        Ok(Self {
            path,
            max_entries,
            file: Mutex::new(file),
        })
    }

    /// Get the path to the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the configured line cap.
    pub fn max_entries(&self) -> usize {
        self.max_entries
    }

    /// Current size of the backing file in bytes.
    pub fn len(&self) -> LogFileResult<u64> {
        let file = self.file.lock();
        Ok(file.metadata()?.len())
    }

    /// Whether the backing file is empty.
    pub fn is_empty(&self) -> LogFileResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Append bytes verbatim at end-of-file.
    ///
    /// No line terminator is added; callers include their own.
    pub fn append(&self, bytes: &[u8]) -> LogFileResult<()> {
        let mut file = self.file.lock();
        file.write_all(bytes)?;
        Ok(())
    }

    /// Trim the file to the configured `max_entries` lines.
    pub fn truncate(&self) -> LogFileResult<bool> {
        self.truncate_to_last(self.max_entries)
    }

    /// Trim the file to its last `n` complete lines.
    ///
    /// Returns `true` if lines were dropped. A file already within `n`
    /// lines is left byte-for-byte unchanged.
    pub fn truncate_to_last(&self, n: usize) -> LogFileResult<bool> {
        if n == 0 {
            return Err(LogFileError::InvalidMaxEntries);
        }

        let dropped = {
            let mut file = self.file.lock();
            trim_in_place(&mut file, n)?
        };

        // Log after unlocking: a tracing layer writing to this file takes the same lock
        match dropped {
            Some(bytes) => {
                log_trim(&self.path, bytes, n);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Reset the file to zero length.
    ///
    /// The next append writes at offset 0.
    pub fn clear(&self) -> LogFileResult<()> {
        let mut file = self.file.lock();
        file.set_len(0)?;
        file.seek(SeekFrom::Start(0))?;
        Ok(())
    }
}

/// Create an empty file, including missing parent directories.
fn create_file(path: &Path) -> io::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().write(true).create(true).open(path)?;
    Ok(())
}

fn open_for_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().read(true).append(true).open(path)
}

fn log_trim(path: &Path, dropped_bytes: u64, kept_lines: usize) {
    debug!(path = %path.display(), dropped_bytes, kept_lines, "Trimmed log file");
}

/// Rewrite `file` in place so only its last `keep` lines remain.
///
/// Returns `None` without touching the file when it is already within
/// budget, otherwise the number of dropped bytes. The retained tail is
/// at most `keep` lines, so it is read into memory, the file is cut to
/// zero length and the tail written back through the same handle.
fn trim_in_place(file: &mut File, keep: usize) -> io::Result<Option<u64>> {
    let len = file.metadata()?.len();

    let Some(cut) = find_cut(&mut *file, len, keep, SCAN_CHUNK)? else {
        return Ok(None);
    };

    let mut tail = Vec::with_capacity((len - cut) as usize);
    file.seek(SeekFrom::Start(cut))?;
    file.read_to_end(&mut tail)?;

    file.set_len(0)?;
    // Append mode: the write lands at the new end-of-file, offset 0
    file.write_all(&tail)?;

    Ok(Some(cut))
}

/// Find the offset of the first byte to keep so that exactly `keep`
/// newline-terminated lines remain.
///
/// Scans backwards from `len` in `chunk`-sized reads, counting `\n`
/// bytes. Returns `None` when fewer than `keep + 1` separators exist,
/// meaning the content already fits.
fn find_cut<R: Read + Seek>(
    reader: &mut R,
    len: u64,
    keep: usize,
    chunk: usize,
) -> io::Result<Option<u64>> {
    let mut buf = vec![0u8; chunk];
    let mut end = len;
    let mut found = 0usize;

    while end > 0 {
        let start = end.saturating_sub(chunk as u64);
        let window = &mut buf[..(end - start) as usize];
        reader.seek(SeekFrom::Start(start))?;
        reader.read_exact(window)?;

        for (i, byte) in window.iter().enumerate().rev() {
            if *byte == b'\n' {
                found += 1;
                if found > keep {
                    return Ok(Some(start + i as u64 + 1));
                }
            }
        }
        end = start;
    }

    Ok(None)
}
