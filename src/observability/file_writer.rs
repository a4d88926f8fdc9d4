//! Log file writer with size-based rotation and backup retention.
//!
//! When the log grows past [`MAX_FILE_SIZE_BYTES`] it is renamed to
//! `<name>.<unix timestamp>` and a fresh file is started. Only the newest
//! [`MAX_BACKUP_FILES`] backups are kept.
//!
//! Output is line-buffered: bytes are held until a newline arrives, and the
//! size check runs before each batch of complete lines, so a line is never
//! split between a backup and the fresh file.

use chrono::Utc;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Maximum file size before rotation (10 MB).
pub const MAX_FILE_SIZE_BYTES: u64 = 10 * 1024 * 1024;

/// Number of backup files to retain after rotation.
pub const MAX_BACKUP_FILES: usize = 3;

/// Thread-safe rotating file writer.
///
/// `&FileWriter` implements [`Write`], so an `Arc<FileWriter>` can be handed
/// straight to `tracing_subscriber::fmt` as its writer. The file is opened on
/// the first write.
pub struct FileWriter {
    file_path: PathBuf,
    max_bytes: u64,
    inner: Mutex<Inner>,
}

struct Inner {
    file: Option<File>,
    /// Bytes after the last newline seen.
    pending: Vec<u8>,
}

impl FileWriter {
    /// Creates a writer for `file_path` with the default size limit.
    #[must_use]
    pub const fn new(file_path: PathBuf) -> Self {
        Self::with_limit(file_path, MAX_FILE_SIZE_BYTES)
    }

    /// Creates a writer that rotates once the file exceeds `max_bytes`.
    #[must_use]
    pub const fn with_limit(file_path: PathBuf, max_bytes: u64) -> Self {
        Self {
            file_path,
            max_bytes,
            inner: Mutex::new(Inner {
                file: None,
                pending: Vec::new(),
            }),
        }
    }

    /// Path of the active log file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.file_path
    }

    fn lock(&self) -> io::Result<std::sync::MutexGuard<'_, Inner>> {
        self.inner
            .lock()
            .map_err(|e| io::Error::new(io::ErrorKind::Other, format!("log writer mutex poisoned: {e}")))
    }

    fn write_chunk(&self, buf: &[u8]) -> io::Result<usize> {
        let mut inner = self.lock()?;
        inner.pending.extend_from_slice(buf);

        if let Some(last_newline) = inner.pending.iter().rposition(|&b| b == b'\n') {
            let rest = inner.pending.split_off(last_newline + 1);
            let lines = std::mem::replace(&mut inner.pending, rest);
            self.write_lines(&mut inner.file, &lines)?;
        }
        Ok(buf.len())
    }

    fn flush_pending(&self) -> io::Result<()> {
        let mut inner = self.lock()?;
        if inner.pending.is_empty() {
            return Ok(());
        }
        let pending = std::mem::take(&mut inner.pending);
        self.write_lines(&mut inner.file, &pending)
    }

    fn write_lines(&self, file: &mut Option<File>, lines: &[u8]) -> io::Result<()> {
        self.check_and_rotate(file)?;

        if file.is_none() {
            *file = Some(OpenOptions::new().create(true).append(true).open(&self.file_path)?);
        }
        let Some(handle) = file.as_mut() else {
            return Err(io::Error::new(io::ErrorKind::Other, "log file unavailable"));
        };

        handle.write_all(lines)?;
        handle.flush()
    }

    fn check_and_rotate(&self, file: &mut Option<File>) -> io::Result<()> {
        if let Ok(metadata) = fs::metadata(&self.file_path) {
            if metadata.len() > self.max_bytes {
                *file = None;
                self.rotate_files()?;
            }
        }
        Ok(())
    }

    fn rotate_files(&self) -> io::Result<()> {
        let timestamp = Utc::now().timestamp_micros();
        let mut backup = self.file_path.clone().into_os_string();
        backup.push(format!(".{timestamp}"));

        if self.file_path.exists() {
            fs::rename(&self.file_path, PathBuf::from(backup))?;
        }
        self.cleanup_old_backups()
    }

    fn cleanup_old_backups(&self) -> io::Result<()> {
        let parent = match self.file_path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let Some(file_name) = self.file_path.file_name().and_then(|s| s.to_str()) else {
            return Err(io::Error::new(io::ErrorKind::Other, "invalid log file name"));
        };
        let prefix = format!("{file_name}.");

        let mut backups: Vec<PathBuf> = fs::read_dir(parent)?
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.file_name()
                    .and_then(|name| name.to_str())
                    .and_then(|name| name.strip_prefix(&prefix))
                    .is_some_and(|suffix| !suffix.is_empty() && suffix.bytes().all(|b| b.is_ascii_digit()))
            })
            .collect();

        // Timestamp suffixes sort numerically; newest first.
        backups.sort_by_key(|path| {
            std::cmp::Reverse(
                path.extension()
                    .and_then(|ext| ext.to_str())
                    .and_then(|ext| ext.parse::<i64>().ok())
                    .unwrap_or_default(),
            )
        });

        for old in backups.iter().skip(MAX_BACKUP_FILES) {
            let _ = fs::remove_file(old);
        }
        Ok(())
    }
}

impl Write for &FileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.write_chunk(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flush_pending()
    }
}

impl Drop for FileWriter {
    fn drop(&mut self) {
        let _ = self.flush_pending();
    }
}

impl std::fmt::Debug for FileWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileWriter")
            .field("file_path", &self.file_path)
            .field("max_bytes", &self.max_bytes)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backups(dir: &Path) -> usize {
        fs::read_dir(dir)
            .unwrap()
            .filter_map(std::result::Result::ok)
            .filter(|e| e.file_name().to_string_lossy().starts_with("storyshelf.log."))
            .count()
    }

    #[test]
    fn appends_lines() {
        let dir = tempfile::tempdir().unwrap();
        let writer = FileWriter::new(dir.path().join("storyshelf.log"));
        writeln!(&writer, "first").unwrap();
        writeln!(&writer, "second").unwrap();

        let contents = fs::read_to_string(writer.path()).unwrap();
        assert_eq!(contents, "first\nsecond\n");
    }

    #[test]
    fn rotates_and_keeps_limited_backups() {
        let dir = tempfile::tempdir().unwrap();
        let writer = FileWriter::with_limit(dir.path().join("storyshelf.log"), 8);

        for i in 0..6 {
            writeln!(&writer, "line number {i}").unwrap();
            std::thread::sleep(std::time::Duration::from_millis(2));
        }

        assert!(backups(dir.path()) <= MAX_BACKUP_FILES);
        assert!(backups(dir.path()) > 0);
        let active = fs::read_to_string(writer.path()).unwrap();
        assert_eq!(active, "line number 5\n");
    }

    #[test]
    fn partial_writes_stay_on_one_line_across_rotation() {
        let dir = tempfile::tempdir().unwrap();
        let writer = FileWriter::with_limit(dir.path().join("storyshelf.log"), 4);

        (&writer).write_all(b"first line\n").unwrap();
        std::thread::sleep(std::time::Duration::from_millis(2));
        for piece in ["sec", "ond ", "line\nthi", "rd"] {
            (&writer).write_all(piece.as_bytes()).unwrap();
        }

        assert_eq!(fs::read_to_string(writer.path()).unwrap(), "second line\n");
        assert_eq!(backups(dir.path()), 1);

        std::thread::sleep(std::time::Duration::from_millis(2));
        (&writer).flush().unwrap();
        assert_eq!(fs::read_to_string(writer.path()).unwrap(), "third");
        assert_eq!(backups(dir.path()), 2);
    }
}
