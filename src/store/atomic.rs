//! Atomic file replacement and cross-process locking.
//!
//! These are the two leaf primitives every store builds on. Writes go
//! through a temp file in the target's directory followed by a rename, so a
//! crash mid-write leaves either the old file or the new one, never a mix.
//! Writers to the same data file contend on an advisory lock held on a
//! derived `<file>.lock` sentinel.

use crate::error::StoreError;
use fs2::FileExt;
use log::{debug, warn};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// How often lock acquisition re-polls while waiting for the holder.
const LOCK_POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Write `content` to `path` such that a concurrent reader never observes a
/// partial file.
///
/// The content is written to a uniquely named temp file in the same
/// directory as the target (same filesystem, so the rename is atomic),
/// flushed and fsynced, then renamed over the target. On any failure before
/// the rename the temp file is removed and the original file is untouched.
pub fn atomic_write(path: &Path, content: &[u8]) -> Result<(), StoreError> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let base = path
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or("data");

    // Unique temp file via create_new; the counter only matters if two
    // writers in the same process race past the lock (e.g. different files
    // hashing to the same base name).
    let mut counter = 0u32;
    let tmp_path = loop {
        let candidate = dir.join(format!(".{}.tmp-{}-{}", base, std::process::id(), counter));
        match OpenOptions::new().write(true).create_new(true).open(&candidate) {
            Ok(mut tmp) => {
                if let Err(e) = write_and_sync(&mut tmp, content) {
                    // Close the handle before unlinking so the remove works
                    // on platforms where open handles pin the file.
                    drop(tmp);
                    if let Err(cleanup_err) = std::fs::remove_file(&candidate) {
                        warn!(
                            "failed to clean up temp file {}: {}",
                            candidate.display(),
                            cleanup_err
                        );
                    }
                    return Err(e.into());
                }
                break candidate;
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                counter = counter.saturating_add(1);
                continue;
            }
            Err(e) => return Err(e.into()),
        }
    };

    // The temp handle is closed by now; rename is the atomic commit point.
    if let Err(e) = std::fs::rename(&tmp_path, path) {
        if let Err(cleanup_err) = std::fs::remove_file(&tmp_path) {
            warn!(
                "failed to clean up temp file {}: {}",
                tmp_path.display(),
                cleanup_err
            );
        }
        return Err(e.into());
    }

    // Persist the rename itself (best-effort; not all platforms allow
    // opening a directory for sync).
    if let Ok(dir_file) = File::open(dir) {
        let _ = dir_file.sync_all();
    }

    debug!("atomic write of {} bytes to {}", content.len(), path.display());
    Ok(())
}

fn write_and_sync(tmp: &mut File, content: &[u8]) -> std::io::Result<()> {
    tmp.write_all(content)?;
    tmp.flush()?;
    tmp.sync_all()
}

/// Exclusive cross-process lock on a data file, held via a derived
/// `<file>.lock` sentinel so every writer targeting the same data file
/// contends on the same path.
pub struct FileLock {
    file: File,
    lock_path: PathBuf,
}

impl FileLock {
    /// Path of the lock sentinel derived from a data file path.
    pub fn lock_path_for(data_path: &Path) -> PathBuf {
        let mut os = data_path.as_os_str().to_os_string();
        os.push(".lock");
        PathBuf::from(os)
    }

    /// Acquire the lock for `data_path`, waiting up to `timeout`.
    ///
    /// Acquisition polls rather than blocking indefinitely; on expiry it
    /// fails with [`StoreError::LockTimeout`], which callers should treat
    /// as transient and retriable. The lock is released when the returned
    /// guard drops, on all exit paths.
    pub async fn acquire(data_path: &Path, timeout: Duration) -> Result<FileLock, StoreError> {
        let lock_path = Self::lock_path_for(data_path);
        let file = OpenOptions::new()
            .create(true)
            .read(true)
            .write(true)
            .open(&lock_path)?;

        let started = Instant::now();
        loop {
            match file.try_lock_exclusive() {
                Ok(()) => {
                    return Ok(FileLock { file, lock_path });
                }
                Err(e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                    let waited = started.elapsed();
                    if waited >= timeout {
                        warn!(
                            "lock on {} still held after {}ms",
                            lock_path.display(),
                            waited.as_millis()
                        );
                        return Err(StoreError::LockTimeout {
                            path: lock_path.display().to_string(),
                            waited_ms: waited.as_millis() as u64,
                        });
                    }
                    tokio::time::sleep(LOCK_POLL_INTERVAL).await;
                }
                Err(e) => return Err(e.into()),
            }
        }
    }

    /// The sentinel path this guard holds.
    pub fn path(&self) -> &Path {
        &self.lock_path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        if let Err(e) = fs2::FileExt::unlock(&self.file) {
            warn!("failed to unlock {}: {}", self.lock_path.display(), e);
        }
    }
}
