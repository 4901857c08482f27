//! # Quote Files
//!
//! Quote file operations with safety features:
//! - **Atomic saves**: write to `.tmp`, fsync, rename over the target
//! - **File locking**: keep two workstations from editing one quote on a
//!   shared drive
//! - **Version validation**: refuse files written by a newer schema
//!
//! ## File Format
//!
//! Quotes are saved as `.tmq` files containing pretty-printed JSON. Lock
//! files sit next to them with a `.tmq.lock` extension and record who holds
//! the lock.
//!
//! ## Example
//!
//! ```rust,no_run
//! use tramo_core::config::CalculationConfig;
//! use tramo_core::file_io::{load_quote, save_quote, FileLock};
//! use tramo_core::quote::{CalculationRequest, Quote};
//! use tramo_core::work_types::WorkType;
//! use std::path::Path;
//!
//! let request = CalculationRequest::new(WorkType::Fence, 12.0, 1.8, CalculationConfig::default());
//! let quote = Quote::new("Cerca Rancho", "Cliente", request);
//! let path = Path::new("cerca.tmq");
//!
//! let lock = FileLock::acquire(path, "taller@vemex.mx").unwrap();
//! save_quote(&quote, path).unwrap();
//! drop(lock);
//!
//! let loaded = load_quote(path).unwrap();
//! assert_eq!(loaded.id, quote.id);
//! ```

use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use fs2::FileExt;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::errors::{CalcError, CalcResult};
use crate::quote::{Quote, SCHEMA_VERSION};

/// Extension used for quote files
pub const QUOTE_EXTENSION: &str = "tmq";

/// Locks older than this are taken over regardless of owner
pub const STALE_LOCK_HOURS: i64 = 24;

/// Lock file metadata stored in `.tmq.lock` files
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockInfo {
    /// Who holds the lock (user name or email)
    pub user_id: String,
    /// Machine name where the lock was acquired
    pub machine: String,
    /// Process that holds the lock
    pub pid: u32,
    pub locked_at: DateTime<Utc>,
}

impl LockInfo {
    pub fn new(user_id: impl Into<String>) -> Self {
        LockInfo {
            user_id: user_id.into(),
            machine: hostname().unwrap_or_else(|| "unknown".to_string()),
            pid: std::process::id(),
            locked_at: Utc::now(),
        }
    }

    /// Whether this lock was taken by the running process.
    pub fn is_held_by_current_process(&self) -> bool {
        self.pid == std::process::id()
            && self.machine == hostname().unwrap_or_else(|| "unknown".to_string())
    }

    /// Whether the lock can be taken over.
    ///
    /// A lock is stale when its process is gone from this machine, or when it
    /// is older than [`STALE_LOCK_HOURS`].
    pub fn is_stale(&self) -> bool {
        if hostname().as_deref() == Some(self.machine.as_str()) && !process_alive(self.pid) {
            return true;
        }
        (Utc::now() - self.locked_at).num_hours() > STALE_LOCK_HOURS
    }
}

fn hostname() -> Option<String> {
    #[cfg(windows)]
    {
        std::env::var("COMPUTERNAME").ok()
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOSTNAME")
            .ok()
            .or_else(|| std::env::var("HOST").ok())
    }
}

#[cfg(unix)]
fn process_alive(pid: u32) -> bool {
    Path::new(&format!("/proc/{}", pid)).exists()
}

#[cfg(windows)]
fn process_alive(pid: u32) -> bool {
    use std::process::Command;
    match Command::new("tasklist")
        .args(["/FI", &format!("PID eq {}", pid), "/NH"])
        .output()
    {
        Ok(output) => String::from_utf8_lossy(&output.stdout).contains(&pid.to_string()),
        Err(_) => true,
    }
}

#[cfg(not(any(unix, windows)))]
fn process_alive(_pid: u32) -> bool {
    true
}

/// Exclusive lock on a quote file, released on drop.
///
/// Combines an OS-level lock (fs2) for process safety with a `.lock` file
/// whose JSON body tells other users who is editing.
pub struct FileLock {
    quote_path: PathBuf,
    lock_path: PathBuf,
    /// Keeps the OS lock alive
    _lock_file: File,
    pub info: LockInfo,
}

impl FileLock {
    /// Acquire an exclusive lock on a quote file.
    ///
    /// # Returns
    ///
    /// * `Ok(FileLock)` - Lock acquired
    /// * `Err(CalcError::FileLocked)` - Someone else holds a live lock
    pub fn acquire(path: &Path, user_id: impl Into<String>) -> CalcResult<Self> {
        let lock_path = lock_path_for(path);
        let info = LockInfo::new(user_id);

        if let Ok(existing) = read_lock_info(&lock_path) {
            if !existing.is_stale() {
                return Err(CalcError::file_locked(
                    path.display().to_string(),
                    format!("{} ({})", existing.user_id, existing.machine),
                    existing.locked_at.to_rfc3339(),
                ));
            }
            warn!(
                path = %path.display(),
                holder = %existing.user_id,
                "taking over stale lock"
            );
        }

        let mut lock_file = OpenOptions::new()
            .write(true)
            .read(true)
            .create(true)
            .truncate(true)
            .open(&lock_path)
            .map_err(|e| CalcError::file_error("create lock", lock_path.display().to_string(), e.to_string()))?;

        lock_file.try_lock_exclusive().map_err(|_| {
            CalcError::file_locked(path.display().to_string(), "another process", "unknown")
        })?;

        let body = serde_json::to_string_pretty(&info).map_err(CalcError::serialization)?;
        lock_file
            .write_all(body.as_bytes())
            .and_then(|_| lock_file.sync_all())
            .map_err(|e| CalcError::file_error("write lock", lock_path.display().to_string(), e.to_string()))?;

        debug!(path = %path.display(), user = %info.user_id, "acquired quote lock");
        Ok(FileLock {
            quote_path: path.to_path_buf(),
            lock_path,
            _lock_file: lock_file,
            info,
        })
    }

    /// Live lock on `path`, if any, without acquiring it.
    pub fn check(path: &Path) -> Option<LockInfo> {
        read_lock_info(&lock_path_for(path))
            .ok()
            .filter(|info| !info.is_stale())
    }

    pub fn quote_path(&self) -> &Path {
        &self.quote_path
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        // The OS lock goes with `_lock_file`
        if let Err(e) = fs::remove_file(&self.lock_path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %self.lock_path.display(), error = %e, "could not remove lock file");
            }
        }
    }
}

fn lock_path_for(quote_path: &Path) -> PathBuf {
    let extension = quote_path
        .extension()
        .map(|e| format!("{}.lock", e.to_string_lossy()))
        .unwrap_or_else(|| "lock".to_string());
    quote_path.with_extension(extension)
}

fn read_lock_info(lock_path: &Path) -> CalcResult<LockInfo> {
    let contents = fs::read_to_string(lock_path)
        .map_err(|e| CalcError::file_error("read lock", lock_path.display().to_string(), e.to_string()))?;
    serde_json::from_str(&contents).map_err(CalcError::serialization)
}

/// Save a quote with atomic write semantics.
///
/// 1. Serialize to JSON
/// 2. Write to `<path>.<nonce>.tmp`, unique per call
/// 3. fsync
/// 4. Rename over `path`
pub fn save_quote(quote: &Quote, path: &Path) -> CalcResult<()> {
    let json = serde_json::to_string_pretty(quote).map_err(CalcError::serialization)?;

    let tmp_path = temp_path_for(path);
    let mut tmp_file = File::create(&tmp_path).map_err(|e| {
        CalcError::file_error("create temp file", tmp_path.display().to_string(), e.to_string())
    })?;
    tmp_file.write_all(json.as_bytes()).map_err(|e| {
        CalcError::file_error("write temp file", tmp_path.display().to_string(), e.to_string())
    })?;
    tmp_file.sync_all().map_err(|e| {
        CalcError::file_error("sync temp file", tmp_path.display().to_string(), e.to_string())
    })?;

    fs::rename(&tmp_path, path).map_err(|e| {
        if let Err(cleanup) = fs::remove_file(&tmp_path) {
            warn!(path = %tmp_path.display(), error = %cleanup, "could not remove temp file");
        }
        CalcError::file_error("rename to final", path.display().to_string(), e.to_string())
    })?;

    info!(folio = %quote.meta.folio, path = %path.display(), "saved quote");
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let extension = match path.extension() {
        Some(e) => format!("{}.{}.tmp", e.to_string_lossy(), Uuid::new_v4().simple()),
        None => format!("{}.tmp", Uuid::new_v4().simple()),
    };
    path.with_extension(extension)
}

/// Load a quote from a file.
///
/// # Returns
///
/// * `Err(CalcError::VersionMismatch)` - Written by an incompatible schema
/// * `Err(CalcError::SerializationError)` - Not a quote file
/// * `Err(CalcError::FileError)` - I/O error
pub fn load_quote(path: &Path) -> CalcResult<Quote> {
    let contents = fs::read_to_string(path)
        .map_err(|e| CalcError::file_error("read", path.display().to_string(), e.to_string()))?;

    let quote: Quote = serde_json::from_str(&contents).map_err(|e| CalcError::SerializationError {
        reason: format!("Invalid quote file {}: {}", path.display(), e),
    })?;

    validate_version(&quote.meta.version)?;
    debug!(folio = %quote.meta.folio, path = %path.display(), "loaded quote");
    Ok(quote)
}

/// Load a quote together with the live lock on it, if any.
///
/// A `Some` lock means another user is editing and the caller should treat
/// the quote as read-only.
pub fn load_quote_with_lock_check(path: &Path) -> CalcResult<(Quote, Option<LockInfo>)> {
    let quote = load_quote(path)?;
    let lock = FileLock::check(path);
    if let Some(info) = &lock {
        info!(path = %path.display(), holder = %info.user_id, "quote is locked, opening read-only");
    }
    Ok((quote, lock))
}

/// Major versions must match; on 0.x the file's minor may not be newer.
fn validate_version(file_version: &str) -> CalcResult<()> {
    let parse = |v: &str| -> Vec<u32> { v.split('.').filter_map(|p| p.parse().ok()).collect() };
    let file = parse(file_version);
    let current = parse(SCHEMA_VERSION);

    let mismatch = || CalcError::VersionMismatch {
        file_version: file_version.to_string(),
        expected_version: SCHEMA_VERSION.to_string(),
    };

    match (file.as_slice(), current.as_slice()) {
        ([], _) | (_, []) => Err(mismatch()),
        ([file_major, ..], [current_major, ..]) if file_major != current_major => Err(mismatch()),
        ([0, file_minor, ..], [0, current_minor, ..]) if file_minor > current_minor => Err(mismatch()),
        _ => Ok(()),
    }
}
