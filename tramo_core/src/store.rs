//! # Quote Store
//!
//! Save/fetch/list persistence for quotes behind one trait, so front ends do
//! not care whether quotes live in a folder of `.tmq` files or in memory.
//!
//! - [`DirectoryStore`]: one `<uuid>.tmq` file per quote, written through
//!   [`crate::file_io`] (atomic saves, version checks). Saves take the
//!   quote's file lock, so a quote another workstation has open for editing
//!   is never overwritten.
//! - [`MemoryStore`]: process-local map, for tests and embedding

use std::collections::HashMap;
#[cfg(not(target_arch = "wasm32"))]
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::warn;
use uuid::Uuid;

use crate::errors::{CalcError, CalcResult};
#[cfg(not(target_arch = "wasm32"))]
use crate::file_io::{self, FileLock, LockInfo};
use crate::quote::{Quote, QuoteSummary};

/// Persistence for saved quotes.
pub trait QuoteStore {
    /// Insert or replace a quote, keyed by its id.
    fn save(&self, quote: &Quote) -> CalcResult<()>;

    /// Fetch a quote by id.
    fn fetch(&self, id: &Uuid) -> CalcResult<Quote>;

    /// Summaries of every stored quote, newest first.
    fn list(&self) -> CalcResult<Vec<QuoteSummary>>;
}

fn newest_first(mut summaries: Vec<QuoteSummary>) -> Vec<QuoteSummary> {
    summaries.sort_by(|a, b| b.modified.cmp(&a.modified).then(a.id.cmp(&b.id)));
    summaries
}

fn not_found(id: &Uuid) -> CalcError {
    CalcError::QuoteNotFound { id: id.to_string() }
}

/// User recorded in lock files when none is given
#[cfg(not(target_arch = "wasm32"))]
pub const DEFAULT_USER: &str = "tramo";

/// Quotes stored as `<uuid>.tmq` files in one directory.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
    user_id: String,
}

#[cfg(not(target_arch = "wasm32"))]
impl DirectoryStore {
    /// Open a store, creating the directory if needed.
    pub fn open(root: impl Into<PathBuf>) -> CalcResult<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)
            .map_err(|e| CalcError::file_error("create store", root.display().to_string(), e.to_string()))?;
        Ok(DirectoryStore {
            root,
            user_id: DEFAULT_USER.to_string(),
        })
    }

    /// Name written into the lock files this store takes.
    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = user_id.into();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    /// File a quote with this id is stored in
    pub fn path_for(&self, id: &Uuid) -> PathBuf {
        self.root.join(format!("{}.{}", id, file_io::QUOTE_EXTENSION))
    }

    /// Lock a quote for an editing session. Saves from this process go
    /// through while the lock is held; other processes get `FileLocked`.
    pub fn lock(&self, id: &Uuid) -> CalcResult<FileLock> {
        FileLock::acquire(&self.path_for(id), self.user_id.clone())
    }

    /// Fetch a quote along with the live lock another user holds on it.
    pub fn fetch_with_lock(&self, id: &Uuid) -> CalcResult<(Quote, Option<LockInfo>)> {
        let path = self.path_for(id);
        if !path.exists() {
            return Err(not_found(id));
        }
        file_io::load_quote_with_lock_check(&path)
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl QuoteStore for DirectoryStore {
    fn save(&self, quote: &Quote) -> CalcResult<()> {
        let path = self.path_for(&quote.id);
        match FileLock::check(&path) {
            Some(holder) if holder.is_held_by_current_process() => file_io::save_quote(quote, &path),
            Some(holder) => Err(CalcError::file_locked(
                path.display().to_string(),
                format!("{} ({})", holder.user_id, holder.machine),
                holder.locked_at.to_rfc3339(),
            )),
            None => {
                let _lock = FileLock::acquire(&path, self.user_id.clone())?;
                file_io::save_quote(quote, &path)
            }
        }
    }

    fn fetch(&self, id: &Uuid) -> CalcResult<Quote> {
        self.fetch_with_lock(id).map(|(quote, _)| quote)
    }

    fn list(&self) -> CalcResult<Vec<QuoteSummary>> {
        let entries = std::fs::read_dir(&self.root)
            .map_err(|e| CalcError::file_error("list store", self.root.display().to_string(), e.to_string()))?;

        let mut summaries = Vec::new();
        for entry in entries {
            let path = match entry {
                Ok(entry) => entry.path(),
                Err(e) => {
                    warn!(error = %e, "skipping unreadable store entry");
                    continue;
                }
            };
            let is_quote = path
                .extension()
                .map_or(false, |ext| ext == file_io::QUOTE_EXTENSION);
            if !is_quote {
                continue;
            }
            match file_io::load_quote(&path) {
                Ok(quote) => summaries.push(quote.summary()),
                Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable quote"),
            }
        }
        Ok(newest_first(summaries))
    }
}

/// Quotes kept in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    quotes: RwLock<HashMap<Uuid, Quote>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.quotes.read().map(|q| q.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> CalcError {
    CalcError::file_error("lock store", "memory", "store lock poisoned")
}

impl QuoteStore for MemoryStore {
    fn save(&self, quote: &Quote) -> CalcResult<()> {
        let mut quotes = self.quotes.write().map_err(|_| poisoned())?;
        quotes.insert(quote.id, quote.clone());
        Ok(())
    }

    fn fetch(&self, id: &Uuid) -> CalcResult<Quote> {
        let quotes = self.quotes.read().map_err(|_| poisoned())?;
        quotes.get(id).cloned().ok_or_else(|| not_found(id))
    }

    fn list(&self) -> CalcResult<Vec<QuoteSummary>> {
        let quotes = self.quotes.read().map_err(|_| poisoned())?;
        Ok(newest_first(quotes.values().map(Quote::summary).collect()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CalculationConfig;
    use crate::quote::CalculationRequest;
    use crate::work_types::WorkType;
    use chrono::{Duration, Utc};

    fn quote(name: &str, age_minutes: i64) -> Quote {
        let request = CalculationRequest::new(WorkType::Railing, 4.0, 1.0, CalculationConfig::default());
        let mut quote = Quote::new(name, "Cliente", request);
        quote.meta.modified = Utc::now() - Duration::minutes(age_minutes);
        quote
    }

    fn exercise(store: &dyn QuoteStore) {
        let old = quote("Barandal viejo", 60);
        let new = quote("Barandal nuevo", 1);
        store.save(&old).unwrap();
        store.save(&new).unwrap();

        let fetched = store.fetch(&old.id).unwrap();
        assert_eq!(fetched.meta.project_name, "Barandal viejo");

        let list = store.list().unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].id, new.id);
        assert_eq!(list[1].id, old.id);
        assert_eq!(list[0].work_type, WorkType::Railing);

        let missing = store.fetch(&Uuid::new_v4()).unwrap_err();
        assert_eq!(missing.error_code(), "QUOTE_NOT_FOUND");
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::new();
        assert!(store.is_empty());
        exercise(&store);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_save_replaces_existing() {
        let store = MemoryStore::new();
        let mut q = quote("Original", 5);
        store.save(&q).unwrap();
        q.meta.project_name = "Renombrado".to_string();
        store.save(&q).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.fetch(&q.id).unwrap().meta.project_name, "Renombrado");
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_directory_store() {
        let root = std::env::temp_dir().join(format!("tramo_store_{}", Uuid::new_v4()));
        let store = DirectoryStore::open(&root).unwrap();
        exercise(&store);

        // Foreign files are ignored
        std::fs::write(root.join("notes.txt"), "hola").unwrap();
        std::fs::write(root.join("broken.tmq"), "{").unwrap();
        assert_eq!(store.list().unwrap().len(), 2);

        let _ = std::fs::remove_dir_all(&root);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_directory_store_save_takes_lock() {
        let root = std::env::temp_dir().join(format!("tramo_store_lock_{}", Uuid::new_v4()));
        let store = DirectoryStore::open(&root).unwrap().with_user("ana@taller");
        let q = quote("Portón", 1);

        store.save(&q).unwrap();
        // The lock is released once the write is done
        let lock_file = root.join(format!("{}.tmq.lock", q.id));
        assert!(!lock_file.exists());

        // Saves from the lock holder go through
        let session = store.lock(&q.id).unwrap();
        assert_eq!(session.info.user_id, "ana@taller");
        store.save(&q).unwrap();
        drop(session);
        assert!(!lock_file.exists());

        let _ = std::fs::remove_dir_all(&root);
    }

    #[cfg(not(target_arch = "wasm32"))]
    #[test]
    fn test_directory_store_respects_foreign_lock() {
        let root = std::env::temp_dir().join(format!("tramo_store_foreign_{}", Uuid::new_v4()));
        let store = DirectoryStore::open(&root).unwrap();
        let q = quote("Barandal", 1);
        store.save(&q).unwrap();

        let mut holder = LockInfo::new("luis@oficina");
        holder.machine = "oficina-pc".to_string();
        let lock_file = root.join(format!("{}.tmq.lock", q.id));
        std::fs::write(&lock_file, serde_json::to_string(&holder).unwrap()).unwrap();

        let err = store.save(&q).unwrap_err();
        assert_eq!(err.error_code(), "FILE_LOCKED");

        let (fetched, lock) = store.fetch_with_lock(&q.id).unwrap();
        assert_eq!(fetched.id, q.id);
        assert_eq!(lock.unwrap().user_id, "luis@oficina");
        // Plain fetch still reads the quote
        assert_eq!(store.fetch(&q.id).unwrap().id, q.id);

        let _ = std::fs::remove_dir_all(&root);
    }
}
