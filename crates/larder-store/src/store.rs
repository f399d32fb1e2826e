//! The file-backed store: one file, one cache, one lock.
//!
//! A [`Store`] owns its backing file handle and an in-memory cache for its
//! open lifetime. The cache is the single source of truth for reads; every
//! mutation updates the cache and synchronously rewrites the whole file
//! before returning, so a successful write call is observable on the next
//! open. The rewrite is truncate-then-write through the owned handle: a
//! crash mid-rewrite can leave a partial file behind. That durability gap
//! is inherent to the format and accepted at this scale.
//!
//! All operations take `&self`; a per-store mutex serializes callers, so
//! concurrent use of one store from several threads is defined (if slow),
//! never a race.

use std::collections::BTreeMap;
use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard};

use larder_codec::{format_line, parse_line, trim_quotes, Entry};
use tracing::{debug, warn};

use crate::error::{Result, StoreError};

/// Durability of each cache rewrite.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Durability {
    /// Flush to the OS page cache after each rewrite.
    Flush,
    /// Additionally `fsync` the file after each rewrite (safest, slowest).
    SyncEveryWrite,
}

impl Default for Durability {
    fn default() -> Self {
        Self::Flush
    }
}

/// Behavior knobs for a [`Store`].
#[derive(Clone, Debug, Default)]
pub struct StoreOptions {
    /// Durability applied to every mutation's rewrite.
    pub durability: Durability,
}

/// Mutable store state behind the per-store mutex.
#[derive(Default)]
struct StoreState {
    /// Backing file handle; `None` while the store is closed.
    file: Option<File>,
    /// Cache keyed by the case-folded key. Each slot keeps the original
    /// casing for the file and for `canonical_key`.
    cache: BTreeMap<String, Entry>,
}

/// A named, file-backed key-value store.
///
/// Created closed; [`open`](Store::open) materializes the backing file and
/// hydrates the cache. Key lookup is case-insensitive throughout (get, set,
/// remove, contains); stored casing is whatever the first write used.
pub struct Store {
    path: PathBuf,
    options: StoreOptions,
    state: Mutex<StoreState>,
}

impl Store {
    /// Create a handle for the store at `path` with default options.
    /// Nothing touches the disk until [`open`](Store::open) or
    /// [`recreate`](Store::recreate).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_options(path, StoreOptions::default())
    }

    /// Create a handle with explicit [`StoreOptions`].
    pub fn with_options(path: impl Into<PathBuf>, options: StoreOptions) -> Self {
        Self {
            path: path.into(),
            options,
            state: Mutex::new(StoreState::default()),
        }
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether the store currently holds its backing file open.
    pub fn is_open(&self) -> bool {
        self.lock().file.is_some()
    }

    /// Open the backing file, creating it (and its parent directories) when
    /// missing, and hydrate the cache from its contents.
    ///
    /// Idempotent: calling this on an already-open store re-hydrates from
    /// disk. That discards nothing durable, because every mutation is
    /// persisted before its call returns.
    pub fn open(&self) -> Result<()> {
        let mut state = self.lock();
        if state.file.is_none() {
            if let Some(parent) = self.path.parent() {
                fs::create_dir_all(parent)?;
            }
            let file = OpenOptions::new()
                .create(true)
                .read(true)
                .write(true)
                .open(&self.path)?;
            state.file = Some(file);
        }
        self.hydrate(&mut state)?;
        debug!(
            path = %self.path.display(),
            entries = state.cache.len(),
            "store opened"
        );
        Ok(())
    }

    /// Recreate the store from scratch: the backing file is truncated
    /// unconditionally and the cache is cleared, not reloaded.
    pub fn recreate(&self) -> Result<()> {
        let mut state = self.lock();
        // Release the old handle before truncating through a fresh one.
        state.file = None;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new()
            .create(true)
            .truncate(true)
            .read(true)
            .write(true)
            .open(&self.path)?;
        state.file = Some(file);
        state.cache.clear();
        debug!(path = %self.path.display(), "store recreated");
        Ok(())
    }

    /// Flush and release the backing file handle. Accessors fail with
    /// [`StoreError::NotOpen`] until the store is opened again.
    pub fn close(&self) -> Result<()> {
        let mut state = self.lock();
        if let Some(file) = state.file.take() {
            file.sync_all()?;
            debug!(path = %self.path.display(), "store closed");
        }
        state.cache.clear();
        Ok(())
    }

    /// Look up a value. Key comparison is case-insensitive.
    pub fn get(&self, key: &str) -> Result<Option<String>> {
        let state = self.open_state()?;
        Ok(state.cache.get(&fold(key)).map(|entry| entry.value.clone()))
    }

    /// Store a value under `key`, then rewrite the backing file.
    ///
    /// Wrapping quotes on the value are stripped on the way in; everything
    /// else is stored verbatim. When a case-insensitive match already
    /// exists, its stored casing is kept and only the value changes.
    pub fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut state = self.open_state()?;
        let folded = fold(key);
        match state.cache.get_mut(&folded) {
            Some(entry) => entry.value = trim_quotes(value).to_string(),
            None => {
                state.cache.insert(folded, Entry::new(key, value));
            }
        }
        self.persist(&mut state)
    }

    /// Remove a key (case-insensitive). Returns whether anything was
    /// removed; the file is only rewritten when something was.
    pub fn remove(&self, key: &str) -> Result<bool> {
        let mut state = self.open_state()?;
        if state.cache.remove(&fold(key)).is_none() {
            return Ok(false);
        }
        self.persist(&mut state)?;
        Ok(true)
    }

    /// Whether a key is present (case-insensitive).
    pub fn contains(&self, key: &str) -> Result<bool> {
        let state = self.open_state()?;
        Ok(state.cache.contains_key(&fold(key)))
    }

    /// The stored casing of a key, looked up case-insensitively.
    pub fn canonical_key(&self, key: &str) -> Result<Option<String>> {
        let state = self.open_state()?;
        Ok(state.cache.get(&fold(key)).map(|entry| entry.key.clone()))
    }

    /// Snapshot of the current keys, in stored casing.
    pub fn keys(&self) -> Result<Vec<String>> {
        let state = self.open_state()?;
        Ok(state.cache.values().map(|entry| entry.key.clone()).collect())
    }

    /// Snapshot of the full cache, keyed by stored casing.
    pub fn snapshot(&self) -> Result<BTreeMap<String, String>> {
        let state = self.open_state()?;
        Ok(state
            .cache
            .values()
            .map(|entry| (entry.key.clone(), entry.value.clone()))
            .collect())
    }

    /// Number of entries.
    pub fn len(&self) -> Result<usize> {
        let state = self.open_state()?;
        Ok(state.cache.len())
    }

    /// Whether the store has zero entries.
    pub fn is_empty(&self) -> Result<bool> {
        let state = self.open_state()?;
        Ok(state.cache.is_empty())
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().expect("store mutex poisoned")
    }

    /// Lock the state and fail when the store has not been opened.
    fn open_state(&self) -> Result<MutexGuard<'_, StoreState>> {
        let state = self.lock();
        if state.file.is_none() {
            return Err(StoreError::NotOpen {
                path: self.path.clone(),
            });
        }
        Ok(state)
    }

    /// Reload the cache from the backing file.
    ///
    /// Lines without a `=` separator are skipped. When two lines' keys
    /// differ only in case, the later line wins.
    fn hydrate(&self, state: &mut StoreState) -> Result<()> {
        let StoreState { file, cache } = state;
        let Some(file) = file.as_mut() else {
            return Err(StoreError::NotOpen {
                path: self.path.clone(),
            });
        };
        file.seek(SeekFrom::Start(0))?;
        cache.clear();

        let mut reader = BufReader::new(&mut *file);
        let mut line = String::new();
        loop {
            line.clear();
            if reader.read_line(&mut line)? == 0 {
                break;
            }
            let trimmed = line.trim_end_matches(['\r', '\n']);
            if trimmed.is_empty() {
                continue;
            }
            match parse_line(trimmed) {
                Some((key, value)) => {
                    // parse_line already stripped the wire quote layer;
                    // rebuild the entry verbatim so no second layer is lost.
                    let entry = Entry {
                        key: key.to_string(),
                        value: value.to_string(),
                    };
                    let replaced = cache.insert(fold(key), entry);
                    if let Some(prev) = replaced {
                        warn!(
                            path = %self.path.display(),
                            key = %prev.key,
                            "duplicate key differing only in case; later line wins"
                        );
                    }
                }
                None => warn!(
                    path = %self.path.display(),
                    line = %trimmed,
                    "skipping line without a key-value separator"
                ),
            }
        }
        Ok(())
    }

    /// Rewrite the whole backing file from the cache and flush.
    fn persist(&self, state: &mut StoreState) -> Result<()> {
        let StoreState { file, cache } = state;
        let Some(file) = file.as_mut() else {
            return Err(StoreError::NotOpen {
                path: self.path.clone(),
            });
        };
        file.set_len(0)?;
        file.seek(SeekFrom::Start(0))?;

        {
            let mut writer = BufWriter::new(&mut *file);
            for entry in cache.values() {
                writeln!(writer, "{}", format_line(&entry.key, &entry.value))?;
            }
            writer.flush()?;
        }
        if matches!(self.options.durability, Durability::SyncEveryWrite) {
            file.sync_all()?;
        }
        debug!(
            path = %self.path.display(),
            entries = cache.len(),
            "store rewritten"
        );
        Ok(())
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store").field("path", &self.path).finish()
    }
}

/// Case-fold a key for lookup.
fn fold(key: &str) -> String {
    key.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper: a store opened at a fresh path inside its own temp dir.
    fn open_store() -> (tempfile::TempDir, Store) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path().join("app.cfg"));
        store.open().unwrap();
        (dir, store)
    }

    fn file_contents(store: &Store) -> String {
        fs::read_to_string(store.path()).unwrap()
    }

    #[test]
    fn fresh_store_lifecycle() {
        let (_dir, store) = open_store();
        assert!(store.is_empty().unwrap());

        store.set("apple", "10").unwrap();
        assert_eq!(file_contents(&store), "apple=\"10\"\n");
        assert_eq!(store.get("apple").unwrap().as_deref(), Some("10"));

        assert!(store.remove("apple").unwrap());
        assert!(store.is_empty().unwrap());
        assert_eq!(file_contents(&store), "");
    }

    #[test]
    fn accessors_fail_before_open() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path().join("app.cfg"));

        assert!(matches!(
            store.get("k"),
            Err(StoreError::NotOpen { .. })
        ));
        assert!(matches!(store.set("k", "v"), Err(StoreError::NotOpen { .. })));
        assert!(matches!(store.remove("k"), Err(StoreError::NotOpen { .. })));
        assert!(matches!(store.contains("k"), Err(StoreError::NotOpen { .. })));
        assert!(matches!(store.keys(), Err(StoreError::NotOpen { .. })));
        assert!(matches!(store.snapshot(), Err(StoreError::NotOpen { .. })));
        assert!(matches!(store.is_empty(), Err(StoreError::NotOpen { .. })));
        assert!(matches!(store.len(), Err(StoreError::NotOpen { .. })));
        assert!(matches!(
            store.canonical_key("k"),
            Err(StoreError::NotOpen { .. })
        ));
        assert!(!store.is_open());
    }

    #[test]
    fn set_get_round_trip() {
        let (_dir, store) = open_store();
        let value = "a value with spaces, commas; and punctuation!";
        store.set("key", value).unwrap();
        assert_eq!(store.get("key").unwrap().as_deref(), Some(value));
    }

    #[test]
    fn reopen_is_idempotent() {
        let (_dir, store) = open_store();
        store.set("a", "1").unwrap();
        store.set("b", "2").unwrap();
        let before = store.snapshot().unwrap();

        store.open().unwrap();
        assert_eq!(store.snapshot().unwrap(), before);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let (_dir, store) = open_store();
        store.set("Foo", "1").unwrap();

        assert_eq!(store.get("foo").unwrap().as_deref(), Some("1"));
        assert_eq!(store.get("FOO").unwrap().as_deref(), Some("1"));
        assert!(store.contains("fOo").unwrap());
        assert!(store.remove("FOO").unwrap());
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn first_write_casing_is_kept() {
        let (_dir, store) = open_store();
        store.set("Foo", "1").unwrap();
        store.set("foo", "2").unwrap();

        assert_eq!(store.get("foo").unwrap().as_deref(), Some("2"));
        assert_eq!(store.canonical_key("FOO").unwrap().as_deref(), Some("Foo"));
        assert_eq!(file_contents(&store), "Foo=\"2\"\n");
    }

    #[test]
    fn remove_absent_key_leaves_file_untouched() {
        let (_dir, store) = open_store();
        store.set("keep", "1").unwrap();
        let before = file_contents(&store);

        assert!(!store.remove("missing").unwrap());
        assert_eq!(file_contents(&store), before);
    }

    #[test]
    fn values_survive_a_new_store_instance() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.cfg");

        let store = Store::new(&path);
        store.open().unwrap();
        store.set("lang", "hu").unwrap();
        store.close().unwrap();
        drop(store);

        let store = Store::new(&path);
        store.open().unwrap();
        assert_eq!(store.get("lang").unwrap().as_deref(), Some("hu"));
    }

    #[test]
    fn recreate_starts_empty() {
        let (_dir, store) = open_store();
        store.set("a", "1").unwrap();

        store.recreate().unwrap();
        assert!(store.is_empty().unwrap());
        assert_eq!(file_contents(&store), "");
    }

    #[test]
    fn close_then_reopen() {
        let (_dir, store) = open_store();
        store.set("a", "1").unwrap();

        store.close().unwrap();
        assert!(!store.is_open());
        assert!(matches!(store.get("a"), Err(StoreError::NotOpen { .. })));

        store.open().unwrap();
        assert_eq!(store.get("a").unwrap().as_deref(), Some("1"));
    }

    #[test]
    fn open_creates_missing_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::new(dir.path().join("data/configs/app.cfg"));
        store.open().unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn hydration_skips_malformed_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.cfg");
        fs::write(&path, "valid=\"1\"\ngarbage line\n\nother=\"2\"\n").unwrap();

        let store = Store::new(&path);
        store.open().unwrap();
        assert_eq!(store.len().unwrap(), 2);
        assert_eq!(store.get("valid").unwrap().as_deref(), Some("1"));
        assert_eq!(store.get("other").unwrap().as_deref(), Some("2"));
    }

    #[test]
    fn hydration_collapses_case_duplicates_later_line_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.cfg");
        fs::write(&path, "Foo=\"1\"\nfoo=\"2\"\n").unwrap();

        let store = Store::new(&path);
        store.open().unwrap();
        assert_eq!(store.len().unwrap(), 1);
        assert_eq!(store.get("FOO").unwrap().as_deref(), Some("2"));
        assert_eq!(store.canonical_key("Foo").unwrap().as_deref(), Some("foo"));
    }

    #[test]
    fn set_strips_wrapping_quotes() {
        let (_dir, store) = open_store();
        store.set("k", "\"quoted\"").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("quoted"));
        assert_eq!(file_contents(&store), "k=\"quoted\"\n");
    }

    #[test]
    fn sync_every_write_mode() {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::with_options(
            dir.path().join("app.cfg"),
            StoreOptions {
                durability: Durability::SyncEveryWrite,
            },
        );
        store.open().unwrap();

        // Should not fail; data must be durable and readable.
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        assert_eq!(file_contents(&store), "k=\"v\"\n");
    }

    #[test]
    fn keys_and_snapshot_use_stored_casing() {
        let (_dir, store) = open_store();
        store.set("Beta", "2").unwrap();
        store.set("alpha", "1").unwrap();

        assert_eq!(store.keys().unwrap(), vec!["alpha", "Beta"]);
        let snapshot = store.snapshot().unwrap();
        assert_eq!(snapshot.get("alpha").map(String::as_str), Some("1"));
        assert_eq!(snapshot.get("Beta").map(String::as_str), Some("2"));
    }
}
