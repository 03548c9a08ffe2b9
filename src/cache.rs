use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

use crate::data::{self, DataUnavailable, LoadedTable};

// ---------------------------------------------------------------------------
// Session cache for the cleaned table
// ---------------------------------------------------------------------------

/// Holds the cleaned table for the life of a session.
///
/// The first [`get`](Self::get) loads the file; later calls hand out the
/// same `Arc`. Only [`reload`](Self::reload) or [`set_path`](Self::set_path)
/// drop it. Failed loads are not cached.
#[derive(Debug)]
pub struct TableCache {
    path: PathBuf,
    entry: Option<Entry>,
}

#[derive(Debug)]
struct Entry {
    loaded: Arc<LoadedTable>,
    modified: Option<SystemTime>,
}

impl TableCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entry: None,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_loaded(&self) -> bool {
        self.entry.is_some()
    }

    /// The cached table, loading it on first use.
    pub fn get(&mut self) -> Result<Arc<LoadedTable>, DataUnavailable> {
        if let Some(entry) = &self.entry {
            return Ok(Arc::clone(&entry.loaded));
        }

        log::info!("Loading metadata from {}", self.path.display());
        let modified = source_modified(&self.path);
        let loaded = Arc::new(data::load_table(&self.path)?);
        self.entry = Some(Entry {
            loaded: Arc::clone(&loaded),
            modified,
        });
        Ok(loaded)
    }

    /// Drop the cached table and load the file again.
    pub fn reload(&mut self) -> Result<Arc<LoadedTable>, DataUnavailable> {
        log::info!("Reloading {}", self.path.display());
        self.entry = None;
        self.get()
    }

    /// Point the cache at another file. The current table is dropped.
    pub fn set_path(&mut self, path: impl Into<PathBuf>) {
        self.path = path.into();
        self.entry = None;
    }

    /// Whether the file on disk changed since it was loaded.
    pub fn is_stale(&self) -> bool {
        match &self.entry {
            Some(entry) => source_modified(&self.path) != entry.modified,
            None => false,
        }
    }
}

fn source_modified(path: &Path) -> Option<SystemTime> {
    std::fs::metadata(path).and_then(|m| m.modified()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const CSV: &str = "title,abstract,journal,publish_time\nA,x,J,2020-01-01\n";

    #[test]
    fn get_loads_once_and_shares() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("metadata.csv");
        std::fs::write(&path, CSV).unwrap();

        let mut cache = TableCache::new(&path);
        assert!(!cache.is_loaded());
        let first = cache.get().unwrap();
        let second = cache.get().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.table.len(), 1);
    }

    #[test]
    fn cached_table_survives_source_removal_until_reload() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("metadata.csv");
        std::fs::write(&path, CSV).unwrap();

        let mut cache = TableCache::new(&path);
        cache.get().unwrap();
        std::fs::remove_file(&path).unwrap();

        assert!(cache.get().is_ok());
        assert!(cache.is_stale());
        assert!(cache.reload().unwrap_err().is_not_found());
        assert!(!cache.is_loaded());
    }

    #[test]
    fn reload_picks_up_new_contents() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("metadata.csv");
        std::fs::write(&path, CSV).unwrap();

        let mut cache = TableCache::new(&path);
        let before = cache.get().unwrap();
        std::fs::write(&path, format!("{CSV}B,y,K,2021-01-01\n")).unwrap();
        let after = cache.reload().unwrap();
        assert_eq!(before.table.len(), 1);
        assert_eq!(after.table.len(), 2);
    }

    #[test]
    fn set_path_invalidates() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("metadata.csv");
        std::fs::write(&path, CSV).unwrap();

        let mut cache = TableCache::new(&path);
        cache.get().unwrap();
        cache.set_path(dir.path().join("other.csv"));
        assert!(!cache.is_loaded());
        assert!(cache.get().is_err());
    }
}
