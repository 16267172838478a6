//! In-memory cache of loaded trip tables.
//!
//! Entries are keyed by source path and invalidated when the file's
//! modification time changes. The cache belongs to whoever drives the
//! helpers; the helpers themselves never cache anything.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use tracing::debug;

use crate::error::Result;
use crate::parser::load_trips;
use crate::trips::TripTable;

struct CachedTable {
    modified: SystemTime,
    table: Arc<TripTable>,
}

#[derive(Default)]
pub struct TableCache {
    entries: HashMap<PathBuf, CachedTable>,
}

impl TableCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached table for `path`, loading it on a miss or when the
    /// file changed since it was cached.
    #[tracing::instrument(
        name = "query_table_cache",
        level = "debug",
        skip(self, path),
        fields(path = %path.as_ref().display())
    )]
    pub fn get_or_load(&mut self, path: impl AsRef<Path>) -> Result<Arc<TripTable>> {
        let path = path.as_ref();
        let modified = fs::metadata(path)?.modified()?;

        if let Some(entry) = self.entries.get(path) {
            if entry.modified == modified {
                debug!("Table found and still fresh");
                return Ok(Arc::clone(&entry.table));
            }
            debug!("Table found but source file changed");
        } else {
            debug!("Table not cached");
        }

        let table = Arc::new(load_trips(path)?);
        self.entries.insert(
            path.to_path_buf(),
            CachedTable {
                modified,
                table: Arc::clone(&table),
            },
        );
        Ok(table)
    }

    /// Drops the entry for `path`, if any.
    pub fn invalidate(&mut self, path: impl AsRef<Path>) -> bool {
        self.entries.remove(path.as_ref()).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
