//! store
//!
//! File-backed colony persistence.
//!
//! # Storage Layout
//!
//! All data lives under a single root directory (platform data dir by
//! default, overridable via config or `--dir`):
//!
//! - `colonies/<name>.json` - one record per colony, keyed by the
//!   sanitized colony name
//! - `lock` - advisory lock file held across mutating store operations
//!
//! # Atomicity
//!
//! Persistence is whole-colony: a save writes a temporary file and
//! renames it into place, so readers never observe a partial record.
//! There is no incremental persistence and no transactional rollback; a
//! failed load returns an error and no colony.
//!
//! The advisory lock serializes concurrent `hb` processes against the
//! same root. In-memory colonies still assume exclusive access per
//! operation; the lock protects only the on-disk state.

pub mod schema;

use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};

use fs2::FileExt;
use thiserror::Error;

use crate::core::colony::Colony;
use schema::{decode, encode, parse_record, RecordError};

/// Errors from store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("no colony named '{0}'")]
    ColonyNotFound(String),

    #[error("colony '{0}' already exists")]
    ColonyExists(String),

    #[error("invalid colony name '{0}'")]
    InvalidName(String),

    #[error("corrupt colony record at '{path}': {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: RecordError,
    },

    #[error("failed to {action} '{path}': {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("no data directory available; set data_dir in config or pass --dir")]
    NoDataDir,
}

fn io_err<'a>(
    action: &'static str,
    path: &'a Path,
) -> impl FnOnce(std::io::Error) -> StoreError + 'a {
    move |source| StoreError::Io {
        action,
        path: path.to_path_buf(),
        source,
    }
}

/// Advisory exclusive lock over a store root.
///
/// Held for the duration of a mutating operation; released on drop.
struct StoreLock {
    file: File,
}

impl StoreLock {
    fn acquire(root: &Path) -> Result<Self, StoreError> {
        let path = root.join("lock");
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(&path)
            .map_err(io_err("open lock file", &path))?;
        file.lock_exclusive()
            .map_err(io_err("lock", &path))?;
        Ok(Self { file })
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        let _ = fs2::FileExt::unlock(&self.file);
    }
}

/// Sanitize a colony name into its storage key, the way existing colony
/// files were named: lowercased, spaces become underscores.
pub fn storage_key(name: &str) -> Result<String, StoreError> {
    let key = name.trim().to_lowercase().replace(' ', "_");
    if key.is_empty() || key.contains('/') || key.contains('\\') || key.starts_with('.') {
        return Err(StoreError::InvalidName(name.to_string()));
    }
    Ok(key)
}

/// A directory of persisted colonies.
#[derive(Debug, Clone)]
pub struct ColonyStore {
    root: PathBuf,
}

impl ColonyStore {
    /// Open a store rooted at `root`. Directories are created lazily on
    /// first write; opening never touches the filesystem.
    pub fn open(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The default store root: `<platform data dir>/herdbook`.
    pub fn default_root() -> Result<PathBuf, StoreError> {
        dirs::data_dir()
            .map(|d| d.join("herdbook"))
            .ok_or(StoreError::NoDataDir)
    }

    /// The store root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn colonies_dir(&self) -> PathBuf {
        self.root.join("colonies")
    }

    fn colony_path(&self, name: &str) -> Result<PathBuf, StoreError> {
        Ok(self.colonies_dir().join(format!("{}.json", storage_key(name)?)))
    }

    fn ensure_dirs(&self) -> Result<(), StoreError> {
        let dir = self.colonies_dir();
        fs::create_dir_all(&dir).map_err(io_err("create directory", &dir))
    }

    /// Names of all persisted colonies, sorted.
    pub fn list(&self) -> Result<Vec<String>, StoreError> {
        let dir = self.colonies_dir();
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let entries = fs::read_dir(&dir).map_err(io_err("read directory", &dir))?;
        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(io_err("read directory", &dir))?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    /// True if a colony with this name is persisted.
    pub fn exists(&self, name: &str) -> Result<bool, StoreError> {
        Ok(self.colony_path(name)?.exists())
    }

    /// Load a colony by name.
    ///
    /// # Errors
    ///
    /// - `ColonyNotFound` if no record exists
    /// - `Corrupt` if the record fails to parse or decode
    pub fn load(&self, name: &str) -> Result<Colony, StoreError> {
        let path = self.colony_path(name)?;
        if !path.exists() {
            return Err(StoreError::ColonyNotFound(name.to_string()));
        }
        let json = fs::read_to_string(&path).map_err(io_err("read", &path))?;
        parse_record(&json)
            .and_then(decode)
            .map_err(|source| StoreError::Corrupt { path, source })
    }

    /// Persist a colony, replacing any existing record of the same name.
    ///
    /// The record is written to a temporary file and renamed into place
    /// so a crash cannot leave a truncated record behind.
    pub fn save(&self, colony: &Colony) -> Result<(), StoreError> {
        self.ensure_dirs()?;
        let _lock = StoreLock::acquire(&self.root)?;

        let path = self.colony_path(&colony.name)?;
        let record = encode(colony);
        let json = serde_json::to_string_pretty(&record)
            .map_err(|e| StoreError::Corrupt {
                path: path.clone(),
                source: RecordError::Parse(e.to_string()),
            })?;

        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(io_err("write", &tmp))?;
        if let Err(source) = fs::rename(&tmp, &path) {
            // Don't leave the staging file behind on a failed swap.
            let _ = fs::remove_file(&tmp);
            return Err(io_err("rename", &path)(source));
        }
        Ok(())
    }

    /// Rename a persisted colony.
    ///
    /// The record's stored name is updated along with the file, so a
    /// later load returns a colony named `new`.
    ///
    /// # Errors
    ///
    /// - `ColonyNotFound` if `old` does not exist
    /// - `ColonyExists` if `new` is already taken
    pub fn rename(&self, old: &str, new: &str) -> Result<(), StoreError> {
        let old_path = self.colony_path(old)?;
        let new_path = self.colony_path(new)?;
        if new_path.exists() && old_path != new_path {
            return Err(StoreError::ColonyExists(new.to_string()));
        }
        let mut colony = self.load(old)?;
        colony.name = new.to_string();
        self.save(&colony)?;
        if old_path != new_path {
            fs::remove_file(&old_path).map_err(io_err("remove", &old_path))?;
        }
        Ok(())
    }

    /// Delete a persisted colony.
    ///
    /// # Errors
    ///
    /// Returns `ColonyNotFound` if no record exists.
    pub fn delete(&self, name: &str) -> Result<(), StoreError> {
        let path = self.colony_path(name)?;
        let _lock = StoreLock::acquire(&self.root)?;
        if !path.exists() {
            return Err(StoreError::ColonyNotFound(name.to_string()));
        }
        fs::remove_file(&path).map_err(io_err("remove", &path))
    }
}
