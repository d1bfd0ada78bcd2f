//! Directory-backed key-value store.
//!
//! Each key is a `<key>.json` file inside one capability-scoped directory.
//! Writes go to a hidden temporary file that is synced and renamed over the
//! target, so readers never observe a partially written value.

use std::io::{self, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs::{Dir, OpenOptions};
use tracing::debug;

use crate::domain::ports::{KeyValueStore, KeyValueStoreError};

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Key-value store persisting values as JSON files in one directory.
#[derive(Debug)]
pub struct JsonFileKeyValueStore {
    dir: Dir,
    root: Utf8PathBuf,
    writes: Mutex<()>,
}

impl JsonFileKeyValueStore {
    /// Open `root`, creating it if missing.
    pub fn open(root: impl AsRef<Utf8Path>) -> Result<Self, KeyValueStoreError> {
        let root = root.as_ref().to_path_buf();
        Dir::create_ambient_dir_all(&root, ambient_authority())
            .and_then(|()| Dir::open_ambient_dir(&root, ambient_authority()))
            .map(|dir| {
                debug!(root = %root, "opened file key-value store");
                Self {
                    dir,
                    root: root.clone(),
                    writes: Mutex::new(()),
                }
            })
            .map_err(|err| KeyValueStoreError::unavailable(format!("{root}: {err}")))
    }

    /// Directory the store writes into.
    #[must_use]
    pub fn root(&self) -> &Utf8Path {
        &self.root
    }

    fn file_name(key: &str) -> Result<String, KeyValueStoreError> {
        let valid = !key.is_empty()
            && key
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_');
        if valid {
            Ok(format!("{key}.json"))
        } else {
            Err(KeyValueStoreError::invalid_key(key))
        }
    }

    fn lock_writes(&self) -> Result<MutexGuard<'_, ()>, KeyValueStoreError> {
        self.writes
            .lock()
            .map_err(|_| KeyValueStoreError::unavailable("file store write lock poisoned"))
    }

    fn write_atomic(&self, file_name: &str, contents: &str) -> io::Result<()> {
        let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        let tmp_name = format!(".{file_name}.tmp.{}.{counter}", std::process::id());

        let mut options = OpenOptions::new();
        options.write(true).create_new(true);
        let written = self.dir.open_with(&tmp_name, &options).and_then(|mut file| {
            file.write_all(contents.as_bytes())?;
            file.sync_all()
        });
        let renamed = written.and_then(|()| self.dir.rename(&tmp_name, &self.dir, file_name));
        if renamed.is_err() {
            drop(self.dir.remove_file(&tmp_name));
        }
        renamed
    }
}

impl KeyValueStore for JsonFileKeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>, KeyValueStoreError> {
        let file_name = Self::file_name(key)?;
        match self.dir.read_to_string(&file_name) {
            Ok(contents) => Ok(Some(contents)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(KeyValueStoreError::read(key, err.to_string())),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), KeyValueStoreError> {
        let file_name = Self::file_name(key)?;
        let _guard = self.lock_writes()?;
        self.write_atomic(&file_name, value)
            .map_err(|err| KeyValueStoreError::write(key, err.to_string()))
    }

    fn remove(&self, key: &str) -> Result<(), KeyValueStoreError> {
        let file_name = Self::file_name(key)?;
        let _guard = self.lock_writes()?;
        match self.dir.remove_file(&file_name) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(KeyValueStoreError::write(key, err.to_string())),
        }
    }
}
