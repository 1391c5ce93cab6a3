// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JSON file backed position store.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde_json::{Map, Value};

use super::{POSITION_KEY, PositionStore};
use crate::error::StoreError;
use crate::types::Position;

/// File name inside the persistence directory.
const FILE_NAME: &str = "persist.json";

/// Application directory under the platform data directory.
const APP_DIR: &str = "timed-cover";

/// Stores the position as one key of a JSON document.
///
/// Other keys in the document are preserved on save. Writes go to a
/// temporary file which is then renamed over the document.
///
/// # Examples
///
/// ```no_run
/// use timed_cover::store::{JsonFileStore, PositionStore};
/// use timed_cover::types::Position;
///
/// # fn example() -> Result<(), timed_cover::error::StoreError> {
/// let store = JsonFileStore::open("/var/lib/timed-cover")?;
/// store.save(Position::new(40).unwrap())?;
/// assert_eq!(store.load()?, Some(Position::new(40).unwrap()));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct JsonFileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles.
    lock: Mutex<()>,
}

impl JsonFileStore {
    /// Opens a store in `dir`, creating the directory if needed.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Io` if the directory cannot be created.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self, StoreError> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        let path = dir.join(FILE_NAME);
        tracing::debug!(path = %path.display(), "Opened position store");
        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }

    /// Opens a store in the platform data directory.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::NoPersistPath` if no data directory is known,
    /// plus the errors of [`JsonFileStore::open`].
    pub fn open_default() -> Result<Self, StoreError> {
        let dir = Self::default_dir().ok_or(StoreError::NoPersistPath)?;
        Self::open(dir)
    }

    /// Returns the platform default persistence directory.
    #[must_use]
    pub fn default_dir() -> Option<PathBuf> {
        dirs::data_dir().map(|mut path| {
            path.push(APP_DIR);
            path
        })
    }

    /// Returns the document path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_document(&self) -> Result<Map<String, Value>, StoreError> {
        match fs::read_to_string(&self.path) {
            Ok(contents) if contents.trim().is_empty() => Ok(Map::new()),
            Ok(contents) => Ok(serde_json::from_str(&contents)?),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(Map::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn write_document(&self, document: &Map<String, Value>) -> Result<(), StoreError> {
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_string_pretty(document)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl PositionStore for JsonFileStore {
    fn load(&self) -> Result<Option<Position>, StoreError> {
        let _guard = self.lock.lock();
        let document = self.read_document()?;
        match document.get(POSITION_KEY) {
            None | Some(Value::Null) => Ok(None),
            Some(value) => {
                let position: Position = serde_json::from_value(value.clone())?;
                Ok(Some(position))
            }
        }
    }

    fn save(&self, position: Position) -> Result<(), StoreError> {
        let _guard = self.lock.lock();
        let mut document = self.read_document()?;
        document.insert(POSITION_KEY.to_string(), Value::from(position.value()));
        self.write_document(&document)?;
        tracing::debug!(%position, path = %self.path.display(), "Persisted position");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_from_empty_directory_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn save_then_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = JsonFileStore::open(dir.path()).unwrap();
            store.save(Position::new(63).unwrap()).unwrap();
        }
        let store = JsonFileStore::open(dir.path()).unwrap();
        assert_eq!(store.load().unwrap(), Some(Position::new(63).unwrap()));
    }

    #[test]
    fn open_creates_nested_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = JsonFileStore::open(&nested).unwrap();
        store.save(Position::OPEN).unwrap();
        assert!(nested.join(FILE_NAME).exists());
    }

    #[test]
    fn save_preserves_other_keys() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(FILE_NAME), r#"{ "other": "kept" }"#).unwrap();

        let store = JsonFileStore::open(dir.path()).unwrap();
        store.save(Position::CLOSED).unwrap();

        let contents = fs::read_to_string(store.path()).unwrap();
        let document: Map<String, Value> = serde_json::from_str(&contents).unwrap();
        assert_eq!(document["other"], Value::from("kept"));
        assert_eq!(document[POSITION_KEY], Value::from(0));
    }

    #[test]
    fn out_of_range_value_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join(FILE_NAME),
            format!(r#"{{ "{POSITION_KEY}": 250 }}"#),
        )
        .unwrap();

        let store = JsonFileStore::open(dir.path()).unwrap();
        assert!(matches!(
            store.load(),
            Err(StoreError::Serialization(_))
        ));
    }

    #[test]
    fn corrupt_document_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(FILE_NAME), "not json").unwrap();
        let store = JsonFileStore::open(dir.path()).unwrap();
        assert!(store.load().is_err());
    }

    #[test]
    fn default_dir_ends_with_app_dir() {
        if let Some(dir) = JsonFileStore::default_dir() {
            assert!(dir.ends_with(APP_DIR));
        }
    }
}
