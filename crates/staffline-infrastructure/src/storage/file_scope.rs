//! File-backed durable scope.

use super::atomic_json::{AtomicJsonError, AtomicJsonFile};
use staffline_core::scope::ScopeStorage;
use staffline_core::{Result, StafflineError};
use std::collections::BTreeMap;
use std::path::PathBuf;

type Items = BTreeMap<String, String>;

/// Durable scope stored as one flat JSON object of string values.
///
/// Every mutation is a locked read-modify-write of the whole file, so two
/// processes sharing the config directory never lose each other's keys.
pub struct FileScope {
    file: AtomicJsonFile<Items>,
}

impl FileScope {
    pub fn new(path: PathBuf) -> Self {
        Self {
            file: AtomicJsonFile::new(path),
        }
    }

    fn read(&self) -> Result<Items> {
        Ok(self.file.load().map_err(to_storage_error)?.unwrap_or_default())
    }

    fn update<R>(&self, f: impl FnOnce(&mut Items) -> R) -> Result<R> {
        self.file
            .update(Items::new(), f)
            .map_err(to_storage_error)
    }
}

fn to_storage_error(err: AtomicJsonError) -> StafflineError {
    StafflineError::storage(err.to_string())
}

impl ScopeStorage for FileScope {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read()?.get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.update(|items| {
            items.insert(key.to_string(), value.to_string());
        })
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        if !self.file.path().exists() {
            return Ok(());
        }
        self.update(|items| {
            items.remove(key);
        })
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.read()?.into_keys().collect())
    }

    fn set_items(&self, entries: &[(&str, String)]) -> Result<()> {
        self.update(|items| {
            for (key, value) in entries {
                items.insert((*key).to_string(), value.clone());
            }
        })
    }

    fn remove_items(&self, keys: &[&str]) -> Result<()> {
        if !self.file.path().exists() {
            return Ok(());
        }
        self.update(|items| {
            for key in keys {
                items.remove(*key);
            }
        })
    }
}
