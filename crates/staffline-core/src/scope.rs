//! Key/value storage scopes.
//!
//! The client keeps session data and unsynced edits in two scopes that
//! behave like the two tiers of browser storage:
//!
//! - the **durable** scope survives process restarts (file-backed, see
//!   `staffline-infrastructure`)
//! - the **tab** scope lives exactly as long as one client process
//!   ([`MemoryScope`])
//!
//! Both store string values under string keys.

use crate::error::Result;
use std::collections::BTreeMap;
use std::sync::Mutex;

/// A string key/value store with browser-storage semantics.
///
/// Implementations must tolerate being called from several tasks; callers
/// never assume atomicity across two calls.
pub trait ScopeStorage: Send + Sync {
    /// Returns the value stored under `key`, or `None`.
    fn get_item(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, replacing any previous value.
    fn set_item(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Removing a missing key is not an error.
    fn remove_item(&self, key: &str) -> Result<()>;

    /// Returns all keys currently stored.
    fn keys(&self) -> Result<Vec<String>>;

    /// Stores several items. File-backed scopes override this to write once.
    fn set_items(&self, items: &[(&str, String)]) -> Result<()> {
        for (key, value) in items {
            self.set_item(key, value)?;
        }
        Ok(())
    }

    /// Removes several keys. File-backed scopes override this to write once.
    fn remove_items(&self, keys: &[&str]) -> Result<()> {
        for key in keys {
            self.remove_item(key)?;
        }
        Ok(())
    }
}

/// Which tier a scope belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ScopeKind {
    Durable,
    Tab,
}

impl ScopeKind {
    /// Scope selected by the remember-me flag at login.
    pub fn for_remember_me(remember_me: bool) -> Self {
        if remember_me {
            ScopeKind::Durable
        } else {
            ScopeKind::Tab
        }
    }
}

/// In-process scope, cleared when the process exits.
#[derive(Debug, Default)]
pub struct MemoryScope {
    items: Mutex<BTreeMap<String, String>>,
}

impl MemoryScope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BTreeMap<String, String>> {
        // A poisoned map still holds valid strings.
        self.items.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ScopeStorage for MemoryScope {
    fn get_item(&self, key: &str) -> Result<Option<String>> {
        Ok(self.lock().get(key).cloned())
    }

    fn set_item(&self, key: &str, value: &str) -> Result<()> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<()> {
        self.lock().remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>> {
        Ok(self.lock().keys().cloned().collect())
    }
}
