//! File-system side of the Staffline client: paths, configuration and the
//! durable storage scope.

pub mod config_service;
pub mod paths;
pub mod storage;

pub use crate::config_service::{ConfigOverrides, ConfigService};
pub use crate::paths::StafflinePaths;
pub use crate::storage::FileScope;

use staffline_core::overlay::EditOverlay;
use staffline_core::scope::MemoryScope;
use staffline_core::session::SessionStore;
use std::sync::Arc;

/// The two storage scopes of one client process.
///
/// The durable scope is `session.json` in the config directory; the tab
/// scope is created fresh and dies with the process.
#[derive(Clone)]
pub struct LocalScopes {
    pub durable: Arc<FileScope>,
    pub tab: Arc<MemoryScope>,
}

impl LocalScopes {
    pub fn open(paths: &StafflinePaths) -> Self {
        Self {
            durable: Arc::new(FileScope::new(paths.session_file())),
            tab: Arc::new(MemoryScope::new()),
        }
    }

    pub fn session_store(&self, max_age_days: u32) -> SessionStore {
        SessionStore::new(self.durable.clone(), self.tab.clone()).with_max_age_days(max_age_days)
    }

    /// Edit overlay over the tab scope.
    pub fn edit_overlay(&self) -> EditOverlay {
        EditOverlay::new(self.tab.clone())
    }
}
