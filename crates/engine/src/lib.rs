pub mod error;
pub mod launcher;
pub mod paths;
pub mod settings;
pub mod tree;

pub use error::EngineError;
pub use launcher::{LaunchCommand, Launcher};
pub use settings::Settings;
pub use tree::{FolderDraft, LinkDraft, TreeEntry, TreeService};

use std::path::Path;

use zlogon_storage::SqliteStorage;

/// Application entry point. Owns the storage handle and hands out services
/// that borrow it.
pub struct Engine {
    storage: SqliteStorage,
}

impl Engine {
    pub fn new(storage: SqliteStorage) -> Self {
        Self { storage }
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Self, EngineError> {
        Ok(Self::new(SqliteStorage::open(path)?))
    }

    pub fn storage(&self) -> &SqliteStorage {
        &self.storage
    }

    pub fn tree(&self) -> TreeService<'_> {
        TreeService::new(&self.storage)
    }

    pub fn settings(&self) -> Settings<'_> {
        Settings::new(&self.storage)
    }

    pub fn launcher(&self) -> Launcher<'_> {
        Launcher::new(&self.storage)
    }
}
