use std::path::PathBuf;

use zlogon_core::Config;
use zlogon_storage::{Column, ConfigField, SqliteStorage};

use crate::error::EngineError;

/// Key holding the SAP GUI installation directory.
pub const INSTALL_DIR_KEY: &str = "path";

pub struct Settings<'s> {
    storage: &'s SqliteStorage,
}

impl<'s> Settings<'s> {
    pub fn new(storage: &'s SqliteStorage) -> Self {
        Self { storage }
    }

    pub fn entry(&self, key: &str) -> Result<Option<Config>, EngineError> {
        Ok(self
            .storage
            .query::<Config>()
            .filter(ConfigField::Key.equals(key))
            .first()?)
    }

    pub fn get(&self, key: &str) -> Result<Option<String>, EngineError> {
        Ok(self.entry(key)?.map(|c| c.value))
    }

    /// Update the entry for `key` if there is one, insert it otherwise.
    pub fn set(&self, key: &str, value: &str) -> Result<Config, EngineError> {
        let mut entry = match self.entry(key)? {
            Some(mut existing) => {
                existing.value = value.to_string();
                existing
            }
            None => Config::new(key, value),
        };
        let mut session = self.storage.session();
        session.mark_changed(&mut entry);
        session.commit()?;
        Ok(entry)
    }

    /// `None` when unset or blank.
    pub fn install_dir(&self) -> Result<Option<PathBuf>, EngineError> {
        Ok(self
            .get(INSTALL_DIR_KEY)?
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from))
    }

    pub fn set_install_dir(&self, dir: &str) -> Result<Config, EngineError> {
        let dir = dir.trim();
        if dir.is_empty() {
            return Err(EngineError::MissingField(INSTALL_DIR_KEY));
        }
        self.set(INSTALL_DIR_KEY, dir)
    }
}
