//! Test support: a store on a throwaway directory plus shortcuts for the
//! records most tests start from.

use std::path::{Path, PathBuf};

use tempfile::TempDir;
use zlogon_core::{Link, Node, NodeUuid};
use zlogon_engine::{Engine, EngineError, FolderDraft, LinkDraft};
use zlogon_storage::{SqliteStorage, StorageError};

pub struct TestStore {
    pub storage: SqliteStorage,
    // Removes the database file on drop.
    dir: TempDir,
}

impl TestStore {
    pub fn new() -> Result<Self, StorageError> {
        let dir = tempfile::tempdir().map_err(|source| StorageError::Unavailable {
            path: std::env::temp_dir(),
            source,
        })?;
        let storage = SqliteStorage::open(dir.path().join("zlogon.db"))?;
        Ok(Self { storage, dir })
    }

    pub fn dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn db_path(&self) -> PathBuf {
        self.storage.path().to_path_buf()
    }

    pub fn engine(&self) -> Engine {
        Engine::new(self.storage.clone())
    }

    /// Commit a folder node directly through a session.
    pub fn folder(&self, name: &str, parent: Option<NodeUuid>) -> Result<Node, StorageError> {
        let mut node = Node::folder(name, parent);
        let mut session = self.storage.session();
        session.mark_changed(&mut node);
        session.commit()?;
        Ok(node)
    }

    /// Commit a link node and its credentials record.
    pub fn link(
        &self,
        name: &str,
        parent: Option<NodeUuid>,
        system: &str,
    ) -> Result<(Node, Link), StorageError> {
        let mut node = Node::link(name, parent);
        let mut link = Link::new(node.uuid);
        link.name = name.to_string();
        link.system = system.to_string();
        link.client = "100".to_string();
        link.user = "alice".to_string();
        link.password = "secret".to_string();
        link.language = "EN".to_string();

        let mut session = self.storage.session();
        session.mark_changed(&mut node).mark_changed(&mut link);
        session.commit()?;
        Ok((node, link))
    }
}

pub fn folder_draft(name: &str) -> FolderDraft {
    FolderDraft::new(name)
}

pub fn link_draft(system: &str, client: &str) -> LinkDraft {
    LinkDraft {
        system: system.to_string(),
        client: client.to_string(),
        user: "alice".to_string(),
        password: "secret".to_string(),
        language: "EN".to_string(),
        ..LinkDraft::default()
    }
}

/// Add a folder through the engine, as the UI would.
pub fn add_folder(
    engine: &Engine,
    name: &str,
    parent: Option<NodeUuid>,
) -> Result<Node, EngineError> {
    engine.tree().add_folder(&folder_draft(name), parent)
}
