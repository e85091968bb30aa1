//! Unit of work over the store.
//!
//! Every change reaches storage through `Session::mark_changed`, whether the
//! entity was just constructed or was read, mutated, and handed back. Commit
//! inserts entities without a sequence id and updates the rest.
//!
//! The session holds an exclusive borrow of each marked entity until commit,
//! so the same in-memory object cannot be marked twice. Two distinct objects
//! with equal content are two entries and produce two inserts.
//!
//! Commit writes one entity at a time, each on its own connection. If an
//! entity fails, commit stops there: entities before it stay written and
//! entities after it are not attempted.

use tracing::debug;
use zlogon_core::SeqId;

use crate::error::StorageError;
use crate::sqlite::{Saved, SqliteStorage};
use crate::traits::Entity;

/// Object-safe view of an entity the session can write.
pub trait Persist {
    fn persist(&mut self, storage: &SqliteStorage) -> Result<Saved, StorageError>;

    fn table(&self) -> &'static str;
}

impl<E: Entity> Persist for E {
    fn persist(&mut self, storage: &SqliteStorage) -> Result<Saved, StorageError> {
        storage.save(self)
    }

    fn table(&self) -> &'static str {
        E::TABLE
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitSummary {
    pub inserted: Vec<SeqId>,
    pub updated: usize,
}

impl CommitSummary {
    pub fn total(&self) -> usize {
        self.inserted.len() + self.updated
    }
}

pub struct Session<'s, 'e> {
    storage: &'s SqliteStorage,
    pending: Vec<&'e mut dyn Persist>,
}

impl<'s, 'e> Session<'s, 'e> {
    pub fn new(storage: &'s SqliteStorage) -> Self {
        Self {
            storage,
            pending: Vec::new(),
        }
    }

    /// Register a new or modified entity for the next commit.
    pub fn mark_changed<E: Entity>(&mut self, entity: &'e mut E) -> &mut Self {
        self.pending.push(entity);
        self
    }

    pub fn mark_all<E: Entity>(&mut self, entities: impl IntoIterator<Item = &'e mut E>) -> &mut Self
    where
        E: 'e,
    {
        for entity in entities {
            self.pending.push(entity);
        }
        self
    }

    pub(crate) fn len(&self) -> usize {
        self.pending.len()
    }

    /// Write every marked entity in the order it was marked.
    pub fn commit(self) -> Result<CommitSummary, StorageError> {
        let mut summary = CommitSummary::default();
        for entity in self.pending {
            match entity.persist(self.storage)? {
                Saved::Inserted(id) => {
                    debug!(table = entity.table(), id = id.get(), "inserted");
                    summary.inserted.push(id);
                }
                Saved::Updated => {
                    debug!(table = entity.table(), "updated");
                    summary.updated += 1;
                }
            }
        }
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeField;
    use crate::traits::Column;
    use zlogon_core::{Config, Link, Node};

    fn storage() -> (tempfile::TempDir, SqliteStorage) {
        let dir = tempfile::tempdir().unwrap();
        let storage = SqliteStorage::open(dir.path().join("zlogon.db")).unwrap();
        (dir, storage)
    }

    #[test]
    fn unmarked_entities_are_ignored() {
        let (_dir, storage) = storage();
        let mut marked = Node::folder("A", None);
        let untouched = Node::folder("B", None);

        let mut session = storage.session();
        session.mark_changed(&mut marked);
        session.commit().unwrap();

        assert!(marked.id.is_some());
        assert!(untouched.id.is_none());
        assert_eq!(storage.query::<Node>().count().unwrap(), 1);
    }

    #[test]
    fn mixed_kinds_commit_in_one_session() {
        let (_dir, storage) = storage();
        let mut node = Node::link("PRD-100", None);
        let mut link = Link::new(node.uuid);
        let mut config = Config::new("path", "C:\\SAP");

        let mut session = storage.session();
        session
            .mark_changed(&mut node)
            .mark_changed(&mut link)
            .mark_changed(&mut config);
        assert_eq!(session.len(), 3);
        let summary = session.commit().unwrap();

        assert_eq!(summary.inserted.len(), 3);
        assert_eq!(summary.updated, 0);
        assert!(node.id.is_some() && link.id.is_some() && config.id.is_some());
    }

    #[test]
    fn equal_content_in_two_objects_inserts_twice() {
        let (_dir, storage) = storage();
        let mut a = Node::folder("A", None);
        let mut b = a.clone().with_uuid(zlogon_core::NodeUuid::new());

        let mut session = storage.session();
        session.mark_changed(&mut a).mark_changed(&mut b);
        session.commit().unwrap();

        let rows = storage
            .query::<Node>()
            .filter(NodeField::Name.equals("A"))
            .all()
            .unwrap();
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn failure_keeps_earlier_writes() {
        let (_dir, storage) = storage();
        let mut first = Node::folder("first", None);
        let mut clash = Node::folder("clash", None);
        let mut duplicate = clash.clone();
        let mut never = Node::folder("never", None);

        let mut session = storage.session();
        session
            .mark_changed(&mut first)
            .mark_changed(&mut clash)
            .mark_changed(&mut duplicate)
            .mark_changed(&mut never);
        let err = session.commit().unwrap_err();

        assert!(err.is_constraint_violation());
        assert!(first.id.is_some());
        assert!(clash.id.is_some());
        assert!(duplicate.id.is_none());
        assert!(never.id.is_none());
        assert_eq!(storage.query::<Node>().count().unwrap(), 2);
    }

    #[test]
    fn mark_all_registers_each_entity() {
        let (_dir, storage) = storage();
        let mut nodes = vec![Node::folder("A", None), Node::folder("B", None)];

        let mut session = storage.session();
        session.mark_all(nodes.iter_mut());
        assert_eq!(session.commit().unwrap().total(), 2);
        assert!(nodes.iter().all(|n| n.id.is_some()));
    }
}
