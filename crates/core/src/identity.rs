//! Entity identity.
//!
//! Two records denote the same entity when both carry a sequence id and those
//! ids match. Otherwise the natural key decides: the UUID for nodes and links,
//! the key for config entries. A record that has not been persisted yet is
//! therefore still the same entity as itself, and a freshly read copy is the
//! same entity as the record it was committed from.
//!
//! This is deliberately separate from `PartialEq`, which compares every field.

use crate::entities::{Config, Link, Node};
use crate::ids::{NodeUuid, SeqId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NaturalKey<'a> {
    Uuid(NodeUuid),
    Key(&'a str),
}

pub trait Identity {
    fn seq_id(&self) -> Option<SeqId>;

    fn natural_key(&self) -> NaturalKey<'_>;

    fn same_entity(&self, other: &Self) -> bool {
        match (self.seq_id(), other.seq_id()) {
            (Some(a), Some(b)) => a == b,
            _ => self.natural_key() == other.natural_key(),
        }
    }
}

impl Identity for Node {
    fn seq_id(&self) -> Option<SeqId> {
        self.id
    }

    fn natural_key(&self) -> NaturalKey<'_> {
        NaturalKey::Uuid(self.uuid)
    }
}

impl Identity for Link {
    fn seq_id(&self) -> Option<SeqId> {
        self.id
    }

    fn natural_key(&self) -> NaturalKey<'_> {
        NaturalKey::Uuid(self.uuid)
    }
}

impl Identity for Config {
    fn seq_id(&self) -> Option<SeqId> {
        self.id
    }

    fn natural_key(&self) -> NaturalKey<'_> {
        NaturalKey::Key(&self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transient_node_is_itself() {
        let node = Node::folder("Finance", None);
        assert!(node.same_entity(&node));
        assert!(node.same_entity(&node.clone()));
    }

    #[test]
    fn transient_nodes_with_distinct_uuids_differ() {
        let a = Node::folder("Finance", None);
        let b = Node::folder("Finance", None);
        assert!(!a.same_entity(&b));
    }

    #[test]
    fn sequence_ids_win_when_both_present() {
        let mut a = Node::folder("Finance", None);
        let mut b = a.clone().with_uuid(NodeUuid::new());
        a.id = Some(SeqId::new(7));
        b.id = Some(SeqId::new(7));
        assert!(a.same_entity(&b));

        b.id = Some(SeqId::new(8));
        b.uuid = a.uuid;
        assert!(!a.same_entity(&b));
    }

    #[test]
    fn one_sided_sequence_id_falls_back_to_uuid() {
        let transient = Node::link("PRD-100", None);
        let mut persisted = transient.clone();
        persisted.id = Some(SeqId::new(1));
        assert!(transient.same_entity(&persisted));
        assert!(persisted.same_entity(&transient));
    }

    #[test]
    fn config_identity_is_its_key() {
        let a = Config::new("path", "C:\\SAP");
        let b = Config::new("path", "D:\\SAP");
        assert!(a.same_entity(&b));
        assert!(!a.same_entity(&Config::new("other", "C:\\SAP")));
    }
}
