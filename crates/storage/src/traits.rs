use std::fmt;

use rusqlite::Row;
use zlogon_core::{FieldValue, Identity, SeqId};

use crate::error::StorageError;
use crate::predicate::{Condition, Op};

/// A named field of one entity kind.
pub trait Column: Copy + fmt::Debug {
    fn column(&self) -> &'static str;

    fn equals(self, value: impl Into<FieldValue>) -> Condition<Self> {
        Condition::new(Some(self), Op::Eq, value.into())
    }

    fn not_equals(self, value: impl Into<FieldValue>) -> Condition<Self> {
        Condition::new(Some(self), Op::Ne, value.into())
    }
}

/// Where an update lands: the row id for nodes and links, the natural key for
/// config entries.
#[derive(Debug, Clone, PartialEq)]
pub struct UpdateKey {
    pub column: &'static str,
    pub value: FieldValue,
}

/// One of the three record kinds kept in the store.
pub trait Entity: Identity + Sized {
    type Field: Column;

    const TABLE: &'static str;

    /// Persisted columns after `id`, in the order `values` returns them.
    const COLUMNS: &'static [&'static str];

    fn assign_seq_id(&mut self, id: SeqId);

    fn values(&self) -> Vec<FieldValue>;

    /// Build an entity from a row selected as `id, COLUMNS...`.
    fn from_row(row: &Row<'_>) -> Result<Self, StorageError>;

    fn update_key(&self) -> Option<UpdateKey> {
        self.seq_id().map(|id| UpdateKey {
            column: "id",
            value: FieldValue::Integer(id.get()),
        })
    }
}
