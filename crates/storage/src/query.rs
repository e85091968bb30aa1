use std::marker::PhantomData;

use rusqlite::types::Value;

use crate::error::StorageError;
use crate::predicate::{Condition, quote_ident};
use crate::sqlite::SqliteStorage;
use crate::traits::{Column, Entity};

/// A filter over one entity kind, executed with `all`, `first`, `count` or
/// `delete`.
pub struct Query<'s, E: Entity> {
    storage: &'s SqliteStorage,
    conditions: Vec<Condition<E::Field>>,
    order_by: Option<E::Field>,
    _entity: PhantomData<E>,
}

impl<'s, E: Entity> Query<'s, E> {
    pub(crate) fn new(storage: &'s SqliteStorage) -> Self {
        Self {
            storage,
            conditions: Vec::new(),
            order_by: None,
            _entity: PhantomData,
        }
    }

    pub fn filter(mut self, condition: Condition<E::Field>) -> Self {
        self.conditions.push(condition);
        self
    }

    pub fn filter_all(mut self, conditions: impl IntoIterator<Item = Condition<E::Field>>) -> Self {
        self.conditions.extend(conditions);
        self
    }

    /// Ascending order on one field. Ties keep insertion order.
    pub fn order_by(mut self, field: E::Field) -> Self {
        self.order_by = Some(field);
        self
    }

    pub fn all(&self) -> Result<Vec<E>, StorageError> {
        let (sql, params) = self.select_sql(None);
        self.storage.fetch(&sql, params)
    }

    /// The first match, or `None` when nothing matched.
    pub fn first(&self) -> Result<Option<E>, StorageError> {
        let (sql, params) = self.select_sql(Some(1));
        Ok(self.storage.fetch(&sql, params)?.into_iter().next())
    }

    pub fn count(&self) -> Result<u64, StorageError> {
        let mut sql = format!("SELECT COUNT(*) FROM {}", quote_ident(E::TABLE));
        let params = self.push_where(&mut sql);
        self.storage.count(&sql, params)
    }

    /// Delete every matching row immediately. Returns the number removed.
    pub fn delete(&self) -> Result<usize, StorageError> {
        let mut sql = format!("DELETE FROM {}", quote_ident(E::TABLE));
        let params = self.push_where(&mut sql);
        self.storage.execute(&sql, params)
    }

    pub fn to_sql(&self) -> String {
        self.select_sql(None).0
    }

    fn select_sql(&self, limit: Option<usize>) -> (String, Vec<Value>) {
        let columns = std::iter::once("id")
            .chain(E::COLUMNS.iter().copied())
            .map(quote_ident)
            .collect::<Vec<_>>()
            .join(", ");
        let mut sql = format!("SELECT {columns} FROM {}", quote_ident(E::TABLE));
        let params = self.push_where(&mut sql);
        if let Some(field) = self.order_by {
            sql.push_str(&format!(
                " ORDER BY {} ASC, \"id\" ASC",
                quote_ident(field.column())
            ));
        }
        if let Some(limit) = limit {
            sql.push_str(&format!(" LIMIT {limit}"));
        }
        (sql, params)
    }

    fn push_where(&self, sql: &mut String) -> Vec<Value> {
        let mut params = Vec::new();
        let mut first = true;
        for condition in &self.conditions {
            let Some((fragment, value)) = condition.render(params.len() + 1) else {
                continue;
            };
            sql.push_str(if first { " WHERE " } else { " AND " });
            sql.push_str(&fragment);
            params.extend(value);
            first = false;
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeField;
    use crate::predicate::Op;
    use zlogon_core::{Node, NodeKind, NodeUuid};

    fn storage() -> (tempfile::TempDir, SqliteStorage) {
        let dir = tempfile::tempdir().unwrap();
        let storage = SqliteStorage::open(dir.path().join("zlogon.db")).unwrap();
        (dir, storage)
    }

    #[test]
    fn select_without_conditions() {
        let (_dir, storage) = storage();
        assert_eq!(
            storage.query::<Node>().to_sql(),
            "SELECT \"id\", \"node\", \"desc\", \"group\", \"type\", \"position\", \"uuid\", \"puuid\", \"expanded\" FROM \"node\""
        );
    }

    #[test]
    fn conditions_chain_with_and() {
        let (_dir, storage) = storage();
        let sql = storage
            .query::<Node>()
            .filter(NodeField::Kind.equals(NodeKind::Folder))
            .filter(NodeField::Parent.equals(None::<NodeUuid>))
            .filter(NodeField::Name.not_equals("x"))
            .order_by(NodeField::Name)
            .to_sql();
        assert!(sql.ends_with(
            "WHERE \"type\" = ?1 AND \"puuid\" IS NULL AND \"node\" != ?2 ORDER BY \"node\" ASC, \"id\" ASC"
        ));
    }

    #[test]
    fn dropped_condition_keeps_numbering_dense() {
        let (_dir, storage) = storage();
        let sql = storage
            .query::<Node>()
            .filter(Condition::new(None, Op::Eq, "ignored".into()))
            .filter(NodeField::Name.equals("a"))
            .to_sql();
        assert!(sql.ends_with("FROM \"node\" WHERE \"node\" = ?1"));
    }

    #[test]
    fn first_on_empty_table_is_none() {
        let (_dir, storage) = storage();
        let found = storage
            .query::<Node>()
            .filter(NodeField::Uuid.equals(NodeUuid::new()))
            .first()
            .unwrap();
        assert!(found.is_none());
    }
}
