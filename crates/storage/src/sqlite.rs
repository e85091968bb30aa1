use std::fs;
use std::path::{Path, PathBuf};

use rusqlite::types::Value;
use rusqlite::{Connection, OpenFlags, params_from_iter};
use tracing::{debug, info};
use zlogon_core::SeqId;

use crate::error::StorageError;
use crate::predicate::{quote_ident, to_sql_value};
use crate::query::Query;
use crate::session::Session;
use crate::traits::Entity;

/// Outcome of saving one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Saved {
    Inserted(SeqId),
    Updated,
}

/// Handle on the database file.
///
/// Holds only the path. Every read or write opens its own connection and
/// drops it before returning, so the handle can be shared by reference
/// freely.
#[derive(Debug, Clone)]
pub struct SqliteStorage {
    path: PathBuf,
}

impl SqliteStorage {
    /// Open the store at `path`, creating the file and its tables if the file
    /// does not exist yet. An existing file is never reset.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref().to_path_buf();
        let unavailable = |source: std::io::Error| StorageError::Unavailable {
            path: path.clone(),
            source,
        };

        if path.exists() {
            let conn = Connection::open_with_flags(&path, OpenFlags::SQLITE_OPEN_READ_WRITE)?;
            crate::schema::ensure_schema(&conn)?;
        } else {
            if let Some(dir) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(dir).map_err(unavailable)?;
            }
            fs::File::create(&path).map_err(unavailable)?;
            let conn = Connection::open(&path)?;
            crate::schema::reset_schema(&conn)?;
            info!(path = %path.display(), "created database file");
        }

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// A short-lived connection. Never creates the file.
    pub fn connect(&self) -> Result<Connection, StorageError> {
        Ok(Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?)
    }

    pub fn query<E: Entity>(&self) -> Query<'_, E> {
        Query::new(self)
    }

    pub fn session<'e>(&self) -> Session<'_, 'e> {
        Session::new(self)
    }

    pub(crate) fn fetch<E: Entity>(
        &self,
        sql: &str,
        params: Vec<Value>,
    ) -> Result<Vec<E>, StorageError> {
        debug!(sql = %sql, params = params.len(), "select");
        let conn = self.connect()?;
        let mut stmt = conn.prepare(sql)?;
        let mut rows = stmt.query(params_from_iter(params))?;
        let mut result = Vec::new();
        while let Some(row) = rows.next()? {
            result.push(E::from_row(row)?);
        }
        Ok(result)
    }

    pub(crate) fn count(&self, sql: &str, params: Vec<Value>) -> Result<u64, StorageError> {
        debug!(sql = %sql, params = params.len(), "count");
        let conn = self.connect()?;
        let count: i64 = conn.query_row(sql, params_from_iter(params), |row| row.get(0))?;
        Ok(count as u64)
    }

    pub(crate) fn execute(&self, sql: &str, params: Vec<Value>) -> Result<usize, StorageError> {
        debug!(sql = %sql, params = params.len(), "execute");
        let conn = self.connect()?;
        Ok(conn.execute(sql, params_from_iter(params))?)
    }

    /// Insert a transient entity or update a persisted one.
    pub fn save<E: Entity>(&self, entity: &mut E) -> Result<Saved, StorageError> {
        match entity.update_key().filter(|_| entity.seq_id().is_some()) {
            None => self.insert(entity).map(Saved::Inserted),
            Some(key) => {
                let columns = E::COLUMNS
                    .iter()
                    .enumerate()
                    .map(|(i, c)| format!("{} = ?{}", quote_ident(c), i + 1))
                    .collect::<Vec<_>>()
                    .join(", ");
                let sql = format!(
                    "UPDATE {} SET {columns} WHERE {} = ?{}",
                    quote_ident(E::TABLE),
                    quote_ident(key.column),
                    E::COLUMNS.len() + 1,
                );
                let mut params: Vec<Value> = entity.values().iter().map(to_sql_value).collect();
                params.push(to_sql_value(&key.value));

                debug!(sql = %sql, params = params.len(), "update");
                let conn = self.connect()?;
                let changed = conn
                    .execute(&sql, params_from_iter(params))
                    .map_err(|e| StorageError::from_write(e, E::TABLE))?;
                if changed == 0 {
                    return Err(StorageError::NotFound(format!(
                        "{} row with {} = {:?}",
                        E::TABLE,
                        key.column,
                        key.value
                    )));
                }
                Ok(Saved::Updated)
            }
        }
    }

    fn insert<E: Entity>(&self, entity: &mut E) -> Result<SeqId, StorageError> {
        let columns = E::COLUMNS
            .iter()
            .map(|c| quote_ident(c))
            .collect::<Vec<_>>()
            .join(", ");
        let placeholders = (1..=E::COLUMNS.len())
            .map(|i| format!("?{i}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!(
            "INSERT INTO {} ({columns}) VALUES ({placeholders})",
            quote_ident(E::TABLE)
        );
        let params: Vec<Value> = entity.values().iter().map(to_sql_value).collect();

        debug!(sql = %sql, params = params.len(), "insert");
        let conn = self.connect()?;
        conn.execute(&sql, params_from_iter(params))
            .map_err(|e| StorageError::from_write(e, E::TABLE))?;
        let id = SeqId::new(conn.last_insert_rowid());
        entity.assign_seq_id(id);
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use zlogon_core::{Config, Node};

    #[test]
    fn open_creates_missing_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("SAP").join("Common").join("zlogon.db");
        let storage = SqliteStorage::open(&path).unwrap();
        assert!(path.exists());
        assert_eq!(storage.path(), path.as_path());
    }

    #[test]
    fn reopening_keeps_rows() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zlogon.db");
        let storage = SqliteStorage::open(&path).unwrap();
        storage.save(&mut Config::new("path", "C:\\SAP")).unwrap();

        let reopened = SqliteStorage::open(&path).unwrap();
        let all = reopened.query::<Config>().all().unwrap();
        assert_eq!(all.len(), 1);
    }

    #[test]
    fn insert_assigns_sequence_ids_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let storage = SqliteStorage::open(dir.path().join("zlogon.db")).unwrap();
        let mut a = Node::folder("A", None);
        let mut b = Node::folder("B", None);
        let Saved::Inserted(first) = storage.save(&mut a).unwrap() else {
            panic!("expected insert");
        };
        let Saved::Inserted(second) = storage.save(&mut b).unwrap() else {
            panic!("expected insert");
        };
        assert!(first < second);
        assert_eq!(a.id, Some(first));
    }

    #[test]
    fn second_save_updates() {
        let dir = tempfile::tempdir().unwrap();
        let storage = SqliteStorage::open(dir.path().join("zlogon.db")).unwrap();
        let mut node = Node::folder("A", None);
        storage.save(&mut node).unwrap();
        node.name = "B".into();
        assert_eq!(storage.save(&mut node).unwrap(), Saved::Updated);
        assert_eq!(storage.query::<Node>().count().unwrap(), 1);
    }

    #[test]
    fn open_under_a_regular_file_is_unavailable() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, b"").unwrap();
        let path = blocker.join("sub").join("zlogon.db");

        let err = SqliteStorage::open(&path).unwrap_err();
        match err {
            StorageError::Unavailable { path: reported, .. } => assert_eq!(reported, path),
            other => panic!("expected Unavailable, got {other:?}"),
        }
    }

    #[test]
    fn reopen_turns_empty_parent_into_root() {
        use crate::model::NodeField;
        use crate::traits::Column;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zlogon.db");
        let storage = SqliteStorage::open(&path).unwrap();
        let legacy = zlogon_core::NodeUuid::new();
        storage
            .connect()
            .unwrap()
            .execute(
                "INSERT INTO node (node, type, uuid, puuid) VALUES ('Legacy', 'F', ?1, '')",
                [legacy.to_string()],
            )
            .unwrap();

        // Not yet normalised: the row is neither a root nor readable.
        assert!(matches!(
            storage.query::<Node>().all(),
            Err(StorageError::InvalidData(_))
        ));

        let reopened = SqliteStorage::open(&path).unwrap();
        let roots = reopened
            .query::<Node>()
            .filter(NodeField::Parent.equals(None::<zlogon_core::NodeUuid>))
            .all()
            .unwrap();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].uuid, legacy);
        assert!(roots[0].is_root());
        let children = reopened
            .query::<Node>()
            .filter(NodeField::Parent.not_equals(None::<zlogon_core::NodeUuid>))
            .count()
            .unwrap();
        assert_eq!(children, 0);
    }

    #[test]
    fn connect_fails_once_file_is_gone() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zlogon.db");
        let storage = SqliteStorage::open(&path).unwrap();
        std::fs::remove_file(&path).unwrap();
        assert!(storage.connect().is_err());
    }
}
