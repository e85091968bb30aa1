use rusqlite::Row;
use zlogon_core::{Config, FieldValue, Link, Node, NodeKind, NodeUuid, SeqId};

use crate::error::StorageError;
use crate::traits::{Column, Entity, UpdateKey};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeField {
    Id,
    Name,
    Description,
    Group,
    Kind,
    Position,
    Uuid,
    Parent,
    Expanded,
}

impl Column for NodeField {
    fn column(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "node",
            Self::Description => "desc",
            Self::Group => "group",
            Self::Kind => "type",
            Self::Position => "position",
            Self::Uuid => "uuid",
            Self::Parent => "puuid",
            Self::Expanded => "expanded",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkField {
    Id,
    Uuid,
    Name,
    System,
    Client,
    User,
    Password,
    Language,
}

impl Column for LinkField {
    fn column(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Uuid => "uuid",
            Self::Name => "node",
            Self::System => "system",
            Self::Client => "client",
            Self::User => "user",
            Self::Password => "password",
            Self::Language => "language",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigField {
    Id,
    Key,
    Value,
}

impl Column for ConfigField {
    fn column(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Key => "key",
            Self::Value => "value",
        }
    }
}

fn seq_id(row: &Row<'_>) -> Result<SeqId, StorageError> {
    Ok(SeqId::new(row.get::<_, i64>(0)?))
}

fn text(row: &Row<'_>, idx: usize) -> Result<String, StorageError> {
    Ok(row.get::<_, Option<String>>(idx)?.unwrap_or_default())
}

fn uuid(row: &Row<'_>, idx: usize, table: &str) -> Result<NodeUuid, StorageError> {
    optional_uuid(row, idx)?
        .ok_or_else(|| StorageError::InvalidData(format!("{table} row without uuid")))
}

// Only NULL means "no uuid". `ensure_schema` rewrites the empty strings older
// files used for root nodes, so one showing up here is bad data.
fn optional_uuid(row: &Row<'_>, idx: usize) -> Result<Option<NodeUuid>, StorageError> {
    match row.get::<_, Option<String>>(idx)? {
        None => Ok(None),
        Some(s) if s.is_empty() => Err(StorageError::InvalidData(format!(
            "empty uuid in column {idx}"
        ))),
        Some(s) => Ok(Some(NodeUuid::parse_str(&s)?)),
    }
}

fn flag(row: &Row<'_>, idx: usize) -> Result<bool, StorageError> {
    Ok(row.get::<_, Option<i64>>(idx)?.unwrap_or(0) != 0)
}

impl Entity for Node {
    type Field = NodeField;

    const TABLE: &'static str = "node";
    const COLUMNS: &'static [&'static str] = &[
        "node", "desc", "group", "type", "position", "uuid", "puuid", "expanded",
    ];

    fn assign_seq_id(&mut self, id: SeqId) {
        self.id = Some(id);
    }

    fn values(&self) -> Vec<FieldValue> {
        vec![
            FieldValue::from(&self.name),
            FieldValue::from(&self.description),
            FieldValue::from(&self.group),
            FieldValue::from(self.kind),
            FieldValue::Integer(self.position),
            FieldValue::Uuid(self.uuid),
            FieldValue::from(self.parent),
            FieldValue::Boolean(self.expanded),
        ]
    }

    fn from_row(row: &Row<'_>) -> Result<Self, StorageError> {
        Ok(Node {
            id: Some(seq_id(row)?),
            name: text(row, 1)?,
            description: text(row, 2)?,
            group: text(row, 3)?,
            kind: NodeKind::parse(&text(row, 4)?)?,
            position: row.get::<_, Option<i64>>(5)?.unwrap_or(0),
            uuid: uuid(row, 6, Self::TABLE)?,
            parent: optional_uuid(row, 7)?,
            expanded: flag(row, 8)?,
        })
    }
}

impl Entity for Link {
    type Field = LinkField;

    const TABLE: &'static str = "link";
    const COLUMNS: &'static [&'static str] = &[
        "uuid", "node", "system", "client", "user", "password", "language",
    ];

    fn assign_seq_id(&mut self, id: SeqId) {
        self.id = Some(id);
    }

    fn values(&self) -> Vec<FieldValue> {
        vec![
            FieldValue::Uuid(self.uuid),
            FieldValue::from(&self.name),
            FieldValue::from(&self.system),
            FieldValue::from(&self.client),
            FieldValue::from(&self.user),
            FieldValue::from(&self.password),
            FieldValue::from(&self.language),
        ]
    }

    fn from_row(row: &Row<'_>) -> Result<Self, StorageError> {
        Ok(Link {
            id: Some(seq_id(row)?),
            uuid: uuid(row, 1, Self::TABLE)?,
            name: text(row, 2)?,
            system: text(row, 3)?,
            client: text(row, 4)?,
            user: text(row, 5)?,
            password: text(row, 6)?,
            language: text(row, 7)?,
        })
    }
}

impl Entity for Config {
    type Field = ConfigField;

    const TABLE: &'static str = "config";
    const COLUMNS: &'static [&'static str] = &["key", "value"];

    fn assign_seq_id(&mut self, id: SeqId) {
        self.id = Some(id);
    }

    fn values(&self) -> Vec<FieldValue> {
        vec![FieldValue::from(&self.key), FieldValue::from(&self.value)]
    }

    fn from_row(row: &Row<'_>) -> Result<Self, StorageError> {
        Ok(Config {
            id: Some(seq_id(row)?),
            key: text(row, 1)?,
            value: text(row, 2)?,
        })
    }

    fn update_key(&self) -> Option<UpdateKey> {
        Some(UpdateKey {
            column: "key",
            value: FieldValue::from(&self.key),
        })
    }
}
