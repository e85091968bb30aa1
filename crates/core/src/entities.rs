use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::ids::{NodeUuid, SeqId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    Folder,
    Link,
}

impl NodeKind {
    /// The one-letter flag stored in the `type` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Folder => "F",
            Self::Link => "L",
        }
    }

    pub fn parse(s: &str) -> Result<Self, CoreError> {
        match s {
            "F" => Ok(Self::Folder),
            "L" => Ok(Self::Link),
            _ => Err(CoreError::InvalidData(format!("unknown node kind: {s:?}"))),
        }
    }
}

/// One entry of the connection tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: Option<SeqId>,
    pub name: String,
    pub description: String,
    /// Display name of the containing folder. Denormalized, kept for older files.
    pub group: String,
    pub kind: NodeKind,
    pub position: i64,
    pub uuid: NodeUuid,
    pub parent: Option<NodeUuid>,
    pub expanded: bool,
}

impl Node {
    /// A transient node with a fresh UUID.
    pub fn new(kind: NodeKind, name: impl Into<String>, parent: Option<NodeUuid>) -> Self {
        Self {
            id: None,
            name: name.into(),
            description: String::new(),
            group: String::new(),
            kind,
            position: 0,
            uuid: NodeUuid::new(),
            parent,
            expanded: false,
        }
    }

    pub fn folder(name: impl Into<String>, parent: Option<NodeUuid>) -> Self {
        Self::new(NodeKind::Folder, name, parent)
    }

    pub fn link(name: impl Into<String>, parent: Option<NodeUuid>) -> Self {
        Self::new(NodeKind::Link, name, parent)
    }

    pub fn with_uuid(mut self, uuid: NodeUuid) -> Self {
        self.uuid = uuid;
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn is_folder(&self) -> bool {
        self.kind == NodeKind::Folder
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

/// Credentials of a Link-kind node. Joined to its node by `uuid`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    pub id: Option<SeqId>,
    pub uuid: NodeUuid,
    pub name: String,
    pub system: String,
    pub client: String,
    pub user: String,
    // Stored in clear text.
    #[serde(skip_serializing, default)]
    pub password: String,
    pub language: String,
}

impl Link {
    pub fn new(uuid: NodeUuid) -> Self {
        Self {
            id: None,
            uuid,
            name: String::new(),
            system: String::new(),
            client: String::new(),
            user: String::new(),
            password: String::new(),
            language: String::new(),
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

/// A key/value setting. `key` is the natural key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    pub id: Option<SeqId>,
    pub key: String,
    pub value: String,
}

impl Config {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            id: None,
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_flag_roundtrip() {
        for kind in [NodeKind::Folder, NodeKind::Link] {
            assert_eq!(NodeKind::parse(kind.as_str()).unwrap(), kind);
        }
    }

    #[test]
    fn unknown_kind_flag_is_invalid_data() {
        assert!(matches!(NodeKind::parse("X"), Err(CoreError::InvalidData(_))));
        assert!(NodeKind::parse("f").is_err());
    }

    #[test]
    fn new_node_is_transient() {
        let parent = NodeUuid::new();
        let node = Node::link("PRD-100", Some(parent));
        assert!(!node.is_persisted());
        assert!(!node.is_root());
        assert!(!node.is_folder());
        assert!(!node.expanded);
        assert_eq!(node.position, 0);
    }

    #[test]
    fn link_json_omits_password_and_reads_back() {
        let mut link = Link::new(NodeUuid::new());
        link.system = "PRD".into();
        link.password = "secret".into();

        let json = serde_json::to_string(&link).unwrap();
        assert!(!json.contains("secret"));

        let back: Link = serde_json::from_str(&json).unwrap();
        assert_eq!(back.uuid, link.uuid);
        assert_eq!(back.system, "PRD");
        assert!(back.password.is_empty());
    }
}
