//! Folder/link tree operations on top of the store.
//!
//! Names are unique per parent. Storage does not enforce this; every add and
//! edit here checks it with a query before committing.

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, info};
use zlogon_core::{Link, Node, NodeKind, NodeUuid};
use zlogon_storage::{Column, LinkField, NodeField, SqliteStorage};

use crate::error::EngineError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FolderDraft {
    pub name: String,
    pub description: String,
}

impl FolderDraft {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
        }
    }

    fn normalized(&self) -> Result<Self, EngineError> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err(EngineError::MissingField("name"));
        }
        Ok(Self {
            name: name.to_string(),
            description: self.description.trim().to_string(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkDraft {
    /// Defaults to `{system}-{client}` when blank.
    pub name: String,
    pub description: String,
    pub system: String,
    pub client: String,
    pub user: String,
    pub password: String,
    pub language: String,
}

impl LinkDraft {
    fn normalized(&self) -> Result<Self, EngineError> {
        let trimmed = |s: &str| s.trim().to_string();
        let mut draft = Self {
            name: trimmed(&self.name),
            description: trimmed(&self.description),
            system: trimmed(&self.system),
            client: trimmed(&self.client),
            user: trimmed(&self.user),
            password: trimmed(&self.password),
            language: trimmed(&self.language),
        };
        for (field, value) in [
            ("system", &draft.system),
            ("client", &draft.client),
            ("user", &draft.user),
            ("password", &draft.password),
            ("language", &draft.language),
        ] {
            if value.is_empty() {
                return Err(EngineError::MissingField(field));
            }
        }
        if draft.name.is_empty() {
            draft.name = format!("{}-{}", draft.system, draft.client);
        }
        Ok(draft)
    }

    fn apply_to(&self, link: &mut Link) {
        link.name = self.name.clone();
        link.system = self.system.clone();
        link.client = self.client.clone();
        link.user = self.user.clone();
        link.password = self.password.clone();
        link.language = self.language.clone();
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TreeEntry {
    pub node: Node,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeEntry>,
}

pub struct TreeService<'s> {
    storage: &'s SqliteStorage,
}

impl<'s> TreeService<'s> {
    pub fn new(storage: &'s SqliteStorage) -> Self {
        Self { storage }
    }

    /// Folders by name, then links by name.
    pub fn children(&self, parent: Option<NodeUuid>) -> Result<Vec<Node>, EngineError> {
        let mut nodes = self.children_of_kind(parent, NodeKind::Folder)?;
        nodes.extend(self.children_of_kind(parent, NodeKind::Link)?);
        Ok(nodes)
    }

    fn children_of_kind(
        &self,
        parent: Option<NodeUuid>,
        kind: NodeKind,
    ) -> Result<Vec<Node>, EngineError> {
        Ok(self
            .storage
            .query::<Node>()
            .filter(NodeField::Kind.equals(kind))
            .filter(NodeField::Parent.equals(parent))
            .order_by(NodeField::Name)
            .all()?)
    }

    pub fn tree(&self) -> Result<Vec<TreeEntry>, EngineError> {
        self.subtree(None, &mut HashSet::new())
    }

    fn subtree(
        &self,
        parent: Option<NodeUuid>,
        seen: &mut HashSet<NodeUuid>,
    ) -> Result<Vec<TreeEntry>, EngineError> {
        self.children(parent)?
            .into_iter()
            .map(|node| {
                let children = if node.is_folder() {
                    if !seen.insert(node.uuid) {
                        return Err(EngineError::Cycle(node.uuid));
                    }
                    self.subtree(Some(node.uuid), seen)?
                } else {
                    Vec::new()
                };
                Ok(TreeEntry { node, children })
            })
            .collect()
    }

    pub fn folders(&self) -> Result<Vec<Node>, EngineError> {
        Ok(self
            .storage
            .query::<Node>()
            .filter(NodeField::Kind.equals(NodeKind::Folder))
            .order_by(NodeField::Name)
            .all()?)
    }

    pub fn get(&self, uuid: NodeUuid) -> Result<Option<Node>, EngineError> {
        Ok(self
            .storage
            .query::<Node>()
            .filter(NodeField::Uuid.equals(uuid))
            .first()?)
    }

    pub fn require(&self, uuid: NodeUuid) -> Result<Node, EngineError> {
        self.get(uuid)?.ok_or(EngineError::NodeNotFound(uuid))
    }

    pub fn link(&self, uuid: NodeUuid) -> Result<Option<Link>, EngineError> {
        Ok(self
            .storage
            .query::<Link>()
            .filter(LinkField::Uuid.equals(uuid))
            .first()?)
    }

    pub fn add_folder(
        &self,
        draft: &FolderDraft,
        parent: Option<NodeUuid>,
    ) -> Result<Node, EngineError> {
        let draft = draft.normalized()?;
        self.require_folder(parent)?;
        self.ensure_unique_name(parent, &draft.name, None)?;

        let mut node = Node::folder(&draft.name, parent).with_description(&draft.description);
        let mut session = self.storage.session();
        session.mark_changed(&mut node);
        session.commit()?;
        info!(uuid = %node.uuid, name = %node.name, "added folder");
        Ok(node)
    }

    pub fn add_link(
        &self,
        draft: &LinkDraft,
        parent: Option<NodeUuid>,
    ) -> Result<(Node, Link), EngineError> {
        let draft = draft.normalized()?;
        let folder = self.require_folder(parent)?;
        self.ensure_unique_name(parent, &draft.name, None)?;

        let mut node = Node::link(&draft.name, parent)
            .with_description(&draft.description)
            .with_group(folder.map(|f| f.name).unwrap_or_default());
        let mut link = Link::new(node.uuid);
        draft.apply_to(&mut link);

        let mut session = self.storage.session();
        session.mark_changed(&mut node).mark_changed(&mut link);
        session.commit()?;
        info!(uuid = %node.uuid, name = %node.name, "added link");
        Ok((node, link))
    }

    pub fn update_folder(&self, uuid: NodeUuid, draft: &FolderDraft) -> Result<Node, EngineError> {
        let draft = draft.normalized()?;
        let mut node = self.require(uuid)?;
        if !node.is_folder() {
            return Err(EngineError::NotAFolder(uuid));
        }
        self.ensure_unique_name(node.parent, &draft.name, Some(uuid))?;

        node.name = draft.name;
        node.description = draft.description;
        let mut session = self.storage.session();
        session.mark_changed(&mut node);
        session.commit()?;
        Ok(node)
    }

    /// Edit a link's node and credentials, moving it under `parent`.
    pub fn update_link(
        &self,
        uuid: NodeUuid,
        draft: &LinkDraft,
        parent: Option<NodeUuid>,
    ) -> Result<(Node, Link), EngineError> {
        let draft = draft.normalized()?;
        let mut node = self.require(uuid)?;
        if node.is_folder() {
            return Err(EngineError::NotALink(uuid));
        }
        let mut link = self.link(uuid)?.ok_or(EngineError::LinkMissing(uuid))?;
        let folder = self.require_folder(parent)?;
        self.ensure_unique_name(parent, &draft.name, Some(uuid))?;

        node.name = draft.name.clone();
        node.description = draft.description.clone();
        node.group = folder.map(|f| f.name).unwrap_or_default();
        node.parent = parent;
        draft.apply_to(&mut link);

        let mut session = self.storage.session();
        session.mark_changed(&mut node).mark_changed(&mut link);
        session.commit()?;
        Ok((node, link))
    }

    /// Persist a folder's expanded state. Links and unknown nodes are ignored.
    /// Returns whether anything was written.
    pub fn set_expanded(&self, uuid: NodeUuid, expanded: bool) -> Result<bool, EngineError> {
        let Some(mut node) = self.get(uuid)? else {
            return Ok(false);
        };
        if !node.is_folder() || node.expanded == expanded {
            return Ok(false);
        }
        node.expanded = expanded;
        let mut session = self.storage.session();
        session.mark_changed(&mut node);
        session.commit()?;
        Ok(true)
    }

    /// Delete a node. Folders take their whole subtree with them, links their
    /// credentials record. Returns the number of node rows removed.
    pub fn delete(&self, uuid: NodeUuid) -> Result<usize, EngineError> {
        let node = self.require(uuid)?;
        let removed = self.delete_node(&node)?;
        info!(uuid = %uuid, removed, "deleted");
        Ok(removed)
    }

    // The deletes below are independent statements; a failure part way leaves
    // the earlier ones applied. Folder subtrees are collected before the first
    // delete, so a parent cycle fails without removing anything.
    fn delete_node(&self, node: &Node) -> Result<usize, EngineError> {
        match node.kind {
            NodeKind::Link => {
                let removed = self
                    .storage
                    .query::<Node>()
                    .filter(NodeField::Uuid.equals(node.uuid))
                    .delete()?;
                self.storage
                    .query::<Link>()
                    .filter(LinkField::Uuid.equals(node.uuid))
                    .delete()?;
                Ok(removed)
            }
            NodeKind::Folder => {
                let mut folders = Vec::new();
                self.collect_folders(node, &mut HashSet::new(), &mut folders)?;

                let mut removed = 0;
                for folder in &folders {
                    for link in self.children_of_kind(Some(folder.uuid), NodeKind::Link)? {
                        self.storage
                            .query::<Link>()
                            .filter(LinkField::Uuid.equals(link.uuid))
                            .delete()?;
                    }
                    removed += self
                        .storage
                        .query::<Node>()
                        .filter(NodeField::Parent.equals(folder.uuid))
                        .delete()?;
                    removed += self
                        .storage
                        .query::<Node>()
                        .filter(NodeField::Uuid.equals(folder.uuid))
                        .delete()?;
                }
                debug!(uuid = %node.uuid, removed, "deleted folder subtree");
                Ok(removed)
            }
        }
    }

    /// `folder` and every folder below it, deepest first.
    fn collect_folders(
        &self,
        folder: &Node,
        seen: &mut HashSet<NodeUuid>,
        out: &mut Vec<Node>,
    ) -> Result<(), EngineError> {
        if !seen.insert(folder.uuid) {
            return Err(EngineError::Cycle(folder.uuid));
        }
        for child in self.children_of_kind(Some(folder.uuid), NodeKind::Folder)? {
            self.collect_folders(&child, seen, out)?;
        }
        out.push(folder.clone());
        Ok(())
    }

    fn require_folder(&self, parent: Option<NodeUuid>) -> Result<Option<Node>, EngineError> {
        let Some(uuid) = parent else {
            return Ok(None);
        };
        let node = self.require(uuid)?;
        if !node.is_folder() {
            return Err(EngineError::NotAFolder(uuid));
        }
        Ok(Some(node))
    }

    fn ensure_unique_name(
        &self,
        parent: Option<NodeUuid>,
        name: &str,
        exclude: Option<NodeUuid>,
    ) -> Result<(), EngineError> {
        let mut query = self
            .storage
            .query::<Node>()
            .filter(NodeField::Parent.equals(parent))
            .filter(NodeField::Name.equals(name));
        if let Some(uuid) = exclude {
            query = query.filter(NodeField::Uuid.not_equals(uuid));
        }
        if query.first()?.is_some() {
            return Err(EngineError::DuplicateName {
                name: name.to_string(),
                parent,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> LinkDraft {
        LinkDraft {
            system: " PRD ".into(),
            client: "100".into(),
            user: "alice".into(),
            password: "secret".into(),
            language: "EN".into(),
            ..LinkDraft::default()
        }
    }

    #[test]
    fn blank_link_name_defaults_to_system_and_client() {
        let normalized = draft().normalized().unwrap();
        assert_eq!(normalized.name, "PRD-100");
        assert_eq!(normalized.system, "PRD");
    }

    #[test]
    fn first_missing_field_is_reported() {
        let mut d = draft();
        d.client.clear();
        d.password = "   ".into();
        assert!(matches!(
            d.normalized(),
            Err(EngineError::MissingField("client"))
        ));
    }

    #[test]
    fn folder_name_is_required() {
        assert!(matches!(
            FolderDraft::new("  ").normalized(),
            Err(EngineError::MissingField("name"))
        ));
    }
}
