use std::path::PathBuf;

use thiserror::Error;
use zlogon_core::{CoreError, NodeUuid};
use zlogon_storage::StorageError;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("core error: {0}")]
    Core(#[from] CoreError),

    #[error("node not found: {0}")]
    NodeNotFound(NodeUuid),

    #[error("node is not a folder: {0}")]
    NotAFolder(NodeUuid),

    #[error("node is not a link: {0}")]
    NotALink(NodeUuid),

    #[error("link node {0} has no credentials record")]
    LinkMissing(NodeUuid),

    #[error("folder {0} is its own ancestor")]
    Cycle(NodeUuid),

    #[error("missing required field: {0}")]
    MissingField(&'static str),

    #[error("a node named {name:?} already exists in this folder")]
    DuplicateName {
        name: String,
        parent: Option<NodeUuid>,
    },

    #[error("SAP GUI installation directory is not configured")]
    InstallDirNotConfigured,

    #[error("executable not found: {0}")]
    ExecutableMissing(PathBuf),

    #[error("system name contains a space: {0:?}")]
    InvalidSystemName(String),

    #[error("failed to start {program}: {source}")]
    Launch {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not determine the platform configuration directory")]
    NoDefaultPath,
}
