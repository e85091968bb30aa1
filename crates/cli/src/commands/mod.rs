pub mod config;
pub mod logon;
pub mod nodes;
pub mod tree;

use zlogon_core::NodeUuid;

pub(crate) fn parse_uuid(s: &str) -> Result<NodeUuid, zlogon_core::CoreError> {
    NodeUuid::parse_str(s)
}

pub(crate) fn parse_parent(s: Option<&str>) -> Result<Option<NodeUuid>, zlogon_core::CoreError> {
    s.map(parse_uuid).transpose()
}
