use crate::entities::NodeKind;
use crate::ids::NodeUuid;

/// A value on the right-hand side of a condition, or a column value on its
/// way into storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Null,
    Text(String),
    Integer(i64),
    Boolean(bool),
    Uuid(NodeUuid),
}

impl FieldValue {
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_uuid(&self) -> Option<NodeUuid> {
        match self {
            FieldValue::Uuid(id) => Some(*id),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<&String> for FieldValue {
    fn from(value: &String) -> Self {
        FieldValue::Text(value.clone())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Integer(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Boolean(value)
    }
}

impl From<NodeUuid> for FieldValue {
    fn from(value: NodeUuid) -> Self {
        FieldValue::Uuid(value)
    }
}

impl From<NodeKind> for FieldValue {
    fn from(value: NodeKind) -> Self {
        FieldValue::Text(value.as_str().to_string())
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(FieldValue::Null, Into::into)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn none_becomes_null() {
        let value: FieldValue = None::<NodeUuid>.into();
        assert!(value.is_null());
    }

    #[test]
    fn kind_is_stored_as_its_flag() {
        assert_eq!(FieldValue::from(NodeKind::Folder).as_text(), Some("F"));
        assert_eq!(FieldValue::from(NodeKind::Link).as_text(), Some("L"));
    }

    #[test]
    fn some_uuid_keeps_its_value() {
        let id = NodeUuid::new();
        assert_eq!(FieldValue::from(Some(id)).as_uuid(), Some(id));
    }
}
