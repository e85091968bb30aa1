//! Equality conditions against named entity fields.
//!
//! Conditions handed to one filter are AND-combined in the order given. There
//! is no OR and no grouping.

use rusqlite::types::Value;
use tracing::warn;
use zlogon_core::FieldValue;

use crate::traits::Column;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Eq,
    Ne,
}

impl Op {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Ne => "!=",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Condition<F> {
    field: Option<F>,
    op: Op,
    value: FieldValue,
}

impl<F: Column> Condition<F> {
    /// A condition without a field renders to nothing and is skipped.
    pub fn new(field: Option<F>, op: Op, value: FieldValue) -> Self {
        Self { field, op, value }
    }

    /// SQL fragment for this condition, plus the bound value if it needs one.
    /// `placeholder` is the 1-based parameter index the value would take.
    pub(crate) fn render(&self, placeholder: usize) -> Option<(String, Option<Value>)> {
        let Some(field) = self.field else {
            warn!(op = ?self.op, "dropping condition without a field reference");
            return None;
        };
        let column = quote_ident(field.column());
        let fragment = match (self.op, &self.value) {
            (Op::Eq, FieldValue::Null) => (format!("{column} IS NULL"), None),
            (Op::Ne, FieldValue::Null) => (format!("{column} IS NOT NULL"), None),
            (op, value) => (
                format!("{column} {} ?{placeholder}", op.as_sql()),
                Some(to_sql_value(value)),
            ),
        };
        Some(fragment)
    }
}

/// Double-quote an identifier so keywords like `group` and `key` are safe.
pub(crate) fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// UUIDs go in as their canonical text, booleans as 0/1.
pub(crate) fn to_sql_value(value: &FieldValue) -> Value {
    match value {
        FieldValue::Null => Value::Null,
        FieldValue::Text(s) => Value::Text(s.clone()),
        FieldValue::Integer(n) => Value::Integer(*n),
        FieldValue::Boolean(b) => Value::Integer(i64::from(*b)),
        FieldValue::Uuid(id) => Value::Text(id.to_string()),
    }
}
