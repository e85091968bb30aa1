pub mod entities;
pub mod error;
pub mod field_value;
pub mod identity;
pub mod ids;

pub use entities::{Config, Link, Node, NodeKind};
pub use error::CoreError;
pub use field_value::FieldValue;
pub use identity::{Identity, NaturalKey};
pub use ids::*;
