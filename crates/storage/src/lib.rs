pub mod error;
pub mod model;
pub mod predicate;
pub mod query;
pub mod schema;
pub mod session;
pub mod sqlite;
pub mod traits;

pub use error::StorageError;
pub use model::{ConfigField, LinkField, NodeField};
pub use predicate::{Condition, Op};
pub use query::Query;
pub use session::{CommitSummary, Persist, Session};
pub use sqlite::{Saved, SqliteStorage};
pub use traits::*;
