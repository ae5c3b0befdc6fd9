//! Storage layer: backend trait, data types, and the SQLite implementation.

mod sqlite;
mod traits;
mod types;

pub use sqlite::SqliteStorage;
pub use traits::ContactStorage;
pub use types::{BookMetadata, Contact, ContactId, ContactOrder, NewContact};
