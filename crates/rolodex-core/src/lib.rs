//! # Rolodex Core
//!
//! Core library for Rolodex - a single-user, locally persisted contact
//! book with a sorted, editable live list.
//!
//! This crate provides the domain logic, storage abstractions, and data
//! models independent of the CLI interface.
//!
//! ## Architecture
//!
//! - **storage**: Storage backend trait, SQLite implementation, and the
//!   ordered live queries
//! - **store**: Contact store - the single source of truth for the sorted
//!   contact collection, with subscribe-on-demand live views and a
//!   fire-and-forget write worker
//! - **edit**: Edit-session controller for the at-most-one inline editor

pub mod edit;
pub mod error;
pub mod storage;
pub mod store;

pub use edit::{DraftField, EditSession, EditState};
pub use error::{Result, RolodexError};
pub use storage::{Contact, ContactId, ContactOrder, ContactStorage, NewContact, SqliteStorage};
pub use store::{ContactStore, LiveContacts};

/// Core version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }
}
