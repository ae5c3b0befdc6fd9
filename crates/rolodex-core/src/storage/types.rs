//! Core data types for the storage layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier for a persisted contact.
///
/// Assigned by the storage backend on first persist (SQLite rowid) and
/// stable for the lifetime of the record. Ids of deleted contacts may be
/// reused by the backend and must not be relied upon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContactId(pub i64);

impl std::fmt::Display for ContactId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A persisted contact.
///
/// Contacts are immutable value records: any edit produces a new record
/// with the same `id` that fully replaces the old one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    /// Backend-assigned identifier
    pub id: ContactId,

    /// First name (non-empty after trim)
    pub first_name: String,

    /// Last name (may be empty)
    pub last_name: String,

    /// Phone number (non-empty after trim, no format validation)
    pub phone: String,
}

impl Contact {
    /// Replacement record with new first name and phone, everything else kept.
    pub fn with_fields(&self, first_name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            id: self.id,
            first_name: first_name.into(),
            last_name: self.last_name.clone(),
            phone: phone.into(),
        }
    }
}

/// Builder for a contact that has not been persisted yet.
///
/// The backend assigns the id on insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContact {
    /// First name
    pub first_name: String,

    /// Last name (defaults to empty)
    pub last_name: String,

    /// Phone number
    pub phone: String,
}

impl NewContact {
    pub fn new(first_name: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: String::new(),
            phone: phone.into(),
        }
    }

    pub fn with_last_name(mut self, last_name: impl Into<String>) -> Self {
        self.last_name = last_name.into();
        self
    }
}

/// Sort field for ordered live queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactOrder {
    FirstName,
    LastName,
    Phone,
}

impl ContactOrder {
    /// Column name used in ORDER BY clauses.
    pub(crate) fn column(self) -> &'static str {
        match self {
            ContactOrder::FirstName => "first_name",
            ContactOrder::LastName => "last_name",
            ContactOrder::Phone => "phone",
        }
    }
}

/// Metadata for an address book.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookMetadata {
    /// Format version (e.g., "0.1")
    pub format_version: String,

    /// When this address book was created
    pub created_at: DateTime<Utc>,

    /// Last modification timestamp (informational)
    pub last_modified: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_contact_builder() {
        let contact = NewContact::new("Alex Johnson", "262-555-1234").with_last_name("Johnson");

        assert_eq!(contact.first_name, "Alex Johnson");
        assert_eq!(contact.last_name, "Johnson");
        assert_eq!(contact.phone, "262-555-1234");
    }

    #[test]
    fn test_new_contact_defaults_empty_last_name() {
        let contact = NewContact::new("Jamie Doe", "262-555-5678");
        assert!(contact.last_name.is_empty());
    }

    #[test]
    fn test_with_fields_keeps_id_and_last_name() {
        let contact = Contact {
            id: ContactId(7),
            first_name: "Alex".to_string(),
            last_name: "Johnson".to_string(),
            phone: "262-555-1234".to_string(),
        };

        let replaced = contact.with_fields("Alexis", "262-555-0000");
        assert_eq!(replaced.id, ContactId(7));
        assert_eq!(replaced.first_name, "Alexis");
        assert_eq!(replaced.last_name, "Johnson");
        assert_eq!(replaced.phone, "262-555-0000");
    }
}
