//! Storage engine trait definition.
//!
//! The `ContactStorage` trait defines the interface that all storage
//! backends must implement. This abstraction keeps the contact store and
//! the edit-session controller independent of the concrete backend.

use tokio::sync::watch;

use super::types::{BookMetadata, Contact, ContactId, ContactOrder, NewContact};
use crate::error::Result;

/// Storage backend interface for durable contact storage.
///
/// All implementations must ensure:
/// - Ids are assigned by the backend and stable for the record's lifetime
/// - Writes are serialized against a single underlying table
/// - Ordered queries use a case-sensitive ordinal compare, with the
///   backend-assigned id as tie-breaker
pub trait ContactStorage: Send + Sync {
    /// Insert a new contact.
    ///
    /// # Returns
    ///
    /// Returns the persisted record with its backend-assigned id.
    ///
    /// # Errors
    ///
    /// Returns `RolodexError::Storage` if the write fails.
    fn insert(&self, contact: &NewContact) -> Result<Contact>;

    /// Insert-or-replace a contact keyed by its id.
    ///
    /// Fully replaces the existing record with the same id, or inserts the
    /// record under that id if none exists.
    fn upsert(&self, contact: &Contact) -> Result<Contact>;

    /// Delete a contact by id.
    ///
    /// Idempotent: deleting an id that no longer exists is a no-op, not an
    /// error.
    fn delete(&self, id: ContactId) -> Result<()>;

    /// Number of stored contacts.
    fn count(&self) -> Result<u64>;

    /// Insert the given contacts only if the book is currently empty.
    ///
    /// The emptiness check and the inserts run in a single transaction, so
    /// two racing activations cannot both seed.
    ///
    /// # Returns
    ///
    /// Returns `true` if the contacts were inserted, `false` if the book
    /// already had records.
    fn seed_if_empty(&self, contacts: &[NewContact]) -> Result<bool>;

    /// Subscribe to the full ordered snapshot for one sort field.
    ///
    /// The receiver holds a current snapshot immediately and observes a new
    /// full snapshot after every write. Dropping all receivers suspends
    /// publication for that ordering until someone subscribes again.
    fn observe_ordered_by(&self, order: ContactOrder) -> watch::Receiver<Vec<Contact>>;

    /// Get address book metadata.
    fn metadata(&self) -> Result<BookMetadata>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trait_is_object_safe() {
        fn _accepts_storage(_storage: &dyn ContactStorage) {}
    }
}
