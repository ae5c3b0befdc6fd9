//! Contact store: the single source of truth for the visible, sorted
//! contact collection.
//!
//! The store bridges the backend's change notifications to a
//! synchronous-read live view, seeds default data on first activation, and
//! forwards add/update/delete intents to storage through a single write
//! worker. Writes are fire-and-forget: callers get control back before the
//! write lands, and the updated snapshot arrives through the live view.

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::error::{Result, RolodexError};
use crate::storage::{Contact, ContactId, ContactOrder, ContactStorage, NewContact};

/// How long the backend observation is kept alive after the last live-view
/// subscriber goes away. A resubscribe within the grace period reuses the
/// running observation.
pub const DEFAULT_IDLE_GRACE: Duration = Duration::from_secs(5);

/// Default contacts seeded into an empty book on first activation.
fn seed_contacts() -> Vec<NewContact> {
    vec![
        NewContact::new("Alex Johnson", "262-555-1234"),
        NewContact::new("Jamie Doe", "262-555-5678"),
    ]
}

enum WriteOp {
    Insert(NewContact),
    Upsert(Contact),
    Delete(ContactId),
}

/// Shared handle to the contact collection.
///
/// Cheap to clone; all clones feed the same write worker and live view.
/// Must be created from within a Tokio runtime.
#[derive(Clone)]
pub struct ContactStore {
    storage: Arc<dyn ContactStorage>,
    writes: mpsc::UnboundedSender<WriteOp>,
    view: Arc<SharedView>,
    idle_grace: Duration,
}

struct SharedView {
    latest: watch::Sender<Vec<Contact>>,
    state: Mutex<ViewState>,
}

#[derive(Default)]
struct ViewState {
    subscribers: usize,
    // Bumped on every subscribe; lets a stale idle timer detect that the
    // view was reactivated while it slept.
    epoch: u64,
    forwarder: Option<JoinHandle<()>>,
}

fn lock_state(state: &Mutex<ViewState>) -> MutexGuard<'_, ViewState> {
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ContactStore {
    /// Create a store over the given backend and start its write worker.
    pub fn new(storage: Arc<dyn ContactStorage>) -> Self {
        let (writes, mut rx) = mpsc::unbounded_channel::<WriteOp>();

        let worker_storage = Arc::clone(&storage);
        tokio::spawn(async move {
            while let Some(op) = rx.recv().await {
                let storage = Arc::clone(&worker_storage);
                let applied =
                    tokio::task::spawn_blocking(move || apply_write(storage.as_ref(), op)).await;
                match applied {
                    Ok(Ok(())) => {}
                    Ok(Err(e)) => warn!(error = %e, "contact write failed"),
                    Err(e) => warn!(error = %e, "contact write worker task failed"),
                }
            }
            debug!("contact write worker stopped");
        });

        Self {
            storage,
            writes,
            view: Arc::new(SharedView {
                latest: watch::channel(Vec::new()).0,
                state: Mutex::new(ViewState::default()),
            }),
            idle_grace: DEFAULT_IDLE_GRACE,
        }
    }

    /// Override the idle grace period. Intended for tests.
    pub fn with_idle_grace(mut self, grace: Duration) -> Self {
        self.idle_grace = grace;
        self
    }

    /// Subscribe to the live first-name-sorted contact list.
    ///
    /// The subscription holds a current snapshot immediately and observes a
    /// new full snapshot after every write. The first subscriber activates
    /// the underlying backend observation; once the last subscription is
    /// dropped the observation is released after the idle grace period.
    pub fn observe_contacts(&self) -> LiveContacts {
        let mut state = lock_state(&self.view.state);
        state.subscribers += 1;
        state.epoch = state.epoch.wrapping_add(1);

        if state.forwarder.is_none() {
            let backend_rx = self.storage.observe_ordered_by(ContactOrder::FirstName);
            self.view.latest.send_replace(backend_rx.borrow().clone());
            state.forwarder = Some(tokio::spawn(forward_snapshots(
                Arc::clone(&self.view),
                backend_rx,
            )));
            debug!("live contact view activated");
        }
        drop(state);

        LiveContacts {
            rx: self.view.latest.subscribe(),
            _guard: SubscriberGuard {
                view: Arc::clone(&self.view),
                idle_grace: self.idle_grace,
            },
        }
    }

    /// Seed the default contacts if the book is empty.
    ///
    /// Idempotent under concurrent activation: the emptiness check and the
    /// inserts run in one backend transaction.
    ///
    /// # Returns
    ///
    /// Returns `true` if the defaults were inserted.
    pub async fn seed_if_empty(&self) -> Result<bool> {
        let storage = Arc::clone(&self.storage);
        let seeded = tokio::task::spawn_blocking(move || storage.seed_if_empty(&seed_contacts()))
            .await
            .map_err(|e| RolodexError::Storage(format!("seed task failed: {}", e)))??;
        if seeded {
            debug!("seeded default contacts");
        }
        Ok(seeded)
    }

    /// Add a new contact. The backend assigns the id.
    ///
    /// Fields are trimmed; a blank first name or phone is rejected with
    /// `RolodexError::Validation` before anything is written.
    pub fn add(&self, contact: NewContact) -> Result<()> {
        validate_fields(&contact.first_name, &contact.phone)?;
        self.enqueue(WriteOp::Insert(NewContact {
            first_name: contact.first_name.trim().to_string(),
            last_name: contact.last_name.trim().to_string(),
            phone: contact.phone.trim().to_string(),
        }))
    }

    /// Replace the stored record with the same id.
    ///
    /// Same validation policy as [`add`](Self::add): blank first name or
    /// phone is rejected on edits too.
    pub fn update(&self, contact: Contact) -> Result<()> {
        validate_fields(&contact.first_name, &contact.phone)?;
        self.enqueue(WriteOp::Upsert(Contact {
            id: contact.id,
            first_name: contact.first_name.trim().to_string(),
            last_name: contact.last_name.trim().to_string(),
            phone: contact.phone.trim().to_string(),
        }))
    }

    /// Delete a contact by id. Deleting an id that no longer exists is a
    /// no-op.
    pub fn remove(&self, id: ContactId) -> Result<()> {
        self.enqueue(WriteOp::Delete(id))
    }

    /// Ordered snapshot subscription for an alternate sort field.
    ///
    /// Unlike [`observe_contacts`](Self::observe_contacts) this is a plain
    /// passthrough to the backend, without the idle lifecycle.
    pub fn watch_ordered_by(&self, order: ContactOrder) -> watch::Receiver<Vec<Contact>> {
        self.storage.observe_ordered_by(order)
    }

    fn enqueue(&self, op: WriteOp) -> Result<()> {
        self.writes
            .send(op)
            .map_err(|_| RolodexError::Storage("contact write worker is gone".to_string()))
    }
}

fn validate_fields(first_name: &str, phone: &str) -> Result<()> {
    if first_name.trim().is_empty() {
        return Err(RolodexError::Validation(
            "First name must not be blank".to_string(),
        ));
    }
    if phone.trim().is_empty() {
        return Err(RolodexError::Validation(
            "Phone must not be blank".to_string(),
        ));
    }
    Ok(())
}

fn apply_write(storage: &dyn ContactStorage, op: WriteOp) -> Result<()> {
    match op {
        WriteOp::Insert(contact) => {
            let stored = storage.insert(&contact)?;
            debug!(id = %stored.id, "inserted contact");
        }
        WriteOp::Upsert(contact) => {
            storage.upsert(&contact)?;
            debug!(id = %contact.id, "replaced contact");
        }
        WriteOp::Delete(id) => {
            storage.delete(id)?;
            debug!(%id, "deleted contact");
        }
    }
    Ok(())
}

async fn forward_snapshots(view: Arc<SharedView>, mut backend_rx: watch::Receiver<Vec<Contact>>) {
    while backend_rx.changed().await.is_ok() {
        let snapshot = backend_rx.borrow_and_update().clone();
        view.latest.send_replace(snapshot);
    }
}

/// Live subscription to the sorted contact list.
///
/// Holds the backend observation alive; drop it to release the
/// subscription.
pub struct LiveContacts {
    rx: watch::Receiver<Vec<Contact>>,
    _guard: SubscriberGuard,
}

impl LiveContacts {
    /// The current snapshot, sorted ascending by first name.
    pub fn current(&self) -> Vec<Contact> {
        self.rx.borrow().clone()
    }

    /// Wait until a snapshot newer than the last seen one is available.
    pub async fn changed(&mut self) -> Result<()> {
        self.rx
            .changed()
            .await
            .map_err(|_| RolodexError::Storage("live contact view closed".to_string()))
    }
}

struct SubscriberGuard {
    view: Arc<SharedView>,
    idle_grace: Duration,
}

impl Drop for SubscriberGuard {
    fn drop(&mut self) {
        let mut state = lock_state(&self.view.state);
        state.subscribers = state.subscribers.saturating_sub(1);
        if state.subscribers > 0 {
            return;
        }

        let epoch = state.epoch;
        drop(state);

        if let Ok(handle) = tokio::runtime::Handle::try_current() {
            let view = Arc::clone(&self.view);
            let grace = self.idle_grace;
            handle.spawn(async move {
                tokio::time::sleep(grace).await;
                let mut state = lock_state(&view.state);
                if state.subscribers == 0 && state.epoch == epoch {
                    if let Some(task) = state.forwarder.take() {
                        task.abort();
                        debug!("live contact view released after idle grace");
                    }
                }
            });
        } else {
            // No runtime to time the grace period on; release immediately.
            let mut state = lock_state(&self.view.state);
            if state.subscribers == 0 {
                if let Some(task) = state.forwarder.take() {
                    task.abort();
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::SqliteStorage;

    fn memory_store() -> ContactStore {
        let storage = Arc::new(SqliteStorage::open_in_memory().unwrap());
        ContactStore::new(storage)
    }

    async fn wait_for<F>(live: &mut LiveContacts, pred: F) -> Vec<Contact>
    where
        F: Fn(&[Contact]) -> bool,
    {
        for _ in 0..100 {
            let current = live.current();
            if pred(&current) {
                return current;
            }
            tokio::time::timeout(Duration::from_secs(2), live.changed())
                .await
                .expect("timed out waiting for a live snapshot")
                .unwrap();
        }
        panic!("live view never reached the expected state");
    }

    fn first_names(contacts: &[Contact]) -> Vec<&str> {
        contacts.iter().map(|c| c.first_name.as_str()).collect()
    }

    #[tokio::test]
    async fn test_add_assigns_id_and_trims_fields() {
        let store = memory_store();
        let mut live = store.observe_contacts();

        store
            .add(NewContact::new("  Alex Johnson  ", " 262-555-1234 "))
            .unwrap();

        let contacts = wait_for(&mut live, |c| c.len() == 1).await;
        assert_eq!(contacts[0].first_name, "Alex Johnson");
        assert_eq!(contacts[0].phone, "262-555-1234");
        assert!(contacts[0].id.0 > 0);
    }

    #[tokio::test]
    async fn test_live_list_stays_sorted_by_first_name() {
        let store = memory_store();
        let mut live = store.observe_contacts();

        store.add(NewContact::new("Zoe Adams", "555-0001")).unwrap();
        store.add(NewContact::new("Amy Zane", "555-0002")).unwrap();

        let contacts = wait_for(&mut live, |c| c.len() == 2).await;
        assert_eq!(first_names(&contacts), vec!["Amy Zane", "Zoe Adams"]);
    }

    #[tokio::test]
    async fn test_update_replaces_exactly_one_record() {
        let store = memory_store();
        let mut live = store.observe_contacts();

        store.add(NewContact::new("Alex Johnson", "262-555-1234")).unwrap();
        store.add(NewContact::new("Jamie Doe", "262-555-5678")).unwrap();
        let contacts = wait_for(&mut live, |c| c.len() == 2).await;

        let alex = contacts
            .iter()
            .find(|c| c.first_name == "Alex Johnson")
            .unwrap();
        store.update(alex.with_fields("Alex Johnson", "262-555-9999")).unwrap();

        let contacts =
            wait_for(&mut live, |c| c.iter().any(|x| x.phone == "262-555-9999")).await;
        assert_eq!(contacts.len(), 2);
        let jamie = contacts
            .iter()
            .find(|c| c.first_name == "Jamie Doe")
            .unwrap();
        assert_eq!(jamie.phone, "262-555-5678");
    }

    #[tokio::test]
    async fn test_remove_missing_id_leaves_list_unchanged() {
        let store = memory_store();
        let mut live = store.observe_contacts();

        store.add(NewContact::new("Alex Johnson", "262-555-1234")).unwrap();
        wait_for(&mut live, |c| c.len() == 1).await;

        store.remove(ContactId(9999)).unwrap();
        store.add(NewContact::new("Jamie Doe", "262-555-5678")).unwrap();

        // The later insert flushes the queue; the bogus delete changed nothing.
        let contacts = wait_for(&mut live, |c| c.len() == 2).await;
        assert!(contacts.iter().any(|c| c.first_name == "Alex Johnson"));
    }

    #[tokio::test]
    async fn test_add_rejects_blank_fields_without_writing() {
        let store = memory_store();
        let live = store.observe_contacts();

        let err = store.add(NewContact::new("   ", "262-555-1234")).unwrap_err();
        assert!(matches!(err, RolodexError::Validation(_)));
        let err = store.add(NewContact::new("Alex", "  ")).unwrap_err();
        assert!(matches!(err, RolodexError::Validation(_)));

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(live.current().is_empty());
    }

    #[tokio::test]
    async fn test_seed_if_empty_seeds_once_in_sorted_order() {
        let store = memory_store();
        let mut live = store.observe_contacts();

        assert!(store.seed_if_empty().await.unwrap());
        assert!(!store.seed_if_empty().await.unwrap());

        let contacts = wait_for(&mut live, |c| c.len() == 2).await;
        assert_eq!(first_names(&contacts), vec!["Alex Johnson", "Jamie Doe"]);
    }

    #[tokio::test]
    async fn test_idle_grace_releases_backend_observation() {
        let store = memory_store().with_idle_grace(Duration::from_millis(50));

        let live = store.observe_contacts();
        assert!(lock_state(&store.view.state).forwarder.is_some());

        drop(live);
        tokio::time::sleep(Duration::from_millis(200)).await;
        assert!(lock_state(&store.view.state).forwarder.is_none());
    }

    #[tokio::test]
    async fn test_resubscribe_within_grace_keeps_observation_alive() {
        let store = memory_store().with_idle_grace(Duration::from_millis(200));

        let live = store.observe_contacts();
        drop(live);

        tokio::time::sleep(Duration::from_millis(20)).await;
        let _live = store.observe_contacts();

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(lock_state(&store.view.state).forwarder.is_some());
    }

    #[tokio::test]
    async fn test_observation_restarts_after_idle_release() {
        let store = memory_store().with_idle_grace(Duration::from_millis(20));

        drop(store.observe_contacts());
        tokio::time::sleep(Duration::from_millis(100)).await;

        store.add(NewContact::new("Alex Johnson", "262-555-1234")).unwrap();
        let mut live = store.observe_contacts();
        let contacts = wait_for(&mut live, |c| c.len() == 1).await;
        assert_eq!(contacts[0].first_name, "Alex Johnson");
    }
}
