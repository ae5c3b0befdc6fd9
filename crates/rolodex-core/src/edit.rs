//! In-place edit-session controller.
//!
//! Tracks which single contact (if any) is currently in inline-edit mode
//! and mediates edit/save/cancel/delete transitions against the contact
//! store. At most one contact is ever being edited; starting a new edit
//! silently discards the previous draft.

use tracing::debug;

use crate::error::Result;
use crate::storage::{Contact, ContactId};
use crate::store::ContactStore;

/// Draft field being updated while a contact is in edit mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    FirstName,
    Phone,
}

/// Edit-session state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditState {
    /// No contact is being edited.
    Idle,
    /// One contact is in inline-edit mode with in-progress draft values.
    Editing {
        id: ContactId,
        // Carried unchanged into the replacement record; the inline editor
        // only exposes first name and phone.
        last_name: String,
        draft_first_name: String,
        draft_phone: String,
    },
}

impl EditState {
    /// Id of the contact currently being edited, if any.
    pub fn editing_id(&self) -> Option<ContactId> {
        match self {
            EditState::Idle => None,
            EditState::Editing { id, .. } => Some(*id),
        }
    }
}

/// Controller owning the transient "which contact is being edited" state.
///
/// Long-lived: there is no terminal state. All side effects go through the
/// contact store; the controller holds no durable state of its own.
pub struct EditSession {
    store: ContactStore,
    state: EditState,
}

impl EditSession {
    pub fn new(store: ContactStore) -> Self {
        Self {
            store,
            state: EditState::Idle,
        }
    }

    pub fn state(&self) -> &EditState {
        &self.state
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.state, EditState::Editing { .. })
    }

    /// Put the given contact into inline-edit mode, seeding the draft from
    /// its current values.
    ///
    /// Valid from any state: switching editors discards the previous
    /// unsaved draft.
    pub fn begin_edit(&mut self, contact: &Contact) {
        if let Some(previous) = self.state.editing_id() {
            if previous != contact.id {
                debug!(%previous, "discarding unsaved draft");
            }
        }
        self.state = EditState::Editing {
            id: contact.id,
            last_name: contact.last_name.clone(),
            draft_first_name: contact.first_name.clone(),
            draft_phone: contact.phone.clone(),
        };
    }

    /// Update one draft field in place. No-op when nothing is being edited.
    pub fn update_draft(&mut self, field: DraftField, value: impl Into<String>) {
        if let EditState::Editing {
            draft_first_name,
            draft_phone,
            ..
        } = &mut self.state
        {
            match field {
                DraftField::FirstName => *draft_first_name = value.into(),
                DraftField::Phone => *draft_phone = value.into(),
            }
        }
    }

    /// Commit the draft: replace the stored record with the original id and
    /// the trimmed draft values, then return to idle.
    ///
    /// A blank first name or phone (after trim) is rejected with
    /// `RolodexError::Validation`; the session stays in edit mode with the
    /// draft intact and nothing is written. Committing while idle is a
    /// no-op.
    pub fn commit(&mut self) -> Result<()> {
        let EditState::Editing {
            id,
            last_name,
            draft_first_name,
            draft_phone,
        } = &self.state
        else {
            return Ok(());
        };

        let replacement = Contact {
            id: *id,
            first_name: draft_first_name.trim().to_string(),
            last_name: last_name.clone(),
            phone: draft_phone.trim().to_string(),
        };
        self.store.update(replacement)?;
        self.state = EditState::Idle;
        Ok(())
    }

    /// Abandon the draft without writing.
    pub fn cancel(&mut self) {
        self.state = EditState::Idle;
    }

    /// Delete the contact; if it was the one being edited, the session is
    /// cleared along with its draft.
    pub fn delete(&mut self, contact: &Contact) -> Result<()> {
        self.store.remove(contact.id)?;
        if self.state.editing_id() == Some(contact.id) {
            self.state = EditState::Idle;
        }
        Ok(())
    }
}
