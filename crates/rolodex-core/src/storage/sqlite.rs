//! SQLite storage backend.
//!
//! A single `rusqlite::Connection` behind a mutex, with a `watch` channel
//! per sort field for the ordered live queries. Every successful write
//! re-queries and publishes the affected snapshots; orderings nobody is
//! subscribed to are skipped.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use tokio::sync::watch;
use tracing::{debug, warn};

use super::traits::ContactStorage;
use super::types::{BookMetadata, Contact, ContactId, ContactOrder, NewContact};
use crate::error::{Result, RolodexError};

const FORMAT_VERSION: &str = "0.1";

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS meta (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS contacts (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    first_name TEXT NOT NULL,
    last_name TEXT NOT NULL DEFAULT '',
    phone TEXT NOT NULL
);
"#;

/// SQLite storage engine for a contact book.
pub struct SqliteStorage {
    conn: Mutex<Connection>,
    watchers: Watchers,
}

struct Watchers {
    first_name: watch::Sender<Vec<Contact>>,
    last_name: watch::Sender<Vec<Contact>>,
    phone: watch::Sender<Vec<Contact>>,
}

impl Watchers {
    fn new() -> Self {
        Self {
            first_name: watch::channel(Vec::new()).0,
            last_name: watch::channel(Vec::new()).0,
            phone: watch::channel(Vec::new()).0,
        }
    }

    fn sender(&self, order: ContactOrder) -> &watch::Sender<Vec<Contact>> {
        match order {
            ContactOrder::FirstName => &self.first_name,
            ContactOrder::LastName => &self.last_name,
            ContactOrder::Phone => &self.phone,
        }
    }
}

impl SqliteStorage {
    /// Open an address book at the given path, creating it if missing.
    ///
    /// Creates parent directories and bootstraps the schema on first open.
    ///
    /// # Errors
    ///
    /// Returns `RolodexError::Storage` if the path cannot be created or the
    /// file is not a valid address book.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(path).map_err(Self::sqlite_error)?;
        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA foreign_keys = ON;
             PRAGMA busy_timeout = 5000;",
        )
        .map_err(Self::sqlite_error)?;

        Self::init_schema(&conn)?;
        debug!(path = %path.display(), "opened address book");

        Ok(Self {
            conn: Mutex::new(conn),
            watchers: Watchers::new(),
        })
    }

    /// Open an in-memory address book. Used by tests and the edit-session
    /// unit tests; contents are lost on drop.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().map_err(Self::sqlite_error)?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .map_err(Self::sqlite_error)?;
        Self::init_schema(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
            watchers: Watchers::new(),
        })
    }

    fn init_schema(conn: &Connection) -> Result<()> {
        conn.execute_batch(SCHEMA).map_err(Self::sqlite_error)?;

        let created_at = Utc::now().to_rfc3339();
        conn.execute(
            "INSERT OR IGNORE INTO meta (key, value) VALUES ('format_version', ?)",
            [FORMAT_VERSION],
        )
        .map_err(Self::sqlite_error)?;
        conn.execute(
            "INSERT OR IGNORE INTO meta (key, value) VALUES ('created_at', ?)",
            [&created_at],
        )
        .map_err(Self::sqlite_error)?;
        conn.execute(
            "INSERT OR IGNORE INTO meta (key, value) VALUES ('last_modified', ?)",
            [&created_at],
        )
        .map_err(Self::sqlite_error)?;

        Ok(())
    }

    fn sqlite_error(err: rusqlite::Error) -> RolodexError {
        RolodexError::Storage(format!("SQLite error: {}", err))
    }

    fn lock_conn(&self) -> Result<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| RolodexError::Storage("SQLite connection poisoned".to_string()))
    }

    fn touch_last_modified(conn: &Connection) -> Result<()> {
        conn.execute(
            "UPDATE meta SET value = ? WHERE key = 'last_modified'",
            [Utc::now().to_rfc3339()],
        )
        .map_err(Self::sqlite_error)?;
        Ok(())
    }

    fn meta_value(conn: &Connection, key: &str) -> Result<String> {
        conn.query_row("SELECT value FROM meta WHERE key = ?", [key], |row| {
            row.get(0)
        })
        .map_err(Self::sqlite_error)
    }

    fn meta_timestamp(conn: &Connection, key: &str) -> Result<DateTime<Utc>> {
        let raw = Self::meta_value(conn, key)?;
        DateTime::parse_from_rfc3339(&raw)
            .map(|value| value.with_timezone(&Utc))
            .map_err(|e| RolodexError::Storage(format!("Invalid {} timestamp: {}", key, e)))
    }

    fn query_ordered(conn: &Connection, order: ContactOrder) -> Result<Vec<Contact>> {
        // Secondary sort on id keeps ties in backend-assigned order.
        let sql = format!(
            "SELECT id, first_name, last_name, phone FROM contacts ORDER BY {} ASC, id ASC",
            order.column()
        );
        let mut stmt = conn.prepare(&sql).map_err(Self::sqlite_error)?;
        let rows = stmt
            .query_map([], |row| {
                Ok(Contact {
                    id: ContactId(row.get(0)?),
                    first_name: row.get(1)?,
                    last_name: row.get(2)?,
                    phone: row.get(3)?,
                })
            })
            .map_err(Self::sqlite_error)?
            .collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Self::sqlite_error)?;
        Ok(rows)
    }

    /// Re-query and publish the snapshots that have live subscribers.
    fn publish(&self, conn: &Connection) {
        for order in [
            ContactOrder::FirstName,
            ContactOrder::LastName,
            ContactOrder::Phone,
        ] {
            let sender = self.watchers.sender(order);
            if sender.receiver_count() == 0 {
                continue;
            }
            match Self::query_ordered(conn, order) {
                Ok(snapshot) => {
                    sender.send_replace(snapshot);
                }
                Err(e) => warn!(?order, error = %e, "failed to refresh live snapshot"),
            }
        }
    }
}

impl ContactStorage for SqliteStorage {
    fn insert(&self, contact: &NewContact) -> Result<Contact> {
        let mut conn = self.lock_conn()?;
        let tx = conn.transaction().map_err(Self::sqlite_error)?;

        tx.execute(
            "INSERT INTO contacts (first_name, last_name, phone) VALUES (?, ?, ?)",
            (&contact.first_name, &contact.last_name, &contact.phone),
        )
        .map_err(Self::sqlite_error)?;
        let id = ContactId(tx.last_insert_rowid());
        Self::touch_last_modified(&tx)?;
        tx.commit().map_err(Self::sqlite_error)?;

        self.publish(&conn);

        Ok(Contact {
            id,
            first_name: contact.first_name.clone(),
            last_name: contact.last_name.clone(),
            phone: contact.phone.clone(),
        })
    }

    fn upsert(&self, contact: &Contact) -> Result<Contact> {
        let mut conn = self.lock_conn()?;
        let tx = conn.transaction().map_err(Self::sqlite_error)?;

        tx.execute(
            "INSERT INTO contacts (id, first_name, last_name, phone)
             VALUES (?, ?, ?, ?)
             ON CONFLICT(id) DO UPDATE SET
                 first_name = excluded.first_name,
                 last_name = excluded.last_name,
                 phone = excluded.phone",
            (
                contact.id.0,
                &contact.first_name,
                &contact.last_name,
                &contact.phone,
            ),
        )
        .map_err(Self::sqlite_error)?;
        Self::touch_last_modified(&tx)?;
        tx.commit().map_err(Self::sqlite_error)?;

        self.publish(&conn);

        Ok(contact.clone())
    }

    fn delete(&self, id: ContactId) -> Result<()> {
        let mut conn = self.lock_conn()?;
        let tx = conn.transaction().map_err(Self::sqlite_error)?;

        let deleted = tx
            .execute("DELETE FROM contacts WHERE id = ?", [id.0])
            .map_err(Self::sqlite_error)?;
        if deleted > 0 {
            Self::touch_last_modified(&tx)?;
        }
        tx.commit().map_err(Self::sqlite_error)?;

        if deleted == 0 {
            // Benign: the record was already gone.
            debug!(%id, "delete target not found");
            return Ok(());
        }

        self.publish(&conn);
        Ok(())
    }

    fn count(&self) -> Result<u64> {
        let conn = self.lock_conn()?;
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM contacts", [], |row| row.get(0))
            .map_err(Self::sqlite_error)?;
        Ok(count as u64)
    }

    fn seed_if_empty(&self, contacts: &[NewContact]) -> Result<bool> {
        let mut conn = self.lock_conn()?;
        let tx = conn.transaction().map_err(Self::sqlite_error)?;

        let count: i64 = tx
            .query_row("SELECT COUNT(*) FROM contacts", [], |row| row.get(0))
            .map_err(Self::sqlite_error)?;
        if count > 0 {
            return Ok(false);
        }

        for contact in contacts {
            tx.execute(
                "INSERT INTO contacts (first_name, last_name, phone) VALUES (?, ?, ?)",
                (&contact.first_name, &contact.last_name, &contact.phone),
            )
            .map_err(Self::sqlite_error)?;
        }
        Self::touch_last_modified(&tx)?;
        tx.commit().map_err(Self::sqlite_error)?;

        self.publish(&conn);
        Ok(true)
    }

    fn observe_ordered_by(&self, order: ContactOrder) -> watch::Receiver<Vec<Contact>> {
        let sender = self.watchers.sender(order);

        // Refresh before handing out the receiver so late subscribers do
        // not start on a snapshot from before publication was suspended.
        match self.lock_conn().and_then(|conn| Self::query_ordered(&conn, order)) {
            Ok(snapshot) => {
                sender.send_replace(snapshot);
            }
            Err(e) => warn!(?order, error = %e, "failed to refresh snapshot on subscribe"),
        }

        sender.subscribe()
    }

    fn metadata(&self) -> Result<BookMetadata> {
        let conn = self.lock_conn()?;
        Ok(BookMetadata {
            format_version: Self::meta_value(&conn, "format_version")?,
            created_at: Self::meta_timestamp(&conn, "created_at")?,
            last_modified: Self::meta_timestamp(&conn, "last_modified")?,
        })
    }
}
