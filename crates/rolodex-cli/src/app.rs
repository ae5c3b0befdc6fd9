//! Application context for the Rolodex CLI.
//!
//! Bundles the parsed CLI arguments with lazily-loaded configuration and a
//! lazily-opened contact store so command handlers do not repeat the
//! open-and-seed dance.

use std::path::PathBuf;
use std::sync::Arc;

use once_cell::unsync::OnceCell;

use rolodex_core::{Contact, ContactStore, SqliteStorage};

use crate::cli::Cli;
use crate::config::{self, RolodexConfig};

pub struct AppContext<'a> {
    cli: &'a Cli,
    config: OnceCell<Option<RolodexConfig>>,
    store: OnceCell<ContactStore>,
}

impl<'a> AppContext<'a> {
    pub fn new(cli: &'a Cli) -> Self {
        Self {
            cli,
            config: OnceCell::new(),
            store: OnceCell::new(),
        }
    }

    /// Check if quiet mode is enabled.
    pub fn quiet(&self) -> bool {
        self.cli.quiet
    }

    /// The `--book` flag (or `ROLODEX_BOOK`) as given, without fallbacks.
    pub fn book_flag(&self) -> Option<&str> {
        self.cli.book.as_deref()
    }

    /// Get the config file contents, loading them lazily if needed.
    ///
    /// A missing config file is not an error; defaults apply.
    pub fn config(&self) -> anyhow::Result<Option<&RolodexConfig>> {
        let loaded = self.config.get_or_try_init(|| {
            let path = config::default_config_path()?;
            if path.exists() {
                Ok::<_, anyhow::Error>(Some(config::read_config(&path)?))
            } else {
                Ok(None)
            }
        })?;
        Ok(loaded.as_ref())
    }

    /// Resolve the address book path: `--book` flag (or `ROLODEX_BOOK`),
    /// then the config file, then the XDG default.
    pub fn book_path(&self) -> anyhow::Result<PathBuf> {
        if let Some(ref book) = self.cli.book {
            return Ok(PathBuf::from(book));
        }
        if let Some(loaded) = self.config()? {
            return Ok(PathBuf::from(&loaded.book.path));
        }
        config::default_book_path()
    }

    /// Configured default output format, if any.
    pub fn ui_format(&self) -> anyhow::Result<Option<&str>> {
        Ok(self.config()?.and_then(|c| c.ui.format.as_deref()))
    }

    /// Open the contact store, creating the book and seeding the default
    /// contacts on first activation.
    pub async fn store(&self) -> anyhow::Result<ContactStore> {
        if let Some(store) = self.store.get() {
            return Ok(store.clone());
        }

        let path = self.book_path()?;
        let storage = Arc::new(SqliteStorage::open(&path)?);
        let store = ContactStore::new(storage);
        store.seed_if_empty().await?;

        let _ = self.store.set(store.clone());
        Ok(store)
    }

    /// Look up a contact by id in the current live snapshot.
    pub async fn find_contact(&self, id: i64) -> anyhow::Result<Contact> {
        let store = self.store().await?;
        let live = store.observe_contacts();
        live.current()
            .into_iter()
            .find(|c| c.id.0 == id)
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Contact {} not found. Hint: run `rolodex list` to see ids.",
                    id
                )
            })
    }
}
