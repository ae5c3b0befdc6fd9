use std::path::PathBuf;
use std::sync::Arc;

use rolodex_core::{ContactStore, SqliteStorage};

use crate::app::AppContext;
use crate::cli::InitArgs;
use crate::config::{self, RolodexConfig};
use crate::output::parse_output_format;

pub async fn handle_init(ctx: &AppContext<'_>, args: &InitArgs) -> anyhow::Result<()> {
    if let Some(ref format) = args.format {
        parse_output_format(Some(format))?;
    }

    let config_path = config::default_config_path()?;
    if config_path.exists() {
        return Err(anyhow::anyhow!(
            "Already initialized. Remove {} to start over.",
            config_path.display()
        ));
    }

    let book_path = match args.path.as_deref().or(ctx.book_flag()) {
        Some(path) => PathBuf::from(path),
        None => config::default_book_path()?,
    };

    let settings = RolodexConfig::new(book_path.clone(), args.format.clone());
    config::write_config(&config_path, &settings)?;

    // Create the book and seed it so the first `list` has something to show.
    let storage = Arc::new(SqliteStorage::open(&book_path)?);
    let store = ContactStore::new(storage);
    store.seed_if_empty().await?;

    if !ctx.quiet() {
        println!("Initialized address book at {}", book_path.display());
    }
    Ok(())
}
