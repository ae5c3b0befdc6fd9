//! Rolodex CLI - a single-user contact book with a sorted, editable live
//! list.
//!
//! This is the command-line interface for Rolodex. It is the sole consumer
//! of the core library: it subscribes to the contact list and dispatches
//! add/edit/delete intents through the contact store and the edit-session
//! controller.

mod app;
mod cli;
mod commands;
mod config;
mod helpers;
mod output;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::app::AppContext;
use crate::cli::{Cli, Commands, ListArgs};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let ctx = AppContext::new(&cli);

    match &cli.command {
        Some(Commands::Init(args)) => commands::init::handle_init(&ctx, args).await,
        Some(Commands::Add(args)) => commands::add::handle_add(&ctx, args).await,
        Some(Commands::List(args)) => commands::list::handle_list(&ctx, args).await,
        Some(Commands::Edit(args)) => commands::edit::handle_edit(&ctx, args).await,
        Some(Commands::Delete(args)) => commands::delete::handle_delete(&ctx, args).await,
        Some(Commands::Watch) => commands::watch::handle_watch(&ctx).await,
        Some(Commands::Completions { shell }) => commands::completions::handle_completions(*shell),
        // Bare `rolodex` shows the sorted list, like opening the app.
        None => commands::list::handle_list(&ctx, &ListArgs::default()).await,
    }
}
