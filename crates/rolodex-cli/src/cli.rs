use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

use rolodex_core::VERSION;

/// Rolodex - a single-user contact book with a sorted, editable live list
#[derive(Parser)]
#[command(name = "rolodex")]
#[command(author, version = VERSION, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the address book file
    #[arg(short, long, global = true, env = "ROLODEX_BOOK")]
    pub book: Option<String>,

    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the address book and write the config file
    Init(InitArgs),

    /// Add a new contact
    Add(AddArgs),

    /// List contacts
    List(ListArgs),

    /// Edit a contact inline
    Edit(EditArgs),

    /// Delete a contact
    Delete(DeleteArgs),

    /// Watch the live contact list until interrupted
    Watch,

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_name = "SHELL")]
        shell: Shell,
    },
}

/// Arguments for the `init` command
#[derive(Args)]
pub struct InitArgs {
    /// Path where the address book will be created
    #[arg(value_name = "PATH")]
    pub path: Option<String>,

    /// Default output format to record in the config (table, plain)
    #[arg(long)]
    pub format: Option<String>,
}

/// Arguments for the `add` command
#[derive(Args)]
pub struct AddArgs {
    /// First name (prompted for when omitted)
    #[arg(long)]
    pub first: Option<String>,

    /// Last name (optional)
    #[arg(long)]
    pub last: Option<String>,

    /// Phone number (prompted for when omitted)
    #[arg(long)]
    pub phone: Option<String>,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,
}

/// Arguments for the `list` command
#[derive(Args, Default)]
pub struct ListArgs {
    /// Sort field (first, last, phone)
    #[arg(long, value_name = "FIELD")]
    pub sort: Option<String>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Output format (table, plain)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<String>,
}

/// Arguments for the `edit` command
#[derive(Args)]
pub struct EditArgs {
    /// Contact id
    #[arg(value_name = "ID")]
    pub id: i64,

    /// New first name (prompted for when omitted)
    #[arg(long)]
    pub first: Option<String>,

    /// New phone number (prompted for when omitted)
    #[arg(long)]
    pub phone: Option<String>,

    /// Disable interactive prompts
    #[arg(long)]
    pub no_input: bool,
}

/// Arguments for the `delete` command
#[derive(Args)]
pub struct DeleteArgs {
    /// Contact id
    #[arg(value_name = "ID")]
    pub id: i64,
}
