//! CLI argument definitions using clap.
//!
//! Commands:
//! - cardguard init
//! - cardguard submit (--holder-name .. | --json <file|->)
//! - cardguard show <id>
//! - cardguard config

use cardguard_core::CardId;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// CardGuard - card registration validation and storage
#[derive(Parser, Debug)]
#[command(name = "cardguard")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// SQLite database file. Overrides CARDGUARD_DB_PATH.
    #[arg(long, global = true)]
    pub db_path: Option<PathBuf>,

    /// Log level (trace|debug|info|warn|error). Overrides CARDGUARD_LOG_LEVEL.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files. Overrides CARDGUARD_LOG_DIR.
    #[arg(long, global = true)]
    pub log_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the card table if it does not exist
    Init,

    /// Validate and store one card submission
    Submit(SubmitArgs),

    /// Print a stored card with its number masked
    Show {
        /// Card id returned by `submit`
        id: CardId,
    },

    /// Print the resolved configuration
    Config,
}

#[derive(Args, Debug, Default)]
pub struct SubmitArgs {
    /// Read the submission as a JSON object from a file, or `-` for stdin
    #[arg(long, conflicts_with_all = ["holder_name", "card_number", "expiry", "cvv", "card_password"])]
    pub json: Option<PathBuf>,

    #[arg(long, default_value = "")]
    pub holder_name: String,

    #[arg(long, default_value = "")]
    pub card_number: String,

    /// Expiry in MM/YY form
    #[arg(long, default_value = "")]
    pub expiry: String,

    #[arg(long, default_value = "")]
    pub cvv: String,

    #[arg(long, default_value = "")]
    pub card_password: String,
}
