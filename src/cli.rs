use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};

use crate::config::DEFAULT_TIMEOUT_SECS;

/// CLI arguments parser using `clap`
#[derive(Parser, Debug)]
#[command(name = "mortydex", version, about = "Browse the Rick and Morty catalog from the terminal")]
pub struct Cli {
    /// Subcommand chosen to execute, interactive menu when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// GraphQL endpoint to query
    #[arg(long, global = true, env = "MORTYDEX_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Directory holding the local session storage
    #[arg(long, global = true, env = "MORTYDEX_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, global = true, env = "MORTYDEX_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,

    /// Keep the session in memory only
    #[arg(long, global = true)]
    pub ephemeral: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,
}

// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Signs in with a local profile
    Login {
        /// Display name
        username: String,
        /// Job title
        job_title: String,
    },
    /// Edits the signed-in profile
    Update {
        /// New display name
        username: String,
        /// New job title
        job_title: String,
    },
    /// Signs out and removes the stored profile
    Logout,
    /// Displays the signed-in profile
    Whoami,
    /// Lists one page of characters
    List {
        /// Page to show, parsed like the `page` query parameter
        #[arg(short, long)]
        page: Option<String>,
    },
    /// Shows one character in detail
    Show {
        /// Character id
        id: String,
        /// Listing page to return to
        #[arg(short, long)]
        page: Option<String>,
    },
    /// Opens an application path such as `/information/42?page=3`
    Open {
        /// Path with optional query string
        target: String,
    },
}
