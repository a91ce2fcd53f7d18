//! Command-line interface definitions and parsing

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Configuration file path
    #[arg(short, long)]
    pub config: Option<String>,

    /// Data directory for the message archive
    #[arg(short, long)]
    pub data_dir: Option<String>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Start the interactive chat console (default)
    Chat,
    /// Check one credential value and print the result
    Check {
        /// Field to check: first-name, last-name, username, password or phone
        field: String,
        /// Value to check
        value: String,
    },
    /// Print the fingerprint of a message body
    Fingerprint {
        /// Message sequence number
        id: u64,
        /// Message body
        body: String,
    },
    /// List archived messages
    Stored,
}

impl Cli {
    /// The requested command, defaulting to the chat console
    pub fn command(&self) -> Commands {
        self.command.clone().unwrap_or(Commands::Chat)
    }
}
