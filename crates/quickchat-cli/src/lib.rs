//! QuickChat CLI library
//!
//! Console front end, configuration, and the JSON-lines message archive for
//! the QuickChat engine.

pub mod archive;
pub mod cli;
pub mod commands;
pub mod config;
pub mod console;
pub mod error;

pub use archive::JsonLinesArchive;
pub use cli::{Cli, Commands};
pub use commands::CommandDispatcher;
pub use config::AppConfig;
pub use console::{Console, ConsolePrompter};
pub use error::{CliError, Result};
