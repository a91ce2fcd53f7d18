//! Command handlers for the QuickChat CLI

use std::io::{self, Write};
use std::sync::Arc;

use tracing::info;

use quickchat_core::{
    compute_fingerprint, CredentialField, MessageLedger, SessionController, UserRegistry,
};

use crate::archive::JsonLinesArchive;
use crate::cli::Commands;
use crate::config::AppConfig;
use crate::console::Console;
use crate::error::{CliError, Result};

/// Command dispatcher for handling CLI commands
pub struct CommandDispatcher;

impl CommandDispatcher {
    /// Execute a CLI command against stdin and stdout
    pub fn execute(command: Commands, config: &AppConfig) -> Result<()> {
        match command {
            Commands::Chat => Self::handle_chat_command(config),
            other => Self::execute_with_output(other, config, &mut io::stdout().lock()),
        }
    }

    /// Execute a non-interactive command, writing results to `out`
    pub fn execute_with_output(
        command: Commands,
        config: &AppConfig,
        out: &mut dyn Write,
    ) -> Result<()> {
        match command {
            Commands::Chat => Err(CliError::InvalidArgument(
                "chat requires an interactive terminal".to_string(),
            )),
            Commands::Check { field, value } => Self::handle_check_command(&field, &value, out),
            Commands::Fingerprint { id, body } => Self::handle_fingerprint_command(id, &body, out),
            Commands::Stored => Self::handle_stored_command(config, out),
        }
    }

    /// Build a session over the configured archive
    pub fn build_session(config: &AppConfig) -> SessionController {
        let registry = Arc::new(UserRegistry::new());
        let archive = JsonLinesArchive::new(config.archive_path());
        let ledger = MessageLedger::with_archive(config.core.message.clone(), Box::new(archive))
            .with_directory(Arc::clone(&registry));

        SessionController::new(registry, Arc::new(ledger), config.core.session.clone())
    }

    /// Handle the interactive chat command
    fn handle_chat_command(config: &AppConfig) -> Result<()> {
        info!("Archiving stored messages to {}", config.archive_path().display());

        let session = Self::build_session(config);
        let stdin = io::stdin();
        let mut console = Console::new(session, config.cli.prompt.clone(), stdin.lock(), io::stdout());
        console.run()?;
        Ok(())
    }

    /// Handle the check command
    fn handle_check_command(field: &str, value: &str, out: &mut dyn Write) -> Result<()> {
        let field: CredentialField = field.parse()?;
        writeln!(out, "{}", field.check(value))?;
        Ok(())
    }

    /// Handle the fingerprint command
    fn handle_fingerprint_command(id: u64, body: &str, out: &mut dyn Write) -> Result<()> {
        if id == 0 {
            return Err(CliError::InvalidArgument(
                "Message numbers start at 1".to_string(),
            ));
        }
        writeln!(out, "{}", compute_fingerprint(id, body))?;
        Ok(())
    }

    /// Handle the stored command
    fn handle_stored_command(config: &AppConfig, out: &mut dyn Write) -> Result<()> {
        let archive = JsonLinesArchive::new(config.archive_path());
        let records = archive.read_all()?;

        if records.is_empty() {
            writeln!(out, "No stored messages.")?;
            return Ok(());
        }

        for record in records {
            writeln!(
                out,
                "MessageID: {:010}\nMessage Hash: {}\nRecipient: {}\nMessage: {}\n",
                record.sequence_id, record.fingerprint, record.recipient, record.body
            )?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickchat_core::{Outcome, Registration};

    fn run(command: Commands, config: &AppConfig) -> Result<String> {
        let mut out = Vec::new();
        CommandDispatcher::execute_with_output(command, config, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    fn temp_config(dir: &tempfile::TempDir) -> AppConfig {
        let mut config = AppConfig::default();
        config.cli.data_dir = Some(dir.path().to_path_buf());
        config
    }

    #[test]
    fn test_check_command() {
        let config = AppConfig::default();
        let check = |field: &str, value: &str| {
            run(
                Commands::Check {
                    field: field.to_string(),
                    value: value.to_string(),
                },
                &config,
            )
        };

        assert_eq!(check("phone", "+27831234567").unwrap(), "Cell phone number successfully added.\n");
        assert!(check("password", "password").unwrap().starts_with("Password is not correctly formatted"));
        assert!(matches!(check("nickname", "x"), Err(CliError::Core(_))));
    }

    #[test]
    fn test_fingerprint_command() {
        let config = AppConfig::default();
        let output = run(
            Commands::Fingerprint {
                id: 1,
                body: "Hi Mike, can you join us for dinner tonight".to_string(),
            },
            &config,
        )
        .unwrap();
        assert_eq!(output, "01-token-1-hi-tonight\n");

        let err = run(
            Commands::Fingerprint {
                id: 0,
                body: "Hi".to_string(),
            },
            &config,
        );
        assert!(matches!(err, Err(CliError::InvalidArgument(_))));
    }

    #[test]
    fn test_stored_lists_session_archive() {
        let dir = tempfile::tempdir().unwrap();
        let config = temp_config(&dir);

        assert_eq!(run(Commands::Stored, &config).unwrap(), "No stored messages.\n");

        let mut session = CommandDispatcher::build_session(&config);
        session
            .register(Registration::new("Kyle", "Doe", "kyl_1", "Ch&&se9!", "+27831234567"))
            .unwrap();
        assert!(session.login("kyl_1", "Ch&&se9!"));
        let report = session
            .compose_and_dispatch("+27726030002", "Did you get the cake?", "store")
            .unwrap();
        assert_eq!(report.outcome, Outcome::Stored);

        let output = run(Commands::Stored, &config).unwrap();
        assert!(output.contains("MessageID: 0000000001"));
        assert!(output.contains("Message Hash: 01-token-1-did-cake?"));
        assert!(output.contains("Message: Did you get the cake?"));
    }

    #[test]
    fn test_chat_needs_terminal() {
        let config = AppConfig::default();
        assert!(run(Commands::Chat, &config).is_err());
    }
}
