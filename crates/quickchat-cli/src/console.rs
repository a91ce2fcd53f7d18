//! Menu-driven console
//!
//! `ConsolePrompter` answers engine input requests from any `BufRead` and
//! echoes prompts to any `Write`. `Console` runs the main and chat menus on
//! top of it and prints engine result text verbatim. End of input cancels
//! the current request.

use std::io::{self, BufRead, Write};

use tracing::{debug, warn};

use quickchat_core::{InputRequest, Message, Outcome, Prompter, RecipientMode, SessionController};

const MAIN_MENU: &str = "\n1) Register\n2) Login\n3) Quit";

const CHAT_MENU: &str = "\n1) Send messages\n2) Show recently sent messages\n3) Show stored messages\n4) Session summary\n5) Logout";

// ----------------------------------------------------------------------------
// Prompter
// ----------------------------------------------------------------------------

/// Line-oriented prompter over an input and an output stream
pub struct ConsolePrompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> ConsolePrompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Show `prompt` and read one line without its terminator. `None` at end
    /// of input.
    pub fn read_line(&mut self, prompt: &str) -> io::Result<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Print one line of text
    pub fn say(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.output, "{}", text)
    }

    pub fn into_inner(self) -> (R, W) {
        (self.input, self.output)
    }
}

impl<R: BufRead, W: Write> Prompter for ConsolePrompter<R, W> {
    fn request(&mut self, request: InputRequest) -> Option<String> {
        let prompt = format!("{}: ", request.prompt());
        match self.read_line(&prompt) {
            Ok(answer) => answer,
            Err(e) => {
                warn!("Console read failed: {}", e);
                None
            }
        }
    }
}

// ----------------------------------------------------------------------------
// Console
// ----------------------------------------------------------------------------

/// Interactive menus over one session
pub struct Console<R, W> {
    io: ConsolePrompter<R, W>,
    session: SessionController,
    prompt: String,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(session: SessionController, prompt: impl Into<String>, input: R, output: W) -> Self {
        Self {
            io: ConsolePrompter::new(input, output),
            session,
            prompt: prompt.into(),
        }
    }

    pub fn session(&self) -> &SessionController {
        &self.session
    }

    /// Hand back the output stream
    pub fn into_output(self) -> W {
        self.io.into_inner().1
    }

    /// Run the main menu until Quit or end of input
    pub fn run(&mut self) -> io::Result<()> {
        self.io.say("Welcome to QuickChat.")?;

        loop {
            self.io.say(MAIN_MENU)?;
            let Some(choice) = self.io.read_line(&self.prompt)? else {
                break;
            };

            match choice.trim() {
                "1" => self.register()?,
                "2" => {
                    if self.login()? {
                        self.chat()?;
                    }
                }
                "3" => break,
                _ => self.io.say(Outcome::InvalidChoice.message())?,
            }
        }

        self.io.say("Goodbye.")
    }

    fn register(&mut self) -> io::Result<()> {
        match self.session.run_registration(&mut self.io) {
            Ok(Some(status)) => self.io.say(&status),
            Ok(None) => self.io.say(Outcome::NoAction.message()),
            Err(e) => self.io.say(&e.to_string()),
        }
    }

    fn login(&mut self) -> io::Result<bool> {
        match self.session.run_login(&mut self.io) {
            Some(status) => {
                self.io.say(&status)?;
                Ok(self.session.is_authenticated())
            }
            None => {
                self.io.say(Outcome::NoAction.message())?;
                Ok(false)
            }
        }
    }

    fn chat(&mut self) -> io::Result<()> {
        let summary = self.session.session_summary().to_string();
        self.io.say(&summary)?;

        loop {
            self.io.say(CHAT_MENU)?;
            let choice = self.io.read_line(&self.prompt)?;

            match choice.as_deref().map(str::trim) {
                Some("1") => self.compose()?,
                Some("2") => {
                    let messages = self.session.recent_messages();
                    self.list(&messages, "No messages sent yet.")?;
                }
                Some("3") => {
                    let messages = self.session.stored_messages();
                    self.list(&messages, "No stored messages.")?;
                }
                Some("4") => {
                    let summary = self.session.session_summary().to_string();
                    self.io.say(&summary)?;
                }
                Some("5") | None => {
                    self.session.logout();
                    debug!("Left chat menu");
                    return self.io.say("Logged out.");
                }
                Some(_) => self.io.say(Outcome::InvalidChoice.message())?,
            }
        }
    }

    fn compose(&mut self) -> io::Result<()> {
        if self.session.ledger().config().recipient_mode == RecipientMode::Username {
            let others: Vec<String> = match self.session.active_identity() {
                Some(identity) => self
                    .session
                    .registry()
                    .recipients_excluding(identity.username())
                    .iter()
                    .map(|other| other.username().to_string())
                    .collect(),
                None => Vec::new(),
            };
            self.io.say(&format!("Registered users: {}", others.join(", ")))?;
        }

        match self.session.run_compose(&mut self.io) {
            Ok(Outcome::Sent) => {
                if let Some(message) = self.session.recent_messages().last() {
                    self.io.say(&message.details())?;
                }
                self.io.say(Outcome::Sent.message())
            }
            Ok(outcome) => self.io.say(outcome.message()),
            Err(e) => self.io.say(&e.to_string()),
        }
    }

    fn list(&mut self, messages: &[Message], empty: &str) -> io::Result<()> {
        if messages.is_empty() {
            return self.io.say(empty);
        }
        for message in messages {
            self.io.say(&message.details())?;
            self.io.say("")?;
        }
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
