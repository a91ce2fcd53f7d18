//! End-to-end session flows
//!
//! Registration, login, quota handling and message dispatch across a shared
//! registry and ledger, including the prompted flows driven by a scripted
//! `Prompter`.

use std::collections::VecDeque;
use std::sync::Arc;

use quickchat_core::*;

// ----------------------------------------------------------------------------
// Helpers
// ----------------------------------------------------------------------------

struct ScriptedPrompter {
    answers: VecDeque<Option<String>>,
    asked: Vec<InputRequest>,
}

impl ScriptedPrompter {
    fn new(answers: &[Option<&str>]) -> Self {
        Self {
            answers: answers.iter().map(|a| a.map(str::to_string)).collect(),
            asked: Vec::new(),
        }
    }
}

impl Prompter for ScriptedPrompter {
    fn request(&mut self, request: InputRequest) -> Option<String> {
        self.asked.push(request);
        self.answers.pop_front().flatten()
    }
}

fn kyle() -> Registration {
    Registration::new("Kyle", "Doe", "kyl_1", "Ch&&se9!", "+27831234567")
}

fn controller(config: &QuickchatConfig, archive: MemoryArchive) -> SessionController {
    let registry = Arc::new(UserRegistry::new());
    let ledger = Arc::new(MessageLedger::with_archive(
        config.message.clone(),
        Box::new(archive),
    ));
    SessionController::new(registry, ledger, config.session.clone())
}

// ----------------------------------------------------------------------------
// Direct API
// ----------------------------------------------------------------------------

#[test]
fn test_register_login_send() {
    let mut session = controller(&QuickchatConfig::default(), MemoryArchive::new());

    assert_eq!(session.register(kyle()).unwrap(), "Registration successful");
    assert!(session.login("kyl_1", "Ch&&se9!"));

    let report = session
        .compose_and_dispatch("+27831234567", "Hi there", "send")
        .unwrap();
    assert_eq!(report.outcome, Outcome::Sent);
    let message = report.message.unwrap();
    assert_eq!(message.disposition(), Disposition::Sent);
    assert_eq!(message.sender(), Some("kyl_1"));
    assert_eq!(session.ledger().total_sent(), 1);
}

#[test]
fn test_duplicate_registration_keeps_registry() {
    let session = controller(&QuickchatConfig::default(), MemoryArchive::new());
    session.register(kyle()).unwrap();

    let err = session.register(kyle()).unwrap_err();
    assert!(matches!(
        err,
        QuickchatError::Registry(RegistryError::DuplicateUsername { .. })
    ));
    assert_eq!(session.registry().len(), 1);
}

#[test]
fn test_invalid_registration_reports_field_text() {
    let session = controller(&QuickchatConfig::default(), MemoryArchive::new());
    let bad = Registration::new("Kyle", "Doe", "kyl_1", "password", "+27831234567");

    let err = session.register(bad).unwrap_err();
    assert_eq!(err.to_string(), CredentialField::Password.failure_message());
    assert!(session.registry().is_empty());
}

#[test]
fn test_shared_ledger_across_sessions() {
    let config = QuickchatConfig::testing();
    let archive = MemoryArchive::new();
    let mut kyle_session = controller(&config, archive.clone());
    kyle_session.register(kyle()).unwrap();
    kyle_session
        .register(Registration::new("Mike", "Smith", "mk_2", "Dinner#42", "+27726030002"))
        .unwrap();

    let mut mike_session = SessionController::new(
        Arc::clone(kyle_session.registry()),
        Arc::clone(kyle_session.ledger()),
        config.session.clone(),
    );

    assert!(kyle_session.login("kyl_1", "Ch&&se9!"));
    assert!(mike_session.login("mk_2", "Dinner#42"));

    let a = kyle_session
        .compose_and_dispatch("+27726030002", "Dinner tonight?", "send")
        .unwrap();
    let b = mike_session
        .compose_and_dispatch("+27831234567", "Yes please", "send")
        .unwrap();
    let c = mike_session
        .compose_and_dispatch("+27831234567", "Bring the wine", "store")
        .unwrap();

    let (a, b, c) = (a.message.unwrap(), b.message.unwrap(), c.message.unwrap());
    assert_eq!(a.sequence_id(), 1);
    assert_eq!(b.sequence_id(), 2);
    assert_eq!(c.sequence_id(), 3);
    assert_eq!(b.fingerprint(), "02-token-2-yes-please");

    let ledger = kyle_session.ledger();
    assert_eq!(ledger.total_sent(), 2);
    assert_eq!(kyle_session.recent_messages().len(), 1);
    assert_eq!(mike_session.recent_messages().len(), 1);
    assert_eq!(archive.records().len(), 1);
    assert_eq!(archive.records()[0].body, "Bring the wine");
}

#[test]
fn test_quota_resets_on_login() {
    let mut session = controller(&QuickchatConfig::testing(), MemoryArchive::new());
    session.register(kyle()).unwrap();
    assert!(session.login("kyl_1", "Ch&&se9!"));
    assert_eq!(session.quota(), 3);

    for _ in 0..3 {
        session
            .compose_and_dispatch("+27726030002", "ping", "send")
            .unwrap();
    }
    let err = session
        .compose_and_dispatch("+27726030002", "ping", "send")
        .unwrap_err();
    assert_eq!(
        err,
        QuickchatError::Session(SessionError::QuotaExceeded { quota: 3 })
    );

    session.logout();
    assert!(session.login("kyl_1", "Ch&&se9!"));
    assert_eq!(session.session_summary().remaining, 3);
    assert!(session
        .compose_and_dispatch("+27726030002", "ping", "send")
        .is_ok());
}

#[test]
fn test_rejected_send_does_not_count() {
    let mut session = controller(&QuickchatConfig::default(), MemoryArchive::new());
    session.register(kyle()).unwrap();
    session.login("kyl_1", "Ch&&se9!");

    let err = session
        .compose_and_dispatch("0831234567", "Hello", "send")
        .unwrap_err();
    assert_eq!(err.to_string(), "Message validation failed. Cannot send.");
    assert_eq!(session.session_summary().sent, 0);
    assert_eq!(session.ledger().statistics().pending(), 1);
}

#[test]
fn test_archive_failure_surfaces() {
    let archive = MemoryArchive::new();
    archive.set_available(false);
    let mut session = controller(&QuickchatConfig::default(), archive);
    session.register(kyle()).unwrap();
    session.login("kyl_1", "Ch&&se9!");

    let err = session
        .compose_and_dispatch("+27726030002", "Keep this", "store")
        .unwrap_err();
    assert!(err.to_string().starts_with("Store failed"));
    assert!(session.ledger().stored_messages().is_empty());
}

#[test]
fn test_username_recipient_mode() {
    let config = QuickchatConfig {
        message: MessageConfig::username_recipients(),
        ..QuickchatConfig::default()
    };
    let registry = Arc::new(UserRegistry::new());
    let ledger = Arc::new(MessageLedger::new(config.message.clone()).with_directory(Arc::clone(&registry)));
    let mut session = SessionController::new(registry, ledger, config.session);

    session.register(kyle()).unwrap();
    session
        .register(Registration::new("Mike", "Smith", "mk_2", "Dinner#42", "+27726030002"))
        .unwrap();
    session.login("kyl_1", "Ch&&se9!");

    let report = session.compose_and_dispatch("mk_2", "Hello Mike", "send").unwrap();
    assert_eq!(report.outcome, Outcome::Sent);
    assert!(session
        .compose_and_dispatch("nobody", "Hello?", "send")
        .is_err());
}

// ----------------------------------------------------------------------------
// Prompted Flows
// ----------------------------------------------------------------------------

#[test]
fn test_prompted_registration_login_compose() {
    let mut session = controller(&QuickchatConfig::default(), MemoryArchive::new());

    let mut prompter = ScriptedPrompter::new(&[
        Some("Kyle"),
        Some("Doe"),
        Some("kyl_1"),
        Some("Ch&&se9!"),
        Some("+27831234567"),
    ]);
    let status = session.run_registration(&mut prompter).unwrap();
    assert_eq!(status.as_deref(), Some("Registration successful"));
    assert_eq!(prompter.asked, InputRequest::REGISTRATION.to_vec());

    let mut prompter = ScriptedPrompter::new(&[Some("kyl_1"), Some("Ch&&se9!"), Some("2")]);
    let status = session.run_login(&mut prompter).unwrap();
    assert_eq!(status, "Welcome Kyle, Doe it is great to see you again.");
    assert_eq!(session.quota(), 2);

    let mut prompter = ScriptedPrompter::new(&[
        Some("+27726030002"),
        Some("Hi Mike, can you join us for dinner tonight"),
        Some("1"),
    ]);
    assert_eq!(session.run_compose(&mut prompter).unwrap(), Outcome::Sent);

    let sent = session.recent_messages();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].fingerprint(), "01-token-1-hi-tonight");
}

#[test]
fn test_prompted_login_failure() {
    let mut session = controller(&QuickchatConfig::default(), MemoryArchive::new());
    session.register(kyle()).unwrap();

    let mut prompter = ScriptedPrompter::new(&[Some("kyl_1"), Some("nope")]);
    let status = session.run_login(&mut prompter).unwrap();
    assert_eq!(status, "Username or password incorrect, please try again.");
    assert!(!session.is_authenticated());
    assert_eq!(prompter.asked.len(), 2);
}

#[test]
fn test_prompted_invalid_choice_and_cancel() {
    let mut session = controller(&QuickchatConfig::default(), MemoryArchive::new());
    session.register(kyle()).unwrap();
    session.login("kyl_1", "Ch&&se9!");

    let mut prompter = ScriptedPrompter::new(&[Some("+27726030002"), Some("Hello"), Some("9")]);
    assert_eq!(
        session.run_compose(&mut prompter).unwrap(),
        Outcome::InvalidChoice
    );

    let mut prompter = ScriptedPrompter::new(&[None]);
    assert_eq!(session.run_compose(&mut prompter).unwrap(), Outcome::NoAction);
    assert_eq!(session.ledger().total_created(), 0);
    assert_eq!(session.ledger().total_sent(), 0);
}
