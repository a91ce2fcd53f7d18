//! Tests for the pure rules of the engine
//!
//! Credential predicates, fingerprint construction and the disposition state
//! machine, exercised through the public API only.

use quickchat_core::*;

// ----------------------------------------------------------------------------
// Credential Rules
// ----------------------------------------------------------------------------

#[test]
fn test_name_rule() {
    assert!(validate_name("Kyle"));
    assert!(validate_name("O'Neill"));
    assert!(!validate_name(""));
    assert!(!validate_name("van Wyk"));
    assert!(!validate_name(" "));
}

#[test]
fn test_username_rule() {
    assert!(validate_username("kyl_1"));
    assert!(validate_username("a_b"));
    assert!(validate_username("_"));
    assert!(!validate_username("kyle!!!!!!!"));
    assert!(!validate_username("kyle"));
    assert!(!validate_username("kyle_1"));
    assert!(!validate_username(""));
}

#[test]
fn test_password_rule() {
    assert!(validate_password("Ch&&sec@ke99!"));
    assert!(validate_password("Pass@1wd"));
    assert!(!validate_password("password"));
    assert!(!validate_password("Password1"));
    assert!(!validate_password("Pa@1"));
    assert!(!validate_password("pass@1wd"));
    assert!(!validate_password(""));
}

#[test]
fn test_phone_rule() {
    assert!(validate_phone("+27831234567"));
    assert!(validate_phone("+12345678"));
    assert!(validate_phone("+1234567890123"));
    assert!(!validate_phone("27831234567"));
    assert!(!validate_phone("08966553"));
    assert!(!validate_phone("+123456"));
    assert!(!validate_phone("+12345678901234"));
    assert!(!validate_phone("+2783 1234567"));
    assert!(!validate_phone(""));
}

#[test]
fn test_field_messages() {
    assert_eq!(
        CredentialField::Username.check("kyl_1"),
        "Username successfully captured."
    );
    assert_eq!(
        CredentialField::Phone.check("08966553"),
        "Cell phone number incorrectly formatted or does not contain international code."
    );
    assert_eq!(
        CredentialField::Password.check("Ch&&sec@ke99!"),
        "Password successfully captured."
    );

    let field: CredentialField = "first_name".parse().unwrap();
    assert_eq!(field, CredentialField::FirstName);
    assert!("middle-name".parse::<CredentialField>().is_err());
}

// ----------------------------------------------------------------------------
// Fingerprint
// ----------------------------------------------------------------------------

#[test]
fn test_fingerprint_format() {
    assert_eq!(
        compute_fingerprint(1, "Hi Mike, can you join us for dinner tonight"),
        "01-token-1-hi-tonight"
    );
    assert_eq!(compute_fingerprint(7, "Hello"), "07-token-7-hello-hello");
    assert_eq!(
        compute_fingerprint(123, "Did you get the cake?"),
        "23-token-123-did-cake?"
    );
}

#[test]
fn test_fingerprint_tracks_content() {
    let a = compute_fingerprint(4, "Meet at noon");
    assert_eq!(a, compute_fingerprint(4, "Meet at noon"));
    assert_ne!(a, compute_fingerprint(4, "Meet at dawn"));
    assert_ne!(a, compute_fingerprint(5, "Meet at noon"));
}

// ----------------------------------------------------------------------------
// Disposition State Machine
// ----------------------------------------------------------------------------

#[test]
fn test_terminal_states() {
    assert!(!Disposition::Created.is_terminal());
    assert!(Disposition::Sent.is_terminal());
    assert!(Disposition::Stored.is_terminal());
    assert!(Disposition::Discarded.is_terminal());
}

#[test]
fn test_action_targets() {
    assert_eq!(DispositionAction::Send.target(), Disposition::Sent);
    assert_eq!(DispositionAction::Store.target(), Disposition::Stored);
    assert_eq!(DispositionAction::Discard.target(), Disposition::Discarded);
}

#[test]
fn test_outcome_text() {
    assert_eq!(Outcome::Sent.to_string(), "Message successfully sent.");
    assert_eq!(Outcome::Stored.to_string(), "Message successfully stored.");
    assert_eq!(Outcome::Discarded.to_string(), "Message discarded.");
    assert_eq!(Outcome::InvalidChoice.to_string(), "Invalid option.");
    assert_eq!(Outcome::NoAction.to_string(), "No action taken.");
}

#[test]
fn test_every_terminal_state_rejects_every_action() {
    let actions = [
        DispositionAction::Send,
        DispositionAction::Store,
        DispositionAction::Discard,
    ];

    for first in actions {
        for second in actions {
            let ledger = MessageLedger::default();
            let mut message = ledger.create_message("+27726030002", "Hello there");
            ledger.apply_action(&mut message, first).unwrap();
            let before = message.clone();

            let err = ledger.apply_action(&mut message, second).unwrap_err();
            assert!(err.is_invalid_transition(), "{first} then {second}");
            assert_eq!(message, before);
        }
    }
}
