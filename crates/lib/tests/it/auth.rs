use teamdesk::{
    EventName, SinkCall,
    auth::{LoginOutcome, RegisterOutcome},
    events::PropKey,
};

use crate::helpers::{register_user, test_app};

#[test]
fn register_then_login_round_trip() {
    let t = test_app();
    register_user(&t.app, "Ada Lovelace", "ada@example.com", "Engineering", "s3cret");

    let outcome = t.app.auth().login("ada@example.com", "s3cret").unwrap();
    let LoginOutcome::LoggedIn {
        email,
        group,
        session_id,
        needs_password_reset,
    } = outcome
    else {
        panic!("expected a successful login, got {outcome:?}");
    };
    assert_eq!(email, "ada@example.com");
    assert_eq!(group, "Engineering");
    assert!(session_id.is_some());
    assert!(!needs_password_reset);

    let current = t.app.auth().current_user().unwrap();
    assert_eq!(current.email, "ada@example.com");
    assert_eq!(
        t.app.sessions().current_session_id(),
        session_id,
        "the persisted session should be the one the outcome reported"
    );
}

#[test]
fn login_email_lookup_is_case_insensitive() {
    let t = test_app();
    register_user(&t.app, "Ada", "Ada@Example.com", "QA", "s3cret");

    let outcome = t.app.auth().login("ada@example.COM", "s3cret").unwrap();
    assert!(matches!(outcome, LoginOutcome::LoggedIn { .. }));
}

#[test]
fn wrong_password_and_unknown_user_emit_failure_events() {
    let t = test_app();
    register_user(&t.app, "Ada", "ada@example.com", "QA", "s3cret");

    let outcome = t.app.auth().login("ada@example.com", "not-it").unwrap();
    assert_eq!(outcome, LoginOutcome::WrongPassword);
    let outcome = t.app.auth().login("nobody@example.com", "whatever").unwrap();
    assert_eq!(outcome, LoginOutcome::UserNotFound);
    assert!(t.app.auth().current_user().is_none());

    let failures: Vec<_> = t
        .app
        .events()
        .into_iter()
        .filter(|e| e.event == EventName::LoginFailed)
        .collect();
    assert_eq!(failures.len(), 2);
    assert_eq!(
        failures[0].properties.str_value(PropKey::FailureReason),
        Some("wrong_password")
    );
    assert_eq!(
        failures[1].properties.str_value(PropKey::FailureReason),
        Some("user_not_found")
    );
}

#[test]
fn invalid_login_form_stops_before_the_attempt() {
    let t = test_app();
    let outcome = t.app.auth().login("not-an-email", "pw").unwrap();
    assert!(matches!(outcome, LoginOutcome::Invalid(_)));

    let events = t.app.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].event, EventName::LoginValidationFailed);
}

#[test]
fn relogin_rotates_the_session() {
    let t = test_app();
    register_user(&t.app, "Ada", "ada@example.com", "QA", "s3cret");

    t.app.auth().login("ada@example.com", "s3cret").unwrap();
    let first = t.app.sessions().current_session_id().unwrap();
    t.app.auth().login("ada@example.com", "s3cret").unwrap();
    let second = t.app.sessions().current_session_id().unwrap();
    assert_ne!(first, second);
}

#[test]
fn duplicate_email_registration_is_rejected_in_any_case() {
    let t = test_app();
    register_user(&t.app, "Ada", "ada@example.com", "QA", "s3cret");

    let outcome = t
        .app
        .auth()
        .register("Imposter", "ADA@EXAMPLE.COM", "Sales", "other")
        .unwrap();
    assert_eq!(outcome, RegisterOutcome::EmailExists);
    assert_eq!(t.app.directory().list().len(), 1, "list must be unchanged");

    let failed: Vec<_> = t
        .app
        .events()
        .into_iter()
        .filter(|e| e.event == EventName::RegistrationFailed)
        .collect();
    assert_eq!(failed.len(), 1);
    assert_eq!(
        failed[0].properties.str_value(PropKey::FailureReason),
        Some("email_exists")
    );
}

#[test]
fn sentinel_password_forces_a_reset() {
    let t = test_app();
    // Users created through the directory get the sentinel password.
    t.app.directory().add("Bob", "bob@example.com", "Sales").unwrap();

    let outcome = t.app.auth().login("bob@example.com", "changeme").unwrap();
    assert!(matches!(
        outcome,
        LoginOutcome::LoggedIn {
            needs_password_reset: true,
            ..
        }
    ));
    assert_eq!(
        t.app.auth().pending_password_reset(),
        Some("bob@example.com".to_string())
    );

    t.app
        .auth()
        .complete_password_reset("bob@example.com", "fresh-pw")
        .unwrap();
    assert_eq!(t.app.auth().pending_password_reset(), None);

    // The new password works and no longer forces a reset.
    let outcome = t.app.auth().login("bob@example.com", "fresh-pw").unwrap();
    assert!(matches!(
        outcome,
        LoginOutcome::LoggedIn {
            needs_password_reset: false,
            ..
        }
    ));
}

#[test]
fn logout_clears_state_and_resets_the_sink() {
    let t = test_app();
    register_user(&t.app, "Ada", "ada@example.com", "QA", "s3cret");
    t.app.auth().login("ada@example.com", "s3cret").unwrap();

    t.app.auth().logout().unwrap();

    assert!(t.app.auth().current_user().is_none());
    assert!(t.app.sessions().current_session_id().is_none());
    assert!(t.sink.calls().iter().any(|c| matches!(c, SinkCall::Reset)));

    // The exit events were appended while the actor was still known.
    let events = t.app.events();
    let logout = events.iter().rev().find(|e| e.event == EventName::Logout);
    assert_eq!(logout.and_then(|e| e.user.clone()), Some("ada@example.com".to_string()));
    assert!(events.iter().any(|e| e.event == EventName::UserSessionEnded));
}

#[test]
fn login_identifies_the_user_to_the_sink() {
    let t = test_app();
    register_user(&t.app, "Ada", "ada@example.com", "QA", "s3cret");
    t.app.auth().login("ada@example.com", "s3cret").unwrap();

    let identify = t
        .sink
        .calls()
        .into_iter()
        .find_map(|c| match c {
            SinkCall::Identify(identity) => Some(identity),
            _ => None,
        })
        .unwrap();
    assert_eq!(identify.email.as_deref(), Some("ada@example.com"));
    assert_eq!(identify.group.as_deref(), Some("QA"));
}
