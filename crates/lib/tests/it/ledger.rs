use teamdesk::{EventName, Properties, SinkCall, events::PropKey};

use crate::helpers::{register_user, test_app};

#[test]
fn appended_events_get_sequential_ids_and_clock_timestamps() {
    let t = test_app();
    t.clock.set(5_000);
    t.app
        .ledger()
        .record(EventName::LoginPageViewed, Properties::new())
        .unwrap();
    t.app
        .ledger()
        .record(EventName::HomePageViewed, Properties::new())
        .unwrap();

    let events = t.app.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].id, 1);
    assert_eq!(events[1].id, 2);
    assert!(events[0].ts >= 5_000);
    assert!(events[1].ts > events[0].ts);
}

#[test]
fn every_event_reaches_the_sink() {
    let t = test_app();
    t.app
        .ledger()
        .record(
            EventName::PageViewed,
            Properties::new().with_str(PropKey::Page, "home"),
        )
        .unwrap();

    assert_eq!(t.sink.tracked(), vec![EventName::PageViewed]);
    let calls = t.sink.calls();
    let SinkCall::Track(_, props) = &calls[0] else {
        panic!("expected a track call, got {:?}", calls[0]);
    };
    assert_eq!(props.str_value(PropKey::Page), Some("home"));
}

#[test]
fn events_carry_the_signed_in_actor_and_session() {
    let t = test_app();
    register_user(&t.app, "Ada", "ada@example.com", "QA", "s3cret");
    t.app.auth().login("ada@example.com", "s3cret").unwrap();
    t.sink.clear();

    t.app
        .ledger()
        .record(EventName::HomePageViewed, Properties::new())
        .unwrap();

    let last = t.app.events().pop().unwrap();
    assert_eq!(last.user.as_deref(), Some("ada@example.com"));
    assert_eq!(last.session_id, t.app.sessions().current_session_id());
}

#[test]
fn anonymous_events_fall_back_to_the_email_property() {
    let t = test_app();
    t.app
        .ledger()
        .record(
            EventName::LoginAttempted,
            Properties::new().with_str(PropKey::Email, "ghost@example.com"),
        )
        .unwrap();

    let last = t.app.events().pop().unwrap();
    assert_eq!(last.user.as_deref(), Some("ghost@example.com"));
    assert_eq!(last.session_id, None);
    assert_eq!(last.actor(), Some("ghost@example.com"));
}

#[test]
fn events_survive_a_corrupt_ledger() {
    use teamdesk::{Storage, constants::EVENT_LEDGER_KEY};

    let t = test_app();
    t.storage.set(EVENT_LEDGER_KEY, "{definitely not json").unwrap();

    t.app
        .ledger()
        .record(EventName::HomePageViewed, Properties::new())
        .unwrap();

    // The corrupt collection healed to empty before the append.
    let events = t.app.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].id, 1);
    // The sink was still called even though the local state was damaged.
    assert!(t.sink.calls().iter().any(|c| matches!(c, SinkCall::Track(..))));
}
