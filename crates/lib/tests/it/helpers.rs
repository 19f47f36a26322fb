use std::sync::Arc;

use teamdesk::{App, FixedClock, RecordingSink, storage::InMemory};

/// An app over a fresh in-memory store with a deterministic clock and a
/// recording sink, plus handles to both for assertions.
pub struct TestApp {
    pub app: App,
    pub storage: Arc<InMemory>,
    pub clock: Arc<FixedClock>,
    pub sink: Arc<RecordingSink>,
}

pub fn test_app() -> TestApp {
    let storage = Arc::new(InMemory::new());
    let clock = Arc::new(FixedClock::default());
    let sink = Arc::new(RecordingSink::new());
    let app = App::with_parts(storage.clone(), clock.clone(), sink.clone());
    TestApp {
        app,
        storage,
        clock,
        sink,
    }
}

/// Registers a user through the normal flow, panicking on any non-success
/// outcome so tests fail loudly on bad fixtures.
pub fn register_user(app: &App, name: &str, email: &str, group: &str, password: &str) {
    match app.auth().register(name, email, group, password).unwrap() {
        teamdesk::auth::RegisterOutcome::Registered { .. } => {}
        other => panic!("fixture registration failed: {other:?}"),
    }
}
