//! Demo-data seeding.
//!
//! Fills an empty-ish store with a plausible team and a page-view history so
//! the dashboard and explorer have something to show right away.

use rand::{Rng, seq::SliceRandom};
use teamdesk::{
    App, EventName, Properties, SystemClock,
    constants::SESSION_KEY,
    events::PropKey,
    session::{SessionRecord, composite_session_id},
};

use crate::cli::SeedArgs;

type CommandResult = Result<(), Box<dyn std::error::Error>>;

const DEMO_USERS: &[(&str, &str, &str)] = &[
    ("Ada Lovelace", "ada@teamdesk.test", "Engineering"),
    ("Grace Hopper", "grace@teamdesk.test", "Engineering"),
    ("Margaret Hamilton", "margaret@teamdesk.test", "QA"),
    ("Katherine Johnson", "katherine@teamdesk.test", "Design"),
    ("Dorothy Vaughan", "dorothy@teamdesk.test", "Sales"),
    ("Mary Jackson", "mary@teamdesk.test", ""),
    ("Radia Perlman", "radia@teamdesk.test", "Engineering"),
    ("Barbara Liskov", "barbara@teamdesk.test", "Design"),
];

const PAGE_EVENTS: &[EventName] = &[
    EventName::LoginPageViewed,
    EventName::RegisterPageViewed,
    EventName::HomePageViewed,
    EventName::HomePageViewed,
];

/// Run the `seed` command
pub fn seed(app: &App, args: &SeedArgs) -> CommandResult {
    let mut rng = rand::thread_rng();
    let directory = app.directory();
    let ledger = app.ledger();

    let before = directory.list().len();
    for (name, email, group) in DEMO_USERS.iter().take(args.users) {
        directory.add(name, email, group)?;
    }

    // Fake a historical session so the seeded events carry a session id,
    // then fold it away again so nobody appears signed in afterwards.
    let session = SessionRecord {
        id: composite_session_id(&SystemClock),
        started_at: 0,
    };
    teamdesk::storage::write_json(&*app.storage(), SESSION_KEY, &session)?;

    for _ in 0..args.events {
        let event = PAGE_EVENTS
            .choose(&mut rng)
            .copied()
            .unwrap_or(EventName::HomePageViewed);
        let mut properties = Properties::new();
        // Most traffic is attributable; some stays anonymous.
        if rng.gen_bool(0.8)
            && let Some((_, email, _)) = DEMO_USERS.choose(&mut rng)
        {
            properties = properties.with_str(PropKey::Email, *email);
        }
        ledger.record(event, properties)?;
    }
    app.sessions().end_session()?;

    println!(
        "Seeded {} users and {} events.",
        directory.list().len() - before,
        args.events
    );
    Ok(())
}
