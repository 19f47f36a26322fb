use teamdesk::{
    EventName, Properties,
    analytics::ExplorerQuery,
    directory::GroupFilter,
};

use crate::helpers::{register_user, test_app};

#[test]
fn dashboard_funnels_reflect_the_full_login_story() {
    let t = test_app();
    register_user(&t.app, "Ada", "ada@example.com", "QA", "s3cret");

    t.app.auth().login("ada@example.com", "nope").unwrap();
    t.app.auth().login("missing@example.com", "nope").unwrap();
    t.app.auth().login("ada@example.com", "s3cret").unwrap();

    let dashboard = t.app.dashboard();
    let [attempted, succeeded, failed] = dashboard.login_funnel;
    assert_eq!(attempted.label, "Attempted");
    assert_eq!(attempted.value, 3);
    assert_eq!(succeeded.value, 1);
    assert_eq!(failed.value, 2);

    // One registration, all of it clean.
    assert_eq!(dashboard.registration_funnel[1].value, 1);
    assert_eq!(dashboard.registration_funnel[2].value, 1);
    assert_eq!(dashboard.registration_funnel[0].value, 0);
}

#[test]
fn dashboard_group_counts_resolve_actors_through_the_user_list() {
    let t = test_app();
    register_user(&t.app, "Ada", "ada@example.com", "QA", "s3cret");
    t.app.auth().login("ada@example.com", "s3cret").unwrap();
    t.app
        .ledger()
        .record(EventName::HomePageViewed, Properties::new())
        .unwrap();

    let dashboard = t.app.dashboard();
    assert!(dashboard.group_counts["QA"] > 0);
    assert!(dashboard.group_options.contains(&"QA".to_string()));
}

#[test]
fn dashboard_is_a_pure_read() {
    let t = test_app();
    register_user(&t.app, "Ada", "ada@example.com", "QA", "s3cret");

    let before = t.app.events().len();
    let first = t.app.dashboard();
    let second = t.app.dashboard();
    assert_eq!(first, second);
    assert_eq!(t.app.events().len(), before, "aggregation must not write");
}

#[test]
fn explorer_returns_newest_first_and_filters_by_group() {
    let t = test_app();
    // An anonymous page view before anyone exists: no actor, no group.
    t.app
        .ledger()
        .record(EventName::LoginPageViewed, Properties::new())
        .unwrap();
    register_user(&t.app, "Ada", "ada@example.com", "QA", "s3cret");
    t.app.auth().login("ada@example.com", "s3cret").unwrap();
    t.app
        .ledger()
        .record(EventName::HomePageViewed, Properties::new())
        .unwrap();

    let all = t.app.explore(&ExplorerQuery::default());
    assert_eq!(all.total, all.rows.len());
    assert!(
        all.rows.windows(2).all(|w| w[0].record.ts >= w[1].record.ts),
        "rows must be ordered newest first"
    );

    let qa = t.app.explore(&ExplorerQuery {
        group: GroupFilter::Group("QA".to_string()),
        search: String::new(),
    });
    assert!(!qa.rows.is_empty());
    assert!(qa.rows.iter().all(|r| r.group.as_deref() == Some("QA")));
    assert!(qa.total < all.total, "anonymous events resolve to no group");
}

#[test]
fn explorer_search_matches_event_names_case_insensitively() {
    let t = test_app();
    register_user(&t.app, "Ada", "ada@example.com", "QA", "s3cret");

    let hits = t.app.explore(&ExplorerQuery {
        group: GroupFilter::All,
        search: "registration".to_string(),
    });
    assert!(!hits.rows.is_empty());
    assert!(
        hits.rows
            .iter()
            .all(|r| r.record.event.as_str().to_lowercase().contains("registration"))
    );
}

#[test]
fn watcher_reports_only_real_changes() {
    let t = test_app();
    let mut watcher = t.app.watcher();

    // First poll always reports, even over an empty store.
    assert!(watcher.poll().is_some());
    assert!(watcher.poll().is_none());

    t.app
        .ledger()
        .record(EventName::LoginPageViewed, Properties::new())
        .unwrap();
    let snapshot = watcher.poll().unwrap();
    assert_eq!(snapshot.events.len(), 1);
    assert!(watcher.poll().is_none());

    // A user-list change alone also triggers a refresh.
    register_user(&t.app, "Ada", "ada@example.com", "QA", "s3cret");
    let snapshot = watcher.poll().unwrap();
    assert_eq!(snapshot.users.len(), 1);
}

#[test]
fn page_view_counts_split_per_surface() {
    let t = test_app();
    let ledger = t.app.ledger();
    ledger.record(EventName::LoginPageViewed, Properties::new()).unwrap();
    ledger.record(EventName::LoginPageViewed, Properties::new()).unwrap();
    ledger.record(EventName::HomePageViewed, Properties::new()).unwrap();

    let dashboard = t.app.dashboard();
    assert_eq!(dashboard.page_views[0].value, 2); // Login Page
    assert_eq!(dashboard.page_views[1].value, 0); // Register Page
    assert_eq!(dashboard.page_views[2].value, 1); // Home Page
}
