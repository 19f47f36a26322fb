use teamdesk::{
    EventName,
    directory::{GroupFilter, UserPatch},
    events::PropKey,
};

use crate::helpers::{register_user, test_app};

#[test]
fn crud_operations_emit_their_events_in_order() {
    let t = test_app();
    let dir = t.app.directory();

    let ada = dir.add("Ada", "ada@example.com", "QA").unwrap();
    dir.view(ada.id).unwrap().unwrap();
    dir.update(
        ada.id,
        UserPatch {
            group: Some("Design".to_string()),
            ..Default::default()
        },
    )
    .unwrap()
    .unwrap();
    dir.remove(ada.id).unwrap().unwrap();

    let names: Vec<EventName> = t.app.events().into_iter().map(|e| e.event).collect();
    assert_eq!(
        names,
        vec![
            EventName::UserCreated,
            EventName::UserViewed,
            EventName::UserUpdated,
            EventName::UserDeleted,
        ]
    );
}

#[test]
fn update_event_carries_pre_edit_email_and_new_group() {
    let t = test_app();
    let dir = t.app.directory();
    let entry = dir.add("Ada", "old@example.com", "QA").unwrap();

    dir.update(
        entry.id,
        UserPatch {
            email: Some("new@example.com".to_string()),
            group: Some("Design".to_string()),
            ..Default::default()
        },
    )
    .unwrap()
    .unwrap();

    let updated = t
        .app
        .events()
        .into_iter()
        .find(|e| e.event == EventName::UserUpdated)
        .unwrap();
    assert_eq!(
        updated.properties.str_value(PropKey::Email),
        Some("old@example.com")
    );
    assert_eq!(updated.properties.str_value(PropKey::Group), Some("Design"));
}

#[test]
fn directory_mutations_attribute_to_the_signed_in_user() {
    let t = test_app();
    register_user(&t.app, "Admin", "admin@example.com", "Ops", "s3cret");
    t.app.auth().login("admin@example.com", "s3cret").unwrap();

    t.app.directory().add("New", "new@example.com", "").unwrap();

    let created = t
        .app
        .events()
        .into_iter()
        .find(|e| e.event == EventName::UserCreated)
        .unwrap();
    // The actor is the admin, not the user named in the properties.
    assert_eq!(created.user.as_deref(), Some("admin@example.com"));
    assert_eq!(
        created.properties.str_value(PropKey::Email),
        Some("new@example.com")
    );
}

#[test]
fn filter_change_result_count_reflects_the_new_filter() {
    let t = test_app();
    let dir = t.app.directory();
    dir.add("A", "a@example.com", "QA").unwrap();
    dir.add("B", "b@example.com", "QA").unwrap();
    dir.add("C", "c@example.com", "Design").unwrap();

    let count = dir
        .set_filter(&GroupFilter::All, &GroupFilter::parse("QA"))
        .unwrap();
    assert_eq!(count, 2);

    let event = t
        .app
        .events()
        .into_iter()
        .find(|e| e.event == EventName::GroupFilterChanged)
        .unwrap();
    assert_eq!(event.properties.str_value(PropKey::FilterFrom), Some("ALL"));
    assert_eq!(event.properties.str_value(PropKey::FilterTo), Some("QA"));
}

#[test]
fn grouped_view_through_the_app_facade() {
    let t = test_app();
    let dir = t.app.directory();
    dir.add("A", "a@example.com", "QA").unwrap();
    dir.add("B", "b@example.com", "").unwrap();

    let buckets = t.app.grouped_users(&GroupFilter::All);
    assert_eq!(buckets.len(), 2);
    assert_eq!(buckets[0].0, "QA");
    assert_eq!(buckets[1].0, "Unassigned");
}
