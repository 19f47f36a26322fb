//! Derived dashboard aggregates.
//!
//! Everything here is a pure function of the event ledger and the user list:
//! identical inputs always produce identical output, so callers are free to
//! memoize and the watcher only recomputes when a poll reports a change.

use std::collections::BTreeMap;

use crate::{
    constants::UNASSIGNED_GROUP,
    directory::UserRecord,
    events::{EventName, EventRecord, PropKey},
};

/// One labeled count in a scenario view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CountedStep {
    pub label: &'static str,
    pub value: u64,
}

/// The full set of derived aggregates for the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
    /// Occurrences per event name.
    pub event_counts: BTreeMap<EventName, u64>,
    /// Users per group, with the "Unassigned" bucket for empty groups.
    pub group_counts: BTreeMap<String, u64>,
    /// Sorted distinct groups observed on a user record or resolved for an
    /// event's actor. Populates the explorer's group selector.
    pub group_options: Vec<String>,
    /// Login funnel: Attempted / Succeeded / Failed.
    pub login_funnel: [CountedStep; 3],
    /// Registration funnel: Validation Failed / Attempted / Succeeded / Failed.
    pub registration_funnel: [CountedStep; 4],
    /// User-management summary.
    pub user_management: [CountedStep; 6],
    /// Per-page view counts.
    pub page_views: [CountedStep; 3],
}

/// Computes the dashboard aggregates from the current ledger and user list.
pub fn dashboard(events: &[EventRecord], users: &[UserRecord]) -> Dashboard {
    let mut event_counts: BTreeMap<EventName, u64> = BTreeMap::new();
    for record in events {
        *event_counts.entry(record.event).or_insert(0) += 1;
    }
    let get = |name: EventName| event_counts.get(&name).copied().unwrap_or(0);

    let mut group_counts: BTreeMap<String, u64> = BTreeMap::new();
    let mut group_set: BTreeMap<String, ()> = BTreeMap::new();
    for user in users {
        let bucket = if user.group.is_empty() {
            UNASSIGNED_GROUP.to_string()
        } else {
            user.group.clone()
        };
        *group_counts.entry(bucket).or_insert(0) += 1;
        if !user.group.is_empty() {
            group_set.insert(user.group.clone(), ());
        }
    }

    // Include groups referenced only by events: resolve each event's actor
    // against the user list, falling back to the event's group property.
    let email_to_group: BTreeMap<&str, &str> = users
        .iter()
        .map(|u| (u.email.as_str(), u.group.as_str()))
        .collect();
    for record in events {
        let resolved = record
            .actor()
            .and_then(|actor| email_to_group.get(actor).copied())
            .filter(|g| !g.is_empty())
            .or_else(|| record.properties.non_empty_str(PropKey::Group));
        if let Some(group) = resolved {
            group_set.insert(group.to_string(), ());
        }
    }
    let group_options: Vec<String> = group_set.into_keys().collect();

    let login_funnel = [
        CountedStep { label: "Attempted", value: get(EventName::LoginAttempted) },
        CountedStep { label: "Succeeded", value: get(EventName::LoginSucceeded) },
        CountedStep { label: "Failed", value: get(EventName::LoginFailed) },
    ];
    let registration_funnel = [
        CountedStep {
            label: "Validation Failed",
            value: get(EventName::RegistrationValidationFailed),
        },
        CountedStep { label: "Attempted", value: get(EventName::RegistrationAttempted) },
        CountedStep { label: "Succeeded", value: get(EventName::RegistrationSucceeded) },
        CountedStep { label: "Failed", value: get(EventName::RegistrationFailed) },
    ];
    let user_management = [
        CountedStep { label: "Session Loaded", value: get(EventName::UserSessionLoaded) },
        CountedStep { label: "Viewed", value: get(EventName::UserViewed) },
        CountedStep { label: "Created", value: get(EventName::UserCreated) },
        CountedStep { label: "Updated", value: get(EventName::UserUpdated) },
        CountedStep { label: "Deleted", value: get(EventName::UserDeleted) },
        CountedStep { label: "Filter Changed", value: get(EventName::GroupFilterChanged) },
    ];
    let page_views = [
        CountedStep { label: "Login Page", value: get(EventName::LoginPageViewed) },
        CountedStep { label: "Register Page", value: get(EventName::RegisterPageViewed) },
        CountedStep { label: "Home Page", value: get(EventName::HomePageViewed) },
    ];

    Dashboard {
        event_counts,
        group_counts,
        group_options,
        login_funnel,
        registration_funnel,
        user_management,
        page_views,
    }
}
