//! The user directory: CRUD over the `users` collection and grouped views.
//!
//! Stored records carry the domain fields only (`name`, `email`, `password`,
//! `group`). What the presentation layer sees is a projection: display ids
//! are the 1-based position in the current list, recomputed on every load and
//! mutation, and deliberately not stable across deletions.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    constants::{DEFAULT_PASSWORD, UNASSIGNED_GROUP, USERS_KEY},
    events::{EventName, PropKey, Properties},
    ledger::EventLedger,
    storage::{Storage, read_json, write_json},
};

/// A persisted user record.
///
/// All fields default so partially-written records still load; the plaintext
/// password is part of the demo, not an oversight.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub group: String,
}

/// A directory row as presented: a display id plus the non-secret fields.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectoryEntry {
    /// 1-based position in the current list. Recomputed on every mutation.
    pub id: usize,
    pub name: String,
    pub email: String,
    pub group: String,
}

/// Patch applied by a directory edit; `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub name: Option<String>,
    pub email: Option<String>,
    pub group: Option<String>,
}

/// Group selector value: everything, or one exact group name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GroupFilter {
    #[default]
    All,
    Group(String),
}

impl GroupFilter {
    /// Parse a selector value; the literal `ALL` means no filtering.
    pub fn parse(value: &str) -> Self {
        if value == "ALL" {
            GroupFilter::All
        } else {
            GroupFilter::Group(value.to_string())
        }
    }

    pub fn matches(&self, group: &str) -> bool {
        match self {
            GroupFilter::All => true,
            GroupFilter::Group(name) => group == name,
        }
    }
}

impl fmt::Display for GroupFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupFilter::All => f.write_str("ALL"),
            GroupFilter::Group(name) => f.write_str(name),
        }
    }
}

/// Tolerant load of the raw user collection.
pub fn load_users(storage: &dyn Storage) -> Vec<UserRecord> {
    read_json(storage, USERS_KEY).unwrap_or_default()
}

/// Persist the user collection, defaulting absent passwords to the sentinel.
pub(crate) fn save_users(storage: &dyn Storage, users: &[UserRecord]) -> Result<()> {
    let normalized: Vec<UserRecord> = users
        .iter()
        .map(|u| UserRecord {
            name: u.name.clone(),
            email: u.email.clone(),
            password: if u.password.is_empty() {
                DEFAULT_PASSWORD.to_string()
            } else {
                u.password.clone()
            },
            group: u.group.clone(),
        })
        .collect();
    write_json(storage, USERS_KEY, &normalized)
}

/// CRUD and grouped views over the user collection.
#[derive(Clone)]
pub struct UserDirectory {
    storage: Arc<dyn Storage>,
    ledger: EventLedger,
}

impl UserDirectory {
    pub fn new(storage: Arc<dyn Storage>, ledger: EventLedger) -> Self {
        Self { storage, ledger }
    }

    /// The current list as presented: normalized fields, 1-based display ids.
    pub fn list(&self) -> Vec<DirectoryEntry> {
        project(&load_users(&*self.storage))
    }

    /// Appends a user (password defaults to the sentinel) and emits
    /// `User Created`.
    pub fn add(&self, name: &str, email: &str, group: &str) -> Result<DirectoryEntry> {
        let mut users = load_users(&*self.storage);
        users.push(UserRecord {
            name: name.to_string(),
            email: email.to_string(),
            password: String::new(),
            group: group.to_string(),
        });
        save_users(&*self.storage, &users)?;
        self.ledger.record(
            EventName::UserCreated,
            Properties::new()
                .with_str(PropKey::Email, email)
                .with_str(PropKey::Group, group),
        )?;
        let entries = project(&users);
        Ok(entries
            .last()
            .cloned()
            .unwrap_or(DirectoryEntry {
                id: users.len(),
                name: name.to_string(),
                email: email.to_string(),
                group: group.to_string(),
            }))
    }

    /// Applies a patch to the row at the given display id and emits
    /// `User Updated` carrying the pre-edit email and the new group.
    ///
    /// Returns `None` when no row has that id.
    pub fn update(&self, id: usize, patch: UserPatch) -> Result<Option<DirectoryEntry>> {
        let mut users = load_users(&*self.storage);
        let Some(index) = id.checked_sub(1).filter(|i| *i < users.len()) else {
            return Ok(None);
        };
        let previous_email = users[index].email.clone();
        if let Some(name) = patch.name {
            users[index].name = name;
        }
        if let Some(email) = patch.email {
            users[index].email = email;
        }
        if let Some(group) = patch.group {
            users[index].group = group;
        }
        let new_group = users[index].group.clone();
        save_users(&*self.storage, &users)?;
        self.ledger.record(
            EventName::UserUpdated,
            Properties::new()
                .with_str(PropKey::Email, previous_email)
                .with_str(PropKey::Group, new_group),
        )?;
        Ok(project(&users).into_iter().nth(index))
    }

    /// Removes the row at the given display id and emits `User Deleted`.
    /// Display ids of the remaining rows are recomputed.
    pub fn remove(&self, id: usize) -> Result<Option<DirectoryEntry>> {
        let mut users = load_users(&*self.storage);
        let Some(index) = id.checked_sub(1).filter(|i| *i < users.len()) else {
            return Ok(None);
        };
        let removed = project(&users).into_iter().nth(index);
        users.remove(index);
        save_users(&*self.storage, &users)?;
        if let Some(entry) = &removed {
            self.ledger.record(
                EventName::UserDeleted,
                Properties::new()
                    .with_str(PropKey::Email, entry.email.clone())
                    .with_str(PropKey::Group, entry.group.clone()),
            )?;
        }
        Ok(removed)
    }

    /// Looks up a row and emits `User Viewed`.
    pub fn view(&self, id: usize) -> Result<Option<DirectoryEntry>> {
        let entry = self.list().into_iter().find(|e| e.id == id);
        if let Some(entry) = &entry {
            self.ledger.record(
                EventName::UserViewed,
                Properties::new()
                    .with_str(PropKey::Email, entry.email.clone())
                    .with_str(PropKey::Group, entry.group.clone()),
            )?;
        }
        Ok(entry)
    }

    /// Distinct non-empty group names present in the list, sorted.
    /// Independent of any filter selection.
    pub fn group_options(&self) -> Vec<String> {
        let mut options: Vec<String> = self
            .list()
            .into_iter()
            .map(|e| e.group)
            .filter(|g| !g.is_empty())
            .collect();
        options.sort();
        options.dedup();
        options
    }

    /// Applies the filter, then partitions by group with the "Unassigned"
    /// bucket for empty groups. Buckets appear in first-encounter order and
    /// preserve list order within.
    pub fn grouped(&self, filter: &GroupFilter) -> Vec<(String, Vec<DirectoryEntry>)> {
        let mut buckets: Vec<(String, Vec<DirectoryEntry>)> = Vec::new();
        for entry in self.list() {
            if !filter.matches(&entry.group) {
                continue;
            }
            let key = if entry.group.is_empty() {
                UNASSIGNED_GROUP.to_string()
            } else {
                entry.group.clone()
            };
            match buckets.iter_mut().find(|(name, _)| *name == key) {
                Some((_, bucket)) => bucket.push(entry),
                None => buckets.push((key, vec![entry])),
            }
        }
        buckets
    }

    /// Records a filter change (no event when the selection is unchanged)
    /// and returns the resulting row count under the new filter.
    pub fn set_filter(&self, from: &GroupFilter, to: &GroupFilter) -> Result<usize> {
        let count = self
            .list()
            .into_iter()
            .filter(|e| to.matches(&e.group))
            .count();
        if from != to {
            self.ledger.record(
                EventName::GroupFilterChanged,
                Properties::new()
                    .with_str(PropKey::FilterFrom, from.to_string())
                    .with_str(PropKey::FilterTo, to.to_string())
                    .with_count(PropKey::ResultCount, count as u64),
            )?;
        }
        Ok(count)
    }
}

/// Projects raw records into presentation rows: 1-based display ids, name
/// derived from the email local-part when missing.
fn project(users: &[UserRecord]) -> Vec<DirectoryEntry> {
    users
        .iter()
        .enumerate()
        .map(|(index, u)| DirectoryEntry {
            id: index + 1,
            name: if !u.name.is_empty() {
                u.name.clone()
            } else if let Some((local, _)) = u.email.split_once('@') {
                local.to_string()
            } else {
                "User".to_string()
            },
            email: u.email.clone(),
            group: u.group.clone(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{clock::FixedClock, sink::NoopSink, storage::InMemory};

    fn directory() -> (Arc<InMemory>, UserDirectory) {
        let storage = Arc::new(InMemory::new());
        let ledger = EventLedger::new(
            storage.clone(),
            Arc::new(FixedClock::new(1000)),
            Arc::new(NoopSink),
        );
        (storage.clone(), UserDirectory::new(storage, ledger))
    }

    fn seed(storage: &InMemory, records: &str) {
        storage.set(USERS_KEY, records).unwrap();
    }

    #[test]
    fn projection_normalizes_missing_fields() {
        let (storage, dir) = directory();
        seed(
            &storage,
            r#"[{"email":"ada@x.com","password":"pw"},{"name":"","email":"","group":""}]"#,
        );
        let entries = dir.list();
        assert_eq!(entries[0].id, 1);
        assert_eq!(entries[0].name, "ada");
        assert_eq!(entries[1].name, "User");
        assert_eq!(entries[1].email, "");
    }

    #[test]
    fn display_ids_recompute_after_remove() {
        let (storage, dir) = directory();
        seed(
            &storage,
            r#"[{"name":"A","email":"a@x.com","password":"p","group":"QA"},
               {"name":"B","email":"b@x.com","password":"p","group":"QA"},
               {"name":"C","email":"c@x.com","password":"p","group":""}]"#,
        );
        let removed = dir.remove(2).unwrap().unwrap();
        assert_eq!(removed.email, "b@x.com");
        let entries = dir.list();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1].email, "c@x.com");
        assert_eq!(entries[1].id, 2);
    }

    #[test]
    fn remove_out_of_range_is_none() {
        let (_, dir) = directory();
        assert_eq!(dir.remove(1).unwrap(), None);
        assert_eq!(dir.update(0, UserPatch::default()).unwrap(), None);
    }

    #[test]
    fn add_defaults_password_to_sentinel() {
        let (storage, dir) = directory();
        dir.add("Ada", "ada@x.com", "QA").unwrap();
        let users = load_users(&*storage);
        assert_eq!(users[0].password, DEFAULT_PASSWORD);
    }

    #[test]
    fn update_preserves_existing_password() {
        let (storage, dir) = directory();
        seed(
            &storage,
            r#"[{"name":"A","email":"a@x.com","password":"secret99","group":"QA"}]"#,
        );
        dir.update(
            1,
            UserPatch {
                group: Some("Design".to_string()),
                ..Default::default()
            },
        )
        .unwrap()
        .unwrap();
        let users = load_users(&*storage);
        assert_eq!(users[0].password, "secret99");
        assert_eq!(users[0].group, "Design");
    }

    #[test]
    fn grouped_partitions_with_unassigned_bucket() {
        let (storage, dir) = directory();
        seed(
            &storage,
            r#"[{"name":"A","email":"a@x.com","password":"p","group":"QA"},
               {"name":"B","email":"b@x.com","password":"p","group":""},
               {"name":"C","email":"c@x.com","password":"p","group":"QA"}]"#,
        );
        let buckets = dir.grouped(&GroupFilter::All);
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].0, "QA");
        assert_eq!(buckets[0].1.len(), 2);
        assert_eq!(buckets[1].0, UNASSIGNED_GROUP);

        let qa_only = dir.grouped(&GroupFilter::Group("QA".to_string()));
        assert_eq!(qa_only.len(), 1);
        assert_eq!(qa_only[0].1.len(), 2);
    }

    #[test]
    fn group_options_are_distinct_sorted_and_ignore_filter() {
        let (storage, dir) = directory();
        seed(
            &storage,
            r#"[{"name":"A","email":"a@x.com","password":"p","group":"QA"},
               {"name":"B","email":"b@x.com","password":"p","group":"Design"},
               {"name":"C","email":"c@x.com","password":"p","group":"QA"},
               {"name":"D","email":"d@x.com","password":"p","group":""}]"#,
        );
        assert_eq!(dir.group_options(), vec!["Design", "QA"]);
    }

    #[test]
    fn set_filter_emits_event_only_on_change() {
        let (storage, dir) = directory();
        seed(
            &storage,
            r#"[{"name":"A","email":"a@x.com","password":"p","group":"QA"}]"#,
        );
        let count = dir
            .set_filter(&GroupFilter::All, &GroupFilter::Group("QA".to_string()))
            .unwrap();
        assert_eq!(count, 1);
        let same = dir.set_filter(&GroupFilter::All, &GroupFilter::All).unwrap();
        assert_eq!(same, 1);

        let events = dir.ledger.events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event, EventName::GroupFilterChanged);
        assert_eq!(events[0].properties.str_value(PropKey::FilterFrom), Some("ALL"));
        assert_eq!(events[0].properties.str_value(PropKey::FilterTo), Some("QA"));
    }
}
