//! The raw-event explorer.
//!
//! Filters the ledger by resolved actor group and by case-insensitive
//! substring on the event name, newest first. The displayed rows are capped
//! at [`EXPLORER_ROW_CAP`], while `total` reports the match count before
//! truncation.

use crate::{
    constants::EXPLORER_ROW_CAP,
    directory::{GroupFilter, UserRecord},
    events::{EventRecord, PropKey},
};

/// Filter state for the explorer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExplorerQuery {
    pub group: GroupFilter,
    /// Case-insensitive substring matched against the event name.
    /// Empty matches everything.
    pub search: String,
}

/// One displayed row: the raw record plus its resolved actor and group.
#[derive(Debug, Clone, PartialEq)]
pub struct ExplorerRow {
    pub record: EventRecord,
    pub actor: Option<String>,
    pub group: Option<String>,
}

/// The filtered view.
#[derive(Debug, Clone, PartialEq)]
pub struct ExplorerView {
    /// Matches, sorted by timestamp descending, capped at
    /// [`EXPLORER_ROW_CAP`].
    pub rows: Vec<ExplorerRow>,
    /// Match count before the cap.
    pub total: usize,
}

/// Applies the query to the ledger. Pure: repeated application of the same
/// query yields the same view.
pub fn explore(
    events: &[EventRecord],
    users: &[UserRecord],
    query: &ExplorerQuery,
) -> ExplorerView {
    let term = query.search.to_lowercase();

    let mut rows: Vec<ExplorerRow> = events
        .iter()
        .filter_map(|record| {
            let actor = record.actor().map(|a| a.to_string());
            let group = resolve_group(record, users);
            let group_ok = match &query.group {
                GroupFilter::All => true,
                GroupFilter::Group(name) => group.as_deref() == Some(name.as_str()),
            };
            if !group_ok {
                return None;
            }
            if !term.is_empty() && !record.event.as_str().to_lowercase().contains(&term) {
                return None;
            }
            Some(ExplorerRow {
                record: record.clone(),
                actor,
                group,
            })
        })
        .collect();

    let total = rows.len();
    // Stable sort keeps insertion order for identical timestamps.
    rows.sort_by(|a, b| b.record.ts.cmp(&a.record.ts));
    rows.truncate(EXPLORER_ROW_CAP);

    ExplorerView { rows, total }
}

/// Actor group: the user list wins (empty group counts as unresolved), then
/// the event's own group property.
fn resolve_group(record: &EventRecord, users: &[UserRecord]) -> Option<String> {
    let from_users = record.actor().and_then(|actor| {
        users
            .iter()
            .find(|u| u.email == actor)
            .map(|u| u.group.as_str())
            .filter(|g| !g.is_empty())
    });
    from_users
        .or_else(|| record.properties.non_empty_str(PropKey::Group))
        .map(|g| g.to_string())
}
