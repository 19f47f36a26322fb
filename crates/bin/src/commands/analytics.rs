//! Dashboard and event-explorer commands.

use std::thread;

use teamdesk::{
    App,
    analytics::ExplorerQuery,
    constants::POLL_INTERVAL,
    directory::GroupFilter,
};

use crate::cli::EventsArgs;
use crate::commands::require_login;
use crate::output::{OutputFormat, format_ts, print_table};

type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Run the `analytics dashboard` command
pub fn dashboard(app: &App, format: OutputFormat) -> CommandResult {
    require_login(app)?;
    let dashboard = app.dashboard();

    match format {
        OutputFormat::Human => {
            println!("Login funnel");
            let rows: Vec<Vec<String>> = dashboard
                .login_funnel
                .iter()
                .map(|s| vec![s.label.to_string(), s.value.to_string()])
                .collect();
            print_table(&["STEP", "COUNT"], &rows);

            println!("\nRegistration funnel");
            let rows: Vec<Vec<String>> = dashboard
                .registration_funnel
                .iter()
                .map(|s| vec![s.label.to_string(), s.value.to_string()])
                .collect();
            print_table(&["STEP", "COUNT"], &rows);

            println!("\nUser management");
            let rows: Vec<Vec<String>> = dashboard
                .user_management
                .iter()
                .map(|s| vec![s.label.to_string(), s.value.to_string()])
                .collect();
            print_table(&["ACTION", "COUNT"], &rows);

            println!("\nPage views");
            let rows: Vec<Vec<String>> = dashboard
                .page_views
                .iter()
                .map(|s| vec![s.label.to_string(), s.value.to_string()])
                .collect();
            print_table(&["PAGE", "COUNT"], &rows);

            if !dashboard.group_counts.is_empty() {
                println!("\nActivity by group");
                let rows: Vec<Vec<String>> = dashboard
                    .group_counts
                    .iter()
                    .map(|(group, count)| vec![group.clone(), count.to_string()])
                    .collect();
                print_table(&["GROUP", "EVENTS"], &rows);
            }
        }
        OutputFormat::Json => {
            let funnel = |steps: &[teamdesk::analytics::CountedStep]| {
                steps
                    .iter()
                    .map(|s| serde_json::json!({ "label": s.label, "value": s.value }))
                    .collect::<Vec<_>>()
            };
            println!(
                "{}",
                serde_json::json!({
                    "loginFunnel": funnel(&dashboard.login_funnel),
                    "registrationFunnel": funnel(&dashboard.registration_funnel),
                    "userManagement": funnel(&dashboard.user_management),
                    "pageViews": funnel(&dashboard.page_views),
                    "groupCounts": dashboard.group_counts,
                    "groupOptions": dashboard.group_options,
                })
            );
        }
    }
    Ok(())
}

/// Run the `analytics events` command
pub fn events(app: &App, args: &EventsArgs, format: OutputFormat) -> CommandResult {
    require_login(app)?;
    let query = ExplorerQuery {
        group: GroupFilter::parse(&args.group),
        search: args.search.clone(),
    };
    let view = app.explore(&query);

    match format {
        OutputFormat::Human => {
            if view.rows.is_empty() {
                println!("No matching events.");
                return Ok(());
            }
            let rows: Vec<Vec<String>> = view
                .rows
                .iter()
                .map(|row| {
                    vec![
                        row.record.id.to_string(),
                        format_ts(row.record.ts),
                        row.record.event.to_string(),
                        row.actor.clone().unwrap_or_else(|| "-".to_string()),
                        row.group.clone().unwrap_or_else(|| "-".to_string()),
                    ]
                })
                .collect();
            print_table(&["ID", "TIME", "EVENT", "ACTOR", "GROUP"], &rows);
            if view.total > view.rows.len() {
                println!("({} of {} matches shown)", view.rows.len(), view.total);
            }
        }
        OutputFormat::Json => {
            let rows: Vec<_> = view
                .rows
                .iter()
                .map(|row| {
                    serde_json::json!({
                        "id": row.record.id,
                        "ts": row.record.ts,
                        "event": row.record.event.as_str(),
                        "actor": row.actor,
                        "group": row.group,
                    })
                })
                .collect();
            println!(
                "{}",
                serde_json::json!({ "rows": rows, "total": view.total })
            );
        }
    }
    Ok(())
}

/// Run the `analytics watch` command
///
/// Reloads the snapshot file at the refresh interval and prints events as
/// they land. Runs until interrupted; never writes to the store itself.
pub fn watch(
    app: &App,
    store: &teamdesk::InMemory,
    data_file: &std::path::Path,
) -> CommandResult {
    require_login(app)?;
    let mut watcher = app.watcher();
    let mut seen = 0usize;

    println!("Watching {} (Ctrl-C to stop)", data_file.display());
    loop {
        store.reload_from_file(data_file)?;
        if let Some(snapshot) = watcher.poll() {
            // The cap can shrink the ledger between polls; only print the
            // tail that is genuinely new.
            if snapshot.events.len() > seen {
                for event in &snapshot.events[seen..] {
                    println!(
                        "{}  {}  {}",
                        format_ts(event.ts),
                        event.event,
                        event.actor().unwrap_or("-")
                    );
                }
            }
            seen = snapshot.events.len();
        }
        thread::sleep(POLL_INTERVAL);
    }
}
