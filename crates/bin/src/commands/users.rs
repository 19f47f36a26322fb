//! User directory commands.

use teamdesk::{
    App, EventName,
    directory::{GroupFilter, UserPatch},
};

use crate::cli::{UsersAddArgs, UsersIdArg, UsersListArgs, UsersUpdateArgs};
use crate::commands::require_login;
use crate::output::{OutputFormat, print_table};

type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Run the `users list` command
pub fn list(app: &App, args: &UsersListArgs, format: OutputFormat) -> CommandResult {
    require_login(app)?;
    // The grouped list is the home surface.
    app.ledger().record(EventName::HomePageViewed, Default::default())?;

    let filter = GroupFilter::parse(&args.group);
    // Each invocation starts from the ALL selection, so narrowing via
    // --group records the filter change; set_filter skips the event when
    // the selection is unchanged.
    app.directory().set_filter(&GroupFilter::All, &filter)?;
    let buckets = app.directory().grouped(&filter);

    match format {
        OutputFormat::Human => {
            if buckets.is_empty() {
                println!("No users match.");
                return Ok(());
            }
            for (group, entries) in &buckets {
                println!("{group}");
                let rows: Vec<Vec<String>> = entries
                    .iter()
                    .map(|e| vec![e.id.to_string(), e.name.clone(), e.email.clone()])
                    .collect();
                print_table(&["ID", "NAME", "EMAIL"], &rows);
                println!();
            }
        }
        OutputFormat::Json => {
            let entries: Vec<_> = buckets
                .iter()
                .flat_map(|(group, entries)| {
                    entries.iter().map(move |e| {
                        serde_json::json!({
                            "id": e.id,
                            "name": e.name,
                            "email": e.email,
                            "group": group,
                        })
                    })
                })
                .collect();
            println!("{}", serde_json::to_string(&entries)?);
        }
    }
    Ok(())
}

/// Run the `users add` command
pub fn add(app: &App, args: &UsersAddArgs) -> CommandResult {
    require_login(app)?;
    let entry = app.directory().add(&args.name, &args.email, &args.group)?;
    println!("Added {} as #{}.", entry.email, entry.id);
    Ok(())
}

/// Run the `users update` command
pub fn update(app: &App, args: &UsersUpdateArgs) -> CommandResult {
    require_login(app)?;
    let patch = UserPatch {
        name: args.name.clone(),
        email: args.email.clone(),
        group: args.group.clone(),
    };
    match app.directory().update(args.id, patch)? {
        Some(entry) => {
            println!("Updated #{}: {} <{}>", entry.id, entry.name, entry.email);
            Ok(())
        }
        None => Err(format!("no user with id {}", args.id).into()),
    }
}

/// Run the `users remove` command
pub fn remove(app: &App, args: &UsersIdArg) -> CommandResult {
    require_login(app)?;
    match app.directory().remove(args.id)? {
        Some(entry) => {
            println!("Removed {}.", entry.email);
            Ok(())
        }
        None => Err(format!("no user with id {}", args.id).into()),
    }
}

/// Run the `users view` command
pub fn view(app: &App, args: &UsersIdArg, format: OutputFormat) -> CommandResult {
    require_login(app)?;
    match app.directory().view(args.id)? {
        Some(entry) => {
            match format {
                OutputFormat::Human => {
                    let group = if entry.group.is_empty() {
                        "Unassigned"
                    } else {
                        entry.group.as_str()
                    };
                    println!("#{}  {}  <{}>  {}", entry.id, entry.name, entry.email, group);
                }
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::json!({
                            "id": entry.id,
                            "name": entry.name,
                            "email": entry.email,
                            "group": entry.group,
                        })
                    );
                }
            }
            Ok(())
        }
        None => Err(format!("no user with id {}", args.id).into()),
    }
}
