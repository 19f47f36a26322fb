//! Teamdesk CLI entry point.
//!
//! Each invocation loads the record store from the snapshot file, runs one
//! command against the library, and writes the snapshot back. State between
//! invocations (who is signed in, the active session, the event ledger) lives
//! entirely in that file.

mod cli;
mod commands;
mod output;

use std::sync::Arc;

use clap::Parser;
use teamdesk::{App, storage::InMemory};
use tracing_subscriber::EnvFilter;

use cli::{AnalyticsCommand, Cli, Commands, UsersCommand};
use output::OutputFormat;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive("teamdesk=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let format = if cli.json {
        OutputFormat::Json
    } else {
        OutputFormat::Human
    };

    let store = Arc::new(InMemory::load_from_file(&cli.data_file)?);
    let app = App::new(store.clone());

    let result = match &cli.command {
        Commands::Login(args) => commands::auth::login(&app, args, format),
        Commands::Register(args) => commands::auth::register(&app, args, format),
        Commands::Logout => commands::auth::logout(&app),
        Commands::Whoami => commands::auth::whoami(&app, format),
        Commands::Passwd(args) => commands::auth::passwd(&app, args),
        Commands::Users(command) => match command {
            UsersCommand::List(args) => commands::users::list(&app, args, format),
            UsersCommand::Add(args) => commands::users::add(&app, args),
            UsersCommand::Update(args) => commands::users::update(&app, args),
            UsersCommand::Remove(args) => commands::users::remove(&app, args),
            UsersCommand::View(args) => commands::users::view(&app, args, format),
        },
        Commands::Analytics(command) => match command {
            AnalyticsCommand::Dashboard => commands::analytics::dashboard(&app, format),
            AnalyticsCommand::Events(args) => commands::analytics::events(&app, args, format),
            // Read-only; loops until interrupted and never reaches the save.
            AnalyticsCommand::Watch => commands::analytics::watch(&app, &store, &cli.data_file),
        },
        Commands::Seed(args) => commands::seed::seed(&app, args),
    };

    // Persist even when the command failed: validation failures and the like
    // still appended ledger events worth keeping.
    if let Err(e) = store.save_to_file(&cli.data_file) {
        tracing::error!("failed to save store snapshot: {e}");
        if result.is_ok() {
            return Err(e.into());
        }
    }
    result
}
