//! CLI argument definitions for the Teamdesk binary.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Teamdesk user directory and local analytics
#[derive(Parser, Debug)]
#[command(name = "teamdesk")]
#[command(about = "Teamdesk: local-first user directory with a built-in analytics ledger")]
#[command(version)]
pub struct Cli {
    /// Snapshot file holding the record store
    #[arg(
        short = 'f',
        long,
        global = true,
        default_value = "teamdesk.json",
        env = "TEAMDESK_DATA_FILE"
    )]
    pub data_file: PathBuf,

    /// Emit JSON instead of human-readable output
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in as an existing user
    Login(LoginArgs),
    /// Create an account and return to the login surface
    Register(RegisterArgs),
    /// Sign out and end the active session
    Logout,
    /// Show the signed-in user
    Whoami,
    /// Change a user's password (completes a pending forced reset)
    Passwd(PasswdArgs),
    /// Manage the user directory (requires sign-in)
    #[command(subcommand)]
    Users(UsersCommand),
    /// Inspect the local analytics ledger (requires sign-in)
    #[command(subcommand)]
    Analytics(AnalyticsCommand),
    /// Populate the store with demo users and events
    Seed(SeedArgs),
}

#[derive(clap::Args, Debug)]
pub struct LoginArgs {
    pub email: String,
    pub password: String,
}

#[derive(clap::Args, Debug)]
pub struct RegisterArgs {
    pub name: String,
    pub email: String,
    pub password: String,

    /// Group assignment
    #[arg(short, long)]
    pub group: String,
}

#[derive(clap::Args, Debug)]
pub struct PasswdArgs {
    pub new_password: String,

    /// Defaults to the signed-in user, or the pending-reset user if any
    #[arg(short, long)]
    pub email: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum UsersCommand {
    /// List users, grouped
    List(UsersListArgs),
    /// Add a user (password starts as the reset sentinel)
    Add(UsersAddArgs),
    /// Edit a user's fields by display id
    Update(UsersUpdateArgs),
    /// Remove a user by display id
    Remove(UsersIdArg),
    /// Show one user by display id
    View(UsersIdArg),
}

#[derive(clap::Args, Debug)]
pub struct UsersListArgs {
    /// Restrict to one group (the literal ALL means no filtering)
    #[arg(short, long, default_value = "ALL")]
    pub group: String,
}

#[derive(clap::Args, Debug)]
pub struct UsersAddArgs {
    pub name: String,
    pub email: String,

    #[arg(short, long, default_value = "")]
    pub group: String,
}

#[derive(clap::Args, Debug)]
pub struct UsersUpdateArgs {
    /// Display id as shown by `users list`
    pub id: usize,

    #[arg(long)]
    pub name: Option<String>,

    #[arg(long)]
    pub email: Option<String>,

    #[arg(long)]
    pub group: Option<String>,
}

#[derive(clap::Args, Debug)]
pub struct UsersIdArg {
    /// Display id as shown by `users list`
    pub id: usize,
}

#[derive(Subcommand, Debug)]
pub enum AnalyticsCommand {
    /// Funnels, per-group activity, and page views
    Dashboard,
    /// Browse raw ledger events, newest first
    Events(EventsArgs),
    /// Poll the store and print events as they arrive
    Watch,
}

#[derive(clap::Args, Debug)]
pub struct EventsArgs {
    /// Restrict to events whose actor resolves to this group
    #[arg(short, long, default_value = "ALL")]
    pub group: String,

    /// Case-insensitive substring match on the event name
    #[arg(short, long, default_value = "")]
    pub search: String,
}

#[derive(clap::Args, Debug)]
pub struct SeedArgs {
    /// How many demo users to create
    #[arg(long, default_value_t = 5)]
    pub users: usize,

    /// How many demo page-view events to append
    #[arg(long, default_value_t = 40)]
    pub events: usize,
}
