//! Command implementations, one module per surface.

pub mod analytics;
pub mod auth;
pub mod seed;
pub mod users;

use teamdesk::{App, auth::CurrentUser};

/// Navigation guard: commands on signed-in surfaces bail out early when
/// nobody is logged in, pointing at the login command instead.
pub fn require_login(app: &App) -> Result<CurrentUser, Box<dyn std::error::Error>> {
    app.auth()
        .current_user()
        .ok_or_else(|| "not signed in; run `teamdesk login <email> <password>` first".into())
}
