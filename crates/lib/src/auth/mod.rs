//! Authentication flows: login, logout, registration, and the forced
//! password reset triggered by the sentinel default password.
//!
//! Credentials live in the `users` collection and are compared in plaintext;
//! this is a demo, and that is the documented scope. Each flow emits its
//! tracking events through the ledger in a fixed order, so the analytics
//! funnels line up: validation first, then the attempt, then the outcome.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{
    Result,
    constants::{CURRENT_USER_KEY, DEFAULT_PASSWORD, PENDING_RESET_KEY},
    directory::{UserRecord, load_users, save_users},
    events::{EventName, FailureReason, PropKey, Properties},
    ledger::EventLedger,
    session::SessionManager,
    sink::{AnalyticsSink, Identity},
    storage::{Storage, read_json, write_json},
};

pub mod validation;

pub use validation::{LoginIssues, RegistrationIssues};

/// The persisted "who is logged in now" record.
///
/// Derived from the matched user at login time and not re-synced if the
/// underlying record later changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CurrentUser {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub group: String,
}

/// Result of a login attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum LoginOutcome {
    /// Field validation blocked the attempt; the user may fix and retry.
    Invalid(LoginIssues),
    /// No user with that email (case-insensitive).
    UserNotFound,
    /// Email matched but the password did not.
    WrongPassword,
    /// Authenticated; a fresh session is active.
    LoggedIn {
        email: String,
        group: String,
        /// `None` when the session record could not be persisted.
        session_id: Option<String>,
        /// Set when the stored password is the sentinel default.
        needs_password_reset: bool,
    },
}

/// Result of a registration attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum RegisterOutcome {
    /// Field validation blocked the attempt.
    Invalid(RegistrationIssues),
    /// The email already exists in some case variant; the list is unchanged.
    EmailExists,
    /// The user was appended; the caller redirects to the login surface.
    Registered { email: String },
}

/// Login, logout, registration, and password-reset flows.
#[derive(Clone)]
pub struct Authenticator {
    storage: Arc<dyn Storage>,
    ledger: EventLedger,
    sessions: SessionManager,
    sink: Arc<dyn AnalyticsSink>,
}

impl Authenticator {
    pub fn new(
        storage: Arc<dyn Storage>,
        ledger: EventLedger,
        sessions: SessionManager,
        sink: Arc<dyn AnalyticsSink>,
    ) -> Self {
        Self {
            storage,
            ledger,
            sessions,
            sink,
        }
    }

    /// The logged-in user, or `None` when anonymous (or the record is
    /// corrupt). This is what the navigation guard checks.
    pub fn current_user(&self) -> Option<CurrentUser> {
        read_json::<CurrentUser>(&*self.storage, CURRENT_USER_KEY).into_option()
    }

    /// Validates and attempts a login.
    ///
    /// On success any stale session is ended first, a new one starts, and the
    /// current-user record is written before the success events so they
    /// resolve to the new actor. Note the session and current-user writes are
    /// two independent store operations, not a transaction.
    pub fn login(&self, email: &str, password: &str) -> Result<LoginOutcome> {
        let issues = validation::validate_login(email, password);
        if !issues.is_clean() {
            self.ledger.record(
                EventName::LoginValidationFailed,
                Properties::new().with_str(PropKey::Email, email),
            )?;
            return Ok(LoginOutcome::Invalid(issues));
        }

        self.ledger.record(
            EventName::LoginAttempted,
            Properties::new().with_str(PropKey::Email, email),
        )?;

        let users = load_users(&*self.storage);
        let Some(user) = users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned()
        else {
            self.record_login_failure(email, FailureReason::UserNotFound)?;
            return Ok(LoginOutcome::UserNotFound);
        };

        if user.password != password {
            self.record_login_failure(email, FailureReason::WrongPassword)?;
            return Ok(LoginOutcome::WrongPassword);
        }

        // End any previous session and create a new one for this login.
        self.sessions.end_session()?;
        let session_id = match self.sessions.start_session() {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::warn!("failed to persist new session: {e}");
                None
            }
        };

        write_json(
            &*self.storage,
            CURRENT_USER_KEY,
            &CurrentUser {
                email: user.email.clone(),
                group: user.group.clone(),
            },
        )?;

        self.ledger.record(
            EventName::LoginSucceeded,
            Properties::new()
                .with_str(PropKey::Email, email)
                .with_str(PropKey::Group, user.group.clone()),
        )?;
        let mut loaded = Properties::new()
            .with_str(PropKey::Email, email)
            .with_str(PropKey::Group, user.group.clone());
        loaded.set(
            PropKey::SessionId,
            match &session_id {
                Some(id) => serde_json::Value::String(id.clone()),
                None => serde_json::Value::Null,
            },
        );
        self.ledger.record(EventName::UserSessionLoaded, loaded)?;

        self.sink.identify(&Identity {
            user_id: Some(user.email.clone()),
            email: Some(user.email.clone()),
            group: (!user.group.is_empty()).then(|| user.group.clone()),
        });

        let needs_password_reset = user.password == DEFAULT_PASSWORD;
        if needs_password_reset {
            // Persisted so the forced-reset dialog survives a reload.
            self.storage.set(PENDING_RESET_KEY, &user.email)?;
        }

        Ok(LoginOutcome::LoggedIn {
            email: user.email,
            group: user.group,
            session_id,
            needs_password_reset,
        })
    }

    /// Ends the session, clears the current user, and resets the sink.
    /// Emits the exit events first so they still carry the actor.
    pub fn logout(&self) -> Result<()> {
        if let Some(current) = self.current_user()
            && !current.email.is_empty()
        {
            let props = Properties::new()
                .with_str(PropKey::Email, current.email.clone())
                .with_str(PropKey::Group, current.group.clone());
            self.ledger.record(EventName::Logout, props.clone())?;
            self.ledger.record(EventName::UserSessionEnded, props)?;
        }
        self.sessions.end_session()?;
        self.storage.remove(CURRENT_USER_KEY)?;
        self.sink.reset();
        Ok(())
    }

    /// Validates and attempts a registration.
    pub fn register(
        &self,
        name: &str,
        email: &str,
        group: &str,
        password: &str,
    ) -> Result<RegisterOutcome> {
        let issues = validation::validate_registration(name, email, group, password);
        if !issues.is_clean() {
            self.ledger.record(
                EventName::RegistrationValidationFailed,
                Properties::new().with_str(PropKey::Email, email),
            )?;
            return Ok(RegisterOutcome::Invalid(issues));
        }

        let mut attempted = Properties::new().with_str(PropKey::Email, email);
        if !group.is_empty() {
            attempted = attempted.with_str(PropKey::Group, group);
        }
        self.ledger.record(EventName::RegistrationAttempted, attempted)?;

        let mut users = load_users(&*self.storage);
        if users.iter().any(|u| u.email.eq_ignore_ascii_case(email)) {
            self.ledger.record(
                EventName::RegistrationFailed,
                Properties::new()
                    .with_str(PropKey::Email, email)
                    .with_str(PropKey::FailureReason, FailureReason::EmailExists.as_str()),
            )?;
            return Ok(RegisterOutcome::EmailExists);
        }

        users.push(UserRecord {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            group: group.to_string(),
        });
        save_users(&*self.storage, &users)?;

        self.ledger.record(
            EventName::RegistrationSucceeded,
            Properties::new()
                .with_str(PropKey::Email, email)
                .with_str(PropKey::Group, group),
        )?;

        Ok(RegisterOutcome::Registered {
            email: email.to_string(),
        })
    }

    /// The email with a pending forced reset, if any.
    ///
    /// Stored as a bare string, not JSON.
    pub fn pending_password_reset(&self) -> Option<String> {
        match self.storage.get(PENDING_RESET_KEY) {
            Ok(value) => value.filter(|email| !email.is_empty()),
            Err(e) => {
                tracing::warn!("failed to read pending reset marker: {e}");
                None
            }
        }
    }

    /// Rewrites the password of the user with the given email
    /// (case-insensitive) and emits `Password Updated`.
    pub fn update_password(&self, email: &str, new_password: &str) -> Result<()> {
        let users: Vec<UserRecord> = load_users(&*self.storage)
            .into_iter()
            .map(|mut u| {
                if u.email.eq_ignore_ascii_case(email) {
                    u.password = new_password.to_string();
                }
                u
            })
            .collect();
        save_users(&*self.storage, &users)?;
        if !email.is_empty() {
            self.ledger.record(
                EventName::PasswordUpdated,
                Properties::new().with_str(PropKey::Email, email),
            )?;
        }
        Ok(())
    }

    /// Completes the forced-reset flow: updates the password and clears the
    /// pending marker.
    pub fn complete_password_reset(&self, email: &str, new_password: &str) -> Result<()> {
        self.update_password(email, new_password)?;
        self.storage.remove(PENDING_RESET_KEY)
    }

    fn record_login_failure(&self, email: &str, reason: FailureReason) -> Result<()> {
        self.ledger.record(
            EventName::LoginFailed,
            Properties::new()
                .with_str(PropKey::Email, email)
                .with_str(PropKey::FailureReason, reason.as_str()),
        )
    }
}
