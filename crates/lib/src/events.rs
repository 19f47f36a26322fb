//! The fixed tracking vocabulary and the shape of a ledger record.
//!
//! Event names and property keys are enumerations rather than free strings so
//! the ledger writer and the analytics aggregator cannot drift apart: a
//! scenario view binds to the same variant the writer records.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Name of a tracked event.
///
/// The serialized form is the exact wire string the ledger persists, so the
/// ledger stays readable by any consumer of the raw collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EventName {
    #[serde(rename = "Registration Validation Failed")]
    RegistrationValidationFailed,
    #[serde(rename = "Registration Attempted")]
    RegistrationAttempted,
    #[serde(rename = "Registration Failed")]
    RegistrationFailed,
    #[serde(rename = "Registration Succeeded")]
    RegistrationSucceeded,

    #[serde(rename = "Login Validation Failed")]
    LoginValidationFailed,
    #[serde(rename = "Login Attempted")]
    LoginAttempted,
    #[serde(rename = "Login Failed")]
    LoginFailed,
    #[serde(rename = "Login Succeeded")]
    LoginSucceeded,

    #[serde(rename = "User Session Loaded")]
    UserSessionLoaded,
    #[serde(rename = "User Session Ended")]
    UserSessionEnded,

    #[serde(rename = "User Viewed")]
    UserViewed,
    #[serde(rename = "User Created")]
    UserCreated,
    #[serde(rename = "User Updated")]
    UserUpdated,
    #[serde(rename = "User Deleted")]
    UserDeleted,

    #[serde(rename = "Password Updated")]
    PasswordUpdated,

    #[serde(rename = "Group Filter Changed")]
    GroupFilterChanged,
    #[serde(rename = "Page Viewed")]
    PageViewed,
    #[serde(rename = "Logout")]
    Logout,
    #[serde(rename = "Login Page Viewed")]
    LoginPageViewed,
    #[serde(rename = "Register Page Viewed")]
    RegisterPageViewed,
    #[serde(rename = "Home Page Viewed")]
    HomePageViewed,
}

impl EventName {
    /// The wire string for this event name.
    pub fn as_str(&self) -> &'static str {
        match self {
            EventName::RegistrationValidationFailed => "Registration Validation Failed",
            EventName::RegistrationAttempted => "Registration Attempted",
            EventName::RegistrationFailed => "Registration Failed",
            EventName::RegistrationSucceeded => "Registration Succeeded",
            EventName::LoginValidationFailed => "Login Validation Failed",
            EventName::LoginAttempted => "Login Attempted",
            EventName::LoginFailed => "Login Failed",
            EventName::LoginSucceeded => "Login Succeeded",
            EventName::UserSessionLoaded => "User Session Loaded",
            EventName::UserSessionEnded => "User Session Ended",
            EventName::UserViewed => "User Viewed",
            EventName::UserCreated => "User Created",
            EventName::UserUpdated => "User Updated",
            EventName::UserDeleted => "User Deleted",
            EventName::PasswordUpdated => "Password Updated",
            EventName::GroupFilterChanged => "Group Filter Changed",
            EventName::PageViewed => "Page Viewed",
            EventName::Logout => "Logout",
            EventName::LoginPageViewed => "Login Page Viewed",
            EventName::RegisterPageViewed => "Register Page Viewed",
            EventName::HomePageViewed => "Home Page Viewed",
        }
    }
}

impl fmt::Display for EventName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Property keys attached to tracked events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropKey {
    Email,
    Group,
    FailureReason,
    FilterFrom,
    FilterTo,
    ResultCount,
    Page,
    /// The session id attached to `User Session Loaded`.
    SessionId,
}

impl PropKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropKey::Email => "email",
            PropKey::Group => "group",
            PropKey::FailureReason => "failure_reason",
            PropKey::FilterFrom => "filter_from",
            PropKey::FilterTo => "filter_to",
            PropKey::ResultCount => "result_count",
            PropKey::Page => "page",
            PropKey::SessionId => "sessionId",
        }
    }
}

/// Machine-readable reason codes attached to failure events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureReason {
    UserNotFound,
    WrongPassword,
    EmailExists,
}

impl FailureReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureReason::UserNotFound => "user_not_found",
            FailureReason::WrongPassword => "wrong_password",
            FailureReason::EmailExists => "email_exists",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Free-form key/value mapping carried by an event.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Properties(BTreeMap<String, serde_json::Value>);

impl Properties {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style string property.
    pub fn with_str(mut self, key: PropKey, value: impl Into<String>) -> Self {
        self.set(key, serde_json::Value::String(value.into()));
        self
    }

    /// Builder-style numeric property.
    pub fn with_count(mut self, key: PropKey, value: u64) -> Self {
        self.set(key, serde_json::Value::from(value));
        self
    }

    pub fn set(&mut self, key: PropKey, value: serde_json::Value) {
        self.0.insert(key.as_str().to_string(), value);
    }

    /// The property as a string, if present and a string.
    pub fn str_value(&self, key: PropKey) -> Option<&str> {
        self.0.get(key.as_str()).and_then(|v| v.as_str())
    }

    /// The property as a string, treating the empty string as absent.
    ///
    /// Matches the truthiness checks the aggregator relies on when falling
    /// back from an unresolved actor group to the event's own group property.
    pub fn non_empty_str(&self, key: PropKey) -> Option<&str> {
        self.str_value(key).filter(|s| !s.is_empty())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &serde_json::Value)> {
        self.0.iter()
    }
}

/// One record in the event ledger.
///
/// `id` is the 1-based position at append time; after cap eviction it is not
/// globally unique. `ts` is milliseconds since Unix epoch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventRecord {
    pub id: u64,
    pub event: EventName,
    #[serde(default)]
    pub properties: Properties,
    pub ts: u64,
    /// Actor email; omitted on the wire when unresolved.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
    /// Active session id, or null when no session was active.
    #[serde(rename = "sessionId", default)]
    pub session_id: Option<String>,
}

impl EventRecord {
    /// The actor email: the resolved `user` field, else the event's own
    /// `email` property.
    pub fn actor(&self) -> Option<&str> {
        self.user
            .as_deref()
            .or_else(|| self.properties.str_value(PropKey::Email))
    }
}
