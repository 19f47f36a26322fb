//! Field-level credential validation.
//!
//! Validation failures are data, not errors: they block the action and carry
//! the inline message the form surfaces, and are never raised past the input
//! boundary.

/// Minimum password length accepted by login and registration.
pub const MIN_PASSWORD_LEN: usize = 6;

/// Minimum name length (after trimming) accepted by registration.
pub const MIN_NAME_LEN: usize = 2;

/// Per-field issues found when validating a login form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct LoginIssues {
    pub email: Option<&'static str>,
    pub password: Option<&'static str>,
}

impl LoginIssues {
    pub fn is_clean(&self) -> bool {
        self.email.is_none() && self.password.is_none()
    }
}

/// Per-field issues found when validating a registration form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RegistrationIssues {
    pub name: Option<&'static str>,
    pub email: Option<&'static str>,
    pub group: Option<&'static str>,
    pub password: Option<&'static str>,
}

impl RegistrationIssues {
    pub fn is_clean(&self) -> bool {
        self.name.is_none()
            && self.email.is_none()
            && self.group.is_none()
            && self.password.is_none()
    }
}

pub fn validate_login(email: &str, password: &str) -> LoginIssues {
    LoginIssues {
        email: email_issue(email),
        password: password_issue(password),
    }
}

pub fn validate_registration(
    name: &str,
    email: &str,
    group: &str,
    password: &str,
) -> RegistrationIssues {
    RegistrationIssues {
        name: name_issue(name),
        email: email_issue(email),
        group: group_issue(group),
        password: password_issue(password),
    }
}

pub fn email_issue(value: &str) -> Option<&'static str> {
    if value.is_empty() {
        Some("Email is required")
    } else if !is_valid_email(value) {
        Some("Invalid email format")
    } else {
        None
    }
}

pub fn password_issue(value: &str) -> Option<&'static str> {
    if value.is_empty() {
        Some("Password is required")
    } else if value.len() < MIN_PASSWORD_LEN {
        Some("Password must be at least 6 characters")
    } else {
        None
    }
}

pub fn name_issue(value: &str) -> Option<&'static str> {
    if value.is_empty() {
        Some("Name is required")
    } else if value.trim().len() < MIN_NAME_LEN {
        Some("Name must be at least 2 characters")
    } else {
        None
    }
}

pub fn group_issue(value: &str) -> Option<&'static str> {
    if value.is_empty() {
        Some("Group is required")
    } else {
        None
    }
}

/// `local@domain.tld` shape: one `@`, no whitespace, and a dot in the domain
/// with non-empty parts on both sides.
pub fn is_valid_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    let clean = |s: &str| !s.is_empty() && !s.chars().any(|c| c.is_whitespace() || c == '@');
    if !clean(local) || !clean(domain) {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((head, tail)) => !head.is_empty() && !tail.is_empty(),
        None => false,
    }
}
