//! Sign-in, registration, and password commands.

use teamdesk::{
    App, EventName,
    auth::{LoginOutcome, RegisterOutcome},
};

use crate::cli::{LoginArgs, PasswdArgs, RegisterArgs};
use crate::output::OutputFormat;

type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Run the `login` command
pub fn login(app: &App, args: &LoginArgs, format: OutputFormat) -> CommandResult {
    app.ledger().record(EventName::LoginPageViewed, Default::default())?;

    match app.auth().login(&args.email, &args.password)? {
        LoginOutcome::LoggedIn {
            email,
            group,
            session_id,
            needs_password_reset,
        } => {
            match format {
                OutputFormat::Human => {
                    println!("Signed in as {email}");
                    if needs_password_reset {
                        println!(
                            "Your password is the shared default; run `teamdesk passwd <new-password>` to set your own."
                        );
                    }
                }
                OutputFormat::Json => {
                    println!(
                        "{}",
                        serde_json::json!({
                            "email": email,
                            "group": group,
                            "sessionId": session_id,
                            "needsPasswordReset": needs_password_reset,
                        })
                    );
                }
            }
            Ok(())
        }
        LoginOutcome::Invalid(issues) => {
            if let Some(issue) = issues.email {
                eprintln!("email: {issue}");
            }
            if let Some(issue) = issues.password {
                eprintln!("password: {issue}");
            }
            Err("login rejected by validation".into())
        }
        LoginOutcome::UserNotFound => Err("no account with that email".into()),
        LoginOutcome::WrongPassword => Err("wrong password".into()),
    }
}

/// Run the `register` command
pub fn register(app: &App, args: &RegisterArgs, format: OutputFormat) -> CommandResult {
    app.ledger().record(EventName::RegisterPageViewed, Default::default())?;

    match app
        .auth()
        .register(&args.name, &args.email, &args.group, &args.password)?
    {
        RegisterOutcome::Registered { email } => {
            match format {
                OutputFormat::Human => {
                    println!("Account created for {email}; sign in with `teamdesk login`.")
                }
                OutputFormat::Json => {
                    println!("{}", serde_json::json!({ "email": email }))
                }
            }
            Ok(())
        }
        RegisterOutcome::Invalid(issues) => {
            for (field, issue) in [
                ("name", issues.name),
                ("email", issues.email),
                ("group", issues.group),
                ("password", issues.password),
            ] {
                if let Some(issue) = issue {
                    eprintln!("{field}: {issue}");
                }
            }
            Err("registration rejected by validation".into())
        }
        RegisterOutcome::EmailExists => Err("an account with that email already exists".into()),
    }
}

/// Run the `logout` command
pub fn logout(app: &App) -> CommandResult {
    app.auth().logout()?;
    println!("Signed out.");
    Ok(())
}

/// Run the `whoami` command
pub fn whoami(app: &App, format: OutputFormat) -> CommandResult {
    match app.auth().current_user() {
        Some(current) => match format {
            OutputFormat::Human => {
                if current.group.is_empty() {
                    println!("{}", current.email);
                } else {
                    println!("{} ({})", current.email, current.group);
                }
                Ok(())
            }
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({ "email": current.email, "group": current.group })
                );
                Ok(())
            }
        },
        None => Err("not signed in".into()),
    }
}

/// Run the `passwd` command
pub fn passwd(app: &App, args: &PasswdArgs) -> CommandResult {
    let auth = app.auth();
    let pending = auth.pending_password_reset();
    let email = match &args.email {
        Some(email) => email.clone(),
        None => match auth.current_user().map(|c| c.email).or_else(|| pending.clone()) {
            Some(email) => email,
            None => return Err("no user selected; pass --email or sign in first".into()),
        },
    };

    // Completing the flow clears the forced-reset marker as well.
    if pending.as_deref().is_some_and(|p| p.eq_ignore_ascii_case(&email)) {
        auth.complete_password_reset(&email, &args.new_password)?;
    } else {
        auth.update_password(&email, &args.new_password)?;
    }
    println!("Password updated for {email}.");
    Ok(())
}
