//! Account commands: signup, confirm, signin, whoami.

use anyhow::Result;
use console::style;
use dialoguer::Password;
use secrecy::SecretString;

use chatbot_types::identity::SignInStep;

use crate::state::AppState;

use super::output::{report_auth, success, OutputMode};

/// Environment variable holding the account password for scripted use.
pub const PASSWORD_ENV: &str = "CHATBOT_PASSWORD";

/// The password from the environment, if set and non-empty.
pub fn password_from_env<F>(lookup: F) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(PASSWORD_ENV).filter(|p| !p.is_empty())
}

/// Use the given password, or prompt for one with hidden input.
pub fn read_password(given: Option<&str>, email: &str, confirm: bool) -> Result<SecretString> {
    if let Some(password) = given {
        return Ok(SecretString::from(password.to_string()));
    }

    let mut prompt = Password::new().with_prompt(format!("Password for {}", style(email).bold()));
    if confirm {
        prompt = prompt.with_confirmation("Repeat password", "Passwords do not match");
    }
    Ok(SecretString::from(prompt.interact()?))
}

/// `chatbot signup <email>`
pub async fn sign_up(
    state: &AppState,
    email: &str,
    password: Option<&str>,
    mode: OutputMode,
) -> Result<()> {
    let password = read_password(password, email, true)?;
    let result = state.auth.sign_up(email, &password).await;

    report_auth(result, mode, |result| {
        success(mode, &format!("Registered {}", style(email).bold()));
        if !result.user_confirmed {
            let destination = result
                .code_delivery
                .as_ref()
                .and_then(|d| d.destination.as_deref())
                .unwrap_or(email);
            println!(
                "  {} A confirmation code was sent to {}. Finish with: {}",
                style("i").blue().bold(),
                destination,
                style(format!("chatbot confirm {email} <code>")).yellow()
            );
        }
    })
}

/// `chatbot confirm <email> <code>`
pub async fn confirm(state: &AppState, email: &str, code: &str, mode: OutputMode) -> Result<()> {
    let result = state.auth.confirm_sign_up(email, code).await;
    report_auth(result, mode, |_| {
        success(mode, &format!("Account {} confirmed", style(email).bold()));
    })
}

/// `chatbot signin <email>`: sign in, report, then end the session again.
pub async fn sign_in(
    state: &AppState,
    email: &str,
    password: Option<&str>,
    mode: OutputMode,
) -> Result<()> {
    let password = read_password(password, email, false)?;
    let result = state.auth.sign_in(email, &password).await;
    let signed_in = matches!(&result, Ok(r) if r.is_signed_in);

    let reported = report_auth(result, mode, |result| match &result.next_step {
        SignInStep::Done => success(mode, &format!("Signed in as {}", style(email).bold())),
        SignInStep::Challenge { name, .. } => println!(
            "  {} Sign-in needs a further step: {}",
            style("!").yellow().bold(),
            style(name).bold()
        ),
    });

    if signed_in {
        sign_out(state).await;
    }
    reported
}

/// `chatbot whoami [--email]`
pub async fn whoami(
    state: &AppState,
    email: Option<&str>,
    password: Option<&str>,
    mode: OutputMode,
) -> Result<()> {
    let signed_in = match email {
        Some(email) => sign_in_as(state, email, password).await?,
        None => false,
    };

    let result = state.auth.get_current_user().await;
    let reported = report_auth(result, mode, |user| {
        println!();
        println!("  {}  {}", style("Username:").bold(), user.username);
        println!("  {}   {}", style("User id:").bold(), style(&user.user_id).dim());
        if let Some(email) = &user.email {
            println!("  {}     {}", style("Email:").bold(), email);
        }
        println!();
    });

    if signed_in {
        sign_out(state).await;
    }
    reported
}

/// Sign in before a backend command. Returns whether a session is now held.
///
/// A further-step challenge cannot be completed from here and is an error.
pub async fn sign_in_as(state: &AppState, email: &str, password: Option<&str>) -> Result<bool> {
    let password = read_password(password, email, false)?;
    let result = state.auth.sign_in(email, &password).await?;

    match result.next_step {
        SignInStep::Done => Ok(result.is_signed_in),
        SignInStep::Challenge { name, .. } => {
            anyhow::bail!("sign-in for {email} requires a further step ({name})")
        }
    }
}

/// End the session. Failures are logged by the service and otherwise ignored.
pub async fn sign_out(state: &AppState) {
    let _ = state.auth.sign_out().await;
}
