//! Authentication commands.

use super::prompt;
use crate::output::{self, OutputFormat};
use anyhow::Result;
use pawn_auth::{
    guard, AuthError, AuthProvider, LoginForm, RegistrationForm, RouteAccess, RouteDecision,
    UserProfile,
};
use serde_json::json;

fn user_label(user: Option<&UserProfile>) -> String {
    user.and_then(UserProfile::display_name)
        .unwrap_or_else(|| "unknown".to_string())
}

fn report_failure(action: &str, error: &AuthError, format: &OutputFormat) {
    let hint = if error.is_transient() {
        " (the server may be unavailable, try again)"
    } else {
        ""
    };
    output::print_error(&format!("{} failed: {}{}", action, error, hint), format);
}

/// Sign in with email and password.
pub async fn login(provider: &AuthProvider, email: Option<String>, format: &OutputFormat) -> Result<()> {
    let state = provider.state();
    if guard::resolve(&state, RouteAccess::GuestOnly) == RouteDecision::RedirectToHome {
        output::print_success(
            &format!("Already logged in as {}", user_label(state.user())),
            format,
        );
        return Ok(());
    }

    let email = match email {
        Some(email) => email,
        None => prompt("Email: ")?,
    };
    let password = rpassword::prompt_password("Password: ")?;

    let form = LoginForm::new(email, password);
    if let Err(e) = form.validate() {
        output::print_error(&e.to_string(), format);
        return Ok(());
    }

    match provider.login_with_form(&form).await {
        Ok(user) => {
            output::print_success(&format!("Logged in as {}", user_label(Some(&user))), format);
        }
        Err(e) => report_failure("Login", &e, format),
    }

    Ok(())
}

/// Sign out and clear the saved session.
pub async fn logout(provider: &AuthProvider, format: &OutputFormat) -> Result<()> {
    let signed_in =
        guard::resolve(&provider.state(), RouteAccess::Protected) == RouteDecision::Render;

    // Runs even when signed out so a rejected token never lingers on disk.
    provider.logout();

    if signed_in {
        output::print_success("Logged out successfully", format);
    } else {
        output::print_success("Not logged in", format);
    }
    Ok(())
}

/// Create an account.
pub async fn register(
    provider: &AuthProvider,
    email: String,
    username: String,
    format: &OutputFormat,
) -> Result<()> {
    let password = rpassword::prompt_password("Password: ")?;
    let confirmation = rpassword::prompt_password("Confirm password: ")?;
    if password != confirmation {
        output::print_error("Passwords do not match", format);
        return Ok(());
    }

    let form = RegistrationForm {
        email,
        username,
        password,
    };

    match provider.register(&form).await {
        Ok(user) => output::print_success(
            &format!(
                "Created account for {}. Log in with 'pawnrepo login'.",
                user_label(Some(&user))
            ),
            format,
        ),
        Err(e) => report_failure("Registration", &e, format),
    }

    Ok(())
}

/// Show authentication status.
pub async fn status(provider: &AuthProvider, format: &OutputFormat) -> Result<()> {
    let state = provider.state();
    let decision = guard::resolve(&state, RouteAccess::Protected);

    match format {
        OutputFormat::Text => {
            output::print_row("API", provider.api().api_url());
            match decision {
                RouteDecision::Render => {
                    output::print_row("Auth", "logged in");
                    output::print_row("User", &user_label(state.user()));
                }
                RouteDecision::Loading => output::print_row("Auth", "initializing"),
                _ => output::print_row("Auth", "not logged in"),
            }
        }
        OutputFormat::Json => {
            output::print_json(&json!({
                "api_url": provider.api().api_url(),
                "initialized": state.is_initialized(),
                "authenticated": state.is_authenticated(),
                "phase": state.phase(),
                "user": state.user(),
            }));
        }
    }

    Ok(())
}
