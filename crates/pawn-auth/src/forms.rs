//! Client-side validation for the login and registration forms.
//!
//! The backend re-validates everything; these checks exist so an obviously
//! bad submission never costs a round trip.

use crate::{AuthError, AuthResult};
use serde::Serialize;
use std::fmt;

pub const USERNAME_MIN_LEN: usize = 3;
pub const USERNAME_MAX_LEN: usize = 50;
pub const PASSWORD_MIN_LEN: usize = 8;
pub const PASSWORD_MAX_LEN: usize = 128;

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.message)
    }
}

/// Credentials entered on the login screen.
#[derive(Debug, Clone)]
pub struct LoginForm {
    pub identifier: String,
    pub secret: String,
}

impl LoginForm {
    pub fn new(identifier: impl Into<String>, secret: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            secret: secret.into(),
        }
    }

    /// Both fields are required. The backend looks accounts up by email,
    /// so the identifier must be one.
    pub fn validate(&self) -> AuthResult<()> {
        let mut errors = Vec::new();
        let identifier = self.identifier.trim();
        if identifier.is_empty() {
            errors.push(ValidationError::new("email", "is required"));
        } else if !looks_like_email(identifier) {
            errors.push(ValidationError::new(
                "email",
                "must be a valid email address",
            ));
        }
        if self.secret.is_empty() {
            errors.push(ValidationError::new("password", "is required"));
        }
        into_result(errors)
    }
}

/// Fields submitted when creating an account.
#[derive(Debug, Clone, Serialize)]
pub struct RegistrationForm {
    pub email: String,
    pub username: String,
    pub password: String,
}

impl RegistrationForm {
    pub fn validate(&self) -> AuthResult<()> {
        let mut errors = Vec::new();

        if !looks_like_email(self.email.trim()) {
            errors.push(ValidationError::new(
                "email",
                "must be a valid email address",
            ));
        }

        let username_len = self.username.trim().chars().count();
        if !(USERNAME_MIN_LEN..=USERNAME_MAX_LEN).contains(&username_len) {
            errors.push(ValidationError::new(
                "username",
                format!("must be between {USERNAME_MIN_LEN} and {USERNAME_MAX_LEN} characters"),
            ));
        }

        let password_len = self.password.chars().count();
        if !(PASSWORD_MIN_LEN..=PASSWORD_MAX_LEN).contains(&password_len) {
            errors.push(ValidationError::new(
                "password",
                format!("must be between {PASSWORD_MIN_LEN} and {PASSWORD_MAX_LEN} characters"),
            ));
        }

        into_result(errors)
    }
}

fn into_result(errors: Vec<ValidationError>) -> AuthResult<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(AuthError::Validation(errors))
    }
}

/// One `@`, a non-empty local part, and a dotted domain without spaces.
fn looks_like_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') || value.contains(char::is_whitespace) {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(result: AuthResult<()>) -> Vec<&'static str> {
        match result {
            Err(AuthError::Validation(errors)) => errors.iter().map(|e| e.field).collect(),
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    fn registration(email: &str, username: &str, password: &str) -> RegistrationForm {
        RegistrationForm {
            email: email.to_string(),
            username: username.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn test_login_form_requires_both_fields() {
        assert_eq!(
            fields(LoginForm::new("", "").validate()),
            vec!["email", "password"]
        );
        assert_eq!(fields(LoginForm::new("   ", "pw").validate()), vec!["email"]);
        assert!(LoginForm::new("alice@example.com", "pw").validate().is_ok());
    }

    #[test]
    fn test_login_form_requires_email_identifier() {
        assert_eq!(fields(LoginForm::new("alice", "pw").validate()), vec!["email"]);
        assert!(LoginForm::new(" alice@example.com ", "pw").validate().is_ok());
    }

    #[test]
    fn test_registration_accepts_valid_form() {
        assert!(registration("alice@example.com", "alice", "correct-horse")
            .validate()
            .is_ok());
    }

    #[test]
    fn test_registration_rejects_bad_email() {
        for email in ["", "alice", "alice@", "@example.com", "alice@example", "a b@example.com"] {
            assert_eq!(
                fields(registration(email, "alice", "correct-horse").validate()),
                vec!["email"],
                "email {email:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_registration_username_bounds() {
        assert_eq!(
            fields(registration("a@example.com", "al", "correct-horse").validate()),
            vec!["username"]
        );
        assert!(registration("a@example.com", "ali", "correct-horse")
            .validate()
            .is_ok());
        let long = "a".repeat(USERNAME_MAX_LEN + 1);
        assert_eq!(
            fields(registration("a@example.com", &long, "correct-horse").validate()),
            vec!["username"]
        );
    }

    #[test]
    fn test_registration_password_bounds() {
        assert_eq!(
            fields(registration("a@example.com", "alice", "short").validate()),
            vec!["password"]
        );
        assert!(registration("a@example.com", "alice", "12345678")
            .validate()
            .is_ok());
        let long = "p".repeat(PASSWORD_MAX_LEN + 1);
        assert_eq!(
            fields(registration("a@example.com", "alice", &long).validate()),
            vec!["password"]
        );
    }

    #[test]
    fn test_registration_reports_every_failure() {
        assert_eq!(
            fields(registration("nope", "x", "y").validate()),
            vec!["email", "username", "password"]
        );
    }
}
