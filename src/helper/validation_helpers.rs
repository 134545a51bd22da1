use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

/// Validation failures surface to the UI as inline messages; the operation
/// aborts before any store mutation.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("Please enter a valid email address")]
    InvalidEmail,
    #[error("Passwords do not match")]
    PasswordMismatch,
    #[error("Password must be at least {0} characters")]
    PasswordTooShort(usize),
}

const MIN_PASSWORD_LEN: usize = 6;

fn email_regex() -> &'static Regex {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    EMAIL_RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap())
}

pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

/// Checks a signup form before the session store is touched: required
/// fields, email shape, minimum password length, matching confirmation.
pub fn validate_signup(
    name: &str,
    email: &str,
    password: &str,
    confirm_password: &str,
) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::MissingField("Name"));
    }
    if email.trim().is_empty() {
        return Err(ValidationError::MissingField("Email"));
    }
    if !is_valid_email(email) {
        return Err(ValidationError::InvalidEmail);
    }
    if password.is_empty() {
        return Err(ValidationError::MissingField("Password"));
    }
    if password.len() < MIN_PASSWORD_LEN {
        return Err(ValidationError::PasswordTooShort(MIN_PASSWORD_LEN));
    }
    if password != confirm_password {
        return Err(ValidationError::PasswordMismatch);
    }
    Ok(())
}
