//! Client-side form checks.

use std::sync::OnceLock;

use rand::distributions::Alphanumeric;
use rand::Rng;

use crate::errors::ValidationError;

/// Minimum password length accepted at registration.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Length of the password generated when the user leaves it blank.
pub const GENERATED_PASSWORD_LEN: usize = 8;

/// Fail with every empty (after trimming) field name, in order.
pub fn require_fields(fields: &[(&str, &str)]) -> Result<(), ValidationError> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| *name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(ValidationError::missing(missing))
    }
}

fn password_charset() -> &'static regex::Regex {
    static CHARSET: OnceLock<regex::Regex> = OnceLock::new();
    CHARSET.get_or_init(|| regex::Regex::new(r"^[A-Za-z0-9]+$").expect("valid password regex"))
}

/// At least 8 characters, one uppercase letter, one digit, ASCII letters and
/// digits only.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    let valid = password.len() >= MIN_PASSWORD_LEN
        && password_charset().is_match(password)
        && password.bytes().any(|b| b.is_ascii_uppercase())
        && password.bytes().any(|b| b.is_ascii_digit());

    if valid {
        Ok(())
    } else {
        Err(ValidationError::WeakPassword)
    }
}

/// Random lowercase-alphanumeric password used when registration leaves the
/// field blank.
pub fn generate_password() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(GENERATED_PASSWORD_LEN)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect()
}

/// Local part of an email address, used as the default username.
pub fn username_from_email(email: &str) -> Result<String, ValidationError> {
    let local = email.trim().split('@').next().unwrap_or_default().trim();
    if local.is_empty() {
        return Err(ValidationError::InvalidEmail(email.to_string()));
    }
    Ok(local.to_string())
}
