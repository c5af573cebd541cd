// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use regex::Regex;
use std::sync::LazyLock;

/// Maximum length of a username.
pub const MAX_USERNAME_LENGTH: usize = 150;

/// Maximum length of free-text names (manufacturer name, car model, ...).
pub const MAX_NAME_LENGTH: usize = 255;

/// Letters, digits and `@ . + - _`.
static USERNAME_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"^[\w.@+-]+\z").ok());

/// Validates a required free-text field.
///
/// Returns the value with surrounding whitespace removed.
///
/// # Errors
///
/// Returns an error if the trimmed value is empty or longer than `max`
/// characters.
pub fn validate_required_text(
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<String, DomainError> {
    let trimmed: &str = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::RequiredField { field });
    }

    let length: usize = trimmed.chars().count();
    if length > max {
        return Err(DomainError::FieldTooLong { field, max, length });
    }

    Ok(trimmed.to_string())
}

/// Validates a username for a new account.
///
/// # Errors
///
/// Returns an error if:
/// - the username is empty
/// - the username is longer than 150 characters
/// - the username contains characters other than letters, digits and `@ . + - _`
pub fn validate_username(username: &str) -> Result<String, DomainError> {
    let username: String = validate_required_text("username", username, MAX_USERNAME_LENGTH)?;

    let is_valid: bool = USERNAME_PATTERN
        .as_ref()
        .is_some_and(|pattern| pattern.is_match(&username));
    if !is_valid {
        return Err(DomainError::InvalidUsername(username));
    }

    Ok(username)
}
