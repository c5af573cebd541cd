// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Password policy validation.
//!
//! Every rule is evaluated so the form can show all problems at once.
//! The rules are:
//! - a minimum length
//! - not entirely numeric
//! - not one of a list of commonly used passwords
//! - not too similar to the username or the driver's names

use thiserror::Error;

/// Passwords that are rejected outright, one per line, lowercase.
const COMMON_PASSWORDS: &str = include_str!("../data/common_passwords.txt");

fn is_common_password(lowered: &str) -> bool {
    COMMON_PASSWORDS.lines().any(|line| line == lowered)
}

/// The attributes a password must not resemble, with their display names.
const SIMILARITY_ATTRIBUTES: [&str; 3] = ["username", "first name", "last name"];

/// Password policy errors.
///
/// The display strings are the messages shown on the form.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordPolicyError {
    /// Password is too short.
    #[error(
        "This password is too short. It must contain at least {min_length} characters."
    )]
    TooShort { min_length: usize },

    /// Password consists only of digits.
    #[error("This password is entirely numeric.")]
    EntirelyNumeric,

    /// Password appears in the common-password list.
    #[error("This password is too common.")]
    TooCommon,

    /// Password resembles one of the account's attributes.
    #[error("The password is too similar to the {attribute}.")]
    TooSimilar { attribute: String },

    /// Password and confirmation do not match.
    #[error("The two password fields didn’t match.")]
    ConfirmationMismatch,
}

/// The account attributes a password is compared against.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserAttributes<'a> {
    pub username: &'a str,
    pub first_name: &'a str,
    pub last_name: &'a str,
}

/// Password policy configuration.
#[derive(Debug, Clone, Copy)]
pub struct PasswordPolicy {
    /// Minimum password length in characters.
    pub min_length: usize,
    /// Similarity ratio at or above which a password is rejected.
    pub max_similarity: f64,
}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            max_similarity: 0.7,
        }
    }
}

impl PasswordPolicy {
    /// Validates a password and its confirmation.
    ///
    /// A mismatch is reported alone; the remaining rules only run once the
    /// two entries agree.
    ///
    /// # Errors
    ///
    /// Returns every rule the password breaks.
    pub fn validate(
        &self,
        password: &str,
        confirmation: &str,
        attributes: &UserAttributes<'_>,
    ) -> Result<(), Vec<PasswordPolicyError>> {
        if password != confirmation {
            return Err(vec![PasswordPolicyError::ConfirmationMismatch]);
        }

        let mut errors: Vec<PasswordPolicyError> = Vec::new();

        if let Some(error) = self.check_similarity(password, attributes) {
            errors.push(error);
        }

        if password.chars().count() < self.min_length {
            errors.push(PasswordPolicyError::TooShort {
                min_length: self.min_length,
            });
        }

        let lowered: String = password.trim().to_lowercase();
        if is_common_password(&lowered) {
            errors.push(PasswordPolicyError::TooCommon);
        }

        if !password.is_empty() && password.chars().all(|c| c.is_ascii_digit()) {
            errors.push(PasswordPolicyError::EntirelyNumeric);
        }

        if errors.is_empty() { Ok(()) } else { Err(errors) }
    }

    /// Returns the first attribute the password is too similar to.
    fn check_similarity(
        &self,
        password: &str,
        attributes: &UserAttributes<'_>,
    ) -> Option<PasswordPolicyError> {
        let password: String = password.to_lowercase();
        let values: [&str; 3] = [
            attributes.username,
            attributes.first_name,
            attributes.last_name,
        ];

        for (attribute, value) in SIMILARITY_ATTRIBUTES.iter().zip(values) {
            if value.is_empty() || self.exceeds_length_ratio(&password, value) {
                continue;
            }

            let value: String = value.to_lowercase();
            let mut parts: Vec<&str> = value
                .split(|c: char| !(c.is_alphanumeric() || c == '_'))
                .filter(|part| !part.is_empty())
                .collect();
            parts.push(&value);

            if parts
                .iter()
                .any(|part| similarity_ratio(&password, part) >= self.max_similarity)
            {
                return Some(PasswordPolicyError::TooSimilar {
                    attribute: (*attribute).to_string(),
                });
            }
        }

        None
    }

    /// Values much shorter than the password can never reach the threshold.
    #[allow(clippy::cast_precision_loss)]
    fn exceeds_length_ratio(&self, password: &str, value: &str) -> bool {
        let password_len: usize = password.chars().count();
        let value_len: usize = value.chars().count();
        let length_bound: f64 = self.max_similarity / 2.0 * password_len as f64;
        password_len >= 10 * value_len && (value_len as f64) < length_bound
    }
}

/// Upper bound on how alike two strings are, in `[0, 1]`.
///
/// Twice the number of characters the strings share (as multisets) divided
/// by their combined length.
#[allow(clippy::cast_precision_loss)]
fn similarity_ratio(a: &str, b: &str) -> f64 {
    let total: usize = a.chars().count() + b.chars().count();
    if total == 0 {
        return 1.0;
    }

    let mut available: Vec<char> = b.chars().collect();
    let mut matches: usize = 0;
    for c in a.chars() {
        if let Some(index) = available.iter().position(|&candidate| candidate == c) {
            available.swap_remove(index);
            matches += 1;
        }
    }

    2.0 * matches as f64 / total as f64
}
