// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::Serialize;

/// A validated driver license number.
///
/// A license number is exactly eight characters: three uppercase ASCII
/// letters followed by five ASCII digits, e.g. `ABC12345`.
///
/// Stored drivers carry their license as a plain string; this type is only
/// required where user input is accepted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct LicenseNumber(String);

impl LicenseNumber {
    /// Total number of characters in a license number.
    pub const LENGTH: usize = 8;
    /// Number of leading uppercase letters.
    pub const PREFIX_LENGTH: usize = 3;

    /// Parses and validates a license number.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - the value is not exactly 8 characters long
    /// - the first 3 characters are not uppercase ASCII letters
    /// - the last 5 characters are not ASCII digits
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        let length: usize = value.chars().count();
        if length != Self::LENGTH {
            return Err(DomainError::LicenseNumberLength { length });
        }

        let (prefix, suffix) = value.split_at(
            value
                .char_indices()
                .nth(Self::PREFIX_LENGTH)
                .map_or(value.len(), |(idx, _)| idx),
        );

        if !prefix.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(DomainError::LicenseNumberPrefix);
        }

        if !suffix.chars().all(|c| c.is_ascii_digit()) {
            return Err(DomainError::LicenseNumberSuffix);
        }

        Ok(Self(value.to_string()))
    }

    /// Returns the license number as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LicenseNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for LicenseNumber {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<LicenseNumber> for String {
    fn from(value: LicenseNumber) -> Self {
        value.0
    }
}
