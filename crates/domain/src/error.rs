// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during domain validation.
///
/// The `Display` output of each variant is the message shown next to the
/// offending form field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// License number does not have exactly eight characters.
    LicenseNumberLength {
        /// The number of characters found.
        length: usize,
    },
    /// The first three characters of a license number are not uppercase letters.
    LicenseNumberPrefix,
    /// The last five characters of a license number are not digits.
    LicenseNumberSuffix,
    /// A required field was left empty.
    RequiredField {
        /// The field name.
        field: &'static str,
    },
    /// A field exceeds its maximum length.
    FieldTooLong {
        /// The field name.
        field: &'static str,
        /// The maximum number of characters allowed.
        max: usize,
        /// The number of characters supplied.
        length: usize,
    },
    /// A username contains characters outside the permitted set.
    InvalidUsername(String),
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LicenseNumberLength { .. } => {
                write!(f, "License number should consist of 8 characters")
            }
            Self::LicenseNumberPrefix => {
                write!(f, "First 3 characters should be uppercase letters")
            }
            Self::LicenseNumberSuffix => write!(f, "Last 5 characters should be digits"),
            Self::RequiredField { .. } => write!(f, "This field is required."),
            Self::FieldTooLong { max, length, .. } => {
                write!(
                    f,
                    "Ensure this value has at most {max} characters (it has {length})."
                )
            }
            Self::InvalidUsername(_) => write!(
                f,
                "Enter a valid username. This value may contain only letters, numbers, and @/./+/-/_ characters."
            ),
        }
    }
}

impl std::error::Error for DomainError {}
