// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Submitted forms and query strings.
//!
//! Each form deserializes from a urlencoded body with every field optional,
//! so a missing field surfaces as "This field is required." rather than as
//! a rejected request. `clean` checks every field in one pass and returns
//! either the validated values or `ApiError::Validation`.

use serde::{Deserialize, Serialize};
use taxi_domain::{
    DomainError, LicenseNumber, MAX_NAME_LENGTH, MAX_USERNAME_LENGTH, validate_required_text,
    validate_username,
};
use taxi_persistence::{NewDriver, Persistence};

use crate::error::{ApiError, FormErrors};
use crate::password_policy::{PasswordPolicy, UserAttributes};

pub const USERNAME_TAKEN: &str = "A user with that username already exists.";
pub const LICENSE_TAKEN: &str = "Driver with this license number already exists.";
pub const REQUIRED: &str = "This field is required.";

/// Message for a select box whose value is not an offered choice.
pub const INVALID_CHOICE: &str =
    "Select a valid choice. That choice is not one of the available choices.";

/// Account creation form.
///
/// Serializing the form for re-display omits both password fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriverCreationForm {
    pub username: String,
    #[serde(skip_serializing)]
    pub password1: String,
    #[serde(skip_serializing)]
    pub password2: String,
    pub license_number: String,
    pub first_name: String,
    pub last_name: String,
}

impl DriverCreationForm {
    /// Validates the form against the policy and the current accounts.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` with every field error found, or an
    /// error if a uniqueness lookup fails.
    pub fn clean(
        &self,
        persistence: &mut Persistence,
        policy: &PasswordPolicy,
    ) -> Result<NewDriver, ApiError> {
        let mut errors: FormErrors = FormErrors::new();

        let username: Option<String> = match validate_username(&self.username) {
            Ok(username) => {
                if persistence.username_exists(&username)? {
                    errors.add("username", USERNAME_TAKEN);
                    None
                } else {
                    Some(username)
                }
            }
            Err(e) => {
                errors.add("username", e.to_string());
                None
            }
        };

        let first_name: Option<String> = clean_optional_text(
            "first_name",
            &self.first_name,
            MAX_USERNAME_LENGTH,
            &mut errors,
        );
        let last_name: Option<String> = clean_optional_text(
            "last_name",
            &self.last_name,
            MAX_USERNAME_LENGTH,
            &mut errors,
        );

        if self.password1.is_empty() {
            errors.add("password1", REQUIRED);
        }
        if self.password2.is_empty() {
            errors.add("password2", REQUIRED);
        }
        if !self.password1.is_empty() && !self.password2.is_empty() {
            let attributes: UserAttributes<'_> = UserAttributes {
                username: username.as_deref().unwrap_or(self.username.trim()),
                first_name: first_name.as_deref().unwrap_or_default(),
                last_name: last_name.as_deref().unwrap_or_default(),
            };
            if let Err(violations) = policy.validate(&self.password1, &self.password2, &attributes)
            {
                for violation in violations {
                    errors.add("password2", violation.to_string());
                }
            }
        }

        let license_number: Option<LicenseNumber> =
            clean_license_number(&self.license_number, None, persistence, &mut errors)?;

        match (username, first_name, last_name, license_number) {
            (Some(username), Some(first_name), Some(last_name), Some(license_number))
                if errors.is_empty() =>
            {
                Ok(NewDriver {
                    username,
                    password: self.password1.clone(),
                    first_name,
                    last_name,
                    license_number: license_number.into(),
                    is_staff: false,
                })
            }
            _ => Err(ApiError::Validation(errors)),
        }
    }
}

/// License number update form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LicenseUpdateForm {
    pub license_number: String,
}

impl LicenseUpdateForm {
    /// Validates the new license number for `driver_id`.
    ///
    /// Keeping one's own current license is allowed.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` for a malformed or taken license, or
    /// an error if the uniqueness lookup fails.
    pub fn clean(
        &self,
        persistence: &mut Persistence,
        driver_id: i64,
    ) -> Result<LicenseNumber, ApiError> {
        let mut errors: FormErrors = FormErrors::new();
        let license_number: Option<LicenseNumber> = clean_license_number(
            &self.license_number,
            Some(driver_id),
            persistence,
            &mut errors,
        )?;
        license_number.ok_or(ApiError::Validation(errors))
    }
}

/// Manufacturer create and update form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManufacturerForm {
    pub name: String,
    pub country: String,
}

/// Validated manufacturer fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanManufacturer {
    pub name: String,
    pub country: String,
}

impl ManufacturerForm {
    /// Validates the name and country.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` if either field is empty or too long.
    pub fn clean(&self) -> Result<CleanManufacturer, ApiError> {
        let mut errors: FormErrors = FormErrors::new();
        let name: Option<String> = clean_required_text("name", &self.name, &mut errors);
        let country: Option<String> = clean_required_text("country", &self.country, &mut errors);

        match (name, country) {
            (Some(name), Some(country)) => Ok(CleanManufacturer { name, country }),
            _ => Err(ApiError::Validation(errors)),
        }
    }
}

impl From<&taxi_domain::Manufacturer> for ManufacturerForm {
    fn from(manufacturer: &taxi_domain::Manufacturer) -> Self {
        Self {
            name: manufacturer.name.clone(),
            country: manufacturer.country.clone(),
        }
    }
}

/// Car creation form.
///
/// `drivers` holds one entry per checked driver box.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarForm {
    pub model: String,
    pub manufacturer: String,
    pub drivers: Vec<String>,
}

/// Validated car fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanCar {
    pub model: String,
    pub manufacturer_id: i64,
    pub driver_ids: Vec<i64>,
}

impl CarForm {
    /// Validates the model and resolves the selected manufacturer and drivers.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Validation` for a missing model, an unknown
    /// manufacturer or an unknown driver, or an error if a lookup fails.
    pub fn clean(&self, persistence: &mut Persistence) -> Result<CleanCar, ApiError> {
        let mut errors: FormErrors = FormErrors::new();
        let model: Option<String> = clean_required_text("model", &self.model, &mut errors);

        let manufacturer_id: Option<i64> = if self.manufacturer.trim().is_empty() {
            errors.add("manufacturer", REQUIRED);
            None
        } else {
            match self.manufacturer.trim().parse::<i64>() {
                Ok(id) if persistence.get_manufacturer(id)?.is_some() => Some(id),
                _ => {
                    errors.add("manufacturer", INVALID_CHOICE);
                    None
                }
            }
        };

        let mut driver_ids: Vec<i64> = Vec::with_capacity(self.drivers.len());
        for raw in &self.drivers {
            match raw.trim().parse::<i64>() {
                Ok(id) if persistence.get_driver_by_id(id)?.is_some() => {
                    if !driver_ids.contains(&id) {
                        driver_ids.push(id);
                    }
                }
                _ => errors.add(
                    "drivers",
                    format!("Select a valid choice. {raw} is not one of the available choices."),
                ),
            }
        }

        match (model, manufacturer_id) {
            (Some(model), Some(manufacturer_id)) if errors.is_empty() => Ok(CleanCar {
                model,
                manufacturer_id,
                driver_ids,
            }),
            _ => Err(ApiError::Validation(errors)),
        }
    }
}

/// Login form.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
    /// Where to go after a successful login.
    pub next: String,
}

/// `?name=` filter of the manufacturer list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ManufacturerSearch {
    pub name: Option<String>,
}

/// `?model=` filter of the car list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CarSearch {
    pub model: Option<String>,
}

/// `?username=` filter of the driver list.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DriverSearch {
    pub username: Option<String>,
}

/// `?next=` parameter of the login page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

/// The search box shown above a list, echoing the submitted value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchForm {
    /// Query parameter name.
    pub field: &'static str,
    /// The submitted value, or empty.
    pub value: String,
    pub placeholder: String,
}

impl SearchForm {
    #[must_use]
    pub fn new(field: &'static str, value: Option<&str>) -> Self {
        Self {
            field,
            value: value.unwrap_or_default().to_string(),
            placeholder: format!("Search by {field}"),
        }
    }
}

fn clean_required_text(
    field: &'static str,
    value: &str,
    errors: &mut FormErrors,
) -> Option<String> {
    match validate_required_text(field, value, MAX_NAME_LENGTH) {
        Ok(value) => Some(value),
        Err(e) => {
            errors.add(field, e.to_string());
            None
        }
    }
}

fn clean_optional_text(
    field: &'static str,
    value: &str,
    max: usize,
    errors: &mut FormErrors,
) -> Option<String> {
    let trimmed: &str = value.trim();
    let length: usize = trimmed.chars().count();
    if length > max {
        errors.add(
            field,
            DomainError::FieldTooLong { field, max, length }.to_string(),
        );
        return None;
    }
    Some(trimmed.to_string())
}

/// Validates format and uniqueness of a submitted license number.
///
/// `owner` is the driver allowed to already hold it.
fn clean_license_number(
    raw: &str,
    owner: Option<i64>,
    persistence: &mut Persistence,
    errors: &mut FormErrors,
) -> Result<Option<LicenseNumber>, ApiError> {
    let raw: &str = raw.trim();
    if raw.is_empty() {
        errors.add("license_number", REQUIRED);
        return Ok(None);
    }

    let license_number: LicenseNumber = match LicenseNumber::parse(raw) {
        Ok(license_number) => license_number,
        Err(e) => {
            errors.add("license_number", e.to_string());
            return Ok(None);
        }
    };

    if persistence.license_number_in_use(license_number.as_str(), owner)? {
        errors.add("license_number", LICENSE_TAKEN);
        return Ok(None);
    }

    Ok(Some(license_number))
}
