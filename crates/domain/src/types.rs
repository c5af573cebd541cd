// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::urls;
use serde::{Deserialize, Serialize};

/// Entities that have a canonical page in the web interface.
pub trait AbsoluteUrl {
    /// Returns the canonical path for this entity.
    fn absolute_url(&self) -> String;
}

/// The maker of a car model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manufacturer {
    /// The canonical numeric identifier.
    pub manufacturer_id: i64,
    /// The manufacturer name.
    pub name: String,
    /// The country the manufacturer is based in.
    pub country: String,
}

impl Manufacturer {
    /// Creates a new manufacturer.
    #[must_use]
    pub fn new(manufacturer_id: i64, name: &str, country: &str) -> Self {
        Self {
            manufacturer_id,
            name: name.to_string(),
            country: country.to_string(),
        }
    }
}

impl std::fmt::Display for Manufacturer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.name, self.country)
    }
}

impl AbsoluteUrl for Manufacturer {
    // Manufacturers have no detail page; their edit form stands in for one.
    fn absolute_url(&self) -> String {
        urls::manufacturer_update(self.manufacturer_id)
    }
}

/// A taxi operator.
///
/// Drivers are the login accounts of the application. The password hash is
/// deliberately not part of this type; it never leaves the persistence layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Driver {
    /// The canonical numeric identifier.
    pub driver_id: i64,
    /// The unique login name.
    pub username: String,
    /// Given name (may be empty).
    pub first_name: String,
    /// Family name (may be empty).
    pub last_name: String,
    /// License number as stored (may be empty for staff accounts).
    pub license_number: String,
    /// Whether this account may use administrative workflows.
    pub is_staff: bool,
}

impl Driver {
    /// Returns `"<first_name> <last_name>"` with surrounding whitespace trimmed.
    #[must_use]
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

impl std::fmt::Display for Driver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} ({} {})",
            self.username, self.first_name, self.last_name
        )
    }
}

impl AbsoluteUrl for Driver {
    fn absolute_url(&self) -> String {
        urls::driver_detail(self.driver_id)
    }
}

/// A car in the fleet.
///
/// A car always carries the manufacturer it references, so a `Car` value
/// cannot exist without one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Car {
    /// The canonical numeric identifier.
    pub car_id: i64,
    /// The model name.
    pub model: String,
    /// The manufacturer of this car.
    pub manufacturer: Manufacturer,
}

impl std::fmt::Display for Car {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.model)
    }
}

impl AbsoluteUrl for Car {
    fn absolute_url(&self) -> String {
        urls::car_detail(self.car_id)
    }
}
