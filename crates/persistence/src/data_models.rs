// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Input for creating a driver account.
///
/// The password is plain text here; it is hashed before it reaches the
/// database. No format validation happens at this layer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewDriver {
    pub username: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    pub license_number: String,
    pub is_staff: bool,
}

impl NewDriver {
    /// Creates driver input with only a username and password set.
    #[must_use]
    pub fn new(username: &str, password: &str) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
            ..Self::default()
        }
    }

    /// Sets the license number.
    #[must_use]
    pub fn with_license_number(mut self, license_number: &str) -> Self {
        self.license_number = license_number.to_string();
        self
    }

    /// Sets the first and last name.
    #[must_use]
    pub fn with_name(mut self, first_name: &str, last_name: &str) -> Self {
        self.first_name = first_name.to_string();
        self.last_name = last_name.to_string();
        self
    }

    /// Marks the account as staff.
    #[must_use]
    pub const fn staff(mut self) -> Self {
        self.is_staff = true;
        self
    }
}

/// Login material for a driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverCredentials {
    pub driver_id: i64,
    pub password_hash: String,
}

/// A persisted login session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionData {
    pub session_id: i64,
    pub session_token: String,
    pub driver_id: i64,
    pub created_at: String,
    pub last_activity_at: String,
    pub expires_at: String,
}

/// Entity counts shown on the home page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FleetCounts {
    pub drivers: i64,
    pub cars: i64,
    pub manufacturers: i64,
}
