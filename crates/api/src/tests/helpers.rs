// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test helper functions and fixtures.

use serde_json::Value;
use taxi_persistence::{NewDriver, Persistence};

use crate::AuthenticatedDriver;
use crate::views::Page;

pub const TEST_PASSWORD: &str = "testpass123";

/// Cheapest cost bcrypt accepts.
const TEST_HASH_COST: u32 = 4;

pub fn create_test_persistence() -> Persistence {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();
    persistence.set_password_hash_cost(TEST_HASH_COST);
    persistence
}

/// Creates a driver account and returns it as the request's driver.
pub fn create_test_driver(
    persistence: &mut Persistence,
    username: &str,
    license_number: &str,
) -> AuthenticatedDriver {
    let driver_id: i64 = persistence
        .create_driver(&NewDriver::new(username, TEST_PASSWORD).with_license_number(license_number))
        .unwrap();
    let driver = persistence.get_driver_by_id(driver_id).unwrap().unwrap();
    AuthenticatedDriver::from(&driver)
}

/// Creates the staff account most tests act as.
pub fn create_test_admin(persistence: &mut Persistence) -> AuthenticatedDriver {
    let driver_id: i64 = persistence
        .create_driver(&NewDriver::new("admin", "admin123").staff())
        .unwrap();
    let driver = persistence.get_driver_by_id(driver_id).unwrap().unwrap();
    AuthenticatedDriver::from(&driver)
}

pub fn context_value<'a>(page: &'a Page, key: &str) -> &'a Value {
    page.context
        .get(key)
        .unwrap_or_else(|| panic!("context has no `{key}`"))
}

pub fn context_list<'a>(page: &'a Page, key: &str) -> &'a Vec<Value> {
    context_value(page, key)
        .as_array()
        .unwrap_or_else(|| panic!("`{key}` is not a list"))
}
