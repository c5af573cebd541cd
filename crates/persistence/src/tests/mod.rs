// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod manufacturer_tests;

use crate::{NewDriver, Persistence};

/// Cheapest cost bcrypt accepts.
const TEST_HASH_COST: u32 = 4;

/// Creates an in-memory store that hashes passwords at the cheapest cost.
pub fn create_test_persistence() -> Persistence {
    let mut persistence: Persistence = Persistence::new_in_memory().expect("in-memory database");
    persistence.set_password_hash_cost(TEST_HASH_COST);
    persistence
}

/// Creates a driver with the given username and license number.
pub fn create_test_driver(persistence: &mut Persistence, username: &str, license: &str) -> i64 {
    persistence
        .create_driver(&NewDriver::new(username, "Testpass123!").with_license_number(license))
        .expect("driver created")
}

/// Creates a manufacturer and one of its cars, returning the car ID.
pub fn create_test_car(persistence: &mut Persistence, model: &str) -> i64 {
    let manufacturer_id: i64 = persistence
        .create_manufacturer("Toyota", "Japan")
        .expect("manufacturer created");
    persistence
        .create_car(model, manufacturer_id)
        .expect("car created")
}
