// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the taxi service.
//!
//! Stores manufacturers, cars, drivers, the Car↔Driver assignment relation
//! and login sessions in `SQLite` through Diesel.
//!
//! ## Storage
//!
//! - In-memory databases (`Persistence::new_in_memory`) back tests and the
//!   server when no database path is given. Each call gets its own database.
//! - File databases (`Persistence::new_with_file`) run in WAL mode.
//!
//! Foreign key enforcement is verified on every new connection; the
//! assignment relation and the car→manufacturer reference cascade on delete.
//!
//! ## Layout
//!
//! - `queries/` — read-only lookups and listings
//! - `mutations/` — state-changing operations
//! - `backend/` — PRAGMA handling and migrations

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use diesel::SqliteConnection;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use taxi_domain::{Car, Driver, Manufacturer};

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;

#[cfg(test)]
mod tests;

pub use data_models::{DriverCredentials, FleetCounts, NewDriver, SessionData};
pub use error::PersistenceError;

use backend::PersistenceBackend;

/// Atomic counter for generating unique in-memory database names.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Persistence adapter for the fleet.
///
/// Wraps a single `SQLite` connection. Callers that share it across tasks
/// hold it behind a mutex.
pub struct Persistence {
    conn: SqliteConnection,
    password_hash_cost: u32,
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique shared-cache database, so instances never
    /// observe each other's data.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:taxi_memdb_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        conn.verify_foreign_key_enforcement()?;

        Ok(Self {
            conn,
            password_hash_cost: bcrypt::DEFAULT_COST,
        })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        conn.verify_foreign_key_enforcement()?;

        Ok(Self {
            conn,
            password_hash_cost: bcrypt::DEFAULT_COST,
        })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        self.conn.verify_foreign_key_enforcement()
    }

    /// Sets the bcrypt cost used when hashing new passwords.
    ///
    /// Values outside bcrypt's supported range make `create_driver` fail.
    pub const fn set_password_hash_cost(&mut self, cost: u32) {
        self.password_hash_cost = cost;
    }

    /// Returns the bcrypt cost used when hashing new passwords.
    #[must_use]
    pub const fn password_hash_cost(&self) -> u32 {
        self.password_hash_cost
    }

    // ========================================================================
    // Manufacturers
    // ========================================================================

    /// Creates a manufacturer and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_manufacturer(
        &mut self,
        name: &str,
        country: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::manufacturers::create_manufacturer(&mut self.conn, name, country)
    }

    /// Updates a manufacturer.
    ///
    /// # Errors
    ///
    /// Returns `ManufacturerNotFound` for an unknown ID.
    pub fn update_manufacturer(
        &mut self,
        manufacturer_id: i64,
        name: &str,
        country: &str,
    ) -> Result<(), PersistenceError> {
        mutations::manufacturers::update_manufacturer(
            &mut self.conn,
            manufacturer_id,
            name,
            country,
        )
    }

    /// Deletes a manufacturer and, by cascade, its cars.
    ///
    /// # Errors
    ///
    /// Returns `ManufacturerNotFound` for an unknown ID.
    pub fn delete_manufacturer(&mut self, manufacturer_id: i64) -> Result<(), PersistenceError> {
        mutations::manufacturers::delete_manufacturer(&mut self.conn, manufacturer_id)
    }

    /// Retrieves a manufacturer by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_manufacturer(
        &mut self,
        manufacturer_id: i64,
    ) -> Result<Option<Manufacturer>, PersistenceError> {
        queries::manufacturers::get_manufacturer(&mut self.conn, manufacturer_id)
    }

    /// Lists manufacturers, optionally filtered by a name fragment.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_manufacturers(
        &mut self,
        name_filter: Option<&str>,
    ) -> Result<Vec<Manufacturer>, PersistenceError> {
        queries::manufacturers::list_manufacturers(&mut self.conn, name_filter)
    }

    // ========================================================================
    // Cars
    // ========================================================================

    /// Creates a car and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns `ManufacturerNotFound` if the manufacturer does not exist.
    pub fn create_car(
        &mut self,
        model: &str,
        manufacturer_id: i64,
    ) -> Result<i64, PersistenceError> {
        mutations::cars::create_car(&mut self.conn, model, manufacturer_id)
    }

    /// Creates a car together with its drivers and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns `ManufacturerNotFound` or `DriverNotFound` for unknown IDs;
    /// in that case no car is stored.
    pub fn create_car_with_drivers(
        &mut self,
        model: &str,
        manufacturer_id: i64,
        driver_ids: &[i64],
    ) -> Result<i64, PersistenceError> {
        mutations::cars::create_car_with_drivers(&mut self.conn, model, manufacturer_id, driver_ids)
    }

    /// Deletes a car.
    ///
    /// # Errors
    ///
    /// Returns `CarNotFound` for an unknown ID.
    pub fn delete_car(&mut self, car_id: i64) -> Result<(), PersistenceError> {
        mutations::cars::delete_car(&mut self.conn, car_id)
    }

    /// Retrieves a car with its manufacturer.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_car(&mut self, car_id: i64) -> Result<Option<Car>, PersistenceError> {
        queries::cars::get_car(&mut self.conn, car_id)
    }

    /// Lists cars, optionally filtered by a model fragment.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_cars(&mut self, model_filter: Option<&str>) -> Result<Vec<Car>, PersistenceError> {
        queries::cars::list_cars(&mut self.conn, model_filter)
    }

    /// Lists the drivers assigned to a car.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_car_drivers(&mut self, car_id: i64) -> Result<Vec<Driver>, PersistenceError> {
        queries::cars::list_car_drivers(&mut self.conn, car_id)
    }

    /// Lists the cars a driver is assigned to.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_driver_cars(&mut self, driver_id: i64) -> Result<Vec<Car>, PersistenceError> {
        queries::cars::list_driver_cars(&mut self.conn, driver_id)
    }

    /// Returns whether a driver is assigned to a car.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn is_driver_assigned(
        &mut self,
        car_id: i64,
        driver_id: i64,
    ) -> Result<bool, PersistenceError> {
        queries::cars::is_driver_assigned(&mut self.conn, car_id, driver_id)
    }

    /// Replaces the drivers assigned to a car.
    ///
    /// # Errors
    ///
    /// Returns `CarNotFound` or `DriverNotFound` for unknown IDs.
    pub fn set_car_drivers(
        &mut self,
        car_id: i64,
        driver_ids: &[i64],
    ) -> Result<(), PersistenceError> {
        mutations::cars::set_car_drivers(&mut self.conn, car_id, driver_ids)
    }

    /// Assigns a driver to a car. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns `ForeignKeyViolation` if either side does not exist.
    pub fn assign_driver(&mut self, car_id: i64, driver_id: i64) -> Result<(), PersistenceError> {
        mutations::cars::assign_driver(&mut self.conn, car_id, driver_id)
    }

    /// Removes a driver from a car. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn unassign_driver(&mut self, car_id: i64, driver_id: i64) -> Result<(), PersistenceError> {
        mutations::cars::unassign_driver(&mut self.conn, car_id, driver_id)
    }

    /// Flips a driver's assignment to a car; returns the new state.
    ///
    /// # Errors
    ///
    /// Returns `CarNotFound` or `DriverNotFound` for unknown IDs.
    pub fn toggle_car_assignment(
        &mut self,
        car_id: i64,
        driver_id: i64,
    ) -> Result<bool, PersistenceError> {
        mutations::cars::toggle_car_assignment(&mut self.conn, car_id, driver_id)
    }

    // ========================================================================
    // Drivers
    // ========================================================================

    /// Creates a driver account, hashing its password, and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns `UniqueViolation` for a taken username or license number.
    pub fn create_driver(&mut self, new_driver: &NewDriver) -> Result<i64, PersistenceError> {
        mutations::drivers::create_driver(&mut self.conn, new_driver, self.password_hash_cost)
    }

    /// Retrieves a driver by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_driver_by_id(&mut self, driver_id: i64) -> Result<Option<Driver>, PersistenceError> {
        queries::drivers::get_driver_by_id(&mut self.conn, driver_id)
    }

    /// Retrieves a driver by username.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_driver_by_username(
        &mut self,
        username: &str,
    ) -> Result<Option<Driver>, PersistenceError> {
        queries::drivers::get_driver_by_username(&mut self.conn, username)
    }

    /// Retrieves the stored credentials for a username.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_driver_credentials(
        &mut self,
        username: &str,
    ) -> Result<Option<DriverCredentials>, PersistenceError> {
        queries::drivers::get_driver_credentials(&mut self.conn, username)
    }

    /// Returns the driver ID when `password` matches the stored hash for `username`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the stored hash is malformed.
    pub fn verify_credentials(
        &mut self,
        username: &str,
        password: &str,
    ) -> Result<Option<i64>, PersistenceError> {
        let Some(credentials) = self.get_driver_credentials(username)? else {
            return Ok(None);
        };

        if mutations::drivers::verify_password(password, &credentials.password_hash)? {
            Ok(Some(credentials.driver_id))
        } else {
            Ok(None)
        }
    }

    /// Returns whether a username is taken.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn username_exists(&mut self, username: &str) -> Result<bool, PersistenceError> {
        queries::drivers::username_exists(&mut self.conn, username)
    }

    /// Returns whether a license number is held by a driver other than `excluding`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn license_number_in_use(
        &mut self,
        license_number: &str,
        excluding: Option<i64>,
    ) -> Result<bool, PersistenceError> {
        queries::drivers::license_number_in_use(&mut self.conn, license_number, excluding)
    }

    /// Lists drivers, optionally filtered by a username fragment.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_drivers(
        &mut self,
        username_filter: Option<&str>,
    ) -> Result<Vec<Driver>, PersistenceError> {
        queries::drivers::list_drivers(&mut self.conn, username_filter)
    }

    /// Replaces a driver's license number.
    ///
    /// # Errors
    ///
    /// Returns `DriverNotFound` for an unknown ID or `UniqueViolation` for a
    /// license held by someone else.
    pub fn update_license_number(
        &mut self,
        driver_id: i64,
        license_number: &str,
    ) -> Result<(), PersistenceError> {
        mutations::drivers::update_license_number(&mut self.conn, driver_id, license_number)
    }

    /// Records a successful login.
    ///
    /// # Errors
    ///
    /// Returns an error if the update fails.
    pub fn update_last_login(&mut self, driver_id: i64) -> Result<(), PersistenceError> {
        mutations::drivers::update_last_login(&mut self.conn, driver_id)
    }

    /// Deletes a driver with their assignments and sessions.
    ///
    /// # Errors
    ///
    /// Returns `DriverNotFound` for an unknown ID.
    pub fn delete_driver(&mut self, driver_id: i64) -> Result<(), PersistenceError> {
        mutations::drivers::delete_driver(&mut self.conn, driver_id)
    }

    // ========================================================================
    // Sessions
    // ========================================================================

    /// Creates a session and returns its ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn create_session(
        &mut self,
        session_token: &str,
        driver_id: i64,
        created_at: &str,
        expires_at: &str,
    ) -> Result<i64, PersistenceError> {
        mutations::sessions::create_session(
            &mut self.conn,
            session_token,
            driver_id,
            created_at,
            expires_at,
        )
    }

    /// Retrieves a session by token.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn get_session_by_token(
        &mut self,
        session_token: &str,
    ) -> Result<Option<SessionData>, PersistenceError> {
        queries::sessions::get_session_by_token(&mut self.conn, session_token)
    }

    /// Records activity on a session.
    ///
    /// # Errors
    ///
    /// Returns `SessionNotFound` for an unknown token.
    pub fn update_session_activity(
        &mut self,
        session_token: &str,
        now: &str,
    ) -> Result<(), PersistenceError> {
        mutations::sessions::update_session_activity(&mut self.conn, session_token, now)
    }

    /// Deletes a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_session(&mut self, session_token: &str) -> Result<(), PersistenceError> {
        mutations::sessions::delete_session(&mut self.conn, session_token)
    }

    /// Deletes sessions that expired at or before `now`.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_expired_sessions(&mut self, now: &str) -> Result<usize, PersistenceError> {
        mutations::sessions::delete_expired_sessions(&mut self.conn, now)
    }

    // ========================================================================
    // Counts
    // ========================================================================

    /// Counts drivers, cars and manufacturers.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn fleet_counts(&mut self) -> Result<FleetCounts, PersistenceError> {
        queries::counts::fleet_counts(&mut self.conn)
    }
}
