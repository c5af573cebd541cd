// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Driver account mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::{debug, info};

use crate::backend::PersistenceBackend;
use crate::data_models::NewDriver;
use crate::diesel_schema::drivers;
use crate::error::PersistenceError;

/// Creates a driver account and returns its ID.
///
/// The password is hashed with bcrypt at `hash_cost` before it is stored.
///
/// # Errors
///
/// Returns `UniqueViolation` if the username or a non-empty license number
/// is already taken, or an error if hashing or the insert fails.
pub fn create_driver(
    conn: &mut SqliteConnection,
    new_driver: &NewDriver,
    hash_cost: u32,
) -> Result<i64, PersistenceError> {
    let password_hash: String = bcrypt::hash(&new_driver.password, hash_cost)?;

    diesel::insert_into(drivers::table)
        .values((
            drivers::username.eq(&new_driver.username),
            drivers::password_hash.eq(&password_hash),
            drivers::first_name.eq(&new_driver.first_name),
            drivers::last_name.eq(&new_driver.last_name),
            drivers::license_number.eq(&new_driver.license_number),
            drivers::is_staff.eq(i32::from(new_driver.is_staff)),
        ))
        .execute(conn)?;

    let driver_id: i64 = conn.get_last_insert_rowid()?;

    info!(driver_id, username = %new_driver.username, "Created driver");
    Ok(driver_id)
}

/// Replaces a driver's license number.
///
/// # Errors
///
/// Returns `DriverNotFound` if no row has this ID, `UniqueViolation` if
/// another driver holds the license, or an error if the update fails.
pub fn update_license_number(
    conn: &mut SqliteConnection,
    driver_id: i64,
    license_number: &str,
) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::update(drivers::table)
        .filter(drivers::driver_id.eq(driver_id))
        .set(drivers::license_number.eq(license_number))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::DriverNotFound(driver_id));
    }

    info!(driver_id, license_number, "Updated license number");
    Ok(())
}

/// Records the current time as the driver's last login.
///
/// # Errors
///
/// Returns an error if the update fails.
pub fn update_last_login(
    conn: &mut SqliteConnection,
    driver_id: i64,
) -> Result<(), PersistenceError> {
    debug!(driver_id, "Updating last_login_at");

    diesel::update(drivers::table)
        .filter(drivers::driver_id.eq(driver_id))
        .set(drivers::last_login_at.eq(diesel::dsl::sql::<
            diesel::sql_types::Nullable<diesel::sql_types::Text>,
        >("CURRENT_TIMESTAMP")))
        .execute(conn)?;

    Ok(())
}

/// Deletes a driver, along with their car assignments and sessions.
///
/// # Errors
///
/// Returns `DriverNotFound` if no row has this ID, or an error if the delete
/// fails.
pub fn delete_driver(conn: &mut SqliteConnection, driver_id: i64) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::delete(drivers::table)
        .filter(drivers::driver_id.eq(driver_id))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::DriverNotFound(driver_id));
    }

    info!(driver_id, "Deleted driver");
    Ok(())
}

/// Checks a plain-text password against a stored bcrypt hash.
///
/// # Errors
///
/// Returns an error if the stored hash is malformed.
pub fn verify_password(password: &str, password_hash: &str) -> Result<bool, PersistenceError> {
    Ok(bcrypt::verify(password, password_hash)?)
}
