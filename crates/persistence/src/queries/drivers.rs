// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Driver queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use taxi_domain::Driver;
use tracing::debug;

use crate::data_models::DriverCredentials;
use crate::diesel_schema::drivers;
use crate::error::PersistenceError;
use crate::queries::contains_pattern;

/// Diesel Queryable struct for driver rows.
///
/// The password hash is not selected here; see `get_driver_credentials`.
#[derive(Queryable, Selectable)]
#[diesel(table_name = drivers)]
pub(crate) struct DriverRow {
    driver_id: i64,
    username: String,
    first_name: String,
    last_name: String,
    license_number: String,
    is_staff: i32,
}

impl From<DriverRow> for Driver {
    fn from(row: DriverRow) -> Self {
        Self {
            driver_id: row.driver_id,
            username: row.username,
            first_name: row.first_name,
            last_name: row.last_name,
            license_number: row.license_number,
            is_staff: row.is_staff != 0,
        }
    }
}

/// Retrieves a driver by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the driver is not found.
pub fn get_driver_by_id(
    conn: &mut SqliteConnection,
    driver_id: i64,
) -> Result<Option<Driver>, PersistenceError> {
    debug!(driver_id, "Looking up driver by ID");

    let row: Option<DriverRow> = drivers::table
        .filter(drivers::driver_id.eq(driver_id))
        .select(DriverRow::as_select())
        .first(conn)
        .optional()?;

    Ok(row.map(Driver::from))
}

/// Retrieves a driver by exact username.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the driver is not found.
pub fn get_driver_by_username(
    conn: &mut SqliteConnection,
    username: &str,
) -> Result<Option<Driver>, PersistenceError> {
    debug!(username, "Looking up driver by username");

    let row: Option<DriverRow> = drivers::table
        .filter(drivers::username.eq(username))
        .select(DriverRow::as_select())
        .first(conn)
        .optional()?;

    Ok(row.map(Driver::from))
}

/// Retrieves the stored password hash for a username.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if no driver has this username.
pub fn get_driver_credentials(
    conn: &mut SqliteConnection,
    username: &str,
) -> Result<Option<DriverCredentials>, PersistenceError> {
    let row: Option<(i64, String)> = drivers::table
        .filter(drivers::username.eq(username))
        .select((drivers::driver_id, drivers::password_hash))
        .first(conn)
        .optional()?;

    Ok(row.map(|(driver_id, password_hash)| DriverCredentials {
        driver_id,
        password_hash,
    }))
}

/// Returns whether a driver with the given ID exists.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn driver_exists(
    conn: &mut SqliteConnection,
    driver_id: i64,
) -> Result<bool, PersistenceError> {
    Ok(diesel::select(diesel::dsl::exists(
        drivers::table.filter(drivers::driver_id.eq(driver_id)),
    ))
    .get_result(conn)?)
}

/// Returns whether a username is already taken.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn username_exists(
    conn: &mut SqliteConnection,
    username: &str,
) -> Result<bool, PersistenceError> {
    Ok(diesel::select(diesel::dsl::exists(
        drivers::table.filter(drivers::username.eq(username)),
    ))
    .get_result(conn)?)
}

/// Returns whether a license number is held by a driver other than `excluding`.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn license_number_in_use(
    conn: &mut SqliteConnection,
    license_number: &str,
    excluding: Option<i64>,
) -> Result<bool, PersistenceError> {
    let mut query = drivers::table
        .filter(drivers::license_number.eq(license_number))
        .select(drivers::driver_id)
        .into_boxed::<Sqlite>();

    if let Some(driver_id) = excluding {
        query = query.filter(drivers::driver_id.ne(driver_id));
    }

    let holders: Vec<i64> = query.limit(1).load(conn)?;
    Ok(!holders.is_empty())
}

/// Lists drivers ordered by username.
///
/// When `username_filter` is non-empty only drivers whose username contains
/// it (ASCII case-insensitively) are returned.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_drivers(
    conn: &mut SqliteConnection,
    username_filter: Option<&str>,
) -> Result<Vec<Driver>, PersistenceError> {
    debug!(?username_filter, "Listing drivers");

    let mut query = drivers::table
        .select(DriverRow::as_select())
        .order(drivers::username.asc())
        .into_boxed::<Sqlite>();

    if let Some(username) = username_filter.filter(|username| !username.is_empty()) {
        let pattern: String = contains_pattern(username);
        query = query.filter(drivers::username.like(pattern).escape('\\'));
    }

    let rows: Vec<DriverRow> = query.load(conn)?;
    Ok(rows.into_iter().map(Driver::from).collect())
}
