// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Car mutations and Car↔Driver assignment.
//!
//! The relation is stored once in `cars_drivers`, so an assignment made from
//! the car side is visible from the driver side and the reverse.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::{debug, info};

use crate::backend::PersistenceBackend;
use crate::diesel_schema::{cars, cars_drivers};
use crate::error::PersistenceError;
use crate::queries::cars::{car_exists, is_driver_assigned};
use crate::queries::drivers::driver_exists;
use crate::queries::manufacturers::manufacturer_exists;

/// Creates a car for an existing manufacturer and returns its ID.
///
/// # Errors
///
/// Returns `ManufacturerNotFound` if the manufacturer does not exist, or an
/// error if the insert fails.
pub fn create_car(
    conn: &mut SqliteConnection,
    model: &str,
    manufacturer_id: i64,
) -> Result<i64, PersistenceError> {
    if !manufacturer_exists(conn, manufacturer_id)? {
        return Err(PersistenceError::ManufacturerNotFound(manufacturer_id));
    }

    diesel::insert_into(cars::table)
        .values((
            cars::model.eq(model),
            cars::manufacturer_id.eq(manufacturer_id),
        ))
        .execute(conn)?;

    let car_id: i64 = conn.get_last_insert_rowid()?;

    info!(car_id, model, manufacturer_id, "Created car");
    Ok(car_id)
}

/// Creates a car and assigns its drivers in one transaction.
///
/// Either the car is stored with every listed driver, or nothing is stored.
///
/// # Errors
///
/// Returns `ManufacturerNotFound` or `DriverNotFound` for unknown IDs, or an
/// error if the transaction fails.
pub fn create_car_with_drivers(
    conn: &mut SqliteConnection,
    model: &str,
    manufacturer_id: i64,
    driver_ids: &[i64],
) -> Result<i64, PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|conn| {
        let car_id: i64 = create_car(conn, model, manufacturer_id)?;
        set_car_drivers(conn, car_id, driver_ids)?;
        Ok(car_id)
    })
}

/// Deletes a car and its driver assignments.
///
/// # Errors
///
/// Returns `CarNotFound` if no row has this ID, or an error if the delete
/// fails.
pub fn delete_car(conn: &mut SqliteConnection, car_id: i64) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::delete(cars::table)
        .filter(cars::car_id.eq(car_id))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::CarNotFound(car_id));
    }

    info!(car_id, "Deleted car");
    Ok(())
}

/// Replaces the set of drivers assigned to a car.
///
/// Duplicate IDs in `driver_ids` are ignored. Nothing changes unless every
/// driver exists.
///
/// # Errors
///
/// Returns `CarNotFound` or `DriverNotFound` for unknown IDs, or an error if
/// the transaction fails.
pub fn set_car_drivers(
    conn: &mut SqliteConnection,
    car_id: i64,
    driver_ids: &[i64],
) -> Result<(), PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|conn| {
        if !car_exists(conn, car_id)? {
            return Err(PersistenceError::CarNotFound(car_id));
        }

        for &driver_id in driver_ids {
            if !driver_exists(conn, driver_id)? {
                return Err(PersistenceError::DriverNotFound(driver_id));
            }
        }

        diesel::delete(cars_drivers::table)
            .filter(cars_drivers::car_id.eq(car_id))
            .execute(conn)?;

        for &driver_id in driver_ids {
            diesel::insert_or_ignore_into(cars_drivers::table)
                .values((
                    cars_drivers::car_id.eq(car_id),
                    cars_drivers::driver_id.eq(driver_id),
                ))
                .execute(conn)?;
        }

        info!(car_id, drivers = driver_ids.len(), "Replaced car drivers");
        Ok(())
    })
}

/// Adds a driver to a car. Adding an existing assignment is a no-op.
///
/// # Errors
///
/// Returns `ForeignKeyViolation` if either side does not exist, or an error
/// if the insert fails.
pub fn assign_driver(
    conn: &mut SqliteConnection,
    car_id: i64,
    driver_id: i64,
) -> Result<(), PersistenceError> {
    diesel::insert_or_ignore_into(cars_drivers::table)
        .values((
            cars_drivers::car_id.eq(car_id),
            cars_drivers::driver_id.eq(driver_id),
        ))
        .execute(conn)?;

    debug!(car_id, driver_id, "Assigned driver to car");
    Ok(())
}

/// Removes a driver from a car. Removing a missing assignment is a no-op.
///
/// # Errors
///
/// Returns an error if the delete fails.
pub fn unassign_driver(
    conn: &mut SqliteConnection,
    car_id: i64,
    driver_id: i64,
) -> Result<(), PersistenceError> {
    diesel::delete(cars_drivers::table)
        .filter(cars_drivers::car_id.eq(car_id))
        .filter(cars_drivers::driver_id.eq(driver_id))
        .execute(conn)?;

    debug!(car_id, driver_id, "Unassigned driver from car");
    Ok(())
}

/// Flips whether a driver is assigned to a car.
///
/// Returns `true` when the driver is assigned after the call.
///
/// # Errors
///
/// Returns `CarNotFound` or `DriverNotFound` for unknown IDs, or an error if
/// the transaction fails.
pub fn toggle_car_assignment(
    conn: &mut SqliteConnection,
    car_id: i64,
    driver_id: i64,
) -> Result<bool, PersistenceError> {
    conn.transaction::<_, PersistenceError, _>(|conn| {
        if !car_exists(conn, car_id)? {
            return Err(PersistenceError::CarNotFound(car_id));
        }
        if !driver_exists(conn, driver_id)? {
            return Err(PersistenceError::DriverNotFound(driver_id));
        }

        let assigned: bool = if is_driver_assigned(conn, car_id, driver_id)? {
            unassign_driver(conn, car_id, driver_id)?;
            false
        } else {
            assign_driver(conn, car_id, driver_id)?;
            true
        };

        info!(car_id, driver_id, assigned, "Toggled car assignment");
        Ok(assigned)
    })
}
