// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Car queries, including membership of the Car↔Driver relation.
//!
//! Membership can be asked from either side (`list_car_drivers` and
//! `list_driver_cars`); both read the same `cars_drivers` rows.

use diesel::SqliteConnection;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use taxi_domain::{Car, Driver, Manufacturer};
use tracing::debug;

use crate::diesel_schema::{cars, cars_drivers, drivers, manufacturers};
use crate::error::PersistenceError;
use crate::queries::contains_pattern;
use crate::queries::drivers::DriverRow;
use crate::queries::manufacturers::ManufacturerRow;

/// Diesel Queryable struct for car rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = cars)]
pub(crate) struct CarRow {
    car_id: i64,
    model: String,
}

/// Assembles a domain car from a car row joined with its manufacturer.
fn to_car((car, manufacturer): (CarRow, ManufacturerRow)) -> Car {
    Car {
        car_id: car.car_id,
        model: car.model,
        manufacturer: Manufacturer::from(manufacturer),
    }
}

/// Retrieves a car together with its manufacturer.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the car is not found.
pub fn get_car(conn: &mut SqliteConnection, car_id: i64) -> Result<Option<Car>, PersistenceError> {
    debug!(car_id, "Looking up car");

    let row: Option<(CarRow, ManufacturerRow)> = cars::table
        .inner_join(manufacturers::table)
        .filter(cars::car_id.eq(car_id))
        .select((CarRow::as_select(), ManufacturerRow::as_select()))
        .first(conn)
        .optional()?;

    Ok(row.map(to_car))
}

/// Returns whether a car with the given ID exists.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn car_exists(conn: &mut SqliteConnection, car_id: i64) -> Result<bool, PersistenceError> {
    Ok(
        diesel::select(diesel::dsl::exists(cars::table.filter(cars::car_id.eq(car_id))))
            .get_result(conn)?,
    )
}

/// Lists cars ordered by model.
///
/// When `model_filter` is non-empty only cars whose model contains it
/// (ASCII case-insensitively) are returned.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_cars(
    conn: &mut SqliteConnection,
    model_filter: Option<&str>,
) -> Result<Vec<Car>, PersistenceError> {
    debug!(?model_filter, "Listing cars");

    let mut query = cars::table
        .inner_join(manufacturers::table)
        .select((CarRow::as_select(), ManufacturerRow::as_select()))
        .order((cars::model.asc(), cars::car_id.asc()))
        .into_boxed::<Sqlite>();

    if let Some(model) = model_filter.filter(|model| !model.is_empty()) {
        query = query.filter(cars::model.like(contains_pattern(model)).escape('\\'));
    }

    let rows: Vec<(CarRow, ManufacturerRow)> = query.load(conn)?;
    Ok(rows.into_iter().map(to_car).collect())
}

/// Lists the drivers assigned to a car, ordered by username.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_car_drivers(
    conn: &mut SqliteConnection,
    car_id: i64,
) -> Result<Vec<Driver>, PersistenceError> {
    let rows: Vec<DriverRow> = drivers::table
        .inner_join(cars_drivers::table)
        .filter(cars_drivers::car_id.eq(car_id))
        .select(DriverRow::as_select())
        .order(drivers::username.asc())
        .load(conn)?;

    Ok(rows.into_iter().map(Driver::from).collect())
}

/// Lists the cars a driver is assigned to, ordered by model.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_driver_cars(
    conn: &mut SqliteConnection,
    driver_id: i64,
) -> Result<Vec<Car>, PersistenceError> {
    let rows: Vec<(CarRow, ManufacturerRow)> = cars::table
        .inner_join(manufacturers::table)
        .inner_join(cars_drivers::table)
        .filter(cars_drivers::driver_id.eq(driver_id))
        .select((CarRow::as_select(), ManufacturerRow::as_select()))
        .order((cars::model.asc(), cars::car_id.asc()))
        .load(conn)?;

    Ok(rows.into_iter().map(to_car).collect())
}

/// Returns whether a driver is assigned to a car.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn is_driver_assigned(
    conn: &mut SqliteConnection,
    car_id: i64,
    driver_id: i64,
) -> Result<bool, PersistenceError> {
    Ok(diesel::select(diesel::dsl::exists(
        cars_drivers::table
            .filter(cars_drivers::car_id.eq(car_id))
            .filter(cars_drivers::driver_id.eq(driver_id)),
    ))
    .get_result(conn)?)
}
