// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Manufacturer mutations.

use diesel::SqliteConnection;
use diesel::prelude::*;
use tracing::info;

use crate::backend::PersistenceBackend;
use crate::diesel_schema::manufacturers;
use crate::error::PersistenceError;

/// Creates a manufacturer and returns its ID.
///
/// # Errors
///
/// Returns an error if the insert fails.
pub fn create_manufacturer(
    conn: &mut SqliteConnection,
    name: &str,
    country: &str,
) -> Result<i64, PersistenceError> {
    diesel::insert_into(manufacturers::table)
        .values((
            manufacturers::name.eq(name),
            manufacturers::country.eq(country),
        ))
        .execute(conn)?;

    let manufacturer_id: i64 = conn.get_last_insert_rowid()?;

    info!(manufacturer_id, name, country, "Created manufacturer");
    Ok(manufacturer_id)
}

/// Updates a manufacturer's name and country.
///
/// # Errors
///
/// Returns `ManufacturerNotFound` if no row has this ID, or an error if the
/// update fails.
pub fn update_manufacturer(
    conn: &mut SqliteConnection,
    manufacturer_id: i64,
    name: &str,
    country: &str,
) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::update(manufacturers::table)
        .filter(manufacturers::manufacturer_id.eq(manufacturer_id))
        .set((
            manufacturers::name.eq(name),
            manufacturers::country.eq(country),
        ))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::ManufacturerNotFound(manufacturer_id));
    }

    info!(manufacturer_id, "Updated manufacturer");
    Ok(())
}

/// Deletes a manufacturer.
///
/// Its cars, and their driver assignments, are removed by cascade.
///
/// # Errors
///
/// Returns `ManufacturerNotFound` if no row has this ID, or an error if the
/// delete fails.
pub fn delete_manufacturer(
    conn: &mut SqliteConnection,
    manufacturer_id: i64,
) -> Result<(), PersistenceError> {
    let rows_affected: usize = diesel::delete(manufacturers::table)
        .filter(manufacturers::manufacturer_id.eq(manufacturer_id))
        .execute(conn)?;

    if rows_affected == 0 {
        return Err(PersistenceError::ManufacturerNotFound(manufacturer_id));
    }

    info!(manufacturer_id, "Deleted manufacturer");
    Ok(())
}
