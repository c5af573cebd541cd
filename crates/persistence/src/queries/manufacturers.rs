// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Manufacturer queries.

use diesel::SqliteConnection;
use diesel::prelude::*;
use diesel::sqlite::Sqlite;
use taxi_domain::Manufacturer;
use tracing::debug;

use crate::diesel_schema::manufacturers;
use crate::error::PersistenceError;
use crate::queries::contains_pattern;

/// Diesel Queryable struct for manufacturer rows.
#[derive(Queryable, Selectable)]
#[diesel(table_name = manufacturers)]
pub(crate) struct ManufacturerRow {
    manufacturer_id: i64,
    name: String,
    country: String,
}

impl From<ManufacturerRow> for Manufacturer {
    fn from(row: ManufacturerRow) -> Self {
        Self {
            manufacturer_id: row.manufacturer_id,
            name: row.name,
            country: row.country,
        }
    }
}

/// Retrieves a manufacturer by ID.
///
/// # Errors
///
/// Returns an error if the database query fails.
/// Returns `Ok(None)` if the manufacturer is not found.
pub fn get_manufacturer(
    conn: &mut SqliteConnection,
    manufacturer_id: i64,
) -> Result<Option<Manufacturer>, PersistenceError> {
    debug!(manufacturer_id, "Looking up manufacturer");

    let row: Option<ManufacturerRow> = manufacturers::table
        .filter(manufacturers::manufacturer_id.eq(manufacturer_id))
        .select(ManufacturerRow::as_select())
        .first(conn)
        .optional()?;

    Ok(row.map(Manufacturer::from))
}

/// Returns whether a manufacturer with the given ID exists.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn manufacturer_exists(
    conn: &mut SqliteConnection,
    manufacturer_id: i64,
) -> Result<bool, PersistenceError> {
    Ok(diesel::select(diesel::dsl::exists(
        manufacturers::table.filter(manufacturers::manufacturer_id.eq(manufacturer_id)),
    ))
    .get_result(conn)?)
}

/// Lists manufacturers ordered by name.
///
/// When `name_filter` is non-empty only manufacturers whose name contains it
/// (ASCII case-insensitively) are returned.
///
/// # Errors
///
/// Returns an error if the database query fails.
pub fn list_manufacturers(
    conn: &mut SqliteConnection,
    name_filter: Option<&str>,
) -> Result<Vec<Manufacturer>, PersistenceError> {
    debug!(?name_filter, "Listing manufacturers");

    let mut query = manufacturers::table
        .select(ManufacturerRow::as_select())
        .order((
            manufacturers::name.asc(),
            manufacturers::manufacturer_id.asc(),
        ))
        .into_boxed::<Sqlite>();

    if let Some(name) = name_filter.filter(|name| !name.is_empty()) {
        let pattern: String = contains_pattern(name);
        query = query.filter(manufacturers::name.like(pattern).escape('\\'));
    }

    let rows: Vec<ManufacturerRow> = query.load(conn)?;
    Ok(rows.into_iter().map(Manufacturer::from).collect())
}
