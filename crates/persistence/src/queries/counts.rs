// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Aggregate counts.

use diesel::SqliteConnection;
use diesel::prelude::*;

use crate::data_models::FleetCounts;
use crate::diesel_schema::{cars, drivers, manufacturers};
use crate::error::PersistenceError;

/// Counts drivers, cars and manufacturers.
///
/// # Errors
///
/// Returns an error if any count query fails.
pub fn fleet_counts(conn: &mut SqliteConnection) -> Result<FleetCounts, PersistenceError> {
    let drivers: i64 = drivers::table.count().get_result(conn)?;
    let cars: i64 = cars::table.count().get_result(conn)?;
    let manufacturers: i64 = manufacturers::table.count().get_result(conn)?;

    Ok(FleetCounts {
        drivers,
        cars,
        manufacturers,
    })
}
