// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Named routes of the web interface.
//!
//! The `*_PATTERN` constants are the router paths; the functions build the
//! concrete path for a given primary key. Both live here so the router and
//! the entities' canonical locators cannot drift apart.

use url::form_urlencoded;

/// Home page.
pub const INDEX: &str = "/";

/// Manufacturer list.
pub const MANUFACTURER_LIST: &str = "/manufacturers/";
/// Manufacturer creation form.
pub const MANUFACTURER_CREATE: &str = "/manufacturers/create/";
/// Manufacturer update form.
pub const MANUFACTURER_UPDATE_PATTERN: &str = "/manufacturers/{pk}/update/";
/// Manufacturer deletion.
pub const MANUFACTURER_DELETE_PATTERN: &str = "/manufacturers/{pk}/delete/";

/// Car list.
pub const CAR_LIST: &str = "/cars/";
/// Car creation form.
pub const CAR_CREATE: &str = "/cars/create/";
/// Car detail page.
pub const CAR_DETAIL_PATTERN: &str = "/cars/{pk}/";
/// Car deletion.
pub const CAR_DELETE_PATTERN: &str = "/cars/{pk}/delete/";
/// Assignment toggle for the current driver.
pub const TOGGLE_CAR_ASSIGN_PATTERN: &str = "/cars/{pk}/toggle-assign/";

/// Driver list.
pub const DRIVER_LIST: &str = "/drivers/";
/// Driver account creation form.
pub const DRIVER_CREATE: &str = "/drivers/create/";
/// Driver detail page.
pub const DRIVER_DETAIL_PATTERN: &str = "/drivers/{pk}/";
/// Driver license update form.
pub const DRIVER_LICENSE_UPDATE_PATTERN: &str = "/drivers/{pk}/update/";
/// Driver deletion.
pub const DRIVER_DELETE_PATTERN: &str = "/drivers/{pk}/delete/";

/// Login form.
pub const LOGIN: &str = "/accounts/login/";
/// Logout.
pub const LOGOUT: &str = "/accounts/logout/";

#[must_use]
pub fn manufacturer_update(manufacturer_id: i64) -> String {
    format!("/manufacturers/{manufacturer_id}/update/")
}

#[must_use]
pub fn manufacturer_delete(manufacturer_id: i64) -> String {
    format!("/manufacturers/{manufacturer_id}/delete/")
}

#[must_use]
pub fn car_detail(car_id: i64) -> String {
    format!("/cars/{car_id}/")
}

#[must_use]
pub fn car_delete(car_id: i64) -> String {
    format!("/cars/{car_id}/delete/")
}

#[must_use]
pub fn toggle_car_assign(car_id: i64) -> String {
    format!("/cars/{car_id}/toggle-assign/")
}

#[must_use]
pub fn driver_detail(driver_id: i64) -> String {
    format!("/drivers/{driver_id}/")
}

#[must_use]
pub fn driver_license_update(driver_id: i64) -> String {
    format!("/drivers/{driver_id}/update/")
}

#[must_use]
pub fn driver_delete(driver_id: i64) -> String {
    format!("/drivers/{driver_id}/delete/")
}

/// Builds the login path that returns to `next` after authentication.
///
/// Only local paths are carried over; anything else falls back to the
/// plain login page.
#[must_use]
pub fn login_with_next(next: &str) -> String {
    if is_local_path(next) {
        let encoded: String = form_urlencoded::byte_serialize(next.as_bytes()).collect();
        format!("{LOGIN}?next={encoded}")
    } else {
        LOGIN.to_string()
    }
}

/// Returns whether `path` is a same-site absolute path.
///
/// Rejects scheme-relative (`//host`) and backslash tricks, and anything
/// with control characters, which cannot go into a `Location` header.
#[must_use]
pub fn is_local_path(path: &str) -> bool {
    path.starts_with('/')
        && !path.starts_with("//")
        && !path.contains('\\')
        && !path.chars().any(char::is_control)
}
