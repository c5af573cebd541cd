// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Domain types for the taxi service.
//!
//! A fleet is made of manufacturers, the cars they build, and the drivers
//! assigned to those cars. Drivers are also the login accounts of the
//! application.

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

mod error;
mod license;
mod types;
pub mod urls;
mod validation;

#[cfg(test)]
mod tests;

pub use error::DomainError;
pub use license::LicenseNumber;
pub use types::{AbsoluteUrl, Car, Driver, Manufacturer};
pub use validation::{
    MAX_NAME_LENGTH, MAX_USERNAME_LENGTH, validate_required_text, validate_username,
};
