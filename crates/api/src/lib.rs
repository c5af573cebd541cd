// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Application layer of the taxi service.
//!
//! Forms, list and detail pages, the assignment toggle and session
//! authentication. Everything here works on a `Persistence` handle and
//! produces template pages or redirect targets; HTTP lives in the server.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod auth;
mod error;
pub mod forms;
pub mod handlers;
mod password_policy;
pub mod views;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedDriver, AuthenticationService, INVALID_LOGIN, LoginSession};
pub use error::{ApiError, AuthError, FormErrors, NON_FIELD_ERRORS};
pub use handlers::LoginOutcome;
pub use password_policy::{PasswordPolicy, PasswordPolicyError, UserAttributes};
pub use views::{Outcome, Page};
