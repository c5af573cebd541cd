// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session-based authentication.
//!
//! Every driver account can log in. A successful login stores a random
//! token in the `sessions` table; the token is what the browser presents
//! on later requests.

use serde::Serialize;
use taxi_domain::Driver;
use taxi_persistence::{Persistence, PersistenceError, SessionData};
use time::format_description::well_known::Rfc3339;
use time::{Duration, OffsetDateTime};
use tracing::{debug, info, warn};

use crate::error::AuthError;

/// Message shown on the login form when credentials are rejected.
pub const INVALID_LOGIN: &str = "Please enter a correct username and password.";

/// The driver behind the current request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuthenticatedDriver {
    /// The canonical numeric identifier.
    pub driver_id: i64,
    /// The login name.
    pub username: String,
    /// Whether the account is staff.
    pub is_staff: bool,
}

impl From<&Driver> for AuthenticatedDriver {
    fn from(driver: &Driver) -> Self {
        Self {
            driver_id: driver.driver_id,
            username: driver.username.clone(),
            is_staff: driver.is_staff,
        }
    }
}

/// A freshly created session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginSession {
    /// The token to hand to the browser.
    pub session_token: String,
    /// The logged-in driver.
    pub driver: AuthenticatedDriver,
    /// When the session stops being accepted.
    pub expires_at: OffsetDateTime,
}

/// Authentication service for login, session validation and logout.
pub struct AuthenticationService;

impl AuthenticationService {
    /// Session lifetime used when none is configured.
    pub const DEFAULT_SESSION_LENGTH: Duration = Duration::days(30);

    /// Checks credentials and opens a session.
    ///
    /// # Errors
    ///
    /// Returns an error if the username is unknown, the password is wrong,
    /// the expiry falls outside the representable range or the session
    /// cannot be stored.
    pub fn login(
        persistence: &mut Persistence,
        username: &str,
        password: &str,
        session_length: Duration,
    ) -> Result<LoginSession, AuthError> {
        let driver_id: i64 = persistence
            .verify_credentials(username, password)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| {
                warn!(username, "Rejected login");
                AuthError::AuthenticationFailed {
                    reason: String::from(INVALID_LOGIN),
                }
            })?;

        let driver: Driver = persistence
            .get_driver_by_id(driver_id)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Driver not found"),
            })?;

        let now: OffsetDateTime = now_utc();
        let Some(expires_at) = now.checked_add(session_length) else {
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Session length out of range"),
            });
        };
        let session_token: String = Self::generate_session_token();

        persistence
            .create_session(
                &session_token,
                driver_id,
                &format_timestamp(now)?,
                &format_timestamp(expires_at)?,
            )
            .map_err(Self::map_persistence_error)?;

        persistence
            .update_last_login(driver_id)
            .map_err(Self::map_persistence_error)?;

        info!(driver_id, username = %driver.username, "Driver logged in");

        Ok(LoginSession {
            session_token,
            driver: AuthenticatedDriver::from(&driver),
            expires_at,
        })
    }

    /// Resolves a session token to its driver.
    ///
    /// Expired sessions are deleted on sight. A valid session has its
    /// activity timestamp refreshed.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is unknown or expired, or its driver no
    /// longer exists.
    pub fn validate_session(
        persistence: &mut Persistence,
        session_token: &str,
    ) -> Result<AuthenticatedDriver, AuthError> {
        let session: SessionData = persistence
            .get_session_by_token(session_token)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Invalid session token"),
            })?;

        let expires_at: OffsetDateTime = OffsetDateTime::parse(&session.expires_at, &Rfc3339)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to parse session expiration: {e}"),
            })?;

        let now: OffsetDateTime = now_utc();
        if now >= expires_at {
            debug!(session_id = session.session_id, "Session expired");
            persistence
                .delete_session(session_token)
                .map_err(Self::map_persistence_error)?;
            return Err(AuthError::AuthenticationFailed {
                reason: String::from("Session expired"),
            });
        }

        let driver: Driver = persistence
            .get_driver_by_id(session.driver_id)
            .map_err(Self::map_persistence_error)?
            .ok_or_else(|| AuthError::AuthenticationFailed {
                reason: String::from("Driver not found"),
            })?;

        persistence
            .update_session_activity(session_token, &format_timestamp(now)?)
            .map_err(Self::map_persistence_error)?;

        Ok(AuthenticatedDriver::from(&driver))
    }

    /// Ends a session. Unknown tokens are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error if the session cannot be deleted.
    pub fn logout(persistence: &mut Persistence, session_token: &str) -> Result<(), AuthError> {
        persistence
            .delete_session(session_token)
            .map_err(|e| AuthError::AuthenticationFailed {
                reason: format!("Failed to delete session: {e}"),
            })?;

        info!("Session ended");
        Ok(())
    }

    /// Removes every expired session.
    ///
    /// # Errors
    ///
    /// Returns an error if the cleanup fails.
    pub fn purge_expired_sessions(persistence: &mut Persistence) -> Result<usize, AuthError> {
        let now: String = format_timestamp(now_utc())?;
        persistence
            .delete_expired_sessions(&now)
            .map_err(Self::map_persistence_error)
    }

    /// 256 random bits, hex encoded.
    fn generate_session_token() -> String {
        format!(
            "{:016x}{:016x}{:016x}{:016x}",
            rand::random::<u64>(),
            rand::random::<u64>(),
            rand::random::<u64>(),
            rand::random::<u64>()
        )
    }

    fn map_persistence_error(err: PersistenceError) -> AuthError {
        match err {
            PersistenceError::SessionNotFound(reason) => AuthError::AuthenticationFailed { reason },
            _ => AuthError::AuthenticationFailed {
                reason: format!("Database error: {err}"),
            },
        }
    }
}

/// The current time, truncated to whole seconds so stored timestamps have a
/// fixed width.
fn now_utc() -> OffsetDateTime {
    let now: OffsetDateTime = OffsetDateTime::now_utc();
    now.replace_nanosecond(0).unwrap_or(now)
}

fn format_timestamp(timestamp: OffsetDateTime) -> Result<String, AuthError> {
    timestamp
        .format(&Rfc3339)
        .map_err(|e| AuthError::AuthenticationFailed {
            reason: format!("Failed to format timestamp: {e}"),
        })
}
