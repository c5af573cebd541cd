// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session extraction for the server.
//!
//! Protected handlers take a `SessionDriver`. Requests without a valid
//! `sessionid` cookie are sent to the login page, with `next` set to the
//! path they asked for.

use axum::{
    extract::FromRequestParts,
    http::request::Parts,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use axum_extra::extract::cookie::{Cookie, SameSite};
use taxi_api::{AuthenticatedDriver, AuthenticationService};
use taxi_domain::urls;
use time::Duration;
use tracing::{debug, warn};

use crate::{AppState, found};

/// Name of the cookie carrying the session token.
pub const SESSION_COOKIE: &str = "sessionid";

/// Builds the cookie handed out after a successful login.
pub fn session_cookie(token: String, max_age: Duration) -> Cookie<'static> {
    Cookie::build((SESSION_COOKIE, token))
        .http_only(true)
        .same_site(SameSite::Lax)
        .path("/")
        .max_age(max_age)
        .build()
}

/// A cookie that, once added to a jar, tells the browser to forget the session.
pub fn expired_session_cookie() -> Cookie<'static> {
    let mut cookie: Cookie<'static> = Cookie::build((SESSION_COOKIE, "")).path("/").build();
    cookie.make_removal();
    cookie
}

/// Extractor for the logged-in driver.
///
/// ```ignore
/// async fn my_handler(SessionDriver(user): SessionDriver) -> Response {
///     // user: AuthenticatedDriver
/// }
/// ```
///
/// Validation refreshes the session's activity timestamp. Expired sessions
/// are deleted and treated like missing ones.
pub struct SessionDriver(pub AuthenticatedDriver);

impl FromRequestParts<AppState> for SessionDriver {
    type Rejection = SessionError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let next: String = parts
            .uri
            .path_and_query()
            .map_or_else(|| parts.uri.path().to_string(), ToString::to_string);

        let jar: CookieJar = CookieJar::from_headers(&parts.headers);
        let Some(token) = jar
            .get(SESSION_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .filter(|token| !token.is_empty())
        else {
            debug!(path = %next, "No session cookie");
            return Err(SessionError::MissingSession { next });
        };

        let mut persistence = state.persistence.lock().await;
        let result = AuthenticationService::validate_session(&mut persistence, &token);
        drop(persistence);

        match result {
            Ok(driver) => {
                debug!(username = %driver.username, "Session validated");
                Ok(Self(driver))
            }
            Err(e) => {
                warn!(error = %e, "Session validation failed");
                Err(SessionError::InvalidSession { next })
            }
        }
    }
}

/// Why a request could not be tied to a driver.
#[derive(Debug)]
pub enum SessionError {
    /// No session cookie was sent.
    MissingSession { next: String },
    /// The cookie names an unknown or expired session.
    InvalidSession { next: String },
}

impl IntoResponse for SessionError {
    fn into_response(self) -> Response {
        match self {
            Self::MissingSession { next } => found(&urls::login_with_next(&next)),
            Self::InvalidSession { next } => {
                let jar: CookieJar = CookieJar::new().add(expired_session_cookie());
                (jar, found(&urls::login_with_next(&next))).into_response()
            }
        }
    }
}
