// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod auth_tests;
mod cli_tests;

use axum::{
    Router,
    body::Body,
    http::{Request, header},
    response::Response,
};
use std::sync::Arc;
use taxi_api::{AuthenticationService, PasswordPolicy};
use taxi_persistence::{NewDriver, Persistence};
use tokio::sync::Mutex;
use tower::ServiceExt;

use crate::{AppState, build_router, templates};

pub const TEST_PASSWORD: &str = "testpass123";

/// Cheapest cost bcrypt accepts.
const TEST_HASH_COST: u32 = 4;

/// Helper to create test app state with in-memory persistence.
pub fn create_test_app_state() -> AppState {
    let mut persistence: Persistence =
        Persistence::new_in_memory().expect("Failed to create in-memory persistence");
    persistence.set_password_hash_cost(TEST_HASH_COST);
    AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        templates: Arc::new(templates::load().expect("Templates should parse")),
        session_length: AuthenticationService::DEFAULT_SESSION_LENGTH,
        password_policy: PasswordPolicy::default(),
    }
}

pub fn create_test_app() -> (AppState, Router) {
    let app_state: AppState = create_test_app_state();
    let app: Router = build_router(app_state.clone());
    (app_state, app)
}

pub async fn create_driver(app_state: &AppState, username: &str, license_number: &str) -> i64 {
    let mut persistence = app_state.persistence.lock().await;
    persistence
        .create_driver(&NewDriver::new(username, TEST_PASSWORD).with_license_number(license_number))
        .unwrap()
}

/// Opens a session for `username` and returns the `Cookie` header value.
pub async fn session_cookie_for(app_state: &AppState, username: &str) -> String {
    let mut persistence = app_state.persistence.lock().await;
    let session = AuthenticationService::login(
        &mut persistence,
        username,
        TEST_PASSWORD,
        AuthenticationService::DEFAULT_SESSION_LENGTH,
    )
    .unwrap();
    format!("sessionid={}", session.session_token)
}

pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    form_body: Option<&str>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let request: Request<Body> = match form_body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.clone().oneshot(request).await.unwrap()
}

pub async fn get(app: &Router, uri: &str, cookie: Option<&str>) -> Response {
    send(app, "GET", uri, cookie, None).await
}

pub async fn post_form(app: &Router, uri: &str, cookie: Option<&str>, body: &str) -> Response {
    send(app, "POST", uri, cookie, Some(body)).await
}

pub async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn location(response: &Response) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("redirect should carry a Location header")
        .to_str()
        .unwrap()
}

pub fn set_cookie(response: &Response) -> Option<&str> {
    response
        .headers()
        .get(header::SET_COOKIE)
        .map(|value| value.to_str().unwrap())
}
