// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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

mod session;
mod templates;

#[cfg(test)]
mod tests;

use axum::{
    Router,
    extract::{Path, Query, Request, State as AxumState},
    http::{StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
};
use axum_extra::extract::{CookieJar, Form};
use clap::Parser;
use std::sync::Arc;
use taxi_api::forms::{
    CarForm, CarSearch, DriverCreationForm, DriverSearch, LicenseUpdateForm, LoginForm,
    ManufacturerForm, ManufacturerSearch, NextQuery,
};
use taxi_api::{
    ApiError, AuthenticationService, LoginOutcome, Outcome, Page, PasswordPolicy, handlers,
};
use taxi_domain::urls;
use taxi_persistence::{NewDriver, Persistence};
use tera::Tera;
use time::Duration;
use tokio::sync::Mutex;
use tracing::{error, info, warn};

use crate::session::{SESSION_COOKIE, SessionDriver, expired_session_cookie, session_cookie};

/// Longest session lifetime accepted on the command line.
const MAX_SESSION_DAYS: i64 = 3650;

/// Taxi Server - fleet management web application
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to the `SQLite` database file. If not provided, uses in-memory database.
    #[arg(short, long)]
    database: Option<String>,

    /// Address to bind the server to
    #[arg(short, long, default_value = "127.0.0.1")]
    bind: String,

    /// Port to bind the server to
    #[arg(short, long, default_value_t = 8000)]
    port: u16,

    /// Days a login session stays valid (1 to 3650)
    #[arg(long, default_value_t = 30, value_parser = parse_session_days)]
    session_days: i64,

    /// Staff account to create at startup, as `username:password`
    #[arg(long, value_parser = parse_credentials)]
    create_superuser: Option<(String, String)>,
}

fn parse_session_days(raw: &str) -> Result<i64, String> {
    let days: i64 = raw
        .parse()
        .map_err(|_| format!("`{raw}` is not a whole number of days"))?;
    if (1..=MAX_SESSION_DAYS).contains(&days) {
        Ok(days)
    } else {
        Err(format!("must be between 1 and {MAX_SESSION_DAYS}"))
    }
}

fn parse_credentials(raw: &str) -> Result<(String, String), String> {
    match raw.split_once(':') {
        Some((username, password)) if !username.is_empty() && !password.is_empty() => {
            Ok((username.to_string(), password.to_string()))
        }
        _ => Err(String::from("expected <username>:<password>")),
    }
}

/// Application state shared across handlers.
#[derive(Clone)]
struct AppState {
    /// The single database connection.
    persistence: Arc<Mutex<Persistence>>,
    templates: Arc<Tera>,
    /// Lifetime of new sessions and of their cookies.
    session_length: Duration,
    password_policy: PasswordPolicy,
}

impl AppState {
    fn render(&self, page: &Page) -> Result<Response, HttpError> {
        templates::render(&self.templates, page)
            .map(IntoResponse::into_response)
            .map_err(|err| {
                error!(error = ?err, template = page.template, "Failed to render page");
                HttpError::internal(err.to_string())
            })
    }

    fn respond(&self, outcome: Outcome) -> Result<Response, HttpError> {
        match outcome {
            Outcome::Redirect(location) => Ok(found(&location)),
            Outcome::Render(page) => self.render(&page),
        }
    }
}

/// A 302 redirect.
fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}

/// HTTP error wrapper that implements `IntoResponse`.
///
/// The response carries an `ErrorPage` extension; `render_error_pages`
/// turns it into an HTML body.
#[derive(Debug)]
struct HttpError {
    /// The HTTP status code.
    status: StatusCode,
    /// The error message.
    message: String,
}

impl HttpError {
    fn not_found(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            message: message.into(),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone)]
struct ErrorPage {
    status: StatusCode,
    message: String,
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        let mut response: Response = self.status.into_response();
        response.extensions_mut().insert(ErrorPage {
            status: self.status,
            message: self.message,
        });
        response
    }
}

impl From<ApiError> for HttpError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::AuthenticationFailed { .. } => Self {
                status: StatusCode::UNAUTHORIZED,
                message: err.to_string(),
            },
            ApiError::ResourceNotFound { .. } => Self::not_found(err.to_string()),
            ApiError::Validation(ref errors) => Self {
                status: StatusCode::BAD_REQUEST,
                message: errors.to_string(),
            },
            ApiError::Internal { .. } => {
                error!(error = %err, "Internal error");
                Self::internal(err.to_string())
            }
        }
    }
}

/// Replaces the body of error responses with the rendered error page.
async fn render_error_pages(
    AxumState(app_state): AxumState<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let mut response: Response = next.run(request).await;
    match response.extensions_mut().remove::<ErrorPage>() {
        Some(page) => templates::render_error(&app_state.templates, page.status, &page.message),
        None => response,
    }
}

/// Primary keys that are not integers match no route.
fn parse_pk(raw: &str) -> Result<i64, HttpError> {
    raw.parse::<i64>()
        .map_err(|_| HttpError::not_found(format!("No such page: {raw}")))
}

// ============================================================================
// Home and lists
// ============================================================================

/// Handler for GET `/`.
async fn handle_index(
    AxumState(app_state): AxumState<AppState>,
    SessionDriver(user): SessionDriver,
) -> Result<Response, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let page: Page = handlers::index(&mut persistence, &user)?;
    drop(persistence);
    app_state.render(&page)
}

/// Handler for GET `/manufacturers/`.
async fn handle_manufacturer_list(
    AxumState(app_state): AxumState<AppState>,
    SessionDriver(user): SessionDriver,
    Query(search): Query<ManufacturerSearch>,
) -> Result<Response, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let page: Page = handlers::manufacturer_list(&mut persistence, &user, &search)?;
    drop(persistence);
    app_state.render(&page)
}

/// Handler for GET `/cars/`.
async fn handle_car_list(
    AxumState(app_state): AxumState<AppState>,
    SessionDriver(user): SessionDriver,
    Query(search): Query<CarSearch>,
) -> Result<Response, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let page: Page = handlers::car_list(&mut persistence, &user, &search)?;
    drop(persistence);
    app_state.render(&page)
}

/// Handler for GET `/drivers/`.
async fn handle_driver_list(
    AxumState(app_state): AxumState<AppState>,
    SessionDriver(user): SessionDriver,
    Query(search): Query<DriverSearch>,
) -> Result<Response, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let page: Page = handlers::driver_list(&mut persistence, &user, &search)?;
    drop(persistence);
    app_state.render(&page)
}

// ============================================================================
// Manufacturers
// ============================================================================

#[allow(clippy::unused_async)]
async fn handle_manufacturer_create_form(
    AxumState(app_state): AxumState<AppState>,
    SessionDriver(user): SessionDriver,
) -> Result<Response, HttpError> {
    app_state.render(&handlers::manufacturer_create_form(&user))
}

async fn handle_create_manufacturer(
    AxumState(app_state): AxumState<AppState>,
    SessionDriver(user): SessionDriver,
    Form(form): Form<ManufacturerForm>,
) -> Result<Response, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let outcome: Outcome = handlers::create_manufacturer(&mut persistence, &user, &form)?;
    drop(persistence);
    app_state.respond(outcome)
}

async fn handle_manufacturer_update_form(
    AxumState(app_state): AxumState<AppState>,
    SessionDriver(user): SessionDriver,
    Path(pk): Path<String>,
) -> Result<Response, HttpError> {
    let manufacturer_id: i64 = parse_pk(&pk)?;
    let mut persistence = app_state.persistence.lock().await;
    let page: Page = handlers::manufacturer_update_form(&mut persistence, &user, manufacturer_id)?;
    drop(persistence);
    app_state.render(&page)
}

async fn handle_update_manufacturer(
    AxumState(app_state): AxumState<AppState>,
    SessionDriver(user): SessionDriver,
    Path(pk): Path<String>,
    Form(form): Form<ManufacturerForm>,
) -> Result<Response, HttpError> {
    let manufacturer_id: i64 = parse_pk(&pk)?;
    let mut persistence = app_state.persistence.lock().await;
    let outcome: Outcome =
        handlers::update_manufacturer(&mut persistence, &user, manufacturer_id, &form)?;
    drop(persistence);
    app_state.respond(outcome)
}

async fn handle_manufacturer_delete_confirm(
    AxumState(app_state): AxumState<AppState>,
    SessionDriver(user): SessionDriver,
    Path(pk): Path<String>,
) -> Result<Response, HttpError> {
    let manufacturer_id: i64 = parse_pk(&pk)?;
    let mut persistence = app_state.persistence.lock().await;
    let page: Page =
        handlers::manufacturer_delete_confirm(&mut persistence, &user, manufacturer_id)?;
    drop(persistence);
    app_state.render(&page)
}

async fn handle_delete_manufacturer(
    AxumState(app_state): AxumState<AppState>,
    SessionDriver(user): SessionDriver,
    Path(pk): Path<String>,
) -> Result<Response, HttpError> {
    let manufacturer_id: i64 = parse_pk(&pk)?;
    let mut persistence = app_state.persistence.lock().await;
    let location: String = handlers::delete_manufacturer(&mut persistence, &user, manufacturer_id)?;
    drop(persistence);
    Ok(found(&location))
}

// ============================================================================
// Cars
// ============================================================================

/// Handler for GET `/cars/{pk}/`.
async fn handle_car_detail(
    AxumState(app_state): AxumState<AppState>,
    SessionDriver(user): SessionDriver,
    Path(pk): Path<String>,
) -> Result<Response, HttpError> {
    let car_id: i64 = parse_pk(&pk)?;
    let mut persistence = app_state.persistence.lock().await;
    let page: Page = handlers::car_detail(&mut persistence, &user, car_id)?;
    drop(persistence);
    app_state.render(&page)
}

/// Handler for GET `/cars/{pk}/toggle-assign/`.
///
/// Adds the logged-in driver to the car, or removes them, and goes back to
/// the car's page.
async fn handle_toggle_car_assign(
    AxumState(app_state): AxumState<AppState>,
    SessionDriver(user): SessionDriver,
    Path(pk): Path<String>,
) -> Result<Response, HttpError> {
    let car_id: i64 = parse_pk(&pk)?;
    let mut persistence = app_state.persistence.lock().await;
    let location: String = handlers::toggle_car_assign(&mut persistence, &user, car_id)?;
    drop(persistence);
    Ok(found(&location))
}

async fn handle_car_create_form(
    AxumState(app_state): AxumState<AppState>,
    SessionDriver(user): SessionDriver,
) -> Result<Response, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let page: Page = handlers::car_create_form(&mut persistence, &user)?;
    drop(persistence);
    app_state.render(&page)
}

async fn handle_create_car(
    AxumState(app_state): AxumState<AppState>,
    SessionDriver(user): SessionDriver,
    Form(form): Form<CarForm>,
) -> Result<Response, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let outcome: Outcome = handlers::create_car(&mut persistence, &user, &form)?;
    drop(persistence);
    app_state.respond(outcome)
}

async fn handle_car_delete_confirm(
    AxumState(app_state): AxumState<AppState>,
    SessionDriver(user): SessionDriver,
    Path(pk): Path<String>,
) -> Result<Response, HttpError> {
    let car_id: i64 = parse_pk(&pk)?;
    let mut persistence = app_state.persistence.lock().await;
    let page: Page = handlers::car_delete_confirm(&mut persistence, &user, car_id)?;
    drop(persistence);
    app_state.render(&page)
}

async fn handle_delete_car(
    AxumState(app_state): AxumState<AppState>,
    SessionDriver(user): SessionDriver,
    Path(pk): Path<String>,
) -> Result<Response, HttpError> {
    let car_id: i64 = parse_pk(&pk)?;
    let mut persistence = app_state.persistence.lock().await;
    let location: String = handlers::delete_car(&mut persistence, &user, car_id)?;
    drop(persistence);
    Ok(found(&location))
}

// ============================================================================
// Drivers
// ============================================================================

/// Handler for GET `/drivers/{pk}/`.
async fn handle_driver_detail(
    AxumState(app_state): AxumState<AppState>,
    SessionDriver(user): SessionDriver,
    Path(pk): Path<String>,
) -> Result<Response, HttpError> {
    let driver_id: i64 = parse_pk(&pk)?;
    let mut persistence = app_state.persistence.lock().await;
    let page: Page = handlers::driver_detail(&mut persistence, &user, driver_id)?;
    drop(persistence);
    app_state.render(&page)
}

#[allow(clippy::unused_async)]
async fn handle_driver_create_form(
    AxumState(app_state): AxumState<AppState>,
    SessionDriver(user): SessionDriver,
) -> Result<Response, HttpError> {
    app_state.render(&handlers::driver_create_form(&user))
}

/// Handler for POST `/drivers/create/`.
///
/// Passwords never come back in a re-rendered form.
async fn handle_create_driver(
    AxumState(app_state): AxumState<AppState>,
    SessionDriver(user): SessionDriver,
    Form(form): Form<DriverCreationForm>,
) -> Result<Response, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let outcome: Outcome =
        handlers::create_driver(&mut persistence, &user, &form, &app_state.password_policy)?;
    drop(persistence);
    app_state.respond(outcome)
}

async fn handle_driver_license_form(
    AxumState(app_state): AxumState<AppState>,
    SessionDriver(user): SessionDriver,
    Path(pk): Path<String>,
) -> Result<Response, HttpError> {
    let driver_id: i64 = parse_pk(&pk)?;
    let mut persistence = app_state.persistence.lock().await;
    let page: Page = handlers::driver_license_form(&mut persistence, &user, driver_id)?;
    drop(persistence);
    app_state.render(&page)
}

async fn handle_update_driver_license(
    AxumState(app_state): AxumState<AppState>,
    SessionDriver(user): SessionDriver,
    Path(pk): Path<String>,
    Form(form): Form<LicenseUpdateForm>,
) -> Result<Response, HttpError> {
    let driver_id: i64 = parse_pk(&pk)?;
    let mut persistence = app_state.persistence.lock().await;
    let outcome: Outcome =
        handlers::update_driver_license(&mut persistence, &user, driver_id, &form)?;
    drop(persistence);
    app_state.respond(outcome)
}

async fn handle_driver_delete_confirm(
    AxumState(app_state): AxumState<AppState>,
    SessionDriver(user): SessionDriver,
    Path(pk): Path<String>,
) -> Result<Response, HttpError> {
    let driver_id: i64 = parse_pk(&pk)?;
    let mut persistence = app_state.persistence.lock().await;
    let page: Page = handlers::driver_delete_confirm(&mut persistence, &user, driver_id)?;
    drop(persistence);
    app_state.render(&page)
}

async fn handle_delete_driver(
    AxumState(app_state): AxumState<AppState>,
    SessionDriver(user): SessionDriver,
    Path(pk): Path<String>,
) -> Result<Response, HttpError> {
    let driver_id: i64 = parse_pk(&pk)?;
    let mut persistence = app_state.persistence.lock().await;
    let location: String = handlers::delete_driver(&mut persistence, &user, driver_id)?;
    drop(persistence);
    Ok(found(&location))
}

// ============================================================================
// Authentication
// ============================================================================

/// Handler for GET `/accounts/login/`.
#[allow(clippy::unused_async)]
async fn handle_login_form(
    AxumState(app_state): AxumState<AppState>,
    Query(query): Query<NextQuery>,
) -> Result<Response, HttpError> {
    app_state.render(&handlers::login_form(query.next.as_deref()))
}

/// Handler for POST `/accounts/login/`.
///
/// On success the session token goes out as the `sessionid` cookie.
async fn handle_login(
    AxumState(app_state): AxumState<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, HttpError> {
    let mut persistence = app_state.persistence.lock().await;
    let outcome: LoginOutcome = handlers::login(&mut persistence, &form, app_state.session_length);
    drop(persistence);

    match outcome {
        LoginOutcome::LoggedIn { session, redirect } => {
            let jar: CookieJar =
                jar.add(session_cookie(session.session_token, app_state.session_length));
            Ok((jar, found(&redirect)).into_response())
        }
        LoginOutcome::Rejected(page) => app_state.render(&page),
    }
}

/// Handler for `/accounts/logout/`.
///
/// Works without a valid session; the cookie is cleared either way.
async fn handle_logout(
    AxumState(app_state): AxumState<AppState>,
    jar: CookieJar,
) -> Result<Response, HttpError> {
    let location: String = match jar.get(SESSION_COOKIE) {
        Some(cookie) => {
            let mut persistence = app_state.persistence.lock().await;
            let location: String = handlers::logout(&mut persistence, cookie.value())?;
            drop(persistence);
            location
        }
        None => urls::LOGIN.to_string(),
    };

    Ok((jar.add(expired_session_cookie()), found(&location)).into_response())
}

#[allow(clippy::unused_async, clippy::needless_pass_by_value)]
async fn handle_not_found(request: Request) -> HttpError {
    HttpError::not_found(format!("No such page: {}", request.uri().path()))
}

/// Builds the application router with all endpoints.
fn build_router(app_state: AppState) -> Router {
    Router::new()
        .route(urls::INDEX, get(handle_index))
        .route(urls::MANUFACTURER_LIST, get(handle_manufacturer_list))
        .route(
            urls::MANUFACTURER_CREATE,
            get(handle_manufacturer_create_form).post(handle_create_manufacturer),
        )
        .route(
            urls::MANUFACTURER_UPDATE_PATTERN,
            get(handle_manufacturer_update_form).post(handle_update_manufacturer),
        )
        .route(
            urls::MANUFACTURER_DELETE_PATTERN,
            get(handle_manufacturer_delete_confirm).post(handle_delete_manufacturer),
        )
        .route(urls::CAR_LIST, get(handle_car_list))
        .route(
            urls::CAR_CREATE,
            get(handle_car_create_form).post(handle_create_car),
        )
        .route(urls::CAR_DETAIL_PATTERN, get(handle_car_detail))
        .route(
            urls::CAR_DELETE_PATTERN,
            get(handle_car_delete_confirm).post(handle_delete_car),
        )
        .route(
            urls::TOGGLE_CAR_ASSIGN_PATTERN,
            get(handle_toggle_car_assign),
        )
        .route(urls::DRIVER_LIST, get(handle_driver_list))
        .route(
            urls::DRIVER_CREATE,
            get(handle_driver_create_form).post(handle_create_driver),
        )
        .route(urls::DRIVER_DETAIL_PATTERN, get(handle_driver_detail))
        .route(
            urls::DRIVER_LICENSE_UPDATE_PATTERN,
            get(handle_driver_license_form).post(handle_update_driver_license),
        )
        .route(
            urls::DRIVER_DELETE_PATTERN,
            get(handle_driver_delete_confirm).post(handle_delete_driver),
        )
        .route(urls::LOGIN, get(handle_login_form).post(handle_login))
        .route(urls::LOGOUT, get(handle_logout).post(handle_logout))
        .fallback(handle_not_found)
        .layer(middleware::from_fn_with_state(
            app_state.clone(),
            render_error_pages,
        ))
        .with_state(app_state)
}

/// Creates a staff account unless the username is already taken.
fn seed_superuser(
    persistence: &mut Persistence,
    username: &str,
    password: &str,
) -> Result<(), Box<dyn std::error::Error>> {
    if persistence.username_exists(username)? {
        warn!(username, "Superuser already exists; leaving it unchanged");
        return Ok(());
    }

    let driver_id: i64 = persistence.create_driver(&NewDriver::new(username, password).staff())?;
    info!(driver_id, username, "Created superuser");
    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Args = Args::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Initializing Taxi Server");

    let mut persistence: Persistence = if let Some(db_path) = &args.database {
        info!("Using file-based database at: {}", db_path);
        Persistence::new_with_file(db_path)?
    } else {
        info!("Using in-memory database");
        Persistence::new_in_memory()?
    };

    if let Some((username, password)) = &args.create_superuser {
        seed_superuser(&mut persistence, username, password)?;
    }

    let purged: usize = AuthenticationService::purge_expired_sessions(&mut persistence)?;
    info!(purged, "Removed expired sessions");

    let app_state: AppState = AppState {
        persistence: Arc::new(Mutex::new(persistence)),
        templates: Arc::new(templates::load()?),
        session_length: Duration::days(args.session_days),
        password_policy: PasswordPolicy::default(),
    };

    let app: Router = build_router(app_state);

    let listener = tokio::net::TcpListener::bind((args.bind.as_str(), args.port)).await?;
    info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}
