// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request handlers.
//!
//! Each handler performs the database work for one route and returns what
//! to do next: a `Page` to render, an `Outcome` for form submissions, or a
//! redirect target. Handlers never see HTTP types.

use taxi_domain::{Car, Driver, LicenseNumber, Manufacturer, urls};
use taxi_persistence::{FleetCounts, NewDriver, Persistence};
use time::Duration;
use tracing::{info, warn};

use crate::auth::{AuthenticatedDriver, AuthenticationService, INVALID_LOGIN, LoginSession};
use crate::error::{ApiError, FormErrors};
use crate::forms::{
    CarForm, CarSearch, CleanCar, CleanManufacturer, DriverCreationForm, DriverSearch,
    LicenseUpdateForm, LoginForm, ManufacturerForm, ManufacturerSearch, SearchForm,
};
use crate::password_policy::PasswordPolicy;
use crate::views::{
    CAR_DELETE_TEMPLATE, CAR_DETAIL_TEMPLATE, CAR_FORM_TEMPLATE, CAR_LIST_TEMPLATE, Choice,
    DRIVER_DELETE_TEMPLATE, DRIVER_DETAIL_TEMPLATE, DRIVER_FORM_TEMPLATE,
    DRIVER_LICENSE_FORM_TEMPLATE, DRIVER_LIST_TEMPLATE, Entry, INDEX_TEMPLATE, LOGIN_TEMPLATE,
    MANUFACTURER_DELETE_TEMPLATE, MANUFACTURER_FORM_TEMPLATE, MANUFACTURER_LIST_TEMPLATE,
    Outcome, Page, entries,
};

/// Splits a form error into the messages to show, or passes other errors on.
fn form_errors(err: ApiError) -> Result<FormErrors, ApiError> {
    match err {
        ApiError::Validation(errors) => Ok(errors),
        other => Err(other),
    }
}

fn load_manufacturer(persistence: &mut Persistence, pk: i64) -> Result<Manufacturer, ApiError> {
    persistence
        .get_manufacturer(pk)?
        .ok_or_else(|| ApiError::not_found("Manufacturer", pk))
}

fn load_car(persistence: &mut Persistence, pk: i64) -> Result<Car, ApiError> {
    persistence
        .get_car(pk)?
        .ok_or_else(|| ApiError::not_found("Car", pk))
}

fn load_driver(persistence: &mut Persistence, pk: i64) -> Result<Driver, ApiError> {
    persistence
        .get_driver_by_id(pk)?
        .ok_or_else(|| ApiError::not_found("Driver", pk))
}

// ============================================================================
// Home
// ============================================================================

/// Renders the home page with entity counts.
///
/// # Errors
///
/// Returns an error if the counts cannot be read.
pub fn index(persistence: &mut Persistence, user: &AuthenticatedDriver) -> Result<Page, ApiError> {
    let counts: FleetCounts = persistence.fleet_counts()?;

    Ok(Page::new(INDEX_TEMPLATE, user)
        .with("num_drivers", &counts.drivers)
        .with("num_cars", &counts.cars)
        .with("num_manufacturers", &counts.manufacturers))
}

// ============================================================================
// Lists
// ============================================================================

/// Renders the manufacturer list, filtered by `?name=`.
///
/// # Errors
///
/// Returns an error if the listing query fails.
pub fn manufacturer_list(
    persistence: &mut Persistence,
    user: &AuthenticatedDriver,
    search: &ManufacturerSearch,
) -> Result<Page, ApiError> {
    let name: Option<&str> = search.name.as_deref();
    let manufacturers: Vec<Manufacturer> = persistence.list_manufacturers(name)?;

    Ok(Page::new(MANUFACTURER_LIST_TEMPLATE, user)
        .with("manufacturer_list", &entries(manufacturers))
        .with("search_form_manufacturer", &SearchForm::new("name", name)))
}

/// Renders the car list, filtered by `?model=`.
///
/// # Errors
///
/// Returns an error if the listing query fails.
pub fn car_list(
    persistence: &mut Persistence,
    user: &AuthenticatedDriver,
    search: &CarSearch,
) -> Result<Page, ApiError> {
    let model: Option<&str> = search.model.as_deref();
    let cars: Vec<Car> = persistence.list_cars(model)?;

    Ok(Page::new(CAR_LIST_TEMPLATE, user)
        .with("car_list", &entries(cars))
        .with("search_form_car", &SearchForm::new("model", model)))
}

/// Renders the driver list, filtered by `?username=`.
///
/// # Errors
///
/// Returns an error if the listing query fails.
pub fn driver_list(
    persistence: &mut Persistence,
    user: &AuthenticatedDriver,
    search: &DriverSearch,
) -> Result<Page, ApiError> {
    let username: Option<&str> = search.username.as_deref();
    let drivers: Vec<Driver> = persistence.list_drivers(username)?;

    Ok(Page::new(DRIVER_LIST_TEMPLATE, user)
        .with("driver_list", &entries(drivers))
        .with("search_form_driver", &SearchForm::new("username", username)))
}

// ============================================================================
// Details
// ============================================================================

/// Renders a car with its drivers.
///
/// `is_assigned` tells whether the current driver is one of them.
///
/// # Errors
///
/// Returns `ResourceNotFound` for an unknown car.
pub fn car_detail(
    persistence: &mut Persistence,
    user: &AuthenticatedDriver,
    car_id: i64,
) -> Result<Page, ApiError> {
    let car: Car = load_car(persistence, car_id)?;
    let drivers: Vec<Driver> = persistence.list_car_drivers(car_id)?;
    let is_assigned: bool = drivers.iter().any(|d| d.driver_id == user.driver_id);

    Ok(Page::new(CAR_DETAIL_TEMPLATE, user)
        .with("car", &Entry::new(car))
        .with("drivers", &entries(drivers))
        .with("is_assigned", &is_assigned)
        .with("toggle_url", &urls::toggle_car_assign(car_id)))
}

/// Renders a driver with their cars.
///
/// # Errors
///
/// Returns `ResourceNotFound` for an unknown driver.
pub fn driver_detail(
    persistence: &mut Persistence,
    user: &AuthenticatedDriver,
    driver_id: i64,
) -> Result<Page, ApiError> {
    let driver: Driver = load_driver(persistence, driver_id)?;
    let cars: Vec<Car> = persistence.list_driver_cars(driver_id)?;

    Ok(Page::new(DRIVER_DETAIL_TEMPLATE, user)
        .with("full_name", &driver.full_name())
        .with("driver", &Entry::new(driver))
        .with("cars", &entries(cars)))
}

// ============================================================================
// Assignment
// ============================================================================

/// Adds the current driver to a car, or removes them if already assigned.
///
/// Returns the car's detail path to redirect to.
///
/// # Errors
///
/// Returns `ResourceNotFound` for an unknown car; nothing is changed.
pub fn toggle_car_assign(
    persistence: &mut Persistence,
    user: &AuthenticatedDriver,
    car_id: i64,
) -> Result<String, ApiError> {
    let assigned: bool = persistence.toggle_car_assignment(car_id, user.driver_id)?;

    info!(
        car_id,
        driver_id = user.driver_id,
        assigned,
        "Toggled assignment"
    );
    Ok(urls::car_detail(car_id))
}

// ============================================================================
// Drivers
// ============================================================================

fn driver_form_page(
    user: &AuthenticatedDriver,
    form: &DriverCreationForm,
    errors: &FormErrors,
) -> Page {
    Page::new(DRIVER_FORM_TEMPLATE, user)
        .with("form", form)
        .with("errors", errors)
}

/// Renders an empty account creation form.
#[must_use]
pub fn driver_create_form(user: &AuthenticatedDriver) -> Page {
    driver_form_page(user, &DriverCreationForm::default(), &FormErrors::new())
}

/// Creates a driver account from a submitted form.
///
/// On success the new driver's detail page is next. On validation failure
/// the form comes back with its errors and nothing is stored.
///
/// # Errors
///
/// Returns an error if the database fails.
pub fn create_driver(
    persistence: &mut Persistence,
    user: &AuthenticatedDriver,
    form: &DriverCreationForm,
    policy: &PasswordPolicy,
) -> Result<Outcome, ApiError> {
    let new_driver: NewDriver = match form.clean(persistence, policy) {
        Ok(new_driver) => new_driver,
        Err(err) => {
            let errors: FormErrors = form_errors(err)?;
            return Ok(Outcome::Render(driver_form_page(user, form, &errors)));
        }
    };

    let driver_id: i64 = persistence.create_driver(&new_driver)?;
    info!(
        driver_id,
        created_by = user.driver_id,
        "Driver account created"
    );

    Ok(Outcome::Redirect(urls::driver_detail(driver_id)))
}

fn license_form_page(
    user: &AuthenticatedDriver,
    driver: Driver,
    form: &LicenseUpdateForm,
    errors: &FormErrors,
) -> Page {
    Page::new(DRIVER_LICENSE_FORM_TEMPLATE, user)
        .with("driver", &Entry::new(driver))
        .with("form", form)
        .with("errors", errors)
}

/// Renders the license form pre-filled with the current license.
///
/// # Errors
///
/// Returns `ResourceNotFound` for an unknown driver.
pub fn driver_license_form(
    persistence: &mut Persistence,
    user: &AuthenticatedDriver,
    driver_id: i64,
) -> Result<Page, ApiError> {
    let driver: Driver = load_driver(persistence, driver_id)?;
    let form: LicenseUpdateForm = LicenseUpdateForm {
        license_number: driver.license_number.clone(),
    };
    Ok(license_form_page(user, driver, &form, &FormErrors::new()))
}

/// Replaces a driver's license number.
///
/// # Errors
///
/// Returns `ResourceNotFound` for an unknown driver, or an error if the
/// database fails.
pub fn update_driver_license(
    persistence: &mut Persistence,
    user: &AuthenticatedDriver,
    driver_id: i64,
    form: &LicenseUpdateForm,
) -> Result<Outcome, ApiError> {
    let driver: Driver = load_driver(persistence, driver_id)?;

    let license_number: LicenseNumber = match form.clean(persistence, driver_id) {
        Ok(license_number) => license_number,
        Err(err) => {
            let errors: FormErrors = form_errors(err)?;
            return Ok(Outcome::Render(license_form_page(user, driver, form, &errors)));
        }
    };

    persistence.update_license_number(driver_id, license_number.as_str())?;
    Ok(Outcome::Redirect(urls::driver_detail(driver_id)))
}

/// Renders the driver deletion confirmation.
///
/// # Errors
///
/// Returns `ResourceNotFound` for an unknown driver.
pub fn driver_delete_confirm(
    persistence: &mut Persistence,
    user: &AuthenticatedDriver,
    driver_id: i64,
) -> Result<Page, ApiError> {
    let driver: Driver = load_driver(persistence, driver_id)?;
    Ok(Page::new(DRIVER_DELETE_TEMPLATE, user)
        .with("object", &Entry::new(driver))
        .with("cancel_url", &urls::driver_detail(driver_id)))
}

/// Deletes a driver and returns the driver list path.
///
/// # Errors
///
/// Returns `ResourceNotFound` for an unknown driver.
pub fn delete_driver(
    persistence: &mut Persistence,
    user: &AuthenticatedDriver,
    driver_id: i64,
) -> Result<String, ApiError> {
    persistence.delete_driver(driver_id)?;
    info!(driver_id, deleted_by = user.driver_id, "Driver deleted");
    Ok(urls::DRIVER_LIST.to_string())
}

// ============================================================================
// Manufacturers
// ============================================================================

fn manufacturer_form_page(
    user: &AuthenticatedDriver,
    manufacturer: Option<Manufacturer>,
    form: &ManufacturerForm,
    errors: &FormErrors,
) -> Page {
    let page: Page = Page::new(MANUFACTURER_FORM_TEMPLATE, user)
        .with("form", form)
        .with("errors", errors);
    match manufacturer {
        Some(manufacturer) => page.with("object", &Entry::new(manufacturer)),
        None => page,
    }
}

/// Renders an empty manufacturer form.
#[must_use]
pub fn manufacturer_create_form(user: &AuthenticatedDriver) -> Page {
    manufacturer_form_page(user, None, &ManufacturerForm::default(), &FormErrors::new())
}

/// Creates a manufacturer and returns to the list.
///
/// # Errors
///
/// Returns an error if the database fails.
pub fn create_manufacturer(
    persistence: &mut Persistence,
    user: &AuthenticatedDriver,
    form: &ManufacturerForm,
) -> Result<Outcome, ApiError> {
    let clean: CleanManufacturer = match form.clean() {
        Ok(clean) => clean,
        Err(err) => {
            let errors: FormErrors = form_errors(err)?;
            return Ok(Outcome::Render(manufacturer_form_page(user, None, form, &errors)));
        }
    };

    persistence.create_manufacturer(&clean.name, &clean.country)?;
    Ok(Outcome::Redirect(urls::MANUFACTURER_LIST.to_string()))
}

/// Renders the manufacturer form pre-filled for editing.
///
/// # Errors
///
/// Returns `ResourceNotFound` for an unknown manufacturer.
pub fn manufacturer_update_form(
    persistence: &mut Persistence,
    user: &AuthenticatedDriver,
    manufacturer_id: i64,
) -> Result<Page, ApiError> {
    let manufacturer: Manufacturer = load_manufacturer(persistence, manufacturer_id)?;
    let form: ManufacturerForm = ManufacturerForm::from(&manufacturer);
    Ok(manufacturer_form_page(
        user,
        Some(manufacturer),
        &form,
        &FormErrors::new(),
    ))
}

/// Updates a manufacturer and returns to the list.
///
/// # Errors
///
/// Returns `ResourceNotFound` for an unknown manufacturer.
pub fn update_manufacturer(
    persistence: &mut Persistence,
    user: &AuthenticatedDriver,
    manufacturer_id: i64,
    form: &ManufacturerForm,
) -> Result<Outcome, ApiError> {
    let manufacturer: Manufacturer = load_manufacturer(persistence, manufacturer_id)?;

    let clean: CleanManufacturer = match form.clean() {
        Ok(clean) => clean,
        Err(err) => {
            let errors: FormErrors = form_errors(err)?;
            return Ok(Outcome::Render(manufacturer_form_page(
                user,
                Some(manufacturer),
                form,
                &errors,
            )));
        }
    };

    persistence.update_manufacturer(manufacturer_id, &clean.name, &clean.country)?;
    Ok(Outcome::Redirect(urls::MANUFACTURER_LIST.to_string()))
}

/// Renders the manufacturer deletion confirmation.
///
/// # Errors
///
/// Returns `ResourceNotFound` for an unknown manufacturer.
pub fn manufacturer_delete_confirm(
    persistence: &mut Persistence,
    user: &AuthenticatedDriver,
    manufacturer_id: i64,
) -> Result<Page, ApiError> {
    let manufacturer: Manufacturer = load_manufacturer(persistence, manufacturer_id)?;
    Ok(Page::new(MANUFACTURER_DELETE_TEMPLATE, user)
        .with("object", &Entry::new(manufacturer))
        .with("cancel_url", urls::MANUFACTURER_LIST))
}

/// Deletes a manufacturer, and its cars, and returns the list path.
///
/// # Errors
///
/// Returns `ResourceNotFound` for an unknown manufacturer.
pub fn delete_manufacturer(
    persistence: &mut Persistence,
    user: &AuthenticatedDriver,
    manufacturer_id: i64,
) -> Result<String, ApiError> {
    persistence.delete_manufacturer(manufacturer_id)?;
    info!(
        manufacturer_id,
        deleted_by = user.driver_id,
        "Manufacturer deleted"
    );
    Ok(urls::MANUFACTURER_LIST.to_string())
}

// ============================================================================
// Cars
// ============================================================================

fn car_form_page(
    persistence: &mut Persistence,
    user: &AuthenticatedDriver,
    form: &CarForm,
    errors: &FormErrors,
) -> Result<Page, ApiError> {
    let manufacturers: Vec<Choice> = persistence
        .list_manufacturers(None)?
        .into_iter()
        .map(|m| Choice {
            selected: form.manufacturer.trim() == m.manufacturer_id.to_string(),
            value: m.manufacturer_id,
            label: m.to_string(),
        })
        .collect();

    let drivers: Vec<Choice> = persistence
        .list_drivers(None)?
        .into_iter()
        .map(|d| Choice {
            selected: form
                .drivers
                .iter()
                .any(|raw| raw.trim() == d.driver_id.to_string()),
            value: d.driver_id,
            label: d.to_string(),
        })
        .collect();

    Ok(Page::new(CAR_FORM_TEMPLATE, user)
        .with("form", form)
        .with("errors", errors)
        .with("manufacturer_choices", &manufacturers)
        .with("driver_choices", &drivers))
}

/// Renders an empty car form.
///
/// # Errors
///
/// Returns an error if the choice lists cannot be loaded.
pub fn car_create_form(
    persistence: &mut Persistence,
    user: &AuthenticatedDriver,
) -> Result<Page, ApiError> {
    car_form_page(persistence, user, &CarForm::default(), &FormErrors::new())
}

/// Creates a car with its drivers and returns to the list.
///
/// # Errors
///
/// Returns an error if the database fails.
pub fn create_car(
    persistence: &mut Persistence,
    user: &AuthenticatedDriver,
    form: &CarForm,
) -> Result<Outcome, ApiError> {
    let clean: CleanCar = match form.clean(persistence) {
        Ok(clean) => clean,
        Err(err) => {
            let errors: FormErrors = form_errors(err)?;
            return Ok(Outcome::Render(car_form_page(persistence, user, form, &errors)?));
        }
    };

    persistence.create_car_with_drivers(&clean.model, clean.manufacturer_id, &clean.driver_ids)?;

    Ok(Outcome::Redirect(urls::CAR_LIST.to_string()))
}

/// Renders the car deletion confirmation.
///
/// # Errors
///
/// Returns `ResourceNotFound` for an unknown car.
pub fn car_delete_confirm(
    persistence: &mut Persistence,
    user: &AuthenticatedDriver,
    car_id: i64,
) -> Result<Page, ApiError> {
    let car: Car = load_car(persistence, car_id)?;
    Ok(Page::new(CAR_DELETE_TEMPLATE, user)
        .with("object", &Entry::new(car))
        .with("cancel_url", &urls::car_detail(car_id)))
}

/// Deletes a car and returns the car list path.
///
/// # Errors
///
/// Returns `ResourceNotFound` for an unknown car.
pub fn delete_car(
    persistence: &mut Persistence,
    user: &AuthenticatedDriver,
    car_id: i64,
) -> Result<String, ApiError> {
    persistence.delete_car(car_id)?;
    info!(car_id, deleted_by = user.driver_id, "Car deleted");
    Ok(urls::CAR_LIST.to_string())
}

// ============================================================================
// Authentication
// ============================================================================

/// What a login attempt leads to.
#[derive(Debug, Clone)]
pub enum LoginOutcome {
    /// Credentials accepted; the session is open.
    LoggedIn {
        session: LoginSession,
        /// Where to send the browser.
        redirect: String,
    },
    /// Credentials rejected; show the form again.
    Rejected(Page),
}

fn login_page(form: &LoginForm, errors: &FormErrors) -> Page {
    Page::anonymous(LOGIN_TEMPLATE)
        .with("form", form)
        .with("errors", errors)
}

/// Renders the login form, remembering where to go afterwards.
#[must_use]
pub fn login_form(next: Option<&str>) -> Page {
    let form: LoginForm = LoginForm {
        next: next.unwrap_or_default().to_string(),
        ..LoginForm::default()
    };
    login_page(&form, &FormErrors::new())
}

/// Logs a driver in.
///
/// After success the browser goes to `next` when it is a local path, and to
/// the home page otherwise.
///
/// Rejected credentials, and any failure while opening the session, come
/// back as `Rejected` with a non-field error.
pub fn login(
    persistence: &mut Persistence,
    form: &LoginForm,
    session_length: Duration,
) -> LoginOutcome {
    match AuthenticationService::login(persistence, &form.username, &form.password, session_length)
    {
        Ok(session) => {
            let redirect: String = if urls::is_local_path(&form.next) {
                form.next.clone()
            } else {
                urls::INDEX.to_string()
            };
            LoginOutcome::LoggedIn { session, redirect }
        }
        Err(err) => {
            warn!(username = %form.username, error = %err, "Login failed");
            let mut errors: FormErrors = FormErrors::new();
            errors.add_non_field(INVALID_LOGIN);
            LoginOutcome::Rejected(login_page(form, &errors))
        }
    }
}

/// Ends the session and returns the login path.
///
/// # Errors
///
/// Returns an error if the session cannot be deleted.
pub fn logout(persistence: &mut Persistence, session_token: &str) -> Result<String, ApiError> {
    AuthenticationService::logout(persistence, session_token)?;
    Ok(urls::LOGIN.to_string())
}
