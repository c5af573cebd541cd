// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! HTML templates, embedded in the binary.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use taxi_api::Page;
use taxi_api::views;
use tera::{Context, Tera};
use tracing::error;

/// Rendered for unknown paths and primary keys.
pub const NOT_FOUND_TEMPLATE: &str = "404.html";
/// Rendered for every other failure.
pub const SERVER_ERROR_TEMPLATE: &str = "500.html";

const TPL_BASE: &str = include_str!("../templates/base.html");
const TPL_404: &str = include_str!("../templates/404.html");
const TPL_500: &str = include_str!("../templates/500.html");
const TPL_LOGIN: &str = include_str!("../templates/registration/login.html");
const TPL_INDEX: &str = include_str!("../templates/taxi/index.html");
const TPL_MANUFACTURER_LIST: &str = include_str!("../templates/taxi/manufacturer_list.html");
const TPL_MANUFACTURER_FORM: &str = include_str!("../templates/taxi/manufacturer_form.html");
const TPL_MANUFACTURER_DELETE: &str =
    include_str!("../templates/taxi/manufacturer_confirm_delete.html");
const TPL_CAR_LIST: &str = include_str!("../templates/taxi/car_list.html");
const TPL_CAR_DETAIL: &str = include_str!("../templates/taxi/car_detail.html");
const TPL_CAR_FORM: &str = include_str!("../templates/taxi/car_form.html");
const TPL_CAR_DELETE: &str = include_str!("../templates/taxi/car_confirm_delete.html");
const TPL_DRIVER_LIST: &str = include_str!("../templates/taxi/driver_list.html");
const TPL_DRIVER_DETAIL: &str = include_str!("../templates/taxi/driver_detail.html");
const TPL_DRIVER_FORM: &str = include_str!("../templates/taxi/driver_form.html");
const TPL_DRIVER_LICENSE_FORM: &str = include_str!("../templates/taxi/driver_license_form.html");
const TPL_DRIVER_DELETE: &str = include_str!("../templates/taxi/driver_confirm_delete.html");

/// Builds the template engine.
///
/// Templates are registered under the names the page handlers use, so
/// `Page::template` can be passed straight to `Tera::render`.
///
/// # Errors
///
/// Returns an error if a template does not parse or extends an unknown one.
pub fn load() -> Result<Tera, tera::Error> {
    let mut tera: Tera = Tera::default();
    tera.add_raw_templates(vec![
        ("base.html", TPL_BASE),
        (NOT_FOUND_TEMPLATE, TPL_404),
        (SERVER_ERROR_TEMPLATE, TPL_500),
        (views::LOGIN_TEMPLATE, TPL_LOGIN),
        (views::INDEX_TEMPLATE, TPL_INDEX),
        (views::MANUFACTURER_LIST_TEMPLATE, TPL_MANUFACTURER_LIST),
        (views::MANUFACTURER_FORM_TEMPLATE, TPL_MANUFACTURER_FORM),
        (views::MANUFACTURER_DELETE_TEMPLATE, TPL_MANUFACTURER_DELETE),
        (views::CAR_LIST_TEMPLATE, TPL_CAR_LIST),
        (views::CAR_DETAIL_TEMPLATE, TPL_CAR_DETAIL),
        (views::CAR_FORM_TEMPLATE, TPL_CAR_FORM),
        (views::CAR_DELETE_TEMPLATE, TPL_CAR_DELETE),
        (views::DRIVER_LIST_TEMPLATE, TPL_DRIVER_LIST),
        (views::DRIVER_DETAIL_TEMPLATE, TPL_DRIVER_DETAIL),
        (views::DRIVER_FORM_TEMPLATE, TPL_DRIVER_FORM),
        (views::DRIVER_LICENSE_FORM_TEMPLATE, TPL_DRIVER_LICENSE_FORM),
        (views::DRIVER_DELETE_TEMPLATE, TPL_DRIVER_DELETE),
    ])?;
    Ok(tera)
}

/// Renders a page.
///
/// # Errors
///
/// Returns an error if the template is unknown or its context is incomplete.
pub fn render(tera: &Tera, page: &Page) -> Result<Html<String>, tera::Error> {
    tera.render(page.template, &page.context).map(Html)
}

/// Renders the error page for `status`.
///
/// Falls back to plain text when the error page itself cannot be rendered.
pub fn render_error(tera: &Tera, status: StatusCode, message: &str) -> Response {
    let template: &str = if status == StatusCode::NOT_FOUND {
        NOT_FOUND_TEMPLATE
    } else {
        SERVER_ERROR_TEMPLATE
    };

    let mut context: Context = Context::new();
    context.insert("status", &status.as_u16());
    context.insert("message", message);

    match tera.render(template, &context) {
        Ok(html) => (status, Html(html)).into_response(),
        Err(err) => {
            error!(error = %err, template, "Failed to render error page");
            (status, message.to_string()).into_response()
        }
    }
}
