// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Render-ready pages.
//!
//! Handlers return a `Page`: a template name plus the context it is rendered
//! with. Rendering itself happens in the server, so everything a template
//! can see is visible to tests here.

use serde::Serialize;
use taxi_domain::AbsoluteUrl;
use tera::Context;

use crate::auth::AuthenticatedDriver;

pub const INDEX_TEMPLATE: &str = "taxi/index.html";
pub const MANUFACTURER_LIST_TEMPLATE: &str = "taxi/manufacturer_list.html";
pub const MANUFACTURER_FORM_TEMPLATE: &str = "taxi/manufacturer_form.html";
pub const MANUFACTURER_DELETE_TEMPLATE: &str = "taxi/manufacturer_confirm_delete.html";
pub const CAR_LIST_TEMPLATE: &str = "taxi/car_list.html";
pub const CAR_DETAIL_TEMPLATE: &str = "taxi/car_detail.html";
pub const CAR_FORM_TEMPLATE: &str = "taxi/car_form.html";
pub const CAR_DELETE_TEMPLATE: &str = "taxi/car_confirm_delete.html";
pub const DRIVER_LIST_TEMPLATE: &str = "taxi/driver_list.html";
pub const DRIVER_DETAIL_TEMPLATE: &str = "taxi/driver_detail.html";
pub const DRIVER_FORM_TEMPLATE: &str = "taxi/driver_form.html";
pub const DRIVER_LICENSE_FORM_TEMPLATE: &str = "taxi/driver_license_form.html";
pub const DRIVER_DELETE_TEMPLATE: &str = "taxi/driver_confirm_delete.html";
pub const LOGIN_TEMPLATE: &str = "registration/login.html";

/// A template and its render context.
#[derive(Debug, Clone)]
pub struct Page {
    pub template: &'static str,
    pub context: Context,
}

impl Page {
    /// Starts a page for the logged-in driver, available to templates as `user`.
    #[must_use]
    pub fn new(template: &'static str, user: &AuthenticatedDriver) -> Self {
        let mut context: Context = Context::new();
        context.insert("user", user);
        Self { template, context }
    }

    /// Starts a page shown to anonymous visitors.
    #[must_use]
    pub fn anonymous(template: &'static str) -> Self {
        Self {
            template,
            context: Context::new(),
        }
    }

    /// Adds a context value.
    #[must_use]
    pub fn with<T: Serialize + ?Sized>(mut self, key: &str, value: &T) -> Self {
        self.context.insert(key, value);
        self
    }
}

/// The result of a form submission.
#[derive(Debug, Clone)]
pub enum Outcome {
    /// The submission was accepted; go here next.
    Redirect(String),
    /// The submission was rejected; show the form again.
    Render(Page),
}

/// An entity as shown in lists: its fields plus its label and link.
#[derive(Debug, Clone, Serialize)]
pub struct Entry<T: Serialize> {
    #[serde(flatten)]
    pub item: T,
    /// The entity's `Display` text.
    pub label: String,
    /// The entity's canonical path.
    pub url: String,
}

impl<T: Serialize + std::fmt::Display + AbsoluteUrl> Entry<T> {
    #[must_use]
    pub fn new(item: T) -> Self {
        Self {
            label: item.to_string(),
            url: item.absolute_url(),
            item,
        }
    }
}

/// Wraps every item of a collection in an `Entry`.
pub fn entries<T: Serialize + std::fmt::Display + AbsoluteUrl>(items: Vec<T>) -> Vec<Entry<T>> {
    items.into_iter().map(Entry::new).collect()
}

/// One option of a select box or checkbox group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    pub value: i64,
    pub label: String,
    pub selected: bool,
}
