// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Manufacturer and car create, update and delete workflows.

use super::helpers::{context_list, create_test_admin, create_test_driver, create_test_persistence};
use crate::forms::{CarForm, INVALID_CHOICE, ManufacturerForm, REQUIRED};
use crate::handlers::{
    car_create_form, create_car, create_manufacturer, delete_car, delete_manufacturer,
    manufacturer_delete_confirm, update_manufacturer,
};
use crate::{ApiError, Outcome};

fn manufacturer_form(name: &str, country: &str) -> ManufacturerForm {
    ManufacturerForm {
        name: name.to_string(),
        country: country.to_string(),
    }
}

#[test]
fn test_create_manufacturer_redirects_to_list() {
    let mut persistence = create_test_persistence();
    let admin = create_test_admin(&mut persistence);

    let outcome = create_manufacturer(
        &mut persistence,
        &admin,
        &manufacturer_form(" Toyota ", "Japan"),
    )
    .unwrap();

    assert!(matches!(outcome, Outcome::Redirect(ref path) if path == "/manufacturers/"));
    let manufacturers = persistence.list_manufacturers(None).unwrap();
    assert_eq!(manufacturers.len(), 1);
    assert_eq!(manufacturers[0].name, "Toyota");
}

#[test]
fn test_manufacturer_fields_are_required() {
    let mut persistence = create_test_persistence();
    let admin = create_test_admin(&mut persistence);

    let errors = match manufacturer_form("", "  ").clean() {
        Err(ApiError::Validation(errors)) => errors,
        other => panic!("expected validation errors, got {other:?}"),
    };
    assert_eq!(errors.get("name"), [REQUIRED]);
    assert_eq!(errors.get("country"), [REQUIRED]);

    let outcome =
        create_manufacturer(&mut persistence, &admin, &manufacturer_form("", "")).unwrap();
    assert!(matches!(outcome, Outcome::Render(_)));
    assert!(persistence.list_manufacturers(None).unwrap().is_empty());
}

#[test]
fn test_update_manufacturer() {
    let mut persistence = create_test_persistence();
    let admin = create_test_admin(&mut persistence);
    let id = persistence.create_manufacturer("Toyta", "Japan").unwrap();

    update_manufacturer(
        &mut persistence,
        &admin,
        id,
        &manufacturer_form("Toyota", "Japan"),
    )
    .unwrap();

    assert_eq!(
        persistence.get_manufacturer(id).unwrap().unwrap().name,
        "Toyota"
    );
}

#[test]
fn test_delete_manufacturer_and_confirm_page() {
    let mut persistence = create_test_persistence();
    let admin = create_test_admin(&mut persistence);
    let id = persistence.create_manufacturer("Toyota", "Japan").unwrap();

    let page = manufacturer_delete_confirm(&mut persistence, &admin, id).unwrap();
    assert!(page.context.contains_key("object"));

    let redirect = delete_manufacturer(&mut persistence, &admin, id).unwrap();
    assert_eq!(redirect, "/manufacturers/");
    assert!(matches!(
        delete_manufacturer(&mut persistence, &admin, id),
        Err(ApiError::ResourceNotFound { .. })
    ));
}

#[test]
fn test_create_car_with_drivers() {
    let mut persistence = create_test_persistence();
    let admin = create_test_admin(&mut persistence);
    let driver = create_test_driver(&mut persistence, "driver1", "ABC12345");
    let manufacturer_id = persistence.create_manufacturer("Toyota", "Japan").unwrap();
    let form = CarForm {
        model: String::from("Camry"),
        manufacturer: manufacturer_id.to_string(),
        drivers: vec![driver.driver_id.to_string(), driver.driver_id.to_string()],
    };

    let outcome = create_car(&mut persistence, &admin, &form).unwrap();

    assert!(matches!(outcome, Outcome::Redirect(ref path) if path == "/cars/"));
    let cars = persistence.list_driver_cars(driver.driver_id).unwrap();
    assert_eq!(cars.len(), 1);
    assert_eq!(cars[0].model, "Camry");
}

#[test]
fn test_create_car_rejects_unknown_choices() {
    let mut persistence = create_test_persistence();
    let admin = create_test_admin(&mut persistence);
    let form = CarForm {
        model: String::from("Camry"),
        manufacturer: String::from("99"),
        drivers: vec![String::from("77")],
    };

    let errors = match form.clean(&mut persistence) {
        Err(ApiError::Validation(errors)) => errors,
        other => panic!("expected validation errors, got {other:?}"),
    };
    assert_eq!(errors.get("manufacturer"), [INVALID_CHOICE]);
    assert!(errors.contains("drivers"));

    let outcome = create_car(&mut persistence, &admin, &form).unwrap();
    assert!(matches!(outcome, Outcome::Render(_)));
    assert!(persistence.list_cars(None).unwrap().is_empty());
}

#[test]
fn test_car_form_offers_choices() {
    let mut persistence = create_test_persistence();
    let admin = create_test_admin(&mut persistence);
    persistence.create_manufacturer("Toyota", "Japan").unwrap();

    let page = car_create_form(&mut persistence, &admin).unwrap();

    let manufacturers = context_list(&page, "manufacturer_choices");
    assert_eq!(manufacturers.len(), 1);
    assert_eq!(manufacturers[0]["label"], "Toyota Japan");
    assert_eq!(context_list(&page, "driver_choices").len(), 1);
}

#[test]
fn test_delete_car() {
    let mut persistence = create_test_persistence();
    let admin = create_test_admin(&mut persistence);
    let manufacturer_id = persistence.create_manufacturer("Toyota", "Japan").unwrap();
    let car_id = persistence.create_car("Camry", manufacturer_id).unwrap();

    assert_eq!(
        delete_car(&mut persistence, &admin, car_id).unwrap(),
        "/cars/"
    );
    assert!(persistence.get_car(car_id).unwrap().is_none());
}
