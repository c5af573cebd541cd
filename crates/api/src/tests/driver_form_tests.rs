// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Driver account creation and license update forms.

use super::helpers::{context_value, create_test_admin, create_test_driver, create_test_persistence};
use crate::forms::{DriverCreationForm, LICENSE_TAKEN, LicenseUpdateForm, USERNAME_TAKEN};
use crate::handlers::{create_driver, update_driver_license};
use crate::{ApiError, FormErrors, Outcome, PasswordPolicy};
use taxi_persistence::Persistence;

fn valid_form() -> DriverCreationForm {
    DriverCreationForm {
        username: String::from("testuser"),
        password1: String::from("Testpass123!"),
        password2: String::from("Testpass123!"),
        license_number: String::from("ABC12345"),
        first_name: String::from("Test"),
        last_name: String::from("User"),
    }
}

fn form_with_license(license_number: &str) -> DriverCreationForm {
    DriverCreationForm {
        license_number: license_number.to_string(),
        ..valid_form()
    }
}

fn clean_errors(persistence: &mut Persistence, form: &DriverCreationForm) -> FormErrors {
    match form.clean(persistence, &PasswordPolicy::default()) {
        Err(ApiError::Validation(errors)) => errors,
        other => panic!("expected validation errors, got {other:?}"),
    }
}

#[test]
fn test_license_number_valid() {
    let mut persistence = create_test_persistence();

    let new_driver = valid_form()
        .clean(&mut persistence, &PasswordPolicy::default())
        .unwrap();

    assert_eq!(new_driver.username, "testuser");
    assert_eq!(new_driver.license_number, "ABC12345");
    assert_eq!(new_driver.first_name, "Test");
}

#[test]
fn test_license_number_invalid_length() {
    let mut persistence = create_test_persistence();

    let errors = clean_errors(&mut persistence, &form_with_license("AB1234"));

    assert_eq!(
        errors.get("license_number"),
        ["License number should consist of 8 characters"]
    );
}

#[test]
fn test_license_number_invalid_format() {
    let mut persistence = create_test_persistence();

    let errors = clean_errors(&mut persistence, &form_with_license("abc12345"));

    assert_eq!(
        errors.get("license_number"),
        ["First 3 characters should be uppercase letters"]
    );
}

#[test]
fn test_license_number_non_digit_suffix() {
    let mut persistence = create_test_persistence();

    let errors = clean_errors(&mut persistence, &form_with_license("ABC1234X"));

    assert_eq!(
        errors.get("license_number"),
        ["Last 5 characters should be digits"]
    );
}

#[test]
fn test_every_malformed_license_is_rejected_on_license_field() {
    let mut persistence = create_test_persistence();

    for license in [
        "", "A", "ABCD1234", "AB123456", "ABC123456", "ABC 1234", "ÄBC12345", "ABC１2345",
        "abc1234", "12345ABC",
    ] {
        let errors = clean_errors(&mut persistence, &form_with_license(license));
        assert!(
            errors.contains("license_number"),
            "{license:?} was accepted"
        );
        assert_eq!(errors.get("license_number").len(), 1);
    }
}

#[test]
fn test_duplicate_license_is_rejected() {
    let mut persistence = create_test_persistence();
    create_test_driver(&mut persistence, "existing", "ABC12345");

    let errors = clean_errors(&mut persistence, &valid_form());

    assert_eq!(errors.get("license_number"), [LICENSE_TAKEN]);
}

#[test]
fn test_duplicate_username_is_rejected() {
    let mut persistence = create_test_persistence();
    create_test_driver(&mut persistence, "testuser", "XYZ98765");

    let errors = clean_errors(&mut persistence, &valid_form());

    assert_eq!(errors.get("username"), [USERNAME_TAKEN]);
    assert!(!errors.contains("license_number"));
}

#[test]
fn test_password_mismatch_is_reported_on_confirmation() {
    let mut persistence = create_test_persistence();
    let form = DriverCreationForm {
        password2: String::from("Testpass124!"),
        ..valid_form()
    };

    let errors = clean_errors(&mut persistence, &form);

    assert_eq!(
        errors.get("password2"),
        ["The two password fields didn’t match."]
    );
}

#[test]
fn test_weak_password_collects_every_violation() {
    let mut persistence = create_test_persistence();
    let form = DriverCreationForm {
        password1: String::from("1234"),
        password2: String::from("1234"),
        ..valid_form()
    };

    let errors = clean_errors(&mut persistence, &form);

    let messages = errors.get("password2");
    assert!(messages.contains(&String::from(
        "This password is too short. It must contain at least 8 characters."
    )));
    assert!(messages.contains(&String::from("This password is entirely numeric.")));
}

#[test]
fn test_all_fields_are_checked_in_one_pass() {
    let mut persistence = create_test_persistence();
    let form = DriverCreationForm {
        username: String::from("bad name!"),
        password1: String::new(),
        password2: String::new(),
        license_number: String::from("abc"),
        first_name: String::new(),
        last_name: String::new(),
    };

    let errors = clean_errors(&mut persistence, &form);

    assert!(errors.contains("username"));
    assert!(errors.contains("password1"));
    assert!(errors.contains("password2"));
    assert!(errors.contains("license_number"));
}

#[test]
fn test_create_driver_persists_and_redirects() {
    let mut persistence = create_test_persistence();
    let admin = create_test_admin(&mut persistence);

    let outcome = create_driver(
        &mut persistence,
        &admin,
        &valid_form(),
        &PasswordPolicy::default(),
    )
    .unwrap();

    let driver = persistence
        .get_driver_by_username("testuser")
        .unwrap()
        .unwrap();
    match outcome {
        Outcome::Redirect(location) => {
            assert_eq!(location, format!("/drivers/{}/", driver.driver_id));
        }
        Outcome::Render(_) => panic!("expected a redirect"),
    }
    assert_eq!(driver.license_number, "ABC12345");
    assert_eq!(
        persistence
            .verify_credentials("testuser", "Testpass123!")
            .unwrap(),
        Some(driver.driver_id)
    );
}

#[test]
fn test_rejected_form_is_re_rendered_without_passwords() {
    let mut persistence = create_test_persistence();
    let admin = create_test_admin(&mut persistence);

    let outcome = create_driver(
        &mut persistence,
        &admin,
        &form_with_license("AB1234"),
        &PasswordPolicy::default(),
    )
    .unwrap();

    let Outcome::Render(page) = outcome else {
        panic!("expected the form to be re-rendered");
    };
    let form = context_value(&page, "form");
    assert_eq!(form["username"], "testuser");
    assert_eq!(form["license_number"], "AB1234");
    assert!(form.get("password1").is_none());
    assert!(form.get("password2").is_none());
    assert!(
        context_value(&page, "errors")
            .get("license_number")
            .is_some()
    );
    assert!(
        persistence
            .get_driver_by_username("testuser")
            .unwrap()
            .is_none()
    );
}

#[test]
fn test_license_update_keeps_own_license() {
    let mut persistence = create_test_persistence();
    let driver = create_test_driver(&mut persistence, "driver1", "ABC12345");
    let form = LicenseUpdateForm {
        license_number: String::from("ABC12345"),
    };

    let outcome =
        update_driver_license(&mut persistence, &driver, driver.driver_id, &form).unwrap();

    assert!(matches!(outcome, Outcome::Redirect(_)));
}

#[test]
fn test_license_update_rejects_someone_elses_license() {
    let mut persistence = create_test_persistence();
    let driver = create_test_driver(&mut persistence, "driver1", "ABC12345");
    create_test_driver(&mut persistence, "driver2", "XYZ98765");
    let form = LicenseUpdateForm {
        license_number: String::from("XYZ98765"),
    };

    let outcome =
        update_driver_license(&mut persistence, &driver, driver.driver_id, &form).unwrap();

    assert!(matches!(outcome, Outcome::Render(_)));
    let stored = persistence
        .get_driver_by_id(driver.driver_id)
        .unwrap()
        .unwrap();
    assert_eq!(stored.license_number, "ABC12345");
}

#[test]
fn test_license_update_applies_new_license() {
    let mut persistence = create_test_persistence();
    let driver = create_test_driver(&mut persistence, "driver1", "ABC12345");
    let form = LicenseUpdateForm {
        license_number: String::from("QWE55555"),
    };

    update_driver_license(&mut persistence, &driver, driver.driver_id, &form).unwrap();

    let stored = persistence
        .get_driver_by_id(driver.driver_id)
        .unwrap()
        .unwrap();
    assert_eq!(stored.license_number, "QWE55555");
}

#[test]
fn test_license_update_for_unknown_driver_is_not_found() {
    let mut persistence = create_test_persistence();
    let driver = create_test_driver(&mut persistence, "driver1", "ABC12345");
    let form = LicenseUpdateForm {
        license_number: String::from("QWE55555"),
    };

    let result = update_driver_license(&mut persistence, &driver, 404, &form);

    assert!(matches!(result, Err(ApiError::ResourceNotFound { .. })));
}
