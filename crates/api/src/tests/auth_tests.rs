// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Login, session validation and logout.

use super::helpers::{TEST_PASSWORD, context_value, create_test_driver, create_test_persistence};
use crate::forms::LoginForm;
use crate::handlers::{LoginOutcome, login, login_form, logout};
use crate::{AuthError, AuthenticationService, INVALID_LOGIN, NON_FIELD_ERRORS};
use time::Duration;

fn login_as(username: &str, password: &str, next: &str) -> LoginForm {
    LoginForm {
        username: username.to_string(),
        password: password.to_string(),
        next: next.to_string(),
    }
}

#[test]
fn test_login_opens_a_valid_session() {
    let mut persistence = create_test_persistence();
    let driver = create_test_driver(&mut persistence, "driver1", "ABC12345");

    let session = AuthenticationService::login(
        &mut persistence,
        "driver1",
        TEST_PASSWORD,
        AuthenticationService::DEFAULT_SESSION_LENGTH,
    )
    .unwrap();

    assert_eq!(session.driver, driver);
    assert_eq!(session.session_token.len(), 64);

    let validated =
        AuthenticationService::validate_session(&mut persistence, &session.session_token).unwrap();
    assert_eq!(validated, driver);
}

#[test]
fn test_session_tokens_are_unique() {
    let mut persistence = create_test_persistence();
    create_test_driver(&mut persistence, "driver1", "ABC12345");

    let first = AuthenticationService::login(
        &mut persistence,
        "driver1",
        TEST_PASSWORD,
        AuthenticationService::DEFAULT_SESSION_LENGTH,
    )
    .unwrap();
    let second = AuthenticationService::login(
        &mut persistence,
        "driver1",
        TEST_PASSWORD,
        AuthenticationService::DEFAULT_SESSION_LENGTH,
    )
    .unwrap();

    assert_ne!(first.session_token, second.session_token);
}

#[test]
fn test_wrong_password_is_rejected() {
    let mut persistence = create_test_persistence();
    create_test_driver(&mut persistence, "driver1", "ABC12345");

    let result = AuthenticationService::login(
        &mut persistence,
        "driver1",
        "wrong-password",
        AuthenticationService::DEFAULT_SESSION_LENGTH,
    );

    assert_eq!(
        result,
        Err(AuthError::AuthenticationFailed {
            reason: String::from(INVALID_LOGIN)
        })
    );
}

#[test]
fn test_unknown_token_is_rejected() {
    let mut persistence = create_test_persistence();
    assert!(AuthenticationService::validate_session(&mut persistence, "nope").is_err());
}

#[test]
fn test_expired_session_is_rejected_and_removed() {
    let mut persistence = create_test_persistence();
    create_test_driver(&mut persistence, "driver1", "ABC12345");

    let session = AuthenticationService::login(
        &mut persistence,
        "driver1",
        TEST_PASSWORD,
        Duration::seconds(-1),
    )
    .unwrap();

    let result = AuthenticationService::validate_session(&mut persistence, &session.session_token);
    assert!(result.is_err());
    assert!(
        persistence
            .get_session_by_token(&session.session_token)
            .unwrap()
            .is_none()
    );
}

#[test]
fn test_purge_expired_sessions() {
    let mut persistence = create_test_persistence();
    create_test_driver(&mut persistence, "driver1", "ABC12345");
    AuthenticationService::login(
        &mut persistence,
        "driver1",
        TEST_PASSWORD,
        Duration::seconds(-5),
    )
    .unwrap();
    AuthenticationService::login(
        &mut persistence,
        "driver1",
        TEST_PASSWORD,
        AuthenticationService::DEFAULT_SESSION_LENGTH,
    )
    .unwrap();

    assert_eq!(
        AuthenticationService::purge_expired_sessions(&mut persistence).unwrap(),
        1
    );
}

#[test]
fn test_login_redirects_to_local_next() {
    let mut persistence = create_test_persistence();
    create_test_driver(&mut persistence, "driver1", "ABC12345");

    let outcome = login(
        &mut persistence,
        &login_as("driver1", TEST_PASSWORD, "/cars/"),
        AuthenticationService::DEFAULT_SESSION_LENGTH,
    );

    match outcome {
        LoginOutcome::LoggedIn { redirect, .. } => assert_eq!(redirect, "/cars/"),
        LoginOutcome::Rejected(_) => panic!("login should succeed"),
    }
}

#[test]
fn test_login_ignores_external_next() {
    let mut persistence = create_test_persistence();
    create_test_driver(&mut persistence, "driver1", "ABC12345");

    for next in ["https://evil.example/", "//evil.example/", ""] {
        let outcome = login(
            &mut persistence,
            &login_as("driver1", TEST_PASSWORD, next),
            AuthenticationService::DEFAULT_SESSION_LENGTH,
        );
        match outcome {
            LoginOutcome::LoggedIn { redirect, .. } => assert_eq!(redirect, "/"),
            LoginOutcome::Rejected(_) => panic!("login should succeed"),
        }
    }
}

#[test]
fn test_failed_login_re_renders_with_non_field_error() {
    let mut persistence = create_test_persistence();
    create_test_driver(&mut persistence, "driver1", "ABC12345");

    let outcome = login(
        &mut persistence,
        &login_as("driver1", "bad", "/drivers/"),
        AuthenticationService::DEFAULT_SESSION_LENGTH,
    );

    let LoginOutcome::Rejected(page) = outcome else {
        panic!("login should fail");
    };
    assert_eq!(
        context_value(&page, "errors")[NON_FIELD_ERRORS][0],
        INVALID_LOGIN
    );
    assert_eq!(context_value(&page, "form")["next"], "/drivers/");
    assert!(context_value(&page, "form").get("password").is_none());
}

#[test]
fn test_login_form_carries_next() {
    let page = login_form(Some("/cars/3/"));
    assert_eq!(context_value(&page, "form")["next"], "/cars/3/");
    assert!(!page.context.contains_key("user"));
}

#[test]
fn test_logout_ends_session() {
    let mut persistence = create_test_persistence();
    create_test_driver(&mut persistence, "driver1", "ABC12345");
    let session = AuthenticationService::login(
        &mut persistence,
        "driver1",
        TEST_PASSWORD,
        AuthenticationService::DEFAULT_SESSION_LENGTH,
    )
    .unwrap();

    let redirect = logout(&mut persistence, &session.session_token).unwrap();

    assert_eq!(redirect, "/accounts/login/");
    assert!(
        AuthenticationService::validate_session(&mut persistence, &session.session_token).is_err()
    );
}

#[test]
fn test_login_with_unrepresentable_expiry_fails_cleanly() {
    let mut persistence = create_test_persistence();
    create_test_driver(&mut persistence, "driver1", "ABC12345");

    let result =
        AuthenticationService::login(&mut persistence, "driver1", TEST_PASSWORD, Duration::MAX);

    assert!(matches!(result, Err(AuthError::AuthenticationFailed { .. })));
}

#[test]
fn test_login_handler_rejects_unrepresentable_expiry() {
    let mut persistence = create_test_persistence();
    create_test_driver(&mut persistence, "driver1", "ABC12345");

    let outcome = login(
        &mut persistence,
        &login_as("driver1", TEST_PASSWORD, "/cars/"),
        Duration::MAX,
    );

    assert!(matches!(outcome, LoginOutcome::Rejected(_)));
}
