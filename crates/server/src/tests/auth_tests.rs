// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use axum::http::StatusCode;

use super::{
    body_text, create_driver, create_test_app, get, location, post_form, session_cookie_for,
    set_cookie,
};

#[tokio::test]
async fn test_login_sets_session_cookie_and_redirects_to_next() {
    let (app_state, app) = create_test_app();
    create_driver(&app_state, "driver1", "ABC12345").await;

    let response = post_form(
        &app,
        "/accounts/login/",
        None,
        "username=driver1&password=testpass123&next=%2Fdrivers%2F",
    )
    .await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/drivers/");
    let cookie_header = set_cookie(&response).unwrap().to_string();
    assert!(cookie_header.starts_with("sessionid="));
    assert!(cookie_header.contains("HttpOnly"));
    assert!(cookie_header.contains("SameSite=Lax"));
    assert!(cookie_header.contains("Path=/"));

    let cookie = cookie_header.split(';').next().unwrap();
    let response = get(&app, "/drivers/", Some(cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_login_ignores_external_next() {
    let (app_state, app) = create_test_app();
    create_driver(&app_state, "driver1", "ABC12345").await;

    let response = post_form(
        &app,
        "/accounts/login/",
        None,
        "username=driver1&password=testpass123&next=https%3A%2F%2Fevil.example%2F",
    )
    .await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn test_login_ignores_next_with_header_breaking_characters() {
    let (app_state, app) = create_test_app();
    create_driver(&app_state, "driver1", "ABC12345").await;

    let response = post_form(
        &app,
        "/accounts/login/",
        None,
        "username=driver1&password=testpass123&next=%2Fcars%2F%0D%0AX-Evil%3A1",
    )
    .await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/");
    assert!(response.headers().get("x-evil").is_none());
}

#[tokio::test]
async fn test_failed_login_re_renders_form() {
    let (app_state, app) = create_test_app();
    create_driver(&app_state, "driver1", "ABC12345").await;

    let response = post_form(
        &app,
        "/accounts/login/",
        None,
        "username=driver1&password=wrong&next=",
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(set_cookie(&response).is_none());
    let body = body_text(response).await;
    assert!(body.contains("Please enter a correct username and password."));
    assert!(body.contains("value=\"driver1\""));
}

#[tokio::test]
async fn test_login_page_carries_next() {
    let (_app_state, app) = create_test_app();

    let response = get(&app, "/accounts/login/?next=%2Fcars%2F", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        body_text(response)
            .await
            .contains("value=\"&#x2F;cars&#x2F;\"")
    );
}

#[tokio::test]
async fn test_logout_ends_session() {
    let (app_state, app) = create_test_app();
    create_driver(&app_state, "driver1", "ABC12345").await;
    let cookie = session_cookie_for(&app_state, "driver1").await;

    let response = get(&app, "/accounts/logout/", Some(&cookie)).await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/accounts/login/");
    let cleared = set_cookie(&response).unwrap();
    assert!(cleared.starts_with("sessionid=;"));
    assert!(cleared.contains("Max-Age=0"));

    let response = get(&app, "/cars/", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::FOUND);
    assert!(location(&response).starts_with("/accounts/login/"));
}

#[tokio::test]
async fn test_unknown_session_token_is_cleared() {
    let (_app_state, app) = create_test_app();

    let response = get(&app, "/cars/", Some("sessionid=not-a-real-token")).await;

    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(location(&response), "/accounts/login/?next=%2Fcars%2F");
    assert!(set_cookie(&response).unwrap().contains("Max-Age=0"));
}
