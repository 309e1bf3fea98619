//! Registration, login and logout against an in-process site.

#![allow(clippy::unwrap_used)]

use cafe_catalog_core::Email;
use cafe_catalog_integration_tests::{TestApp, location};
use reqwest::StatusCode;

#[tokio::test]
async fn test_register_logs_in_and_redirects_home() {
    let app = TestApp::spawn().await;
    let client = app.client();

    let response = app.register(&client, "New@Cafe.org", "flat white").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/"));

    let home = client.get(app.url("/")).send().await.unwrap();
    let html = home.text().await.unwrap();
    assert!(html.contains("Logged in as new@cafe.org"));
    assert!(html.contains("/logout"));
}

#[tokio::test]
async fn test_duplicate_registration_is_rejected() {
    let app = TestApp::spawn().await;

    let first = app.client();
    app.register(&first, "dup@cafe.org", "one").await;

    let second = app.client();
    let response = app.register(&second, "DUP@cafe.org", "two").await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let html = response.text().await.unwrap();
    assert!(html.contains("already exists"));

    let email = Email::parse("dup@cafe.org").unwrap();
    assert_eq!(app.users.count_email(&email).await, 1);

    // The rejected client is still anonymous.
    let response = second.get(app.url("/add")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
}

#[tokio::test]
async fn test_register_validation_errors_redisplay_form() {
    let app = TestApp::spawn().await;
    let client = app.client();

    let response = app.register(&client, "not-an-email", "").await;
    assert_eq!(response.status(), StatusCode::OK);
    let html = response.text().await.unwrap();
    assert!(html.contains("Invalid email address."));
    assert!(html.contains("This field is required."));
    assert!(app.users.is_empty().await);
}

#[tokio::test]
async fn test_login_with_correct_password() {
    let app = TestApp::spawn().await;
    app.register(&app.client(), "me@cafe.org", "cortado").await;

    let client = app.client();
    let response = app.login(&client, "me@cafe.org", "cortado").await;
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/"));

    let response = client.get(app.url("/add")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_login_failures_look_the_same() {
    let app = TestApp::spawn().await;
    app.register(&app.client(), "me@cafe.org", "cortado").await;

    let client = app.client();
    let wrong_password = app.login(&client, "me@cafe.org", "espresso").await;
    let unknown_email = app.login(&client, "nobody@cafe.org", "cortado").await;

    for response in [&wrong_password, &unknown_email] {
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(response), Some("/login?error=credentials"));
    }

    let page = client
        .get(app.url("/login?error=credentials"))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(page.contains("Invalid email or password."));

    let response = client.get(app.url("/add")).send().await.unwrap();
    assert_eq!(location(&response), Some("/login"));
}

#[tokio::test]
async fn test_logout_ends_session() {
    let app = TestApp::spawn().await;
    let client = app.logged_in_client("bye@cafe.org").await;

    let response = client.get(app.url("/logout")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/"));

    for path in ["/add", "/update/1", "/delete/1"] {
        let response = client.get(app.url(path)).send().await.unwrap();
        assert_eq!(location(&response), Some("/login"), "path {path}");
    }
    assert!(app.catalog.requests().is_empty());
}

#[tokio::test]
async fn test_logout_when_anonymous_is_harmless() {
    let app = TestApp::spawn().await;

    let response = app.client().get(app.url("/logout")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), Some("/"));
}

#[tokio::test]
async fn test_bad_csrf_token_is_forbidden() {
    let app = TestApp::spawn().await;
    let client = app.client();
    app.csrf_token(&client, "/register").await;

    let response = client
        .post(app.url("/register"))
        .form(&[
            ("email", "forged@cafe.org"),
            ("password", "pw"),
            ("csrf_token", "not-the-token"),
        ])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(app.users.is_empty().await);
}

#[tokio::test]
async fn test_health_endpoints() {
    let app = TestApp::spawn().await;
    let client = app.client();

    let response = client.get(app.url("/health")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await.unwrap(), "ok");

    let response = client.get(app.url("/health/ready")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_security_headers_and_request_id() {
    let app = TestApp::spawn().await;

    let response = app.client().get(app.url("/")).send().await.unwrap();
    let headers = response.headers();
    assert_eq!(headers.get("x-frame-options").unwrap(), "DENY");
    assert!(headers.get("content-security-policy").is_some());
    assert!(headers.get("x-request-id").is_some());
}
