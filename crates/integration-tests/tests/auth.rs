//! Mock sign-in, sign-out and the sign-in side forms.

use axum::http::StatusCode;
use quartermaster_integration_tests::TestApp;

#[tokio::test]
async fn test_sign_in_with_demo_profile() {
    let app = TestApp::new();
    let mut browser = app.browser();

    browser.sign_in().await;

    let response = browser.get("/").await;
    assert!(response.body.contains("WELCOME, DEMO"));
    assert!(response.body.contains("Sign Out"));
    assert!(response.body.contains(r#"href="/account""#));
}

#[tokio::test]
async fn test_sign_in_trims_username() {
    let app = TestApp::new();
    let mut browser = app.browser();

    let response = browser
        .post("/signin", &[("username", "  demo "), ("password", "Password123!")])
        .await;
    assert_eq!(response.redirect_target(), "/");
}

#[tokio::test]
async fn test_wrong_password_is_rejected() {
    let app = TestApp::new();
    let mut browser = app.browser();

    let response = browser
        .post("/signin", &[("username", "demo"), ("password", "wrong")])
        .await;
    assert_eq!(response.redirect_target(), "/signin?error=credentials");

    let response = browser.get("/signin?error=credentials").await;
    assert!(response.body.contains("Invalid username or password."));

    let response = browser.get("/").await;
    assert!(response.body.contains("WELCOME, GUEST"));
}

#[tokio::test]
async fn test_failed_sign_in_keeps_existing_session() {
    let app = TestApp::new();
    let mut browser = app.browser();

    browser.sign_in().await;
    browser
        .post("/signin", &[("username", "demo"), ("password", "wrong")])
        .await;

    let response = browser.get("/").await;
    assert!(response.body.contains("WELCOME, DEMO"));
}

#[tokio::test]
async fn test_sign_in_is_per_browser() {
    let app = TestApp::new();
    let mut alice = app.browser();
    let mut bob = app.browser();

    alice.sign_in().await;

    let response = bob.get("/").await;
    assert!(response.body.contains("WELCOME, GUEST"));
}

#[tokio::test]
async fn test_logout_goes_home_signed_out() {
    let app = TestApp::new();
    let mut browser = app.browser();

    browser.sign_in().await;
    let response = browser.post("/logout", &[]).await;
    assert_eq!(response.redirect_target(), "/");

    let response = browser.get("/").await;
    assert!(response.body.contains("WELCOME, GUEST"));
    assert!(response.body.contains(r#"href="/signin""#));
}

#[tokio::test]
async fn test_logout_when_signed_out() {
    let app = TestApp::new();
    let mut browser = app.browser();

    let response = browser.post("/logout", &[]).await;
    assert_eq!(response.redirect_target(), "/");
}

#[tokio::test]
async fn test_sign_in_pages_hide_the_header() {
    let app = TestApp::new();
    let mut browser = app.browser();

    for path in ["/signin", "/forgot-password", "/request-account"] {
        let response = browser.get(path).await;
        assert_eq!(response.status, StatusCode::OK, "{path}");
        assert!(!response.body.contains(r#"class="site-header""#), "{path}");
    }

    let response = browser.get("/cart").await;
    assert!(response.body.contains(r#"class="site-header""#));
}

#[tokio::test]
async fn test_forgot_password() {
    let app = TestApp::new();
    let mut browser = app.browser();

    let response = browser.post("/forgot-password", &[("username", " ")]).await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("Please fill in: User Name"));

    let response = browser.post("/forgot-password", &[("username", "demo")]).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Password reset email sent."));
}

#[tokio::test]
async fn test_request_account() {
    let app = TestApp::new();
    let mut browser = app.browser();

    let mut fields = vec![
        ("first_name", "Karl"),
        ("last_name", "Kuester"),
        ("email", "kk@example.com"),
        ("confirm_email", "kk@other.example.com"),
    ];

    let response = browser.post("/request-account", &fields).await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("Email and confirm email do not match"));
    // Entered values survive the round trip
    assert!(response.body.contains(r#"value="Kuester""#));

    fields[3] = ("confirm_email", "kk@example.com");
    let response = browser.post("/request-account", &fields).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Request submitted."));
}
