//! End-to-end session handling over a real socket.
//!
//! A cookie-keeping client follows redirects like a browser would.

use reqwest::{Client, StatusCode};

use herbal_glow_integration_tests::TestApp;
use herbal_glow_storefront::db::UserStore;

fn browser() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

#[tokio::test]
async fn test_signup_account_logout_round() {
    let (base_url, _state) = TestApp::new().await.spawn().await;
    let client = browser();

    let signup = client
        .post(format!("{base_url}/auth/signup"))
        .form(&[
            ("username", "marigold"),
            ("email", "marigold@example.com"),
            ("password", "petals1"),
            ("confirm_password", "petals1"),
        ])
        .send()
        .await
        .expect("signup request");
    assert_eq!(signup.status(), StatusCode::OK);
    let body = signup.text().await.expect("signup body");
    assert!(body.contains("Welcome, marigold!"));

    let account = client
        .get(format!("{base_url}/account"))
        .send()
        .await
        .expect("account request");
    assert_eq!(account.status(), StatusCode::OK);
    assert_eq!(account.url().path(), "/account");
    assert!(account.text().await.expect("account body").contains("marigold@example.com"));

    let logout = client
        .post(format!("{base_url}/auth/logout"))
        .send()
        .await
        .expect("logout request");
    assert_eq!(logout.status(), StatusCode::OK);

    // Redirected to the login page once the session is gone
    let after = client
        .get(format!("{base_url}/account"))
        .send()
        .await
        .expect("account request");
    assert_eq!(after.status(), StatusCode::OK);
    assert_eq!(after.url().path(), "/auth/login");
}

#[tokio::test]
async fn test_failed_login_lands_on_form_with_notice() {
    let (base_url, state) = TestApp::new().await.spawn().await;
    let client = browser();

    let response = client
        .post(format!("{base_url}/auth/login"))
        .form(&[("username", "nobody"), ("password", "whatever")])
        .send()
        .await
        .expect("login request");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.url().path(), "/auth/login");
    assert_eq!(response.url().query(), Some("error=invalid_credentials"));
    assert!(
        response
            .text()
            .await
            .expect("login body")
            .contains("Invalid username or password!")
    );
    assert!(state.users().list().await.expect("list users").is_empty());
}

#[tokio::test]
async fn test_separate_browsers_have_separate_sessions() {
    let (base_url, _state) = TestApp::new().await.spawn().await;
    let first = browser();
    let second = browser();

    first
        .post(format!("{base_url}/auth/signup"))
        .form(&[
            ("username", "juniper"),
            ("email", "juniper@example.com"),
            ("password", "berries1"),
            ("confirm_password", "berries1"),
        ])
        .send()
        .await
        .expect("signup request");

    let theirs = second
        .get(format!("{base_url}/account"))
        .send()
        .await
        .expect("account request");
    assert_eq!(theirs.url().path(), "/auth/login");
}
