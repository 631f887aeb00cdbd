//! Home page, recommender, health and middleware behavior.

use axum::{
    body::Body,
    http::{Request, StatusCode, header},
    response::Response,
};
use tower::ServiceExt;

use herbal_glow_integration_tests::TestApp;

async fn get(app: &TestApp, uri: &str) -> Response {
    app.router
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("valid request"))
        .await
        .expect("request succeeds")
}

async fn body_text(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    String::from_utf8(bytes.to_vec()).expect("body is utf-8")
}

// ============================================================================
// Recommender
// ============================================================================

#[tokio::test]
async fn test_recommend_matched_fragment() {
    let app = TestApp::new().await;
    let response = get(&app, "/recommend?skin_type=oily&concern=acne&fragment=true").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Neem"));
    assert!(body.contains("Aloe Soap"));
    assert!(body.contains("for acne control"));
    assert!(body.contains("recommendation--success"));
    assert!(!body.contains("<html"));
}

#[tokio::test]
async fn test_recommend_fragment_flag_accepts_any_truthy_value() {
    let app = TestApp::new().await;
    for uri in [
        "/recommend?skin_type=oily&concern=acne&fragment=1",
        "/recommend?skin_type=oily&concern=acne&fragment=yes",
    ] {
        let response = get(&app, uri).await;
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        let body = body_text(response).await;
        assert!(body.contains("Neem"), "{uri}");
        assert!(!body.contains("<html"), "{uri}");
    }

    for uri in [
        "/recommend?skin_type=oily&concern=acne&fragment=",
        "/recommend?skin_type=oily&concern=acne&fragment=false",
        "/recommend?skin_type=oily&concern=acne&fragment=0",
    ] {
        let response = get(&app, uri).await;
        assert_eq!(response.status(), StatusCode::OK, "{uri}");
        assert!(body_text(response).await.contains("<html"), "{uri}");
    }
}

#[tokio::test]
async fn test_recommend_requires_both_selections() {
    let app = TestApp::new().await;
    for uri in [
        "/recommend?skin_type=&concern=glow&fragment=true",
        "/recommend?concern=glow&fragment=true",
        "/recommend?skin_type=oily&concern=wrinkles&fragment=true",
    ] {
        let body = body_text(get(&app, uri).await).await;
        assert!(body.contains("Please select both skin type and concern."), "{uri}");
        assert!(body.contains("recommendation--alert"), "{uri}");
    }
}

#[tokio::test]
async fn test_recommend_unmapped_pair_falls_back() {
    let app = TestApp::new().await;
    let response = get(&app, "/recommend?skin_type=dry&concern=acne&fragment=true").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Our herbal experts recommend a custom blend"));
    assert!(body.contains("recommendation--success"));
}

#[tokio::test]
async fn test_recommend_without_script_renders_full_page() {
    let app = TestApp::new().await;
    let body = body_text(get(&app, "/recommend?skin_type=normal&concern=glow").await).await;

    assert!(body.contains("<html"));
    assert!(body.contains("popup--open"));
    assert!(body.contains(r#"value="normal" selected"#));
    assert!(body.contains(r#"value="glow" selected"#));
    assert!(body.contains("for natural glow"));
}

#[tokio::test]
async fn test_home_page_starts_with_closed_popup_and_guest_nav() {
    let app = TestApp::new().await;
    let response = get(&app, "/").await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Skincare Assistant"));
    assert!(!body.contains("popup--open"));
    assert!(body.contains(r#"href="/auth/login""#));
    assert!(!body.contains(" selected"));
}

// ============================================================================
// Health & Middleware
// ============================================================================

#[tokio::test]
async fn test_health_endpoints() {
    let app = TestApp::new().await;

    let live = get(&app, "/health").await;
    assert_eq!(live.status(), StatusCode::OK);
    assert_eq!(body_text(live).await, "ok");

    let ready = get(&app, "/health/ready").await;
    assert_eq!(ready.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_security_headers_and_request_id() {
    let app = TestApp::new().await;
    let response = get(&app, "/").await;

    let headers = response.headers();
    assert_eq!(headers.get("x-frame-options").map(|v| v.as_bytes()), Some(&b"DENY"[..]));
    assert_eq!(
        headers.get("x-content-type-options").map(|v| v.as_bytes()),
        Some(&b"nosniff"[..])
    );
    assert!(headers.contains_key(header::CONTENT_SECURITY_POLICY));
    assert!(headers.contains_key("x-request-id"));
}

#[tokio::test]
async fn test_upstream_request_id_is_echoed() {
    let app = TestApp::new().await;
    let response = app
        .router
        .clone()
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("x-request-id", "edge-42")
                .body(Body::empty())
                .expect("valid request"),
        )
        .await
        .expect("request succeeds");

    assert_eq!(
        response.headers().get("x-request-id").map(|v| v.as_bytes()),
        Some(&b"edge-42"[..])
    );
}

#[tokio::test]
async fn test_static_assets_are_served() {
    let app = TestApp::new().await;
    let response = get(&app, "/static/js/logout.js").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("localStorage.removeItem('username')"));
}
