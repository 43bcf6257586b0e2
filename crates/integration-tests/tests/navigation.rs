//! Page navigation, category filtering and product detail.

use axum::http::StatusCode;
use quartermaster_integration_tests::TestApp;

#[tokio::test]
async fn test_health_endpoints() {
    let app = TestApp::new();
    let mut browser = app.browser();

    let response = browser.get("/health").await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, "ok");

    // In-memory repositories have no pool to check
    let response = browser.get("/health/ready").await;
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_home_shows_guest_header_and_categories() {
    let app = TestApp::new();
    let mut browser = app.browser();

    let response = browser.get("/").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("WELCOME, GUEST"));
    assert!(response.body.contains(r#"href="/signin""#));
    assert!(response.body.contains(r#"href="/products?category=outerwear""#));
    assert!(response.body.contains("Available: <strong>$999.99</strong>"));
}

#[tokio::test]
async fn test_unfiltered_listing() {
    let app = TestApp::new();
    let mut browser = app.browser();

    let response = browser.get("/products").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("<h1>All Products</h1>"));
    assert!(response.body.contains("Field Jacket"));
    assert!(response.body.contains("Safety Glasses"));
}

#[tokio::test]
async fn test_category_filter() {
    let app = TestApp::new();
    let mut browser = app.browser();

    let response = browser.get("/products?category=shirts").await;
    assert!(response.body.contains("<h1>Shirts</h1>"));
    assert!(response.body.contains("Performance Polo"));
    assert!(!response.body.contains("Field Jacket"));
}

#[tokio::test]
async fn test_last_selected_category_wins() {
    let app = TestApp::new();
    let mut browser = app.browser();

    browser.get("/products?category=pants").await;
    let response = browser.get("/products?category=shirts").await;

    assert!(
        response
            .body
            .contains(r#"href="/products?category=shirts" class="active""#)
    );
    assert!(
        !response
            .body
            .contains(r#"href="/products?category=pants" class="active""#)
    );
    assert!(!response.body.contains("Work Pant"));
}

#[tokio::test]
async fn test_unknown_category_lists_everything() {
    let app = TestApp::new();
    let mut browser = app.browser();

    let response = browser.get("/products?category=hovercraft").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("<h1>Products</h1>"));
    assert!(response.body.contains("Field Jacket"));
    assert!(response.body.contains("Canvas Tote"));
}

#[tokio::test]
async fn test_search_by_name() {
    let app = TestApp::new();
    let mut browser = app.browser();

    let response = browser.get("/products?q=POLO").await;
    assert!(response.body.contains("Performance Polo"));
    assert!(!response.body.contains("Field Jacket"));
}

#[tokio::test]
async fn test_search_with_no_matches() {
    let app = TestApp::new();
    let mut browser = app.browser();

    let response = browser.get("/products?q=submarine").await;
    assert!(response.body.contains("No products found."));
}

#[tokio::test]
async fn test_product_detail() {
    let app = TestApp::new();
    let mut browser = app.browser();
    let jacket = app.product("OW-100").await;

    let response = browser.get(&format!("/products/{}", jacket.id)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("<h1>Field Jacket</h1>"));
    assert!(response.body.contains("$89.99"));
    assert!(response.body.contains(r#"<option value="XL">XL</option>"#));
    assert!(response.body.contains("<th>Care</th><td>Machine wash cold</td>"));
}

#[tokio::test]
async fn test_missing_product_shows_fallback() {
    let app = TestApp::new();
    let mut browser = app.browser();

    let response = browser
        .get("/products/00000000-0000-0000-0000-000000000000")
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("No product selected"));

    let response = browser.get("/products/not-a-uuid").await;
    assert!(response.body.contains("No product selected"));
}

#[tokio::test]
async fn test_catalog_outage_fails_soft() {
    let app = TestApp::new();
    app.catalog.set_failing(true);
    let mut browser = app.browser();

    let response = browser.get("/products").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("No products found."));
}

#[tokio::test]
async fn test_unknown_path_is_not_found() {
    let app = TestApp::new();
    let mut browser = app.browser();

    let response = browser.get("/no-such-page").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
}
