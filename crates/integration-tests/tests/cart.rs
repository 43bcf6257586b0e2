//! Cart flows: add, update, remove, per-browser isolation and checkout.

use axum::http::StatusCode;
use quartermaster_integration_tests::{Browser, TestApp};

/// Add `quantity` of the product with `sku` and return the cart page body.
async fn add(app: &TestApp, browser: &mut Browser, sku: &str, quantity: &str, size: &str) -> String {
    let product = app.product(sku).await;
    let id = product.id.to_string();
    let response = browser
        .post(
            "/cart/add",
            &[("product_id", id.as_str()), ("quantity", quantity), ("size", size)],
        )
        .await;
    assert_eq!(response.redirect_target(), "/cart");
    browser.get("/cart").await.body
}

/// The first cart line id on a cart page.
fn first_item_id(body: &str) -> String {
    let marker = r#"name="item_id" value=""#;
    let start = body.find(marker).unwrap() + marker.len();
    body[start..start + 36].to_string()
}

#[tokio::test]
async fn test_empty_cart() {
    let app = TestApp::new();
    let mut browser = app.browser();

    let response = browser.get("/cart").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Your cart is empty"));
    assert!(response.body.contains("Continue Shopping"));
}

#[tokio::test]
async fn test_add_one_line() {
    let app = TestApp::new();
    let mut browser = app.browser();

    let body = add(&app, &mut browser, "AC-500", "2", "").await;

    assert!(!body.contains("Your cart is empty"));
    assert_eq!(body.matches(r#"action="/cart/update""#).count(), 1);
    assert!(body.contains("Safety Glasses"));
    // 2 x $9.75
    assert!(body.contains("<td>$19.50</td>"));
    assert!(body.contains(r#"<span class="cart-count">2</span>"#));
    assert_eq!(app.carts.line_count().await, 1);
}

#[tokio::test]
async fn test_cart_count_fragment() {
    let app = TestApp::new();
    let mut browser = app.browser();

    add(&app, &mut browser, "AC-500", "2", "").await;
    add(&app, &mut browser, "AC-520", "1", "").await;

    let response = browser.get("/cart/count").await;
    assert_eq!(response.body.trim(), r#"<span class="cart-count">3</span>"#);
}

#[tokio::test]
async fn test_sized_product_requires_size() {
    let app = TestApp::new();
    let mut browser = app.browser();
    let polo = app.product("SH-200").await;

    let response = browser
        .post(
            "/cart/add",
            &[("product_id", polo.id.to_string().as_str()), ("quantity", "1"), ("size", "")],
        )
        .await;
    let target = response.redirect_target().to_string();
    assert_eq!(target, format!("/products/{}?error=size", polo.id));

    let response = browser.get(&target).await;
    assert!(response.body.contains("Please select a size"));
    assert_eq!(app.carts.line_count().await, 0);

    let body = add(&app, &mut browser, "SH-200", "1", "M").await;
    assert!(body.contains("Size: M"));
}

#[tokio::test]
async fn test_invalid_quantity_is_rejected() {
    let app = TestApp::new();
    let mut browser = app.browser();
    let glasses = app.product("AC-500").await;

    let response = browser
        .post(
            "/cart/add",
            &[("product_id", glasses.id.to_string().as_str()), ("quantity", "0")],
        )
        .await;
    assert_eq!(
        response.redirect_target(),
        format!("/products/{}?error=quantity", glasses.id)
    );
    assert_eq!(app.carts.line_count().await, 0);
}

#[tokio::test]
async fn test_update_quantity() {
    let app = TestApp::new();
    let mut browser = app.browser();

    let body = add(&app, &mut browser, "AC-500", "1", "").await;
    let item_id = first_item_id(&body);

    let response = browser
        .post("/cart/update", &[("item_id", item_id.as_str()), ("quantity", "3")])
        .await;
    assert_eq!(response.redirect_target(), "/cart");

    let body = browser.get("/cart").await.body;
    assert!(body.contains(r#"name="quantity" value="3""#));
    assert!(body.contains("<td>$29.25</td>"));
}

#[tokio::test]
async fn test_update_to_zero_is_ignored() {
    let app = TestApp::new();
    let mut browser = app.browser();

    let body = add(&app, &mut browser, "AC-500", "2", "").await;
    let item_id = first_item_id(&body);

    browser
        .post("/cart/update", &[("item_id", item_id.as_str()), ("quantity", "0")])
        .await;

    let body = browser.get("/cart").await.body;
    assert!(body.contains(r#"name="quantity" value="2""#));
    assert_eq!(app.carts.line_count().await, 1);
}

#[tokio::test]
async fn test_remove_line() {
    let app = TestApp::new();
    let mut browser = app.browser();

    let body = add(&app, &mut browser, "AC-500", "1", "").await;
    let item_id = first_item_id(&body);

    let response = browser.post("/cart/remove", &[("item_id", item_id.as_str())]).await;
    assert_eq!(response.redirect_target(), "/cart");

    let body = browser.get("/cart").await.body;
    assert!(body.contains("Your cart is empty"));
}

#[tokio::test]
async fn test_carts_are_per_browser() {
    let app = TestApp::new();
    let mut alice = app.browser();
    let mut bob = app.browser();

    let body = add(&app, &mut alice, "AC-500", "1", "").await;
    let alice_item = first_item_id(&body);

    let response = bob.get("/cart").await;
    assert!(response.body.contains("Your cart is empty"));

    // Bob cannot remove Alice's line
    let response = bob.post("/cart/remove", &[("item_id", alice_item.as_str())]).await;
    assert_eq!(response.redirect_target(), "/cart?error=not_found");
    assert_eq!(app.carts.line_count().await, 1);
}

#[tokio::test]
async fn test_cart_outage_reports_error() {
    let app = TestApp::new();
    let mut browser = app.browser();
    let glasses = app.product("AC-500").await;

    browser.get("/").await;
    app.carts.set_failing(true);

    let response = browser
        .post(
            "/cart/add",
            &[("product_id", glasses.id.to_string().as_str()), ("quantity", "1")],
        )
        .await;
    assert_eq!(
        response.redirect_target(),
        format!("/products/{}?error=add_failed", glasses.id)
    );

    // Reads fail soft
    let response = browser.get("/cart").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("Your cart is empty"));
}

#[tokio::test]
async fn test_checkout_summary() {
    let app = TestApp::new();
    let mut browser = app.browser();

    add(&app, &mut browser, "AC-500", "2", "").await;

    let response = browser.get("/checkout").await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains("<dt>Items (2)</dt><dd>$19.50</dd>"));
    assert!(response.body.contains("<dt>Shipping</dt><dd>$8.00</dd>"));
    assert!(response.body.contains("<dt>Taxes</dt><dd>$6.19</dd>"));
    assert!(response.body.contains("<strong>$33.69</strong>"));
    assert!(response.body.contains(r#"value="Karl""#));
}

#[tokio::test]
async fn test_place_demo_order() {
    let app = TestApp::new();
    let mut browser = app.browser();

    let response = browser
        .post(
            "/checkout",
            &[
                ("first_name", "Karl"),
                ("last_name", "Kuester"),
                ("email", "kkuester@department.com"),
                ("phone", "(847) 897-7443"),
                ("ext", ""),
                ("address", "2126 POINT BLVD. UNIT 200, ELGIN IL, 60123-7656"),
                ("shipping_method", "Next Day Air"),
            ],
        )
        .await;
    assert_eq!(response.redirect_target(), "/?success=order_placed");

    let response = browser.get("/?success=order_placed").await;
    assert!(
        response
            .body
            .contains("Order placed successfully! (This is a demo)")
    );
}

#[tokio::test]
async fn test_checkout_requires_fields() {
    let app = TestApp::new();
    let mut browser = app.browser();

    let response = browser
        .post(
            "/checkout",
            &[
                ("first_name", ""),
                ("last_name", "Kuester"),
                ("email", "kkuester@department.com"),
                ("phone", "(847) 897-7443"),
                ("address", "2126 POINT BLVD."),
                ("shipping_method", "Next Day Air"),
            ],
        )
        .await;
    assert_eq!(response.status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(response.body.contains("Please fill in: First Name"));
    assert!(response.body.contains(r#"<option value="Next Day Air" selected>"#));
}
