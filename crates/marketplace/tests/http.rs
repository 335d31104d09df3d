mod common;

use axum::http::{Method, StatusCode};
use chrono::Duration;
use common::{PASSWORD, SECRET, TestApp};
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use serde_json::json;
use shared::{
    abstract_trait::JwtServiceTrait,
    config::JwtConfig,
    errors::TOKEN_EXPIRED_HEADER,
    model::Role,
};

#[tokio::test]
async fn catalog_is_public_and_paginated() {
    let app = TestApp::new().await;
    let seller = app.user("seller", Role::User).await;
    let shop = app.store.seed_shop(seller.user_id, "Seller's Shop");
    app.store.seed_product(shop.shop_id, "Keyboard", dec!(450000.00), 3);
    app.store.seed_product(shop.shop_id, "Mouse", dec!(150000.00), 8);
    app.store.seed_product(shop.shop_id, "Monitor", dec!(3200000.00), 1);

    let (status, _, body) = app
        .call(
            Method::GET,
            "/api/products?search=%20mo&sort=price_asc&size=1",
            None,
            None,
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "success");
    assert_eq!(body["data"][0]["name"], "Mouse");
    assert_eq!(body["pagination"]["totalItems"], 2);
    assert_eq!(body["pagination"]["totalPages"], 2);

    let (status, _, body) = app
        .call(Method::GET, "/api/products/9999", None, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not Found");
    assert_eq!(body["message"], "Product not found with id: 9999");
}

#[tokio::test]
async fn protected_routes_need_a_token() {
    let app = TestApp::new().await;

    let (status, headers, body) = app.call(Method::GET, "/api/cart", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(headers.get(TOKEN_EXPIRED_HEADER).is_none());
    assert_eq!(body["error"], "Unauthorized");

    let (status, _, _) = app
        .call(Method::GET, "/api/cart", Some("not-a-jwt"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn expired_token_is_flagged() {
    let app = TestApp::new().await;
    let user = app.user("alice", Role::User).await;
    let stale = JwtConfig::new(SECRET, Duration::minutes(-10))
        .unwrap()
        .generate_token(&user)
        .unwrap();

    let (status, headers, body) = app
        .call(Method::GET, "/api/users/me", Some(&stale), None)
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(headers.get(TOKEN_EXPIRED_HEADER).unwrap(), "true");
    assert_eq!(body["message"], "Token has expired");
}

#[tokio::test]
async fn only_the_owner_may_update_a_product() {
    let app = TestApp::new().await;
    let owner = app.user("owner", Role::User).await;
    let other = app.user("other", Role::User).await;

    let (status, _, created) = app
        .call(
            Method::POST,
            "/api/products",
            Some(&app.token(&owner)),
            Some(json!({ "name": "Lamp", "price": "120000.00", "stockQuantity": 4 })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = created["data"]["productId"].as_i64().unwrap();
    let uri = format!("/api/products/{id}");

    let (status, _, body) = app
        .call(
            Method::PUT,
            &uri,
            Some(&app.token(&other)),
            Some(json!({ "price": "1.00" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Forbidden");

    let (status, _, body) = app
        .call(
            Method::PUT,
            &uri,
            Some(&app.token(&owner)),
            Some(json!({ "price": "99000.00" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["price"], "99000.00");
    assert_eq!(body["data"]["name"], "Lamp");
}

#[tokio::test]
async fn invalid_bodies_report_field_details() {
    let app = TestApp::new().await;
    let user = app.user("alice", Role::User).await;

    let (status, _, body) = app
        .call(
            Method::POST,
            "/api/cart/items",
            Some(&app.token(&user)),
            Some(json!({ "productId": 1, "quantity": 0 })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation Failed");
    assert_eq!(body["details"]["quantity"][0], "Quantity must be at least 1");
}

#[tokio::test]
async fn checkout_over_http() {
    let app = TestApp::new().await;
    let seller = app.user("seller", Role::User).await;
    let buyer = app.user("buyer", Role::User).await;
    let shop = app.store.seed_shop(seller.user_id, "Seller's Shop");
    let p = app.store.seed_product(shop.shop_id, "P", dec!(10.00), 5);
    let token = app.token(&buyer);

    let (status, _, body) = app
        .call(Method::POST, "/api/orders/checkout", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Cart not found");

    let (status, _, _) = app
        .call(
            Method::POST,
            "/api/cart/items",
            Some(&token),
            Some(json!({ "productId": p.product_id, "quantity": 2 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _, body) = app
        .call(Method::POST, "/api/orders/checkout", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "SUCCESS");
    assert_eq!(body["data"]["total"], "20.00");

    let (status, _, body) = app
        .call(Method::POST, "/api/orders/checkout", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Empty Cart");
    assert_eq!(body["message"], "Cannot checkout with empty cart");
}

#[tokio::test]
async fn admin_routes_are_guarded_by_role() {
    let app = TestApp::new().await;
    let user = app.user("alice", Role::User).await;
    let admin = app.user("root", Role::Admin).await;

    let (status, _, _) = app
        .call(Method::GET, "/api/admin/users", Some(&app.token(&user)), None)
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _, body) = app
        .call(
            Method::GET,
            "/api/admin/users?search=ROO",
            Some(&app.token(&admin)),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pagination"]["totalItems"], 1);
    assert_eq!(body["data"][0]["username"], "root");

    let (status, _, body) = app
        .call(
            Method::POST,
            "/api/test/email/welcome",
            Some(&app.token(&admin)),
            Some(json!({ "to": "new@example.com", "name": "Newcomer" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Email sent successfully to new@example.com");
    assert_eq!(app.outbox.sent()[0].subject, "Welcome to Marketplace");
}

#[tokio::test]
async fn login_over_http_returns_a_usable_token() {
    let app = TestApp::new().await;
    app.user("alice", Role::User).await;

    let (status, _, body) = app
        .call(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "usernameOrEmail": "alice", "password": PASSWORD })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let token = body["data"]["token"].as_str().unwrap().to_string();

    let (status, _, body) = app
        .call(Method::GET, "/api/users/me", Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["username"], "alice");

    let (status, _, body) = app
        .call(
            Method::POST,
            "/api/auth/login",
            None,
            Some(json!({ "usernameOrEmail": "alice", "password": "nope-nope" })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Invalid username/email or password");
}

#[tokio::test]
async fn reference_data_is_public() {
    let app = TestApp::new().await;
    let (province, district, _) = app
        .store
        .seed_geo("Ho Chi Minh", "District 1", "Ben Nghe");
    app.store.seed_category("Books");

    let (status, _, body) = app.call(Method::GET, "/api/categories", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["name"], "Books");

    let (status, _, body) = app
        .call(
            Method::GET,
            &format!("/api/provinces/{}/districts", province.province_id),
            None,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["districtName"], "District 1");

    let (status, _, body) = app
        .call(
            Method::GET,
            &format!("/api/districts/{}/wards", district.district_id),
            None,
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["wardName"], "Ben Nghe");

    let (status, _, _) = app
        .call(Method::GET, "/api/provinces/9999/districts", None, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn metrics_are_exposed() {
    let app = TestApp::new().await;
    app.call(Method::GET, "/api/products", None, None).await;

    let (status, _, _) = app.call(Method::GET, "/metrics", None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn far_out_pages_are_empty_rather_than_errors() {
    let app = TestApp::new().await;
    let seller = app.user("seller", Role::User).await;
    let shop = app.store.seed_shop(seller.user_id, "Seller's Shop");
    app.store.seed_product(shop.shop_id, "Keyboard", dec!(450000.00), 3);

    let (status, _, body) = app
        .call(
            Method::GET,
            "/api/products?page=9223372036854775807&size=12",
            None,
            None,
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], json!([]));
    assert_eq!(body["pagination"]["totalItems"], 1);
}

#[tokio::test]
async fn prices_beyond_cents_are_rejected() {
    let app = TestApp::new().await;
    let seller = app.user("seller", Role::User).await;
    app.store.seed_shop(seller.user_id, "Seller's Shop");
    let token = app.token(&seller);

    for (price, message) in [
        ("0.001", "Price cannot have more than 2 decimal places"),
        ("10000000000.00", "Price cannot exceed 9999999999.99"),
    ] {
        let (status, _, body) = app
            .call(
                Method::POST,
                "/api/products",
                Some(&token),
                Some(json!({ "name": "Lamp", "price": price, "stockQuantity": 1 })),
            )
            .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Validation Failed");
        assert_eq!(body["message"], message);
    }

    let (_, _, body) = app.call(Method::GET, "/api/products", None, None).await;
    assert_eq!(body["pagination"]["totalItems"], 0);
}
