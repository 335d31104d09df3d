mod common;

use chrono::Duration;
use common::TestApp;
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use shared::{
    abstract_trait::{CartServiceTrait, OrderCommandServiceTrait, OrderQueryServiceTrait},
    domain::requests::{AddCartItemRequest, UpdateCartItemRequest},
    errors::ServiceError,
    model::Role,
};

fn add(product_id: i64, quantity: i32) -> AddCartItemRequest {
    AddCartItemRequest {
        product_id,
        quantity,
    }
}

#[tokio::test]
async fn checkout_totals_decrements_stock_and_empties_cart() {
    let app = TestApp::new().await;
    let seller = app.user("seller", Role::User).await;
    let buyer = app.user("buyer", Role::User).await;
    let shop = app.store.seed_shop(seller.user_id, "Seller's Shop");
    let p = app.store.seed_product(shop.shop_id, "P", dec!(10.00), 5);
    let q = app.store.seed_product(shop.shop_id, "Q", dec!(5.00), 2);

    let requester = TestApp::requester(&buyer);
    let cart = &app.state.di_container.cart_service;
    cart.add_item(&requester, &add(p.product_id, 3)).await.unwrap();
    cart.add_item(&requester, &add(q.product_id, 2)).await.unwrap();

    let orders = &app.state.di_container.order_service;
    let response = orders.command.checkout(&requester).await.unwrap();

    assert_eq!(response.data.status, "SUCCESS");
    assert_eq!(response.data.total, dec!(40.00));
    assert_eq!(app.store.stock_of(p.product_id), Some(2));
    assert_eq!(app.store.stock_of(q.product_id), Some(0));

    let count = cart.count_items(&requester).await.unwrap();
    assert_eq!(count.data.count, 0);

    let history = orders.query.find_my_orders(&requester).await.unwrap();
    assert_eq!(history.data.len(), 1);
    assert_eq!(history.data[0].order_cost, dec!(40.00));
    assert_eq!(history.data[0].items.len(), 2);

    let sent = app.wait_for_emails(1).await;
    assert_eq!(sent.len(), 1);
    assert_eq!(
        sent[0].subject,
        format!("Order Confirmation #{}", response.data.order_id)
    );
    assert_eq!(sent[0].to, buyer.email);
}

#[tokio::test]
async fn checkout_above_stock_places_nothing() {
    let app = TestApp::new().await;
    let seller = app.user("seller", Role::User).await;
    let buyer = app.user("buyer", Role::User).await;
    let shop = app.store.seed_shop(seller.user_id, "Seller's Shop");
    let p = app.store.seed_product(shop.shop_id, "P", dec!(10.00), 5);
    let r = app.store.seed_product(shop.shop_id, "R", dec!(3.00), 2);

    let requester = TestApp::requester(&buyer);
    let cart = &app.state.di_container.cart_service;
    cart.add_item(&requester, &add(p.product_id, 1)).await.unwrap();
    cart.add_item(&requester, &add(r.product_id, 2)).await.unwrap();

    // Another buyer took one unit of R after it was added.
    set_stock(&app, r.product_id, 1).await;

    let err = app
        .state
        .di_container
        .order_service
        .command
        .checkout(&requester)
        .await
        .unwrap_err();

    match err {
        ServiceError::InsufficientStock(msg) => assert_eq!(
            msg,
            "Insufficient stock for product 'R'. Available: 1, Requested: 2"
        ),
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(app.store.order_count(), 0);
    assert_eq!(app.store.stock_of(p.product_id), Some(5));
    assert_eq!(app.store.cart_quantity(buyer.user_id, r.product_id), Some(2));
}

async fn set_stock(app: &TestApp, product_id: i64, stock: i32) {
    use shared::abstract_trait::ProductCommandRepositoryTrait;

    app.store.update_stock(product_id, stock).await.unwrap();
}

#[tokio::test]
async fn empty_cart_cannot_be_checked_out() {
    let app = TestApp::new().await;
    let buyer = app.user("buyer", Role::User).await;
    let requester = TestApp::requester(&buyer);

    let orders = &app.state.di_container.order_service;
    assert!(matches!(
        orders.command.checkout(&requester).await,
        Err(ServiceError::NotFound(_))
    ));

    app.state
        .di_container
        .cart_service
        .get_cart(&requester)
        .await
        .unwrap();

    assert!(matches!(
        orders.command.checkout(&requester).await,
        Err(ServiceError::EmptyCart)
    ));
    assert_eq!(app.store.order_count(), 0);
}

#[tokio::test]
async fn quantity_above_limit_is_rejected_regardless_of_stock() {
    let app = TestApp::new().await;
    let seller = app.user("seller", Role::User).await;
    let buyer = app.user("buyer", Role::User).await;
    let shop = app.store.seed_shop(seller.user_id, "Seller's Shop");
    let p = app.store.seed_product(shop.shop_id, "P", dec!(1.00), 5_000);

    let requester = TestApp::requester(&buyer);
    let cart = &app.state.di_container.cart_service;

    assert!(matches!(
        cart.add_item(&requester, &add(p.product_id, 1000)).await,
        Err(ServiceError::Validation(_))
    ));

    cart.add_item(&requester, &add(p.product_id, 600)).await.unwrap();
    match cart.add_item(&requester, &add(p.product_id, 400)).await {
        Err(ServiceError::Validation(errors)) => {
            assert_eq!(errors, vec!["Total quantity cannot exceed 999".to_string()])
        }
        other => panic!("unexpected: {other:?}"),
    }

    assert!(matches!(
        cart.update_item(&requester, p.product_id, &UpdateCartItemRequest { quantity: 1000 })
            .await,
        Err(ServiceError::Validation(_))
    ));
    assert_eq!(app.store.cart_quantity(buyer.user_id, p.product_id), Some(600));
}

#[tokio::test]
async fn adding_beyond_stock_reports_availability() {
    let app = TestApp::new().await;
    let seller = app.user("seller", Role::User).await;
    let buyer = app.user("buyer", Role::User).await;
    let shop = app.store.seed_shop(seller.user_id, "Seller's Shop");
    let p = app.store.seed_product(shop.shop_id, "P", dec!(1.00), 3);

    let requester = TestApp::requester(&buyer);
    let cart = &app.state.di_container.cart_service;
    cart.add_item(&requester, &add(p.product_id, 2)).await.unwrap();

    match cart.add_item(&requester, &add(p.product_id, 2)).await {
        Err(ServiceError::InsufficientStock(msg)) => {
            assert_eq!(msg, "Insufficient stock. Available: 3, Requested: 4")
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[tokio::test]
async fn cancelling_in_time_restores_stock() {
    let app = TestApp::new().await;
    let seller = app.user("seller", Role::User).await;
    let buyer = app.user("buyer", Role::User).await;
    let shop = app.store.seed_shop(seller.user_id, "Seller's Shop");
    let p = app.store.seed_product(shop.shop_id, "P", dec!(10.00), 5);

    let requester = TestApp::requester(&buyer);
    app.state
        .di_container
        .cart_service
        .add_item(&requester, &add(p.product_id, 3))
        .await
        .unwrap();

    let orders = &app.state.di_container.order_service;
    let placed = orders.command.checkout(&requester).await.unwrap();
    assert_eq!(app.store.stock_of(p.product_id), Some(2));

    let outsider = app.user("mallory", Role::User).await;
    assert!(matches!(
        orders
            .command
            .cancel_order(&TestApp::requester(&outsider), placed.data.order_id)
            .await,
        Err(ServiceError::Forbidden(_))
    ));

    orders
        .command
        .cancel_order(&requester, placed.data.order_id)
        .await
        .unwrap();

    assert_eq!(app.store.stock_of(p.product_id), Some(5));
    assert_eq!(app.store.order_count(), 0);
    assert!(matches!(
        orders.query.find_by_id(&requester, placed.data.order_id).await,
        Err(ServiceError::NotFound(_))
    ));
}

#[tokio::test]
async fn cancelling_after_the_window_changes_nothing() {
    let app = TestApp::new().await;
    let seller = app.user("seller", Role::User).await;
    let buyer = app.user("buyer", Role::User).await;
    let shop = app.store.seed_shop(seller.user_id, "Seller's Shop");
    let p = app.store.seed_product(shop.shop_id, "P", dec!(10.00), 5);

    let requester = TestApp::requester(&buyer);
    app.state
        .di_container
        .cart_service
        .add_item(&requester, &add(p.product_id, 1))
        .await
        .unwrap();

    let orders = &app.state.di_container.order_service;
    let placed = orders.command.checkout(&requester).await.unwrap();
    app.store
        .backdate_order(placed.data.order_id, Duration::minutes(61));

    match orders
        .command
        .cancel_order(&requester, placed.data.order_id)
        .await
    {
        Err(ServiceError::Conflict(msg)) => assert_eq!(
            msg,
            "Order can only be cancelled within 1 hour of placement"
        ),
        other => panic!("unexpected: {other:?}"),
    }

    assert_eq!(app.store.stock_of(p.product_id), Some(4));
    assert_eq!(app.store.order_count(), 1);
}
