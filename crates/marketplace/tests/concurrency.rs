mod common;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use common::TestApp;
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use shared::{
    abstract_trait::{
        CartRepositoryTrait, CartServiceTrait, DynCartRepository, DynOrderQueryRepository,
        DynProductQueryRepository, OrderCommandRepositoryTrait, OrderCommandServiceTrait,
        OrderQueryRepositoryTrait, ProductCommandRepositoryTrait, ProductCommandServiceTrait,
        ProductQueryRepositoryTrait,
    },
    domain::requests::{AddCartItemRequest, FindAllProducts, PageRequest, UpdateProductRequest},
    errors::{RepositoryError, ServiceError},
    model::{Cart, CartItem, CartLine, Order, OrderItem, Product, Role},
    testing::InMemoryStore,
};
use std::sync::{Arc, Mutex};

/// A write made by some other request.
enum Step {
    SetStock { product_id: i64, stock: i32 },
    SetCartLine { user_id: i64, product_id: i64, quantity: i32 },
    BackdateOrder { order_id: i64, minutes: i64 },
}

/// Delegates to the store and, right after the next read through it, applies
/// the queued writes. That reproduces another request committing between a
/// service's read and its write.
struct Interleaved {
    store: Arc<InMemoryStore>,
    pending: Mutex<Vec<Step>>,
}

impl Interleaved {
    fn queue(&self, step: Step) {
        self.pending.lock().unwrap().push(step);
    }

    async fn run_pending(&self) {
        let steps = std::mem::take(&mut *self.pending.lock().unwrap());
        for step in steps {
            match step {
                Step::SetStock { product_id, stock } => {
                    ProductCommandRepositoryTrait::update_stock(&*self.store, product_id, stock)
                        .await
                        .unwrap();
                }
                Step::SetCartLine {
                    user_id,
                    product_id,
                    quantity,
                } => {
                    let cart = CartRepositoryTrait::get_or_create(&*self.store, user_id)
                        .await
                        .unwrap();
                    CartRepositoryTrait::upsert_item(
                        &*self.store,
                        cart.cart_id,
                        product_id,
                        quantity,
                    )
                    .await
                    .unwrap();
                }
                Step::BackdateOrder { order_id, minutes } => {
                    self.store
                        .backdate_order(order_id, Duration::minutes(minutes));
                }
            }
        }
    }
}

#[async_trait]
impl CartRepositoryTrait for Interleaved {
    async fn find_by_user(&self, user_id: i64) -> Result<Option<Cart>, RepositoryError> {
        CartRepositoryTrait::find_by_user(&*self.store, user_id).await
    }

    async fn get_or_create(&self, user_id: i64) -> Result<Cart, RepositoryError> {
        CartRepositoryTrait::get_or_create(&*self.store, user_id).await
    }

    async fn find_lines(&self, cart_id: i64) -> Result<Vec<CartLine>, RepositoryError> {
        let lines = CartRepositoryTrait::find_lines(&*self.store, cart_id).await;
        self.run_pending().await;
        lines
    }

    async fn find_item(
        &self,
        cart_id: i64,
        product_id: i64,
    ) -> Result<Option<CartItem>, RepositoryError> {
        CartRepositoryTrait::find_item(&*self.store, cart_id, product_id).await
    }

    async fn upsert_item(
        &self,
        cart_id: i64,
        product_id: i64,
        quantity: i32,
    ) -> Result<CartItem, RepositoryError> {
        CartRepositoryTrait::upsert_item(&*self.store, cart_id, product_id, quantity).await
    }

    async fn delete_item(&self, cart_id: i64, product_id: i64) -> Result<bool, RepositoryError> {
        CartRepositoryTrait::delete_item(&*self.store, cart_id, product_id).await
    }

    async fn clear(&self, cart_id: i64) -> Result<u64, RepositoryError> {
        CartRepositoryTrait::clear(&*self.store, cart_id).await
    }

    async fn count_items(&self, cart_id: i64) -> Result<i64, RepositoryError> {
        CartRepositoryTrait::count_items(&*self.store, cart_id).await
    }
}

#[async_trait]
impl ProductQueryRepositoryTrait for Interleaved {
    async fn search(&self, req: &FindAllProducts) -> Result<(Vec<Product>, i64), RepositoryError> {
        ProductQueryRepositoryTrait::search(&*self.store, req).await
    }

    async fn find_by_id(&self, product_id: i64) -> Result<Option<Product>, RepositoryError> {
        let product = ProductQueryRepositoryTrait::find_by_id(&*self.store, product_id).await;
        self.run_pending().await;
        product
    }

    async fn find_by_shop(
        &self,
        shop_id: i64,
        page: &PageRequest,
    ) -> Result<(Vec<Product>, i64), RepositoryError> {
        ProductQueryRepositoryTrait::find_by_shop(&*self.store, shop_id, page).await
    }
}

#[async_trait]
impl OrderQueryRepositoryTrait for Interleaved {
    async fn find_by_id(&self, order_id: i64) -> Result<Option<Order>, RepositoryError> {
        let order = OrderQueryRepositoryTrait::find_by_id(&*self.store, order_id).await;
        self.run_pending().await;
        order
    }

    async fn find_by_user(&self, user_id: i64) -> Result<Vec<Order>, RepositoryError> {
        OrderQueryRepositoryTrait::find_by_user(&*self.store, user_id).await
    }

    async fn find_items(&self, order_id: i64) -> Result<Vec<OrderItem>, RepositoryError> {
        OrderQueryRepositoryTrait::find_items(&*self.store, order_id).await
    }
}

async fn interleaved_app() -> (TestApp, Arc<Interleaved>) {
    let mut handle = None;
    let app = TestApp::with_repositories(|store, repos| {
        let interleaved = Arc::new(Interleaved {
            store: store.clone(),
            pending: Mutex::new(Vec::new()),
        });
        repos.cart = interleaved.clone() as DynCartRepository;
        repos.product.query = interleaved.clone() as DynProductQueryRepository;
        repos.order.query = interleaved.clone() as DynOrderQueryRepository;
        handle = Some(interleaved);
    })
    .await;

    (app, handle.unwrap())
}

fn add(product_id: i64, quantity: i32) -> AddCartItemRequest {
    AddCartItemRequest {
        product_id,
        quantity,
    }
}

#[tokio::test]
async fn stock_lost_after_pricing_rolls_the_whole_checkout_back() {
    let (app, interleaved) = interleaved_app().await;
    let seller = app.user("seller", Role::User).await;
    let buyer = app.user("buyer", Role::User).await;
    let shop = app.store.seed_shop(seller.user_id, "Seller's Shop");
    let p = app.store.seed_product(shop.shop_id, "P", dec!(10.00), 5);
    let r = app.store.seed_product(shop.shop_id, "R", dec!(3.00), 2);

    let requester = TestApp::requester(&buyer);
    let cart = &app.state.di_container.cart_service;
    cart.add_item(&requester, &add(p.product_id, 1)).await.unwrap();
    cart.add_item(&requester, &add(r.product_id, 2)).await.unwrap();

    // The cart lines still report two units of R when the order is priced.
    interleaved.queue(Step::SetStock {
        product_id: r.product_id,
        stock: 1,
    });

    let err = app
        .state
        .di_container
        .order_service
        .command
        .checkout(&requester)
        .await
        .unwrap_err();

    match err {
        ServiceError::InsufficientStock(msg) => {
            assert_eq!(msg, "Insufficient stock for product 'R'")
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert_eq!(app.store.order_count(), 0);
    assert_eq!(app.store.stock_of(p.product_id), Some(5));
    assert_eq!(app.store.stock_of(r.product_id), Some(1));
    assert_eq!(app.store.cart_quantity(buyer.user_id, p.product_id), Some(1));
    assert_eq!(app.store.cart_quantity(buyer.user_id, r.product_id), Some(2));
}

#[tokio::test]
async fn checkout_keeps_cart_lines_changed_after_pricing() {
    let (app, interleaved) = interleaved_app().await;
    let seller = app.user("seller", Role::User).await;
    let buyer = app.user("buyer", Role::User).await;
    let shop = app.store.seed_shop(seller.user_id, "Seller's Shop");
    let p = app.store.seed_product(shop.shop_id, "P", dec!(10.00), 10);
    let q = app.store.seed_product(shop.shop_id, "Q", dec!(5.00), 10);
    let z = app.store.seed_product(shop.shop_id, "Z", dec!(1.00), 10);

    let requester = TestApp::requester(&buyer);
    let cart = &app.state.di_container.cart_service;
    cart.add_item(&requester, &add(p.product_id, 2)).await.unwrap();
    cart.add_item(&requester, &add(q.product_id, 1)).await.unwrap();

    // Another tab raises P to 5 and adds Z while checkout is in flight.
    interleaved.queue(Step::SetCartLine {
        user_id: buyer.user_id,
        product_id: p.product_id,
        quantity: 5,
    });
    interleaved.queue(Step::SetCartLine {
        user_id: buyer.user_id,
        product_id: z.product_id,
        quantity: 4,
    });

    let placed = app
        .state
        .di_container
        .order_service
        .command
        .checkout(&requester)
        .await
        .unwrap();

    assert_eq!(placed.data.total, dec!(25.00));
    assert_eq!(app.store.stock_of(p.product_id), Some(8));
    assert_eq!(app.store.stock_of(q.product_id), Some(9));
    assert_eq!(app.store.stock_of(z.product_id), Some(10));

    assert_eq!(app.store.cart_quantity(buyer.user_id, p.product_id), Some(3));
    assert_eq!(app.store.cart_quantity(buyer.user_id, q.product_id), None);
    assert_eq!(app.store.cart_quantity(buyer.user_id, z.product_id), Some(4));
}

#[tokio::test]
async fn editing_a_product_keeps_stock_sold_in_the_meantime() {
    let (app, interleaved) = interleaved_app().await;
    let seller = app.user("seller", Role::User).await;
    let shop = app.store.seed_shop(seller.user_id, "Seller's Shop");
    let p = app.store.seed_product(shop.shop_id, "Lamp", dec!(120.00), 5);

    // A checkout takes three units after the product was loaded for editing.
    interleaved.queue(Step::SetStock {
        product_id: p.product_id,
        stock: 2,
    });

    let updated = app
        .state
        .di_container
        .product_service
        .command
        .update(
            &TestApp::requester(&seller),
            p.product_id,
            &UpdateProductRequest {
                name: Some("Desk Lamp".into()),
                price: Some(dec!(99.00)),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.data.name, "Desk Lamp");
    assert_eq!(updated.data.price, dec!(99.00));
    assert_eq!(updated.data.stock_quantity, 2);
    assert_eq!(app.store.stock_of(p.product_id), Some(2));
}

#[tokio::test]
async fn cancellation_window_is_checked_again_under_the_lock() {
    let (app, interleaved) = interleaved_app().await;
    let seller = app.user("seller", Role::User).await;
    let buyer = app.user("buyer", Role::User).await;
    let shop = app.store.seed_shop(seller.user_id, "Seller's Shop");
    let p = app.store.seed_product(shop.shop_id, "P", dec!(10.00), 5);

    let requester = TestApp::requester(&buyer);
    app.state
        .di_container
        .cart_service
        .add_item(&requester, &add(p.product_id, 2))
        .await
        .unwrap();

    let orders = &app.state.di_container.order_service;
    let placed = orders.command.checkout(&requester).await.unwrap();

    // The window closes between the service's read and the cancellation.
    interleaved.queue(Step::BackdateOrder {
        order_id: placed.data.order_id,
        minutes: 61,
    });

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
    assert_eq!(app.store.order_count(), 1);
    assert_eq!(app.store.stock_of(p.product_id), Some(3));
}

#[tokio::test]
async fn store_refuses_to_cancel_orders_older_than_the_cutoff() {
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
    let placed = app
        .state
        .di_container
        .order_service
        .command
        .checkout(&requester)
        .await
        .unwrap();

    let cutoff = Utc::now() + Duration::minutes(1);
    assert!(matches!(
        OrderCommandRepositoryTrait::cancel_order(&*app.store, placed.data.order_id, cutoff).await,
        Err(RepositoryError::Conflict(_))
    ));
    assert_eq!(app.store.order_count(), 1);
    assert_eq!(app.store.stock_of(p.product_id), Some(4));
}
