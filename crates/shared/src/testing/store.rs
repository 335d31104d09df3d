use crate::{
    abstract_trait::{
        CartRepositoryTrait, CategoryRepositoryTrait, ConversationRepositoryTrait,
        DynCartRepository, DynCategoryRepository, DynConversationRepository, DynGeoRepository,
        DynMessageRepository, DynOrderCommandRepository, DynOrderQueryRepository,
        DynProductCommandRepository, DynProductQueryRepository, DynResetTokenRepository,
        DynShopRepository, DynUserCommandRepository, DynUserQueryRepository, GeoRepositoryTrait,
        MessageRepositoryTrait, OrderCommandRepositoryTrait, OrderQueryRepositoryTrait,
        ProductCommandRepositoryTrait, ProductQueryRepositoryTrait, ResetTokenRepositoryTrait,
        ShopRepositoryTrait, UserCommandRepositoryTrait, UserQueryRepositoryTrait,
    },
    domain::requests::{FindAllProducts, PageRequest, ProductSort},
    errors::RepositoryError,
    model::{
        Cart, CartItem, CartLine, Category, Conversation, ConversationSummary, District, Message,
        NewOrder, NewProduct, NewUser, Order, OrderItem, Product, ProductChanges, Province,
        ResetToken, Role,
        Shop, User, Ward,
    },
    repository::{OrderRepository, ProductRepository, Repositories, UserRepository},
};
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use std::{
    collections::BTreeMap,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};

#[derive(Default)]
struct Tables {
    next_id: i64,
    users: BTreeMap<i64, User>,
    reset_tokens: BTreeMap<i64, ResetToken>,
    shops: BTreeMap<i64, Shop>,
    categories: BTreeMap<i64, Category>,
    provinces: BTreeMap<i64, Province>,
    districts: BTreeMap<i64, District>,
    wards: BTreeMap<i64, Ward>,
    products: BTreeMap<i64, Product>,
    carts: BTreeMap<i64, Cart>,
    cart_items: BTreeMap<(i64, i64), i32>,
    orders: BTreeMap<i64, Order>,
    order_items: BTreeMap<(i64, i64), (i32, Decimal)>,
    conversations: BTreeMap<i64, Conversation>,
    messages: BTreeMap<i64, Message>,
}

impl Tables {
    fn id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    /// Strictly increasing timestamps so "newest first" orderings are stable.
    fn stamp(&self) -> DateTime<Utc> {
        Utc::now() + Duration::microseconds(self.next_id)
    }

    fn product_name(&self, product_id: i64) -> String {
        self.products
            .get(&product_id)
            .map(|p| p.name.clone())
            .unwrap_or_default()
    }
}

/// A single-process imitation of the Postgres schema: the same unique keys,
/// foreign-key refusals and all-or-nothing checkout.
#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn tables(&self) -> MutexGuard<'_, Tables> {
        self.tables.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn repositories(self: &Arc<Self>) -> Repositories {
        Repositories {
            user: UserRepository {
                query: self.clone() as DynUserQueryRepository,
                command: self.clone() as DynUserCommandRepository,
                reset_token: self.clone() as DynResetTokenRepository,
            },
            product: ProductRepository {
                query: self.clone() as DynProductQueryRepository,
                command: self.clone() as DynProductCommandRepository,
            },
            order: OrderRepository {
                query: self.clone() as DynOrderQueryRepository,
                command: self.clone() as DynOrderCommandRepository,
            },
            cart: self.clone() as DynCartRepository,
            shop: self.clone() as DynShopRepository,
            category: self.clone() as DynCategoryRepository,
            geo: self.clone() as DynGeoRepository,
            conversation: self.clone() as DynConversationRepository,
            message: self.clone() as DynMessageRepository,
        }
    }

    pub fn seed_user(&self, username: &str, password_hash: &str, role: Role) -> User {
        let mut t = self.tables();
        let user = User {
            user_id: t.id(),
            username: username.to_string(),
            full_name: format!("{username} Tester"),
            email: format!("{username}@example.com"),
            password: password_hash.to_string(),
            role,
            created_at: t.stamp(),
        };
        t.users.insert(user.user_id, user.clone());
        user
    }

    pub fn seed_shop(&self, owner_id: i64, name: &str) -> Shop {
        let mut t = self.tables();
        let shop = Shop {
            shop_id: t.id(),
            owner_id,
            name: name.to_string(),
            average_rating: None,
            created_at: t.stamp(),
        };
        t.shops.insert(shop.shop_id, shop.clone());
        shop
    }

    pub fn seed_category(&self, name: &str) -> Category {
        let mut t = self.tables();
        let category = Category {
            category_id: t.id(),
            name: name.to_string(),
            description: None,
        };
        t.categories.insert(category.category_id, category.clone());
        category
    }

    pub fn seed_product(&self, shop_id: i64, name: &str, price: Decimal, stock: i32) -> Product {
        let mut t = self.tables();
        let now = t.stamp();
        let product = Product {
            product_id: t.id(),
            shop_id,
            category_id: None,
            name: name.to_string(),
            description: None,
            price,
            stock_quantity: stock,
            created_at: now,
            updated_at: now,
        };
        t.products.insert(product.product_id, product.clone());
        product
    }

    /// Seeds one province with one district holding one ward.
    pub fn seed_geo(&self, province: &str, district: &str, ward: &str) -> (Province, District, Ward) {
        let mut t = self.tables();
        let province = Province {
            province_id: t.id(),
            province_name: province.to_string(),
        };
        let district = District {
            district_id: t.id(),
            district_name: district.to_string(),
            province_id: province.province_id,
        };
        let ward = Ward {
            ward_id: t.id(),
            ward_name: ward.to_string(),
            district_id: district.district_id,
        };
        t.provinces.insert(province.province_id, province.clone());
        t.districts.insert(district.district_id, district.clone());
        t.wards.insert(ward.ward_id, ward.clone());
        (province, district, ward)
    }

    pub fn stock_of(&self, product_id: i64) -> Option<i32> {
        self.tables()
            .products
            .get(&product_id)
            .map(|p| p.stock_quantity)
    }

    pub fn order_count(&self) -> usize {
        self.tables().orders.len()
    }

    pub fn cart_quantity(&self, user_id: i64, product_id: i64) -> Option<i32> {
        let t = self.tables();
        let cart = t.carts.values().find(|c| c.user_id == user_id)?;
        t.cart_items.get(&(cart.cart_id, product_id)).copied()
    }

    pub fn conversation_count(&self) -> usize {
        self.tables().conversations.len()
    }

    pub fn reset_token_for(&self, user_id: i64) -> Option<ResetToken> {
        self.tables().reset_tokens.get(&user_id).cloned()
    }

    /// Moves an order's placement time, for cancellation-window tests.
    pub fn backdate_order(&self, order_id: i64, by: Duration) {
        if let Some(order) = self.tables().orders.get_mut(&order_id) {
            order.order_date -= by;
        }
    }

    pub fn expire_reset_token(&self, user_id: i64) {
        if let Some(token) = self.tables().reset_tokens.get_mut(&user_id) {
            token.expired_date = Utc::now() - Duration::minutes(1);
        }
    }
}

fn page_of<T: Clone>(items: &[T], page: &PageRequest) -> Vec<T> {
    items
        .iter()
        .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
        .take(usize::try_from(page.limit()).unwrap_or(0))
        .cloned()
        .collect()
}

#[async_trait]
impl UserQueryRepositoryTrait for InMemoryStore {
    async fn find_by_id(&self, user_id: i64) -> Result<Option<User>, RepositoryError> {
        Ok(self.tables().users.get(&user_id).cloned())
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .tables()
            .users
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepositoryError> {
        Ok(self
            .tables()
            .users
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_all(
        &self,
        search: Option<&str>,
        page: &PageRequest,
    ) -> Result<(Vec<User>, i64), RepositoryError> {
        let needle = search
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let matched: Vec<User> = self
            .tables()
            .users
            .values()
            .filter(|u| match &needle {
                Some(n) => {
                    u.username.to_lowercase().contains(n)
                        || u.email.to_lowercase().contains(n)
                        || u.full_name.to_lowercase().contains(n)
                }
                None => true,
            })
            .cloned()
            .collect();

        Ok((page_of(&matched, page), matched.len() as i64))
    }
}

#[async_trait]
impl UserCommandRepositoryTrait for InMemoryStore {
    async fn create_user(&self, user: &NewUser) -> Result<User, RepositoryError> {
        let mut t = self.tables();
        if t
            .users
            .values()
            .any(|u| u.username == user.username || u.email == user.email)
        {
            return Err(RepositoryError::AlreadyExists("users".into()));
        }

        let created = User {
            user_id: t.id(),
            username: user.username.clone(),
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            password: user.password.clone(),
            role: user.role,
            created_at: t.stamp(),
        };
        t.users.insert(created.user_id, created.clone());
        Ok(created)
    }

    async fn update_password(&self, user_id: i64, password: &str) -> Result<(), RepositoryError> {
        let mut t = self.tables();
        let user = t.users.get_mut(&user_id).ok_or(RepositoryError::NotFound)?;
        user.password = password.to_string();
        Ok(())
    }
}

#[async_trait]
impl ResetTokenRepositoryTrait for InMemoryStore {
    async fn upsert_token(
        &self,
        user_id: i64,
        token: &str,
        expired_date: DateTime<Utc>,
    ) -> Result<ResetToken, RepositoryError> {
        let mut t = self.tables();
        let reset_token_id = match t.reset_tokens.get(&user_id) {
            Some(existing) => existing.reset_token_id,
            None => t.id(),
        };
        let saved = ResetToken {
            reset_token_id,
            user_id,
            token: token.to_string(),
            expired_date,
        };
        t.reset_tokens.insert(user_id, saved.clone());
        Ok(saved)
    }

    async fn find_by_token(&self, token: &str) -> Result<Option<ResetToken>, RepositoryError> {
        Ok(self
            .tables()
            .reset_tokens
            .values()
            .find(|r| r.token == token)
            .cloned())
    }

    async fn delete_by_user(&self, user_id: i64) -> Result<(), RepositoryError> {
        self.tables().reset_tokens.remove(&user_id);
        Ok(())
    }
}

#[async_trait]
impl ProductQueryRepositoryTrait for InMemoryStore {
    async fn search(&self, req: &FindAllProducts) -> Result<(Vec<Product>, i64), RepositoryError> {
        let needle = req.search_term();

        let mut matched: Vec<Product> = self
            .tables()
            .products
            .values()
            .filter(|p| match &needle {
                Some(n) => {
                    p.name.to_lowercase().contains(n)
                        || p.description
                            .as_deref()
                            .is_some_and(|d| d.to_lowercase().contains(n))
                }
                None => true,
            })
            .filter(|p| req.category_id.is_none() || p.category_id == req.category_id)
            .cloned()
            .collect();

        match req.sort_key() {
            ProductSort::PriceAsc => matched.sort_by(|a, b| a.price.cmp(&b.price)),
            ProductSort::PriceDesc => matched.sort_by(|a, b| b.price.cmp(&a.price)),
            ProductSort::NameAsc => {
                matched.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
            }
            ProductSort::NameDesc => {
                matched.sort_by(|a, b| b.name.to_lowercase().cmp(&a.name.to_lowercase()))
            }
            ProductSort::Newest => matched.sort_by(|a, b| {
                (b.created_at, b.product_id).cmp(&(a.created_at, a.product_id))
            }),
            ProductSort::Oldest => matched.sort_by(|a, b| {
                (a.created_at, a.product_id).cmp(&(b.created_at, b.product_id))
            }),
        }

        let page = req.page_request();
        Ok((page_of(&matched, &page), matched.len() as i64))
    }

    async fn find_by_id(&self, product_id: i64) -> Result<Option<Product>, RepositoryError> {
        Ok(self.tables().products.get(&product_id).cloned())
    }

    async fn find_by_shop(
        &self,
        shop_id: i64,
        page: &PageRequest,
    ) -> Result<(Vec<Product>, i64), RepositoryError> {
        let mut matched: Vec<Product> = self
            .tables()
            .products
            .values()
            .filter(|p| p.shop_id == shop_id)
            .cloned()
            .collect();
        matched.reverse();

        Ok((page_of(&matched, page), matched.len() as i64))
    }
}

#[async_trait]
impl ProductCommandRepositoryTrait for InMemoryStore {
    async fn create_product(&self, product: &NewProduct) -> Result<Product, RepositoryError> {
        let mut t = self.tables();
        if !t.shops.contains_key(&product.shop_id) {
            return Err(RepositoryError::ForeignKey("products_shop_id_fkey".into()));
        }

        let now = t.stamp();
        let created = Product {
            product_id: t.id(),
            shop_id: product.shop_id,
            category_id: product.category_id,
            name: product.name.clone(),
            description: product.description.clone(),
            price: product.price,
            stock_quantity: product.stock_quantity,
            created_at: now,
            updated_at: now,
        };
        t.products.insert(created.product_id, created.clone());
        Ok(created)
    }

    async fn update_product(
        &self,
        product_id: i64,
        changes: &ProductChanges,
    ) -> Result<Product, RepositoryError> {
        let mut t = self.tables();
        let now = t.stamp();
        let stored = t
            .products
            .get_mut(&product_id)
            .ok_or(RepositoryError::NotFound)?;

        if let Some(name) = &changes.name {
            stored.name = name.clone();
        }
        if let Some(description) = &changes.description {
            stored.description = Some(description.clone());
        }
        if let Some(price) = changes.price {
            stored.price = price;
        }
        if let Some(stock) = changes.stock_quantity {
            stored.stock_quantity = stock;
        }
        if let Some(category_id) = changes.category_id {
            stored.category_id = Some(category_id);
        }
        stored.updated_at = now;
        Ok(stored.clone())
    }

    async fn update_stock(
        &self,
        product_id: i64,
        stock_quantity: i32,
    ) -> Result<Product, RepositoryError> {
        let mut t = self.tables();
        let now = t.stamp();
        let stored = t
            .products
            .get_mut(&product_id)
            .ok_or(RepositoryError::NotFound)?;

        stored.stock_quantity = stock_quantity;
        stored.updated_at = now;
        Ok(stored.clone())
    }

    async fn delete_product(&self, product_id: i64) -> Result<(), RepositoryError> {
        let mut t = self.tables();
        if t.order_items.keys().any(|(_, p)| *p == product_id) {
            return Err(RepositoryError::ForeignKey(
                "order_items_product_id_fkey".into(),
            ));
        }
        if t.products.remove(&product_id).is_none() {
            return Err(RepositoryError::NotFound);
        }
        t.cart_items.retain(|(_, p), _| *p != product_id);
        Ok(())
    }
}

#[async_trait]
impl ShopRepositoryTrait for InMemoryStore {
    async fn find_by_id(&self, shop_id: i64) -> Result<Option<Shop>, RepositoryError> {
        Ok(self.tables().shops.get(&shop_id).cloned())
    }

    async fn find_by_owner(&self, owner_id: i64) -> Result<Option<Shop>, RepositoryError> {
        Ok(self
            .tables()
            .shops
            .values()
            .find(|s| s.owner_id == owner_id)
            .cloned())
    }

    async fn get_or_create(&self, owner_id: i64, name: &str) -> Result<Shop, RepositoryError> {
        let mut t = self.tables();
        if let Some(shop) = t.shops.values().find(|s| s.owner_id == owner_id) {
            return Ok(shop.clone());
        }

        let shop = Shop {
            shop_id: t.id(),
            owner_id,
            name: name.to_string(),
            average_rating: None,
            created_at: t.stamp(),
        };
        t.shops.insert(shop.shop_id, shop.clone());
        Ok(shop)
    }
}

#[async_trait]
impl CategoryRepositoryTrait for InMemoryStore {
    async fn find_all(&self) -> Result<Vec<Category>, RepositoryError> {
        let mut categories: Vec<Category> = self.tables().categories.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn find_by_id(&self, category_id: i64) -> Result<Option<Category>, RepositoryError> {
        Ok(self.tables().categories.get(&category_id).cloned())
    }
}

#[async_trait]
impl GeoRepositoryTrait for InMemoryStore {
    async fn find_provinces(&self) -> Result<Vec<Province>, RepositoryError> {
        let mut provinces: Vec<Province> = self.tables().provinces.values().cloned().collect();
        provinces.sort_by(|a, b| a.province_name.cmp(&b.province_name));
        Ok(provinces)
    }

    async fn find_province(&self, province_id: i64) -> Result<Option<Province>, RepositoryError> {
        Ok(self.tables().provinces.get(&province_id).cloned())
    }

    async fn find_districts(&self, province_id: i64) -> Result<Vec<District>, RepositoryError> {
        let mut districts: Vec<District> = self
            .tables()
            .districts
            .values()
            .filter(|d| d.province_id == province_id)
            .cloned()
            .collect();
        districts.sort_by(|a, b| a.district_name.cmp(&b.district_name));
        Ok(districts)
    }

    async fn find_district(&self, district_id: i64) -> Result<Option<District>, RepositoryError> {
        Ok(self.tables().districts.get(&district_id).cloned())
    }

    async fn find_wards(&self, district_id: i64) -> Result<Vec<Ward>, RepositoryError> {
        let mut wards: Vec<Ward> = self
            .tables()
            .wards
            .values()
            .filter(|w| w.district_id == district_id)
            .cloned()
            .collect();
        wards.sort_by(|a, b| a.ward_name.cmp(&b.ward_name));
        Ok(wards)
    }
}

#[async_trait]
impl CartRepositoryTrait for InMemoryStore {
    async fn find_by_user(&self, user_id: i64) -> Result<Option<Cart>, RepositoryError> {
        Ok(self
            .tables()
            .carts
            .values()
            .find(|c| c.user_id == user_id)
            .cloned())
    }

    async fn get_or_create(&self, user_id: i64) -> Result<Cart, RepositoryError> {
        let mut t = self.tables();
        if let Some(cart) = t.carts.values().find(|c| c.user_id == user_id) {
            return Ok(cart.clone());
        }

        let cart = Cart {
            cart_id: t.id(),
            user_id,
            created_at: t.stamp(),
        };
        t.carts.insert(cart.cart_id, cart.clone());
        Ok(cart)
    }

    async fn find_lines(&self, cart_id: i64) -> Result<Vec<CartLine>, RepositoryError> {
        let t = self.tables();
        Ok(t.cart_items
            .iter()
            .filter(|((c, _), _)| *c == cart_id)
            .filter_map(|((c, p), quantity)| {
                t.products.get(p).map(|product| CartLine {
                    cart_id: *c,
                    product_id: *p,
                    quantity: *quantity,
                    product_name: product.name.clone(),
                    price: product.price,
                    stock_quantity: product.stock_quantity,
                })
            })
            .collect())
    }

    async fn find_item(
        &self,
        cart_id: i64,
        product_id: i64,
    ) -> Result<Option<CartItem>, RepositoryError> {
        Ok(self
            .tables()
            .cart_items
            .get(&(cart_id, product_id))
            .map(|quantity| CartItem {
                cart_id,
                product_id,
                quantity: *quantity,
            }))
    }

    async fn upsert_item(
        &self,
        cart_id: i64,
        product_id: i64,
        quantity: i32,
    ) -> Result<CartItem, RepositoryError> {
        let mut t = self.tables();
        if !t.products.contains_key(&product_id) {
            return Err(RepositoryError::ForeignKey(
                "cart_items_product_id_fkey".into(),
            ));
        }
        t.cart_items.insert((cart_id, product_id), quantity);
        Ok(CartItem {
            cart_id,
            product_id,
            quantity,
        })
    }

    async fn delete_item(&self, cart_id: i64, product_id: i64) -> Result<bool, RepositoryError> {
        Ok(self
            .tables()
            .cart_items
            .remove(&(cart_id, product_id))
            .is_some())
    }

    async fn clear(&self, cart_id: i64) -> Result<u64, RepositoryError> {
        let mut t = self.tables();
        let before = t.cart_items.len();
        t.cart_items.retain(|(c, _), _| *c != cart_id);
        Ok((before - t.cart_items.len()) as u64)
    }

    async fn count_items(&self, cart_id: i64) -> Result<i64, RepositoryError> {
        Ok(self
            .tables()
            .cart_items
            .iter()
            .filter(|((c, _), _)| *c == cart_id)
            .map(|(_, q)| i64::from(*q))
            .sum())
    }
}

#[async_trait]
impl OrderQueryRepositoryTrait for InMemoryStore {
    async fn find_by_id(&self, order_id: i64) -> Result<Option<Order>, RepositoryError> {
        Ok(self.tables().orders.get(&order_id).cloned())
    }

    async fn find_by_user(&self, user_id: i64) -> Result<Vec<Order>, RepositoryError> {
        let mut orders: Vec<Order> = self
            .tables()
            .orders
            .values()
            .filter(|o| o.user_id == user_id)
            .cloned()
            .collect();
        orders.sort_by(|a, b| (b.order_date, b.order_id).cmp(&(a.order_date, a.order_id)));
        Ok(orders)
    }

    async fn find_items(&self, order_id: i64) -> Result<Vec<OrderItem>, RepositoryError> {
        let t = self.tables();
        Ok(t.order_items
            .iter()
            .filter(|((o, _), _)| *o == order_id)
            .map(|((o, p), (quantity, price))| OrderItem {
                order_id: *o,
                product_id: *p,
                product_name: t.product_name(*p),
                quantity: *quantity,
                price_snapshot: *price,
            })
            .collect())
    }
}

#[async_trait]
impl OrderCommandRepositoryTrait for InMemoryStore {
    async fn place_order(&self, order: &NewOrder) -> Result<Order, RepositoryError> {
        let mut t = self.tables();

        // Every conditional decrement must succeed before anything is written.
        for line in &order.lines {
            let available = t
                .products
                .get(&line.product_id)
                .map(|p| p.stock_quantity)
                .unwrap_or(0);
            if available < line.quantity {
                return Err(RepositoryError::InsufficientStock {
                    product_id: line.product_id,
                });
            }
        }

        let created = Order {
            order_id: t.id(),
            user_id: order.user_id,
            order_date: t.stamp(),
            order_cost: order.total,
        };

        for line in &order.lines {
            if let Some(product) = t.products.get_mut(&line.product_id) {
                product.stock_quantity -= line.quantity;
            }
            t.order_items.insert(
                (created.order_id, line.product_id),
                (line.quantity, line.unit_price),
            );
        }

        for line in &order.lines {
            let key = (order.cart_id, line.product_id);
            match t.cart_items.get(&key).copied() {
                Some(qty) if qty > line.quantity => {
                    t.cart_items.insert(key, qty - line.quantity);
                }
                Some(_) => {
                    t.cart_items.remove(&key);
                }
                None => {}
            }
        }
        t.orders.insert(created.order_id, created.clone());
        Ok(created)
    }

    async fn cancel_order(
        &self,
        order_id: i64,
        placed_after: DateTime<Utc>,
    ) -> Result<Vec<OrderItem>, RepositoryError> {
        let mut t = self.tables();
        let placed = t
            .orders
            .get(&order_id)
            .map(|o| o.order_date)
            .ok_or(RepositoryError::NotFound)?;
        if placed < placed_after {
            return Err(RepositoryError::Conflict(format!(
                "Order {order_id} is past its cancellation window"
            )));
        }
        t.orders.remove(&order_id);

        let lines: Vec<(i64, i32, Decimal)> = t
            .order_items
            .iter()
            .filter(|((o, _), _)| *o == order_id)
            .map(|((_, p), (q, price))| (*p, *q, *price))
            .collect();

        let mut restored = Vec::with_capacity(lines.len());
        for (product_id, quantity, price_snapshot) in lines {
            t.order_items.remove(&(order_id, product_id));
            let product_name = t.product_name(product_id);
            if let Some(product) = t.products.get_mut(&product_id) {
                product.stock_quantity += quantity;
            }
            restored.push(OrderItem {
                order_id,
                product_id,
                product_name,
                quantity,
                price_snapshot,
            });
        }

        Ok(restored)
    }
}

#[async_trait]
impl ConversationRepositoryTrait for InMemoryStore {
    async fn find_by_id(
        &self,
        conversation_id: i64,
    ) -> Result<Option<Conversation>, RepositoryError> {
        Ok(self.tables().conversations.get(&conversation_id).cloned())
    }

    async fn find_by_participants(
        &self,
        user1_id: i64,
        user2_id: i64,
    ) -> Result<Option<Conversation>, RepositoryError> {
        Ok(self
            .tables()
            .conversations
            .values()
            .find(|c| c.user1_id == user1_id && c.user2_id == user2_id)
            .cloned())
    }

    async fn create_conversation(
        &self,
        user1_id: i64,
        user2_id: i64,
    ) -> Result<Conversation, RepositoryError> {
        let mut t = self.tables();
        if t
            .conversations
            .values()
            .any(|c| c.involves(user1_id) && c.involves(user2_id))
        {
            return Err(RepositoryError::AlreadyExists(
                "uq_conversations_pair".into(),
            ));
        }

        let created = Conversation {
            conversation_id: t.id(),
            user1_id,
            user2_id,
            created_at: t.stamp(),
        };
        t.conversations
            .insert(created.conversation_id, created.clone());
        Ok(created)
    }

    async fn find_summaries_by_user(
        &self,
        user_id: i64,
    ) -> Result<Vec<ConversationSummary>, RepositoryError> {
        let t = self.tables();
        let mut summaries: Vec<ConversationSummary> = t
            .conversations
            .values()
            .filter(|c| c.involves(user_id))
            .filter_map(|c| {
                let other = c.other_participant(user_id);
                t.users.get(&other).map(|u| ConversationSummary {
                    conversation_id: c.conversation_id,
                    other_user_id: other,
                    other_username: u.username.clone(),
                    created_at: c.created_at,
                })
            })
            .collect();
        summaries.sort_by(|a, b| {
            (b.created_at, b.conversation_id).cmp(&(a.created_at, a.conversation_id))
        });
        Ok(summaries)
    }
}

#[async_trait]
impl MessageRepositoryTrait for InMemoryStore {
    async fn create_message(
        &self,
        conversation_id: i64,
        sender_id: i64,
        content: &str,
    ) -> Result<Message, RepositoryError> {
        let mut t = self.tables();
        if !t.conversations.contains_key(&conversation_id) {
            return Err(RepositoryError::ForeignKey(
                "messages_conversation_id_fkey".into(),
            ));
        }

        let message = Message {
            message_id: t.id(),
            conversation_id,
            sender_id,
            content: content.to_string(),
            created_at: t.stamp(),
        };
        t.messages.insert(message.message_id, message.clone());
        Ok(message)
    }

    async fn find_by_conversation(
        &self,
        conversation_id: i64,
    ) -> Result<Vec<Message>, RepositoryError> {
        Ok(self
            .tables()
            .messages
            .values()
            .filter(|m| m.conversation_id == conversation_id)
            .cloned()
            .collect())
    }
}
