use crate::{
    abstract_trait::{
        DynAuthService, DynCartService, DynConversationService, DynEmailService,
        DynEmailToolService, DynHashing, DynJwtService, DynReferenceService, DynUserService,
    },
    repository::Repositories,
    service::{
        AuthService, AuthServiceDeps, CartService, ConversationService, EmailToolService,
        Notifier, OrderService, OrderServiceDeps, ProductService, ProductServiceDeps,
        ReferenceService, UserService,
    },
};
use chrono::Duration;
use prometheus_client::registry::Registry;
use std::{fmt, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct DependenciesInject {
    pub auth_service: DynAuthService,
    pub user_service: DynUserService,
    pub product_service: ProductService,
    pub cart_service: DynCartService,
    pub order_service: OrderService,
    pub conversation_service: DynConversationService,
    pub reference_service: DynReferenceService,
    pub email_tool_service: DynEmailToolService,
}

impl fmt::Debug for DependenciesInject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DependenciesInject")
            .field("auth_service", &"<AuthService>")
            .field("user_service", &"<UserService>")
            .field("product_service", &"<ProductService>")
            .field("cart_service", &"<CartService>")
            .field("order_service", &"<OrderService>")
            .field("conversation_service", &"<ConversationService>")
            .field("reference_service", &"<ReferenceService>")
            .field("email_tool_service", &"<EmailToolService>")
            .finish()
    }
}

#[derive(Clone)]
pub struct DependenciesInjectDeps {
    pub repositories: Repositories,
    pub hash: DynHashing,
    pub jwt: DynJwtService,
    pub email: DynEmailService,
    pub frontend_url: String,
    pub allowed_email_domain: Option<String>,
    pub cancel_window: Duration,
    pub registry: Arc<Mutex<Registry>>,
}

impl DependenciesInject {
    pub async fn new(deps: DependenciesInjectDeps) -> Self {
        let DependenciesInjectDeps {
            repositories,
            hash,
            jwt,
            email,
            frontend_url,
            allowed_email_domain,
            cancel_window,
            registry,
        } = deps;

        let Repositories {
            user,
            product,
            order,
            cart,
            shop,
            category,
            geo,
            conversation,
            message,
        } = repositories;

        let notifier = Notifier::new(email, frontend_url);

        let auth_service = Arc::new(
            AuthService::new(AuthServiceDeps {
                query: user.query.clone(),
                command: user.command.clone(),
                reset_token: user.reset_token.clone(),
                hash: hash.clone(),
                jwt,
                notifier: notifier.clone(),
                allowed_email_domain,
                registry: registry.clone(),
            })
            .await,
        ) as DynAuthService;

        let user_service = Arc::new(
            UserService::new(user.query.clone(), user.command.clone(), hash, &registry).await,
        ) as DynUserService;

        let product_service = ProductService::new(ProductServiceDeps {
            query: product.query.clone(),
            command: product.command.clone(),
            shop: shop.clone(),
            category: category.clone(),
            user_query: user.query.clone(),
            registry: registry.clone(),
        })
        .await;

        let cart_service = Arc::new(
            CartService::new(cart.clone(), product.query.clone(), &registry).await,
        ) as DynCartService;

        let order_service = OrderService::new(OrderServiceDeps {
            query: order.query,
            command: order.command,
            cart,
            notifier: notifier.clone(),
            cancel_window,
            registry: registry.clone(),
        })
        .await;

        let conversation_service = Arc::new(
            ConversationService::new(conversation, message, user.query, &registry).await,
        ) as DynConversationService;

        let reference_service = Arc::new(ReferenceService::new(shop, category, geo, &registry).await)
            as DynReferenceService;

        let email_tool_service =
            Arc::new(EmailToolService::new(notifier, &registry).await) as DynEmailToolService;

        Self {
            auth_service,
            user_service,
            product_service,
            cart_service,
            order_service,
            conversation_service,
            reference_service,
            email_tool_service,
        }
    }
}
