mod admin;
mod auth;
mod cart;
mod conversation;
mod order;
mod product;
mod reference;
mod user;

use anyhow::{Context, Result};
use axum::{
    Router,
    extract::{DefaultBodyLimit, State},
    http::{
        HeaderName, HeaderValue, Method, StatusCode,
        header::{ACCEPT, AUTHORIZATION, CACHE_CONTROL, CONTENT_TYPE},
    },
    response::IntoResponse,
    routing::get,
};
use prometheus_client::encoding::text::encode;
use shared::{errors::TOKEN_EXPIRED_HEADER, state::AppState, utils::shutdown_signal};
use std::{sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    limit::RequestBodyLimitLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

pub use self::admin::admin_routes;
pub use self::auth::auth_routes;
pub use self::cart::cart_routes;
pub use self::conversation::conversation_routes;
pub use self::order::order_routes;
pub use self::product::product_routes;
pub use self::reference::reference_routes;
pub use self::user::user_routes;

const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::register_user_handler,
        auth::login_user_handler,
        auth::forgot_password_handler,
        auth::reset_password_handler,

        user::get_me_handler,
        user::change_password_handler,

        product::get_products,
        product::get_product,
        product::create_product,
        product::update_product,
        product::update_product_stock,
        product::delete_product,

        cart::get_cart,
        cart::count_cart_items,
        cart::add_cart_item,
        cart::update_cart_item,
        cart::remove_cart_item,
        cart::clear_cart,

        order::checkout,
        order::get_my_orders,
        order::get_order,
        order::cancel_order,

        conversation::get_my_conversations,
        conversation::get_messages,
        conversation::send_message,

        reference::get_categories,
        reference::get_category,
        reference::get_shop,
        reference::get_shop_products,
        reference::get_provinces,
        reference::get_districts,
        reference::get_wards,

        admin::get_users,
        admin::send_simple_email,
        admin::send_welcome_email,
        admin::send_reset_password_email,
        admin::send_order_confirmation_email,
        admin::test_email_connection,
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Registration, login and password recovery"),
        (name = "User", description = "The signed-in user's account"),
        (name = "Product", description = "Catalog browsing and seller product management"),
        (name = "Cart", description = "Shopping cart"),
        (name = "Order", description = "Checkout, order history and cancellation"),
        (name = "Conversation", description = "Buyer and seller messaging"),
        (name = "Reference", description = "Categories, shops and administrative areas"),
        (name = "Admin", description = "Administrator tools"),
    )
)]
struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);

        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

pub async fn metrics_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let mut buffer = String::new();

    let registry = state.registry.lock().await;

    if let Err(e) = encode(&mut buffer, &registry) {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to encode metrics: {e}"),
        )
            .into_response();
    }

    (
        StatusCode::OK,
        [(
            CONTENT_TYPE,
            "application/openmetrics-text; version=1.0.0; charset=utf-8",
        )],
        buffer,
    )
        .into_response()
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("⚠️ Ignoring invalid CORS origin: {origin}");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(allowed))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            AUTHORIZATION,
            CONTENT_TYPE,
            ACCEPT,
            HeaderName::from_static("x-requested-with"),
            CACHE_CONTROL,
        ])
        .expose_headers([
            AUTHORIZATION,
            TOKEN_EXPIRED_HEADER,
            HeaderName::from_static("x-total-count"),
        ])
        .max_age(Duration::from_secs(3600))
}

pub struct AppRouter;

impl AppRouter {
    /// The complete application, ready to be served or driven by tests.
    pub fn build(app_state: AppState) -> Router {
        let shared_state = Arc::new(app_state);

        let api_router = OpenApiRouter::with_openapi(ApiDoc::openapi())
            .route("/metrics", get(metrics_handler))
            .with_state(shared_state.clone())
            .merge(auth_routes(shared_state.clone()))
            .merge(user_routes(shared_state.clone()))
            .merge(product_routes(shared_state.clone()))
            .merge(cart_routes(shared_state.clone()))
            .merge(order_routes(shared_state.clone()))
            .merge(conversation_routes(shared_state.clone()))
            .merge(reference_routes(shared_state.clone()))
            .merge(admin_routes(shared_state.clone()));

        let (app_router, api) = api_router.split_for_parts();

        app_router
            .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api))
            .layer(DefaultBodyLimit::disable())
            .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES))
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer(&shared_state.cors_allowed_origins))
    }

    pub async fn serve(port: u16, app_state: AppState) -> Result<()> {
        let app = Self::build(app_state);

        let addr = format!("0.0.0.0:{port}");
        let listener = TcpListener::bind(&addr)
            .await
            .with_context(|| format!("Failed to bind {addr}"))?;

        let local_addr = listener.local_addr()?;
        info!("🚀 Server running on http://{local_addr}");
        info!("📖 Swagger UI: http://localhost:{port}/swagger-ui");
        info!("📊 Metrics: http://localhost:{port}/metrics");

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("Server error")?;

        Ok(())
    }
}
