#![allow(dead_code)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Method, Request, StatusCode, header},
};
use chrono::Duration;
use marketplace::handler::AppRouter;
use serde_json::Value;
use shared::{
    abstract_trait::{DynEmailService, DynHashing, DynJwtService, EmailRequest, HashingTrait},
    config::{Hashing, JwtConfig},
    domain::Requester,
    model::{Role, User},
    repository::Repositories,
    state::{AppState, AppStateDeps},
    testing::{InMemoryStore, OutboxEmailService},
};
use std::sync::Arc;
use tower::ServiceExt;

pub const SECRET: &str = "0123456789abcdef0123456789abcdef";
pub const PASSWORD: &str = "password123";

pub struct TestApp {
    pub store: Arc<InMemoryStore>,
    pub outbox: Arc<OutboxEmailService>,
    pub state: AppState,
    pub hash: DynHashing,
}

impl TestApp {
    pub async fn new() -> Self {
        Self::with_domain(None).await
    }

    pub async fn with_domain(allowed_email_domain: Option<&str>) -> Self {
        Self::assemble(allowed_email_domain, |_, _| {}).await
    }

    /// Lets a test swap individual repositories before the services are wired.
    pub async fn with_repositories(
        adjust: impl FnOnce(&Arc<InMemoryStore>, &mut Repositories),
    ) -> Self {
        Self::assemble(None, adjust).await
    }

    async fn assemble(
        allowed_email_domain: Option<&str>,
        adjust: impl FnOnce(&Arc<InMemoryStore>, &mut Repositories),
    ) -> Self {
        let store = InMemoryStore::new();
        let mut repositories = store.repositories();
        adjust(&store, &mut repositories);
        let outbox = Arc::new(OutboxEmailService::new());
        let hash = Arc::new(Hashing::new(4)) as DynHashing;
        let jwt = Arc::new(JwtConfig::new(SECRET, Duration::minutes(30)).unwrap()) as DynJwtService;

        let state = AppState::build(AppStateDeps {
            repositories,
            email: outbox.clone() as DynEmailService,
            jwt,
            hash: hash.clone(),
            frontend_url: "http://shop.test".to_string(),
            allowed_email_domain: allowed_email_domain.map(str::to_string),
            cancel_window: Duration::minutes(60),
            cors_allowed_origins: vec!["http://localhost:3000".to_string()],
        })
        .await;

        Self {
            store,
            outbox,
            state,
            hash,
        }
    }

    /// A user whose password is `PASSWORD`.
    pub async fn user(&self, username: &str, role: Role) -> User {
        let hashed = self.hash.hash_password(PASSWORD).await.unwrap();
        self.store.seed_user(username, &hashed, role)
    }

    pub fn requester(user: &User) -> Requester {
        Requester::new(user.user_id, &user.username, &user.email, user.role)
    }

    pub fn token(&self, user: &User) -> String {
        self.state.jwt_config.generate_token(user).unwrap()
    }

    pub fn router(&self) -> Router {
        AppRouter::build(self.state.clone())
    }

    /// Waits for detached notification tasks to reach the outbox.
    pub async fn wait_for_emails(&self, count: usize) -> Vec<EmailRequest> {
        for _ in 0..100 {
            let sent = self.outbox.sent();
            if sent.len() >= count {
                return sent;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        self.outbox.sent()
    }

    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, HeaderMap, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }

        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router().oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        (status, headers, json)
    }
}
