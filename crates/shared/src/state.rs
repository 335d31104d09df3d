use crate::{
    abstract_trait::{DynEmailService, DynHashing, DynJwtService},
    config::{Config, ConnectionPool, Hashing, JwtConfig},
    di::{DependenciesInject, DependenciesInjectDeps},
    repository::Repositories,
    service::EmailService,
    utils::{SystemMetrics, run_metrics_collector},
};
use anyhow::{Context, Result};
use chrono::Duration;
use prometheus_client::registry::Registry;
use std::{fmt, sync::Arc};
use tokio::sync::Mutex;

#[derive(Clone)]
pub struct AppState {
    pub di_container: DependenciesInject,
    pub jwt_config: DynJwtService,
    pub registry: Arc<Mutex<Registry>>,
    pub system_metrics: Arc<SystemMetrics>,
    pub cors_allowed_origins: Vec<String>,
}

impl fmt::Debug for AppState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppState")
            .field("di_container", &self.di_container)
            .field("jwt_config", &self.jwt_config)
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .finish()
    }
}

/// Everything `AppState` is assembled from, so tests can swap in an
/// in-memory store and a recording mailer.
pub struct AppStateDeps {
    pub repositories: Repositories,
    pub email: DynEmailService,
    pub jwt: DynJwtService,
    pub hash: DynHashing,
    pub frontend_url: String,
    pub allowed_email_domain: Option<String>,
    pub cancel_window: Duration,
    pub cors_allowed_origins: Vec<String>,
}

impl AppState {
    pub async fn new(pool: ConnectionPool, config: &Config) -> Result<Self> {
        let jwt = Arc::new(
            JwtConfig::new(
                &config.jwt_secret,
                Duration::minutes(config.jwt_expiration_minutes),
            )
            .context("Invalid JWT configuration")?,
        ) as DynJwtService;

        let email = Arc::new(
            EmailService::new(&config.email_config).context("Failed to set up SMTP transport")?,
        ) as DynEmailService;

        let state = Self::build(AppStateDeps {
            repositories: Repositories::from_pool(pool),
            email,
            jwt,
            hash: Arc::new(Hashing::new(config.bcrypt_cost)) as DynHashing,
            frontend_url: config.frontend_url.clone(),
            allowed_email_domain: config.allowed_email_domain.clone(),
            cancel_window: Duration::minutes(config.order_cancel_window_minutes),
            cors_allowed_origins: config.cors_allowed_origins.clone(),
        })
        .await;

        tokio::spawn(run_metrics_collector(state.system_metrics.clone()));

        Ok(state)
    }

    pub async fn build(deps: AppStateDeps) -> Self {
        let AppStateDeps {
            repositories,
            email,
            jwt,
            hash,
            frontend_url,
            allowed_email_domain,
            cancel_window,
            cors_allowed_origins,
        } = deps;

        let registry = Arc::new(Mutex::new(Registry::default()));
        let system_metrics = Arc::new(SystemMetrics::new());

        let di_container = DependenciesInject::new(DependenciesInjectDeps {
            repositories,
            hash,
            jwt: jwt.clone(),
            email,
            frontend_url,
            allowed_email_domain,
            cancel_window,
            registry: registry.clone(),
        })
        .await;

        system_metrics.register(&mut *registry.lock().await);

        Self {
            di_container,
            jwt_config: jwt,
            registry,
            system_metrics,
            cors_allowed_origins,
        }
    }
}
