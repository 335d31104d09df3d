use crate::{
    abstract_trait::{
        AuthServiceTrait, DynHashing, DynJwtService, DynResetTokenRepository,
        DynUserCommandRepository, DynUserQueryRepository,
    },
    domain::{
        requests::{ForgotPasswordRequest, LoginRequest, RegisterRequest, ResetPasswordRequest},
        responses::{ApiResponse, AuthResponse},
    },
    errors::{RepositoryError, ServiceError},
    model::{NewUser, Role, User},
    service::{Notification, Notifier},
    utils::{Method, ServiceTracer, generate_random_string},
};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use opentelemetry::KeyValue;
use prometheus_client::registry::Registry;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};
use validator::Validate;

pub const RESET_TOKEN_LENGTH: usize = 32;
pub const RESET_TOKEN_TTL_MINUTES: i64 = 30;

#[derive(Clone)]
pub struct AuthService {
    query: DynUserQueryRepository,
    command: DynUserCommandRepository,
    reset_token: DynResetTokenRepository,
    hash: DynHashing,
    jwt: DynJwtService,
    notifier: Notifier,
    allowed_email_domain: Option<String>,
    tracer: ServiceTracer,
}

pub struct AuthServiceDeps {
    pub query: DynUserQueryRepository,
    pub command: DynUserCommandRepository,
    pub reset_token: DynResetTokenRepository,
    pub hash: DynHashing,
    pub jwt: DynJwtService,
    pub notifier: Notifier,
    pub allowed_email_domain: Option<String>,
    pub registry: Arc<Mutex<Registry>>,
}

impl AuthService {
    pub async fn new(deps: AuthServiceDeps) -> Self {
        let AuthServiceDeps {
            query,
            command,
            reset_token,
            hash,
            jwt,
            notifier,
            allowed_email_domain,
            registry,
        } = deps;

        let tracer = ServiceTracer::registered("auth-service", "auth_service", &registry).await;

        Self {
            query,
            command,
            reset_token,
            hash,
            jwt,
            notifier,
            allowed_email_domain,
            tracer,
        }
    }

    fn check_email_domain(&self, email: &str) -> Result<(), ServiceError> {
        match &self.allowed_email_domain {
            Some(domain) if !email.ends_with(&format!("@{domain}")) => Err(
                ServiceError::validation(format!("Email must belong to the @{domain} domain")),
            ),
            _ => Ok(()),
        }
    }

    fn auth_response(&self, user: &User) -> Result<AuthResponse, ServiceError> {
        Ok(AuthResponse {
            token: self.jwt.generate_token(user)?,
            username: user.username.clone(),
            role: user.role,
        })
    }

    async fn register_user(
        &self,
        req: &RegisterRequest,
    ) -> Result<ApiResponse<AuthResponse>, ServiceError> {
        req.validate()?;

        let username = req.username.trim().to_string();
        let email = req.email.trim().to_lowercase();
        self.check_email_domain(&email)?;

        if self.query.find_by_username(&username).await?.is_some() {
            return Err(ServiceError::Conflict("Username already exists".into()));
        }
        if self.query.find_by_email(&email).await?.is_some() {
            return Err(ServiceError::Conflict("Email already registered".into()));
        }

        let password = self.hash.hash_password(&req.password).await?;

        let user = self
            .command
            .create_user(&NewUser {
                username,
                full_name: req.full_name.trim().to_string(),
                email,
                password,
                role: Role::User,
            })
            .await
            .map_err(|e| match e {
                RepositoryError::AlreadyExists(_) => {
                    ServiceError::Conflict("Username or email already exists".into())
                }
                other => ServiceError::Repo(other),
            })?;

        let response = self.auth_response(&user)?;

        self.notifier.dispatch(Notification::Welcome {
            to: user.email.clone(),
            name: user.full_name.clone(),
        });

        info!("✅ Registered user {} ({})", user.user_id, user.username);
        Ok(ApiResponse::success("Registration successful", response))
    }

    async fn authenticate(
        &self,
        req: &LoginRequest,
    ) -> Result<ApiResponse<AuthResponse>, ServiceError> {
        req.validate()?;

        let identifier = req.username_or_email.trim();

        let user = match self.query.find_by_username(identifier).await? {
            Some(user) => Some(user),
            None => self.query.find_by_email(&identifier.to_lowercase()).await?,
        };

        let Some(user) = user else {
            warn!("🔐 Login failed for unknown identifier");
            return Err(ServiceError::InvalidCredentials);
        };

        self.hash.compare_password(&user.password, &req.password).await?;

        let response = self.auth_response(&user)?;
        info!("🔓 User {} logged in", user.username);
        Ok(ApiResponse::success("Login successful", response))
    }

    async fn issue_reset_token(
        &self,
        req: &ForgotPasswordRequest,
    ) -> Result<ApiResponse<()>, ServiceError> {
        req.validate()?;

        let email = req.email.trim().to_lowercase();

        match self.query.find_by_email(&email).await? {
            Some(user) => {
                let token = generate_random_string(RESET_TOKEN_LENGTH).map_err(|e| {
                    ServiceError::Internal(format!("Failed to generate reset token: {e}"))
                })?;
                let expires = Utc::now() + Duration::minutes(RESET_TOKEN_TTL_MINUTES);

                self.reset_token
                    .upsert_token(user.user_id, &token, expires)
                    .await?;

                self.notifier.dispatch(Notification::PasswordReset {
                    to: user.email,
                    name: user.full_name,
                    token,
                });
            }
            None => info!("🔍 Password reset requested for an unknown email"),
        }

        Ok(ApiResponse::success(
            "If the email is registered, a password reset link has been sent",
            (),
        ))
    }

    async fn apply_reset(&self, req: &ResetPasswordRequest) -> Result<ApiResponse<()>, ServiceError> {
        req.validate()?;

        let invalid = || ServiceError::validation("Invalid or expired reset token");

        let token = self
            .reset_token
            .find_by_token(req.token.trim())
            .await?
            .ok_or_else(invalid)?;

        if token.expired_date < Utc::now() {
            self.reset_token.delete_by_user(token.user_id).await?;
            return Err(invalid());
        }

        let password = self.hash.hash_password(&req.new_password).await?;
        self.command.update_password(token.user_id, &password).await?;
        self.reset_token.delete_by_user(token.user_id).await?;

        info!("🔑 Password reset for user {}", token.user_id);
        Ok(ApiResponse::success("Password has been reset successfully", ()))
    }
}

#[async_trait]
impl AuthServiceTrait for AuthService {
    async fn register(
        &self,
        req: &RegisterRequest,
    ) -> Result<ApiResponse<AuthResponse>, ServiceError> {
        let ctx = self.tracer.start(
            "register",
            Method::Post,
            vec![
                KeyValue::new("component", "auth"),
                KeyValue::new("user.username", req.username.clone()),
            ],
        );
        let result = self.register_user(req).await;
        self.tracer.finish(ctx, result).await
    }

    async fn login(&self, req: &LoginRequest) -> Result<ApiResponse<AuthResponse>, ServiceError> {
        let ctx = self.tracer.start(
            "login",
            Method::Post,
            vec![KeyValue::new("component", "auth")],
        );
        let result = self.authenticate(req).await;
        self.tracer.finish(ctx, result).await
    }

    async fn forgot_password(
        &self,
        req: &ForgotPasswordRequest,
    ) -> Result<ApiResponse<()>, ServiceError> {
        let ctx = self.tracer.start(
            "forgot_password",
            Method::Post,
            vec![KeyValue::new("component", "auth")],
        );
        let result = self.issue_reset_token(req).await;
        self.tracer.finish(ctx, result).await
    }

    async fn reset_password(
        &self,
        req: &ResetPasswordRequest,
    ) -> Result<ApiResponse<()>, ServiceError> {
        let ctx = self.tracer.start(
            "reset_password",
            Method::Post,
            vec![KeyValue::new("component", "auth")],
        );
        let result = self.apply_reset(req).await;
        self.tracer.finish(ctx, result).await
    }
}
