use anyhow::{Context, Result, anyhow};
use std::str::FromStr;

pub const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://localhost:5173";

fn required(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Missing environment variable: {key}"))
}

fn optional(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parsed_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match optional(key) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|e| anyhow!("{key} has an invalid value '{raw}': {e}")),
        None => Ok(default),
    }
}

fn flag(key: &str) -> Result<bool> {
    match optional(key).as_deref() {
        None => Ok(false),
        Some("true") | Some("1") => Ok(true),
        Some("false") | Some("0") => Ok(false),
        Some(other) => Err(anyhow!("{key} must be 'true' or 'false', got '{other}'")),
    }
}

#[derive(Debug, Clone)]
pub struct EmailConfig {
    pub smtp_server: String,
    pub smtp_port: u16,
    pub smtp_user: String,
    pub smtp_pass: String,
    pub from: String,
}

impl EmailConfig {
    pub fn init() -> Result<Self> {
        let smtp_user = required("SMTP_USERNAME")?;
        let smtp_pass = required("SMTP_PASSWORD")?;
        let smtp_server = required("SMTP_HOST")?;
        let smtp_port = parsed_or("SMTP_PORT", 587u16)?;
        let from = optional("MAIL_FROM").unwrap_or_else(|| smtp_user.clone());

        Ok(Self {
            smtp_server,
            smtp_port,
            smtp_user,
            smtp_pass,
            from,
        })
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub db_max_connections: u32,
    pub jwt_secret: String,
    pub jwt_expiration_minutes: i64,
    pub run_migrations: bool,
    pub port: u16,
    pub bcrypt_cost: u32,
    pub cors_allowed_origins: Vec<String>,
    pub frontend_url: String,
    pub allowed_email_domain: Option<String>,
    pub order_cancel_window_minutes: i64,
    pub otel_endpoint: Option<String>,
    pub email_config: EmailConfig,
}

impl Config {
    pub fn init() -> Result<Self> {
        let database_url = required("DATABASE_URL")?;
        let jwt_secret = required("JWT_SECRET")?;
        let run_migrations = flag("RUN_MIGRATIONS")?;

        let port = required("PORT")?
            .parse::<u16>()
            .context("PORT must be a valid u16 integer")?;

        let cors_allowed_origins = optional("CORS_ALLOWED_ORIGINS")
            .unwrap_or_else(|| DEFAULT_CORS_ORIGINS.to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        let frontend_url = optional("FRONTEND_URL")
            .unwrap_or_else(|| "http://localhost:3000".to_string())
            .trim_end_matches('/')
            .to_string();

        let allowed_email_domain = optional("ALLOWED_EMAIL_DOMAIN")
            .map(|d| d.trim().trim_start_matches('@').to_lowercase());

        let email_config = EmailConfig::init().context("Failed to load email configuration")?;

        Ok(Self {
            database_url,
            db_max_connections: parsed_or("DB_MAX_CONNECTIONS", 10u32)?,
            jwt_secret,
            jwt_expiration_minutes: parsed_or("JWT_EXPIRATION_MINUTES", 1440i64)?,
            run_migrations,
            port,
            bcrypt_cost: parsed_or("BCRYPT_COST", bcrypt::DEFAULT_COST)?,
            cors_allowed_origins,
            frontend_url,
            allowed_email_domain,
            order_cancel_window_minutes: parsed_or("ORDER_CANCEL_WINDOW_MINUTES", 60i64)?,
            otel_endpoint: optional("OTEL_EXPORTER_OTLP_ENDPOINT"),
            email_config,
        })
    }
}
