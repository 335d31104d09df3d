use crate::{
    abstract_trait::JwtServiceTrait,
    domain::Requester,
    errors::ServiceError,
    model::{Role, User},
};
use chrono::{Duration, Utc};
use jsonwebtoken::{
    DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};

pub const MIN_SECRET_LEN: usize = 32;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub user_id: i64,
    pub email: String,
    pub role: Role,
    pub exp: usize,
    pub iat: usize,
}

#[derive(Clone)]
pub struct JwtConfig {
    jwt_secret: String,
    expiration: Duration,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig")
            .field("jwt_secret", &"<redacted>")
            .field("expiration", &self.expiration)
            .finish()
    }
}

impl JwtConfig {
    pub fn new(jwt_secret: &str, expiration: Duration) -> anyhow::Result<Self> {
        if jwt_secret.len() < MIN_SECRET_LEN {
            anyhow::bail!("JWT_SECRET must be at least {MIN_SECRET_LEN} bytes");
        }

        Ok(JwtConfig {
            jwt_secret: jwt_secret.to_string(),
            expiration,
        })
    }

    fn sign(&self, claims: &Claims) -> Result<String, ServiceError> {
        encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )
        .map_err(ServiceError::Jwt)
    }
}

impl JwtServiceTrait for JwtConfig {
    fn generate_token(&self, user: &User) -> Result<String, ServiceError> {
        let now = Utc::now();

        let claims = Claims {
            sub: user.username.clone(),
            user_id: user.user_id,
            email: user.email.clone(),
            role: user.role,
            iat: now.timestamp() as usize,
            exp: (now + self.expiration).timestamp() as usize,
        };

        self.sign(&claims)
    }

    fn verify_token(&self, token: &str) -> Result<Requester, ServiceError> {
        let decoding_key = DecodingKey::from_secret(self.jwt_secret.as_ref());

        let mut validation = Validation::default();
        validation.leeway = 0;

        let token_data =
            decode::<Claims>(token, &decoding_key, &validation).map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => ServiceError::TokenExpired,
                _ => ServiceError::Jwt(e),
            })?;

        let claims = token_data.claims;
        Ok(Requester::new(
            claims.user_id,
            claims.sub,
            claims.email,
            claims.role,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "0123456789abcdef0123456789abcdef";

    fn user() -> User {
        User {
            user_id: 42,
            username: "alice".into(),
            full_name: "Alice Nguyen".into(),
            email: "alice@example.com".into(),
            password: "hash".into(),
            role: Role::Admin,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn rejects_short_secret() {
        assert!(JwtConfig::new("too-short", Duration::minutes(5)).is_err());
    }

    #[test]
    fn token_round_trips_identity() {
        let jwt = JwtConfig::new(SECRET, Duration::minutes(5)).unwrap();
        let token = jwt.generate_token(&user()).unwrap();

        let requester = jwt.verify_token(&token).unwrap();
        assert_eq!(requester.user_id, 42);
        assert_eq!(requester.username, "alice");
        assert_eq!(requester.role, Role::Admin);
    }

    #[test]
    fn expired_token_is_reported_as_expired() {
        let jwt = JwtConfig::new(SECRET, Duration::minutes(-10)).unwrap();
        let token = jwt.generate_token(&user()).unwrap();

        assert!(matches!(
            jwt.verify_token(&token),
            Err(ServiceError::TokenExpired)
        ));
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let issuer = JwtConfig::new(SECRET, Duration::minutes(5)).unwrap();
        let verifier =
            JwtConfig::new("ffffffffffffffffffffffffffffffff", Duration::minutes(5)).unwrap();
        let token = issuer.generate_token(&user()).unwrap();

        assert!(matches!(
            verifier.verify_token(&token),
            Err(ServiceError::Jwt(_))
        ));
    }
}
