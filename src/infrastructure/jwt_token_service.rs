use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{
    error::DomainError,
    models::user::User,
    services::token_service::{AccessIdentity, Token, TokenService},
};

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,        // Subject (user ID)
    username: String,
    roles: Vec<String>,
    exp: i64,           // Expiration time
    iat: i64,           // Issued at
}

#[derive(Clone)]
pub struct JwtTokenService {
    secret: String,
    expiration_minutes: i64,
}

impl JwtTokenService {
    pub fn with_expiration(secret: String, expiration_minutes: i64) -> Self {
        Self {
            secret,
            expiration_minutes,
        }
    }
}

impl TokenService for JwtTokenService {
    fn generate(&self, user: &User) -> Result<Token, DomainError> {
        let now = Utc::now();
        let exp = now + Duration::minutes(self.expiration_minutes);
        let identity = AccessIdentity::from(user);

        let claims = Claims {
            sub: identity.user_id,
            username: identity.username,
            roles: identity.roles,
            exp: exp.timestamp(),
            iat: now.timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(|e| DomainError::Token(format!("Failed to generate token: {}", e)))
    }

    fn verify(&self, token: &str) -> Result<AccessIdentity, DomainError> {
        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .map_err(|e| {
            debug!(error = %e, "token rejected");
            DomainError::AuthenticationFailed
        })?;

        Ok(AccessIdentity {
            user_id: data.claims.sub,
            username: data.claims.username,
            roles: data.claims.roles,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{
        credential::HashedPassword,
        role::RoleSet,
        user::{UserId, Username},
    };

    fn user() -> User {
        User::new(
            UserId::new(),
            Username::new("jane".to_string()).unwrap(),
            HashedPassword::new("hash".to_string()),
            "Jane".to_string(),
            "Doe".to_string(),
            RoleSet::parse(&["Manager", "Driver"]).unwrap(),
            true,
        )
        .unwrap()
    }

    #[test]
    fn issued_token_verifies_to_same_identity() {
        let service = JwtTokenService::with_expiration("secret".to_string(), 15);
        let user = user();

        let token = service.generate(&user).unwrap();
        let identity = service.verify(&token).unwrap();

        assert_eq!(identity, AccessIdentity::from(&user));
    }

    #[test]
    fn token_signed_with_other_secret_is_rejected() {
        let token = JwtTokenService::with_expiration("one".to_string(), 15).generate(&user()).unwrap();
        let result = JwtTokenService::with_expiration("two".to_string(), 15).verify(&token);
        assert!(matches!(result, Err(DomainError::AuthenticationFailed)));
    }

    #[test]
    fn expired_token_is_rejected() {
        // beyond the default 60s leeway
        let service = JwtTokenService::with_expiration("secret".to_string(), -5);
        let token = service.generate(&user()).unwrap();
        assert!(matches!(service.verify(&token), Err(DomainError::AuthenticationFailed)));
    }
}
