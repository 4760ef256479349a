use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{AppError, Result};

#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    sub: String,
    exp: usize,
}

/// External identity authority: owns account ids and session credentials.
/// Profile data stays in the document store; only the uid links the two.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Provisions a new identity and returns its uid.
    async fn create_identity(&self, phone: &str, email: &str, display_name: &str)
        -> Result<String>;

    /// Mints a session token for an existing identity.
    async fn issue_session_token(&self, identity_id: &str) -> Result<String>;
}

/// Local implementation: random uids, HS256-signed session tokens.
#[derive(Clone)]
pub struct JwtIdentityService {
    jwt_secret: String,
}

impl JwtIdentityService {
    pub fn new(jwt_secret: String) -> Self {
        Self { jwt_secret }
    }
}

#[async_trait]
impl IdentityProvider for JwtIdentityService {
    async fn create_identity(
        &self,
        phone: &str,
        _email: &str,
        display_name: &str,
    ) -> Result<String> {
        let uid = Uuid::new_v4().simple().to_string();
        tracing::info!("Created identity {} for {} ({})", uid, display_name, phone);
        Ok(uid)
    }

    async fn issue_session_token(&self, identity_id: &str) -> Result<String> {
        let expiration = Utc::now()
            .checked_add_signed(Duration::hours(1))
            .ok_or_else(|| AppError::internal("Failed to calculate token expiry"))?
            .timestamp() as usize;

        let claims = SessionClaims {
            sub: identity_id.to_string(),
            exp: expiration,
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )?;

        Ok(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{decode, DecodingKey, Validation};

    #[tokio::test]
    async fn issued_token_carries_the_identity() {
        let service = JwtIdentityService::new("test-secret".to_string());
        let uid = service
            .create_identity("0551234567", "kofi@example.com", "Kofi Mensah")
            .await
            .unwrap();

        let token = service.issue_session_token(&uid).await.unwrap();

        let decoded = decode::<SessionClaims>(
            &token,
            &DecodingKey::from_secret(b"test-secret"),
            &Validation::default(),
        )
        .unwrap();
        assert_eq!(decoded.claims.sub, uid);
    }

    #[tokio::test]
    async fn identities_are_unique() {
        let service = JwtIdentityService::new("test-secret".to_string());
        let a = service
            .create_identity("0551234567", "a@example.com", "A")
            .await
            .unwrap();
        let b = service
            .create_identity("0551234567", "a@example.com", "A")
            .await
            .unwrap();
        assert_ne!(a, b);
    }
}
