use std::sync::Arc;

use chrono::{Duration, Utc};
use mongodb::bson;

use crate::database::store::DocumentStore;
use crate::errors::Result;
use crate::models::otp::OtpSession;

const OTP_SESSION_COLLECTION: &str = "otp_sessions";

/// Tracks which phone and code prefix a provider requestId belongs to for
/// the length of one verification window. Expired entries are evicted on
/// read, so no sweeper is needed.
#[derive(Clone)]
pub struct OtpSessionStore {
    store: Arc<dyn DocumentStore>,
    ttl: Duration,
}

impl OtpSessionStore {
    pub fn new(store: Arc<dyn DocumentStore>, ttl_minutes: i64) -> Self {
        Self {
            store,
            ttl: Duration::minutes(ttl_minutes),
        }
    }

    /// Registers the session for `request_id`, silently overwriting any
    /// previous entry under the same id.
    pub async fn put(&self, request_id: &str, phone: &str, prefix: &str) -> Result<()> {
        let now = Utc::now();
        let session = OtpSession {
            id: None,
            phone: phone.to_string(),
            prefix: prefix.to_string(),
            created_at: now,
            expires_at: now + self.ttl,
        };

        self.store
            .set(
                OTP_SESSION_COLLECTION,
                request_id,
                bson::to_document(&session)?,
            )
            .await
    }

    /// Returns the live session for `request_id`; expired entries are
    /// deleted and reported as absent.
    pub async fn get(&self, request_id: &str) -> Result<Option<OtpSession>> {
        let document = match self.store.get(OTP_SESSION_COLLECTION, request_id).await? {
            Some(document) => document,
            None => return Ok(None),
        };

        let session: OtpSession = bson::from_document(document)?;
        if session.expires_at <= Utc::now() {
            self.store.delete(OTP_SESSION_COLLECTION, request_id).await?;
            return Ok(None);
        }

        Ok(Some(session))
    }

    /// Idempotent removal, used once verification succeeds.
    pub async fn delete(&self, request_id: &str) -> Result<()> {
        self.store.delete(OTP_SESSION_COLLECTION, request_id).await
    }
}
