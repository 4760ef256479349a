use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use mongodb::bson::{self, doc};
use serde::{Deserialize, Serialize};

use crate::database::store::DocumentStore;
use crate::errors::{AppError, Result};

const RATE_LIMIT_COLLECTION: &str = "rate_limits";
const OTP_LIMIT: i32 = 5;
const OTP_WINDOW_MINUTES: i64 = 15;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RateLimitEntry {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    count: i32,
    #[serde(with = "bson::serde_helpers::chrono_datetime_as_bson_datetime")]
    expires_at: DateTime<Utc>,
}

/// Fixed-window counter for OTP traffic: at most 5 requests per key per
/// 15 minutes. Send flows key by phone number, verification by requestId.
/// Counters live in the store so every instance sees the same window.
#[derive(Clone)]
pub struct RateLimiter {
    store: Arc<dyn DocumentStore>,
    limit: i32,
    window: Duration,
}

impl RateLimiter {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            limit: OTP_LIMIT,
            window: Duration::minutes(OTP_WINDOW_MINUTES),
        }
    }

    /// Counts one request against `key`; fails with `RateLimited` once the
    /// window limit is spent.
    pub async fn check(&self, key: &str) -> Result<()> {
        let now = Utc::now();

        let entry = match self.store.get(RATE_LIMIT_COLLECTION, key).await? {
            Some(document) => Some(bson::from_document::<RateLimitEntry>(document)?),
            None => None,
        };

        match entry {
            Some(entry) if entry.expires_at > now => {
                if entry.count >= self.limit {
                    tracing::warn!("Rate limit hit for {}", key);
                    return Err(AppError::RateLimited);
                }
                self.store
                    .update(RATE_LIMIT_COLLECTION, key, doc! { "count": entry.count + 1 })
                    .await?;
            }
            _ => {
                // First request, or the previous window lapsed.
                let fresh = RateLimitEntry {
                    id: None,
                    count: 1,
                    expires_at: now + self.window,
                };
                self.store
                    .set(RATE_LIMIT_COLLECTION, key, bson::to_document(&fresh)?)
                    .await?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryStore;

    #[tokio::test]
    async fn allows_up_to_the_limit_then_rejects() {
        let limiter = RateLimiter::new(Arc::new(MemoryStore::new()));

        for _ in 0..5 {
            limiter.check("0551234567").await.unwrap();
        }

        let err = limiter.check("0551234567").await.unwrap_err();
        assert!(matches!(err, AppError::RateLimited));
    }

    #[tokio::test]
    async fn keys_are_counted_independently() {
        let limiter = RateLimiter::new(Arc::new(MemoryStore::new()));

        for _ in 0..5 {
            limiter.check("0551234567").await.unwrap();
        }

        limiter.check("0249876543").await.unwrap();
    }

    #[tokio::test]
    async fn a_lapsed_window_resets_the_count() {
        let store: Arc<dyn DocumentStore> = Arc::new(MemoryStore::new());
        let limiter = RateLimiter::new(store.clone());

        for _ in 0..5 {
            limiter.check("0551234567").await.unwrap();
        }

        // Backdate the window so it has expired.
        let lapsed = RateLimitEntry {
            id: None,
            count: 5,
            expires_at: Utc::now() - Duration::minutes(1),
        };
        store
            .set(
                RATE_LIMIT_COLLECTION,
                "0551234567",
                bson::to_document(&lapsed).unwrap(),
            )
            .await
            .unwrap();

        limiter.check("0551234567").await.unwrap();
    }
}
