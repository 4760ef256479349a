use std::sync::Arc;

use chrono::Utc;
use mongodb::bson::{self, doc, Document};

use crate::database::store::DocumentStore;
use crate::errors::{AppError, Result};
use crate::models::booking::Booking;
use crate::models::feedback::Feedback;
use crate::services::locks::KeyedLock;

const BOOKINGS_COLLECTION: &str = "bookings";
const DRIVERS_COLLECTION: &str = "drivers";
const FEEDBACK_COLLECTION: &str = "feedback";

/// Which feedback rows feed a driver's average rating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RatingScope {
    /// Average over feedback for the one booking being rated.
    PerBooking,
    /// Average over feedback across all of the driver's bookings.
    PerDriver,
}

impl RatingScope {
    pub fn parse(value: &str) -> Self {
        match value {
            "driver" => RatingScope::PerDriver,
            "booking" => RatingScope::PerBooking,
            other => {
                tracing::warn!("Unknown RATING_SCOPE '{}', defaulting to booking", other);
                RatingScope::PerBooking
            }
        }
    }
}

/// Records ride feedback and keeps the driver's `averageRating` current.
pub struct FeedbackService {
    store: Arc<dyn DocumentStore>,
    locks: KeyedLock,
    scope: RatingScope,
}

impl FeedbackService {
    pub fn new(store: Arc<dyn DocumentStore>, scope: RatingScope) -> Self {
        Self {
            store,
            locks: KeyedLock::new(),
            scope,
        }
    }

    /// Validates, records, and re-aggregates in that order: an out-of-range
    /// rating fails before anything is written. The recompute and write-back
    /// run under the driver's lock so concurrent submissions cannot
    /// interleave.
    pub async fn submit(&self, booking_id: &str, rating: i32, comment: String) -> Result<()> {
        let booking_doc = self
            .store
            .get(BOOKINGS_COLLECTION, booking_id)
            .await?
            .ok_or_else(|| AppError::not_found("Booking not found"))?;
        let booking: Booking = bson::from_document(booking_doc)?;

        if !(1..=5).contains(&rating) {
            return Err(AppError::invalid(
                "Invalid rating. Rating must be between 1 and 5.",
            ));
        }

        let _guard = self.locks.acquire(&booking.driver_id).await;

        let feedback = Feedback {
            id: None,
            booking_id: booking_id.to_string(),
            rating,
            comment,
            timestamp: Utc::now(),
        };
        self.store
            .insert(FEEDBACK_COLLECTION, bson::to_document(&feedback)?)
            .await?;

        let average = match self.scope {
            RatingScope::PerBooking => self.average_for_booking(booking_id).await?,
            RatingScope::PerDriver => self.average_for_driver(&booking.driver_id).await?,
        };

        if let Some(average) = average {
            let rounded = round_to_2dp(average);
            let matched = self
                .store
                .update(
                    DRIVERS_COLLECTION,
                    &booking.driver_id,
                    doc! { "averageRating": rounded },
                )
                .await?;
            if !matched {
                return Err(AppError::not_found("Driver not found"));
            }
            tracing::info!(
                "Driver {} average rating now {:.2}",
                booking.driver_id,
                rounded
            );
        }

        Ok(())
    }

    /// Feedback rows for one booking; the booking itself must exist.
    pub async fn get_for_booking(&self, booking_id: &str) -> Result<Vec<Feedback>> {
        if self
            .store
            .get(BOOKINGS_COLLECTION, booking_id)
            .await?
            .is_none()
        {
            return Err(AppError::not_found("Booking not found"));
        }
        self.rows(doc! { "bookingId": booking_id }).await
    }

    pub async fn get_all(&self) -> Result<Vec<Feedback>> {
        self.rows(doc! {}).await
    }

    async fn average_for_booking(&self, booking_id: &str) -> Result<Option<f64>> {
        let rows = self.rows(doc! { "bookingId": booking_id }).await?;
        Ok(average_rating(&rows))
    }

    async fn average_for_driver(&self, driver_id: &str) -> Result<Option<f64>> {
        let bookings = self
            .store
            .find(BOOKINGS_COLLECTION, doc! { "driverId": driver_id })
            .await?;

        let mut rows = Vec::new();
        for booking in bookings {
            let id = booking
                .get_str("_id")
                .map_err(|_| AppError::internal("Booking document missing _id"))?;
            rows.extend(self.rows(doc! { "bookingId": id }).await?);
        }
        Ok(average_rating(&rows))
    }

    async fn rows(&self, filter: Document) -> Result<Vec<Feedback>> {
        let documents = self.store.find(FEEDBACK_COLLECTION, filter).await?;
        documents
            .into_iter()
            .map(|document| bson::from_document(document).map_err(Into::into))
            .collect()
    }
}

fn average_rating(rows: &[Feedback]) -> Option<f64> {
    if rows.is_empty() {
        return None;
    }
    let total: i64 = rows.iter().map(|row| i64::from(row.rating)).sum();
    Some(total as f64 / rows.len() as f64)
}

fn round_to_2dp(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(rating: i32) -> Feedback {
        Feedback {
            id: None,
            booking_id: "b1".to_string(),
            rating,
            comment: String::new(),
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn average_of_4_and_2_is_3() {
        let rows = vec![row(4), row(2)];
        assert_eq!(average_rating(&rows), Some(3.0));
    }

    #[test]
    fn average_of_no_rows_is_none() {
        assert_eq!(average_rating(&[]), None);
    }

    #[test]
    fn rounding_keeps_two_decimals() {
        let rows = vec![row(5), row(4), row(4)];
        let average = average_rating(&rows).unwrap();
        assert_eq!(round_to_2dp(average), 4.33);

        assert_eq!(round_to_2dp(3.0), 3.0);
        assert_eq!(round_to_2dp(4.666_666_6), 4.67);
    }

    #[test]
    fn scope_parses_with_a_default() {
        assert_eq!(RatingScope::parse("driver"), RatingScope::PerDriver);
        assert_eq!(RatingScope::parse("booking"), RatingScope::PerBooking);
        assert_eq!(RatingScope::parse("whatever"), RatingScope::PerBooking);
    }
}
