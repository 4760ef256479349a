use std::sync::Arc;

use mongodb::bson::{self, doc, Document};

use crate::database::store::DocumentStore;
use crate::errors::{AppError, Result};
use crate::models::booking::{Booking, BookingStatus, CurrentBooking};
use crate::services::locks::KeyedLock;

const USERS_COLLECTION: &str = "users";
const BOOKINGS_COLLECTION: &str = "bookings";

/// Booking lifecycle manager. Each rider has at most one pending or accepted
/// booking at a time, tracked by the `bookingStatus` pointer on the rider
/// document; every status write updates the pointer in the same flow.
pub struct BookingService {
    store: Arc<dyn DocumentStore>,
    locks: KeyedLock,
}

impl BookingService {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            locks: KeyedLock::new(),
        }
    }

    /// Creates a pending booking unless the rider already has an active one.
    /// Runs under the rider's lock so the conflict check and the insert
    /// cannot interleave with a concurrent create.
    pub async fn create(
        &self,
        user_id: &str,
        driver_id: &str,
        fare: f64,
        pickup_address: String,
        drop_off_address: String,
        notes: String,
    ) -> Result<String> {
        let _guard = self.locks.acquire(user_id).await;

        let user = self
            .store
            .get(USERS_COLLECTION, user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))?;

        if let Ok(pointer) = user.get_document("bookingStatus") {
            let current: CurrentBooking = bson::from_document(pointer.clone())?;
            if current.status.is_active() {
                return Err(AppError::BookingConflict);
            }
        }

        let booking = Booking {
            id: None,
            user_id: user_id.to_string(),
            driver_id: driver_id.to_string(),
            fare,
            pickup_address,
            drop_off_address,
            notes,
            status: BookingStatus::Pending,
        };

        let booking_id = self
            .store
            .insert(BOOKINGS_COLLECTION, bson::to_document(&booking)?)
            .await?;

        self.write_pointer(user_id, BookingStatus::Pending, &booking_id)
            .await?;

        tracing::info!("Booking {} created for user {}", booking_id, user_id);
        Ok(booking_id)
    }

    pub async fn get(&self, booking_id: &str) -> Result<Booking> {
        let document = self
            .store
            .get(BOOKINGS_COLLECTION, booking_id)
            .await?
            .ok_or_else(|| AppError::not_found("Booking not found"))?;
        Ok(bson::from_document(document)?)
    }

    pub async fn list_all(&self) -> Result<Vec<Booking>> {
        self.collect(doc! {}).await
    }

    pub async fn list_by_user(&self, user_id: &str) -> Result<Vec<Booking>> {
        self.collect(doc! { "userId": user_id }).await
    }

    pub async fn list_by_driver(&self, driver_id: &str) -> Result<Vec<Booking>> {
        self.collect(doc! { "driverId": driver_id }).await
    }

    /// Accepts or declines a pending booking addressed to this driver.
    /// `decision` is the raw client string, parsed once the ride has
    /// resolved. The transition settles under the rider's lock, so racing
    /// decisions produce exactly one winner.
    pub async fn respond(
        &self,
        driver_id: &str,
        ride_id: &str,
        decision: &str,
    ) -> Result<BookingStatus> {
        let booking = self.owned_booking(driver_id, ride_id).await?;

        let next = match decision {
            "accept" => BookingStatus::Accepted,
            "decline" => BookingStatus::Declined,
            _ => return Err(AppError::invalid("Invalid response")),
        };

        let _guard = self.locks.acquire(&booking.user_id).await;

        // Re-read now that we hold the lock; a concurrent decision may have
        // landed after the first read.
        let booking = self.owned_booking(driver_id, ride_id).await?;
        if booking.status != BookingStatus::Pending {
            return Err(AppError::invalid(format!(
                "Ride is already {}",
                booking.status.as_str()
            )));
        }

        self.store
            .update(
                BOOKINGS_COLLECTION,
                ride_id,
                doc! { "status": next.as_str() },
            )
            .await?;
        self.write_pointer(&booking.user_id, next, ride_id).await?;

        tracing::info!("Booking {} {}", ride_id, next.as_str());
        Ok(next)
    }

    /// Marks an accepted ride completed, freeing the rider to book again and
    /// adding the fare to the driver's earnings.
    pub async fn complete(&self, driver_id: &str, ride_id: &str) -> Result<()> {
        let booking = self.owned_booking(driver_id, ride_id).await?;
        let _guard = self.locks.acquire(&booking.user_id).await;

        let booking = self.owned_booking(driver_id, ride_id).await?;
        if booking.status != BookingStatus::Accepted {
            return Err(AppError::invalid("Only accepted rides can be completed"));
        }

        self.store
            .update(
                BOOKINGS_COLLECTION,
                ride_id,
                doc! { "status": BookingStatus::Completed.as_str() },
            )
            .await?;
        self.write_pointer(&booking.user_id, BookingStatus::Completed, ride_id)
            .await?;

        tracing::info!("Booking {} completed", ride_id);
        Ok(())
    }

    /// Full booking record, visible only to the driver it is addressed to.
    pub async fn track_status(&self, driver_id: &str, ride_id: &str) -> Result<Booking> {
        self.owned_booking(driver_id, ride_id).await
    }

    /// Pending bookings waiting on this driver's decision.
    pub async fn pending_requests(&self, driver_id: &str) -> Result<Vec<Booking>> {
        self.collect(doc! {
            "driverId": driver_id,
            "status": BookingStatus::Pending.as_str(),
        })
        .await
    }

    /// Sum of fares over completed rides; `None` when there are none, so the
    /// handler can distinguish "no earnings yet" from zero.
    pub async fn earnings(&self, driver_id: &str) -> Result<Option<f64>> {
        let completed = self
            .collect(doc! {
                "driverId": driver_id,
                "status": BookingStatus::Completed.as_str(),
            })
            .await?;

        if completed.is_empty() {
            return Ok(None);
        }
        Ok(Some(completed.iter().map(|booking| booking.fare).sum()))
    }

    async fn collect(&self, filter: Document) -> Result<Vec<Booking>> {
        let documents = self.store.find(BOOKINGS_COLLECTION, filter).await?;
        documents
            .into_iter()
            .map(|document| bson::from_document(document).map_err(Into::into))
            .collect()
    }

    async fn owned_booking(&self, driver_id: &str, ride_id: &str) -> Result<Booking> {
        let document = self.store.get(BOOKINGS_COLLECTION, ride_id).await?;
        match document {
            Some(document) => {
                let booking: Booking = bson::from_document(document)?;
                if booking.driver_id != driver_id {
                    return Err(AppError::not_found("Ride not found"));
                }
                Ok(booking)
            }
            None => Err(AppError::not_found("Ride not found")),
        }
    }

    async fn write_pointer(
        &self,
        user_id: &str,
        status: BookingStatus,
        booking_id: &str,
    ) -> Result<()> {
        let pointer = CurrentBooking {
            status,
            booking_id: booking_id.to_string(),
        };
        self.store
            .update(
                USERS_COLLECTION,
                user_id,
                doc! { "bookingStatus": bson::to_document(&pointer)? },
            )
            .await?;
        Ok(())
    }
}
