use std::sync::Arc;

use mongodb::bson::{self, doc, Document};

use crate::database::store::DocumentStore;
use crate::errors::{AppError, Result};
use crate::models::driver::{Driver, RegisterDriverRequest};
use crate::models::user::{RegisterUserRequest, User};
use crate::services::identity_service::IdentityProvider;
use crate::services::otp_session::OtpSessionStore;
use crate::services::rate_limit::RateLimiter;
use crate::services::sms_service::SmsProvider;

const USERS_COLLECTION: &str = "users";
const DRIVERS_COLLECTION: &str = "drivers";

/// Registration and login flows: identity creation, OTP dispatch, and the
/// verification handshake against the session store.
pub struct AuthService {
    store: Arc<dyn DocumentStore>,
    identity: Arc<dyn IdentityProvider>,
    sms: Arc<dyn SmsProvider>,
    sessions: OtpSessionStore,
    limiter: RateLimiter,
}

impl AuthService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        identity: Arc<dyn IdentityProvider>,
        sms: Arc<dyn SmsProvider>,
        sessions: OtpSessionStore,
        limiter: RateLimiter,
    ) -> Self {
        Self {
            store,
            identity,
            sms,
            sessions,
            limiter,
        }
    }

    /// Registers a rider and dispatches the first OTP. Uniqueness is checked
    /// before any provider call, so a duplicate phone costs nothing upstream.
    pub async fn register_user(&self, payload: RegisterUserRequest) -> Result<String> {
        self.limiter.check(&payload.phone).await?;

        let existing = self
            .store
            .find(USERS_COLLECTION, doc! { "phone": &payload.phone })
            .await?;
        if !existing.is_empty() {
            return Err(AppError::AlreadyRegistered("User"));
        }

        let display_name = format!("{} {}", payload.first_name, payload.last_name);
        let uid = self
            .identity
            .create_identity(&payload.phone, &payload.email, &display_name)
            .await?;

        let user = User {
            id: None,
            phone: payload.phone.clone(),
            first_name: payload.first_name,
            last_name: payload.last_name,
            email: payload.email,
            created_at: chrono::Utc::now(),
            booking_status: None,
        };
        self.store
            .set(USERS_COLLECTION, &uid, bson::to_document(&user)?)
            .await?;

        tracing::info!("User registered: {}", uid);
        self.dispatch_otp(&payload.phone).await
    }

    /// Registers a driver with vehicle details; otherwise mirrors
    /// [`Self::register_user`].
    pub async fn register_driver(&self, payload: RegisterDriverRequest) -> Result<String> {
        self.limiter.check(&payload.phone).await?;

        let existing = self
            .store
            .find(DRIVERS_COLLECTION, doc! { "phone": &payload.phone })
            .await?;
        if !existing.is_empty() {
            return Err(AppError::AlreadyRegistered("Driver"));
        }

        let display_name = format!("{} {}", payload.first_name, payload.last_name);
        let uid = self
            .identity
            .create_identity(&payload.phone, &payload.email, &display_name)
            .await?;

        let driver = Driver {
            id: None,
            phone: payload.phone.clone(),
            first_name: payload.first_name,
            last_name: payload.last_name,
            email: payload.email,
            license_number: payload.license_number,
            number_plate: payload.number_plate,
            vehicle_type: payload.vehicle_type,
            color: payload.color,
            created_at: chrono::Utc::now(),
            average_rating: None,
        };
        self.store
            .set(DRIVERS_COLLECTION, &uid, bson::to_document(&driver)?)
            .await?;

        tracing::info!("Driver registered: {}", uid);
        self.dispatch_otp(&payload.phone).await
    }

    /// Sends a login OTP for an already-registered phone number.
    pub async fn login(&self, phone: &str) -> Result<String> {
        self.limiter.check(phone).await?;

        if self.find_identity_by_phone(phone).await?.is_none() {
            return Err(AppError::not_found("User not found"));
        }

        self.dispatch_otp(phone).await
    }

    /// Completes the OTP handshake: resolves the session behind `request_id`,
    /// has the gateway check the code, then mints a session token for the
    /// identity holding the phone number. The session is consumed only on
    /// full success, so a mistyped code can be retried; retries count
    /// against a per-requestId rate window.
    pub async fn verify(&self, phone: &str, request_id: &str, code: &str) -> Result<String> {
        self.limiter.check(&format!("verify:{}", request_id)).await?;

        let session = match self.sessions.get(request_id).await? {
            Some(session) => session,
            None => return Err(AppError::InvalidRequestId),
        };

        // The code was sent to the session's phone; a different number
        // cannot claim this requestId.
        if session.phone != phone {
            return Err(AppError::InvalidRequestId);
        }

        if !self.sms.verify_otp(request_id, &session.prefix, code).await? {
            return Err(AppError::InvalidCode);
        }

        let uid = match self.find_identity_by_phone(phone).await? {
            Some(uid) => uid,
            None => return Err(AppError::not_found("User not found")),
        };

        let token = self.identity.issue_session_token(&uid).await?;
        self.sessions.delete(request_id).await?;

        tracing::info!("OTP verified for requestId {}", request_id);
        Ok(token)
    }

    /// Asks the gateway to resend the code tied to `request_id`. The session
    /// stays open with its original expiry.
    pub async fn resend(&self, request_id: &str) -> Result<()> {
        let session = match self.sessions.get(request_id).await? {
            Some(session) => session,
            None => return Err(AppError::InvalidRequestId),
        };

        self.limiter.check(&session.phone).await?;
        self.sms.resend_otp(request_id).await
    }

    /// Merge-patches a rider profile document. The document id and the
    /// `bookingStatus` pointer are not patchable; the pointer is written by
    /// the booking lifecycle only.
    pub async fn update_profile(&self, uid: &str, mut profile: Document) -> Result<()> {
        profile.remove("_id");
        profile.remove("bookingStatus");
        if profile.is_empty() {
            return Err(AppError::invalid("profileData must not be empty"));
        }

        let matched = self.store.update(USERS_COLLECTION, uid, profile).await?;
        if !matched {
            return Err(AppError::not_found("User not found"));
        }
        Ok(())
    }

    async fn dispatch_otp(&self, phone: &str) -> Result<String> {
        let dispatch = self.sms.send_otp(phone).await?;
        self.sessions
            .put(&dispatch.request_id, phone, &dispatch.prefix)
            .await?;
        Ok(dispatch.request_id)
    }

    /// Resolves the identity id behind a phone number, riders first, then
    /// drivers.
    async fn find_identity_by_phone(&self, phone: &str) -> Result<Option<String>> {
        for collection in [USERS_COLLECTION, DRIVERS_COLLECTION] {
            let matches = self.store.find(collection, doc! { "phone": phone }).await?;
            if let Some(document) = matches.into_iter().next() {
                let uid = document
                    .get_str("_id")
                    .map_err(|_| AppError::internal("Identity document missing _id"))?
                    .to_string();
                return Ok(Some(uid));
            }
        }
        Ok(None)
    }
}
