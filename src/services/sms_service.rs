use std::time::Duration;

use async_trait::async_trait;
use base64::{engine::general_purpose, Engine as _};
use reqwest::{header, Client};
use serde::{Deserialize, Serialize};

use crate::errors::{AppError, Result};

/// Correlation data the gateway hands back for one send: the requestId the
/// client must echo on verify, and the code prefix shown in the SMS.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtpDispatch {
    pub request_id: String,
    pub prefix: String,
}

#[async_trait]
pub trait SmsProvider: Send + Sync {
    /// Sends a fresh code to `phone`.
    async fn send_otp(&self, phone: &str) -> Result<OtpDispatch>;

    /// `Ok(false)` when the gateway rejects the code; `Err` only on
    /// transport or gateway failure.
    async fn verify_otp(&self, request_id: &str, prefix: &str, code: &str) -> Result<bool>;

    /// Re-sends the code tied to an open requestId.
    async fn resend_otp(&self, request_id: &str) -> Result<()>;
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendOtpBody<'a> {
    sender_id: &'a str,
    phone_number: &'a str,
    country_code: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct VerifyOtpBody<'a> {
    request_id: &'a str,
    prefix: &'a str,
    code: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ResendOtpBody<'a> {
    request_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct SendOtpEnvelope {
    data: OtpDispatch,
}

/// Hubtel OTP gateway client. Basic-auth credentials, 30s request timeout.
#[derive(Clone)]
pub struct HubtelSmsService {
    client: Client,
    base_url: String,
    sender_id: String,
    auth_header: String,
}

impl HubtelSmsService {
    pub fn new(base_url: String, username: &str, password: &str, sender_id: String) -> Self {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        let credentials = format!("{}:{}", username, password);
        let auth_header = format!("Basic {}", general_purpose::STANDARD.encode(credentials));

        Self {
            client,
            base_url,
            sender_id,
            auth_header,
        }
    }
}

#[async_trait]
impl SmsProvider for HubtelSmsService {
    async fn send_otp(&self, phone: &str) -> Result<OtpDispatch> {
        let url = format!("{}/otp/send", self.base_url);

        let response = self
            .client
            .post(&url)
            .header(header::AUTHORIZATION, self.auth_header.as_str())
            .json(&SendOtpBody {
                sender_id: &self.sender_id,
                phone_number: phone,
                country_code: "GH",
            })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("OTP send failed: {} - {}", status, body);
            return Err(AppError::upstream(format!("OTP send failed: {}", status)));
        }

        let envelope: SendOtpEnvelope = response.json().await?;
        tracing::info!("OTP sent, requestId: {}", envelope.data.request_id);
        Ok(envelope.data)
    }

    async fn verify_otp(&self, request_id: &str, prefix: &str, code: &str) -> Result<bool> {
        let url = format!("{}/otp/verify", self.base_url);

        let response = self
            .client
            .post(&url)
            .header(header::AUTHORIZATION, self.auth_header.as_str())
            .json(&VerifyOtpBody {
                request_id,
                prefix,
                code,
            })
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(true);
        }
        if status.is_client_error() {
            tracing::info!("OTP rejected by gateway for requestId {}", request_id);
            return Ok(false);
        }

        let body = response.text().await.unwrap_or_default();
        tracing::error!("OTP verify failed: {} - {}", status, body);
        Err(AppError::upstream(format!("OTP verify failed: {}", status)))
    }

    async fn resend_otp(&self, request_id: &str) -> Result<()> {
        let url = format!("{}/otp/resend", self.base_url);

        let response = self
            .client
            .post(&url)
            .header(header::AUTHORIZATION, self.auth_header.as_str())
            .json(&ResendOtpBody { request_id })
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("OTP resend failed: {} - {}", status, body);
            return Err(AppError::upstream(format!("OTP resend failed: {}", status)));
        }

        Ok(())
    }
}
