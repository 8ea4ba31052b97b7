//! Razorpay gateway client.
//!
//! Two responsibilities:
//!
//! - Create orders against the Razorpay Orders API (Basic auth with the
//!   key ID and secret).
//! - Verify checkout confirmations by recomputing the HMAC-SHA256 signature
//!   over `order_id|payment_id` with the key secret.
//!
//! Verification is the payment oracle: a booking only completes when the
//! signature matches. Anything else (mismatch, gateway error, timeout) is a
//! failure, never a silent success.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use hmac::{Hmac, Mac};
use quickcar_core::Amount;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use thiserror::Error;
use tracing::debug;

use crate::config::RazorpayConfig;

const ORDERS_URL: &str = "https://api.razorpay.com/v1/orders";

/// Errors from gateway operations.
#[derive(Debug, Error)]
pub enum RazorpayError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Gateway rejected the request: {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Invalid key material: {0}")]
    KeyMaterial(String),
}

/// Order creation request body, amounts in paise.
#[derive(Debug, Serialize)]
struct CreateOrderRequest<'a> {
    amount: i64,
    currency: &'a str,
    receipt: &'a str,
    notes: &'a serde_json::Value,
}

/// A created gateway order.
#[derive(Debug, Clone, Deserialize)]
pub struct Order {
    /// Gateway order ID (e.g. `order_NXhj2...`).
    pub id: String,
    /// Amount in paise, echoed back.
    pub amount: i64,
    /// ISO currency code.
    pub currency: String,
    /// Our receipt reference.
    pub receipt: String,
    /// Gateway order status.
    pub status: String,
}

/// Checkout confirmation posted back by the client after payment.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfirmation {
    pub razorpay_order_id: String,
    pub razorpay_payment_id: String,
    pub razorpay_signature: String,
}

/// Razorpay API client.
#[derive(Clone)]
pub struct RazorpayClient {
    http: reqwest::Client,
    config: RazorpayConfig,
}

impl RazorpayClient {
    /// Create a new client.
    #[must_use]
    pub fn new(config: RazorpayConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// The public key ID, safe to hand to the checkout page.
    #[must_use]
    pub fn key_id(&self) -> &str {
        &self.config.key_id
    }

    /// Create an order for the given amount.
    ///
    /// The receipt is `receipt_<unix millis>`, matching what the checkout
    /// shows the customer.
    ///
    /// # Errors
    ///
    /// Returns `RazorpayError::Http` on transport failure and
    /// `RazorpayError::Api` when the gateway rejects the request.
    pub async fn create_order(
        &self,
        amount: Amount,
        notes: serde_json::Value,
    ) -> Result<Order, RazorpayError> {
        let receipt = format!("receipt_{}", chrono::Utc::now().timestamp_millis());

        let request = CreateOrderRequest {
            amount: amount.as_paise(),
            currency: "INR",
            receipt: &receipt,
            notes: &notes,
        };

        let response = self
            .http
            .post(ORDERS_URL)
            .header("Authorization", self.basic_auth_header())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RazorpayError::Api {
                status: status.as_u16(),
                body,
            });
        }

        let order: Order = response.json().await?;
        debug!(
            order_id = %order.id,
            amount = order.amount,
            receipt = %order.receipt,
            status = %order.status,
            "gateway order created"
        );
        Ok(order)
    }

    /// Verify a checkout confirmation signature.
    ///
    /// Recomputes HMAC-SHA256 over `order_id|payment_id` with the key secret
    /// and compares it in constant time against the hex signature from the
    /// checkout. Returns `true` only on an exact match.
    ///
    /// # Errors
    ///
    /// Returns `RazorpayError::KeyMaterial` if the key secret cannot be used
    /// as an HMAC key.
    pub fn verify_signature(&self, confirmation: &PaymentConfirmation) -> Result<bool, RazorpayError> {
        verify_signature_with_secret(
            self.config.key_secret.expose_secret(),
            &confirmation.razorpay_order_id,
            &confirmation.razorpay_payment_id,
            &confirmation.razorpay_signature,
        )
    }

    fn basic_auth_header(&self) -> String {
        let credentials = format!(
            "{}:{}",
            self.config.key_id,
            self.config.key_secret.expose_secret()
        );
        format!("Basic {}", BASE64.encode(credentials))
    }
}

fn verify_signature_with_secret(
    secret: &str,
    order_id: &str,
    payment_id: &str,
    signature: &str,
) -> Result<bool, RazorpayError> {
    let payload = format!("{order_id}|{payment_id}");

    let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes())
        .map_err(|e| RazorpayError::KeyMaterial(e.to_string()))?;
    mac.update(payload.as_bytes());
    let expected = hex::encode(mac.finalize().into_bytes());

    Ok(constant_time_compare(&expected, signature))
}

/// Constant-time string comparison to prevent timing attacks.
fn constant_time_compare(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result: u8 = 0;
    for (x, y) in a.bytes().zip(b.bytes()) {
        result |= x ^ y;
    }

    result == 0
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn sign(secret: &str, order_id: &str, payment_id: &str) -> String {
        let mut mac = Hmac::<Sha256>::new_from_slice(secret.as_bytes()).unwrap();
        mac.update(format!("{order_id}|{payment_id}").as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    #[test]
    fn test_verify_accepts_valid_signature() {
        let signature = sign("test_secret", "order_abc123", "pay_xyz789");
        let ok =
            verify_signature_with_secret("test_secret", "order_abc123", "pay_xyz789", &signature)
                .unwrap();
        assert!(ok);
    }

    #[test]
    fn test_verify_rejects_tampered_payment_id() {
        let signature = sign("test_secret", "order_abc123", "pay_xyz789");
        let ok =
            verify_signature_with_secret("test_secret", "order_abc123", "pay_other", &signature)
                .unwrap();
        assert!(!ok);
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let signature = sign("other_secret", "order_abc123", "pay_xyz789");
        let ok =
            verify_signature_with_secret("test_secret", "order_abc123", "pay_xyz789", &signature)
                .unwrap();
        assert!(!ok);
    }

    #[test]
    fn test_verify_rejects_truncated_signature() {
        let mut signature = sign("test_secret", "order_abc123", "pay_xyz789");
        signature.truncate(10);
        let ok =
            verify_signature_with_secret("test_secret", "order_abc123", "pay_xyz789", &signature)
                .unwrap();
        assert!(!ok);
    }

    #[test]
    fn test_constant_time_compare() {
        assert!(constant_time_compare("abc", "abc"));
        assert!(!constant_time_compare("abc", "abd"));
        assert!(!constant_time_compare("abc", "ab"));
    }
}
