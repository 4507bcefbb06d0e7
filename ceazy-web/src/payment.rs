//! Hosted checkout session client
//!
//! Creates checkout sessions against a Stripe-style payment processor.
//! The buyer completes payment with the processor directly and gets
//! redirected back; this service only creates the session and validates
//! purchasability, so no payment instrument data ever passes through it.

use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

const STRIPE_BASE_URL: &str = "https://api.stripe.com";
const USER_AGENT: &str = concat!("ceazy-web/", env!("CARGO_PKG_VERSION"));
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Checkout client errors
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Request could not be sent or timed out
    #[error("Network error: {0}")]
    Network(String),

    /// Processor rejected the request
    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    /// Processor returned a body we could not decode
    #[error("Parse error: {0}")]
    Parse(String),
}

/// Everything the processor needs to build a hosted checkout session
#[derive(Debug, Clone, PartialEq)]
pub struct CheckoutRequest {
    /// Amount in the currency's minor units (e.g. cents)
    pub amount_minor: i64,
    pub currency: String,
    pub product_name: String,
    pub description: String,
    pub success_url: String,
    pub cancel_url: String,
    /// Carried in session metadata so the redirect can be reconciled
    pub album_id: i64,
}

/// Opaque session handle returned by the processor
#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    /// Hosted checkout page to redirect the buyer to
    pub url: Option<String>,
}

/// Seam between the handlers and the payment processor
#[async_trait]
pub trait CheckoutGateway: Send + Sync {
    async fn create_session(
        &self,
        request: CheckoutRequest,
    ) -> Result<CheckoutSession, CheckoutError>;
}

/// Stripe Checkout implementation of [`CheckoutGateway`]
pub struct StripeCheckout {
    http_client: reqwest::Client,
    secret_key: String,
    base_url: String,
}

impl StripeCheckout {
    pub fn new(secret_key: String) -> Result<Self, CheckoutError> {
        Self::with_base_url(secret_key, STRIPE_BASE_URL.to_string())
    }

    /// Client pointed at an alternate endpoint (sandbox or local test server)
    pub fn with_base_url(secret_key: String, base_url: String) -> Result<Self, CheckoutError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| CheckoutError::Network(e.to_string()))?;

        Ok(Self {
            http_client,
            secret_key,
            base_url,
        })
    }
}

/// Error body shape returned by the processor
#[derive(Debug, Deserialize)]
struct ProcessorErrorBody {
    error: ProcessorError,
}

#[derive(Debug, Deserialize)]
struct ProcessorError {
    message: Option<String>,
}

#[async_trait]
impl CheckoutGateway for StripeCheckout {
    async fn create_session(
        &self,
        request: CheckoutRequest,
    ) -> Result<CheckoutSession, CheckoutError> {
        let amount = request.amount_minor.to_string();
        let album_id = request.album_id.to_string();

        // The processor's form encoding uses bracketed keys for nesting
        let params: Vec<(&str, &str)> = vec![
            ("mode", "payment"),
            ("payment_method_types[0]", "card"),
            ("line_items[0][quantity]", "1"),
            ("line_items[0][price_data][currency]", &request.currency),
            ("line_items[0][price_data][unit_amount]", &amount),
            ("line_items[0][price_data][product_data][name]", &request.product_name),
            (
                "line_items[0][price_data][product_data][description]",
                &request.description,
            ),
            ("success_url", &request.success_url),
            ("cancel_url", &request.cancel_url),
            ("metadata[albumId]", &album_id),
            ("metadata[albumTitle]", &request.product_name),
        ];

        tracing::debug!(
            amount_minor = request.amount_minor,
            currency = %request.currency,
            album_id = request.album_id,
            "creating checkout session"
        );

        let response = self
            .http_client
            .post(format!("{}/v1/checkout/sessions", self.base_url))
            .bearer_auth(&self.secret_key)
            .form(&params)
            .send()
            .await
            .map_err(|e| CheckoutError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ProcessorErrorBody>()
                .await
                .ok()
                .and_then(|body| body.error.message)
                .unwrap_or_else(|| format!("processor returned status {status}"));
            return Err(CheckoutError::Api {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<CheckoutSession>()
            .await
            .map_err(|e| CheckoutError::Parse(e.to_string()))
    }
}
