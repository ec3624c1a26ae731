//! Razorpay-compatible payment gateway client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::{Decimal, RoundingStrategy, prelude::ToPrimitive};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::domain::payments::{
    errors::PaymentGatewayError,
    gateway::{PaymentGateway, PaymentOrder, PaymentRequest},
};

/// Configuration for connecting to the gateway.
#[derive(Debug, Clone)]
pub struct RazorpayConfig {
    /// API base URL, e.g. `"https://api.razorpay.com"`.
    pub base_url: String,

    pub key_id: String,

    pub key_secret: String,

    /// Upper bound on a whole request, connect included.
    pub timeout: Duration,
}

/// HTTP client for creating gateway payment orders.
#[derive(Debug, Clone)]
pub struct RazorpayGateway {
    config: RazorpayConfig,
    http: Client,
}

impl RazorpayGateway {
    /// Create a new client from the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: RazorpayConfig) -> Result<Self, PaymentGatewayError> {
        let http = Client::builder().timeout(config.timeout).build()?;

        Ok(Self { config, http })
    }
}

#[derive(Debug, Serialize)]
struct CreateOrderBody<'a> {
    amount: i64,
    currency: &'a str,
    receipt: &'a str,
    payment_capture: u8,
}

#[derive(Debug, Deserialize)]
struct CreateOrderResponse {
    id: String,
}

/// Convert an amount to minor units (paise, cents).
pub(crate) fn to_minor_units(amount: Decimal) -> Result<i64, PaymentGatewayError> {
    if amount.is_sign_negative() {
        return Err(PaymentGatewayError::InvalidAmount);
    }

    (amount * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_i64()
        .ok_or(PaymentGatewayError::InvalidAmount)
}

#[async_trait]
impl PaymentGateway for RazorpayGateway {
    #[tracing::instrument(
        name = "payments.razorpay.create_payment_order",
        skip(self, request),
        fields(receipt = %request.receipt, currency = %request.currency),
        err
    )]
    async fn create_payment_order(
        &self,
        request: PaymentRequest,
    ) -> Result<PaymentOrder, PaymentGatewayError> {
        let url = format!("{}/v1/orders", self.config.base_url.trim_end_matches('/'));

        let body = CreateOrderBody {
            amount: to_minor_units(request.amount)?,
            currency: &request.currency,
            receipt: &request.receipt,
            payment_capture: 1,
        };

        let response = self
            .http
            .post(&url)
            .basic_auth(&self.config.key_id, Some(&self.config.key_secret))
            .json(&body)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(PaymentGatewayError::UnexpectedResponse(format!(
                "create order failed with status {status}: {text}"
            )));
        }

        let parsed: CreateOrderResponse = response.json().await?;

        info!(reference = %parsed.id, "created payment order");

        Ok(PaymentOrder {
            reference: parsed.id,
        })
    }
}
