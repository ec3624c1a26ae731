//! Payment gateway boundary.

use async_trait::async_trait;
use mockall::automock;
use rust_decimal::Decimal;

use crate::domain::payments::errors::PaymentGatewayError;

/// A request to collect `amount` for one order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentRequest {
    pub amount: Decimal,
    pub currency: String,
    /// Our identifier for the payment, echoed back by the gateway.
    pub receipt: String,
}

/// The gateway's handle for a created payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentOrder {
    pub reference: String,
}

#[automock]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Ask the gateway to open a payment for the request.
    async fn create_payment_order(
        &self,
        request: PaymentRequest,
    ) -> Result<PaymentOrder, PaymentGatewayError>;
}

/// Gateway used when no credentials are configured.
///
/// Every online payment fails, so only cash on delivery can be checked out.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnconfiguredGateway;

#[async_trait]
impl PaymentGateway for UnconfiguredGateway {
    async fn create_payment_order(
        &self,
        _request: PaymentRequest,
    ) -> Result<PaymentOrder, PaymentGatewayError> {
        Err(PaymentGatewayError::NotConfigured)
    }
}
