//! Payment gateway errors.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PaymentGatewayError {
    #[error("payment gateway is not configured")]
    NotConfigured,

    #[error("payment amount cannot be represented in minor units")]
    InvalidAmount,

    #[error("payment gateway request failed")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected payment gateway response: {0}")]
    UnexpectedResponse(String),
}

impl PaymentGatewayError {
    /// Whether the request gave up waiting for the gateway.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Transport(error) if error.is_timeout())
    }
}
