//! Checkout errors.

use rust_decimal::Decimal;
use sqlx::{
    Error,
    error::{DatabaseError, ErrorKind},
};
use thiserror::Error;

use crate::domain::{
    payments::PaymentGatewayError, products::records::ProductUuid,
    promo_codes::errors::PromoCodesServiceError,
};

#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,

    #[error("product {0} is no longer available")]
    ProductNotFound(ProductUuid),

    #[error("insufficient stock for product {0}")]
    InsufficientStock(ProductUuid),

    #[error("invalid promo code")]
    PromoCodeNotFound,

    #[error("promo code is expired or inactive")]
    PromoCodeExpired,

    #[error("minimum order amount of {minimum} required")]
    PromoMinimumNotMet { minimum: Decimal },

    #[error("cart changed during checkout")]
    CartChanged,

    #[error("could not allocate a unique order number")]
    Conflict,

    #[error("payment gateway unavailable")]
    GatewayUnavailable(#[source] PaymentGatewayError),

    #[error("not found")]
    NotFound,

    #[error("invalid data")]
    InvalidData,

    #[error("storage error")]
    Sql(#[source] Error),
}

impl From<Error> for CheckoutError {
    fn from(error: Error) -> Self {
        if matches!(error, Error::RowNotFound) {
            return Self::NotFound;
        }

        match error.as_database_error().map(DatabaseError::kind) {
            Some(ErrorKind::CheckViolation | ErrorKind::NotNullViolation) => Self::InvalidData,
            Some(_) | None => Self::Sql(error),
        }
    }
}

impl From<PaymentGatewayError> for CheckoutError {
    fn from(error: PaymentGatewayError) -> Self {
        Self::GatewayUnavailable(error)
    }
}

impl From<PromoCodesServiceError> for CheckoutError {
    fn from(error: PromoCodesServiceError) -> Self {
        match error {
            PromoCodesServiceError::NotFound => Self::PromoCodeNotFound,
            PromoCodesServiceError::Expired => Self::PromoCodeExpired,
            PromoCodesServiceError::MinimumNotMet { minimum } => {
                Self::PromoMinimumNotMet { minimum }
            }
            PromoCodesServiceError::Sql(error) => Self::Sql(error),
            PromoCodesServiceError::AlreadyExists
            | PromoCodesServiceError::MissingRequiredData
            | PromoCodesServiceError::InvalidData => Self::InvalidData,
        }
    }
}
