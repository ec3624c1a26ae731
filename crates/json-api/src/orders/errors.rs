//! Order and Checkout Errors

use salvo::http::StatusError;
use tracing::{error, warn};

use shopfusion_app::domain::{checkout::CheckoutError, orders::OrdersServiceError};

use crate::observability::CheckoutOutcome;

pub(crate) fn into_status_error(error: OrdersServiceError) -> StatusError {
    match error {
        OrdersServiceError::NotFound => StatusError::not_found().brief("Order not found"),
        OrdersServiceError::InvalidTransition { .. } => {
            StatusError::conflict().brief(error.to_string())
        }
        OrdersServiceError::AlreadyExists | OrdersServiceError::Conflict => {
            StatusError::conflict().brief("Order conflicts with an existing order")
        }
        OrdersServiceError::InvalidReference
        | OrdersServiceError::MissingRequiredData
        | OrdersServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid order request")
        }
        OrdersServiceError::Sql(source) => {
            error!("order storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}

pub(crate) fn checkout_outcome(error: &CheckoutError) -> CheckoutOutcome {
    match error {
        CheckoutError::EmptyCart => CheckoutOutcome::EmptyCart,
        CheckoutError::InsufficientStock(_) | CheckoutError::ProductNotFound(_) => {
            CheckoutOutcome::InsufficientStock
        }
        CheckoutError::PromoCodeNotFound
        | CheckoutError::PromoCodeExpired
        | CheckoutError::PromoMinimumNotMet { .. } => CheckoutOutcome::PromoRejected,
        CheckoutError::CartChanged => CheckoutOutcome::CartChanged,
        CheckoutError::GatewayUnavailable(_) => CheckoutOutcome::GatewayUnavailable,
        CheckoutError::Conflict
        | CheckoutError::NotFound
        | CheckoutError::InvalidData
        | CheckoutError::Sql(_) => CheckoutOutcome::Failed,
    }
}

pub(crate) fn checkout_status_error(error: CheckoutError) -> StatusError {
    match error {
        CheckoutError::EmptyCart => StatusError::unprocessable_entity().brief("Cart is empty"),
        CheckoutError::ProductNotFound(_) | CheckoutError::PromoCodeNotFound => {
            StatusError::not_found().brief(error.to_string())
        }
        CheckoutError::InsufficientStock(_) | CheckoutError::CartChanged => {
            StatusError::conflict().brief(error.to_string())
        }
        CheckoutError::PromoCodeExpired | CheckoutError::PromoMinimumNotMet { .. } => {
            StatusError::unprocessable_entity().brief(error.to_string())
        }
        CheckoutError::Conflict => {
            StatusError::conflict().brief("Could not allocate an order number, please retry")
        }
        CheckoutError::GatewayUnavailable(source) => {
            let timed_out = source.is_timeout();

            warn!(timed_out, "payment gateway unavailable: {source}");

            let brief = if timed_out {
                "Payment gateway timed out"
            } else {
                "Payment gateway unavailable"
            };

            StatusError::service_unavailable().brief(brief)
        }
        CheckoutError::NotFound => StatusError::not_found(),
        CheckoutError::InvalidData => StatusError::bad_request().brief("Invalid order request"),
        CheckoutError::Sql(source) => {
            error!("checkout storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
