//! Promo Code Errors

use salvo::http::StatusError;
use tracing::error;

use shopfusion_app::domain::promo_codes::PromoCodesServiceError;

pub(crate) fn into_status_error(error: PromoCodesServiceError) -> StatusError {
    match error {
        PromoCodesServiceError::NotFound => StatusError::not_found().brief("Invalid promo code"),
        PromoCodesServiceError::Expired => {
            StatusError::unprocessable_entity().brief("Promo code is expired or inactive")
        }
        PromoCodesServiceError::MinimumNotMet { minimum } => StatusError::unprocessable_entity()
            .brief(format!("Minimum order amount of {minimum} required")),
        PromoCodesServiceError::AlreadyExists => {
            StatusError::conflict().brief("Promo code already exists")
        }
        PromoCodesServiceError::MissingRequiredData | PromoCodesServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid promo code request")
        }
        PromoCodesServiceError::Sql(source) => {
            error!("promo code storage error: {source}");

            StatusError::internal_server_error()
        }
    }
}
