//! Validate Promo Code Handler

use std::sync::Arc;

use rust_decimal::Decimal;
use salvo::{
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use shopfusion_app::domain::promo_codes::records::AppliedPromo;

use crate::{extensions::*, promo_codes::errors::into_status_error, state::State};

/// Validate Promo Code Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ValidatePromoCodeRequest {
    pub code: String,

    /// Cart subtotal as a decimal string, e.g. `"40.00"`
    pub subtotal: String,
}

/// Promo Code Validation Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PromoCodeValidationResponse {
    pub code: String,

    /// `percentage` or `fixed`
    pub discount_type: String,

    pub discount_value: String,

    /// Discount the code would give on the submitted subtotal
    pub discount_amount: String,
}

impl From<AppliedPromo> for PromoCodeValidationResponse {
    fn from(promo: AppliedPromo) -> Self {
        Self {
            code: promo.code,
            discount_type: promo.discount.to_str().to_string(),
            discount_value: promo.discount.value().to_string(),
            discount_amount: promo.discount_amount.to_string(),
        }
    }
}

/// Validate Promo Code Handler
///
/// Checks a code against a subtotal without recording a use.
#[endpoint(
    tags("promo-codes"),
    summary = "Validate Promo Code",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Promo code applies"),
        (status_code = StatusCode::NOT_FOUND, description = "Unknown promo code"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Expired or minimum not met"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<ValidatePromoCodeRequest>,
    depot: &mut Depot,
) -> Result<Json<PromoCodeValidationResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    depot.user_uuid_or_401()?;

    let request = json.into_inner();
    let code = request.code.trim().to_string();

    if code.is_empty() {
        return Err(StatusError::bad_request().brief("Promo code is required"));
    }

    let subtotal = request
        .subtotal
        .trim()
        .parse::<Decimal>()
        .or_400("could not parse subtotal")?;

    if subtotal.is_sign_negative() {
        return Err(StatusError::bad_request().brief("Subtotal cannot be negative"));
    }

    let applied = state
        .app
        .promo_codes
        .validate(code, subtotal)
        .await
        .map_err(into_status_error)?;

    Ok(Json(applied.into()))
}
