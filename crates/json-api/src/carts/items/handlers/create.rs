//! Add Cart Item Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shopfusion_app::domain::carts::{data::NewCartItem, records::AddItemOutcome};

use crate::{
    carts::{errors::into_status_error, items::CartItemResponse},
    extensions::*,
    state::State,
};

const fn default_quantity() -> u32 {
    1
}

/// Add Cart Item Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AddCartItemRequest {
    pub product_uuid: Uuid,

    /// Units to add; ignored when the product is already in the cart
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

impl From<AddCartItemRequest> for NewCartItem {
    fn from(request: AddCartItemRequest) -> Self {
        NewCartItem {
            product_uuid: request.product_uuid.into(),
            quantity: request.quantity,
        }
    }
}

/// Cart Item Added Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartItemAddedResponse {
    /// One of `added`, `restored` or `already_present`
    pub outcome: String,

    pub item: CartItemResponse,
}

fn outcome_name(outcome: AddItemOutcome) -> &'static str {
    match outcome {
        AddItemOutcome::Added => "added",
        AddItemOutcome::Restored => "restored",
        AddItemOutcome::AlreadyPresent => "already_present",
    }
}

/// Add Cart Item Handler
///
/// Adding a product that is already in the cart leaves its quantity alone.
#[endpoint(
    tags("cart"),
    summary = "Add Item to Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Cart item added or restored"),
        (status_code = StatusCode::OK, description = "Product already in cart"),
        (status_code = StatusCode::NOT_FOUND, description = "Product not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<AddCartItemRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<CartItemAddedResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let added = state
        .app
        .carts
        .add_item(user, json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    if added.outcome == AddItemOutcome::AlreadyPresent {
        res.status_code(StatusCode::OK);
    } else {
        res.add_header(
            LOCATION,
            format!("/cart/items/{}", added.item.product_uuid),
            true,
        )
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);
    }

    Ok(Json(CartItemAddedResponse {
        outcome: outcome_name(added.outcome).to_string(),
        item: added.item.into(),
    }))
}
