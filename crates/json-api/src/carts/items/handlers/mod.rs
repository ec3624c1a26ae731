//! Cart Item Handlers

pub(crate) mod create;
pub(crate) mod delete;
pub(crate) mod update;

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shopfusion_app::domain::carts::records::CartItemRecord;

/// Cart Item Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartItemResponse {
    /// The unique identifier of the cart item
    pub uuid: Uuid,

    pub product_uuid: Uuid,

    pub quantity: u32,

    /// The date and time the item was last changed
    pub updated_at: String,
}

impl From<CartItemRecord> for CartItemResponse {
    fn from(item: CartItemRecord) -> Self {
        Self {
            uuid: item.uuid.into(),
            product_uuid: item.product_uuid.into(),
            quantity: item.quantity,
            updated_at: item.updated_at.to_string(),
        }
    }
}
