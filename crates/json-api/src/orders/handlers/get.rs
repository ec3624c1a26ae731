//! Get Order Handler

use std::{string::ToString, sync::Arc};

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shopfusion_app::domain::orders::records::{ContactDetails, OrderItemRecord, OrderRecord};

use crate::{extensions::*, orders::errors::into_status_error, state::State};

/// Name, phone and address for shipping or billing.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub(crate) struct ContactDetailsPayload {
    pub name: String,
    pub phone: String,
    pub address: String,
}

impl From<ContactDetails> for ContactDetailsPayload {
    fn from(details: ContactDetails) -> Self {
        Self {
            name: details.name,
            phone: details.phone,
            address: details.address,
        }
    }
}

impl From<ContactDetailsPayload> for ContactDetails {
    fn from(payload: ContactDetailsPayload) -> Self {
        Self {
            name: payload.name,
            phone: payload.phone,
            address: payload.address,
        }
    }
}

/// Order Item Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderItemResponse {
    pub uuid: Uuid,

    /// `None` once the product has been removed from the catalog
    pub product_uuid: Option<Uuid>,

    /// Product name at the time of purchase
    pub product_name: String,

    /// Unit price at the time of purchase
    pub product_price: String,

    pub quantity: u32,

    pub subtotal: String,
}

impl From<OrderItemRecord> for OrderItemResponse {
    fn from(item: OrderItemRecord) -> Self {
        Self {
            uuid: item.uuid.into(),
            product_uuid: item.product_uuid.map(Into::into),
            product_name: item.product_name,
            product_price: item.product_price.to_string(),
            quantity: item.quantity,
            subtotal: item.subtotal.to_string(),
        }
    }
}

/// Order Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderResponse {
    pub uuid: Uuid,

    /// Human readable reference, e.g. `ORD-20260301-7KQ2M9XA`
    pub order_number: String,

    pub status: String,
    pub payment_status: String,
    pub payment_method: String,
    pub payment_reference: Option<String>,
    pub promo_code: Option<String>,

    pub subtotal: String,
    pub tax_amount: String,
    pub shipping_amount: String,
    pub discount_amount: String,
    pub total_amount: String,

    pub shipping: ContactDetailsPayload,
    pub billing: ContactDetailsPayload,

    pub tracking_number: Option<String>,

    pub items: Vec<OrderItemResponse>,

    pub created_at: String,
    pub updated_at: String,
    pub shipped_at: Option<String>,
    pub delivered_at: Option<String>,
}

impl From<OrderRecord> for OrderResponse {
    fn from(order: OrderRecord) -> Self {
        Self {
            uuid: order.uuid.into(),
            order_number: order.order_number,
            status: order.status.to_str().to_string(),
            payment_status: order.payment_status.to_str().to_string(),
            payment_method: order.payment_method.to_str().to_string(),
            payment_reference: order.payment_reference,
            promo_code: order.promo_code,
            subtotal: order.subtotal.to_string(),
            tax_amount: order.tax_amount.to_string(),
            shipping_amount: order.shipping_amount.to_string(),
            discount_amount: order.discount_amount.to_string(),
            total_amount: order.total_amount.to_string(),
            shipping: order.shipping.into(),
            billing: order.billing.into(),
            tracking_number: order.tracking_number,
            items: order.items.into_iter().map(Into::into).collect(),
            created_at: order.created_at.to_string(),
            updated_at: order.updated_at.to_string(),
            shipped_at: order.shipped_at.as_ref().map(ToString::to_string),
            delivered_at: order.delivered_at.as_ref().map(ToString::to_string),
        }
    }
}

/// Get Order Handler
///
/// Returns one of the caller's orders with its items.
#[endpoint(
    tags("orders"),
    summary = "Get Order",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    order: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let order = state
        .app
        .orders
        .get_order(user, order.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(order.into()))
}
