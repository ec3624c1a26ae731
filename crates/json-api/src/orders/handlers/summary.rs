//! Order Summary Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use shopfusion_app::domain::orders::records::OrderSummary;

use crate::{extensions::*, orders::errors::into_status_error, state::State};

/// Order Summary Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderSummaryResponse {
    pub total_orders: u64,
    pub pending_orders: u64,
    pub delivered_orders: u64,
    pub cancelled_orders: u64,

    /// Sum of totals over paid orders
    pub total_spent: String,
}

impl From<OrderSummary> for OrderSummaryResponse {
    fn from(summary: OrderSummary) -> Self {
        Self {
            total_orders: summary.total_orders,
            pending_orders: summary.pending_orders,
            delivered_orders: summary.delivered_orders,
            cancelled_orders: summary.cancelled_orders,
            total_spent: summary.total_spent.to_string(),
        }
    }
}

/// Order Summary Handler
#[endpoint(
    tags("orders"),
    summary = "Order Summary",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<OrderSummaryResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let summary = state
        .app
        .orders
        .order_summary(user)
        .await
        .map_err(into_status_error)?;

    Ok(Json(summary.into()))
}
