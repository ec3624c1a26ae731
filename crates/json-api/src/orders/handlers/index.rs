//! Order Index Handler

use std::sync::Arc;

use jiff::Timestamp;
use rust_decimal::Decimal;
use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use shopfusion_app::domain::orders::{
    data::OrderFilter,
    records::{OrderStatus, PaymentStatus},
};

use crate::{
    extensions::*,
    orders::{errors::into_status_error, get::OrderResponse},
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrdersResponse {
    /// The caller's orders, newest first
    pub orders: Vec<OrderResponse>,
}

/// Order Index Handler
///
/// Every filter is optional; timestamps are RFC 3339 and totals are decimal
/// strings.
#[endpoint(
    tags("orders"),
    summary = "List Orders",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(
    status: QueryParam<String, false>,
    payment_status: QueryParam<String, false>,
    created_after: QueryParam<String, false>,
    created_before: QueryParam<String, false>,
    total_min: QueryParam<String, false>,
    total_max: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<OrdersResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let filter = OrderFilter {
        status: status.parse_optional::<OrderStatus>("status")?,
        payment_status: payment_status.parse_optional::<PaymentStatus>("payment_status")?,
        created_after: created_after.parse_optional::<Timestamp>("created_after")?,
        created_before: created_before.parse_optional::<Timestamp>("created_before")?,
        total_min: total_min.parse_optional::<Decimal>("total_min")?,
        total_max: total_max.parse_optional::<Decimal>("total_max")?,
    };

    let orders = state
        .app
        .orders
        .list_orders(user, filter)
        .await
        .map_err(into_status_error)?;

    Ok(Json(OrdersResponse {
        orders: orders.into_iter().map(Into::into).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use shopfusion_app::domain::orders::{MockOrdersService, records::OrderUuid};

    use crate::test_helpers::{MockServices, TEST_USER_UUID, make_order, money, service};

    use super::*;

    fn make_service(orders: MockOrdersService) -> Service {
        service(
            MockServices {
                orders,
                ..MockServices::default()
            },
            Router::with_path("orders").get(handler),
        )
    }

    #[tokio::test]
    async fn test_index_without_filters() -> TestResult {
        let newest = OrderUuid::new();
        let mut orders = MockOrdersService::new();

        orders
            .expect_list_orders()
            .once()
            .withf(|user, filter| *user == TEST_USER_UUID && *filter == OrderFilter::default())
            .return_once(move |_, _| Ok(vec![make_order(newest, OrderStatus::Pending)]));

        let response: OrdersResponse = TestClient::get("http://example.com/orders")
            .send(&make_service(orders))
            .await
            .take_json()
            .await?;

        assert_eq!(response.orders.len(), 1);
        assert_eq!(
            response.orders.first().map(|order| order.uuid),
            Some(newest.into_uuid())
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_index_forwards_filters() -> TestResult {
        let after: Timestamp = "2026-03-01T00:00:00Z".parse()?;

        let expected = OrderFilter {
            status: Some(OrderStatus::Delivered),
            payment_status: Some(PaymentStatus::Paid),
            created_after: Some(after),
            created_before: None,
            total_min: Some(money("10.00")),
            total_max: Some(money("100")),
        };

        let mut orders = MockOrdersService::new();

        orders
            .expect_list_orders()
            .once()
            .withf(move |_, filter| *filter == expected)
            .return_once(|_, _| Ok(vec![]));

        let res = TestClient::get(
            "http://example.com/orders?status=delivered&payment_status=paid\
             &created_after=2026-03-01T00:00:00Z&total_min=10.00&total_max=100",
        )
        .send(&make_service(orders))
        .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_index_rejects_unknown_status() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders.expect_list_orders().never();

        let res = TestClient::get("http://example.com/orders?status=lost")
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
