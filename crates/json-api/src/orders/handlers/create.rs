//! Place Order Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use shopfusion_app::domain::{checkout::PlaceOrder, orders::records::PaymentMethod};

use crate::{
    extensions::*,
    observability::{CheckoutOutcome, observe_checkout},
    orders::{
        errors::{checkout_outcome, checkout_status_error},
        get::{ContactDetailsPayload, OrderResponse},
    },
    state::State,
};

/// Place Order Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PlaceOrderRequest {
    pub shipping: ContactDetailsPayload,

    /// Defaults to the shipping details
    pub billing: Option<ContactDetailsPayload>,

    /// `cash_on_delivery`, `card`, `upi`, `net_banking` or `wallet`
    pub payment_method: String,

    pub promo_code: Option<String>,
}

impl PlaceOrderRequest {
    fn into_place_order(self) -> Result<PlaceOrder, StatusError> {
        let payment_method = self
            .payment_method
            .trim()
            .parse::<PaymentMethod>()
            .or_400("invalid payment method")?;

        let billing = self.billing.unwrap_or_else(|| self.shipping.clone());

        Ok(PlaceOrder {
            shipping: self.shipping.into(),
            billing: billing.into(),
            payment_method,
            promo_code: self.promo_code,
        })
    }
}

/// Place Order Handler
///
/// Turns the caller's cart into an order. Online payment methods are charged
/// through the payment gateway before anything is written.
#[endpoint(
    tags("orders"),
    summary = "Place Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Order placed"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::FORBIDDEN, description = "Email not verified"),
        (status_code = StatusCode::NOT_FOUND, description = "Unknown product or promo code"),
        (status_code = StatusCode::CONFLICT, description = "Insufficient stock or cart changed"),
        (status_code = StatusCode::UNPROCESSABLE_ENTITY, description = "Empty cart or promo code rejected"),
        (status_code = StatusCode::SERVICE_UNAVAILABLE, description = "Payment gateway unavailable"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "orders.create",
    skip(json, depot, res),
    fields(user_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<PlaceOrderRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.verified_user_or_403()?;

    tracing::Span::current().record("user_uuid", tracing::field::display(user));

    let request = json.into_inner().into_place_order()?;

    let order = match state.app.checkout.place_order(user, request).await {
        Ok(order) => order,
        Err(error) => {
            observe_checkout(checkout_outcome(&error));

            return Err(checkout_status_error(error));
        }
    };

    observe_checkout(CheckoutOutcome::Placed);

    res.add_header(LOCATION, format!("/orders/{}", order.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(order.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::{Value, json};
    use testresult::TestResult;

    use shopfusion_app::domain::{
        checkout::{CheckoutError, MockCheckoutService},
        orders::records::{OrderStatus, OrderUuid},
        payments::PaymentGatewayError,
        products::records::ProductUuid,
    };

    use crate::test_helpers::{
        MockServices, TEST_USER_UUID, contact, make_order, service, unverified_service,
    };

    use super::*;

    fn route() -> Router {
        Router::with_path("orders").post(handler)
    }

    fn make_service(checkout: MockCheckoutService) -> Service {
        service(
            MockServices {
                checkout,
                ..MockServices::default()
            },
            route(),
        )
    }

    fn body(payment_method: &str) -> Value {
        json!({
            "shipping": {
                "name": "Asha Rao",
                "phone": "+91 98765 43210",
                "address": "12 MG Road, Bengaluru"
            },
            "payment_method": payment_method,
            "promo_code": null
        })
    }

    #[tokio::test]
    async fn test_place_order_returns_201() -> TestResult {
        let uuid = OrderUuid::new();
        let mut checkout = MockCheckoutService::new();

        checkout
            .expect_place_order()
            .once()
            .withf(|user, request| {
                *user == TEST_USER_UUID
                    && request.payment_method == PaymentMethod::CashOnDelivery
                    && request.billing == contact()
                    && request.shipping == contact()
            })
            .return_once(move |_, _| Ok(make_order(uuid, OrderStatus::Pending)));

        let mut res = TestClient::post("http://example.com/orders")
            .json(&body("cash_on_delivery"))
            .send(&make_service(checkout))
            .await;

        let order: OrderResponse = res.take_json().await?;
        let location = res.headers().get("location").and_then(|v| v.to_str().ok());

        assert_eq!(res.status_code, Some(StatusCode::CREATED));
        assert_eq!(location, Some(format!("/orders/{uuid}").as_str()));
        assert_eq!(order.subtotal, "45.00");
        assert_eq!(order.tax_amount, "4.50");
        assert_eq!(order.shipping_amount, "10.00");
        assert_eq!(order.total_amount, "59.50");

        Ok(())
    }

    #[tokio::test]
    async fn test_unverified_user_returns_403() -> TestResult {
        let mut checkout = MockCheckoutService::new();

        checkout.expect_place_order().never();

        let res = TestClient::post("http://example.com/orders")
            .json(&body("cash_on_delivery"))
            .send(&unverified_service(
                MockServices {
                    checkout,
                    ..MockServices::default()
                },
                route(),
            ))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::FORBIDDEN));

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_payment_method_returns_400() -> TestResult {
        let mut checkout = MockCheckoutService::new();

        checkout.expect_place_order().never();

        let res = TestClient::post("http://example.com/orders")
            .json(&body("cheque"))
            .send(&make_service(checkout))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[tokio::test]
    async fn test_empty_cart_returns_422() -> TestResult {
        let mut checkout = MockCheckoutService::new();

        checkout
            .expect_place_order()
            .once()
            .return_once(|_, _| Err(CheckoutError::EmptyCart));

        let res = TestClient::post("http://example.com/orders")
            .json(&body("cash_on_delivery"))
            .send(&make_service(checkout))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::UNPROCESSABLE_ENTITY));

        Ok(())
    }

    #[tokio::test]
    async fn test_insufficient_stock_returns_409() -> TestResult {
        let mut checkout = MockCheckoutService::new();

        checkout
            .expect_place_order()
            .once()
            .return_once(|_, _| Err(CheckoutError::InsufficientStock(ProductUuid::new())));

        let res = TestClient::post("http://example.com/orders")
            .json(&body("cash_on_delivery"))
            .send(&make_service(checkout))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CONFLICT));

        Ok(())
    }

    #[tokio::test]
    async fn test_gateway_failure_returns_503() -> TestResult {
        let mut checkout = MockCheckoutService::new();

        checkout
            .expect_place_order()
            .once()
            .withf(|_, request| request.payment_method == PaymentMethod::Upi)
            .return_once(|_, _| {
                Err(CheckoutError::GatewayUnavailable(
                    PaymentGatewayError::NotConfigured,
                ))
            });

        let res = TestClient::post("http://example.com/orders")
            .json(&body("upi"))
            .send(&make_service(checkout))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::SERVICE_UNAVAILABLE));

        Ok(())
    }

    #[tokio::test]
    async fn test_explicit_billing_and_promo_are_forwarded() -> TestResult {
        let mut checkout = MockCheckoutService::new();

        checkout
            .expect_place_order()
            .once()
            .withf(|_, request| {
                request.billing.name == "Accounts Dept"
                    && request.promo_code() == Some("SAVE10")
            })
            .return_once(|_, _| Ok(make_order(OrderUuid::new(), OrderStatus::Pending)));

        let res = TestClient::post("http://example.com/orders")
            .json(&json!({
                "shipping": { "name": "Asha Rao", "phone": "1", "address": "12 MG Road" },
                "billing": { "name": "Accounts Dept", "phone": "2", "address": "1 Office Park" },
                "payment_method": "card",
                "promo_code": "SAVE10"
            }))
            .send(&make_service(checkout))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::CREATED));

        Ok(())
    }
}
