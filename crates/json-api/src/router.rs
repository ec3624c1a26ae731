//! App Router

use salvo::Router;

use crate::{auth, carts, orders, products, promo_codes};

/// Every route that requires a bearer token.
pub(crate) fn app_router() -> Router {
    Router::new()
        .hoop(auth::middleware::handler)
        .push(
            Router::with_path("products")
                .get(products::index::handler)
                .push(Router::with_path("{product}").get(products::get::handler)),
        )
        .push(
            Router::with_path("cart")
                .get(carts::get::handler)
                .delete(carts::clear::handler)
                .push(
                    Router::with_path("items")
                        .post(carts::items::create::handler)
                        .push(
                            Router::with_path("{product}")
                                .patch(carts::items::update::handler)
                                .delete(carts::items::delete::handler),
                        ),
                ),
        )
        .push(
            Router::with_path("promo-codes/validate").post(promo_codes::validate::handler),
        )
        .push(
            Router::with_path("orders")
                .get(orders::index::handler)
                .post(orders::create::handler)
                .push(Router::with_path("summary").get(orders::summary::handler))
                .push(
                    Router::with_path("{order}")
                        .get(orders::get::handler)
                        .push(Router::with_path("cancel").post(orders::cancel::handler)),
                ),
        )
}

#[cfg(test)]
mod tests {
    use salvo::{
        affix_state::inject,
        http::{StatusCode, header::AUTHORIZATION},
        prelude::Service,
        test::{ResponseExt, TestClient},
    };
    use shopfusion_app::{
        auth::AuthenticatedUser,
        domain::orders::{MockOrdersService, records::OrderSummary},
    };
    use testresult::TestResult;

    use crate::{
        orders::summary::OrderSummaryResponse,
        test_helpers::{MockServices, TEST_USER_UUID, money},
    };

    use super::*;

    fn authenticated(mut mocks: MockServices) -> Service {
        mocks
            .auth
            .expect_authenticate_bearer()
            .withf(|token| token == "valid")
            .returning(|_| {
                Ok(AuthenticatedUser {
                    uuid: TEST_USER_UUID,
                    is_verified: true,
                })
            });

        Service::new(
            Router::new()
                .hoop(inject(mocks.into_state()))
                .push(app_router()),
        )
    }

    #[tokio::test]
    async fn test_routes_require_a_token() -> TestResult {
        let service = authenticated(MockServices::default());

        for path in ["/products", "/cart", "/orders", "/orders/summary"] {
            let res = TestClient::get(format!("http://example.com{path}"))
                .send(&service)
                .await;

            assert_eq!(res.status_code, Some(StatusCode::UNAUTHORIZED), "{path}");
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_summary_is_not_captured_by_order_route() -> TestResult {
        let mut orders = MockOrdersService::new();

        orders.expect_get_order().never();
        orders.expect_order_summary().once().return_once(|_| {
            Ok(OrderSummary {
                total_orders: 0,
                pending_orders: 0,
                delivered_orders: 0,
                cancelled_orders: 0,
                total_spent: money("0"),
            })
        });

        let service = authenticated(MockServices {
            orders,
            ..MockServices::default()
        });

        let body: OrderSummaryResponse = TestClient::get("http://example.com/orders/summary")
            .add_header(AUTHORIZATION, "Bearer valid", true)
            .send(&service)
            .await
            .take_json()
            .await?;

        assert_eq!(body.total_orders, 0);

        Ok(())
    }
}
