//! Clear Cart Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{carts::errors::into_status_error, extensions::*, state::State};

/// Cart Cleared Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartClearedResponse {
    /// Number of lines that were removed
    pub removed: u64,
}

/// Clear Cart Handler
#[endpoint(
    tags("cart"),
    summary = "Clear Cart",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Cart cleared"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "cart.clear",
    skip(depot),
    fields(user_uuid = tracing::field::Empty),
    err
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CartClearedResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    tracing::Span::current().record("user_uuid", tracing::field::display(user));

    let removed = state
        .app
        .carts
        .clear(user)
        .await
        .map_err(into_status_error)?;

    tracing::info!(removed, "cleared cart");

    Ok(Json(CartClearedResponse { removed }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use shopfusion_app::domain::carts::MockCartsService;

    use crate::test_helpers::{MockServices, TEST_USER_UUID, service};

    use super::*;

    #[tokio::test]
    async fn test_clear_reports_removed_lines() -> TestResult {
        let mut carts = MockCartsService::new();

        carts
            .expect_clear()
            .once()
            .withf(|user| *user == TEST_USER_UUID)
            .return_once(|_| Ok(2));

        let mut res = TestClient::delete("http://example.com/cart")
            .send(&service(
                MockServices {
                    carts,
                    ..MockServices::default()
                },
                Router::with_path("cart").delete(handler),
            ))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        let body: CartClearedResponse = res.take_json().await?;

        assert_eq!(body.removed, 2);

        Ok(())
    }
}
