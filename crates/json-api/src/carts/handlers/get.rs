//! Get Cart Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use shopfusion_app::domain::carts::records::{CartLine, CartRecord};

use crate::{carts::errors::into_status_error, extensions::*, state::State};

/// Cart Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartResponse {
    /// The unique identifier of the cart
    pub uuid: Uuid,

    /// Active lines, oldest first
    pub items: Vec<CartLineResponse>,

    /// Units across all lines
    pub total_items: u32,

    /// Sum of line subtotals at current prices
    pub total_price: String,

    /// The date and time the cart was created
    pub created_at: String,

    /// The date and time the cart last changed
    pub updated_at: String,
}

impl From<CartRecord> for CartResponse {
    fn from(cart: CartRecord) -> Self {
        CartResponse {
            uuid: cart.uuid.into(),
            total_items: cart.total_items(),
            total_price: cart.total_price().to_string(),
            created_at: cart.created_at.to_string(),
            updated_at: cart.updated_at.to_string(),
            items: cart.items.into_iter().map(CartLineResponse::from).collect(),
        }
    }
}

/// Cart Line Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CartLineResponse {
    /// The unique identifier of the cart item
    pub uuid: Uuid,

    pub product_uuid: Uuid,

    pub product_name: String,

    /// Current catalog price
    pub unit_price: String,

    pub quantity: u32,

    /// `unit_price` times `quantity`
    pub subtotal: String,

    /// Whether the requested quantity is currently in stock
    pub in_stock: bool,

    /// False once the product has been removed from the catalog
    pub available: bool,
}

impl From<CartLine> for CartLineResponse {
    fn from(line: CartLine) -> Self {
        Self {
            subtotal: line.subtotal().to_string(),
            in_stock: line.is_purchasable(),
            available: line.product_available,
            uuid: line.item.uuid.into(),
            product_uuid: line.item.product_uuid.into(),
            product_name: line.product_name,
            unit_price: line.unit_price.to_string(),
            quantity: line.item.quantity,
        }
    }
}

/// Get Cart Handler
///
/// Returns the caller's cart, creating an empty one on first access.
#[endpoint(
    tags("cart"),
    summary = "Get Cart",
    security(("bearer_auth" = []))
)]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<CartResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let cart = state
        .app
        .carts
        .get_or_create_cart(user)
        .await
        .map_err(into_status_error)?;

    Ok(Json(cart.into()))
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use shopfusion_app::domain::{
        carts::{
            MockCartsService,
            records::{CartItemRecord, CartItemState, CartItemUuid, CartUuid},
        },
        products::records::ProductUuid,
    };

    use crate::test_helpers::{MockServices, TEST_USER_UUID, money, service};

    use super::*;

    fn make_service(carts: MockCartsService) -> Service {
        service(
            MockServices {
                carts,
                ..MockServices::default()
            },
            Router::with_path("cart").get(handler),
        )
    }

    fn line(cart: CartUuid, price: &str, quantity: u32, stock: u32) -> CartLine {
        CartLine {
            item: CartItemRecord {
                uuid: CartItemUuid::new(),
                cart_uuid: cart,
                product_uuid: ProductUuid::new(),
                quantity,
                state: CartItemState::Active,
                created_at: Timestamp::UNIX_EPOCH,
                updated_at: Timestamp::UNIX_EPOCH,
            },
            product_name: "Widget".to_string(),
            unit_price: money(price),
            stock_quantity: stock,
            product_available: true,
        }
    }

    #[tokio::test]
    async fn test_get_returns_lines_and_totals() -> TestResult {
        let cart = CartUuid::new();
        let mut carts = MockCartsService::new();

        carts
            .expect_get_or_create_cart()
            .once()
            .withf(|user| *user == TEST_USER_UUID)
            .return_once(move |user| {
                Ok(CartRecord {
                    uuid: cart,
                    user_uuid: user,
                    items: vec![line(cart, "25.00", 1, 4), line(cart, "10.00", 2, 1)],
                    created_at: Timestamp::UNIX_EPOCH,
                    updated_at: Timestamp::UNIX_EPOCH,
                })
            });

        let response: CartResponse = TestClient::get("http://example.com/cart")
            .send(&make_service(carts))
            .await
            .take_json()
            .await?;

        assert_eq!(response.uuid, cart.into_uuid());
        assert_eq!(response.total_items, 3);
        assert_eq!(response.total_price, "45.00");
        assert_eq!(response.items.len(), 2);

        let flags: Vec<bool> = response.items.iter().map(|item| item.in_stock).collect();

        assert_eq!(flags, vec![true, false]);

        Ok(())
    }

    #[tokio::test]
    async fn test_get_empty_cart() -> TestResult {
        let mut carts = MockCartsService::new();

        carts.expect_get_or_create_cart().once().return_once(|user| {
            Ok(CartRecord {
                uuid: CartUuid::new(),
                user_uuid: user,
                items: vec![],
                created_at: Timestamp::UNIX_EPOCH,
                updated_at: Timestamp::UNIX_EPOCH,
            })
        });

        let response: CartResponse = TestClient::get("http://example.com/cart")
            .send(&make_service(carts))
            .await
            .take_json()
            .await?;

        assert!(response.items.is_empty());
        assert_eq!(response.total_price, "0");

        Ok(())
    }

    #[tokio::test]
    async fn test_get_flags_deleted_products() -> TestResult {
        let cart = CartUuid::new();
        let mut carts = MockCartsService::new();

        carts.expect_get_or_create_cart().once().return_once(move |user| {
            let mut deleted = line(cart, "12.00", 1, 9);
            deleted.product_available = false;

            Ok(CartRecord {
                uuid: cart,
                user_uuid: user,
                items: vec![deleted],
                created_at: Timestamp::UNIX_EPOCH,
                updated_at: Timestamp::UNIX_EPOCH,
            })
        });

        let response: CartResponse = TestClient::get("http://example.com/cart")
            .send(&make_service(carts))
            .await
            .take_json()
            .await?;

        let item = response.items.first().ok_or("missing cart line")?;

        assert!(!item.available);
        assert!(!item.in_stock);

        Ok(())
    }
}
