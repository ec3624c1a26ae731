//! Test Helpers

use jiff::{Timestamp, ToSpan};
use rust_decimal::Decimal;

use crate::{
    domain::{
        carts::{CartsService, CartsServiceError, data::NewCartItem, records::AddedCartItem},
        checkout::{CheckoutError, CheckoutService, PlaceOrder},
        orders::records::{ContactDetails, OrderRecord, PaymentMethod},
        products::{
            ProductsService,
            data::NewProduct,
            records::{ProductRecord, ProductUuid},
        },
        promo_codes::{
            PromoCodesService, PromoCodesServiceError,
            data::NewPromoCode,
            records::{DiscountRule, PromoCodeRecord, PromoCodeUuid},
        },
    },
    test::TestContext,
};

impl TestContext {
    pub(crate) async fn create_product(
        &self,
        name: &str,
        price: Decimal,
        stock_quantity: u32,
    ) -> ProductRecord {
        self.products
            .create_product(NewProduct {
                uuid: ProductUuid::new(),
                name: name.to_string(),
                price,
                stock_quantity,
            })
            .await
            .expect("Failed to create test product")
    }

    pub(crate) async fn stock_of(&self, product: ProductUuid) -> u32 {
        self.products
            .get_product(product)
            .await
            .expect("Failed to read test product")
            .stock_quantity
    }

    /// 10% off orders of at least 30.00, valid for the next day.
    pub(crate) async fn create_save10(&self) -> Result<PromoCodeRecord, PromoCodesServiceError> {
        let now = Timestamp::now();

        self.promo_codes
            .create_promo_code(NewPromoCode {
                uuid: PromoCodeUuid::new(),
                code: "SAVE10".to_string(),
                discount: DiscountRule::Percentage {
                    percent: Decimal::TEN,
                },
                minimum_amount: Decimal::new(30, 0),
                valid_from: now - 1.hour(),
                valid_until: now + 24.hours(),
                is_active: true,
            })
            .await
    }

    pub(crate) async fn promo_usage_count(&self, code: &str) -> u32 {
        let count: i32 = sqlx::query_scalar("SELECT usage_count FROM promo_codes WHERE code = $1")
            .bind(code)
            .fetch_one(self.db.pool())
            .await
            .expect("Failed to read promo code usage");

        u32::try_from(count).expect("usage count should be non-negative")
    }

    pub(crate) async fn add_to_cart(
        &self,
        product: ProductUuid,
        quantity: u32,
    ) -> Result<AddedCartItem, CartsServiceError> {
        self.carts
            .add_item(
                self.user_uuid,
                NewCartItem {
                    product_uuid: product,
                    quantity,
                },
            )
            .await
    }

    /// Check out the default user's cart with placeholder contact details.
    pub(crate) async fn place_order(
        &self,
        payment_method: PaymentMethod,
        promo_code: Option<String>,
    ) -> Result<OrderRecord, CheckoutError> {
        let details = ContactDetails {
            name: "Test Customer".to_string(),
            phone: "555-0100".to_string(),
            address: "1 Test Street".to_string(),
        };

        self.checkout
            .place_order(
                self.user_uuid,
                PlaceOrder {
                    shipping: details.clone(),
                    billing: details,
                    payment_method,
                    promo_code,
                },
            )
            .await
    }
}
