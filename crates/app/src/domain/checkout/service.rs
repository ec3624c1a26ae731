//! Checkout service.

use std::{
    fmt::{Debug, Formatter, Result as FmtResult},
    sync::Arc,
};

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use sqlx::{Postgres, Transaction};
use tracing::info;

use crate::{
    database::Db,
    domain::{
        carts::{
            records::{CartItemRecord, CartUuid},
            repositories::{PgCartItemsRepository, PgCartsRepository},
        },
        checkout::{data::PlaceOrder, errors::CheckoutError},
        orders::{
            data::{NewOrder, NewOrderItem},
            numbers::{MAX_ORDER_NUMBER_ATTEMPTS, OrderNumberGenerator},
            records::{OrderItemUuid, OrderRecord, OrderUuid},
            repositories::{PgOrderItemsRepository, PgOrdersRepository},
        },
        payments::{PaymentGateway, PaymentRequest},
        pricing::{LineItem, PriceBreakdown, PricingPolicy},
        products::{records::ProductRecord, repository::PgProductsRepository},
        promo_codes::{
            errors::PromoCodesServiceError, records::AppliedPromo,
            repository::PgPromoCodesRepository,
        },
        users::records::UserUuid,
    },
};

/// A cart item checked against its live product.
#[derive(Debug, Clone)]
struct ValidatedLine {
    item: CartItemRecord,
    product: ProductRecord,
}

impl ValidatedLine {
    fn line_item(&self) -> LineItem {
        LineItem {
            unit_price: self.product.price,
            quantity: self.item.quantity,
        }
    }

    fn new_order_item(&self) -> NewOrderItem {
        NewOrderItem {
            uuid: OrderItemUuid::new(),
            product_uuid: self.product.uuid,
            product_name: self.product.name.clone(),
            product_price: self.product.price,
            quantity: self.item.quantity,
        }
    }
}

/// The outcome of the validating and pricing steps.
#[derive(Debug, Clone)]
struct PricedCart {
    cart: CartUuid,
    lines: Vec<ValidatedLine>,
    totals: PriceBreakdown,
    promo: Option<AppliedPromo>,
}

#[derive(Clone)]
pub struct PgCheckoutService {
    db: Db,
    carts_repository: PgCartsRepository,
    items_repository: PgCartItemsRepository,
    products_repository: PgProductsRepository,
    promo_codes_repository: PgPromoCodesRepository,
    orders_repository: PgOrdersRepository,
    order_items_repository: PgOrderItemsRepository,
    gateway: Arc<dyn PaymentGateway>,
    order_numbers: Arc<dyn OrderNumberGenerator>,
    pricing: PricingPolicy,
    currency: String,
}

impl PgCheckoutService {
    #[must_use]
    pub fn new(
        db: Db,
        gateway: Arc<dyn PaymentGateway>,
        order_numbers: Arc<dyn OrderNumberGenerator>,
        pricing: PricingPolicy,
        currency: String,
    ) -> Self {
        Self {
            db,
            carts_repository: PgCartsRepository::new(),
            items_repository: PgCartItemsRepository::new(),
            products_repository: PgProductsRepository::new(),
            promo_codes_repository: PgPromoCodesRepository::new(),
            orders_repository: PgOrdersRepository::new(),
            order_items_repository: PgOrderItemsRepository::new(),
            gateway,
            order_numbers,
            pricing,
            currency,
        }
    }

    /// Load the cart, check every item against live stock and price it.
    async fn price_cart(
        &self,
        user: UserUuid,
        promo_code: Option<&str>,
        now: Timestamp,
    ) -> Result<PricedCart, CheckoutError> {
        let mut tx = self.db.begin_user_transaction(user).await?;

        let Some(cart) = self
            .carts_repository
            .find_cart_by_user(&mut tx, user)
            .await?
        else {
            return Err(CheckoutError::EmptyCart);
        };

        let items = self
            .items_repository
            .list_active_items(&mut tx, cart.uuid)
            .await?;

        if items.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let mut lines = Vec::with_capacity(items.len());

        for item in items {
            let product = match self
                .products_repository
                .get_product(&mut tx, item.product_uuid)
                .await
            {
                Ok(product) => product,
                Err(sqlx::Error::RowNotFound) => {
                    return Err(CheckoutError::ProductNotFound(item.product_uuid));
                }
                Err(error) => return Err(error.into()),
            };

            if !product.has_stock_for(item.quantity) {
                return Err(CheckoutError::InsufficientStock(product.uuid));
            }

            lines.push(ValidatedLine { item, product });
        }

        let line_items: Vec<LineItem> = lines.iter().map(ValidatedLine::line_item).collect();
        let subtotal = self.pricing.subtotal(&line_items);

        let promo = match promo_code {
            Some(code) => {
                let record = self
                    .promo_codes_repository
                    .find_by_code(&mut tx, code)
                    .await
                    .map_err(PromoCodesServiceError::from)?;

                Some(record.evaluate(subtotal, now)?)
            }
            None => None,
        };

        tx.commit().await?;

        let totals = self.pricing.compute(&line_items, promo.as_ref());

        Ok(PricedCart {
            cart: cart.uuid,
            lines,
            totals,
            promo,
        })
    }

    /// Insert the order under a fresh order number, retrying on collision.
    async fn insert_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: &NewOrder,
        now: Timestamp,
    ) -> Result<OrderRecord, CheckoutError> {
        for _ in 0..MAX_ORDER_NUMBER_ATTEMPTS {
            let order_number = self.order_numbers.generate(now);

            if let Some(created) = self
                .orders_repository
                .create_order(tx, order, &order_number)
                .await?
            {
                return Ok(created);
            }

            info!(%order_number, "order number collision, retrying");
        }

        Err(CheckoutError::Conflict)
    }

    /// Write the order and apply its effects, all in one transaction.
    async fn commit(
        &self,
        user: UserUuid,
        priced: PricedCart,
        new_order: NewOrder,
        now: Timestamp,
    ) -> Result<OrderRecord, CheckoutError> {
        let mut tx = self.db.begin_user_transaction(user).await?;

        self.carts_repository
            .lock_cart(&mut tx, priced.cart)
            .await?;

        let current = self
            .items_repository
            .list_active_items(&mut tx, priced.cart)
            .await?;

        let unchanged = current.len() == priced.lines.len()
            && current.iter().zip(&priced.lines).all(|(item, line)| {
                item.product_uuid == line.item.product_uuid && item.quantity == line.item.quantity
            });

        if !unchanged {
            return Err(CheckoutError::CartChanged);
        }

        let mut order = self.insert_order(&mut tx, &new_order, now).await?;

        for line in &priced.lines {
            let item = self
                .order_items_repository
                .create_order_item(&mut tx, order.uuid, &line.new_order_item())
                .await?;

            order.items.push(item);
        }

        // Fixed lock order across concurrent checkouts.
        let mut decrements: Vec<&CartItemRecord> =
            priced.lines.iter().map(|line| &line.item).collect();
        decrements.sort_by_key(|item| item.product_uuid);

        for item in decrements {
            let remaining = self
                .products_repository
                .decrement_stock(&mut tx, item.product_uuid, item.quantity)
                .await?;

            if remaining.is_none() {
                return Err(CheckoutError::InsufficientStock(item.product_uuid));
            }
        }

        self.items_repository
            .clear_cart_items(&mut tx, priced.cart)
            .await?;

        self.carts_repository
            .touch_cart(&mut tx, priced.cart)
            .await?;

        if let Some(promo) = &priced.promo {
            let redeemed = self
                .promo_codes_repository
                .redeem(&mut tx, promo.promo_uuid, now)
                .await?;

            if redeemed.is_none() {
                return Err(CheckoutError::PromoCodeExpired);
            }
        }

        tx.commit().await?;

        Ok(order)
    }
}

impl Debug for PgCheckoutService {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.debug_struct("PgCheckoutService")
            .field("pricing", &self.pricing)
            .field("currency", &self.currency)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl CheckoutService for PgCheckoutService {
    #[tracing::instrument(
        name = "checkout.service.place_order",
        skip(self, request),
        fields(
            user_uuid = %user,
            payment_method = request.payment_method.to_str(),
            promo_code = request.promo_code().unwrap_or_default()
        ),
        err
    )]
    async fn place_order(
        &self,
        user: UserUuid,
        request: PlaceOrder,
    ) -> Result<OrderRecord, CheckoutError> {
        if !request.has_contact_details() {
            return Err(CheckoutError::InvalidData);
        }

        let now = Timestamp::now();
        let priced = self.price_cart(user, request.promo_code(), now).await?;

        let order_uuid = OrderUuid::new();

        let payment_reference = if request.payment_method.requires_gateway() {
            let payment = self
                .gateway
                .create_payment_order(PaymentRequest {
                    amount: priced.totals.total,
                    currency: self.currency.clone(),
                    receipt: order_uuid.to_string(),
                })
                .await?;

            Some(payment.reference)
        } else {
            None
        };

        let new_order = NewOrder {
            uuid: order_uuid,
            user_uuid: user,
            totals: priced.totals,
            shipping: request.shipping,
            billing: request.billing,
            payment_method: request.payment_method,
            payment_reference,
            promo_code: priced.promo.as_ref().map(|promo| promo.code.clone()),
        };

        let order = self.commit(user, priced, new_order, now).await?;

        info!(
            order_uuid = %order.uuid,
            order_number = %order.order_number,
            total = %order.total_amount,
            "placed order"
        );

        Ok(order)
    }
}

#[automock]
#[async_trait]
pub trait CheckoutService: Send + Sync {
    /// Turn the user's cart into an order.
    async fn place_order(
        &self,
        user: UserUuid,
        request: PlaceOrder,
    ) -> Result<OrderRecord, CheckoutError>;
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::{
        domain::{
            carts::{data::NewCartItem, service::CartsService},
            orders::{
                numbers::{MockOrderNumberGenerator, RandomOrderNumbers},
                records::{ContactDetails, OrderStatus, PaymentMethod, PaymentStatus},
                service::OrdersService,
            },
            payments::{MockPaymentGateway, PaymentGatewayError, PaymentOrder},
            products::records::ProductUuid,
        },
        test::TestContext,
    };

    use super::*;

    fn details() -> ContactDetails {
        ContactDetails {
            name: "Ada Lovelace".to_string(),
            phone: "555-0100".to_string(),
            address: "12 St James's Square, London".to_string(),
        }
    }

    fn request(payment_method: PaymentMethod, promo_code: Option<&str>) -> PlaceOrder {
        PlaceOrder {
            shipping: details(),
            billing: details(),
            payment_method,
            promo_code: promo_code.map(str::to_string),
        }
    }

    fn service_with(
        ctx: &TestContext,
        gateway: Arc<dyn PaymentGateway>,
        order_numbers: Arc<dyn OrderNumberGenerator>,
    ) -> PgCheckoutService {
        PgCheckoutService::new(
            ctx.db.clone(),
            gateway,
            order_numbers,
            PricingPolicy::default(),
            "INR".to_string(),
        )
    }

    /// Gateway that empties a product's stock while "processing" payment.
    struct DrainingGateway {
        db: Db,
        product: ProductUuid,
    }

    #[async_trait]
    impl PaymentGateway for DrainingGateway {
        async fn create_payment_order(
            &self,
            _request: PaymentRequest,
        ) -> Result<PaymentOrder, PaymentGatewayError> {
            sqlx::query("UPDATE products SET stock_quantity = 0 WHERE uuid = $1")
                .bind(self.product.into_uuid())
                .execute(self.db.pool())
                .await
                .map_err(|e| PaymentGatewayError::UnexpectedResponse(e.to_string()))?;

            Ok(PaymentOrder {
                reference: "pay_drained".to_string(),
            })
        }
    }

    #[tokio::test]
    async fn place_order_prices_and_commits_cart() -> TestResult {
        let ctx = TestContext::new().await;
        let a = ctx.create_product("A", Decimal::new(2500, 2), 10).await;
        let b = ctx.create_product("B", Decimal::new(1000, 2), 5).await;

        ctx.add_to_cart(a.uuid, 1).await?;
        ctx.add_to_cart(b.uuid, 2).await?;

        let order = ctx.place_order(PaymentMethod::CashOnDelivery, None).await?;

        assert_eq!(order.subtotal, Decimal::new(4500, 2));
        assert_eq!(order.tax_amount, Decimal::new(450, 2));
        assert_eq!(order.shipping_amount, Decimal::new(1000, 2));
        assert_eq!(order.discount_amount, Decimal::ZERO);
        assert_eq!(order.total_amount, Decimal::new(5950, 2));
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.payment_status, PaymentStatus::Unpaid);
        assert_eq!(order.payment_reference, None);
        assert_eq!(order.items.len(), 2);
        assert!(order.order_number.starts_with("ORD-"));

        let items_total: Decimal = order.items.iter().map(|item| item.subtotal).sum();

        assert_eq!(items_total, order.subtotal);
        assert_eq!(ctx.stock_of(a.uuid).await, 9);
        assert_eq!(ctx.stock_of(b.uuid).await, 3);
        assert!(ctx.carts.list_active_items(ctx.user_uuid).await?.is_empty());

        Ok(())
    }

    #[tokio::test]
    async fn empty_cart_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;

        let result = ctx.place_order(PaymentMethod::CashOnDelivery, None).await;

        assert!(matches!(result, Err(CheckoutError::EmptyCart)));

        let product = ctx.create_product("A", Decimal::new(2500, 2), 10).await;

        ctx.add_to_cart(product.uuid, 1).await?;
        ctx.carts.clear(ctx.user_uuid).await?;

        let result = ctx.place_order(PaymentMethod::CashOnDelivery, None).await;

        assert!(matches!(result, Err(CheckoutError::EmptyCart)));

        Ok(())
    }

    #[tokio::test]
    async fn quantity_above_stock_is_rejected_before_writing() -> TestResult {
        let ctx = TestContext::new().await;
        let product = ctx.create_product("A", Decimal::new(2500, 2), 1).await;

        ctx.add_to_cart(product.uuid, 2).await?;

        let result = ctx.place_order(PaymentMethod::CashOnDelivery, None).await;

        assert!(
            matches!(result, Err(CheckoutError::InsufficientStock(uuid)) if uuid == product.uuid),
            "expected InsufficientStock, got {result:?}"
        );
        assert_eq!(ctx.stock_of(product.uuid).await, 1);
        assert_eq!(ctx.carts.list_active_items(ctx.user_uuid).await?.len(), 1);

        Ok(())
    }

    #[tokio::test]
    async fn promo_code_discounts_and_is_redeemed_once() -> TestResult {
        let ctx = TestContext::new().await;
        let product = ctx.create_product("A", Decimal::new(4000, 2), 10).await;

        ctx.create_save10().await?;
        ctx.add_to_cart(product.uuid, 1).await?;

        let order = ctx
            .place_order(PaymentMethod::CashOnDelivery, Some("SAVE10".to_string()))
            .await?;

        assert_eq!(order.discount_amount, Decimal::new(400, 2));
        assert_eq!(order.promo_code.as_deref(), Some("SAVE10"));
        assert_eq!(
            order.total_amount,
            order.subtotal + order.tax_amount + order.shipping_amount - order.discount_amount
        );
        assert_eq!(ctx.promo_usage_count("SAVE10").await, 1);

        Ok(())
    }

    #[tokio::test]
    async fn promo_minimum_not_met_writes_nothing() -> TestResult {
        let ctx = TestContext::new().await;
        let product = ctx.create_product("A", Decimal::new(2000, 2), 10).await;

        ctx.create_save10().await?;
        ctx.add_to_cart(product.uuid, 1).await?;

        let result = ctx
            .place_order(PaymentMethod::CashOnDelivery, Some("SAVE10".to_string()))
            .await;

        assert!(
            matches!(result, Err(CheckoutError::PromoMinimumNotMet { .. })),
            "expected PromoMinimumNotMet, got {result:?}"
        );
        assert_eq!(ctx.promo_usage_count("SAVE10").await, 0);
        assert_eq!(ctx.stock_of(product.uuid).await, 10);

        Ok(())
    }

    #[tokio::test]
    async fn unknown_promo_code_is_rejected() -> TestResult {
        let ctx = TestContext::new().await;
        let product = ctx.create_product("A", Decimal::new(4000, 2), 10).await;

        ctx.add_to_cart(product.uuid, 1).await?;

        let result = ctx
            .place_order(PaymentMethod::CashOnDelivery, Some("NOPE".to_string()))
            .await;

        assert!(matches!(result, Err(CheckoutError::PromoCodeNotFound)));

        Ok(())
    }

    #[tokio::test]
    async fn online_payment_stores_gateway_reference() -> TestResult {
        let ctx = TestContext::new().await;
        let product = ctx.create_product("A", Decimal::new(2500, 2), 10).await;

        let mut gateway = MockPaymentGateway::new();

        gateway
            .expect_create_payment_order()
            .withf(|request| request.amount == Decimal::new(3750, 2) && request.currency == "INR")
            .times(1)
            .returning(|_| {
                Ok(PaymentOrder {
                    reference: "order_abc123".to_string(),
                })
            });

        let checkout = service_with(&ctx, Arc::new(gateway), Arc::new(RandomOrderNumbers));

        ctx.add_to_cart(product.uuid, 1).await?;

        let order = checkout
            .place_order(ctx.user_uuid, request(PaymentMethod::Card, None))
            .await?;

        assert_eq!(order.payment_reference.as_deref(), Some("order_abc123"));
        assert_eq!(order.payment_method, PaymentMethod::Card);

        Ok(())
    }

    #[tokio::test]
    async fn gateway_failure_writes_nothing() -> TestResult {
        let ctx = TestContext::new().await;
        let product = ctx.create_product("A", Decimal::new(2500, 2), 10).await;

        let mut gateway = MockPaymentGateway::new();

        gateway
            .expect_create_payment_order()
            .returning(|_| Err(PaymentGatewayError::NotConfigured));

        let checkout = service_with(&ctx, Arc::new(gateway), Arc::new(RandomOrderNumbers));

        ctx.add_to_cart(product.uuid, 2).await?;

        let result = checkout
            .place_order(ctx.user_uuid, request(PaymentMethod::Upi, None))
            .await;

        assert!(matches!(result, Err(CheckoutError::GatewayUnavailable(_))));
        assert_eq!(ctx.stock_of(product.uuid).await, 10);
        assert_eq!(ctx.carts.list_active_items(ctx.user_uuid).await?.len(), 2);

        Ok(())
    }

    #[tokio::test]
    async fn failed_commit_rolls_back_every_effect() -> TestResult {
        let ctx = TestContext::new().await;
        let a = ctx.create_product("A", Decimal::new(2500, 2), 10).await;
        let b = ctx.create_product("B", Decimal::new(1000, 2), 5).await;

        ctx.create_save10().await?;
        ctx.add_to_cart(a.uuid, 1).await?;
        ctx.add_to_cart(b.uuid, 2).await?;

        let gateway = DrainingGateway {
            db: ctx.db.clone(),
            product: b.uuid,
        };

        let checkout = service_with(&ctx, Arc::new(gateway), Arc::new(RandomOrderNumbers));

        let result = checkout
            .place_order(ctx.user_uuid, request(PaymentMethod::Card, Some("SAVE10")))
            .await;

        assert!(
            matches!(result, Err(CheckoutError::InsufficientStock(uuid)) if uuid == b.uuid),
            "expected InsufficientStock, got {result:?}"
        );
        assert_eq!(ctx.stock_of(a.uuid).await, 10);
        assert_eq!(ctx.promo_usage_count("SAVE10").await, 0);
        assert_eq!(ctx.carts.list_active_items(ctx.user_uuid).await?.len(), 2);
        assert!(
            ctx.orders
                .list_orders(ctx.user_uuid, Default::default())
                .await?
                .is_empty()
        );

        Ok(())
    }

    #[tokio::test]
    async fn concurrent_checkouts_never_oversell() -> TestResult {
        let ctx = TestContext::new().await;
        let other = ctx.create_user("other@example.com", true).await;
        let product = ctx.create_product("Last one", Decimal::new(6000, 2), 1).await;

        for user in [ctx.user_uuid, other] {
            ctx.carts
                .add_item(
                    user,
                    NewCartItem {
                        product_uuid: product.uuid,
                        quantity: 1,
                    },
                )
                .await?;
        }

        let checkout = Arc::new(ctx.checkout.clone());

        let handles: Vec<_> = [ctx.user_uuid, other]
            .into_iter()
            .map(|user| {
                let checkout = Arc::clone(&checkout);
                tokio::spawn(async move {
                    checkout
                        .place_order(user, request(PaymentMethod::CashOnDelivery, None))
                        .await
                })
            })
            .collect();

        let mut placed = 0;
        let mut out_of_stock = 0;

        for handle in handles {
            match handle.await? {
                Ok(_) => placed += 1,
                Err(CheckoutError::InsufficientStock(_)) => out_of_stock += 1,
                Err(error) => return Err(error.into()),
            }
        }

        assert_eq!(placed, 1);
        assert_eq!(out_of_stock, 1);
        assert_eq!(ctx.stock_of(product.uuid).await, 0);

        Ok(())
    }

    #[tokio::test]
    async fn concurrent_checkouts_count_each_promo_use() -> TestResult {
        let ctx = TestContext::new().await;
        let product = ctx.create_product("Kettle", Decimal::new(4000, 2), 20).await;
        ctx.create_save10().await?;

        let mut users = vec![ctx.user_uuid];

        for n in 0..3 {
            users.push(ctx.create_user(&format!("shopper{n}@example.com"), true).await);
        }

        for user in &users {
            ctx.carts
                .add_item(
                    *user,
                    NewCartItem {
                        product_uuid: product.uuid,
                        quantity: 1,
                    },
                )
                .await?;
        }

        let checkout = Arc::new(ctx.checkout.clone());

        let handles: Vec<_> = users
            .iter()
            .map(|user| {
                let checkout = Arc::clone(&checkout);
                let user = *user;
                tokio::spawn(async move {
                    checkout
                        .place_order(user, request(PaymentMethod::CashOnDelivery, Some("SAVE10")))
                        .await
                })
            })
            .collect();

        let mut placed = 0;

        for handle in handles {
            let order = handle.await??;

            assert_eq!(order.discount_amount, Decimal::new(400, 2));
            placed += 1;
        }

        assert_eq!(placed, users.len());
        assert_eq!(ctx.promo_usage_count("SAVE10").await, 4);
        assert_eq!(ctx.stock_of(product.uuid).await, 16);

        Ok(())
    }

    #[tokio::test]
    async fn order_number_collision_is_retried() -> TestResult {
        let ctx = TestContext::new().await;
        let product = ctx.create_product("A", Decimal::new(2500, 2), 10).await;

        let calls = AtomicUsize::new(0);
        let mut numbers = MockOrderNumberGenerator::new();

        numbers.expect_generate().returning(move |_| {
            if calls.fetch_add(1, Ordering::SeqCst) < 2 {
                "ORD-20260301-AAAAAAAA".to_string()
            } else {
                "ORD-20260301-BBBBBBBB".to_string()
            }
        });

        let checkout = service_with(
            &ctx,
            Arc::new(MockPaymentGateway::new()),
            Arc::new(numbers),
        );

        ctx.add_to_cart(product.uuid, 1).await?;
        let first = checkout
            .place_order(ctx.user_uuid, request(PaymentMethod::CashOnDelivery, None))
            .await?;

        ctx.add_to_cart(product.uuid, 1).await?;
        let second = checkout
            .place_order(ctx.user_uuid, request(PaymentMethod::CashOnDelivery, None))
            .await?;

        assert_eq!(first.order_number, "ORD-20260301-AAAAAAAA");
        assert_eq!(second.order_number, "ORD-20260301-BBBBBBBB");

        Ok(())
    }

    #[tokio::test]
    async fn exhausted_order_numbers_are_a_conflict() -> TestResult {
        let ctx = TestContext::new().await;
        let product = ctx.create_product("A", Decimal::new(2500, 2), 10).await;

        let mut numbers = MockOrderNumberGenerator::new();

        numbers
            .expect_generate()
            .returning(|_| "ORD-20260301-AAAAAAAA".to_string());

        let checkout = service_with(
            &ctx,
            Arc::new(MockPaymentGateway::new()),
            Arc::new(numbers),
        );

        ctx.add_to_cart(product.uuid, 1).await?;
        checkout
            .place_order(ctx.user_uuid, request(PaymentMethod::CashOnDelivery, None))
            .await?;

        ctx.add_to_cart(product.uuid, 1).await?;
        let result = checkout
            .place_order(ctx.user_uuid, request(PaymentMethod::CashOnDelivery, None))
            .await;

        assert!(
            matches!(result, Err(CheckoutError::Conflict)),
            "expected Conflict, got {result:?}"
        );
        assert_eq!(ctx.stock_of(product.uuid).await, 9);

        Ok(())
    }

    #[tokio::test]
    async fn blank_contact_details_are_invalid() -> TestResult {
        let ctx = TestContext::new().await;
        let product = ctx.create_product("A", Decimal::new(2500, 2), 10).await;

        ctx.add_to_cart(product.uuid, 1).await?;

        let mut order = request(PaymentMethod::CashOnDelivery, None);
        order.shipping.address = String::new();

        let result = ctx.checkout.place_order(ctx.user_uuid, order).await;

        assert!(matches!(result, Err(CheckoutError::InvalidData)));

        Ok(())
    }
}
