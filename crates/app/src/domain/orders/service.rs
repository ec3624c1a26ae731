//! Orders service.

use async_trait::async_trait;
use mockall::automock;
use rustc_hash::FxHashMap;
use sqlx::{Postgres, Transaction};
use tracing::info;

use crate::{
    database::Db,
    domain::{
        orders::{
            data::OrderFilter,
            errors::OrdersServiceError,
            records::{
                OrderItemRecord, OrderRecord, OrderStatus, OrderSummary, OrderUuid,
                PaymentStatus,
            },
            repositories::{PgOrderItemsRepository, PgOrdersRepository},
        },
        products::repository::PgProductsRepository,
        users::records::UserUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    orders_repository: PgOrdersRepository,
    items_repository: PgOrderItemsRepository,
    products_repository: PgProductsRepository,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            orders_repository: PgOrdersRepository::new(),
            items_repository: PgOrderItemsRepository::new(),
            products_repository: PgProductsRepository::new(),
        }
    }

    async fn load_items(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: &mut OrderRecord,
    ) -> Result<(), OrdersServiceError> {
        order.items = self
            .items_repository
            .list_order_items(tx, &[order.uuid])
            .await?;

        Ok(())
    }

    /// Move a locked order to `next`, returning stock when it is cancelled.
    async fn transition(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderRecord,
        next: OrderStatus,
    ) -> Result<OrderRecord, OrdersServiceError> {
        if !order.status.can_transition_to(next) {
            return Err(OrdersServiceError::InvalidTransition {
                from: order.status,
                to: next,
            });
        }

        let mut updated = self
            .orders_repository
            .set_status(tx, order.uuid, next)
            .await?;

        self.load_items(tx, &mut updated).await?;

        if next == OrderStatus::Cancelled {
            for item in &updated.items {
                // Items whose product has since been removed from the catalog
                // have nothing to restock.
                if let Some(product) = item.product_uuid {
                    self.products_repository
                        .increment_stock(tx, product, item.quantity)
                        .await?;
                }
            }
        }

        Ok(updated)
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    async fn list_orders(
        &self,
        user: UserUuid,
        filter: OrderFilter,
    ) -> Result<Vec<OrderRecord>, OrdersServiceError> {
        let mut tx = self.db.begin_user_transaction(user).await?;

        let mut orders = self.orders_repository.list_orders(&mut tx, &filter).await?;

        let uuids: Vec<OrderUuid> = orders.iter().map(|order| order.uuid).collect();

        let items = self
            .items_repository
            .list_order_items(&mut tx, &uuids)
            .await?;

        tx.commit().await?;

        let mut items_by_order: FxHashMap<OrderUuid, Vec<OrderItemRecord>> =
            FxHashMap::default();

        for item in items {
            items_by_order.entry(item.order_uuid).or_default().push(item);
        }

        for order in &mut orders {
            order.items = items_by_order.remove(&order.uuid).unwrap_or_default();
        }

        Ok(orders)
    }

    async fn get_order(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin_user_transaction(user).await?;

        let mut order = self.orders_repository.get_order(&mut tx, order).await?;

        self.load_items(&mut tx, &mut order).await?;

        tx.commit().await?;

        Ok(order)
    }

    #[tracing::instrument(
        name = "orders.service.cancel_order",
        skip(self),
        fields(user_uuid = %user, order_uuid = %order),
        err
    )]
    async fn cancel_order(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin_user_transaction(user).await?;

        let locked = self.orders_repository.lock_order(&mut tx, order).await?;

        let cancelled = self
            .transition(&mut tx, locked, OrderStatus::Cancelled)
            .await?;

        tx.commit().await?;

        info!(items = cancelled.items.len(), "cancelled order and restocked items");

        Ok(cancelled)
    }

    #[tracing::instrument(
        name = "orders.service.update_status",
        skip(self),
        fields(user_uuid = %user, order_uuid = %order, status = status.to_str()),
        err
    )]
    async fn update_status(
        &self,
        user: UserUuid,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin_user_transaction(user).await?;

        let locked = self.orders_repository.lock_order(&mut tx, order).await?;

        let updated = self.transition(&mut tx, locked, status).await?;

        tx.commit().await?;

        info!("updated order status");

        Ok(updated)
    }

    #[tracing::instrument(
        name = "orders.service.update_payment_status",
        skip(self),
        fields(user_uuid = %user, order_uuid = %order, payment_status = status.to_str()),
        err
    )]
    async fn update_payment_status(
        &self,
        user: UserUuid,
        order: OrderUuid,
        status: PaymentStatus,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin_user_transaction(user).await?;

        let mut updated = self
            .orders_repository
            .set_payment_status(&mut tx, order, status)
            .await?;

        self.load_items(&mut tx, &mut updated).await?;

        tx.commit().await?;

        info!("updated order payment status");

        Ok(updated)
    }

    async fn order_summary(&self, user: UserUuid) -> Result<OrderSummary, OrdersServiceError> {
        let mut tx = self.db.begin_user_transaction(user).await?;

        let summary = self.orders_repository.order_summary(&mut tx).await?;

        tx.commit().await?;

        Ok(summary)
    }
}

#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// The user's orders, newest first, with their items.
    async fn list_orders(
        &self,
        user: UserUuid,
        filter: OrderFilter,
    ) -> Result<Vec<OrderRecord>, OrdersServiceError>;

    /// Retrieve a single order with its items.
    async fn get_order(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// Cancel a pending or confirmed order and return its items to stock.
    async fn cancel_order(
        &self,
        user: UserUuid,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// Advance an order's fulfilment status.
    async fn update_status(
        &self,
        user: UserUuid,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// Record the outcome of payment for an order.
    async fn update_payment_status(
        &self,
        user: UserUuid,
        order: OrderUuid,
        status: PaymentStatus,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// Order counts by status and the total spent on paid orders.
    async fn order_summary(&self, user: UserUuid) -> Result<OrderSummary, OrdersServiceError>;
}
