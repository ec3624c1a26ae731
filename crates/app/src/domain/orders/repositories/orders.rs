//! Orders Repository

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as};

use crate::domain::{
    orders::{
        data::{NewOrder, OrderFilter},
        records::{
            ContactDetails, OrderRecord, OrderStatus, OrderSummary, OrderUuid, PaymentStatus,
        },
    },
    users::records::UserUuid,
};

const CREATE_ORDER_SQL: &str = include_str!("../sql/create_order.sql");
const GET_ORDER_SQL: &str = include_str!("../sql/get_order.sql");
const LOCK_ORDER_SQL: &str = include_str!("../sql/lock_order.sql");
const LIST_ORDERS_SQL: &str = include_str!("../sql/list_orders.sql");
const SET_ORDER_STATUS_SQL: &str = include_str!("../sql/set_order_status.sql");
const SET_PAYMENT_STATUS_SQL: &str = include_str!("../sql/set_payment_status.sql");
const ORDER_SUMMARY_SQL: &str = include_str!("../sql/order_summary.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    /// Insert an order under `order_number`.
    ///
    /// Returns `None` when the order number is already taken.
    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: &NewOrder,
        order_number: &str,
    ) -> Result<Option<OrderRecord>, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(CREATE_ORDER_SQL)
            .bind(order.uuid.into_uuid())
            .bind(order_number)
            .bind(order.user_uuid.into_uuid())
            .bind(order.payment_method.to_str())
            .bind(order.payment_reference.as_deref())
            .bind(order.promo_code.as_deref())
            .bind(order.totals.subtotal)
            .bind(order.totals.tax)
            .bind(order.totals.shipping)
            .bind(order.totals.discount)
            .bind(order.totals.total)
            .bind(&order.shipping.name)
            .bind(&order.shipping.phone)
            .bind(&order.shipping.address)
            .bind(&order.billing.name)
            .bind(&order.billing.phone)
            .bind(&order.billing.address)
            .fetch_optional(&mut **tx)
            .await
    }

    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    /// Load the order and hold its row lock until the transaction ends.
    pub(crate) async fn lock_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(LOCK_ORDER_SQL)
            .bind(order.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn list_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        filter: &OrderFilter,
    ) -> Result<Vec<OrderRecord>, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(LIST_ORDERS_SQL)
            .bind(filter.status.as_ref().map(OrderStatus::to_str))
            .bind(filter.payment_status.as_ref().map(PaymentStatus::to_str))
            .bind(filter.created_after.map(SqlxTimestamp::from))
            .bind(filter.created_before.map(SqlxTimestamp::from))
            .bind(filter.total_min)
            .bind(filter.total_max)
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn set_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        status: OrderStatus,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(SET_ORDER_STATUS_SQL)
            .bind(order.into_uuid())
            .bind(status.to_str())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn set_payment_status(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        order: OrderUuid,
        status: PaymentStatus,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(SET_PAYMENT_STATUS_SQL)
            .bind(order.into_uuid())
            .bind(status.to_str())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn order_summary(
        &self,
        tx: &mut Transaction<'_, Postgres>,
    ) -> Result<OrderSummary, sqlx::Error> {
        query_as::<Postgres, OrderSummary>(ORDER_SUMMARY_SQL)
            .fetch_one(&mut **tx)
            .await
    }
}

fn try_get_parsed<T>(row: &PgRow, col: &str) -> Result<T, sqlx::Error>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value: String = row.try_get(col)?;

    value.parse().map_err(|e| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}

fn try_get_count(row: &PgRow, col: &str) -> Result<u64, sqlx::Error> {
    let count: i64 = row.try_get(col)?;

    u64::try_from(count).map_err(|e| sqlx::Error::ColumnDecode {
        index: col.to_string(),
        source: Box::new(e),
    })
}

impl<'r> FromRow<'r, PgRow> for OrderRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            order_number: row.try_get("order_number")?,
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            status: try_get_parsed(row, "status")?,
            payment_status: try_get_parsed(row, "payment_status")?,
            payment_method: try_get_parsed(row, "payment_method")?,
            payment_reference: row.try_get("payment_reference")?,
            promo_code: row.try_get("promo_code")?,
            subtotal: row.try_get("subtotal")?,
            tax_amount: row.try_get("tax_amount")?,
            shipping_amount: row.try_get("shipping_amount")?,
            discount_amount: row.try_get("discount_amount")?,
            total_amount: row.try_get("total_amount")?,
            shipping: ContactDetails {
                name: row.try_get("shipping_name")?,
                phone: row.try_get("shipping_phone")?,
                address: row.try_get("shipping_address")?,
            },
            billing: ContactDetails {
                name: row.try_get("billing_name")?,
                phone: row.try_get("billing_phone")?,
                address: row.try_get("billing_address")?,
            },
            tracking_number: row.try_get("tracking_number")?,
            items: Vec::new(),
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
            shipped_at: row
                .try_get::<Option<SqlxTimestamp>, _>("shipped_at")?
                .map(SqlxTimestamp::to_jiff),
            delivered_at: row
                .try_get::<Option<SqlxTimestamp>, _>("delivered_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}

impl<'r> FromRow<'r, PgRow> for OrderSummary {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            total_orders: try_get_count(row, "total_orders")?,
            pending_orders: try_get_count(row, "pending_orders")?,
            delivered_orders: try_get_count(row, "delivered_orders")?,
            cancelled_orders: try_get_count(row, "cancelled_orders")?,
            total_spent: row.try_get("total_spent")?,
        })
    }
}
