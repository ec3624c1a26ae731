//! Promo Codes Repository

use jiff::Timestamp;
use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query_as, query_scalar};

use crate::{
    database::try_get_u32,
    domain::promo_codes::{
        data::NewPromoCode,
        records::{DiscountRule, PromoCodeRecord, PromoCodeUuid},
    },
};

const FIND_PROMO_CODE_BY_CODE_SQL: &str = include_str!("sql/find_promo_code_by_code.sql");
const CREATE_PROMO_CODE_SQL: &str = include_str!("sql/create_promo_code.sql");
const REDEEM_PROMO_CODE_SQL: &str = include_str!("sql/redeem_promo_code.sql");

#[derive(Debug, Clone, Default)]
pub(crate) struct PgPromoCodesRepository;

impl PgPromoCodesRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn find_by_code(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        code: &str,
    ) -> Result<PromoCodeRecord, sqlx::Error> {
        query_as::<Postgres, PromoCodeRecord>(FIND_PROMO_CODE_BY_CODE_SQL)
            .bind(code)
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_promo_code(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        promo: NewPromoCode,
    ) -> Result<PromoCodeRecord, sqlx::Error> {
        query_as::<Postgres, PromoCodeRecord>(CREATE_PROMO_CODE_SQL)
            .bind(promo.uuid.into_uuid())
            .bind(promo.code)
            .bind(promo.discount.to_str())
            .bind(promo.discount.value())
            .bind(promo.minimum_amount)
            .bind(SqlxTimestamp::from(promo.valid_from))
            .bind(SqlxTimestamp::from(promo.valid_until))
            .bind(promo.is_active)
            .fetch_one(&mut **tx)
            .await
    }

    /// Count one use of the code, provided it is still usable at `at`.
    ///
    /// Returns the new usage count, or `None` if the code stopped being usable
    /// since it was validated.
    pub(crate) async fn redeem(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        promo: PromoCodeUuid,
        at: Timestamp,
    ) -> Result<Option<u32>, sqlx::Error> {
        let usage_count: Option<i32> = query_scalar(REDEEM_PROMO_CODE_SQL)
            .bind(promo.into_uuid())
            .bind(SqlxTimestamp::from(at))
            .fetch_optional(&mut **tx)
            .await?;

        usage_count
            .map(|count| {
                u32::try_from(count).map_err(|e| sqlx::Error::ColumnDecode {
                    index: "usage_count".to_string(),
                    source: Box::new(e),
                })
            })
            .transpose()
    }
}

impl<'r> FromRow<'r, PgRow> for PromoCodeRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let discount_type: String = row.try_get("discount_type")?;

        let discount = DiscountRule::from_parts(&discount_type, row.try_get("discount_value")?)
            .ok_or_else(|| sqlx::Error::ColumnDecode {
                index: "discount_type".to_string(),
                source: format!("unknown discount type `{discount_type}`").into(),
            })?;

        Ok(Self {
            uuid: PromoCodeUuid::from_uuid(row.try_get("uuid")?),
            code: row.try_get("code")?,
            discount,
            minimum_amount: row.try_get("minimum_amount")?,
            valid_from: row.try_get::<SqlxTimestamp, _>("valid_from")?.to_jiff(),
            valid_until: row.try_get::<SqlxTimestamp, _>("valid_until")?.to_jiff(),
            is_active: row.try_get("is_active")?,
            usage_count: try_get_u32(row, "usage_count")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
