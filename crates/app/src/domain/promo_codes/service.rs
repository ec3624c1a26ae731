//! Promo codes service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use rust_decimal::Decimal;
use tracing::info;

use crate::{
    database::Db,
    domain::promo_codes::{
        data::NewPromoCode,
        errors::PromoCodesServiceError,
        records::{AppliedPromo, PromoCodeRecord},
        repository::PgPromoCodesRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgPromoCodesService {
    db: Db,
    repository: PgPromoCodesRepository,
}

impl PgPromoCodesService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgPromoCodesRepository::new(),
        }
    }
}

#[async_trait]
impl PromoCodesService for PgPromoCodesService {
    #[tracing::instrument(
        name = "promo_codes.service.validate",
        skip(self),
        err
    )]
    async fn validate(
        &self,
        code: String,
        subtotal: Decimal,
    ) -> Result<AppliedPromo, PromoCodesServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let promo = self.repository.find_by_code(&mut tx, &code).await?;

        tx.commit().await?;

        promo.evaluate(subtotal, Timestamp::now())
    }

    #[tracing::instrument(
        name = "promo_codes.service.create_promo_code",
        skip(self, promo),
        fields(promo_code_uuid = %promo.uuid, code = %promo.code),
        err
    )]
    async fn create_promo_code(
        &self,
        promo: NewPromoCode,
    ) -> Result<PromoCodeRecord, PromoCodesServiceError> {
        if promo.code.trim().is_empty() || promo.valid_until < promo.valid_from {
            return Err(PromoCodesServiceError::InvalidData);
        }

        let mut tx = self.db.begin_transaction().await?;

        let created = self.repository.create_promo_code(&mut tx, promo).await?;

        tx.commit().await?;

        info!("created promo code");

        Ok(created)
    }
}

#[automock]
#[async_trait]
pub trait PromoCodesService: Send + Sync {
    /// Check a code against a subtotal without recording a use.
    async fn validate(
        &self,
        code: String,
        subtotal: Decimal,
    ) -> Result<AppliedPromo, PromoCodesServiceError>;

    /// Creates a new promo code.
    async fn create_promo_code(
        &self,
        promo: NewPromoCode,
    ) -> Result<PromoCodeRecord, PromoCodesServiceError>;
}

#[cfg(test)]
mod tests {
    use jiff::ToSpan;
    use testresult::TestResult;

    use crate::{
        domain::promo_codes::records::{DiscountRule, PromoCodeUuid},
        test::TestContext,
    };

    use super::*;

    #[tokio::test]
    async fn validate_known_code_returns_discount() -> TestResult {
        let ctx = TestContext::new().await;
        ctx.create_save10().await?;

        let applied = ctx
            .promo_codes
            .validate("SAVE10".to_string(), Decimal::new(40, 0))
            .await?;

        assert_eq!(applied.discount_amount, Decimal::new(400, 2));
        assert_eq!(applied.discount.to_str(), "percentage");

        Ok(())
    }

    #[tokio::test]
    async fn validate_does_not_count_a_use() -> TestResult {
        let ctx = TestContext::new().await;
        ctx.create_save10().await?;

        ctx.promo_codes
            .validate("SAVE10".to_string(), Decimal::new(40, 0))
            .await?;

        assert_eq!(ctx.promo_usage_count("SAVE10").await, 0);

        Ok(())
    }

    #[tokio::test]
    async fn validate_unknown_code_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx
            .promo_codes
            .validate("NOPE".to_string(), Decimal::new(40, 0))
            .await;

        assert!(
            matches!(result, Err(PromoCodesServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn validate_below_minimum_returns_minimum_not_met() -> TestResult {
        let ctx = TestContext::new().await;
        ctx.create_save10().await?;

        let result = ctx
            .promo_codes
            .validate("SAVE10".to_string(), Decimal::new(20, 0))
            .await;

        assert!(matches!(
            result,
            Err(PromoCodesServiceError::MinimumNotMet { .. })
        ));

        Ok(())
    }

    #[tokio::test]
    async fn validate_lapsed_code_returns_expired() -> TestResult {
        let ctx = TestContext::new().await;
        let now = Timestamp::now();

        ctx.promo_codes
            .create_promo_code(NewPromoCode {
                uuid: PromoCodeUuid::new(),
                code: "OLD".to_string(),
                discount: DiscountRule::FixedAmount {
                    amount: Decimal::new(5, 0),
                },
                minimum_amount: Decimal::ZERO,
                valid_from: now.checked_sub(48.hours())?,
                valid_until: now.checked_sub(24.hours())?,
                is_active: true,
            })
            .await?;

        let result = ctx
            .promo_codes
            .validate("OLD".to_string(), Decimal::new(40, 0))
            .await;

        assert!(matches!(result, Err(PromoCodesServiceError::Expired)));

        Ok(())
    }

    #[tokio::test]
    async fn create_promo_code_duplicate_returns_already_exists() -> TestResult {
        let ctx = TestContext::new().await;
        ctx.create_save10().await?;

        let result = ctx.create_save10().await;

        assert!(
            matches!(result, Err(PromoCodesServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn create_promo_code_over_one_hundred_percent_returns_invalid_data() -> TestResult {
        let ctx = TestContext::new().await;
        let now = Timestamp::now();

        let result = ctx
            .promo_codes
            .create_promo_code(NewPromoCode {
                uuid: PromoCodeUuid::new(),
                code: "GREEDY".to_string(),
                discount: DiscountRule::Percentage {
                    percent: Decimal::new(150, 0),
                },
                minimum_amount: Decimal::ZERO,
                valid_from: now,
                valid_until: now.checked_add(1.hour())?,
                is_active: true,
            })
            .await;

        assert!(matches!(result, Err(PromoCodesServiceError::InvalidData)));

        Ok(())
    }
}
