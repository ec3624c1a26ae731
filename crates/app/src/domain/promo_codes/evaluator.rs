//! Promo code evaluation.
//!
//! Checks run in a fixed order: the code must be active and inside its
//! validity window, then the subtotal must reach the minimum amount.

use jiff::Timestamp;
use rust_decimal::Decimal;

use crate::domain::{
    pricing::round_money,
    promo_codes::{
        errors::PromoCodesServiceError,
        records::{AppliedPromo, DiscountRule, PromoCodeRecord},
    },
};

impl PromoCodeRecord {
    /// Whether the code can be used at `at`, ignoring the minimum amount.
    #[must_use]
    pub fn is_usable_at(&self, at: Timestamp) -> bool {
        self.is_active && self.valid_from <= at && at <= self.valid_until
    }

    /// Evaluate this code against a subtotal.
    ///
    /// # Errors
    ///
    /// Returns [`PromoCodesServiceError::Expired`] when the code is inactive or
    /// outside its window, and [`PromoCodesServiceError::MinimumNotMet`] when
    /// the subtotal is below the minimum amount.
    pub fn evaluate(
        &self,
        subtotal: Decimal,
        at: Timestamp,
    ) -> Result<AppliedPromo, PromoCodesServiceError> {
        if !self.is_usable_at(at) {
            return Err(PromoCodesServiceError::Expired);
        }

        if subtotal < self.minimum_amount {
            return Err(PromoCodesServiceError::MinimumNotMet {
                minimum: self.minimum_amount,
            });
        }

        Ok(AppliedPromo {
            promo_uuid: self.uuid,
            code: self.code.clone(),
            discount: self.discount,
            discount_amount: discount_amount(self.discount, subtotal),
        })
    }
}

/// Discount for `subtotal`, capped at the subtotal and rounded to cents.
#[must_use]
pub fn discount_amount(rule: DiscountRule, subtotal: Decimal) -> Decimal {
    let raw = match rule {
        DiscountRule::Percentage { percent } => subtotal * percent / Decimal::ONE_HUNDRED,
        DiscountRule::FixedAmount { amount } => amount,
    };

    round_money(raw.min(subtotal).max(Decimal::ZERO))
}

#[cfg(test)]
mod tests {
    use jiff::ToSpan;
    use testresult::TestResult;

    use crate::domain::promo_codes::records::PromoCodeUuid;

    use super::*;

    fn save10(now: Timestamp) -> Result<PromoCodeRecord, jiff::Error> {
        Ok(PromoCodeRecord {
            uuid: PromoCodeUuid::new(),
            code: "SAVE10".to_string(),
            discount: DiscountRule::Percentage {
                percent: Decimal::TEN,
            },
            minimum_amount: Decimal::new(30, 0),
            valid_from: now.checked_sub(1.hour())?,
            valid_until: now.checked_add(1.hour())?,
            is_active: true,
            usage_count: 0,
            created_at: now,
            updated_at: now,
        })
    }

    #[test]
    fn percentage_discount_applies_to_subtotal() -> TestResult {
        let now = Timestamp::now();

        let applied = save10(now)?.evaluate(Decimal::new(40, 0), now)?;

        assert_eq!(applied.discount_amount, Decimal::new(400, 2));
        assert_eq!(applied.code, "SAVE10");

        Ok(())
    }

    #[test]
    fn subtotal_below_minimum_is_rejected() -> TestResult {
        let now = Timestamp::now();

        let result = save10(now)?.evaluate(Decimal::new(20, 0), now);

        assert!(
            matches!(result, Err(PromoCodesServiceError::MinimumNotMet { minimum }) if minimum == Decimal::new(30, 0)),
            "expected MinimumNotMet, got {result:?}"
        );

        Ok(())
    }

    #[test]
    fn subtotal_equal_to_minimum_is_accepted() -> TestResult {
        let now = Timestamp::now();

        let applied = save10(now)?.evaluate(Decimal::new(30, 0), now)?;

        assert_eq!(applied.discount_amount, Decimal::new(300, 2));

        Ok(())
    }

    #[test]
    fn inactive_code_is_expired() -> TestResult {
        let now = Timestamp::now();
        let mut promo = save10(now)?;
        promo.is_active = false;

        let result = promo.evaluate(Decimal::new(40, 0), now);

        assert!(matches!(result, Err(PromoCodesServiceError::Expired)));

        Ok(())
    }

    #[test]
    fn code_outside_window_is_expired() -> TestResult {
        let now = Timestamp::now();
        let promo = save10(now)?;

        let early = promo.evaluate(Decimal::new(40, 0), now.checked_sub(2.hours())?);
        let late = promo.evaluate(Decimal::new(40, 0), now.checked_add(2.hours())?);

        assert!(matches!(early, Err(PromoCodesServiceError::Expired)));
        assert!(matches!(late, Err(PromoCodesServiceError::Expired)));

        Ok(())
    }

    #[test]
    fn expiry_is_checked_before_minimum() -> TestResult {
        let now = Timestamp::now();
        let mut promo = save10(now)?;
        promo.is_active = false;

        let result = promo.evaluate(Decimal::ONE, now);

        assert!(matches!(result, Err(PromoCodesServiceError::Expired)));

        Ok(())
    }

    #[test]
    fn fixed_discount_is_capped_at_subtotal() {
        let rule = DiscountRule::FixedAmount {
            amount: Decimal::new(25, 0),
        };

        assert_eq!(discount_amount(rule, Decimal::new(1999, 2)), Decimal::new(1999, 2));
        assert_eq!(discount_amount(rule, Decimal::new(100, 0)), Decimal::new(25, 0));
    }

    #[test]
    fn percentage_discount_rounds_half_away_from_zero() {
        let rule = DiscountRule::Percentage {
            percent: Decimal::new(15, 0),
        };

        // 15% of 0.30 is 0.045
        assert_eq!(discount_amount(rule, Decimal::new(30, 2)), Decimal::new(5, 2));
    }
}
