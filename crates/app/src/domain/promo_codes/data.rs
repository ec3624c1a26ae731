//! Promo Codes Data

use jiff::Timestamp;
use rust_decimal::Decimal;

use crate::domain::promo_codes::records::{DiscountRule, PromoCodeUuid};

/// New Promo Code Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewPromoCode {
    pub uuid: PromoCodeUuid,
    pub code: String,
    pub discount: DiscountRule,
    pub minimum_amount: Decimal,
    pub valid_from: Timestamp,
    pub valid_until: Timestamp,
    pub is_active: bool,
}
