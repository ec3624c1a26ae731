//! Promo Code Records

use jiff::Timestamp;
use rust_decimal::Decimal;

use crate::uuids::TypedUuid;

/// Promo Code UUID
pub type PromoCodeUuid = TypedUuid<PromoCodeRecord>;

/// How a promo code reduces the subtotal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscountRule {
    /// Percentage of the subtotal, `0..=100`.
    Percentage { percent: Decimal },
    /// Fixed amount off the subtotal.
    FixedAmount { amount: Decimal },
}

impl DiscountRule {
    #[must_use]
    pub const fn to_str(&self) -> &'static str {
        match self {
            Self::Percentage { .. } => "percentage",
            Self::FixedAmount { .. } => "fixed",
        }
    }

    #[must_use]
    pub const fn value(&self) -> Decimal {
        match self {
            Self::Percentage { percent } => *percent,
            Self::FixedAmount { amount } => *amount,
        }
    }

    /// Rebuild a rule from its stored `discount_type` and `discount_value`.
    #[must_use]
    pub fn from_parts(discount_type: &str, value: Decimal) -> Option<Self> {
        match discount_type {
            "percentage" => Some(Self::Percentage { percent: value }),
            "fixed" => Some(Self::FixedAmount { amount: value }),
            _ => None,
        }
    }
}

/// Promo Code Record
#[derive(Debug, Clone, PartialEq)]
pub struct PromoCodeRecord {
    pub uuid: PromoCodeUuid,
    pub code: String,
    pub discount: DiscountRule,
    pub minimum_amount: Decimal,
    pub valid_from: Timestamp,
    pub valid_until: Timestamp,
    pub is_active: bool,
    pub usage_count: u32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A promo code that passed validation against a subtotal.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedPromo {
    pub promo_uuid: PromoCodeUuid,
    pub code: String,
    pub discount: DiscountRule,
    pub discount_amount: Decimal,
}
