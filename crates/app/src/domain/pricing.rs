//! Pricing
//!
//! Turns priced line items and an optional promo into order totals. All
//! amounts are rounded to cents, half away from zero.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::domain::promo_codes::records::AppliedPromo;

/// Round a monetary amount to cents.
#[must_use]
pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Tax and shipping rules applied at checkout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PricingPolicy {
    /// Fraction of the subtotal charged as tax, e.g. `0.10`.
    pub tax_rate: Decimal,
    /// Subtotal at or above which shipping is free.
    pub free_shipping_threshold: Decimal,
    /// Shipping charged below the threshold.
    pub flat_shipping: Decimal,
}

impl Default for PricingPolicy {
    fn default() -> Self {
        Self {
            tax_rate: Decimal::new(10, 2),
            free_shipping_threshold: Decimal::new(50, 0),
            flat_shipping: Decimal::new(10, 0),
        }
    }
}

/// A priced quantity of one product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineItem {
    pub unit_price: Decimal,
    pub quantity: u32,
}

impl LineItem {
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.unit_price * Decimal::from(self.quantity)
    }
}

/// Order totals.
///
/// `total == subtotal + tax + shipping - discount`, never below zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriceBreakdown {
    pub subtotal: Decimal,
    pub tax: Decimal,
    pub shipping: Decimal,
    pub discount: Decimal,
    pub total: Decimal,
}

impl PricingPolicy {
    #[must_use]
    pub fn subtotal(&self, lines: &[LineItem]) -> Decimal {
        round_money(lines.iter().map(LineItem::subtotal).sum())
    }

    #[must_use]
    pub fn tax(&self, subtotal: Decimal) -> Decimal {
        round_money(subtotal * self.tax_rate)
    }

    #[must_use]
    pub fn shipping(&self, subtotal: Decimal) -> Decimal {
        if subtotal >= self.free_shipping_threshold {
            Decimal::ZERO
        } else {
            self.flat_shipping
        }
    }

    /// Compute totals for `lines`, applying `promo` if given.
    #[must_use]
    pub fn compute(&self, lines: &[LineItem], promo: Option<&AppliedPromo>) -> PriceBreakdown {
        let subtotal = self.subtotal(lines);
        let tax = self.tax(subtotal);
        let shipping = self.shipping(subtotal);

        let discount = promo.map_or(Decimal::ZERO, |promo| {
            round_money(promo.discount_amount.min(subtotal).max(Decimal::ZERO))
        });

        let total = (subtotal + tax + shipping - discount).max(Decimal::ZERO);

        PriceBreakdown {
            subtotal,
            tax,
            shipping,
            discount,
            total,
        }
    }
}
