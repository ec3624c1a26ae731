//! Pricing Config

use clap::Args;
use rust_decimal::Decimal;

use shopfusion_app::domain::pricing::PricingPolicy;

/// Checkout pricing settings.
#[derive(Debug, Args)]
pub struct PricingConfig {
    /// Tax charged on the subtotal, as a fraction
    #[arg(long, env = "TAX_RATE", default_value = "0.10")]
    pub tax_rate: Decimal,

    /// Subtotal at or above which shipping is free
    #[arg(long, env = "FREE_SHIPPING_THRESHOLD", default_value = "50.00")]
    pub free_shipping_threshold: Decimal,

    /// Shipping charged below the free shipping threshold
    #[arg(long, env = "FLAT_SHIPPING", default_value = "10.00")]
    pub flat_shipping: Decimal,
}

impl From<&PricingConfig> for PricingPolicy {
    fn from(config: &PricingConfig) -> Self {
        PricingPolicy {
            tax_rate: config.tax_rate,
            free_shipping_threshold: config.free_shipping_threshold,
            flat_shipping: config.flat_shipping,
        }
    }
}
