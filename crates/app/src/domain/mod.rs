//! Shopfusion Domain Concerns

pub mod carts;
pub mod checkout;
pub mod orders;
pub mod payments;
pub mod pricing;
pub mod products;
pub mod promo_codes;
pub mod users;
