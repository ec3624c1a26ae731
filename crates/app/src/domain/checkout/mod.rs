//! Checkout
//!
//! Moves a user's cart into an order: validate the cart against live stock,
//! price it, collect payment for online methods, then write the order, take
//! the stock, clear the cart and redeem the promo code in one transaction.

pub mod data;
pub mod errors;
pub mod service;

pub use data::*;
pub use errors::CheckoutError;
pub use service::*;
