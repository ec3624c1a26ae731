//! Promo Code Handlers

pub(crate) mod validate;
