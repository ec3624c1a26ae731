//! Promo Codes

pub mod data;
pub mod errors;
pub mod evaluator;
pub mod records;
pub(crate) mod repository;
pub mod service;

pub use errors::PromoCodesServiceError;
pub use service::*;
