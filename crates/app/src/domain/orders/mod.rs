//! Orders

pub mod data;
pub mod errors;
pub mod numbers;
pub mod records;
pub(crate) mod repositories;
pub mod service;

pub use errors::OrdersServiceError;
pub use service::*;
