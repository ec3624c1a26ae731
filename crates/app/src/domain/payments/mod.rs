//! Payments

pub mod errors;
pub mod gateway;
pub mod razorpay;

pub use errors::PaymentGatewayError;
pub use gateway::*;
pub use razorpay::{RazorpayConfig, RazorpayGateway};
