//! Orders Data

use jiff::Timestamp;
use rust_decimal::Decimal;

use crate::domain::{
    orders::records::{
        ContactDetails, OrderItemUuid, OrderStatus, OrderUuid, PaymentMethod, PaymentStatus,
    },
    pricing::PriceBreakdown,
    products::records::ProductUuid,
    users::records::UserUuid,
};

/// New Order Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    pub uuid: OrderUuid,
    pub user_uuid: UserUuid,
    pub totals: PriceBreakdown,
    pub shipping: ContactDetails,
    pub billing: ContactDetails,
    pub payment_method: PaymentMethod,
    pub payment_reference: Option<String>,
    pub promo_code: Option<String>,
}

/// New Order Item Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrderItem {
    pub uuid: OrderItemUuid,
    pub product_uuid: ProductUuid,
    pub product_name: String,
    pub product_price: Decimal,
    pub quantity: u32,
}

impl NewOrderItem {
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.product_price * Decimal::from(self.quantity)
    }
}

/// Order listing filters; `None` fields do not filter.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub created_after: Option<Timestamp>,
    pub created_before: Option<Timestamp>,
    pub total_min: Option<Decimal>,
    pub total_max: Option<Decimal>,
}
