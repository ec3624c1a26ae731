//! Cart Data

use crate::domain::products::records::ProductUuid;

/// Largest quantity a cart line can hold; quantities are stored as `INTEGER`.
pub const MAX_CART_ITEM_QUANTITY: u32 = i32::MAX.unsigned_abs();

/// Whether `quantity` can be stored on a cart line.
#[must_use]
pub const fn is_valid_quantity(quantity: u32) -> bool {
    matches!(quantity, 1..=MAX_CART_ITEM_QUANTITY)
}

/// New Cart Item Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewCartItem {
    pub product_uuid: ProductUuid,
    pub quantity: u32,
}
