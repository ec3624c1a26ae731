//! Product Records

use jiff::Timestamp;
use rust_decimal::Decimal;

use crate::uuids::TypedUuid;

/// Product UUID
pub type ProductUuid = TypedUuid<ProductRecord>;

/// Product Record
#[derive(Debug, Clone, PartialEq)]
pub struct ProductRecord {
    pub uuid: ProductUuid,
    pub name: String,
    pub price: Decimal,
    pub stock_quantity: u32,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

impl ProductRecord {
    /// Whether `quantity` units can currently be taken from stock.
    #[must_use]
    pub fn has_stock_for(&self, quantity: u32) -> bool {
        self.deleted_at.is_none() && self.stock_quantity >= quantity
    }
}
