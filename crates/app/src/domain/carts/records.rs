//! Cart Records

use jiff::Timestamp;
use rust_decimal::Decimal;

use crate::{
    domain::{products::records::ProductUuid, users::records::UserUuid},
    uuids::TypedUuid,
};

/// Cart UUID
pub type CartUuid = TypedUuid<CartRecord>;

/// Cart Record
///
/// `items` only holds active lines, joined with the live catalog.
#[derive(Debug, Clone)]
pub struct CartRecord {
    pub uuid: CartUuid,
    pub user_uuid: UserUuid,
    pub items: Vec<CartLine>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl CartRecord {
    /// Number of units across all active lines.
    #[must_use]
    pub fn total_items(&self) -> u32 {
        self.items.iter().map(|line| line.item.quantity).sum()
    }

    /// Sum of line subtotals at live catalog prices.
    #[must_use]
    pub fn total_price(&self) -> Decimal {
        self.items.iter().map(CartLine::subtotal).sum()
    }
}

/// Cart Item UUID
pub type CartItemUuid = TypedUuid<CartItemRecord>;

/// Whether a cart item still counts towards the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartItemState {
    Active,
    Removed { at: Timestamp },
}

impl CartItemState {
    #[must_use]
    pub fn from_removed_at(removed_at: Option<Timestamp>) -> Self {
        match removed_at {
            Some(at) => Self::Removed { at },
            None => Self::Active,
        }
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active)
    }
}

/// CartItem Record
#[derive(Debug, Clone, PartialEq)]
pub struct CartItemRecord {
    pub uuid: CartItemUuid,
    pub cart_uuid: CartUuid,
    pub product_uuid: ProductUuid,
    pub quantity: u32,
    pub state: CartItemState,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// An active cart item with its product's current name, price and stock.
#[derive(Debug, Clone, PartialEq)]
pub struct CartLine {
    pub item: CartItemRecord,
    pub product_name: String,
    pub unit_price: Decimal,
    pub stock_quantity: u32,

    /// False once the product has been deleted from the catalog.
    pub product_available: bool,
}

impl CartLine {
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.unit_price * Decimal::from(self.item.quantity)
    }

    /// Whether checkout would currently accept this line.
    #[must_use]
    pub fn is_purchasable(&self) -> bool {
        self.product_available && self.stock_quantity >= self.item.quantity
    }
}

/// What `add_item` did to the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddItemOutcome {
    /// A new line was created with the requested quantity.
    Added,
    /// A previously removed line was reactivated with quantity 1.
    Restored,
    /// The product was already in the cart; nothing changed.
    AlreadyPresent,
}

/// Result of adding a product to a cart.
#[derive(Debug, Clone, PartialEq)]
pub struct AddedCartItem {
    pub item: CartItemRecord,
    pub outcome: AddItemOutcome,
}
