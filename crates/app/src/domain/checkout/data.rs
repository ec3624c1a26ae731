//! Checkout Data

use crate::domain::orders::records::{ContactDetails, PaymentMethod};

/// What the customer submits to place an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceOrder {
    pub shipping: ContactDetails,
    pub billing: ContactDetails,
    pub payment_method: PaymentMethod,
    pub promo_code: Option<String>,
}

impl PlaceOrder {
    /// Blank-trimmed promo code, if one was given.
    #[must_use]
    pub fn promo_code(&self) -> Option<&str> {
        self.promo_code
            .as_deref()
            .map(str::trim)
            .filter(|code| !code.is_empty())
    }

    pub(crate) fn has_contact_details(&self) -> bool {
        [&self.shipping, &self.billing].iter().all(|details| {
            !details.name.trim().is_empty()
                && !details.phone.trim().is_empty()
                && !details.address.trim().is_empty()
        })
    }
}
