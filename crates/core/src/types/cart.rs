//! Cart line items and the totals derived from them.

use core::fmt;
use core::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use super::catalog::Product;
use super::id::{CartItemId, ProductId};
use super::price::Price;
use super::session::SessionId;

/// Errors that can occur when building a [`Quantity`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityError {
    #[error("quantity must be at least 1 (got {0})")]
    TooSmall(i64),
    #[error("quantity {0} is out of range")]
    OutOfRange(i64),
}

/// Number of units on a cart line. Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u32")]
pub struct Quantity(NonZeroU32);

impl Quantity {
    /// A single unit.
    pub const ONE: Self = Self(NonZeroU32::MIN);

    /// Build a quantity from any integer.
    ///
    /// # Errors
    ///
    /// Returns [`QuantityError::TooSmall`] for zero or negative input and
    /// [`QuantityError::OutOfRange`] when the value does not fit the column.
    pub fn new(value: i64) -> Result<Self, QuantityError> {
        if value < 1 {
            return Err(QuantityError::TooSmall(value));
        }
        // Stored as int4 in the database.
        let value = i32::try_from(value).map_err(|_| QuantityError::OutOfRange(value))?;
        let value = value.unsigned_abs();
        NonZeroU32::new(value)
            .map(Self)
            .ok_or(QuantityError::TooSmall(0))
    }

    #[must_use]
    pub const fn get(self) -> u32 {
        self.0.get()
    }

    /// Value as the `int4` the cart table stores.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        // `new` caps the value at i32::MAX.
        i32::try_from(self.0.get()).unwrap_or(i32::MAX)
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ONE
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for Quantity {
    type Error = QuantityError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quantity> for u32 {
    fn from(quantity: Quantity) -> Self {
        quantity.get()
    }
}

/// A cart line joined with its product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: CartItemId,
    pub product: Product,
    pub quantity: Quantity,
    pub size: Option<String>,
    pub color: Option<String>,
}

impl CartItem {
    /// Unit price times quantity.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.product.price.times(self.quantity.get())
    }
}

/// A cart line about to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCartItem {
    pub session_id: SessionId,
    pub product_id: ProductId,
    pub quantity: Quantity,
    pub size: Option<String>,
    pub color: Option<String>,
}

/// Totals shown on the cart page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CartSummary {
    /// Sum of quantities across all lines.
    pub units: u32,
    pub subtotal: Price,
}

impl CartSummary {
    #[must_use]
    pub fn of(items: &[CartItem]) -> Self {
        Self {
            units: items
                .iter()
                .fold(0, |units: u32, item| units.saturating_add(item.quantity.get())),
            subtotal: items.iter().map(CartItem::line_total).sum(),
        }
    }
}

/// Totals shown on the checkout page.
///
/// Shipping and taxes are flat demo amounts; no real pricing happens here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckoutSummary {
    pub units: u32,
    pub subtotal: Price,
    pub shipping: Price,
    pub taxes: Price,
}

impl CheckoutSummary {
    /// Flat shipping charge.
    pub const SHIPPING_CENTS: i64 = 800;
    /// Flat tax charge.
    pub const TAXES_CENTS: i64 = 619;

    #[must_use]
    pub fn of(items: &[CartItem]) -> Self {
        let cart = CartSummary::of(items);
        Self {
            units: cart.units,
            subtotal: cart.subtotal,
            shipping: Price::from_cents(Self::SHIPPING_CENTS),
            taxes: Price::from_cents(Self::TAXES_CENTS),
        }
    }

    #[must_use]
    pub fn total(&self) -> Price {
        self.subtotal + self.shipping + self.taxes
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn item(cents: i64, quantity: i64) -> CartItem {
        CartItem {
            id: CartItemId::random(),
            product: Product {
                id: ProductId::random(),
                category_id: None,
                name: "Duty Boot".to_owned(),
                description: String::new(),
                price: Price::from_cents(cents),
                sku: "BT-100".to_owned(),
                image_url: None,
                specs: BTreeMap::new(),
                sizes: Vec::new(),
                colors: Vec::new(),
            },
            quantity: Quantity::new(quantity).unwrap(),
            size: None,
            color: None,
        }
    }

    #[test]
    fn test_quantity_rejects_zero_and_negative() {
        assert_eq!(Quantity::new(0), Err(QuantityError::TooSmall(0)));
        assert_eq!(Quantity::new(-3), Err(QuantityError::TooSmall(-3)));
        assert_eq!(Quantity::new(1).unwrap(), Quantity::ONE);
    }

    #[test]
    fn test_quantity_rejects_overflow() {
        assert!(matches!(
            Quantity::new(i64::from(i32::MAX) + 1),
            Err(QuantityError::OutOfRange(_))
        ));
    }

    #[test]
    fn test_quantity_deserialize_validates() {
        assert_eq!(serde_json::from_str::<Quantity>("2").unwrap().get(), 2);
        assert!(serde_json::from_str::<Quantity>("0").is_err());
    }

    #[test]
    fn test_line_total() {
        assert_eq!(item(2450, 3).line_total(), Price::from_cents(7350));
    }

    #[test]
    fn test_cart_summary() {
        let summary = CartSummary::of(&[item(1000, 2), item(550, 1)]);
        assert_eq!(summary.units, 3);
        assert_eq!(summary.subtotal, Price::from_cents(2550));
    }

    #[test]
    fn test_empty_cart_summary() {
        assert_eq!(CartSummary::of(&[]), CartSummary::default());
    }

    #[test]
    fn test_checkout_total_adds_flat_charges() {
        let summary = CheckoutSummary::of(&[item(1000, 1)]);
        assert_eq!(summary.total(), Price::from_cents(1000 + 800 + 619));
        assert_eq!(summary.total().to_string(), "$24.19");
    }
}
