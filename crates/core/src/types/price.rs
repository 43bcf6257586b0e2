//! Type-safe price representation using decimal arithmetic.
//!
//! The storefront only sells in US dollars, so a [`Price`] is a plain decimal
//! amount in dollars. Arithmetic stays in `Decimal` to avoid the float drift
//! that `price * quantity` would accumulate across a cart.

use core::fmt;
use core::iter::Sum;
use core::ops::{Add, Sub};

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A price in US dollars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Zero dollars.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Create a price from a decimal dollar amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from an integer number of cents.
    ///
    /// ```
    /// use quartermaster_core::Price;
    ///
    /// assert_eq!(Price::from_cents(1999).to_string(), "$19.99");
    /// ```
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// The amount in dollars.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// This price multiplied by a unit count.
    #[must_use]
    pub fn times(self, units: u32) -> Self {
        Self(self.0 * Decimal::from(units))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rounded = self
            .0
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
        if rounded.is_sign_negative() && !rounded.is_zero() {
            write!(f, "-${:.2}", rounded.abs())
        } else {
            write!(f, "${:.2}", rounded.abs())
        }
    }
}

impl Add for Price {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

impl Sub for Price {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl Sum for Price {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

/// Spending allowance shown in the storefront header.
///
/// `available` is what is left after what was already spent and what is
/// currently sitting in the cart. It can go negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Allotment {
    pub total: Price,
    pub used: Price,
    pub in_cart: Price,
}

impl Allotment {
    /// Default allotment granted to every account.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(Price::from_cents(99_999))
    }

    /// Create an allotment with nothing used and nothing in the cart.
    #[must_use]
    pub const fn new(total: Price) -> Self {
        Self {
            total,
            used: Price::ZERO,
            in_cart: Price::ZERO,
        }
    }

    /// Set the amount currently in the cart.
    #[must_use]
    pub const fn with_cart(mut self, in_cart: Price) -> Self {
        self.in_cart = in_cart;
        self
    }

    /// Remaining allowance.
    #[must_use]
    pub fn available(&self) -> Price {
        self.total - self.used - self.in_cart
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_pads_to_cents() {
        assert_eq!(Price::new(Decimal::new(8, 0)).to_string(), "$8.00");
        assert_eq!(Price::from_cents(619).to_string(), "$6.19");
        assert_eq!(Price::new(Decimal::new(12_345, 3)).to_string(), "$12.35");
    }

    #[test]
    fn test_display_negative() {
        assert_eq!(Price::from_cents(-250).to_string(), "-$2.50");
    }

    #[test]
    fn test_times() {
        assert_eq!(Price::from_cents(1999).times(3), Price::from_cents(5997));
        assert_eq!(Price::from_cents(1999).times(0), Price::ZERO);
    }

    #[test]
    fn test_sum() {
        let total: Price = [Price::from_cents(100), Price::from_cents(250)]
            .into_iter()
            .sum();
        assert_eq!(total, Price::from_cents(350));
    }

    #[test]
    fn test_allotment_available() {
        let allotment = Allotment::standard().with_cart(Price::from_cents(10_000));
        assert_eq!(allotment.available(), Price::from_cents(89_999));
        assert_eq!(allotment.total.to_string(), "$999.99");
    }
}
