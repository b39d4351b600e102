//! Type-safe price representation using decimal arithmetic.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A price in the store currency.
///
/// The backend speaks a single currency, so only the amount is carried.
/// Amounts deserialize from JSON numbers or strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Format for display (e.g., "$19.99").
    #[must_use]
    pub fn display(&self) -> String {
        format!("${:.2}", self.0.round_dp(2))
    }

    /// How much cheaper `self` is than `original`, if at all.
    ///
    /// Returns `None` when the prices are equal or `self` is the higher one,
    /// which is the signal to hide any "save" badge.
    #[must_use]
    pub fn savings_from(&self, original: Self) -> Option<Self> {
        (original.0 > self.0).then(|| Self(original.0 - self.0))
    }

    /// Multiply by a quantity, e.g. for a line item subtotal.
    #[must_use]
    pub fn times(&self, quantity: u32) -> Self {
        Self(self.0 * Decimal::from(quantity))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display())
    }
}

impl From<Decimal> for Price {
    fn from(amount: Decimal) -> Self {
        Self(amount)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display_pads_cents() {
        assert_eq!(Price::new(Decimal::new(5, 0)).display(), "$5.00");
        assert_eq!(Price::new(Decimal::new(1999, 2)).display(), "$19.99");
    }

    #[test]
    fn test_savings_from() {
        let current = Price::new(Decimal::new(80, 0));
        let original = Price::new(Decimal::new(100, 0));
        assert_eq!(
            current.savings_from(original),
            Some(Price::new(Decimal::new(20, 0)))
        );
        assert_eq!(current.savings_from(current), None);
        assert_eq!(original.savings_from(current), None);
    }

    #[test]
    fn test_times() {
        let unit = Price::new(Decimal::new(1250, 2));
        assert_eq!(unit.times(3).display(), "$37.50");
    }

    #[test]
    fn test_deserializes_from_number() {
        let price: Price = serde_json::from_str("120").unwrap();
        assert_eq!(price, Price::new(Decimal::new(120, 0)));
    }
}
