//! # Money
//!
//! Fixed-point peso amounts for town-cart.
//! Amounts are held in centavos so that repeated recomputation of totals
//! never accumulates floating-point drift. Decimal numbers only appear at
//! the edges (persisted JSON, HTTP and WASM input).

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::Add;

/// Display prefix for all amounts (single-currency cart)
pub const CURRENCY_SYMBOL: &str = "₱";

const CENTAVOS_PER_PESO: i64 = 100;

/// Amount in the smallest currency unit (centavos)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Money(i64);

impl Money {
    pub const ZERO: Money = Money(0);

    /// Create an amount from centavos
    pub const fn from_centavos(centavos: i64) -> Self {
        Money(centavos)
    }

    /// Convert a decimal amount, rounding to the nearest centavo.
    ///
    /// Returns `None` for NaN, infinities and values outside the `i64`
    /// centavo range.
    pub fn from_decimal(amount: f64) -> Option<Self> {
        if !amount.is_finite() {
            return None;
        }
        let scaled = (amount * CENTAVOS_PER_PESO as f64).round();
        if scaled.abs() >= i64::MAX as f64 {
            return None;
        }
        Some(Money(scaled as i64))
    }

    /// Get the amount in centavos
    pub const fn centavos(&self) -> i64 {
        self.0
    }

    /// Get the decimal amount (for JSON and display layers)
    pub fn as_decimal(&self) -> f64 {
        self.0 as f64 / CENTAVOS_PER_PESO as f64
    }

    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Multiply a unit price by a quantity; `None` on overflow
    pub fn checked_times(self, quantity: u32) -> Option<Money> {
        self.0.checked_mul(i64::from(quantity)).map(Money)
    }

    /// Add two amounts; `None` on overflow
    pub fn checked_add(self, rhs: Money) -> Option<Money> {
        self.0.checked_add(rhs.0).map(Money)
    }
}

/// Plain integer addition. Line totals, subtotals and grand totals are
/// bounded when items enter a cart, so cart arithmetic never overflows.
impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Money {
        iter.fold(Money::ZERO, Add::add)
    }
}

/// Formats as `₱1,234.50` (en-PH grouping, exactly two fraction digits)
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let pesos = abs / CENTAVOS_PER_PESO as u64;
        let centavos = abs % CENTAVOS_PER_PESO as u64;
        write!(
            f,
            "{}{}{}.{:02}",
            sign,
            CURRENCY_SYMBOL,
            group_thousands(pesos),
            centavos
        )
    }
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

// Money travels as a plain JSON number (`50`, `55.5`) to keep the
// persisted `cart` format unchanged.
impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_decimal())
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let amount = f64::deserialize(deserializer)?;
        Money::from_decimal(amount)
            .ok_or_else(|| de::Error::custom(format!("amount out of range: {}", amount)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decimal_conversion() {
        assert_eq!(Money::from_decimal(10.99), Some(Money::from_centavos(1099)));
        assert_eq!(Money::from_decimal(0.1), Some(Money::from_centavos(10)));
        assert_eq!(Money::from_centavos(1099).as_decimal(), 10.99);
        assert_eq!(Money::from_decimal(f64::NAN), None);
        assert_eq!(Money::from_decimal(f64::INFINITY), None);
    }

    #[test]
    fn test_no_drift_on_repeated_sum() {
        let dime = Money::from_decimal(0.1).unwrap();
        let total: Money = std::iter::repeat(dime).take(1000).sum();
        assert_eq!(total, Money::from_centavos(10_000));
    }

    #[test]
    fn test_checked_arithmetic() {
        let price = Money::from_decimal(55.0).unwrap();
        assert_eq!(price.checked_times(2), Some(Money::from_centavos(11_000)));
        assert_eq!(price.checked_times(0), Some(Money::ZERO));

        let huge = Money::from_decimal(1.0e13).unwrap();
        assert_eq!(huge.checked_times(1_000_000), None);
        assert_eq!(Money::from_centavos(i64::MAX).checked_add(Money::from_centavos(1)), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_centavos(22_000).to_string(), "₱220.00");
        assert_eq!(Money::from_centavos(123_456_750).to_string(), "₱1,234,567.50");
        assert_eq!(Money::from_centavos(5).to_string(), "₱0.05");
        assert_eq!(Money::from_centavos(-500).to_string(), "-₱5.00");
        assert_eq!(Money::ZERO.to_string(), "₱0.00");
    }

    #[test]
    fn test_json_number() {
        let json = serde_json::to_string(&Money::from_centavos(5550)).unwrap();
        assert_eq!(json, "55.5");

        let parsed: Money = serde_json::from_str("120").unwrap();
        assert_eq!(parsed, Money::from_centavos(12_000));
    }
}
