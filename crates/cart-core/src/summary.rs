//! # Order Summary
//!
//! Payment selection and grand total derivation.

use crate::money::Money;
use serde::{Deserialize, Serialize};

/// Payment selection for the order.
///
/// The payment method is an opaque label: it is stored and displayed but
/// never validated against the configured options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderSummary {
    payment_method: String,
}

impl OrderSummary {
    pub fn new(payment_method: impl Into<String>) -> Self {
        Self {
            payment_method: payment_method.into(),
        }
    }

    /// Selected payment method (empty when unset)
    pub fn payment_method(&self) -> &str {
        &self.payment_method
    }

    pub fn set_payment_method(&mut self, method: impl Into<String>) {
        self.payment_method = method.into();
    }

    /// Grand total for the given subtotal and shipping fee
    pub fn grand_total(&self, subtotal: Money, shipping_fee: Money) -> Money {
        subtotal + shipping_fee
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grand_total() {
        let summary = OrderSummary::default();
        let total = summary.grand_total(Money::from_centavos(22_000), Money::from_centavos(10_000));
        assert_eq!(total, Money::from_centavos(32_000));
    }

    #[test]
    fn test_payment_method() {
        let mut summary = OrderSummary::default();
        assert_eq!(summary.payment_method(), "");

        summary.set_payment_method("Gcash");
        assert_eq!(summary.payment_method(), "Gcash");

        // Any label is accepted
        summary.set_payment_method("Barter");
        assert_eq!(summary.payment_method(), "Barter");
    }
}
