//! # Cart Configuration
//!
//! Shipping table and payment options, loaded from `config/cart.toml`.
//!
//! ```toml
//! payment_methods = ["Gcash", "Creditcard"]
//!
//! [shipping]
//! default_zone = "tubigon"
//! strict_zones = false
//!
//! [[shipping.zones]]
//! id = "tubigon"
//! label = "Tubigon"
//! fee = 100.00
//! ```

use crate::error::{CartError, CartResult};
use crate::shipping::ShippingPolicy;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartConfig {
    /// Payment options offered by the presentation layer
    #[serde(default = "default_payment_methods")]
    pub payment_methods: Vec<String>,

    #[serde(default)]
    pub shipping: ShippingPolicy,
}

fn default_payment_methods() -> Vec<String> {
    vec!["Gcash".to_string(), "Creditcard".to_string()]
}

impl Default for CartConfig {
    fn default() -> Self {
        Self {
            payment_methods: default_payment_methods(),
            shipping: ShippingPolicy::default(),
        }
    }
}

impl CartConfig {
    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> CartResult<Self> {
        let config: CartConfig =
            toml::from_str(toml_str).map_err(|e| CartError::Configuration(e.to_string()))?;
        config.shipping.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config = CartConfig::from_toml("").unwrap();
        assert_eq!(config, CartConfig::default());
    }

    #[test]
    fn test_custom_table() {
        let config = CartConfig::from_toml(
            r#"
            payment_methods = ["Cash"]

            [shipping]
            default_zone = "loon"
            strict_zones = true

            [[shipping.zones]]
            id = "loon"
            fee = 80

            [[shipping.zones]]
            id = "maribojoc"
            label = "Maribojoc"
            fee = 95.50
            "#,
        )
        .unwrap();

        assert_eq!(config.payment_methods, vec!["Cash"]);
        assert!(config.shipping.is_strict());
        assert_eq!(config.shipping.default_zone(), "loon");
        assert_eq!(config.shipping.fee_for("loon"), Money::from_centavos(8_000));
        assert_eq!(config.shipping.fee_for("maribojoc"), Money::from_centavos(9_550));
        assert_eq!(config.shipping.fee_for("tubigon"), Money::ZERO);
    }

    #[test]
    fn test_invalid_config() {
        let err = CartConfig::from_toml("payment_methods = 3").unwrap_err();
        assert!(matches!(err, CartError::Configuration(_)));

        let err = CartConfig::from_toml(
            r#"
            [shipping]
            default_zone = "nowhere"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, CartError::Configuration(_)));
    }
}
