//! # Shipping Policy
//!
//! Fixed delivery-zone fee table for town-cart.
//! The table is loaded from the `[shipping]` section of `config/cart.toml`,
//! falling back to the built-in towns.

use crate::error::{CartError, CartResult};
use crate::money::Money;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Shipping fee for one delivery zone
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneRate {
    /// Zone identifier as stored and selected (e.g., "tubigon")
    pub id: String,

    /// Display label for dropdowns; falls back to the id when empty
    #[serde(default)]
    pub label: String,

    /// Fixed fee charged for this zone
    pub fee: Money,
}

impl ZoneRate {
    pub fn new(id: impl Into<String>, fee: Money) -> Self {
        Self {
            id: id.into(),
            label: String::new(),
            fee,
        }
    }

    /// Builder: set display label
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn display_label(&self) -> &str {
        if self.label.is_empty() {
            &self.id
        } else {
            &self.label
        }
    }
}

/// Maps delivery zones to shipping fees.
///
/// Unset and unrecognized zones cost nothing under [`fee_for`](Self::fee_for).
/// With `strict_zones` enabled, sessions refuse to select an unrecognized
/// zone through [`resolve`](Self::resolve).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShippingPolicy {
    #[serde(default = "default_zones")]
    zones: Vec<ZoneRate>,

    /// Zone adopted by a fresh session with nothing stored
    #[serde(default = "default_zone_id")]
    default_zone: String,

    #[serde(default)]
    strict_zones: bool,
}

fn default_zones() -> Vec<ZoneRate> {
    vec![
        ZoneRate::new("tubigon", Money::from_centavos(10_000)).with_label("Tubigon"),
        ZoneRate::new("calape", Money::from_centavos(15_000)).with_label("Calape"),
    ]
}

fn default_zone_id() -> String {
    "tubigon".to_string()
}

impl Default for ShippingPolicy {
    fn default() -> Self {
        Self {
            zones: default_zones(),
            default_zone: default_zone_id(),
            strict_zones: false,
        }
    }
}

impl ShippingPolicy {
    /// Create a policy with no zones (every zone costs nothing)
    pub fn empty() -> Self {
        Self {
            zones: Vec::new(),
            default_zone: String::new(),
            strict_zones: false,
        }
    }

    /// Builder: add or replace a zone
    pub fn with_zone(mut self, rate: ZoneRate) -> Self {
        self.zones.retain(|z| z.id != rate.id);
        self.zones.push(rate);
        self
    }

    /// Builder: set the zone used when nothing is stored
    pub fn with_default_zone(mut self, zone: impl Into<String>) -> Self {
        self.default_zone = zone.into();
        self
    }

    /// Builder: reject unrecognized zones on selection
    pub fn with_strict_zones(mut self, strict: bool) -> Self {
        self.strict_zones = strict;
        self
    }

    /// Fee for a zone; unset or unknown zones map to zero
    pub fn fee_for(&self, zone: &str) -> Money {
        self.rate(zone).map(|r| r.fee).unwrap_or(Money::ZERO)
    }

    /// Fee for a zone, failing on non-empty unknown zones
    pub fn resolve(&self, zone: &str) -> CartResult<Money> {
        if zone.is_empty() {
            return Ok(Money::ZERO);
        }
        self.rate(zone)
            .map(|r| r.fee)
            .ok_or_else(|| CartError::UnknownZone {
                zone: zone.to_string(),
            })
    }

    /// Largest fee any zone can add to a total (zero for an empty table)
    pub fn max_fee(&self) -> Money {
        self.zones
            .iter()
            .map(|z| z.fee)
            .max()
            .unwrap_or(Money::ZERO)
            .max(Money::ZERO)
    }

    pub fn rate(&self, zone: &str) -> Option<&ZoneRate> {
        self.zones.iter().find(|z| z.id == zone)
    }

    pub fn is_known(&self, zone: &str) -> bool {
        self.rate(zone).is_some()
    }

    pub fn zones(&self) -> &[ZoneRate] {
        &self.zones
    }

    pub fn default_zone(&self) -> &str {
        &self.default_zone
    }

    pub fn is_strict(&self) -> bool {
        self.strict_zones
    }

    /// Check the table after loading it from config
    pub fn validate(&self) -> CartResult<()> {
        let mut seen = HashSet::new();
        for zone in &self.zones {
            if zone.id.trim().is_empty() {
                return Err(CartError::Configuration("zone id must not be empty".into()));
            }
            if !seen.insert(zone.id.as_str()) {
                return Err(CartError::Configuration(format!(
                    "duplicate zone: {}",
                    zone.id
                )));
            }
            if zone.fee < Money::ZERO {
                return Err(CartError::Configuration(format!(
                    "negative fee for zone {}",
                    zone.id
                )));
            }
        }
        if !self.default_zone.is_empty() && !self.is_known(&self.default_zone) {
            return Err(CartError::Configuration(format!(
                "default zone {} has no fee",
                self.default_zone
            )));
        }
        Ok(())
    }
}
