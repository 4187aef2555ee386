//! # Cart Ledger
//!
//! Line items and the ordered cart that owns them.
//!
//! Insertion order is significant: it drives display order and the
//! positional edit/delete operations used by list-style presentation
//! layers. Every entry also carries a stable [`ItemId`] so callers that
//! can hold on to an identity do not depend on indices that shift after a
//! removal.

use crate::error::{CartError, CartResult};
use crate::money::Money;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// A validated cart row.
///
/// Only constructible through [`LineItem::new`] or [`ItemDraft::validate`],
/// so every value in a ledger satisfies the line item rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LineItem {
    name: String,

    /// Persisted under `price` to keep the stored cart format stable
    #[serde(rename = "price")]
    unit_price: Money,

    quantity: u32,
}

impl LineItem {
    /// Create a line item, rejecting blank names, non-positive values and
    /// line totals that do not fit in centavos
    pub fn new(name: impl Into<String>, unit_price: Money, quantity: u32) -> CartResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(CartError::validation("name", "is required"));
        }
        if !unit_price.is_positive() {
            return Err(CartError::validation("price", "must be greater than zero"));
        }
        if quantity == 0 {
            return Err(CartError::validation("quantity", "must be greater than zero"));
        }
        if unit_price.checked_times(quantity).is_none() {
            return Err(CartError::validation("quantity", "line total is too large"));
        }
        Ok(Self {
            name,
            unit_price,
            quantity,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn unit_price(&self) -> Money {
        self.unit_price
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Calculate the total price for this line item
    pub fn total(&self) -> Money {
        // Checked in `new`
        Money::from_centavos(self.unit_price.centavos() * i64::from(self.quantity))
    }
}

/// Unvalidated item input, as submitted by a form or read back from storage.
///
/// Quantity is kept as a number so that fractional input is reported as a
/// validation error rather than silently truncated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemDraft {
    pub name: String,
    pub price: f64,
    pub quantity: f64,
}

impl ItemDraft {
    pub fn new(name: impl Into<String>, price: f64, quantity: u32) -> Self {
        Self {
            name: name.into(),
            price,
            quantity: f64::from(quantity),
        }
    }

    /// Build a draft from the raw text of the three form fields
    pub fn from_text(name: &str, price: &str, quantity: &str) -> CartResult<Self> {
        let price: f64 = price
            .trim()
            .parse()
            .map_err(|_| CartError::validation("price", "must be a number"))?;
        let quantity: u32 = quantity
            .trim()
            .parse()
            .map_err(|_| CartError::validation("quantity", "must be a whole number"))?;

        Ok(Self::new(name, price, quantity))
    }

    /// Check the draft against the line item rules
    pub fn validate(&self) -> CartResult<LineItem> {
        if !self.price.is_finite() {
            return Err(CartError::validation("price", "must be a finite number"));
        }
        let unit_price = Money::from_decimal(self.price)
            .ok_or_else(|| CartError::validation("price", "is out of range"))?;

        if !self.quantity.is_finite() || self.quantity.fract() != 0.0 {
            return Err(CartError::validation("quantity", "must be a whole number"));
        }
        if self.quantity < 1.0 {
            return Err(CartError::validation("quantity", "must be greater than zero"));
        }
        if self.quantity > f64::from(u32::MAX) {
            return Err(CartError::validation("quantity", "is too large"));
        }

        LineItem::new(self.name.clone(), unit_price, self.quantity as u32)
    }
}

impl From<&LineItem> for ItemDraft {
    fn from(item: &LineItem) -> Self {
        Self::new(item.name(), item.unit_price().as_decimal(), item.quantity())
    }
}

/// Stable identifier for a ledger entry (session-local, not persisted)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(Uuid);

impl ItemId {
    fn generate() -> Self {
        ItemId(Uuid::new_v4())
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ItemId {
    type Err = CartError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s)
            .map(ItemId)
            .map_err(|_| CartError::UnknownItem { id: s.to_string() })
    }
}

/// A line item together with its stable id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartEntry {
    id: ItemId,
    item: LineItem,
}

impl CartEntry {
    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn item(&self) -> &LineItem {
        &self.item
    }
}

/// Ordered list of line items
#[derive(Debug, Clone, Default)]
pub struct CartLedger {
    entries: Vec<CartEntry>,
}

impl CartLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Build a ledger from items in display order
    pub fn from_items(items: impl IntoIterator<Item = LineItem>) -> CartResult<Self> {
        let mut ledger = Self::new();
        for item in items {
            ledger.add(item)?;
        }
        Ok(ledger)
    }

    /// Append an item to the end of the cart.
    ///
    /// Declined when the resulting subtotal would not fit in centavos.
    pub fn add(&mut self, item: LineItem) -> CartResult<ItemId> {
        self.subtotal_with(None, &item)?;
        let id = ItemId::generate();
        self.entries.push(CartEntry { id, item });
        Ok(id)
    }

    /// Replace the item at `index` in place, keeping its id and position
    pub fn update(&mut self, index: usize, item: LineItem) -> CartResult<ItemId> {
        let len = self.entries.len();
        if index >= len {
            return Err(CartError::OutOfRange { index, len });
        }
        self.subtotal_with(Some(index), &item)?;
        let entry = &mut self.entries[index];
        entry.item = item;
        Ok(entry.id)
    }

    /// Remove the item at `index`; later items shift down by one
    pub fn remove(&mut self, index: usize) -> CartResult<LineItem> {
        if index >= self.entries.len() {
            return Err(CartError::OutOfRange {
                index,
                len: self.entries.len(),
            });
        }
        Ok(self.entries.remove(index).item)
    }

    pub fn update_by_id(&mut self, id: ItemId, item: LineItem) -> CartResult<usize> {
        let index = self.require_position(id)?;
        self.subtotal_with(Some(index), &item)?;
        self.entries[index].item = item;
        Ok(index)
    }

    pub fn remove_by_id(&mut self, id: ItemId) -> CartResult<LineItem> {
        let index = self.require_position(id)?;
        Ok(self.entries.remove(index).item)
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Sum of line totals (zero for an empty cart)
    pub fn subtotal(&self) -> Money {
        self.items().map(LineItem::total).sum()
    }

    /// Current position of an entry
    pub fn position(&self, id: ItemId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    /// Id of the entry currently at `index`
    pub fn id_at(&self, index: usize) -> Option<ItemId> {
        self.entries.get(index).map(|e| e.id)
    }

    pub fn get(&self, index: usize) -> Option<&LineItem> {
        self.entries.get(index).map(|e| &e.item)
    }

    pub fn items(&self) -> impl Iterator<Item = &LineItem> {
        self.entries.iter().map(|e| &e.item)
    }

    pub fn entries(&self) -> &[CartEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of units across all lines
    pub fn item_count(&self) -> u64 {
        self.items().map(|i| u64::from(i.quantity())).sum()
    }

    /// Encode as the persisted JSON array of `{name, price, quantity}`
    pub fn to_json(&self) -> CartResult<String> {
        let items: Vec<&LineItem> = self.items().collect();
        serde_json::to_string(&items).map_err(|e| CartError::Storage(e.to_string()))
    }

    /// Decode a persisted cart. Any entry that fails validation rejects
    /// the whole value.
    pub fn from_json(raw: &str) -> CartResult<Self> {
        let drafts: Vec<ItemDraft> = serde_json::from_str(raw)
            .map_err(|e| CartError::MalformedPersistedState(e.to_string()))?;

        let items = drafts
            .iter()
            .enumerate()
            .map(|(i, draft)| {
                draft.validate().map_err(|e| {
                    CartError::MalformedPersistedState(format!("item {}: {}", i, e))
                })
            })
            .collect::<CartResult<Vec<_>>>()?;

        Self::from_items(items).map_err(|e| CartError::MalformedPersistedState(e.to_string()))
    }

    /// Subtotal after placing `item` at `replacing` (or appending it)
    fn subtotal_with(&self, replacing: Option<usize>, item: &LineItem) -> CartResult<Money> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != replacing)
            .try_fold(item.total(), |acc, (_, e)| acc.checked_add(e.item.total()))
            .ok_or_else(|| CartError::validation("quantity", "cart total is too large"))
    }

    fn require_position(&self, id: ItemId) -> CartResult<usize> {
        self.position(id).ok_or_else(|| CartError::UnknownItem {
            id: id.to_string(),
        })
    }
}
