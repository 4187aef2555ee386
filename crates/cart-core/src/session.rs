//! # Cart Session
//!
//! Orchestrates the ledger, shipping policy and order summary for one user
//! context, hydrating from and writing back to a [`PersistentStore`].
//!
//! Lifecycle: `hydrate` → mutate* (no explicit teardown; last write wins).
//!
//! Each mutation is applied to a working copy, persisted, and only then
//! committed. A failed store write therefore leaves the session and the
//! stored value exactly as they were. Totals are never stored: they are
//! recomputed from the ledger and zone on every read.

use crate::error::{CartError, CartResult};
use crate::ledger::{CartLedger, ItemDraft, ItemId, LineItem};
use crate::money::Money;
use crate::shipping::ShippingPolicy;
use crate::store::{keys, PersistentStore};
use crate::summary::OrderSummary;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info, warn};

/// One cart row as seen by the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotLine {
    pub index: usize,
    pub id: ItemId,
    pub name: String,
    pub unit_price: Money,
    pub quantity: u32,
    pub line_total: Money,
}

/// Read-only projection of the session at one instant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub cart: Vec<SnapshotLine>,
    /// Units across all lines
    pub item_count: u64,
    pub zone: String,
    pub payment_method: String,
    pub subtotal: Money,
    pub shipping_fee: Money,
    pub grand_total: Money,
}

pub struct CartSession<S: PersistentStore> {
    store: S,
    policy: ShippingPolicy,
    ledger: CartLedger,
    zone: String,
    summary: OrderSummary,
}

impl<S: PersistentStore> CartSession<S> {
    /// Load cart, zone and payment method from the store.
    ///
    /// Never fails: a missing or malformed cart becomes an empty cart, a
    /// missing zone becomes the policy's default zone and a missing payment
    /// method becomes empty. Each field degrades independently. A stored
    /// cart whose total could not be represented with the largest shipping
    /// fee counts as malformed.
    pub fn hydrate(store: S, policy: ShippingPolicy) -> Self {
        let ledger = match read_field(&store, keys::CART) {
            Some(raw) => CartLedger::from_json(&raw)
                .and_then(|ledger| {
                    check_headroom(&ledger, &policy)?;
                    Ok(ledger)
                })
                .unwrap_or_else(|e| {
                    warn!("Discarding stored cart: {}", e);
                    CartLedger::new()
                }),
            None => CartLedger::new(),
        };
        let zone = read_field(&store, keys::ZONE)
            .unwrap_or_else(|| policy.default_zone().to_string());
        let payment_method = read_field(&store, keys::PAYMENT_METHOD).unwrap_or_default();

        info!(
            "Hydrated cart session from {} store: {} items, zone={:?}",
            store.backend_name(),
            ledger.len(),
            zone
        );

        Self {
            store,
            policy,
            ledger,
            zone,
            summary: OrderSummary::new(payment_method),
        }
    }

    /// Add a new item, or replace the item at `editing_index` when set
    pub fn add_or_update_item(
        &mut self,
        draft: &ItemDraft,
        editing_index: Option<usize>,
    ) -> CartResult<ItemId> {
        match editing_index {
            Some(index) => self.update_item(index, draft),
            None => self.add_item(draft),
        }
    }

    pub fn add_item(&mut self, draft: &ItemDraft) -> CartResult<ItemId> {
        let item = draft.validate()?;
        let mut next = self.ledger.clone();
        let id = next.add(item)?;
        self.commit_ledger(next)?;
        debug!("Added item {} at index {}", id, self.ledger.len() - 1);
        Ok(id)
    }

    pub fn update_item(&mut self, index: usize, draft: &ItemDraft) -> CartResult<ItemId> {
        let item = draft.validate()?;
        let mut next = self.ledger.clone();
        let id = next.update(index, item)?;
        self.commit_ledger(next)?;
        debug!("Updated item {} at index {}", id, index);
        Ok(id)
    }

    pub fn update_item_by_id(&mut self, id: ItemId, draft: &ItemDraft) -> CartResult<usize> {
        let item = draft.validate()?;
        let mut next = self.ledger.clone();
        let index = next.update_by_id(id, item)?;
        self.commit_ledger(next)?;
        debug!("Updated item {} at index {}", id, index);
        Ok(index)
    }

    /// Remove the item at `index`; later indices shift down by one
    pub fn delete_item(&mut self, index: usize) -> CartResult<LineItem> {
        let mut next = self.ledger.clone();
        let removed = next.remove(index)?;
        self.commit_ledger(next)?;
        debug!("Deleted item at index {}", index);
        Ok(removed)
    }

    pub fn delete_item_by_id(&mut self, id: ItemId) -> CartResult<LineItem> {
        let mut next = self.ledger.clone();
        let removed = next.remove_by_id(id)?;
        self.commit_ledger(next)?;
        debug!("Deleted item {}", id);
        Ok(removed)
    }

    /// Empty the cart. Zone and payment method are kept.
    pub fn clear_cart(&mut self) -> CartResult<()> {
        self.commit_ledger(CartLedger::new())?;
        debug!("Cleared cart");
        Ok(())
    }

    /// Select a delivery zone. In strict zone mode, non-empty zones without
    /// a configured fee are declined.
    pub fn set_zone(&mut self, zone: impl Into<String>) -> CartResult<()> {
        let zone = zone.into();
        if self.policy.is_strict() {
            self.policy.resolve(&zone)?;
        }
        self.write(keys::ZONE, &zone)?;
        debug!("Zone set to {:?}", zone);
        self.zone = zone;
        Ok(())
    }

    /// Select a payment method. Totals are unaffected.
    pub fn set_payment_method(&mut self, method: impl Into<String>) -> CartResult<()> {
        let method = method.into();
        self.write(keys::PAYMENT_METHOD, &method)?;
        debug!("Payment method set to {:?}", method);
        self.summary.set_payment_method(method);
        Ok(())
    }

    pub fn subtotal(&self) -> Money {
        self.ledger.subtotal()
    }

    pub fn shipping_fee(&self) -> Money {
        self.policy.fee_for(&self.zone)
    }

    pub fn grand_total(&self) -> Money {
        self.summary.grand_total(self.subtotal(), self.shipping_fee())
    }

    pub fn zone(&self) -> &str {
        &self.zone
    }

    pub fn payment_method(&self) -> &str {
        self.summary.payment_method()
    }

    pub fn ledger(&self) -> &CartLedger {
        &self.ledger
    }

    pub fn policy(&self) -> &ShippingPolicy {
        &self.policy
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Release the underlying store (e.g. to rehydrate a fresh session)
    pub fn into_store(self) -> S {
        self.store
    }

    /// Project the current state for rendering
    pub fn snapshot(&self) -> Snapshot {
        let cart = self
            .ledger
            .entries()
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let item = entry.item();
                SnapshotLine {
                    index,
                    id: entry.id(),
                    name: item.name().to_string(),
                    unit_price: item.unit_price(),
                    quantity: item.quantity(),
                    line_total: item.total(),
                }
            })
            .collect();

        let subtotal = self.subtotal();
        let shipping_fee = self.shipping_fee();

        Snapshot {
            cart,
            item_count: self.ledger.item_count(),
            zone: self.zone.clone(),
            payment_method: self.summary.payment_method().to_string(),
            subtotal,
            shipping_fee,
            grand_total: self.summary.grand_total(subtotal, shipping_fee),
        }
    }

    fn commit_ledger(&mut self, next: CartLedger) -> CartResult<()> {
        check_headroom(&next, &self.policy)?;
        let json = next.to_json()?;
        self.write(keys::CART, &json)?;
        self.ledger = next;
        Ok(())
    }

    fn write(&mut self, key: &str, value: &str) -> CartResult<()> {
        self.store.set(key, value).map_err(|e| {
            error!("Failed to persist {}: {}", key, e);
            match e {
                CartError::Storage(message) => CartError::Storage(message),
                other => CartError::Storage(other.to_string()),
            }
        })
    }
}

/// Subtotal plus the largest zone fee must fit, so every grand total the
/// session can report is exact whichever zone is selected
fn check_headroom(ledger: &CartLedger, policy: &ShippingPolicy) -> CartResult<()> {
    ledger
        .subtotal()
        .checked_add(policy.max_fee())
        .map(|_| ())
        .ok_or_else(|| CartError::validation("quantity", "cart total is too large"))
}

fn read_field<S: PersistentStore>(store: &S, key: &str) -> Option<String> {
    match store.get(key) {
        Ok(value) => value,
        Err(e) => {
            warn!("Failed to read {} from store: {}", key, e);
            None
        }
    }
}
