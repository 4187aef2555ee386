//! # cart-core
//!
//! Core types for the town-cart shopping-cart state manager.
//!
//! This crate provides:
//! - `Money` fixed-point peso amounts
//! - `LineItem`, `ItemDraft` and `CartLedger` for cart contents
//! - `ShippingPolicy` for delivery-zone fees
//! - `OrderSummary` for payment selection and grand totals
//! - `PersistentStore` with `MemoryStore` and `FileStore` backends
//! - `CartSession`, which hydrates from a store and writes back on every mutation
//! - `CartError` for typed error handling
//!
//! ## Example
//!
//! ```rust
//! use cart_core::{CartSession, ItemDraft, MemoryStore, Money, ShippingPolicy};
//!
//! let mut session = CartSession::hydrate(MemoryStore::new(), ShippingPolicy::default());
//!
//! session.add_or_update_item(&ItemDraft::new("Rice", 50.0, 2), None)?;
//! session.add_or_update_item(&ItemDraft::new("Oil", 120.0, 1), None)?;
//! session.set_zone("tubigon")?;
//!
//! let snapshot = session.snapshot();
//! assert_eq!(snapshot.subtotal, Money::from_centavos(22_000));
//! assert_eq!(snapshot.grand_total.to_string(), "₱320.00");
//! # Ok::<(), cart_core::CartError>(())
//! ```

pub mod config;
pub mod error;
pub mod ledger;
pub mod money;
pub mod session;
pub mod shipping;
pub mod store;
pub mod summary;

// Re-exports for convenience
pub use config::CartConfig;
pub use error::{CartError, CartResult};
pub use ledger::{CartEntry, CartLedger, ItemDraft, ItemId, LineItem};
pub use money::{Money, CURRENCY_SYMBOL};
pub use session::{CartSession, Snapshot, SnapshotLine};
pub use shipping::{ShippingPolicy, ZoneRate};
pub use store::{keys, BoxedStore, FileStore, MemoryStore, PersistentStore};
pub use summary::OrderSummary;
