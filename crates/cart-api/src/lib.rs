//! # cart-api
//!
//! HTTP API layer for town-cart-rs.
//!
//! This crate provides:
//! - Axum-based HTTP server over a single persisted cart session
//! - REST endpoints mirroring the cart session operations
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | GET | `/api/v1/cart` | Cart snapshot |
//! | DELETE | `/api/v1/cart` | Clear cart |
//! | POST | `/api/v1/cart/items` | Add or update item |
//! | PUT | `/api/v1/cart/items/{index}` | Update item |
//! | DELETE | `/api/v1/cart/items/{index}` | Delete item |
//! | PUT | `/api/v1/cart/zone` | Select delivery zone |
//! | PUT | `/api/v1/cart/payment-method` | Select payment method |
//! | GET | `/api/v1/options` | Zones and payment methods |

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
