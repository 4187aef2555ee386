//! # cart-wasm
//!
//! WebAssembly bindings for town-cart-rs.
//!
//! This crate provides:
//! - `LocalStorageStore`, a `PersistentStore` over `window.localStorage`
//! - `WasmCart`, the cart session exposed to the browser
//! - Form validation and amount formatting helpers
//!
//! ## Usage (JavaScript)
//!
//! ```javascript
//! import init, { WasmCart, formatAmount } from 'town-cart-wasm';
//!
//! await init();
//!
//! const cart = new WasmCart();
//! cart.addOrUpdateItem('Rice', '50.00', '2');
//! cart.setZone('tubigon');
//!
//! console.log('Grand total:', cart.snapshot().grandTotal);
//! ```
//!
//! ## Building
//!
//! ```bash
//! wasm-pack build --target web
//! ```

use cart_core::{
    CartConfig, CartError, CartResult, CartSession, ItemDraft, Money, PersistentStore,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// `PersistentStore` backed by the browser's `localStorage`
pub struct LocalStorageStore {
    storage: web_sys::Storage,
}

impl LocalStorageStore {
    /// Open `window.localStorage`
    pub fn open() -> CartResult<Self> {
        let window =
            web_sys::window().ok_or_else(|| CartError::Storage("no window available".into()))?;
        let storage = window
            .local_storage()
            .map_err(|e| CartError::Storage(format!("localStorage unavailable: {:?}", e)))?
            .ok_or_else(|| CartError::Storage("localStorage disabled".into()))?;

        Ok(Self { storage })
    }
}

impl PersistentStore for LocalStorageStore {
    fn get(&self, key: &str) -> CartResult<Option<String>> {
        self.storage
            .get_item(key)
            .map_err(|e| CartError::Storage(format!("{:?}", e)))
    }

    fn set(&mut self, key: &str, value: &str) -> CartResult<()> {
        // Quota errors surface here and leave the previous value in place
        self.storage
            .set_item(key, value)
            .map_err(|e| CartError::Storage(format!("{:?}", e)))
    }

    fn backend_name(&self) -> &'static str {
        "localStorage"
    }
}

/// Zone entry for the town dropdown
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ZoneOption {
    id: String,
    label: String,
    fee: Money,
    fee_display: String,
}

/// Dropdown options
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CartOptions {
    zones: Vec<ZoneOption>,
    default_zone: String,
    payment_methods: Vec<String>,
}

fn to_js_error(err: CartError) -> JsValue {
    js_sys::Error::new(&err.to_string()).into()
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value)
        .map_err(|e| JsValue::from(js_sys::Error::new(&e.to_string())))
}

/// Cart session persisted in `localStorage`
#[wasm_bindgen]
pub struct WasmCart {
    session: CartSession<LocalStorageStore>,
    config: CartConfig,
}

#[wasm_bindgen]
impl WasmCart {
    /// Hydrate the cart from `localStorage`. `config_toml` overrides the
    /// built-in shipping table and payment options.
    #[wasm_bindgen(constructor)]
    pub fn new(config_toml: Option<String>) -> Result<WasmCart, JsValue> {
        let config = match config_toml {
            Some(raw) => CartConfig::from_toml(&raw).map_err(to_js_error)?,
            None => CartConfig::default(),
        };
        let store = LocalStorageStore::open().map_err(to_js_error)?;
        let session = CartSession::hydrate(store, config.shipping.clone());

        Ok(WasmCart { session, config })
    }

    /// Submit the item form from its raw field text; returns the snapshot
    #[wasm_bindgen(js_name = addOrUpdateItem)]
    pub fn add_or_update_item(
        &mut self,
        name: &str,
        price: &str,
        quantity: &str,
        editing_index: Option<u32>,
    ) -> Result<JsValue, JsValue> {
        let draft = ItemDraft::from_text(name, price, quantity).map_err(to_js_error)?;
        self.session
            .add_or_update_item(&draft, editing_index.map(|i| i as usize))
            .map_err(to_js_error)?;
        self.snapshot()
    }

    #[wasm_bindgen(js_name = deleteItem)]
    pub fn delete_item(&mut self, index: u32) -> Result<JsValue, JsValue> {
        self.session
            .delete_item(index as usize)
            .map_err(to_js_error)?;
        self.snapshot()
    }

    #[wasm_bindgen(js_name = clearCart)]
    pub fn clear_cart(&mut self) -> Result<JsValue, JsValue> {
        self.session.clear_cart().map_err(to_js_error)?;
        self.snapshot()
    }

    #[wasm_bindgen(js_name = setZone)]
    pub fn set_zone(&mut self, zone: &str) -> Result<JsValue, JsValue> {
        self.session.set_zone(zone).map_err(to_js_error)?;
        self.snapshot()
    }

    #[wasm_bindgen(js_name = setPaymentMethod)]
    pub fn set_payment_method(&mut self, method: &str) -> Result<JsValue, JsValue> {
        self.session
            .set_payment_method(method)
            .map_err(to_js_error)?;
        self.snapshot()
    }

    /// Current cart, selections and totals
    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        to_js(&self.session.snapshot())
    }

    /// Zones and payment methods for the dropdowns
    pub fn options(&self) -> Result<JsValue, JsValue> {
        let shipping = &self.config.shipping;
        let options = CartOptions {
            zones: shipping
                .zones()
                .iter()
                .map(|z| ZoneOption {
                    id: z.id.clone(),
                    label: z.display_label().to_string(),
                    fee: z.fee,
                    fee_display: z.fee.to_string(),
                })
                .collect(),
            default_zone: shipping.default_zone().to_string(),
            payment_methods: self.config.payment_methods.clone(),
        };
        to_js(&options)
    }

    /// Grand total formatted for display
    #[wasm_bindgen(getter, js_name = grandTotalDisplay)]
    pub fn grand_total_display(&self) -> String {
        self.session.grand_total().to_string()
    }
}

/// Format an amount in centavos for display (e.g. `₱1,234.50`)
#[wasm_bindgen(js_name = formatAmount)]
pub fn format_amount(centavos: i64) -> String {
    Money::from_centavos(centavos).to_string()
}

/// Check the item form before submitting; returns the error message or
/// `undefined` when the input is acceptable
#[wasm_bindgen(js_name = validateItem)]
pub fn validate_item(name: &str, price: &str, quantity: &str) -> Option<String> {
    ItemDraft::from_text(name, price, quantity)
        .and_then(|draft| draft.validate())
        .err()
        .map(|e| e.to_string())
}

/// Log to browser console
#[wasm_bindgen]
pub fn log(message: &str) {
    web_sys::console::log_1(&JsValue::from_str(message));
}

/// Get library version
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
