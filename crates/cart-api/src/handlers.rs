//! # Request Handlers
//!
//! Axum request handlers for the cart API.
//! Every mutating handler returns the fresh snapshot so the client can
//! re-render without a second request.

use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use cart_core::{CartError, ItemDraft, Money, Snapshot};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Add or update item request (the submitted form)
#[derive(Debug, Deserialize)]
pub struct ItemRequest {
    pub name: String,
    pub price: f64,
    pub quantity: f64,
    /// Row being edited; absent to append a new item
    #[serde(default)]
    pub editing_index: Option<usize>,
}

impl ItemRequest {
    fn draft(&self) -> ItemDraft {
        ItemDraft {
            name: self.name.clone(),
            price: self.price,
            quantity: self.quantity,
        }
    }
}

/// Zone selection request
#[derive(Debug, Deserialize)]
pub struct ZoneRequest {
    pub zone: String,
}

/// Payment method selection request
#[derive(Debug, Deserialize)]
pub struct PaymentMethodRequest {
    pub payment_method: String,
}

/// Zone entry for the town dropdown
#[derive(Debug, Serialize, Deserialize)]
pub struct ZoneOption {
    pub id: String,
    pub label: String,
    pub fee: Money,
    pub fee_display: String,
}

/// Dropdown options response
#[derive(Debug, Serialize, Deserialize)]
pub struct OptionsResponse {
    pub zones: Vec<ZoneOption>,
    pub default_zone: String,
    pub payment_methods: Vec<String>,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
        }
    }
}

pub type ApiError = (StatusCode, Json<ErrorResponse>);

fn cart_error_to_response(err: CartError) -> ApiError {
    let code = err.status_code();
    if err.is_declined() {
        warn!("Declined: {}", err);
    }
    let response = ErrorResponse::new(err.to_string(), code);
    (
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(response),
    )
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "town-cart",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Current cart snapshot
pub async fn get_cart(State(state): State<AppState>) -> Json<Snapshot> {
    let session = state.session.lock().await;
    Json(session.snapshot())
}

/// Submit the item form: append, or replace `editing_index` when present
#[instrument(skip(state, request), fields(editing_index = ?request.editing_index))]
pub async fn add_or_update_item(
    State(state): State<AppState>,
    Json(request): Json<ItemRequest>,
) -> Result<Json<Snapshot>, ApiError> {
    let mut session = state.session.lock().await;
    let id = session
        .add_or_update_item(&request.draft(), request.editing_index)
        .map_err(cart_error_to_response)?;

    info!("Saved item {} ({})", id, request.name);
    Ok(Json(session.snapshot()))
}

/// Replace the item at `index`
#[instrument(skip(state, draft))]
pub async fn update_item(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    Json(draft): Json<ItemDraft>,
) -> Result<Json<Snapshot>, ApiError> {
    let mut session = state.session.lock().await;
    session
        .update_item(index, &draft)
        .map_err(cart_error_to_response)?;

    Ok(Json(session.snapshot()))
}

/// Delete the item at `index`
#[instrument(skip(state))]
pub async fn delete_item(
    State(state): State<AppState>,
    Path(index): Path<usize>,
) -> Result<Json<Snapshot>, ApiError> {
    let mut session = state.session.lock().await;
    let removed = session.delete_item(index).map_err(cart_error_to_response)?;

    info!("Deleted item {}", removed.name());
    Ok(Json(session.snapshot()))
}

/// Empty the cart (zone and payment method are kept)
#[instrument(skip(state))]
pub async fn clear_cart(State(state): State<AppState>) -> Result<Json<Snapshot>, ApiError> {
    let mut session = state.session.lock().await;
    session.clear_cart().map_err(cart_error_to_response)?;

    Ok(Json(session.snapshot()))
}

/// Select the delivery zone
#[instrument(skip(state, request), fields(zone = %request.zone))]
pub async fn set_zone(
    State(state): State<AppState>,
    Json(request): Json<ZoneRequest>,
) -> Result<Json<Snapshot>, ApiError> {
    let mut session = state.session.lock().await;
    session
        .set_zone(request.zone)
        .map_err(cart_error_to_response)?;

    Ok(Json(session.snapshot()))
}

/// Select the payment method
#[instrument(skip(state, request), fields(payment_method = %request.payment_method))]
pub async fn set_payment_method(
    State(state): State<AppState>,
    Json(request): Json<PaymentMethodRequest>,
) -> Result<Json<Snapshot>, ApiError> {
    let mut session = state.session.lock().await;
    session
        .set_payment_method(request.payment_method)
        .map_err(cart_error_to_response)?;

    Ok(Json(session.snapshot()))
}

/// Zones and payment methods for the dropdowns
pub async fn get_options(State(state): State<AppState>) -> Json<OptionsResponse> {
    let shipping = &state.cart_config.shipping;
    let zones = shipping
        .zones()
        .iter()
        .map(|z| ZoneOption {
            id: z.id.clone(),
            label: z.display_label().to_string(),
            fee: z.fee,
            fee_display: z.fee.to_string(),
        })
        .collect();

    Json(OptionsResponse {
        zones,
        default_zone: shipping.default_zone().to_string(),
        payment_methods: state.cart_config.payment_methods.clone(),
    })
}
