//! # Routes
//!
//! Axum router configuration for the cart API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
///   - GET    /api/v1/cart - Cart snapshot
///   - DELETE /api/v1/cart - Clear cart items
///   - POST   /api/v1/cart/items - Add item, or update `editing_index`
///   - PUT    /api/v1/cart/items/{index} - Update item
///   - DELETE /api/v1/cart/items/{index} - Delete item
///   - PUT    /api/v1/cart/zone - Select delivery zone
///   - PUT    /api/v1/cart/payment-method - Select payment method
///   - GET    /api/v1/options - Zones and payment methods
pub fn create_router(state: AppState) -> Router {
    // The browser front end may be served from any origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let cart_routes = Router::new()
        .route(
            "/",
            get(handlers::get_cart).delete(handlers::clear_cart),
        )
        .route("/items", post(handlers::add_or_update_item))
        .route(
            "/items/{index}",
            put(handlers::update_item).delete(handlers::delete_item),
        )
        .route("/zone", put(handlers::set_zone))
        .route("/payment-method", put(handlers::set_payment_method));

    let api_routes = Router::new()
        .nest("/cart", cart_routes)
        .route("/options", get(handlers::get_options));

    Router::new()
        // Health check at root
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        // API v1
        .nest("/api/v1", api_routes)
        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        // State
        .with_state(state)
}
