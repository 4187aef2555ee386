//! # Town-Cart RS
//!
//! Persistent shopping-cart server.
//!
//! ## Usage
//!
//! ```bash
//! # Optional settings
//! export CART_STORE_PATH=data/cart.json
//! export CART_CONFIG_PATH=config/cart.toml
//!
//! # Run the server
//! town-cart
//! ```

use cart_api::{routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    print_banner();

    let state = AppState::new()?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();

    info!("Environment: {}", state.config.environment);
    info!("Cart store: {}", state.config.store_path);
    info!(
        "Shipping zones: {:?}",
        state
            .cart_config
            .shipping
            .zones()
            .iter()
            .map(|z| z.id.as_str())
            .collect::<Vec<_>>()
    );

    let app = routes::create_router(state);

    info!("🛒 Town-Cart starting on http://{}", addr);

    if !is_prod {
        info!("🛍  Cart: GET http://{}/api/v1/cart", addr);
        info!("📦 Options: GET http://{}/api/v1/options", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn print_banner() {
    println!(
        r#"
  🛒 Town-Cart RS 🛒
  ━━━━━━━━━━━━━━━━━━━━━━━
  Persistent cart engine
  Version: {}

"#,
        env!("CARGO_PKG_VERSION")
    );
}
