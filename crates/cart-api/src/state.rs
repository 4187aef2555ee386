//! # Application State
//!
//! Shared state for the Axum application.
//! Contains the single cart session, cart configuration and server settings.

use cart_core::{BoxedStore, CartConfig, CartSession, FileStore};
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Cart session shared by all handlers.
///
/// The mutex admits one operation at a time, so every mutate → recompute →
/// persist sequence completes before the next request touches the cart.
pub type SharedSession = Arc<Mutex<CartSession<BoxedStore>>>;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
    /// JSON file holding the persisted cart, zone and payment method
    pub store_path: String,
    /// Explicit cart config file (otherwise `config/cart.toml` is searched)
    pub config_path: Option<String>,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            store_path: std::env::var("CART_STORE_PATH")
                .unwrap_or_else(|_| "data/cart.json".to_string()),
            config_path: std::env::var("CART_CONFIG_PATH").ok(),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid socket address {}:{}: {}", self.host, self.port, e))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// The cart session (single writer)
    pub session: SharedSession,
    /// Shipping table and payment options
    pub cart_config: Arc<CartConfig>,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create a new AppState backed by the configured store file
    pub fn new() -> anyhow::Result<Self> {
        Self::from_config(AppConfig::from_env())
    }

    /// Load the cart config and open the store file named by `config`
    pub fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let cart_config = load_cart_config(config.config_path.as_deref())?;

        let store = FileStore::open(&config.store_path)
            .map_err(|e| anyhow::anyhow!("Failed to open cart store {}: {}", config.store_path, e))?;

        Ok(Self::with_store(config, cart_config, Box::new(store)))
    }

    /// Create state over an explicit store (hydrates the session immediately)
    pub fn with_store(config: AppConfig, cart_config: CartConfig, store: BoxedStore) -> Self {
        let session = CartSession::hydrate(store, cart_config.shipping.clone());

        Self {
            session: Arc::new(Mutex::new(session)),
            cart_config: Arc::new(cart_config),
            config,
        }
    }
}

/// Load cart config from an explicit path or the default search paths
pub fn load_cart_config(explicit: Option<&str>) -> anyhow::Result<CartConfig> {
    if let Some(path) = explicit {
        return read_cart_config(Path::new(path));
    }

    let config_paths = [
        "config/cart.toml",
        "../config/cart.toml",
        "../../config/cart.toml",
    ];

    for path in config_paths {
        let path = Path::new(path);
        if path.exists() {
            return read_cart_config(path);
        }
    }

    tracing::warn!("No cart config found, using built-in shipping table");
    Ok(CartConfig::default())
}

fn read_cart_config(path: &Path) -> anyhow::Result<CartConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read {}: {}", path.display(), e))?;
    let config = CartConfig::from_toml(&content)
        .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", path.display(), e))?;
    tracing::info!(
        "Loaded {} shipping zones from {}",
        config.shipping.zones().len(),
        path.display()
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cart_core::MemoryStore;

    fn config() -> AppConfig {
        AppConfig {
            host: "0.0.0.0".to_string(),
            port: 3000,
            environment: "test".to_string(),
            store_path: "unused.json".to_string(),
            config_path: None,
        }
    }

    #[test]
    fn test_socket_addr() {
        let addr = config().socket_addr().unwrap();
        assert_eq!(addr.to_string(), "0.0.0.0:3000");

        let bad = AppConfig {
            host: "not a host".to_string(),
            ..config()
        };
        assert!(bad.socket_addr().is_err());
    }

    #[test]
    fn test_explicit_config_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("cart.toml");
        std::fs::write(
            &path,
            "payment_methods = [\"Cash\"]\n[shipping]\ndefault_zone = \"\"\n",
        )
        .unwrap();

        let loaded = load_cart_config(path.to_str()).unwrap();
        assert_eq!(loaded.payment_methods, vec!["Cash"]);
        assert_eq!(loaded.shipping.default_zone(), "");

        assert!(load_cart_config(Some("/nonexistent/cart.toml")).is_err());
    }

    #[tokio::test]
    async fn test_with_store_hydrates() {
        let store = MemoryStore::new().with_entry("zone", "calape");
        let state = AppState::with_store(config(), CartConfig::default(), Box::new(store));

        let session = state.session.lock().await;
        assert_eq!(session.zone(), "calape");
    }

    #[tokio::test]
    async fn test_starts_over_corrupt_store_file() {
        let dir = tempfile::tempdir().unwrap();
        let store_path = dir.path().join("cart.json");
        std::fs::write(&store_path, "{\"cart\": [").unwrap();
        let config_path = dir.path().join("cart.toml");
        std::fs::write(&config_path, "payment_methods = [\"Cash\"]\n").unwrap();

        let state = AppState::from_config(AppConfig {
            store_path: store_path.to_string_lossy().into_owned(),
            config_path: Some(config_path.to_string_lossy().into_owned()),
            ..config()
        })
        .unwrap();

        let session = state.session.lock().await;
        assert!(session.ledger().is_empty());
        assert_eq!(session.zone(), "tubigon");
        assert!(dir.path().join("cart.json.corrupt").exists());
    }
}
