//! # Persistent Store
//!
//! Durable string key-value storage behind the cart session.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │          PersistentStore (trait)             │
//! │  ├── get(key)  -> Option<String>             │
//! │  └── set(key, value)                         │
//! └──────────────────────────────────────────────┘
//!                        ▲
//!        ┌───────────────┼────────────────────┐
//!        │               │                    │
//! ┌──────┴──────┐ ┌──────┴──────┐ ┌───────────┴───────┐
//! │ MemoryStore │ │  FileStore  │ │ LocalStorageStore │
//! │  (tests)    │ │ (cart-api)  │ │   (cart-wasm)     │
//! └─────────────┘ └─────────────┘ └───────────────────┘
//! ```
//!
//! A write either replaces the whole value or leaves the previous value in
//! place; no backend exposes a partially written entry.

use crate::error::{CartError, CartResult};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Keys of the three independently stored session fields
pub mod keys {
    /// JSON array of `{name, price, quantity}`
    pub const CART: &str = "cart";
    /// Plain zone identifier
    pub const ZONE: &str = "zone";
    /// Plain payment method label
    pub const PAYMENT_METHOD: &str = "paymentMethod";
}

/// String key-value storage that survives process restarts.
pub trait PersistentStore {
    /// Read a value; `Ok(None)` when the key was never written.
    fn get(&self, key: &str) -> CartResult<Option<String>>;

    /// Replace the value stored under `key`.
    fn set(&mut self, key: &str, value: &str) -> CartResult<()>;

    /// Backend name (for logging).
    fn backend_name(&self) -> &'static str {
        "custom"
    }
}

/// Type alias for a boxed store (dynamic dispatch)
pub type BoxedStore = Box<dyn PersistentStore + Send>;

impl<S: PersistentStore + ?Sized> PersistentStore for Box<S> {
    fn get(&self, key: &str) -> CartResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> CartResult<()> {
        (**self).set(key, value)
    }

    fn backend_name(&self) -> &'static str {
        (**self).backend_name()
    }
}

/// In-memory store. Counts writes so callers can observe that declined
/// operations never touch storage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
    writes: usize,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: seed an entry without counting it as a write
    pub fn with_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Number of `set` calls since creation
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl PersistentStore for MemoryStore {
    fn get(&self, key: &str) -> CartResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> CartResult<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.writes += 1;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}

/// Store backed by a single JSON object file.
///
/// The whole map is rewritten to a sibling temp file and renamed over the
/// target on every `set`.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStore {
    /// Open the store file, starting empty if it does not exist yet.
    ///
    /// A file that is not a JSON object of strings is moved aside to
    /// `<path>.corrupt` and the store starts empty. Only I/O failures are
    /// errors.
    pub fn open(path: impl AsRef<Path>) -> CartResult<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = match fs::read_to_string(&path) {
            Ok(content) => match serde_json::from_str(&content) {
                Ok(entries) => entries,
                Err(e) => {
                    let aside = corrupt_path(&path);
                    warn!(
                        "Corrupt store file {} ({}), moving it to {}",
                        path.display(),
                        e,
                        aside.display()
                    );
                    fs::rename(&path, &aside).map_err(|e| {
                        CartError::Storage(format!(
                            "failed to move corrupt store file {}: {}",
                            path.display(),
                            e
                        ))
                    })?;
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                return Err(CartError::Storage(format!(
                    "failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        };

        debug!("Opened store {} ({} keys)", path.display(), entries.len());
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_file(&self, entries: &BTreeMap<String, String>) -> CartResult<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| CartError::Storage(e.to_string()))?;
        }

        let bytes =
            serde_json::to_vec_pretty(entries).map_err(|e| CartError::Storage(e.to_string()))?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, bytes).map_err(|e| CartError::Storage(e.to_string()))?;
        fs::rename(&tmp, &self.path).map_err(|e| CartError::Storage(e.to_string()))
    }
}

fn corrupt_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".corrupt");
    PathBuf::from(name)
}

impl PersistentStore for FileStore {
    fn get(&self, key: &str) -> CartResult<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> CartResult<()> {
        let mut next = self.entries.clone();
        next.insert(key.to_string(), value.to_string());
        self.write_file(&next)?;
        self.entries = next;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "file"
    }
}
