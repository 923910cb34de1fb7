//! # Folio Configuration
//!
//! A minimal string key/value store. Keys are dotted
//! (`storage.public_base_url`) and can be set programmatically or
//! loaded from the environment.
//!
//! ## Setting and reading values
//! ```rust
//! use folio_core::FolioConfig;
//! let mut cfg = FolioConfig::new();
//!
//! cfg.set("storage.bucket", "site-assets");
//!
//! assert_eq!(cfg.get("storage.bucket"), Some("site-assets"));
//! ```
//!
//! ## Environment overrides
//! Variables with the `FOLIO__` prefix are lowercased and `__` becomes `.`:
//!
//! ```bash
//! export FOLIO__STORAGE__PUBLIC_BASE_URL=https://cdn.example.com/assets
//! ```

use std::collections::HashMap;

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "FOLIO__";

#[derive(Debug, Default, Clone)]
pub struct FolioConfig {
    values: HashMap<String, String>,
}

impl FolioConfig {
    /// Create an empty config store.
    pub fn new() -> Self {
        Self {
            values: HashMap::new(),
        }
    }

    /// Set a configuration key to a string value.
    pub fn set<K, V>(&mut self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.values.insert(key.into(), value.into());
    }

    /// Get a configuration value by key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(|s| s.as_str())
    }

    /// Check whether a key is present.
    pub fn has(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// Layer `(name, value)` pairs carrying `prefix` over the current values.
    pub fn load_vars<I>(&mut self, prefix: &str, vars: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in vars {
            if let Some(stripped) = key.strip_prefix(prefix) {
                let normalized = stripped.to_lowercase().replace("__", ".");
                self.set(normalized, value);
            }
        }
    }

    /// Layer the process environment (`FOLIO__*`) over the current values.
    pub fn load_env(&mut self) {
        self.load_vars(ENV_PREFIX, std::env::vars());
    }

    pub fn snapshot(&self) -> FolioConfigSnapshot {
        FolioConfigSnapshot::new(self.values.clone())
    }
}

/// Read-only view handed to backends and the console at build time.
#[derive(Debug, Clone, Default)]
pub struct FolioConfigSnapshot {
    map: HashMap<String, String>,
}

impl FolioConfigSnapshot {
    pub(crate) fn new(map: HashMap<String, String>) -> Self {
        Self { map }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.map
            .get(key)
            .map(|s| s.as_str())
            .filter(|s| !s.trim().is_empty())
    }

    pub fn get_string(&self, key: &str) -> Option<String> {
        self.get(key).map(|s| s.to_string())
    }

    pub fn get_or(&self, key: &str, default: &str) -> String {
        self.get_string(key).unwrap_or_else(|| default.to_string())
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(|v| v.trim().parse::<u64>().ok())
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(|v| v.trim().parse::<bool>().ok())
    }

    /// Comma-separated list, trimmed, empty entries dropped.
    pub fn get_list(&self, key: &str) -> Vec<String> {
        self.get(key)
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }
}
