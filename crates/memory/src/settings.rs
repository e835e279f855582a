//! Store settings.
//!
//! Deserializable so embedders can keep the store section in their config
//! file next to provider settings.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Settings for the file-based conversation store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreSettings {
    /// Directory where conversations are persisted.
    #[serde(default = "default_dir")]
    pub dir: PathBuf,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self { dir: default_dir() }
    }
}

/// Default path: `~/.relai/conversations`
fn default_dir() -> PathBuf {
    let home = std::env::var("HOME")
        .or_else(|_| std::env::var("USERPROFILE"))
        .unwrap_or_else(|_| ".".to_string());
    PathBuf::from(home).join(".relai").join("conversations")
}
