//! Configuration for the storefront engine

use crate::notify::DispatchConfig;
use std::path::PathBuf;

/// Storefront configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Notification dispatch tuning
    pub notifications: DispatchConfig,

    /// Catalog file to load at startup, when JSON-backed
    pub catalog_path: Option<PathBuf>,
}
