//! Catalog collaborator
//!
//! The catalog is owned externally and read-only here. The JSON-backed
//! implementation loads the package list once and serves lookups from a
//! concurrent map, so a reload never blocks in-flight purchases.

use crate::Result;
use dashmap::DashMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Catalog package
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Package {
    /// Package id
    pub id: i64,

    /// Display name
    pub name: String,

    /// Currency price
    pub price: Decimal,

    /// Stars price, zero when stars checkout is not offered
    #[serde(default)]
    pub stars_price: i64,

    /// Label shown next to the free-text input field
    #[serde(default)]
    pub input_label: String,

    /// Description shown on the package page
    #[serde(default)]
    pub description: String,

    /// Stars checkout offered for this package
    #[serde(default)]
    pub allow_stars: bool,

    /// Purchasable only with the premium entitlement
    #[serde(default)]
    pub require_premium: bool,

    /// Listed in the storefront
    #[serde(default = "default_active")]
    pub active: bool,
}

fn default_active() -> bool {
    true
}

/// Read-only package lookup
pub trait Catalog: Send + Sync {
    /// Fetch one active package
    fn package(&self, id: i64) -> Option<Package>;

    /// All active packages, ordered by id
    fn active_packages(&self) -> Vec<Package>;
}

/// Catalog backed by a JSON file
pub struct JsonCatalog {
    packages: DashMap<i64, Package>,
}

impl JsonCatalog {
    /// Load packages from a JSON array file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let packages: Vec<Package> = serde_json::from_str(&content)?;
        Ok(Self::from_packages(packages))
    }

    /// Build from an in-memory package list
    pub fn from_packages(packages: Vec<Package>) -> Self {
        let map = DashMap::new();
        for package in packages {
            map.insert(package.id, package);
        }
        let catalog = Self { packages: map };
        tracing::info!("Loaded catalog with {} packages", catalog.packages.len());
        catalog
    }

    /// Replace the package set from the file, keeping lookups available
    pub fn reload(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = std::fs::read_to_string(path)?;
        let packages: Vec<Package> = serde_json::from_str(&content)?;
        self.packages.clear();
        for package in packages {
            self.packages.insert(package.id, package);
        }
        Ok(())
    }
}

impl Catalog for JsonCatalog {
    fn package(&self, id: i64) -> Option<Package> {
        self.packages
            .get(&id)
            .map(|entry| entry.value().clone())
            .filter(|p| p.active)
    }

    fn active_packages(&self) -> Vec<Package> {
        let mut packages: Vec<Package> = self
            .packages
            .iter()
            .filter(|entry| entry.value().active)
            .map(|entry| entry.value().clone())
            .collect();
        packages.sort_by_key(|p| p.id);
        packages
    }
}

impl std::fmt::Debug for JsonCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonCatalog")
            .field("packages", &self.packages.len())
            .finish()
    }
}
