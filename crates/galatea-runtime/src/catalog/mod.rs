//! Catalog — the service layer over a [`Store`].
//!
//! Each mutating call loads the aggregate it touches, runs the engine
//! operation on it, and persists it only when the operation succeeded.
//! Cross-aggregate effects (attribute propagation, usage checks between
//! stored mixes, sets and stages) are handled here because the engine
//! only sees one aggregate at a time. Propagating calls write all the
//! aggregates they touch as one batch (see `changes`).
//!
//! Mutating calls take `&mut self`; share a catalog across threads behind
//! a lock.

mod changes;
mod imports;
mod mixes;
mod sets;
mod stages;
mod substrates;

use crate::backend::Store;
use galatea_core::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use tracing::warn;

/// Which empty-cell policy new stages get.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CellPolicyConfig {
    #[default]
    Strict,
    DefaultFill,
}

/// Service-level settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub cell_policy: CellPolicyConfig,
    /// Substrate prefilled into new stages under `default-fill`.
    #[serde(default)]
    pub default_substrate: Option<String>,
}

/// Service facade over the persisted aggregates.
pub struct Catalog {
    store: Store,
    config: CatalogConfig,
}

impl Catalog {
    pub fn new(store: Store) -> Self {
        Self::with_config(store, CatalogConfig::default())
    }

    pub fn with_config(store: Store, config: CatalogConfig) -> Self {
        Self { store, config }
    }

    /// A catalog over fresh in-memory storage.
    pub fn in_memory() -> Self {
        Self::new(Store::in_memory())
    }

    pub fn config(&self) -> &CatalogConfig {
        &self.config
    }

    pub fn store(&self) -> &Store {
        &self.store
    }
}

/// Use the caller's id, or generate one when it is missing or blank.
fn resolve_id(id: Option<&str>, generate: impl FnOnce() -> String) -> String {
    match id.map(str::trim) {
        Some(id) if !id.is_empty() => id.to_string(),
        _ => generate(),
    }
}

fn require_name(kind: &str, name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(GalateaError::invalid_input(format!("{} name must not be empty", kind)));
    }
    Ok(())
}

/// Log a rejected engine operation and lift its error.
fn rejected<'a, E>(operation: &'static str, subject: &'a str) -> impl FnOnce(E) -> GalateaError + 'a
where
    E: Into<GalateaError> + Display + 'a,
{
    move |e| {
        warn!(operation, subject, error = %e, "rejected");
        e.into()
    }
}
