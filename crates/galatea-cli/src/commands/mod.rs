//! CLI command implementations.

pub mod init;
pub mod substrate;
pub mod mix;
pub mod set;
pub mod stage;
pub mod transfer;

use anyhow::{Context as _, Result};
use colored::Colorize;
use galatea::prelude::*;
use tracing::debug;

use crate::config::{project_root, Config};

/// What every command works with: the opened catalog and the settings.
pub struct Context {
    pub catalog: Catalog,
    pub config: Config,
}

impl Context {
    /// Open the configured store under the project root.
    pub fn open(config: Config) -> Result<Self> {
        let root = project_root()?;
        let store = create_store(&config.backend(&root))
            .with_context(|| format!("Failed to open storage under {}", root.display()))?;
        debug!(root = %root.display(), backend = ?config.storage.backend, "storage opened");
        let catalog = Catalog::with_config(store, config.catalog());
        Ok(Self { catalog, config })
    }

    pub fn page_size(&self, requested: Option<usize>) -> usize {
        requested.unwrap_or(self.config.listing.page_size)
    }
}

/// Footer for paged listings.
pub fn print_page_footer<T>(page: &Page<T>) {
    println!();
    println!(
        "{}",
        format!(
            "page {}/{} · {} total",
            page.page,
            page.total_pages.max(1),
            page.total_count
        )
        .dimmed()
    );
}

pub fn done(message: impl std::fmt::Display) {
    println!("{} {}", "✓".green(), message);
}
