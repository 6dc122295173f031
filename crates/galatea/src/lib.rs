//! # Galatea
//!
//! Composition of growing media: substrates, percentage-weighted mixes,
//! substrate sets that keep mixes coherent with their components, and
//! stages that lay set members out on a grid.
//!
//! ## Quick Start
//!
//! ```rust
//! use galatea::prelude::*;
//!
//! let mut catalog = Catalog::in_memory();
//!
//! catalog.create_substrate(Some("sand"), "Sand", "#c2b280").unwrap();
//! catalog.create_substrate(Some("perlite"), "Perlite", "#f5f5f5").unwrap();
//!
//! catalog.create_mixed_substrate(Some("potting"), "Potting mix", "#6b4f3a").unwrap();
//! catalog.add_substrate_to_mix("potting", "sand", 60.0).unwrap();
//! catalog.add_substrate_to_mix("potting", "perlite", 40.0).unwrap();
//!
//! catalog.create_substrate_set(Some("nursery"), "Nursery").unwrap();
//! catalog.add_substrate_to_set("nursery", "sand").unwrap();
//! catalog.add_substrate_to_set("nursery", "perlite").unwrap();
//! catalog.add_mixed_substrate_to_set("nursery", "potting").unwrap();
//!
//! catalog.create_stage(Some("bench"), "Bench", 3, 3, "nursery").unwrap();
//! catalog.place_mixed_substrate("bench", 1, 1, "potting").unwrap();
//!
//! println!("{}", catalog.get_stage("bench").unwrap());
//! ```
//!
//! ## Architecture
//!
//! - [`galatea_core`] - The engine: substrates, mixes, sets, stages and their rules
//! - [`galatea_runtime`] - Repositories (memory, SQLite), the `Catalog` service, file import/export
//!
//! ## Rules
//!
//! | Aggregate | Rule |
//! |-----------|------|
//! | Mix | Shares are positive and never exceed 100%; a non-empty mix validates at 100% |
//! | Set | Every component of a member mix is a member substrate |
//! | Set | A substrate stays while a member mix still uses it |
//! | Stage | Cells only hold members of the stage's set |
//!
//! ## Persistence
//!
//! ```rust,ignore
//! use galatea::prelude::*;
//!
//! // Requires the "sqlite" feature
//! let store = create_store(&BackendConfig::sqlite(".galatea/galatea.db")).unwrap();
//! let catalog = Catalog::new(store);
//! ```

// Re-export all subcrates
pub use galatea_core as core;
pub use galatea_runtime as runtime;

/// Prelude module for convenient imports.
///
/// ```rust
/// use galatea::prelude::*;
/// ```
pub mod prelude {
    pub use galatea_runtime::prelude::*;
}
