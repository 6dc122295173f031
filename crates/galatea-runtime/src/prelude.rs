//! Galatea Runtime Prelude — convenient imports for common usage.
//!
//! ```rust
//! use galatea_runtime::prelude::*;
//! ```

// Re-export repositories
pub use crate::repository::{Entity, Repository, Transactions};
pub use crate::memory::MemoryRepository;

// Re-export backend configuration
pub use crate::backend::{create_store, BackendConfig, BackendError, DynRepository, Store};

// Re-export SQLite backend when feature is enabled
#[cfg(feature = "sqlite")]
pub use crate::sqlite_store::{
    open_connection, open_in_memory, SharedConnection, SqliteRepository, SqliteTransactions,
};

// Re-export services
pub use crate::catalog::{Catalog, CatalogConfig, CellPolicyConfig};

// Re-export file import/export
pub use crate::files::{
    export_mixed_substrate, export_substrate, export_substrate_set,
    import_mixed_substrate, import_substrate, import_substrate_set,
};

// Re-export from core
pub use galatea_core::prelude::*;
