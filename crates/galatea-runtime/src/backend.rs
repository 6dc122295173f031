//! Storage backend configuration and factory.
//!
//! A [`Store`] is the explicitly constructed persistence handle: build it
//! once at startup with [`create_store`] and hand it to whatever needs it.

use crate::memory::MemoryRepository;
use crate::repository::{Repository, Transactions};
use galatea_core::error::StoreError;
use galatea_core::prelude::{MixedSubstrate, Stage, Substrate, SubstrateSet};

#[cfg(feature = "sqlite")]
use std::path::PathBuf;

/// Configuration for storage backend selection.
#[derive(Debug, Clone, Default)]
pub enum BackendConfig {
    /// In-memory maps (default, fast, no persistence).
    #[default]
    InMemory,

    /// SQLite-backed persistent storage.
    #[cfg(feature = "sqlite")]
    Sqlite {
        /// Path to the SQLite database file.
        /// If None, uses an in-memory SQLite database.
        path: Option<PathBuf>,
    },
}

impl BackendConfig {
    /// Create an in-memory backend configuration.
    pub fn in_memory() -> Self {
        BackendConfig::InMemory
    }

    /// Create an SQLite backend configuration with a file path.
    #[cfg(feature = "sqlite")]
    pub fn sqlite(path: impl Into<PathBuf>) -> Self {
        BackendConfig::Sqlite {
            path: Some(path.into()),
        }
    }

    /// Create an SQLite backend configuration with in-memory storage.
    #[cfg(feature = "sqlite")]
    pub fn sqlite_in_memory() -> Self {
        BackendConfig::Sqlite { path: None }
    }
}

/// Boxed repository for one aggregate kind.
pub type DynRepository<T> = Box<dyn Repository<T>>;

/// One repository per aggregate kind, sharing a backend.
pub struct Store {
    pub substrates: DynRepository<Substrate>,
    pub mixed_substrates: DynRepository<MixedSubstrate>,
    pub substrate_sets: DynRepository<SubstrateSet>,
    pub stages: DynRepository<Stage>,
    transactions: Option<Box<dyn Transactions>>,
}

impl Store {
    /// A store backed by in-memory maps.
    pub fn in_memory() -> Self {
        Self {
            substrates: Box::new(MemoryRepository::new()),
            mixed_substrates: Box::new(MemoryRepository::new()),
            substrate_sets: Box::new(MemoryRepository::new()),
            stages: Box::new(MemoryRepository::new()),
            transactions: None,
        }
    }

    /// A store whose repositories share one SQLite connection.
    #[cfg(feature = "sqlite")]
    pub fn sqlite(conn: crate::sqlite_store::SharedConnection) -> Result<Self, BackendError> {
        use crate::sqlite_store::{SqliteRepository, SqliteTransactions};

        let err = |e: StoreError| BackendError::SqliteError(e.to_string());
        Ok(Self {
            substrates: Box::new(SqliteRepository::new(conn.clone()).map_err(err)?),
            mixed_substrates: Box::new(SqliteRepository::new(conn.clone()).map_err(err)?),
            substrate_sets: Box::new(SqliteRepository::new(conn.clone()).map_err(err)?),
            stages: Box::new(SqliteRepository::new(conn.clone()).map_err(err)?),
            transactions: Some(Box::new(SqliteTransactions::new(conn))),
        })
    }

    /// Whether the backend can group writes natively.
    pub fn is_transactional(&self) -> bool {
        self.transactions.is_some()
    }

    pub fn begin(&self) -> Result<(), StoreError> {
        match &self.transactions {
            Some(tx) => tx.begin(),
            None => Ok(()),
        }
    }

    pub fn commit(&self) -> Result<(), StoreError> {
        match &self.transactions {
            Some(tx) => tx.commit(),
            None => Ok(()),
        }
    }

    pub fn rollback(&self) -> Result<(), StoreError> {
        match &self.transactions {
            Some(tx) => tx.rollback(),
            None => Ok(()),
        }
    }
}

/// Create a store from configuration.
///
/// # Errors
/// Returns an error if the backend cannot be created (e.g., SQLite file issues).
pub fn create_store(config: &BackendConfig) -> Result<Store, BackendError> {
    match config {
        BackendConfig::InMemory => Ok(Store::in_memory()),

        #[cfg(feature = "sqlite")]
        BackendConfig::Sqlite { path } => {
            use crate::sqlite_store::{open_connection, open_in_memory};

            let conn = match path {
                Some(p) => open_connection(p),
                None => open_in_memory(),
            }
            .map_err(|e| BackendError::SqliteError(e.to_string()))?;

            Store::sqlite(conn)
        }
    }
}

/// Errors that can occur when creating storage backends.
#[derive(Debug, Clone)]
pub enum BackendError {
    /// SQLite-specific error.
    #[cfg(feature = "sqlite")]
    SqliteError(String),
}

impl std::fmt::Display for BackendError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match *self {
            #[cfg(feature = "sqlite")]
            BackendError::SqliteError(ref msg) => write!(f, "SQLite error: {}", msg),
        }
    }
}

impl std::error::Error for BackendError {}
