//! Repository — the persistence collaborator.
//!
//! Every aggregate (substrate, mixed substrate, substrate set, stage) is
//! stored and retrieved as a unit by its id. Backends implement
//! [`Repository`] once, generically over [`Entity`].

use galatea_core::error::StoreError;
use galatea_core::pagination::PageRequest;
use galatea_core::prelude::{MixedSubstrate, Stage, Substrate, SubstrateSet};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// An aggregate root that can be persisted.
pub trait Entity: Clone + Serialize + DeserializeOwned + Send + 'static {
    /// Human-readable kind, used in errors and logs.
    const KIND: &'static str;

    /// Storage table (or namespace) name.
    const TABLE: &'static str;

    /// The entity's id as a plain string.
    fn key(&self) -> &str;

    /// Display name stored alongside the record.
    fn label(&self) -> &str;
}

/// Storage of one kind of aggregate, keyed by id.
///
/// Creating a duplicate id fails with [`StoreError::AlreadyExists`];
/// reading, updating or deleting a missing id fails with
/// [`StoreError::NotFound`]. Listings are ordered by id.
pub trait Repository<T: Entity>: Send {
    fn create(&mut self, item: &T) -> Result<(), StoreError>;

    fn get(&self, id: &str) -> Result<T, StoreError>;

    fn update(&mut self, item: &T) -> Result<(), StoreError>;

    fn delete(&mut self, id: &str) -> Result<(), StoreError>;

    /// One page of items plus the total number stored.
    fn list(&self, request: PageRequest) -> Result<(Vec<T>, usize), StoreError>;

    fn exists(&self, id: &str) -> Result<bool, StoreError>;

    /// Every stored item, ordered by id.
    fn all(&self) -> Result<Vec<T>, StoreError>;
}

/// Groups writes to several repositories of one backend into a unit.
///
/// Backends without native transactions don't provide one; the catalog
/// undoes its own writes there instead.
pub trait Transactions: Send {
    fn begin(&self) -> Result<(), StoreError>;

    fn commit(&self) -> Result<(), StoreError>;

    fn rollback(&self) -> Result<(), StoreError>;
}

impl Entity for Substrate {
    const KIND: &'static str = "substrate";
    const TABLE: &'static str = "substrates";

    fn key(&self) -> &str {
        self.id.as_str()
    }

    fn label(&self) -> &str {
        &self.name
    }
}

impl Entity for MixedSubstrate {
    const KIND: &'static str = "mixed substrate";
    const TABLE: &'static str = "mixed_substrates";

    fn key(&self) -> &str {
        self.id.as_str()
    }

    fn label(&self) -> &str {
        &self.name
    }
}

impl Entity for SubstrateSet {
    const KIND: &'static str = "substrate set";
    const TABLE: &'static str = "substrate_sets";

    fn key(&self) -> &str {
        self.id.as_str()
    }

    fn label(&self) -> &str {
        &self.name
    }
}

impl Entity for Stage {
    const KIND: &'static str = "stage";
    const TABLE: &'static str = "stages";

    fn key(&self) -> &str {
        self.id.as_str()
    }

    fn label(&self) -> &str {
        &self.name
    }
}

pub(crate) fn not_found<T: Entity>(id: &str) -> StoreError {
    StoreError::NotFound {
        kind: T::KIND,
        id: id.to_string(),
    }
}

pub(crate) fn already_exists<T: Entity>(id: &str) -> StoreError {
    StoreError::AlreadyExists {
        kind: T::KIND,
        id: id.to_string(),
    }
}
