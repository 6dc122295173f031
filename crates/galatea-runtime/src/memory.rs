//! In-memory repository backend.

use crate::repository::{already_exists, not_found, Entity, Repository};
use galatea_core::pagination::PageRequest;
use galatea_core::error::StoreError;
use std::collections::BTreeMap;
use tracing::debug;

/// `BTreeMap`-backed repository; keeps items ordered by id.
#[derive(Debug, Clone)]
pub struct MemoryRepository<T> {
    items: BTreeMap<String, T>,
}

impl<T> MemoryRepository<T> {
    pub fn new() -> Self {
        Self {
            items: BTreeMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> Default for MemoryRepository<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> Repository<T> for MemoryRepository<T> {
    fn create(&mut self, item: &T) -> Result<(), StoreError> {
        if self.items.contains_key(item.key()) {
            return Err(already_exists::<T>(item.key()));
        }
        debug!(kind = T::KIND, id = item.key(), "create");
        self.items.insert(item.key().to_string(), item.clone());
        Ok(())
    }

    fn get(&self, id: &str) -> Result<T, StoreError> {
        self.items.get(id).cloned().ok_or_else(|| not_found::<T>(id))
    }

    fn update(&mut self, item: &T) -> Result<(), StoreError> {
        let slot = self
            .items
            .get_mut(item.key())
            .ok_or_else(|| not_found::<T>(item.key()))?;
        debug!(kind = T::KIND, id = item.key(), "update");
        *slot = item.clone();
        Ok(())
    }

    fn delete(&mut self, id: &str) -> Result<(), StoreError> {
        debug!(kind = T::KIND, id, "delete");
        self.items.remove(id).map(|_| ()).ok_or_else(|| not_found::<T>(id))
    }

    fn list(&self, request: PageRequest) -> Result<(Vec<T>, usize), StoreError> {
        let items = request.slice(self.items.values().cloned());
        Ok((items, self.items.len()))
    }

    fn exists(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.items.contains_key(id))
    }

    fn all(&self) -> Result<Vec<T>, StoreError> {
        Ok(self.items.values().cloned().collect())
    }
}
