//! Substrate operations.

use super::changes::Changes;
use super::{rejected, require_name, resolve_id, Catalog};
use crate::repository::Entity;
use galatea_core::prelude::*;
use tracing::info;

impl Catalog {
    /// Create a substrate; a fresh id is generated when `id` is missing or blank.
    pub fn create_substrate(&mut self, id: Option<&str>, name: &str, color: &str) -> Result<Substrate> {
        require_name(Substrate::KIND, name)?;
        let id = resolve_id(id, || SubstrateId::generate().0);
        let substrate = Substrate::new(id, name, color);

        self.store.substrates.create(&substrate)?;
        info!(id = %substrate.id, name, "substrate created");
        Ok(substrate)
    }

    pub fn get_substrate(&self, id: &str) -> Result<Substrate> {
        Ok(self.store.substrates.get(id)?)
    }

    /// Rename/recolor a substrate and propagate the new attributes into
    /// every stored mix, set and stage that holds a copy of it.
    ///
    /// Either every copy is updated or nothing is.
    pub fn update_substrate(&mut self, id: &str, name: &str, color: &str) -> Result<Substrate> {
        require_name(Substrate::KIND, name)?;
        let stored = self.store.substrates.get(id)?;
        let mut substrate = stored.clone();
        substrate.name = name.to_string();
        substrate.color = color.to_string();

        let mut changes = Changes::default();
        changes.substrate(stored, substrate.clone());

        for mix in self.store.mixed_substrates.all()? {
            let mut refreshed = mix.clone();
            if refreshed.refresh_substrate(&substrate) {
                changes.mix(mix, refreshed);
            }
        }

        for set in self.store.substrate_sets.all()? {
            if !set.contains_substrate(&substrate.id) {
                continue;
            }
            let mut refreshed = set.clone();
            refreshed
                .update_substrate(substrate.clone())
                .map_err(rejected("propagate substrate into set", id))?;
            self.sync_stages(&refreshed, &mut changes)?;
            changes.set(set, refreshed);
        }

        self.apply(&changes)?;
        info!(id, name, records = changes.len(), "substrate updated");
        Ok(substrate)
    }

    /// Delete a substrate that no stored mix or set still holds.
    pub fn delete_substrate(&mut self, id: &str) -> Result<()> {
        let substrate_id = SubstrateId::new(id);
        if !self.store.substrates.exists(id)? {
            return Err(GalateaError::not_found(Substrate::KIND, id));
        }

        if let Some(mix) = self
            .store
            .mixed_substrates
            .all()?
            .into_iter()
            .find(|ms| ms.contains_substrate(&substrate_id))
        {
            return Err(GalateaError::in_use(
                Substrate::KIND,
                id,
                format!("{} {}", MixedSubstrate::KIND, mix.id),
            ));
        }
        if let Some(set) = self
            .store
            .substrate_sets
            .all()?
            .into_iter()
            .find(|set| set.contains_substrate(&substrate_id))
        {
            return Err(GalateaError::in_use(
                Substrate::KIND,
                id,
                format!("{} {}", SubstrateSet::KIND, set.id),
            ));
        }

        self.store.substrates.delete(id)?;
        info!(id, "substrate deleted");
        Ok(())
    }

    pub fn list_substrates(&self, page: usize, page_size: usize) -> Result<Page<Substrate>> {
        let request = PageRequest::new(page, page_size);
        let (items, total) = self.store.substrates.list(request)?;
        Ok(Page::new(items, total, request))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_generates_missing_id() {
        let mut catalog = Catalog::in_memory();
        let s = catalog.create_substrate(None, "Sand", "#c2b280").unwrap();
        assert_eq!(s.id.as_str().len(), 36);
        assert_eq!(catalog.get_substrate(s.id.as_str()).unwrap(), s);
    }

    #[test]
    fn duplicate_and_blank_names_are_rejected() {
        let mut catalog = Catalog::in_memory();
        catalog.create_substrate(Some("sand"), "Sand", "#c2b280").unwrap();
        assert!(matches!(
            catalog.create_substrate(Some("sand"), "Sand", "#c2b280"),
            Err(GalateaError::Store(StoreError::AlreadyExists { .. }))
        ));
        assert!(matches!(
            catalog.create_substrate(Some("peat"), "  ", "#000"),
            Err(GalateaError::InvalidInput(_))
        ));
    }

    #[test]
    fn list_reports_totals() {
        let mut catalog = Catalog::in_memory();
        for id in ["a", "b", "c"] {
            catalog.create_substrate(Some(id), id, "#000").unwrap();
        }
        let page = catalog.list_substrates(0, 2).unwrap();
        assert_eq!(page.page, 1);
        assert_eq!(page.items.len(), 2);
        assert_eq!(page.total_count, 3);
        assert_eq!(page.total_pages, 2);
    }
}
