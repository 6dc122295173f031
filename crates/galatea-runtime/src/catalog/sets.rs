//! Substrate-set operations.

use super::changes::Changes;
use super::{rejected, require_name, resolve_id, Catalog};
use crate::repository::Entity;
use galatea_core::prelude::*;
use tracing::info;

impl Catalog {
    pub fn create_substrate_set(&mut self, id: Option<&str>, name: &str) -> Result<SubstrateSet> {
        require_name(SubstrateSet::KIND, name)?;
        let id = resolve_id(id, || SubstrateSetId::generate().0);
        let set = SubstrateSet::new(id, name);

        self.store.substrate_sets.create(&set)?;
        info!(id = %set.id, name, "substrate set created");
        Ok(set)
    }

    pub fn get_substrate_set(&self, id: &str) -> Result<SubstrateSet> {
        Ok(self.store.substrate_sets.get(id)?)
    }

    pub fn rename_substrate_set(&mut self, id: &str, name: &str) -> Result<SubstrateSet> {
        require_name(SubstrateSet::KIND, name)?;
        let mut set = self.store.substrate_sets.get(id)?;
        set.rename(name);
        self.store.substrate_sets.update(&set)?;
        info!(id, name, "substrate set renamed");
        Ok(set)
    }

    /// Delete a set that no stored stage is bound to.
    pub fn delete_substrate_set(&mut self, id: &str) -> Result<()> {
        if !self.store.substrate_sets.exists(id)? {
            return Err(GalateaError::not_found(SubstrateSet::KIND, id));
        }
        if let Some(stage) = self
            .store
            .stages
            .all()?
            .into_iter()
            .find(|stage| stage.substrate_set_id().as_str() == id)
        {
            return Err(GalateaError::in_use(
                SubstrateSet::KIND,
                id,
                format!("{} {}", Stage::KIND, stage.id),
            ));
        }

        self.store.substrate_sets.delete(id)?;
        info!(id, "substrate set deleted");
        Ok(())
    }

    pub fn list_substrate_sets(&self, page: usize, page_size: usize) -> Result<Page<SubstrateSet>> {
        let request = PageRequest::new(page, page_size);
        let (items, total) = self.store.substrate_sets.list(request)?;
        Ok(Page::new(items, total, request))
    }

    /// Add a stored substrate to a set.
    pub fn add_substrate_to_set(&mut self, set_id: &str, substrate_id: &str) -> Result<()> {
        let mut set = self.store.substrate_sets.get(set_id)?;
        let substrate = self.store.substrates.get(substrate_id)?;

        set.add_substrate(substrate)
            .map_err(rejected("add substrate to set", set_id))?;
        self.store.substrate_sets.update(&set)?;
        info!(set = set_id, substrate = substrate_id, "substrate added to set");
        Ok(())
    }

    /// Remove a substrate from a set.
    ///
    /// Stage cells holding it are reset. A stage that prefills its empty
    /// cells with this substrate blocks the removal.
    pub fn remove_substrate_from_set(&mut self, set_id: &str, substrate_id: &str) -> Result<()> {
        let stored = self.store.substrate_sets.get(set_id)?;
        let mut set = stored.clone();
        let id = SubstrateId::new(substrate_id);

        set.remove_substrate(&id)
            .map_err(rejected("remove substrate from set", set_id))?;

        if let Some(stage) = self.stages_bound_to(&set.id)?.into_iter().find(|stage| {
            matches!(stage.policy(), CellPolicy::DefaultFill { substrate } if substrate.id == id)
        }) {
            return Err(GalateaError::in_use(
                Substrate::KIND,
                substrate_id,
                format!("{} {} as default fill", Stage::KIND, stage.id),
            ));
        }

        self.replace_set(stored, set)?;
        info!(set = set_id, substrate = substrate_id, "substrate removed from set");
        Ok(())
    }

    /// Add a stored mix to a set; the set must already hold every component.
    pub fn add_mixed_substrate_to_set(&mut self, set_id: &str, mix_id: &str) -> Result<()> {
        let mut set = self.store.substrate_sets.get(set_id)?;
        let mix = self.store.mixed_substrates.get(mix_id)?;

        set.add_mixed_substrate(mix)
            .map_err(rejected("add mixed substrate to set", set_id))?;
        self.store.substrate_sets.update(&set)?;
        info!(set = set_id, mix = mix_id, "mixed substrate added to set");
        Ok(())
    }

    /// Remove a mix from a set, resetting stage cells that hold it.
    pub fn remove_mixed_substrate_from_set(&mut self, set_id: &str, mix_id: &str) -> Result<()> {
        let stored = self.store.substrate_sets.get(set_id)?;
        let mut set = stored.clone();

        set.remove_mixed_substrate(&MixedSubstrateId::new(mix_id))
            .map_err(rejected("remove mixed substrate from set", set_id))?;
        self.replace_set(stored, set)?;
        info!(set = set_id, mix = mix_id, "mixed substrate removed from set");
        Ok(())
    }

    /// Replace a set's copy of a mix with the catalog's current version.
    pub fn refresh_mixed_substrate_in_set(&mut self, set_id: &str, mix_id: &str) -> Result<()> {
        let stored = self.store.substrate_sets.get(set_id)?;
        let mix = self.store.mixed_substrates.get(mix_id)?;
        let mut set = stored.clone();

        set.update_mixed_substrate(mix)
            .map_err(rejected("refresh mixed substrate in set", set_id))?;
        self.replace_set(stored, set)?;
        info!(set = set_id, mix = mix_id, "mixed substrate refreshed in set");
        Ok(())
    }

    /// Store a changed set together with its re-synced stages.
    fn replace_set(&mut self, stored: SubstrateSet, set: SubstrateSet) -> Result<()> {
        let mut changes = Changes::default();
        self.sync_stages(&set, &mut changes)?;
        changes.set(stored, set);
        self.apply(&changes)
    }
}
