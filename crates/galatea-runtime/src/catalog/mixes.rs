//! Mixed-substrate operations.

use super::changes::Changes;
use super::{rejected, require_name, resolve_id, Catalog};
use crate::repository::Entity;
use galatea_core::prelude::*;
use tracing::info;

impl Catalog {
    /// Create an empty mix.
    pub fn create_mixed_substrate(
        &mut self,
        id: Option<&str>,
        name: &str,
        color: &str,
    ) -> Result<MixedSubstrate> {
        require_name(MixedSubstrate::KIND, name)?;
        let id = resolve_id(id, || MixedSubstrateId::generate().0);
        let mix = MixedSubstrate::new(id, name, color);

        self.store.mixed_substrates.create(&mix)?;
        info!(id = %mix.id, name, "mixed substrate created");
        Ok(mix)
    }

    pub fn get_mixed_substrate(&self, id: &str) -> Result<MixedSubstrate> {
        Ok(self.store.mixed_substrates.get(id)?)
    }

    /// Change a mix's name and color, here and in every set that holds it.
    ///
    /// Only the display attributes travel into sets; composition changes
    /// reach a set through [`Catalog::refresh_mixed_substrate_in_set`].
    pub fn update_mixed_substrate(&mut self, id: &str, name: &str, color: &str) -> Result<MixedSubstrate> {
        require_name(MixedSubstrate::KIND, name)?;
        let stored = self.store.mixed_substrates.get(id)?;
        let mut mix = stored.clone();
        mix.name = name.to_string();
        mix.color = color.to_string();

        let mut changes = Changes::default();
        changes.mix(stored, mix.clone());

        for set in self.store.substrate_sets.all()? {
            let Some(member) = set.find_mixed_substrate(&mix.id) else {
                continue;
            };
            let mut member = member.clone();
            member.name = mix.name.clone();
            member.color = mix.color.clone();

            let mut refreshed = set.clone();
            refreshed
                .update_mixed_substrate(member)
                .map_err(rejected("propagate mix attributes into set", id))?;
            self.sync_stages(&refreshed, &mut changes)?;
            changes.set(set, refreshed);
        }

        self.apply(&changes)?;
        info!(id, name, records = changes.len(), "mixed substrate updated");
        Ok(mix)
    }

    /// Delete a mix that no stored set still holds.
    pub fn delete_mixed_substrate(&mut self, id: &str) -> Result<()> {
        let mix_id = MixedSubstrateId::new(id);
        if !self.store.mixed_substrates.exists(id)? {
            return Err(GalateaError::not_found(MixedSubstrate::KIND, id));
        }
        if let Some(set) = self
            .store
            .substrate_sets
            .all()?
            .into_iter()
            .find(|set| set.contains_mixed_substrate(&mix_id))
        {
            return Err(GalateaError::in_use(
                MixedSubstrate::KIND,
                id,
                format!("{} {}", SubstrateSet::KIND, set.id),
            ));
        }

        self.store.mixed_substrates.delete(id)?;
        info!(id, "mixed substrate deleted");
        Ok(())
    }

    pub fn list_mixed_substrates(&self, page: usize, page_size: usize) -> Result<Page<MixedSubstrate>> {
        let request = PageRequest::new(page, page_size);
        let (items, total) = self.store.mixed_substrates.list(request)?;
        Ok(Page::new(items, total, request))
    }

    /// Mixes that list the substrate as a component.
    pub fn mixes_containing(
        &self,
        substrate_id: &str,
        page: usize,
        page_size: usize,
    ) -> Result<Page<MixedSubstrate>> {
        let request = PageRequest::new(page, page_size);
        let substrate_id = SubstrateId::new(substrate_id);
        let matching: Vec<MixedSubstrate> = self
            .store
            .mixed_substrates
            .all()?
            .into_iter()
            .filter(|ms| ms.contains_substrate(&substrate_id))
            .collect();
        let total = matching.len();
        Ok(Page::new(request.slice(matching), total, request))
    }

    /// Add a stored substrate to a mix with the given share.
    pub fn add_substrate_to_mix(&mut self, mix_id: &str, substrate_id: &str, percentage: f64) -> Result<()> {
        let mut mix = self.store.mixed_substrates.get(mix_id)?;
        let substrate = self.store.substrates.get(substrate_id)?;

        mix.add_substrate(substrate, percentage)
            .map_err(rejected("add substrate to mix", mix_id))?;
        self.store.mixed_substrates.update(&mix)?;
        info!(mix = mix_id, substrate = substrate_id, percentage, "substrate added to mix");
        Ok(())
    }

    pub fn remove_substrate_from_mix(&mut self, mix_id: &str, substrate_id: &str) -> Result<()> {
        let mut mix = self.store.mixed_substrates.get(mix_id)?;

        mix.remove_substrate(&SubstrateId::new(substrate_id))
            .map_err(rejected("remove substrate from mix", mix_id))?;
        self.store.mixed_substrates.update(&mix)?;
        info!(mix = mix_id, substrate = substrate_id, "substrate removed from mix");
        Ok(())
    }

    pub fn update_substrate_percentage(
        &mut self,
        mix_id: &str,
        substrate_id: &str,
        percentage: f64,
    ) -> Result<()> {
        let mut mix = self.store.mixed_substrates.get(mix_id)?;

        mix.update_percentage(&SubstrateId::new(substrate_id), percentage)
            .map_err(rejected("update substrate percentage", mix_id))?;
        self.store.mixed_substrates.update(&mix)?;
        info!(mix = mix_id, substrate = substrate_id, percentage, "substrate percentage updated");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> Catalog {
        let mut catalog = Catalog::in_memory();
        catalog.create_substrate(Some("sand"), "Sand", "#c2b280").unwrap();
        catalog.create_substrate(Some("perlite"), "Perlite", "#f5f5f5").unwrap();
        catalog.create_mixed_substrate(Some("potting"), "Potting mix", "#6b4f3a").unwrap();
        catalog
    }

    #[test]
    fn composition_is_persisted_only_on_success() {
        let mut catalog = seeded();
        catalog.add_substrate_to_mix("potting", "sand", 60.0).unwrap();

        let err = catalog.add_substrate_to_mix("potting", "perlite", 50.0).unwrap_err();
        assert!(matches!(err, GalateaError::Mix(MixError::ExceedsMaxPercentage { .. })));

        let stored = catalog.get_mixed_substrate("potting").unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored.total_percentage(), 60.0);
    }

    #[test]
    fn unknown_substrate_is_a_store_error() {
        let mut catalog = seeded();
        assert!(matches!(
            catalog.add_substrate_to_mix("potting", "clay", 10.0),
            Err(GalateaError::Store(StoreError::NotFound { kind: "substrate", .. }))
        ));
    }

    #[test]
    fn percentages_can_be_rebalanced() {
        let mut catalog = seeded();
        catalog.add_substrate_to_mix("potting", "sand", 60.0).unwrap();
        catalog.add_substrate_to_mix("potting", "perlite", 40.0).unwrap();
        catalog.update_substrate_percentage("potting", "sand", 30.0).unwrap();
        catalog.update_substrate_percentage("potting", "perlite", 70.0).unwrap();
        assert!(catalog.get_mixed_substrate("potting").unwrap().validate().is_ok());

        catalog.remove_substrate_from_mix("potting", "sand").unwrap();
        assert!(matches!(
            catalog.remove_substrate_from_mix("potting", "sand"),
            Err(GalateaError::Mix(MixError::SubstrateNotFound(_)))
        ));
    }

    #[test]
    fn mixes_containing_filters_by_component() {
        let mut catalog = seeded();
        catalog.create_mixed_substrate(Some("drainage"), "Drainage", "#fff").unwrap();
        catalog.add_substrate_to_mix("potting", "sand", 50.0).unwrap();
        catalog.add_substrate_to_mix("drainage", "perlite", 100.0).unwrap();

        let page = catalog.mixes_containing("sand", 1, 10).unwrap();
        assert_eq!(page.total_count, 1);
        assert_eq!(page.items[0].id.as_str(), "potting");
    }

    #[test]
    fn substrate_used_by_a_mix_cannot_be_deleted() {
        let mut catalog = seeded();
        catalog.add_substrate_to_mix("potting", "sand", 50.0).unwrap();
        assert!(matches!(
            catalog.delete_substrate("sand"),
            Err(GalateaError::Store(StoreError::InUse { .. }))
        ));
        catalog.remove_substrate_from_mix("potting", "sand").unwrap();
        catalog.delete_substrate("sand").unwrap();
    }
}
