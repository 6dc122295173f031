//! Stage operations.
//!
//! A stage only records the id of its substrate set; every call that needs
//! the set's members loads it from the store and hands it to the engine.

use super::changes::Changes;
use super::{rejected, require_name, resolve_id, Catalog, CellPolicyConfig};
use crate::repository::Entity;
use galatea_core::prelude::*;
use tracing::{debug, info};

impl Catalog {
    /// Create a stage bound to a stored set, using the configured cell policy.
    pub fn create_stage(
        &mut self,
        id: Option<&str>,
        name: &str,
        width: usize,
        height: usize,
        set_id: &str,
    ) -> Result<Stage> {
        require_name(Stage::KIND, name)?;
        let set = self.store.substrate_sets.get(set_id)?;
        let policy = self.cell_policy(&set)?;
        let id = resolve_id(id, || StageId::generate().0);

        let stage = Stage::new(id.as_str(), name, width, height, &set, policy)
            .map_err(rejected("create stage", &id))?;
        self.store.stages.create(&stage)?;
        info!(id = %stage.id, name, width, height, set = set_id, "stage created");
        Ok(stage)
    }

    pub fn get_stage(&self, id: &str) -> Result<Stage> {
        Ok(self.store.stages.get(id)?)
    }

    pub fn update_stage(&mut self, id: &str, name: &str, comment: &str) -> Result<Stage> {
        require_name(Stage::KIND, name)?;
        let mut stage = self.store.stages.get(id)?;
        stage.rename(name);
        stage.set_comment(comment);
        self.store.stages.update(&stage)?;
        info!(id, name, "stage updated");
        Ok(stage)
    }

    pub fn delete_stage(&mut self, id: &str) -> Result<()> {
        self.store.stages.delete(id)?;
        info!(id, "stage deleted");
        Ok(())
    }

    pub fn list_stages(&self, page: usize, page_size: usize) -> Result<Page<Stage>> {
        let request = PageRequest::new(page, page_size);
        let (items, total) = self.store.stages.list(request)?;
        Ok(Page::new(items, total, request))
    }

    pub fn resize_stage(&mut self, id: &str, width: usize, height: usize) -> Result<Stage> {
        let mut stage = self.store.stages.get(id)?;
        stage
            .resize(width, height)
            .map_err(rejected("resize stage", id))?;
        self.store.stages.update(&stage)?;
        info!(id, width, height, "stage resized");
        Ok(stage)
    }

    pub fn place_substrate(&mut self, stage_id: &str, x: usize, y: usize, substrate_id: &str) -> Result<()> {
        let (mut stage, set) = self.stage_with_set(stage_id)?;
        stage
            .place_substrate(&set, x, y, &SubstrateId::new(substrate_id))
            .map_err(rejected("place substrate", stage_id))?;
        self.store.stages.update(&stage)?;
        debug!(stage = stage_id, x, y, substrate = substrate_id, "substrate placed");
        Ok(())
    }

    pub fn place_mixed_substrate(&mut self, stage_id: &str, x: usize, y: usize, mix_id: &str) -> Result<()> {
        let (mut stage, set) = self.stage_with_set(stage_id)?;
        stage
            .place_mixed_substrate(&set, x, y, &MixedSubstrateId::new(mix_id))
            .map_err(rejected("place mixed substrate", stage_id))?;
        self.store.stages.update(&stage)?;
        debug!(stage = stage_id, x, y, mix = mix_id, "mixed substrate placed");
        Ok(())
    }

    pub fn clear_cell(&mut self, stage_id: &str, x: usize, y: usize) -> Result<()> {
        let mut stage = self.store.stages.get(stage_id)?;
        stage
            .clear_cell(x, y)
            .map_err(rejected("clear cell", stage_id))?;
        self.store.stages.update(&stage)?;
        debug!(stage = stage_id, x, y, "cell cleared");
        Ok(())
    }

    pub fn get_cell(&self, stage_id: &str, x: usize, y: usize) -> Result<Cell> {
        let stage = self.store.stages.get(stage_id)?;
        Ok(stage.get_cell(x, y)?)
    }

    /// The set a stage is bound to.
    pub fn stage_substrate_set(&self, stage_id: &str) -> Result<SubstrateSet> {
        Ok(self.stage_with_set(stage_id)?.1)
    }

    /// Rebind a stage to another stored set. Returns how many cells were reset.
    pub fn change_stage_substrate_set(&mut self, stage_id: &str, set_id: &str) -> Result<usize> {
        let mut stage = self.store.stages.get(stage_id)?;
        let set = self.store.substrate_sets.get(set_id)?;

        let reset = stage
            .change_substrate_set(&set)
            .map_err(rejected("change stage substrate set", stage_id))?;
        self.store.stages.update(&stage)?;
        info!(stage = stage_id, set = set_id, reset, "stage substrate set changed");
        Ok(reset)
    }

    /// Stored stages bound to the set.
    pub(super) fn stages_bound_to(&self, set_id: &SubstrateSetId) -> Result<Vec<Stage>> {
        Ok(self
            .store
            .stages
            .all()?
            .into_iter()
            .filter(|stage| stage.substrate_set_id() == set_id)
            .collect())
    }

    /// Record the re-sync of every stage bound to `set`, where `set` is
    /// the value about to be stored.
    pub(super) fn sync_stages(&self, set: &SubstrateSet, changes: &mut Changes) -> Result<()> {
        for stage in self.stages_bound_to(&set.id)? {
            let mut synced = stage.clone();
            let reset = synced
                .change_substrate_set(set)
                .map_err(rejected("sync stage with set", stage.id.as_str()))?;
            if synced != stage {
                debug!(stage = %stage.id, set = %set.id, reset, "stage synced");
                changes.stage(stage, synced);
            }
        }
        Ok(())
    }

    fn stage_with_set(&self, stage_id: &str) -> Result<(Stage, SubstrateSet)> {
        let stage = self.store.stages.get(stage_id)?;
        let set = self.store.substrate_sets.get(stage.substrate_set_id().as_str())?;
        Ok((stage, set))
    }

    fn cell_policy(&self, set: &SubstrateSet) -> Result<CellPolicy> {
        match self.config.cell_policy {
            CellPolicyConfig::Strict => Ok(CellPolicy::Strict),
            CellPolicyConfig::DefaultFill => {
                let id = self.config.default_substrate.as_deref().ok_or_else(|| {
                    GalateaError::invalid_input("default-fill cell policy needs a default substrate")
                })?;
                let substrate = set.find_substrate(&SubstrateId::new(id)).ok_or_else(|| {
                    GalateaError::invalid_input(format!(
                        "default substrate {} is not in substrate set {}",
                        id, set.id
                    ))
                })?;
                Ok(CellPolicy::DefaultFill {
                    substrate: substrate.clone(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Store;
    use crate::catalog::CatalogConfig;

    fn seed(catalog: &mut Catalog) {
        catalog.create_substrate(Some("sand"), "Sand", "#c2b280").unwrap();
        catalog.create_substrate(Some("peat"), "Peat", "#3b2f2f").unwrap();
        catalog.create_mixed_substrate(Some("seed"), "Seed mix", "#554433").unwrap();
        catalog.add_substrate_to_mix("seed", "sand", 50.0).unwrap();
        catalog.add_substrate_to_mix("seed", "peat", 50.0).unwrap();
        catalog.create_substrate_set(Some("nursery"), "Nursery").unwrap();
        catalog.add_substrate_to_set("nursery", "sand").unwrap();
        catalog.add_substrate_to_set("nursery", "peat").unwrap();
        catalog.add_mixed_substrate_to_set("nursery", "seed").unwrap();
    }

    fn seeded() -> Catalog {
        let mut catalog = Catalog::in_memory();
        seed(&mut catalog);
        catalog
    }

    #[test]
    fn placement_goes_through_the_bound_set() {
        let mut catalog = seeded();
        catalog.create_stage(Some("bench"), "Bench", 3, 2, "nursery").unwrap();

        catalog.place_substrate("bench", 0, 0, "sand").unwrap();
        catalog.place_mixed_substrate("bench", 2, 1, "seed").unwrap();
        assert!(matches!(
            catalog.place_substrate("bench", 0, 0, "peat"),
            Err(GalateaError::Stage(StageError::CellAlreadyHasContent { x: 0, y: 0 }))
        ));
        assert!(matches!(
            catalog.place_substrate("bench", 3, 0, "peat"),
            Err(GalateaError::Stage(StageError::InvalidPosition { x: 3, y: 0 }))
        ));

        assert_eq!(catalog.get_cell("bench", 0, 0).unwrap().substrate().unwrap().name, "Sand");
        assert_eq!(catalog.get_stage("bench").unwrap().occupied_cells(), 2);

        catalog.clear_cell("bench", 0, 0).unwrap();
        assert!(matches!(
            catalog.clear_cell("bench", 0, 0),
            Err(GalateaError::Stage(StageError::CellHasNoContent { .. }))
        ));
    }

    #[test]
    fn removing_a_mix_from_the_set_clears_its_cells() {
        let mut catalog = seeded();
        catalog.create_stage(Some("bench"), "Bench", 2, 2, "nursery").unwrap();
        catalog.place_mixed_substrate("bench", 1, 1, "seed").unwrap();
        catalog.place_substrate("bench", 0, 0, "peat").unwrap();

        catalog.remove_mixed_substrate_from_set("nursery", "seed").unwrap();
        assert!(catalog.get_cell("bench", 1, 1).unwrap().is_empty());
        assert!(!catalog.get_cell("bench", 0, 0).unwrap().is_empty());
    }

    #[test]
    fn renamed_substrate_reaches_stage_cells() {
        let mut catalog = seeded();
        catalog.create_stage(Some("bench"), "Bench", 1, 1, "nursery").unwrap();
        catalog.place_substrate("bench", 0, 0, "sand").unwrap();

        catalog.update_substrate("sand", "River sand", "#e0c9a6").unwrap();
        let cell = catalog.get_cell("bench", 0, 0).unwrap();
        assert_eq!(cell.substrate().unwrap().name, "River sand");
    }

    #[test]
    fn change_set_resets_foreign_cells() {
        let mut catalog = seeded();
        catalog.create_substrate_set(Some("dry"), "Dry").unwrap();
        catalog.add_substrate_to_set("dry", "sand").unwrap();
        catalog.create_stage(Some("bench"), "Bench", 2, 1, "nursery").unwrap();
        catalog.place_substrate("bench", 0, 0, "sand").unwrap();
        catalog.place_substrate("bench", 1, 0, "peat").unwrap();

        assert_eq!(catalog.change_stage_substrate_set("bench", "dry").unwrap(), 1);
        assert_eq!(catalog.stage_substrate_set("bench").unwrap().id.as_str(), "dry");
        assert!(catalog.get_cell("bench", 1, 0).unwrap().is_empty());

        // The old set is free now; the new one is not.
        catalog.delete_substrate_set("nursery").unwrap();
        assert!(matches!(
            catalog.delete_substrate_set("dry"),
            Err(GalateaError::Store(StoreError::InUse { .. }))
        ));
    }

    #[test]
    fn resize_and_update_details() {
        let mut catalog = seeded();
        catalog.create_stage(Some("bench"), "Bench", 3, 3, "nursery").unwrap();
        catalog.place_substrate("bench", 2, 2, "sand").unwrap();

        let stage = catalog.resize_stage("bench", 2, 4).unwrap();
        assert_eq!((stage.width(), stage.height()), (2, 4));
        assert_eq!(stage.occupied_cells(), 0);
        assert!(matches!(
            catalog.resize_stage("bench", 0, 4),
            Err(GalateaError::Stage(StageError::InvalidDimensions { .. }))
        ));

        let stage = catalog.update_stage("bench", "Left bench", "north wall").unwrap();
        assert_eq!(stage.comment, "north wall");
        assert_eq!(catalog.list_stages(1, 10).unwrap().total_count, 1);
        catalog.delete_stage("bench").unwrap();
        assert!(catalog.get_stage("bench").is_err());
    }

    #[test]
    fn default_fill_policy_comes_from_config() {
        let config = CatalogConfig {
            cell_policy: CellPolicyConfig::DefaultFill,
            default_substrate: Some("peat".into()),
        };
        let mut catalog = Catalog::with_config(Store::in_memory(), config);
        seed(&mut catalog);

        catalog.create_stage(Some("bench"), "Bench", 2, 2, "nursery").unwrap();
        assert_eq!(catalog.get_cell("bench", 1, 1).unwrap().substrate().unwrap().name, "Peat");

        catalog.place_substrate("bench", 1, 1, "sand").unwrap();
        catalog.place_substrate("bench", 1, 1, "peat").unwrap();
        catalog.clear_cell("bench", 0, 0).unwrap();

        assert!(matches!(
            catalog.remove_substrate_from_set("nursery", "peat"),
            Err(GalateaError::Set(SetError::SubstrateInUse { .. }))
        ));
        catalog.remove_mixed_substrate_from_set("nursery", "seed").unwrap();
        assert!(matches!(
            catalog.remove_substrate_from_set("nursery", "peat"),
            Err(GalateaError::Store(StoreError::InUse { .. }))
        ));
    }

    #[test]
    fn default_fill_needs_a_member_substrate() {
        let config = CatalogConfig {
            cell_policy: CellPolicyConfig::DefaultFill,
            default_substrate: Some("clay".into()),
        };
        let mut catalog = Catalog::with_config(Store::in_memory(), config);
        seed(&mut catalog);

        assert!(matches!(
            catalog.create_stage(None, "Bench", 2, 2, "nursery"),
            Err(GalateaError::InvalidInput(_))
        ));
    }
}
