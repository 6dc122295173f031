//! Storing aggregates that were loaded from files.

use super::{rejected, Catalog};
use galatea_core::prelude::*;
use tracing::info;

impl Catalog {
    pub fn import_substrate(&mut self, substrate: Substrate) -> Result<Substrate> {
        self.store.substrates.create(&substrate)?;
        info!(id = %substrate.id, "substrate imported");
        Ok(substrate)
    }

    /// Store an imported mix. Its components must already be stored; their
    /// copies in the mix take the stored names and colors.
    pub fn import_mixed_substrate(&mut self, mut ms: MixedSubstrate) -> Result<MixedSubstrate> {
        ms.validate()?;
        let ids: Vec<SubstrateId> = ms.substrate_ids().cloned().collect();
        for id in ids {
            let stored = self.store.substrates.get(id.as_str())?;
            ms.refresh_substrate(&stored);
        }

        self.store.mixed_substrates.create(&ms)?;
        info!(id = %ms.id, components = ms.len(), "mixed substrate imported");
        Ok(ms)
    }

    /// Store an imported set. Every member must already be stored, and the
    /// set's copies are refreshed from the stored records.
    ///
    /// Member mixes keep the composition from the file; only their names
    /// and colors come from the stored mix.
    pub fn import_substrate_set(&mut self, mut set: SubstrateSet) -> Result<SubstrateSet> {
        set.check_integrity()?;
        for substrate in set.get_substrates() {
            let stored = self.store.substrates.get(substrate.id.as_str())?;
            set.update_substrate(stored)
                .map_err(rejected("refresh imported set", set.id.as_str()))?;
        }
        for mut ms in set.get_mixed_substrates() {
            let stored = self.store.mixed_substrates.get(ms.id.as_str())?;
            ms.name = stored.name;
            ms.color = stored.color;
            set.update_mixed_substrate(ms)
                .map_err(rejected("refresh imported set", set.id.as_str()))?;
        }

        self.store.substrate_sets.create(&set)?;
        info!(
            id = %set.id,
            substrates = set.substrate_count(),
            mixes = set.mixed_substrate_count(),
            "substrate set imported"
        );
        Ok(set)
    }
}
