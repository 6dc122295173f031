//! Writes that span several aggregates.
//!
//! Operations that propagate into mixes, sets and stages first compute
//! every new value in memory, then hand the whole batch to
//! [`Catalog::apply`]. The batch lands completely or not at all: SQLite
//! rolls back its transaction, the in-memory backend gets the replaced
//! values written back.

use super::Catalog;
use crate::backend::DynRepository;
use crate::repository::Entity;
use galatea_core::prelude::{GalateaError, MixedSubstrate, Stage, StoreError, Substrate, SubstrateSet};
use tracing::{debug, warn};

/// Aggregates changed by one catalog call, each paired with the stored
/// value it replaces. Unchanged values are not recorded.
#[derive(Debug, Default)]
pub(super) struct Changes {
    substrates: Vec<(Substrate, Substrate)>,
    mixes: Vec<(MixedSubstrate, MixedSubstrate)>,
    sets: Vec<(SubstrateSet, SubstrateSet)>,
    stages: Vec<(Stage, Stage)>,
}

impl Changes {
    pub fn substrate(&mut self, before: Substrate, after: Substrate) {
        record(&mut self.substrates, before, after);
    }

    pub fn mix(&mut self, before: MixedSubstrate, after: MixedSubstrate) {
        record(&mut self.mixes, before, after);
    }

    pub fn set(&mut self, before: SubstrateSet, after: SubstrateSet) {
        record(&mut self.sets, before, after);
    }

    pub fn stage(&mut self, before: Stage, after: Stage) {
        record(&mut self.stages, before, after);
    }

    pub fn len(&self) -> usize {
        self.substrates.len() + self.mixes.len() + self.sets.len() + self.stages.len()
    }
}

fn record<T: PartialEq>(list: &mut Vec<(T, T)>, before: T, after: T) {
    if before != after {
        list.push((before, after));
    }
}

/// How many records of each kind reached the store.
#[derive(Debug, Default)]
struct Written {
    substrates: usize,
    mixes: usize,
    sets: usize,
    stages: usize,
}

impl Catalog {
    /// Persist every change in `changes`, or none of them.
    pub(super) fn apply(&mut self, changes: &Changes) -> Result<(), GalateaError> {
        self.store.begin()?;

        let mut written = Written::default();
        let outcome = self
            .write_changes(changes, &mut written)
            .and_then(|()| self.store.commit());

        match outcome {
            Ok(()) => {
                debug!(records = changes.len(), "changes applied");
                Ok(())
            }
            Err(e) => {
                warn!(records = changes.len(), error = %e, "changes rolled back");
                self.undo(changes, &written);
                Err(e.into())
            }
        }
    }

    fn write_changes(&mut self, changes: &Changes, written: &mut Written) -> Result<(), StoreError> {
        write_all(&mut self.store.substrates, &changes.substrates, &mut written.substrates)?;
        write_all(&mut self.store.mixed_substrates, &changes.mixes, &mut written.mixes)?;
        write_all(&mut self.store.substrate_sets, &changes.sets, &mut written.sets)?;
        write_all(&mut self.store.stages, &changes.stages, &mut written.stages)
    }

    fn undo(&mut self, changes: &Changes, written: &Written) {
        if self.store.is_transactional() {
            if let Err(e) = self.store.rollback() {
                warn!(error = %e, "rollback failed");
            }
            return;
        }

        restore(&mut self.store.stages, &changes.stages[..written.stages]);
        restore(&mut self.store.substrate_sets, &changes.sets[..written.sets]);
        restore(&mut self.store.mixed_substrates, &changes.mixes[..written.mixes]);
        restore(&mut self.store.substrates, &changes.substrates[..written.substrates]);
    }
}

fn write_all<T: Entity>(
    repo: &mut DynRepository<T>,
    changes: &[(T, T)],
    written: &mut usize,
) -> Result<(), StoreError> {
    for (_, after) in changes {
        repo.update(after)?;
        *written += 1;
    }
    Ok(())
}

fn restore<T: Entity>(repo: &mut DynRepository<T>, changes: &[(T, T)]) {
    for (before, _) in changes.iter().rev() {
        if let Err(e) = repo.update(before) {
            warn!(kind = T::KIND, id = before.key(), error = %e, "restore failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::Store;
    use crate::memory::MemoryRepository;
    use crate::repository::Repository;
    use galatea_core::prelude::{CellPolicy, MixedSubstrateId, PageRequest, SubstrateId};

    /// Stores new records but fails every update, like a full disk.
    struct DiskFull<T>(MemoryRepository<T>);

    impl<T: Entity> Repository<T> for DiskFull<T> {
        fn create(&mut self, item: &T) -> Result<(), StoreError> {
            self.0.create(item)
        }

        fn get(&self, id: &str) -> Result<T, StoreError> {
            self.0.get(id)
        }

        fn update(&mut self, _item: &T) -> Result<(), StoreError> {
            Err(StoreError::Backend("disk full".to_string()))
        }

        fn delete(&mut self, id: &str) -> Result<(), StoreError> {
            self.0.delete(id)
        }

        fn list(&self, request: PageRequest) -> Result<(Vec<T>, usize), StoreError> {
            self.0.list(request)
        }

        fn exists(&self, id: &str) -> Result<bool, StoreError> {
            self.0.exists(id)
        }

        fn all(&self) -> Result<Vec<T>, StoreError> {
            self.0.all()
        }
    }

    fn sand() -> Substrate {
        Substrate::new("sand", "Sand", "#c2b280")
    }

    fn peat() -> Substrate {
        Substrate::new("peat", "Peat", "#3b2f2f")
    }

    fn seed_mix() -> MixedSubstrate {
        let mut mix = MixedSubstrate::new("seed", "Seed mix", "#554433");
        mix.add_substrate(sand(), 25.0).unwrap();
        mix.add_substrate(peat(), 75.0).unwrap();
        mix
    }

    fn nursery() -> SubstrateSet {
        let mut set = SubstrateSet::new("nursery", "Nursery");
        set.add_substrate(sand()).unwrap();
        set.add_substrate(peat()).unwrap();
        set.add_mixed_substrate(seed_mix()).unwrap();
        set
    }

    fn seeded(mut store: Store) -> Catalog {
        store.substrates.create(&sand()).unwrap();
        store.substrates.create(&peat()).unwrap();
        store.mixed_substrates.create(&seed_mix()).unwrap();
        store.substrate_sets.create(&nursery()).unwrap();
        Catalog::new(store)
    }

    fn failing_sets() -> Catalog {
        let mut store = Store::in_memory();
        store.substrate_sets = Box::new(DiskFull(MemoryRepository::new()));
        seeded(store)
    }

    fn failing_stages() -> Catalog {
        let mut store = Store::in_memory();
        store.stages = Box::new(DiskFull(MemoryRepository::new()));
        let mut catalog = seeded(store);

        let set = nursery();
        let mut stage = Stage::new("bench", "Bench", 2, 2, &set, CellPolicy::Strict).unwrap();
        stage.place_mixed_substrate(&set, 1, 1, &MixedSubstrateId::new("seed")).unwrap();
        catalog.store.stages.create(&stage).unwrap();
        catalog
    }

    fn is_disk_full<T>(result: Result<T, GalateaError>) -> bool {
        matches!(result, Err(GalateaError::Store(StoreError::Backend(msg))) if msg == "disk full")
    }

    #[test]
    fn failed_substrate_update_changes_nothing() {
        let mut catalog = failing_sets();

        assert!(is_disk_full(catalog.update_substrate("sand", "River sand", "#d2b48c")));

        assert_eq!(catalog.get_substrate("sand").unwrap(), sand());
        assert_eq!(catalog.get_mixed_substrate("seed").unwrap(), seed_mix());
        let set = catalog.get_substrate_set("nursery").unwrap();
        assert_eq!(set.find_substrate(&SubstrateId::new("sand")).unwrap().name, "Sand");
    }

    #[test]
    fn failed_mix_update_changes_nothing() {
        let mut catalog = failing_sets();

        assert!(is_disk_full(catalog.update_mixed_substrate("seed", "Seedling mix", "#665544")));
        assert_eq!(catalog.get_mixed_substrate("seed").unwrap().name, "Seed mix");
    }

    #[test]
    fn failed_stage_sync_keeps_the_set() {
        let mut catalog = failing_stages();

        assert!(is_disk_full(catalog.remove_mixed_substrate_from_set("nursery", "seed")));
        assert_eq!(catalog.get_substrate_set("nursery").unwrap(), nursery());

        assert!(is_disk_full(catalog.update_substrate("peat", "Sphagnum peat", "#2f2520")));
        assert_eq!(catalog.get_substrate("peat").unwrap(), peat());
        assert_eq!(catalog.get_mixed_substrate("seed").unwrap(), seed_mix());
        assert_eq!(catalog.get_substrate_set("nursery").unwrap(), nursery());
    }

    #[test]
    fn unchanged_values_are_not_recorded() {
        let mut changes = Changes::default();
        changes.substrate(sand(), sand());
        changes.set(nursery(), SubstrateSet::new("nursery", "Greenhouse"));
        assert_eq!(changes.len(), 1);
    }
}
