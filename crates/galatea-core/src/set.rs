//! Substrate sets — the referential-integrity boundary.
//!
//! A set owns substrates and mixed substrates that are used together.
//! Two rules bind them:
//!
//! - **Closure**: every substrate referenced by a member mix is itself a
//!   member of the set.
//! - **Usage**: a substrate cannot leave the set while a member mix still
//!   references it.
//!
//! Mixes hold denormalized copies of their component substrates for
//! display; [`SubstrateSet::update_substrate`] keeps those copies in sync
//! with the canonical record.

use crate::error::SetError;
use crate::mixed::MixedSubstrate;
use crate::substrate::Substrate;
use crate::types::{MixedSubstrateId, SubstrateId, SubstrateSetId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A named collection of substrates and mixes usable together.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubstrateSet {
    pub id: SubstrateSetId,
    pub name: String,
    #[serde(default)]
    substrates: Vec<Substrate>,
    #[serde(default)]
    mixed_substrates: Vec<MixedSubstrate>,
}

impl SubstrateSet {
    /// Create an empty set.
    pub fn new(id: impl Into<SubstrateSetId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            substrates: Vec::new(),
            mixed_substrates: Vec::new(),
        }
    }

    pub fn rename(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    // --- Lookups ---

    pub fn find_substrate_index(&self, id: &SubstrateId) -> Option<usize> {
        self.substrates.iter().position(|s| &s.id == id)
    }

    pub fn find_mixed_substrate_index(&self, id: &MixedSubstrateId) -> Option<usize> {
        self.mixed_substrates.iter().position(|ms| &ms.id == id)
    }

    pub fn contains_substrate(&self, id: &SubstrateId) -> bool {
        self.find_substrate_index(id).is_some()
    }

    pub fn contains_mixed_substrate(&self, id: &MixedSubstrateId) -> bool {
        self.find_mixed_substrate_index(id).is_some()
    }

    pub fn find_substrate(&self, id: &SubstrateId) -> Option<&Substrate> {
        self.substrates.iter().find(|s| &s.id == id)
    }

    pub fn find_mixed_substrate(&self, id: &MixedSubstrateId) -> Option<&MixedSubstrate> {
        self.mixed_substrates.iter().find(|ms| &ms.id == id)
    }

    /// Whether any member mix lists the substrate as a component.
    pub fn is_substrate_in_use(&self, id: &SubstrateId) -> bool {
        self.mixed_substrates.iter().any(|ms| ms.contains_substrate(id))
    }

    /// Ids of the member mixes that list the substrate as a component.
    pub fn mixes_using(&self, id: &SubstrateId) -> Vec<MixedSubstrateId> {
        self.mixed_substrates
            .iter()
            .filter(|ms| ms.contains_substrate(id))
            .map(|ms| ms.id.clone())
            .collect()
    }

    pub fn substrate_count(&self) -> usize {
        self.substrates.len()
    }

    pub fn mixed_substrate_count(&self) -> usize {
        self.mixed_substrates.len()
    }

    // --- Substrates ---

    pub fn add_substrate(&mut self, substrate: Substrate) -> Result<(), SetError> {
        if self.contains_substrate(&substrate.id) {
            return Err(SetError::SubstrateExistsInSet(substrate.id.0));
        }
        self.substrates.push(substrate);
        Ok(())
    }

    /// Remove a substrate that no member mix references.
    ///
    /// Removal swaps with the last element; member order is not preserved.
    pub fn remove_substrate(&mut self, id: &SubstrateId) -> Result<(), SetError> {
        let index = self
            .find_substrate_index(id)
            .ok_or_else(|| SetError::SubstrateNotFoundInSet(id.0.clone()))?;

        if let Some(user) = self.mixed_substrates.iter().find(|ms| ms.contains_substrate(id)) {
            return Err(SetError::SubstrateInUse {
                substrate: id.0.clone(),
                mix: user.id.0.clone(),
            });
        }

        self.substrates.swap_remove(index);
        Ok(())
    }

    /// Replace a member substrate and propagate its attributes into every
    /// member mix that references it. Percentages are untouched.
    pub fn update_substrate(&mut self, substrate: Substrate) -> Result<(), SetError> {
        let index = self
            .find_substrate_index(&substrate.id)
            .ok_or_else(|| SetError::SubstrateNotFoundInSet(substrate.id.0.clone()))?;

        for ms in &mut self.mixed_substrates {
            ms.refresh_substrate(&substrate);
        }
        self.substrates[index] = substrate;
        Ok(())
    }

    // --- Mixed substrates ---

    /// Check a mix against its own percentage rule and against set closure.
    pub fn validate_mixed_substrate(&self, ms: &MixedSubstrate) -> Result<(), SetError> {
        if ms.validate().is_err() {
            return Err(SetError::MixedSubstrateInvalid(ms.id.0.clone()));
        }

        let unknown: Vec<String> = ms
            .substrate_ids()
            .filter(|id| !self.contains_substrate(id))
            .map(|id| id.0.clone())
            .collect();
        if !unknown.is_empty() {
            return Err(SetError::MixedSubstrateContainsUnknownSubstrates {
                mix: ms.id.0.clone(),
                unknown,
            });
        }

        Ok(())
    }

    pub fn add_mixed_substrate(&mut self, ms: MixedSubstrate) -> Result<(), SetError> {
        if self.contains_mixed_substrate(&ms.id) {
            return Err(SetError::MixedSubstrateExistsInSet(ms.id.0));
        }
        self.validate_mixed_substrate(&ms)?;
        self.mixed_substrates.push(ms);
        Ok(())
    }

    /// Remove a member mix.
    ///
    /// Stages only hold a weak relation to the set, so no stage usage is
    /// checked here. Removal swaps with the last element.
    pub fn remove_mixed_substrate(&mut self, id: &MixedSubstrateId) -> Result<(), SetError> {
        let index = self
            .find_mixed_substrate_index(id)
            .ok_or_else(|| SetError::MixedSubstrateNotFoundInSet(id.0.clone()))?;
        self.mixed_substrates.swap_remove(index);
        Ok(())
    }

    /// Replace a member mix after validating the new value.
    pub fn update_mixed_substrate(&mut self, ms: MixedSubstrate) -> Result<(), SetError> {
        let index = self
            .find_mixed_substrate_index(&ms.id)
            .ok_or_else(|| SetError::MixedSubstrateNotFoundInSet(ms.id.0.clone()))?;
        self.validate_mixed_substrate(&ms)?;
        self.mixed_substrates[index] = ms;
        Ok(())
    }

    // --- Snapshots ---

    /// A copy of the member substrates.
    pub fn get_substrates(&self) -> Vec<Substrate> {
        self.substrates.clone()
    }

    /// A copy of the member mixes.
    pub fn get_mixed_substrates(&self) -> Vec<MixedSubstrate> {
        self.mixed_substrates.clone()
    }

    /// Re-check every rule over the whole aggregate.
    ///
    /// Incremental operations keep the set consistent on their own; this is
    /// for values that arrive from outside, such as an imported file.
    pub fn check_integrity(&self) -> Result<(), SetError> {
        let mut seen = HashSet::new();
        for s in &self.substrates {
            if !seen.insert(&s.id) {
                return Err(SetError::SubstrateExistsInSet(s.id.0.clone()));
            }
        }

        let mut seen = HashSet::new();
        for ms in &self.mixed_substrates {
            if !seen.insert(&ms.id) {
                return Err(SetError::MixedSubstrateExistsInSet(ms.id.0.clone()));
            }
            self.validate_mixed_substrate(ms)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sand() -> Substrate {
        Substrate::new("sand", "Sand", "#c2b280")
    }

    fn perlite() -> Substrate {
        Substrate::new("perlite", "Perlite", "#f5f5f5")
    }

    fn potting_mix() -> MixedSubstrate {
        let mut ms = MixedSubstrate::new("potting", "Potting mix", "#6b4f3a");
        ms.add_substrate(sand(), 60.0).unwrap();
        ms.add_substrate(perlite(), 40.0).unwrap();
        ms
    }

    fn nursery() -> SubstrateSet {
        let mut set = SubstrateSet::new("nursery", "Nursery");
        set.add_substrate(sand()).unwrap();
        set.add_substrate(perlite()).unwrap();
        set
    }

    #[test]
    fn duplicate_substrate_is_rejected() {
        let mut set = nursery();
        assert_eq!(
            set.add_substrate(sand()),
            Err(SetError::SubstrateExistsInSet("sand".into()))
        );
        assert_eq!(set.substrate_count(), 2);
    }

    #[test]
    fn add_then_remove_restores_member_counts() {
        let mut set = nursery();
        let peat = Substrate::new("peat", "Peat", "#3b2f2f");

        set.add_substrate(peat.clone()).unwrap();
        assert_eq!(set.substrate_count(), 3);
        set.remove_substrate(&peat.id).unwrap();
        assert_eq!(set.substrate_count(), 2);

        set.add_mixed_substrate(potting_mix()).unwrap();
        set.remove_mixed_substrate(&MixedSubstrateId::new("potting")).unwrap();
        assert_eq!(set.mixed_substrate_count(), 0);
        assert_eq!(set, nursery());
    }

    #[test]
    fn mix_with_unknown_substrate_is_rejected() {
        let mut set = SubstrateSet::new("nursery", "Nursery");
        set.add_substrate(sand()).unwrap();

        let err = set.add_mixed_substrate(potting_mix()).unwrap_err();
        assert_eq!(
            err,
            SetError::MixedSubstrateContainsUnknownSubstrates {
                mix: "potting".into(),
                unknown: vec!["perlite".into()],
            }
        );
        assert_eq!(set.mixed_substrate_count(), 0);
    }

    #[test]
    fn incomplete_mix_is_rejected() {
        let mut set = nursery();
        let mut partial = MixedSubstrate::new("partial", "Partial", "#000");
        partial.add_substrate(sand(), 30.0).unwrap();
        assert_eq!(
            set.add_mixed_substrate(partial),
            Err(SetError::MixedSubstrateInvalid("partial".into()))
        );
    }

    #[test]
    fn duplicate_mix_is_rejected_before_validation() {
        let mut set = nursery();
        set.add_mixed_substrate(potting_mix()).unwrap();
        assert_eq!(
            set.add_mixed_substrate(potting_mix()),
            Err(SetError::MixedSubstrateExistsInSet("potting".into()))
        );
    }

    #[test]
    fn substrate_in_use_cannot_be_removed_until_mix_is_gone() {
        let mut set = nursery();
        set.add_mixed_substrate(potting_mix()).unwrap();

        assert!(set.is_substrate_in_use(&sand().id));
        assert_eq!(
            set.remove_substrate(&sand().id),
            Err(SetError::SubstrateInUse {
                substrate: "sand".into(),
                mix: "potting".into(),
            })
        );

        set.remove_mixed_substrate(&"potting".into()).unwrap();
        set.remove_substrate(&sand().id).unwrap();
        assert!(!set.contains_substrate(&sand().id));
    }

    #[test]
    fn removing_missing_members_fails() {
        let mut set = nursery();
        assert_eq!(
            set.remove_substrate(&"clay".into()),
            Err(SetError::SubstrateNotFoundInSet("clay".into()))
        );
        assert_eq!(
            set.remove_mixed_substrate(&"potting".into()),
            Err(SetError::MixedSubstrateNotFoundInSet("potting".into()))
        );
    }

    #[test]
    fn update_substrate_propagates_into_mixes() {
        let mut set = nursery();
        set.add_mixed_substrate(potting_mix()).unwrap();

        set.update_substrate(Substrate::new("sand", "Washed sand", "#eeeeee"))
            .unwrap();

        assert_eq!(set.find_substrate(&sand().id).unwrap().name, "Washed sand");
        let mix = set.find_mixed_substrate(&"potting".into()).unwrap();
        let parts = mix.get_substrates();
        let sand_part = parts.iter().find(|sp| sp.substrate.id == sand().id).unwrap();
        assert_eq!(sand_part.substrate.color, "#eeeeee");
        assert_eq!(sand_part.percentage, 60.0);

        assert_eq!(
            set.update_substrate(Substrate::new("clay", "Clay", "#a00")),
            Err(SetError::SubstrateNotFoundInSet("clay".into()))
        );
    }

    #[test]
    fn update_mixed_substrate_validates_new_value() {
        let mut set = nursery();
        set.add_mixed_substrate(potting_mix()).unwrap();

        let mut changed = potting_mix();
        changed.update_percentage(&sand().id, 50.0).unwrap();
        assert_eq!(
            set.update_mixed_substrate(changed.clone()),
            Err(SetError::MixedSubstrateInvalid("potting".into()))
        );

        changed.update_percentage(&perlite().id, 50.0).unwrap();
        set.update_mixed_substrate(changed).unwrap();
        let stored = set.find_mixed_substrate(&"potting".into()).unwrap();
        assert_eq!(stored.get_substrates()[0].percentage, 50.0);

        let stranger = MixedSubstrate::new("other", "Other", "#fff");
        assert_eq!(
            set.update_mixed_substrate(stranger),
            Err(SetError::MixedSubstrateNotFoundInSet("other".into()))
        );
    }

    #[test]
    fn closure_holds_for_every_member_mix() {
        let mut set = nursery();
        set.add_mixed_substrate(potting_mix()).unwrap();
        for ms in set.get_mixed_substrates() {
            for sp in ms.get_substrates() {
                assert!(set.contains_substrate(&sp.substrate.id));
            }
        }
        assert!(set.check_integrity().is_ok());
    }

    #[test]
    fn snapshots_do_not_alias() {
        let mut set = nursery();
        let first = set.get_substrates();
        let mut second = set.get_substrates();
        assert_eq!(first, second);

        second.clear();
        assert_eq!(set.substrate_count(), 2);

        set.add_substrate(Substrate::new("peat", "Peat", "#333")).unwrap();
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn integrity_check_catches_broken_imports() {
        let json = r##"{
            "id": "imported", "name": "Imported",
            "substrates": [{"id": "sand", "name": "Sand", "color": "#fff"}],
            "mixed_substrates": [{
                "id": "m", "name": "M", "color": "#000",
                "substrates": [
                    {"substrate": {"id": "sand", "name": "Sand", "color": "#fff"}, "percentage": 50.0},
                    {"substrate": {"id": "bark", "name": "Bark", "color": "#420"}, "percentage": 50.0}
                ]
            }]
        }"##;
        let set: SubstrateSet = serde_json::from_str(json).unwrap();
        assert!(matches!(
            set.check_integrity(),
            Err(SetError::MixedSubstrateContainsUnknownSubstrates { .. })
        ));
    }
}
