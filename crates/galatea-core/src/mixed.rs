//! Mixed substrates — percentage-weighted blends of substrates.
//!
//! A mix is built incrementally. Every `add`/`update` rejects
//! over-allocation eagerly, while an under-allocated (or empty) mix is
//! tolerated until [`MixedSubstrate::validate`] gates its use, for example
//! before it joins a substrate set.

use crate::error::MixError;
use crate::substrate::Substrate;
use crate::types::{MixedSubstrateId, SubstrateId};
use serde::{Deserialize, Serialize};

/// Upper bound for the sum of component percentages.
pub const MAX_PERCENTAGE: f64 = 100.0;

/// Tolerance used for every percentage comparison.
pub const PERCENTAGE_EPSILON: f64 = 1e-4;

/// A substrate together with its share of a mix.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubstratePercentage {
    pub substrate: Substrate,
    /// Share of the mix, in `(0, 100]`.
    pub percentage: f64,
}

/// A blend of substrates whose shares sum to 100%.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixedSubstrate {
    pub id: MixedSubstrateId,
    pub name: String,
    pub color: String,
    #[serde(default)]
    substrates: Vec<SubstratePercentage>,
}

impl MixedSubstrate {
    /// Create an empty mix.
    pub fn new(
        id: impl Into<MixedSubstrateId>,
        name: impl Into<String>,
        color: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: color.into(),
            substrates: Vec::new(),
        }
    }

    /// Sum of the current component percentages (0 for an empty mix).
    pub fn total_percentage(&self) -> f64 {
        self.substrates.iter().map(|sp| sp.percentage).sum()
    }

    /// Share still unallocated.
    pub fn remaining_percentage(&self) -> f64 {
        (MAX_PERCENTAGE - self.total_percentage()).max(0.0)
    }

    /// Position of a component, looked up by substrate id only.
    pub fn find_index(&self, substrate_id: &SubstrateId) -> Option<usize> {
        self.substrates
            .iter()
            .position(|sp| &sp.substrate.id == substrate_id)
    }

    pub fn contains_substrate(&self, substrate_id: &SubstrateId) -> bool {
        self.find_index(substrate_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.substrates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.substrates.is_empty()
    }

    /// Ids of all component substrates, in component order.
    pub fn substrate_ids(&self) -> impl Iterator<Item = &SubstrateId> + '_ {
        self.substrates.iter().map(|sp| &sp.substrate.id)
    }

    /// Append a component.
    ///
    /// Fails when the percentage is not positive, when the substrate is
    /// already present, or when the new total would exceed 100%.
    pub fn add_substrate(&mut self, substrate: Substrate, percentage: f64) -> Result<(), MixError> {
        check_positive(percentage)?;

        if self.contains_substrate(&substrate.id) {
            return Err(MixError::SubstrateExists(substrate.id.0));
        }

        let attempted = self.total_percentage() + percentage;
        if exceeds_max(attempted) {
            return Err(MixError::ExceedsMaxPercentage { attempted });
        }

        self.substrates.push(SubstratePercentage {
            substrate,
            percentage,
        });
        Ok(())
    }

    /// Remove a component.
    ///
    /// Uses `swap_remove`, so the order of the remaining components is not
    /// preserved. Switch to `Vec::remove` if a caller ever needs stable order.
    pub fn remove_substrate(&mut self, substrate_id: &SubstrateId) -> Result<(), MixError> {
        let index = self
            .find_index(substrate_id)
            .ok_or_else(|| MixError::SubstrateNotFound(substrate_id.0.clone()))?;
        self.substrates.swap_remove(index);
        Ok(())
    }

    /// Change the share of an existing component.
    pub fn update_percentage(
        &mut self,
        substrate_id: &SubstrateId,
        new_percentage: f64,
    ) -> Result<(), MixError> {
        check_positive(new_percentage)?;

        let index = self
            .find_index(substrate_id)
            .ok_or_else(|| MixError::SubstrateNotFound(substrate_id.0.clone()))?;

        let current = self.substrates[index].percentage;
        let attempted = self.total_percentage() - current + new_percentage;
        if exceeds_max(attempted) {
            return Err(MixError::ExceedsMaxPercentage { attempted });
        }

        self.substrates[index].percentage = new_percentage;
        Ok(())
    }

    /// Replace the display attributes of a component substrate, keeping its share.
    ///
    /// Returns whether the substrate was a component.
    pub fn refresh_substrate(&mut self, substrate: &Substrate) -> bool {
        match self.find_index(&substrate.id) {
            Some(index) => {
                self.substrates[index].substrate = substrate.clone();
                true
            }
            None => false,
        }
    }

    /// Check that the mix is usable: empty, or totalling exactly 100%.
    pub fn validate(&self) -> Result<(), MixError> {
        if self.substrates.is_empty() {
            return Ok(());
        }

        let total = self.total_percentage();
        if (total - MAX_PERCENTAGE).abs() > PERCENTAGE_EPSILON {
            return Err(MixError::InvalidPercentage(total));
        }

        // Deserialized mixes bypass the incremental checks.
        if let Some(sp) = self.substrates.iter().find(|sp| !(sp.percentage > 0.0)) {
            return Err(MixError::InvalidPercentage(sp.percentage));
        }
        for (i, sp) in self.substrates.iter().enumerate() {
            if self.substrates[..i]
                .iter()
                .any(|earlier| earlier.substrate.id == sp.substrate.id)
            {
                return Err(MixError::SubstrateExists(sp.substrate.id.0.clone()));
            }
        }

        Ok(())
    }

    /// A copy of the components; changes to it never reach the mix.
    pub fn get_substrates(&self) -> Vec<SubstratePercentage> {
        self.substrates.clone()
    }
}

fn check_positive(percentage: f64) -> Result<(), MixError> {
    // Written this way round so NaN is rejected too.
    if !(percentage > 0.0) {
        return Err(MixError::InvalidPercentage(percentage));
    }
    Ok(())
}

fn exceeds_max(total: f64) -> bool {
    total > MAX_PERCENTAGE + PERCENTAGE_EPSILON
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

    fn peat() -> Substrate {
        Substrate::new("peat", "Peat", "#3b2f2f")
    }

    fn mix() -> MixedSubstrate {
        MixedSubstrate::new("potting", "Potting mix", "#6b4f3a")
    }

    #[test]
    fn empty_mix_has_zero_total_and_is_valid() {
        let m = mix();
        assert_eq!(m.total_percentage(), 0.0);
        assert!(m.is_empty());
        assert!(m.validate().is_ok());
    }

    #[test]
    fn over_allocation_is_rejected_eagerly() {
        let mut m = mix();
        m.add_substrate(sand(), 60.0).unwrap();
        let err = m.add_substrate(perlite(), 50.0).unwrap_err();
        assert!(matches!(err, MixError::ExceedsMaxPercentage { attempted } if (attempted - 110.0).abs() < 1e-9));
        assert_eq!(m.len(), 1);
    }

    #[test]
    fn complete_mix_validates() {
        let mut m = mix();
        m.add_substrate(sand(), 60.0).unwrap();
        m.add_substrate(perlite(), 40.0).unwrap();
        assert!(m.validate().is_ok());
        assert!((m.total_percentage() - 100.0).abs() <= PERCENTAGE_EPSILON);
    }

    #[test]
    fn partial_mix_fails_validation() {
        let mut m = mix();
        m.add_substrate(sand(), 60.0).unwrap();
        assert_eq!(m.validate(), Err(MixError::InvalidPercentage(60.0)));
        assert!((m.remaining_percentage() - 40.0).abs() < 1e-9);
    }

    #[test]
    fn thirds_validate_within_epsilon() {
        let mut m = mix();
        m.add_substrate(sand(), 33.33333).unwrap();
        m.add_substrate(perlite(), 33.33333).unwrap();
        m.add_substrate(peat(), 33.33334).unwrap();
        assert!(m.validate().is_ok());
    }

    #[test]
    fn non_positive_and_nan_percentages_are_rejected() {
        let mut m = mix();
        assert!(matches!(m.add_substrate(sand(), 0.0), Err(MixError::InvalidPercentage(_))));
        assert!(matches!(m.add_substrate(sand(), -5.0), Err(MixError::InvalidPercentage(_))));
        assert!(matches!(m.add_substrate(sand(), f64::NAN), Err(MixError::InvalidPercentage(_))));
        assert!(m.is_empty());
    }

    #[test]
    fn duplicate_substrate_is_rejected_by_id() {
        let mut m = mix();
        m.add_substrate(sand(), 30.0).unwrap();
        let renamed = Substrate::new("sand", "River sand", "#ffffff");
        assert_eq!(
            m.add_substrate(renamed, 10.0),
            Err(MixError::SubstrateExists("sand".into()))
        );
    }

    #[test]
    fn add_then_remove_restores_membership_count() {
        let mut m = mix();
        m.add_substrate(sand(), 50.0).unwrap();
        let before = m.len();
        m.add_substrate(perlite(), 20.0).unwrap();
        m.remove_substrate(&perlite().id).unwrap();
        assert_eq!(m.len(), before);
        assert!(!m.contains_substrate(&perlite().id));
    }

    #[test]
    fn removing_missing_substrate_fails() {
        let mut m = mix();
        assert_eq!(
            m.remove_substrate(&sand().id),
            Err(MixError::SubstrateNotFound("sand".into()))
        );
    }

    #[test]
    fn update_percentage_accounts_for_old_share() {
        let mut m = mix();
        m.add_substrate(sand(), 60.0).unwrap();
        m.add_substrate(perlite(), 40.0).unwrap();

        // 100 - 60 + 70 = 110
        assert!(matches!(
            m.update_percentage(&sand().id, 70.0),
            Err(MixError::ExceedsMaxPercentage { .. })
        ));
        m.update_percentage(&sand().id, 50.0).unwrap();
        assert!((m.total_percentage() - 90.0).abs() < 1e-9);

        assert_eq!(
            m.update_percentage(&peat().id, 10.0),
            Err(MixError::SubstrateNotFound("peat".into()))
        );
        assert!(matches!(
            m.update_percentage(&sand().id, 0.0),
            Err(MixError::InvalidPercentage(_))
        ));
    }

    #[test]
    fn get_substrates_is_a_detached_copy() {
        let mut m = mix();
        m.add_substrate(sand(), 100.0).unwrap();

        let mut copy = m.get_substrates();
        assert_eq!(copy, m.get_substrates());
        copy[0].percentage = 1.0;
        copy.clear();

        assert_eq!(m.len(), 1);
        assert_eq!(m.get_substrates()[0].percentage, 100.0);
    }

    #[test]
    fn refresh_substrate_keeps_percentage() {
        let mut m = mix();
        m.add_substrate(sand(), 100.0).unwrap();
        assert!(m.refresh_substrate(&Substrate::new("sand", "Washed sand", "#ddd")));
        let parts = m.get_substrates();
        assert_eq!(parts[0].substrate.name, "Washed sand");
        assert_eq!(parts[0].percentage, 100.0);
        assert!(!m.refresh_substrate(&peat()));
    }

    #[test]
    fn deserialized_duplicates_fail_validation() {
        let json = r##"{
            "id": "bad", "name": "Bad", "color": "#000",
            "substrates": [
                {"substrate": {"id": "sand", "name": "Sand", "color": "#fff"}, "percentage": 50.0},
                {"substrate": {"id": "sand", "name": "Sand", "color": "#fff"}, "percentage": 50.0}
            ]
        }"##;
        let m: MixedSubstrate = serde_json::from_str(json).unwrap();
        assert_eq!(m.validate(), Err(MixError::SubstrateExists("sand".into())));
    }
}
