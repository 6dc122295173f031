//! File import/export — save and load single aggregates as JSON.
//!
//! Files are pretty-printed so they can be reviewed and edited by hand;
//! loading re-checks the invariants the engine normally enforces
//! incrementally, because a hand-edited file bypasses them.

use galatea_core::prelude::*;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;

/// Save a substrate to a JSON file.
pub fn export_substrate(substrate: &Substrate, path: &Path) -> Result<()> {
    write_json(substrate, path)
}

/// Load a substrate from a JSON file.
pub fn import_substrate(path: &Path) -> Result<Substrate> {
    let substrate: Substrate = read_json(path)?;
    check_identity("substrate", substrate.id.as_str(), &substrate.name)?;
    Ok(substrate)
}

/// Save a mix, components included, to a JSON file.
pub fn export_mixed_substrate(ms: &MixedSubstrate, path: &Path) -> Result<()> {
    write_json(ms, path)
}

/// Load a mix from a JSON file. The mix must validate.
pub fn import_mixed_substrate(path: &Path) -> Result<MixedSubstrate> {
    let ms: MixedSubstrate = read_json(path)?;
    check_identity("mixed substrate", ms.id.as_str(), &ms.name)?;
    for sp in ms.get_substrates() {
        check_identity("substrate", sp.substrate.id.as_str(), &sp.substrate.name)?;
    }
    ms.validate()?;
    Ok(ms)
}

/// Save a set, members included, to a JSON file.
pub fn export_substrate_set(set: &SubstrateSet, path: &Path) -> Result<()> {
    write_json(set, path)
}

/// Load a set from a JSON file. Every member mix must be valid and closed
/// over the set's substrates.
pub fn import_substrate_set(path: &Path) -> Result<SubstrateSet> {
    let set: SubstrateSet = read_json(path)?;
    check_identity("substrate set", set.id.as_str(), &set.name)?;
    set.check_integrity()?;
    Ok(set)
}

fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;

    // Create parent directory if needed
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    std::fs::write(path, json)?;
    Ok(())
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let json = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

fn check_identity(kind: &str, id: &str, name: &str) -> Result<()> {
    if id.trim().is_empty() {
        return Err(GalateaError::invalid_input(format!("{} id must not be empty", kind)));
    }
    if name.trim().is_empty() {
        return Err(GalateaError::invalid_input(format!("{} {} has an empty name", kind, id)));
    }
    Ok(())
}
