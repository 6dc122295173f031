//! Substrate — a single named growing medium.

use crate::types::SubstrateId;
use serde::{Deserialize, Serialize};

/// A growing medium such as sand or peat.
///
/// Identity is the `id`; `name` and `color` are display attributes that
/// can change without affecting membership anywhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Substrate {
    pub id: SubstrateId,
    pub name: String,
    pub color: String,
}

impl Substrate {
    pub fn new(id: impl Into<SubstrateId>, name: impl Into<String>, color: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color: color.into(),
        }
    }

    /// Whether `other` denotes the same substrate, ignoring display attributes.
    pub fn same_as(&self, other: &Substrate) -> bool {
        self.id == other.id
    }
}
