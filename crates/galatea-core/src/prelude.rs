//! Galatea Core Prelude — convenient imports for common usage.
//!
//! ```rust
//! use galatea_core::prelude::*;
//! ```

pub use crate::types::{MixedSubstrateId, StageId, SubstrateId, SubstrateSetId};

pub use crate::substrate::Substrate;
pub use crate::mixed::{MixedSubstrate, SubstratePercentage, MAX_PERCENTAGE, PERCENTAGE_EPSILON};
pub use crate::set::SubstrateSet;
pub use crate::stage::{Cell, CellPolicy, Stage};
pub use crate::pagination::{Page, PageRequest, DEFAULT_PAGE_SIZE};

pub use crate::error::{GalateaError, MixError, Result, SetError, StageError, StoreError};
