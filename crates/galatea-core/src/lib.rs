//! # Galatea Core
//!
//! The composition and consistency engine behind Galatea: growing-medium
//! substrates, percentage-weighted mixes, substrate sets that keep mixes
//! and their components coherent, and stages that place set members on a
//! 2-D grid.
//!
//! - [`Substrate`](substrate::Substrate) - an identified, named, colored medium
//! - [`MixedSubstrate`](mixed::MixedSubstrate) - components whose shares sum to 100%
//! - [`SubstrateSet`](set::SubstrateSet) - membership with referential closure
//! - [`Stage`](stage::Stage) - a grid whose cells draw from one set
//!
//! The engine is pure: it never performs I/O. Callers load an aggregate,
//! run an operation, and persist the result only if it succeeded. Every
//! operation either applies completely or leaves the value untouched.
//!
//! ## Quick Start
//!
//! ```rust
//! use galatea_core::prelude::*;
//!
//! let sand = Substrate::new("sand", "Sand", "#c2b280");
//! let perlite = Substrate::new("perlite", "Perlite", "#f5f5f5");
//!
//! let mut mix = MixedSubstrate::new("potting", "Potting mix", "#6b4f3a");
//! mix.add_substrate(sand.clone(), 60.0).unwrap();
//! mix.add_substrate(perlite.clone(), 40.0).unwrap();
//! assert!(mix.validate().is_ok());
//!
//! let mut set = SubstrateSet::new("nursery", "Nursery");
//! set.add_substrate(sand).unwrap();
//! set.add_substrate(perlite).unwrap();
//! set.add_mixed_substrate(mix).unwrap();
//!
//! let mut stage = Stage::new("bench", "Bench", 3, 3, &set, CellPolicy::Strict).unwrap();
//! stage.place_mixed_substrate(&set, 1, 1, &"potting".into()).unwrap();
//! ```

pub mod types;
pub mod substrate;
pub mod mixed;
pub mod set;
pub mod stage;
pub mod pagination;
pub mod error;
pub mod prelude;
