//! # Galatea Runtime
//!
//! Persistence and services around the engine in `galatea-core`.
//!
//! A [`Store`](backend::Store) holds one repository per aggregate kind,
//! in memory or in SQLite (feature `sqlite`). A
//! [`Catalog`](catalog::Catalog) runs engine operations against stored
//! aggregates and keeps copies that live in mixes, sets and stages in
//! step with the canonical records.

pub mod repository;
pub mod memory;
pub mod backend;
pub mod catalog;
pub mod files;

#[cfg(feature = "sqlite")]
pub mod sqlite_store;

pub mod prelude;
