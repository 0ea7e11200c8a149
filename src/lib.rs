//! One-way music catalog migration: load a source catalog export, resolve
//! each track against a destination catalog, and build the matching playlists
//! there.
//!
//! The crate is transport-free. Destination access goes through the
//! [`catalog::CatalogQuery`] and [`catalog::CatalogMutation`] traits;
//! embedders supply implementations backed by whatever client they use, and
//! drive the pipeline with [`snapshot::Snapshot`], [`resolver::Resolver`],
//! and [`sync::SyncEngine`].

pub mod catalog;
pub mod models;
pub mod normalize;
pub mod progress;
pub mod resolver;
pub mod retry;
pub mod similarity;
pub mod snapshot;
pub mod sync;
