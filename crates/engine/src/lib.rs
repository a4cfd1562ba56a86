//! Storage engines for the Recall vector store.
//!
//! This crate defines the engine contract every backend implements and the
//! concrete in-memory engine:
//! - [`VectorEngine`]: lifecycle, CRUD, transactions, indexing, search,
//!   maintenance, metrics
//! - [`MemoryEngine`]: BTreeMap storage, secondary indexes, TTL/LRU read
//!   cache, single-buffer transactions, background maintenance timer
//! - [`distance`]: the similarity math used by search, exposed for callers
//!   that score vectors without a store
//!
//! A future persistent engine implements the same contract and passes the
//! same conformance suite; the facade never depends on a concrete backend.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod contract;
pub mod distance;
mod maintenance;
pub mod memory;

pub use contract::VectorEngine;
pub use memory::MemoryEngine;
