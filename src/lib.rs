//! # Recall
//!
//! Embedded vector record store for AI agents.
//!
//! Recall stores fixed-dimension vectors with attached metadata and serves
//! CRUD, equality-filtered queries, exact nearest-neighbor search,
//! secondary metadata indexes, buffered transactions, and periodic
//! maintenance, all behind one facade that selects a storage engine by
//! configuration.
//!
//! ## Quick Start
//!
//! ```
//! use recalldb::prelude::*;
//! use serde_json::json;
//!
//! # fn main() -> recalldb::Result<()> {
//! let db = VectorDb::builder()
//!     .dimension(4)
//!     .metric(DistanceMetric::Cosine)
//!     .open()?;
//!
//! // Insert a record with metadata
//! let meta = json!({"title": "Hello World"}).as_object().unwrap().clone();
//! db.insert(VectorRecord::new("doc-1", vec![0.1, 0.2, 0.3, 0.4]).with_metadata(meta))?;
//!
//! // Similarity search
//! let hits = db.search(&SearchOptions::new(vec![0.1, 0.2, 0.3, 0.4]).limit(10))?;
//! assert_eq!(hits[0].record.id, "doc-1");
//!
//! // Equality-filtered query
//! let docs = db.query(
//!     &QueryOptions::new().filter(MetadataFilter::new().eq("title", "Hello World")),
//! )?;
//! assert_eq!(docs.len(), 1);
//!
//! db.close()?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! VectorDb (facade: engine selection, event registry)
//!     │
//!     ▼
//! VectorEngine (contract every backend implements)
//!     │
//!     ▼
//! MemoryEngine (storage / indexes / cache / transaction buffer)
//! ```
//!
//! The facade forwards every operation 1:1 and publishes a [`DbEvent`] for
//! each lifecycle and mutation change. Reads always see applied storage;
//! an open transaction buffers mutations until commit, which applies them
//! in order and is not atomic (see [`VectorDb::commit_transaction`]).

#![warn(missing_docs)]

mod database;
mod error;
mod events;

pub mod prelude;

// Re-export main entry points
pub use database::{VectorDb, VectorDbBuilder};
pub use error::{Error, Result};
pub use events::{DbEvent, SubscriptionId};

// Re-export the shared data model
pub use recall_core::{
    DistanceMetric, EngineKind, IsolationLevel, Metadata, MetadataFilter, MetricsSnapshot,
    QueryOptions, RecordPatch, ScalarValue, SearchMatch, SearchOptions, TransactionOptions,
    VectorDbConfig, VectorRecord,
};

// Similarity math, usable without a store
pub use recall_engine::distance;
