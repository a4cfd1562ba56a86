//! Core types for the Recall vector store.
//!
//! This crate defines the shared data model with no engine behavior:
//! - Records, patches, and configuration
//! - Query, search, and transaction options
//! - Scalar values and metadata filters
//! - The metrics snapshot
//! - The operational error taxonomy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod filter;
pub mod metrics;
pub mod types;

pub use error::{EngineError, EngineResult};
pub use filter::{MetadataFilter, ScalarValue};
pub use metrics::MetricsSnapshot;
pub use types::{
    DistanceMetric, EngineKind, IsolationLevel, Metadata, QueryOptions, RecordPatch, SearchMatch,
    SearchOptions, TransactionOptions, VectorDbConfig, VectorRecord,
};
