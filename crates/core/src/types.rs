//! Record, configuration, and option types for the vector store.
//!
//! These types define the data model shared by the facade and every storage
//! backend. Behavior (distance math, indexing, caching) lives in the engine
//! crate.

use crate::error::EngineError;
use crate::filter::MetadataFilter;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Metadata attached to a record: string keys mapping to JSON values.
pub type Metadata = serde_json::Map<String, serde_json::Value>;

/// Storage backend kind.
///
/// Only `Memory` is implemented. `Persistent` is a declared future backend;
/// selecting it fails with `EngineNotImplemented`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EngineKind {
    /// In-memory engine, no durability
    #[default]
    Memory,
    /// On-disk engine, reserved for a future backend
    Persistent,
}

impl EngineKind {
    /// Human-readable name for display and error messages
    pub fn name(&self) -> &'static str {
        match self {
            EngineKind::Memory => "memory",
            EngineKind::Persistent => "persistent",
        }
    }
}

impl std::fmt::Display for EngineKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Distance metric for similarity search.
///
/// Cosine and euclidean are distances (lower = closer); dot product is a
/// similarity (higher = closer). Search sorts ascending by the computed
/// value for every metric, so `Dot` ranks the least similar records first.
/// That ordering is part of the stable contract and is not corrected here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceMetric {
    /// Cosine distance: 1 - dot(a,b) / (||a|| * ||b||), lower = closer
    #[default]
    Cosine,
    /// Euclidean (L2) distance, lower = closer
    Euclidean,
    /// Raw dot product, higher = closer
    Dot,
}

impl DistanceMetric {
    /// Human-readable name for display
    pub fn name(&self) -> &'static str {
        match self {
            DistanceMetric::Cosine => "cosine",
            DistanceMetric::Euclidean => "euclidean",
            DistanceMetric::Dot => "dot",
        }
    }

    /// Parse from string (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "cosine" => Some(DistanceMetric::Cosine),
            "euclidean" | "l2" => Some(DistanceMetric::Euclidean),
            "dot" | "dot_product" | "inner_product" => Some(DistanceMetric::Dot),
            _ => None,
        }
    }
}

impl std::str::FromStr for DistanceMetric {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DistanceMetric::parse(s).ok_or_else(|| EngineError::UnsupportedMetric {
            metric: s.to_string(),
        })
    }
}

impl std::fmt::Display for DistanceMetric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Store configuration, fixed at construction.
///
/// `dimension` and `metric` are immutable for the lifetime of a store; every
/// vector inserted or searched must match `dimension`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorDbConfig {
    /// Which backend to construct
    pub engine: EngineKind,

    /// Vector dimension, must be > 0
    pub dimension: usize,

    /// Distance metric used by search
    pub metric: DistanceMetric,

    /// Informational flag; does not gate index usage
    pub indexed: bool,

    /// Maintenance cadence; zero disables the background timer
    pub optimize_interval: Duration,

    /// Connection budget for networked backends; unused by the memory engine
    pub max_connections: usize,

    /// Data directory for the persistent backend; unused by the memory engine
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub persist_path: Option<PathBuf>,

    /// Read-cache capacity; populating past this bound evicts the
    /// least-recently-used entry
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache_size: Option<usize>,
}

impl VectorDbConfig {
    /// Create a memory-engine configuration with validation.
    ///
    /// # Errors
    /// Returns `InvalidConfig` if `dimension` is 0.
    pub fn new(dimension: usize, metric: DistanceMetric) -> Result<Self, EngineError> {
        if dimension == 0 {
            return Err(EngineError::InvalidConfig {
                reason: format!("invalid dimension: {} (must be > 0)", dimension),
            });
        }
        Ok(VectorDbConfig {
            dimension,
            metric,
            ..VectorDbConfig::default()
        })
    }
}

impl Default for VectorDbConfig {
    fn default() -> Self {
        VectorDbConfig {
            engine: EngineKind::Memory,
            dimension: 1536,
            metric: DistanceMetric::Cosine,
            indexed: true,
            optimize_interval: Duration::ZERO,
            max_connections: 10,
            persist_path: None,
            cache_size: None,
        }
    }
}

/// A stored vector record.
///
/// Identifiers are unique within a store; `version` starts at 1 on insert
/// and increments by exactly 1 on every update. `created_at`, `last_accessed`
/// and `version` are engine-managed; caller-supplied values are overwritten
/// on insert.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorRecord {
    /// Unique record identifier
    pub id: String,

    /// Fixed-dimension embedding; length must equal the store dimension
    pub vector: Vec<f32>,

    /// Attached metadata, unordered string-keyed JSON values
    #[serde(default)]
    pub metadata: Metadata,

    /// When the record was inserted or last modified
    pub timestamp: DateTime<Utc>,

    /// When the record was last served from storage or cache
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_accessed: Option<DateTime<Utc>>,

    /// Monotonically increasing, starts at 1
    pub version: u64,
}

impl VectorRecord {
    /// Create a record ready for insertion.
    pub fn new(id: impl Into<String>, vector: Vec<f32>) -> Self {
        VectorRecord {
            id: id.into(),
            vector,
            metadata: Metadata::new(),
            timestamp: Utc::now(),
            last_accessed: None,
            version: 1,
        }
    }

    /// Attach metadata to the record.
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// The embedding dimension.
    pub fn dimension(&self) -> usize {
        self.vector.len()
    }
}

/// Partial update applied to an existing record.
///
/// `vector`, when present, replaces the stored vector; `metadata` entries
/// merge shallowly over existing keys. Version and timestamps are engine-
/// managed and cannot be patched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordPatch {
    /// Replacement vector; must match the store dimension when present
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vector: Option<Vec<f32>>,

    /// Metadata entries merged over the existing mapping
    #[serde(default)]
    pub metadata: Metadata,
}

impl RecordPatch {
    /// Create an empty patch.
    pub fn new() -> Self {
        RecordPatch::default()
    }

    /// Replace the stored vector.
    pub fn vector(mut self, vector: Vec<f32>) -> Self {
        self.vector = Some(vector);
        self
    }

    /// Merge a metadata entry.
    pub fn meta(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }
}

/// Options for equality-filtered queries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryOptions {
    /// Equality filter, AND semantics across fields
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filter: Option<MetadataFilter>,

    /// Maximum number of results, applied after `offset`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,

    /// Number of matching records to skip
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<usize>,

    /// Include metadata in results
    pub include_metadata: bool,

    /// Include raw vectors in results
    pub include_vector: bool,
}

impl Default for QueryOptions {
    fn default() -> Self {
        QueryOptions {
            filter: None,
            limit: None,
            offset: None,
            include_metadata: true,
            include_vector: true,
        }
    }
}

impl QueryOptions {
    /// Options matching every record, full projection.
    pub fn new() -> Self {
        QueryOptions::default()
    }

    /// Set the equality filter.
    pub fn filter(mut self, filter: MetadataFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Set the result limit.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set the result offset.
    pub fn offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }
}

/// Options for similarity search.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Query vector; length must equal the store dimension
    pub vector: Vec<f32>,

    /// Maximum number of results after sorting
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,

    /// Keep only results with computed value <= threshold
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold: Option<f32>,

    /// Attach the computed distance to each match
    pub return_distance: bool,

    /// Include metadata in results
    pub include_metadata: bool,

    /// Include raw vectors in results
    pub include_vector: bool,
}

impl SearchOptions {
    /// Search options for a query vector, full projection, no bounds.
    pub fn new(vector: Vec<f32>) -> Self {
        SearchOptions {
            vector,
            limit: None,
            threshold: None,
            return_distance: false,
            include_metadata: true,
            include_vector: true,
        }
    }

    /// Set the result limit.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Set the distance threshold.
    pub fn threshold(mut self, threshold: f32) -> Self {
        self.threshold = Some(threshold);
        self
    }

    /// Attach computed distances to matches.
    pub fn with_distance(mut self) -> Self {
        self.return_distance = true;
        self
    }

    /// Strip raw vectors from matches.
    pub fn without_vectors(mut self) -> Self {
        self.include_vector = false;
        self
    }
}

/// A search result: the matched record plus its computed distance when
/// requested via `return_distance`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchMatch {
    /// The matched record (vector/metadata subject to projection flags)
    #[serde(flatten)]
    pub record: VectorRecord,

    /// Computed comparison value, present when `return_distance` was set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f32>,
}

/// Transaction isolation hint.
///
/// Carried as data for future backends; the memory engine runs one
/// transaction at a time and does not interpret it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IsolationLevel {
    /// Read-only transaction
    Read,
    /// Read-write transaction
    Write,
    /// Serializable transaction
    Serializable,
}

/// Options supplied when opening a transaction.
///
/// All fields are hints for backends that enforce them; the memory engine
/// records them on the buffer but does not act on them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TransactionOptions {
    /// Abort the transaction if it runs longer than this
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout: Option<Duration>,

    /// Requested isolation level
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub isolation: Option<IsolationLevel>,

    /// How many times a conflicting commit may be retried
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry_count: Option<u32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metric_parse() {
        assert_eq!(DistanceMetric::parse("cosine"), Some(DistanceMetric::Cosine));
        assert_eq!(DistanceMetric::parse("L2"), Some(DistanceMetric::Euclidean));
        assert_eq!(DistanceMetric::parse("dot_product"), Some(DistanceMetric::Dot));
        assert_eq!(DistanceMetric::parse("hamming"), None);
    }

    #[test]
    fn test_metric_from_str_unsupported() {
        let err = "hamming".parse::<DistanceMetric>().unwrap_err();
        assert!(matches!(err, EngineError::UnsupportedMetric { .. }));
    }

    #[test]
    fn test_config_rejects_zero_dimension() {
        let result = VectorDbConfig::new(0, DistanceMetric::Cosine);
        assert!(matches!(result, Err(EngineError::InvalidConfig { .. })));
    }

    #[test]
    fn test_config_defaults() {
        let config = VectorDbConfig::new(384, DistanceMetric::Cosine).unwrap();
        assert_eq!(config.engine, EngineKind::Memory);
        assert_eq!(config.dimension, 384);
        assert!(config.optimize_interval.is_zero());
        assert!(config.cache_size.is_none());
    }

    #[test]
    fn test_record_new_starts_at_version_one() {
        let record = VectorRecord::new("a", vec![1.0, 0.0]);
        assert_eq!(record.version, 1);
        assert!(record.last_accessed.is_none());
        assert_eq!(record.dimension(), 2);
    }

    #[test]
    fn test_patch_builder() {
        let patch = RecordPatch::new()
            .vector(vec![0.5, 0.5])
            .meta("kind", serde_json::json!("note"));
        assert_eq!(patch.vector.as_deref(), Some(&[0.5, 0.5][..]));
        assert_eq!(patch.metadata.len(), 1);
    }

    #[test]
    fn test_search_match_serde_flattens_record() {
        let m = SearchMatch {
            record: VectorRecord::new("a", vec![1.0]),
            distance: Some(0.25),
        };
        let json = serde_json::to_value(&m).unwrap();
        assert_eq!(json["id"], "a");
        assert!((json["distance"].as_f64().unwrap() - 0.25).abs() < 1e-6);
    }
}
