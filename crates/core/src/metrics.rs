//! Engine metrics snapshot.

use serde::{Deserialize, Serialize};

/// Point-in-time engine metrics.
///
/// `metrics()` returns a copy, never a live view; the averages are running
/// averages maintained by the engine, not windowed samples.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Number of records currently stored
    pub total_vectors: u64,

    /// Number of secondary indexes currently maintained
    pub total_indexes: u64,

    /// Estimated bytes held by storage, sampled during maintenance
    pub memory_usage: u64,

    /// Running-average query/search latency in milliseconds
    pub query_latency: f64,

    /// Running-average cache hit rate in [0, 1]
    pub cache_hit_rate: f64,

    /// Sum of live index buckets over max(total records, 1),
    /// recomputed during maintenance
    pub index_efficiency: f64,
}
