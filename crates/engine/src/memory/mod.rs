//! In-memory storage engine.
//!
//! ## Design
//!
//! All mutable state (storage, secondary indexes, read cache, transaction
//! buffer, metrics) lives in one `EngineState` behind a single
//! `parking_lot::RwLock`, owned exclusively by the engine instance. Every
//! operation runs to completion under the lock; the only other writer is
//! the maintenance timer, which touches cache and metrics but never storage
//! or indexes.
//!
//! ## Determinism
//!
//! Storage is a `BTreeMap` keyed by record id, so query scans and index
//! builds iterate in a deterministic order.
//!
//! ## Transactions
//!
//! One transaction buffer at most. While it is open, mutations buffer in
//! order; reads see only applied storage. Commit applies the buffer in
//! order and is not atomic: the first failing operation stops the replay,
//! earlier operations stay applied, and the buffer is discarded either way.

mod cache;
mod index;
mod txn;

use crate::contract::VectorEngine;
use crate::distance::distance;
use crate::maintenance::MaintenanceTimer;
use cache::AccessCache;
use chrono::{DateTime, Utc};
use index::FieldIndex;
use parking_lot::{Mutex, RwLock};
use recall_core::{
    EngineError, EngineResult, MetricsSnapshot, QueryOptions, RecordPatch, ScalarValue,
    SearchMatch, SearchOptions, TransactionOptions, VectorDbConfig, VectorRecord,
};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};
use txn::{BufferedOp, TransactionBuffer};

/// Cache entries older than this are evicted during maintenance.
const CACHE_TTL_SECS: i64 = 60 * 60;

/// Fixed per-record overhead assumed by the memory-usage estimate.
const RECORD_OVERHEAD_BYTES: usize = 64;

struct EngineState {
    storage: BTreeMap<String, VectorRecord>,
    indexes: BTreeMap<String, FieldIndex>,
    cache: AccessCache,
    txn: Option<TransactionBuffer>,
    metrics: MetricsSnapshot,
    cache_ttl: chrono::Duration,
}

impl EngineState {
    fn new(cache_size: Option<usize>) -> Self {
        EngineState {
            storage: BTreeMap::new(),
            indexes: BTreeMap::new(),
            cache: AccessCache::new(cache_size),
            txn: None,
            metrics: MetricsSnapshot::default(),
            cache_ttl: chrono::Duration::seconds(CACHE_TTL_SECS),
        }
    }

    fn apply_insert(&mut self, mut record: VectorRecord) -> EngineResult<()> {
        if self.storage.contains_key(&record.id) {
            return Err(EngineError::DuplicateId { id: record.id });
        }
        record.timestamp = Utc::now();
        record.version = 1;
        self.index_record(&record);
        self.metrics.total_vectors += 1;
        self.storage.insert(record.id.clone(), record);
        Ok(())
    }

    fn apply_update(&mut self, id: &str, patch: RecordPatch, dimension: usize) -> EngineResult<()> {
        let Some(old) = self.storage.get(id).cloned() else {
            return Err(EngineError::NotFound { id: id.to_string() });
        };
        if let Some(vector) = &patch.vector {
            if vector.len() != dimension {
                return Err(EngineError::DimensionMismatch {
                    expected: dimension,
                    actual: vector.len(),
                });
            }
        }

        // Old metadata values must leave the indexes before the merge, or
        // the removal keys are lost.
        self.unindex_record(&old);

        let mut updated = old;
        if let Some(vector) = patch.vector {
            updated.vector = vector;
        }
        for (key, value) in patch.metadata {
            updated.metadata.insert(key, value);
        }
        updated.version += 1;
        updated.timestamp = Utc::now();

        self.index_record(&updated);
        self.cache.remove(id);
        self.storage.insert(id.to_string(), updated);
        Ok(())
    }

    fn apply_delete(&mut self, id: &str) -> EngineResult<()> {
        let Some(record) = self.storage.remove(id) else {
            return Err(EngineError::NotFound { id: id.to_string() });
        };
        self.unindex_record(&record);
        self.cache.remove(id);
        self.metrics.total_vectors = self.metrics.total_vectors.saturating_sub(1);
        Ok(())
    }

    fn index_record(&mut self, record: &VectorRecord) {
        for (field, index) in &mut self.indexes {
            if let Some(value) = record.metadata.get(field) {
                if let Some(scalar) = ScalarValue::from_json(value) {
                    index.add(scalar, &record.id);
                }
            }
        }
    }

    fn unindex_record(&mut self, record: &VectorRecord) {
        for (field, index) in &mut self.indexes {
            if let Some(value) = record.metadata.get(field) {
                if let Some(scalar) = ScalarValue::from_json(value) {
                    index.remove(&scalar, &record.id);
                }
            }
        }
    }

    /// Maintenance pass: age the cache, resample derived metrics.
    /// Returns the number of cache entries evicted.
    fn run_optimize(&mut self, now: DateTime<Utc>) -> usize {
        let cutoff = now - self.cache_ttl;
        let evicted = self.cache.evict_older_than(cutoff);

        let total = self.storage.len();
        let buckets: usize = self.indexes.values().map(FieldIndex::bucket_count).sum();
        self.metrics.index_efficiency = buckets as f64 / total.max(1) as f64;
        self.metrics.memory_usage = self.estimated_bytes();
        evicted
    }

    fn estimated_bytes(&self) -> u64 {
        self.storage
            .iter()
            .map(|(id, record)| {
                let metadata = serde_json::to_string(&record.metadata)
                    .map(|s| s.len())
                    .unwrap_or(0);
                (id.len()
                    + record.vector.len() * std::mem::size_of::<f32>()
                    + metadata
                    + RECORD_OVERHEAD_BYTES) as u64
            })
            .sum()
    }

    fn record_latency(&mut self, start: Instant) {
        let elapsed_ms = start.elapsed().as_secs_f64() * 1e3;
        self.metrics.query_latency = (self.metrics.query_latency + elapsed_ms) / 2.0;
    }
}

/// The in-memory engine: a `BTreeMap` record store with secondary indexes,
/// a TTL/LRU read cache, a single-buffer transaction model, and a
/// background maintenance timer.
pub struct MemoryEngine {
    config: VectorDbConfig,
    state: Arc<RwLock<EngineState>>,
    initialized: AtomicBool,
    timer: Mutex<Option<MaintenanceTimer>>,
}

impl std::fmt::Debug for MemoryEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryEngine")
            .field("config", &self.config)
            .field("initialized", &self.initialized)
            .finish_non_exhaustive()
    }
}

impl MemoryEngine {
    /// Create an engine for the given configuration.
    ///
    /// # Errors
    /// `InvalidConfig` if the dimension is 0.
    pub fn new(config: VectorDbConfig) -> EngineResult<Self> {
        if config.dimension == 0 {
            return Err(EngineError::InvalidConfig {
                reason: format!("invalid dimension: {} (must be > 0)", config.dimension),
            });
        }
        let cache_size = config.cache_size;
        Ok(MemoryEngine {
            config,
            state: Arc::new(RwLock::new(EngineState::new(cache_size))),
            initialized: AtomicBool::new(false),
            timer: Mutex::new(None),
        })
    }

    /// The configuration this engine was built with.
    pub fn config(&self) -> &VectorDbConfig {
        &self.config
    }

    fn check_dimension(&self, vector: &[f32]) -> EngineResult<()> {
        if vector.len() != self.config.dimension {
            return Err(EngineError::DimensionMismatch {
                expected: self.config.dimension,
                actual: vector.len(),
            });
        }
        Ok(())
    }
}

impl VectorEngine for MemoryEngine {
    fn initialize(&self) -> EngineResult<()> {
        if self.initialized.swap(true, Ordering::SeqCst) {
            return Ok(());
        }
        if !self.config.optimize_interval.is_zero() {
            let state = Arc::clone(&self.state);
            let timer = MaintenanceTimer::start(self.config.optimize_interval, move || {
                let evicted = state.write().run_optimize(Utc::now());
                debug!(evicted, "scheduled optimize pass");
            });
            *self.timer.lock() = Some(timer);
        }
        info!(
            dimension = self.config.dimension,
            metric = %self.config.metric,
            "memory engine initialized"
        );
        Ok(())
    }

    fn close(&self) -> EngineResult<()> {
        if !self.initialized.swap(false, Ordering::SeqCst) {
            return Ok(());
        }
        // Stop the timer before clearing state so no pass runs mid-teardown
        if let Some(mut timer) = self.timer.lock().take() {
            timer.stop();
        }
        let mut state = self.state.write();
        state.storage.clear();
        state.indexes.clear();
        state.cache.clear();
        info!("memory engine closed");
        Ok(())
    }

    fn begin_transaction(&self, options: TransactionOptions) -> EngineResult<()> {
        let mut state = self.state.write();
        if state.txn.is_some() {
            return Err(EngineError::TransactionInProgress);
        }
        let buffer = TransactionBuffer::new(options);
        debug!(txn_id = %buffer.id, isolation = ?buffer.options.isolation, "transaction begun");
        state.txn = Some(buffer);
        Ok(())
    }

    fn commit_transaction(&self) -> EngineResult<()> {
        let mut state = self.state.write();
        let Some(txn) = state.txn.take() else {
            return Err(EngineError::NoActiveTransaction);
        };
        let open_for_ms = (Utc::now() - txn.begun_at).num_milliseconds();
        debug!(txn_id = %txn.id, ops = txn.len(), open_for_ms, "committing transaction");

        // Buffer already taken: earlier operations stay applied if a later
        // one fails, and nothing is replayed twice.
        for op in txn.ops {
            match op {
                BufferedOp::Insert(record) => state.apply_insert(record)?,
                BufferedOp::Update { id, patch } => {
                    state.apply_update(&id, patch, self.config.dimension)?
                }
                BufferedOp::Delete { id } => state.apply_delete(&id)?,
            }
        }
        Ok(())
    }

    fn rollback_transaction(&self) -> EngineResult<()> {
        let mut state = self.state.write();
        let Some(txn) = state.txn.take() else {
            return Err(EngineError::NoActiveTransaction);
        };
        debug!(txn_id = %txn.id, ops = txn.len(), "transaction rolled back");
        Ok(())
    }

    fn insert(&self, record: VectorRecord) -> EngineResult<()> {
        self.check_dimension(&record.vector)?;
        let mut state = self.state.write();
        if let Some(txn) = state.txn.as_mut() {
            txn.push(BufferedOp::Insert(record));
            return Ok(());
        }
        state.apply_insert(record)
    }

    fn update(&self, id: &str, patch: RecordPatch) -> EngineResult<()> {
        if let Some(vector) = &patch.vector {
            self.check_dimension(vector)?;
        }
        let mut state = self.state.write();
        if !state.storage.contains_key(id) {
            return Err(EngineError::NotFound { id: id.to_string() });
        }
        if let Some(txn) = state.txn.as_mut() {
            txn.push(BufferedOp::Update {
                id: id.to_string(),
                patch,
            });
            return Ok(());
        }
        state.apply_update(id, patch, self.config.dimension)
    }

    fn delete(&self, id: &str) -> EngineResult<()> {
        let mut state = self.state.write();
        if !state.storage.contains_key(id) {
            return Err(EngineError::NotFound { id: id.to_string() });
        }
        if let Some(txn) = state.txn.as_mut() {
            txn.push(BufferedOp::Delete { id: id.to_string() });
            return Ok(());
        }
        state.apply_delete(id)
    }

    fn get(&self, id: &str) -> EngineResult<Option<VectorRecord>> {
        let mut state = self.state.write();
        let now = Utc::now();

        if let Some(record) = state.cache.get_refresh(id, now) {
            let n = state.metrics.total_vectors as f64;
            state.metrics.cache_hit_rate = (state.metrics.cache_hit_rate * n + 1.0) / (n + 1.0);
            return Ok(Some(record));
        }

        let record = match state.storage.get_mut(id) {
            Some(stored) => {
                stored.last_accessed = Some(now);
                stored.clone()
            }
            None => return Ok(None),
        };
        state.cache.insert(record.clone(), now);
        let n = state.metrics.total_vectors as f64;
        state.metrics.cache_hit_rate = (state.metrics.cache_hit_rate * n) / (n + 1.0);
        Ok(Some(record))
    }

    fn query(&self, options: &QueryOptions) -> EngineResult<Vec<VectorRecord>> {
        let start = Instant::now();
        let mut state = self.state.write();

        let mut results: Vec<VectorRecord> = state
            .storage
            .values()
            .filter(|record| {
                options
                    .filter
                    .as_ref()
                    .map_or(true, |f| f.matches(&record.metadata))
            })
            .skip(options.offset.unwrap_or(0))
            .take(options.limit.unwrap_or(usize::MAX))
            .cloned()
            .collect();

        for record in &mut results {
            if !options.include_vector {
                record.vector.clear();
            }
            if !options.include_metadata {
                record.metadata.clear();
            }
        }

        state.record_latency(start);
        Ok(results)
    }

    fn search(&self, options: &SearchOptions) -> EngineResult<Vec<SearchMatch>> {
        self.check_dimension(&options.vector)?;
        let start = Instant::now();
        let mut state = self.state.write();

        let mut scored: Vec<(f32, &VectorRecord)> = Vec::new();
        for record in state.storage.values() {
            let value = distance(self.config.metric, &record.vector, &options.vector)?;
            if let Some(threshold) = options.threshold {
                if value > threshold {
                    continue;
                }
            }
            scored.push((value, record));
        }

        // Ascending for every metric, including dot product: that ranking
        // quirk is part of the stable contract.
        scored.sort_by(|a, b| a.0.total_cmp(&b.0));
        if let Some(limit) = options.limit {
            scored.truncate(limit);
        }

        let matches: Vec<SearchMatch> = scored
            .into_iter()
            .map(|(value, record)| {
                let mut record = record.clone();
                if !options.include_vector {
                    record.vector.clear();
                }
                if !options.include_metadata {
                    record.metadata.clear();
                }
                SearchMatch {
                    record,
                    distance: options.return_distance.then_some(value),
                }
            })
            .collect();

        state.record_latency(start);
        Ok(matches)
    }

    fn create_index(&self, field: &str) -> EngineResult<()> {
        let mut state = self.state.write();
        if state.indexes.contains_key(field) {
            return Err(EngineError::IndexExists {
                field: field.to_string(),
            });
        }

        let mut index = FieldIndex::new();
        for record in state.storage.values() {
            if let Some(value) = record.metadata.get(field) {
                if let Some(scalar) = ScalarValue::from_json(value) {
                    index.add(scalar, &record.id);
                }
            }
        }
        state.indexes.insert(field.to_string(), index);
        state.metrics.total_indexes += 1;
        debug!(field, "index created");
        Ok(())
    }

    fn drop_index(&self, field: &str) -> EngineResult<()> {
        let mut state = self.state.write();
        if state.indexes.remove(field).is_none() {
            return Err(EngineError::IndexMissing {
                field: field.to_string(),
            });
        }
        state.metrics.total_indexes = state.metrics.total_indexes.saturating_sub(1);
        debug!(field, "index dropped");
        Ok(())
    }

    fn optimize(&self) -> EngineResult<()> {
        let evicted = self.state.write().run_optimize(Utc::now());
        debug!(evicted, "optimize pass complete");
        Ok(())
    }

    fn metrics(&self) -> MetricsSnapshot {
        self.state.read().metrics
    }
}
