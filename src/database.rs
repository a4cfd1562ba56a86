//! Main database entry point for Recall.
//!
//! `VectorDb` selects a storage engine from configuration, forwards every
//! contract operation to it unchanged, and publishes a notification for
//! each lifecycle and mutation event. It holds no state of its own beyond
//! the selected engine and the subscription registry.

use crate::error::{Error, Result};
use crate::events::{DbEvent, EventRegistry, SubscriptionId};
use recall_core::{
    DistanceMetric, EngineKind, MetricsSnapshot, QueryOptions, RecordPatch, SearchMatch,
    SearchOptions, TransactionOptions, VectorDbConfig, VectorRecord,
};
use recall_engine::{MemoryEngine, VectorEngine};
use std::path::PathBuf;
use std::time::Duration;
use tracing::error;

/// The Recall vector database.
///
/// # Example
///
/// ```
/// use recalldb::prelude::*;
///
/// # fn main() -> recalldb::Result<()> {
/// let db = VectorDb::builder()
///     .dimension(4)
///     .metric(DistanceMetric::Cosine)
///     .open()?;
///
/// db.insert(VectorRecord::new("doc-1", vec![0.1, 0.2, 0.3, 0.4]))?;
/// let hits = db.search(&SearchOptions::new(vec![0.1, 0.2, 0.3, 0.4]).limit(5))?;
/// assert_eq!(hits.len(), 1);
/// db.close()?;
/// # Ok(())
/// # }
/// ```
pub struct VectorDb {
    engine: Box<dyn VectorEngine>,
    config: VectorDbConfig,
    events: EventRegistry,
}

impl std::fmt::Debug for VectorDb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VectorDb")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl VectorDb {
    /// Construct a database for the given configuration.
    ///
    /// The engine is selected by `config.engine`; only `Memory` is
    /// implemented. The engine is not initialized; call [`initialize`]
    /// or use [`builder`] which does both.
    ///
    /// [`initialize`]: VectorDb::initialize
    /// [`builder`]: VectorDb::builder
    pub fn new(config: VectorDbConfig) -> Result<Self> {
        let engine = Self::create_engine(&config)?;
        Ok(VectorDb {
            engine,
            config,
            events: EventRegistry::new(),
        })
    }

    /// Create a builder for database configuration.
    pub fn builder() -> VectorDbBuilder {
        VectorDbBuilder::default()
    }

    fn create_engine(config: &VectorDbConfig) -> Result<Box<dyn VectorEngine>> {
        match config.engine {
            EngineKind::Memory => Ok(Box::new(MemoryEngine::new(config.clone())?)),
            EngineKind::Persistent => {
                Err(Error::EngineNotImplemented(EngineKind::Persistent.name().to_string()))
            }
        }
    }

    /// The configuration this database was built with.
    pub fn config(&self) -> &VectorDbConfig {
        &self.config
    }

    // =========================================================================
    // Events
    // =========================================================================

    /// Register a handler for state-change notifications.
    ///
    /// Handlers run synchronously after the underlying operation succeeds.
    pub fn subscribe(
        &self,
        handler: impl Fn(&DbEvent) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.events.subscribe(handler)
    }

    /// Remove a previously registered handler.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Bring the engine into service. Idempotent.
    pub fn initialize(&self) -> Result<()> {
        self.engine.initialize().map_err(|e| {
            error!(error = %e, "failed to initialize engine");
            Error::from(e)
        })?;
        self.events.emit(&DbEvent::Initialized);
        Ok(())
    }

    /// Take the engine out of service. Idempotent.
    pub fn close(&self) -> Result<()> {
        self.engine.close().map_err(|e| {
            error!(error = %e, "failed to close engine");
            Error::from(e)
        })?;
        self.events.emit(&DbEvent::Closed);
        Ok(())
    }

    // =========================================================================
    // Transactions
    // =========================================================================

    /// Open a transaction with default options.
    pub fn begin_transaction(&self) -> Result<()> {
        self.begin_transaction_with(TransactionOptions::default())
    }

    /// Open a transaction with explicit options.
    pub fn begin_transaction_with(&self, options: TransactionOptions) -> Result<()> {
        Ok(self.engine.begin_transaction(options)?)
    }

    /// Apply every buffered operation in order. Not atomic: on failure,
    /// earlier operations stay applied and the buffer is discarded.
    pub fn commit_transaction(&self) -> Result<()> {
        Ok(self.engine.commit_transaction()?)
    }

    /// Discard the transaction buffer without applying anything.
    pub fn rollback_transaction(&self) -> Result<()> {
        Ok(self.engine.rollback_transaction()?)
    }

    // =========================================================================
    // Records
    // =========================================================================

    /// Insert a record. Buffered when a transaction is open.
    pub fn insert(&self, record: VectorRecord) -> Result<()> {
        let id = record.id.clone();
        self.engine.insert(record).map_err(|e| {
            error!(error = %e, id = %id, "failed to insert record");
            Error::from(e)
        })?;
        self.events.emit(&DbEvent::RecordInserted { id });
        Ok(())
    }

    /// Apply a partial update. Buffered when a transaction is open.
    pub fn update(&self, id: &str, patch: RecordPatch) -> Result<()> {
        self.engine.update(id, patch).map_err(|e| {
            error!(error = %e, id = %id, "failed to update record");
            Error::from(e)
        })?;
        self.events.emit(&DbEvent::RecordUpdated { id: id.to_string() });
        Ok(())
    }

    /// Delete a record. Buffered when a transaction is open.
    pub fn delete(&self, id: &str) -> Result<()> {
        self.engine.delete(id).map_err(|e| {
            error!(error = %e, id = %id, "failed to delete record");
            Error::from(e)
        })?;
        self.events.emit(&DbEvent::RecordDeleted { id: id.to_string() });
        Ok(())
    }

    /// Fetch a record by identifier. Returns `None` when it does not exist.
    pub fn get(&self, id: &str) -> Result<Option<VectorRecord>> {
        Ok(self.engine.get(id)?)
    }

    /// Equality-filtered linear scan with offset and limit.
    pub fn query(&self, options: &QueryOptions) -> Result<Vec<VectorRecord>> {
        Ok(self.engine.query(options)?)
    }

    /// Exact nearest-neighbor search, best-first by comparison value.
    pub fn search(&self, options: &SearchOptions) -> Result<Vec<SearchMatch>> {
        Ok(self.engine.search(options)?)
    }

    // =========================================================================
    // Indexes & maintenance
    // =========================================================================

    /// Build a secondary index over one metadata field.
    pub fn create_index(&self, field: &str) -> Result<()> {
        self.engine.create_index(field).map_err(|e| {
            error!(error = %e, field = %field, "failed to create index");
            Error::from(e)
        })?;
        self.events.emit(&DbEvent::IndexCreated {
            field: field.to_string(),
        });
        Ok(())
    }

    /// Discard the secondary index for a field.
    pub fn drop_index(&self, field: &str) -> Result<()> {
        self.engine.drop_index(field).map_err(|e| {
            error!(error = %e, field = %field, "failed to drop index");
            Error::from(e)
        })?;
        self.events.emit(&DbEvent::IndexDropped {
            field: field.to_string(),
        });
        Ok(())
    }

    /// Run a maintenance pass on demand.
    pub fn optimize(&self) -> Result<()> {
        self.engine.optimize().map_err(|e| {
            error!(error = %e, "failed to optimize");
            Error::from(e)
        })?;
        self.events.emit(&DbEvent::Optimized);
        Ok(())
    }

    /// Snapshot of the engine metrics.
    pub fn metrics(&self) -> MetricsSnapshot {
        self.engine.metrics()
    }
}

/// Builder for [`VectorDb`].
///
/// `open()` constructs the database and initializes the engine.
#[derive(Debug, Clone, Default)]
pub struct VectorDbBuilder {
    config: VectorDbConfig,
}

impl VectorDbBuilder {
    /// Set the engine kind.
    pub fn engine(mut self, kind: EngineKind) -> Self {
        self.config.engine = kind;
        self
    }

    /// Set the vector dimension.
    pub fn dimension(mut self, dimension: usize) -> Self {
        self.config.dimension = dimension;
        self
    }

    /// Set the distance metric.
    pub fn metric(mut self, metric: DistanceMetric) -> Self {
        self.config.metric = metric;
        self
    }

    /// Set the informational indexed flag.
    pub fn indexed(mut self, indexed: bool) -> Self {
        self.config.indexed = indexed;
        self
    }

    /// Set the maintenance cadence. Zero disables the timer.
    pub fn optimize_interval(mut self, interval: Duration) -> Self {
        self.config.optimize_interval = interval;
        self
    }

    /// Set the connection budget for networked backends.
    pub fn max_connections(mut self, max_connections: usize) -> Self {
        self.config.max_connections = max_connections;
        self
    }

    /// Set the data directory for the persistent backend.
    pub fn persist_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.persist_path = Some(path.into());
        self
    }

    /// Bound the read cache to this many entries.
    pub fn cache_size(mut self, cache_size: usize) -> Self {
        self.config.cache_size = Some(cache_size);
        self
    }

    /// Construct the database and initialize its engine.
    pub fn open(self) -> Result<VectorDb> {
        if self.config.dimension == 0 {
            return Err(Error::Config(format!(
                "invalid dimension: {} (must be > 0)",
                self.config.dimension
            )));
        }
        let db = VectorDb::new(self.config)?;
        db.initialize()?;
        Ok(db)
    }
}
