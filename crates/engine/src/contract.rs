//! The engine contract every storage backend implements.
//!
//! The facade depends only on this trait, never on a concrete backend, so
//! backends are swappable behind configuration. The in-memory engine
//! implements it today; a persistent engine would implement the same
//! contract and pass the same conformance suite.

use recall_core::{
    EngineResult, MetricsSnapshot, QueryOptions, RecordPatch, SearchMatch, SearchOptions,
    TransactionOptions, VectorRecord,
};

/// Operation set exposed by every storage backend.
///
/// ## Transactions
///
/// At most one transaction may be open per engine instance. While one is
/// open, `insert`/`update`/`delete` buffer instead of applying; reads always
/// see only applied storage (no read-your-writes). Commit applies buffered
/// operations in order and is **not atomic**: a failure at operation *k*
/// leaves operations *1..k-1* applied and discards the buffer.
///
/// ## Concurrency
///
/// Implementations are `Send + Sync`; operations run to completion without
/// internal retries. Cancellation and timeouts are the caller's concern.
pub trait VectorEngine: Send + Sync {
    /// Bring the engine into service. Idempotent: initializing an
    /// already-initialized engine is a no-op.
    fn initialize(&self) -> EngineResult<()>;

    /// Take the engine out of service and release its resources.
    /// Idempotent: closing a closed engine is a no-op.
    fn close(&self) -> EngineResult<()>;

    /// Open a transaction buffer.
    ///
    /// # Errors
    /// `TransactionInProgress` if a transaction is already open.
    fn begin_transaction(&self, options: TransactionOptions) -> EngineResult<()>;

    /// Apply every buffered operation, in order, directly against storage.
    ///
    /// The buffer is discarded regardless of outcome. On failure at
    /// operation *k*, operations *1..k-1* remain applied.
    ///
    /// # Errors
    /// `NoActiveTransaction` if no transaction is open, or the first error
    /// raised by a buffered operation.
    fn commit_transaction(&self) -> EngineResult<()>;

    /// Discard the transaction buffer without applying anything.
    ///
    /// # Errors
    /// `NoActiveTransaction` if no transaction is open.
    fn rollback_transaction(&self) -> EngineResult<()>;

    /// Insert a record. Buffered when a transaction is open.
    ///
    /// # Errors
    /// `DimensionMismatch` if the vector length differs from the configured
    /// dimension; `DuplicateId` if the identifier already exists (surfaced
    /// at apply time for buffered inserts).
    fn insert(&self, record: VectorRecord) -> EngineResult<()>;

    /// Apply a partial update. Buffered when a transaction is open.
    ///
    /// The patch merges over the existing record: the vector is replaced
    /// when present, metadata entries merge shallowly, the version
    /// increments by exactly 1, and the timestamp is refreshed.
    ///
    /// # Errors
    /// `NotFound` if the identifier is absent from applied storage;
    /// `DimensionMismatch` if a replacement vector has the wrong length.
    fn update(&self, id: &str, patch: RecordPatch) -> EngineResult<()>;

    /// Delete a record. Buffered when a transaction is open.
    ///
    /// # Errors
    /// `NotFound` if the identifier is absent from applied storage.
    fn delete(&self, id: &str) -> EngineResult<()>;

    /// Fetch a single record by identifier, cache-first.
    ///
    /// Returns `None` (not an error) when the identifier does not exist.
    fn get(&self, id: &str) -> EngineResult<Option<VectorRecord>>;

    /// Linear scan with an equality filter (AND across fields), then
    /// offset, then limit. Secondary indexes are not consulted.
    fn query(&self, options: &QueryOptions) -> EngineResult<Vec<VectorRecord>>;

    /// Exact nearest-neighbor search: full linear scan, ascending sort by
    /// the computed comparison value, optional threshold and limit.
    ///
    /// # Errors
    /// `DimensionMismatch` if the query vector length differs from the
    /// configured dimension.
    fn search(&self, options: &SearchOptions) -> EngineResult<Vec<SearchMatch>>;

    /// Build a secondary index over one metadata field by scanning all
    /// current records once.
    ///
    /// # Errors
    /// `IndexExists` if the field is already indexed.
    fn create_index(&self, field: &str) -> EngineResult<()>;

    /// Discard the secondary index for a field.
    ///
    /// # Errors
    /// `IndexMissing` if the field is not indexed.
    fn drop_index(&self, field: &str) -> EngineResult<()>;

    /// Run maintenance: age out stale cache entries and recompute the
    /// sampled metrics. Touches only cache and metrics state, never
    /// storage or indexes.
    fn optimize(&self) -> EngineResult<()>;

    /// Snapshot of the engine metrics. A copy, not a live view.
    fn metrics(&self) -> MetricsSnapshot;
}
