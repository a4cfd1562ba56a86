//! Convenience re-exports for common usage.
//!
//! ```
//! use recalldb::prelude::*;
//! ```

pub use crate::database::{VectorDb, VectorDbBuilder};
pub use crate::error::{Error, Result};
pub use crate::events::{DbEvent, SubscriptionId};
pub use recall_core::{
    DistanceMetric, EngineKind, Metadata, MetadataFilter, MetricsSnapshot, QueryOptions,
    RecordPatch, ScalarValue, SearchMatch, SearchOptions, TransactionOptions, VectorDbConfig,
    VectorRecord,
};
