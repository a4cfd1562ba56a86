//! Transaction buffer for the memory engine.

use chrono::{DateTime, Utc};
use recall_core::{RecordPatch, TransactionOptions, VectorRecord};
use uuid::Uuid;

/// A mutation waiting in an open transaction.
#[derive(Debug, Clone)]
pub(crate) enum BufferedOp {
    Insert(VectorRecord),
    Update { id: String, patch: RecordPatch },
    Delete { id: String },
}

/// Ordered list of pending operations for the single open transaction.
///
/// Operations apply in buffer order at commit. The options are recorded as
/// data; the memory engine does not enforce timeouts or isolation hints.
#[derive(Debug)]
pub(crate) struct TransactionBuffer {
    pub(crate) id: Uuid,
    pub(crate) begun_at: DateTime<Utc>,
    pub(crate) options: TransactionOptions,
    pub(crate) ops: Vec<BufferedOp>,
}

impl TransactionBuffer {
    pub(crate) fn new(options: TransactionOptions) -> Self {
        TransactionBuffer {
            id: Uuid::new_v4(),
            begun_at: Utc::now(),
            options,
            ops: Vec::new(),
        }
    }

    pub(crate) fn push(&mut self, op: BufferedOp) {
        self.ops.push(op);
    }

    pub(crate) fn len(&self) -> usize {
        self.ops.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ops_keep_buffer_order() {
        let mut buffer = TransactionBuffer::new(TransactionOptions::default());
        buffer.push(BufferedOp::Insert(VectorRecord::new("a", vec![1.0])));
        buffer.push(BufferedOp::Delete {
            id: "a".to_string(),
        });

        assert_eq!(buffer.len(), 2);
        assert!(matches!(buffer.ops[0], BufferedOp::Insert(_)));
        assert!(matches!(buffer.ops[1], BufferedOp::Delete { .. }));
    }

    #[test]
    fn test_buffers_get_distinct_ids() {
        let a = TransactionBuffer::new(TransactionOptions::default());
        let b = TransactionBuffer::new(TransactionOptions::default());
        assert_ne!(a.id, b.id);
    }
}
