//! Secondary index over one metadata field.

use recall_core::ScalarValue;
use std::collections::{BTreeMap, BTreeSet};

/// Value-to-id-set mapping for a single metadata field.
///
/// BTreeMap keys give deterministic iteration. A bucket is dropped when its
/// id set empties, so the index always reflects exactly the records that
/// currently hold each value.
#[derive(Debug, Default)]
pub(crate) struct FieldIndex {
    buckets: BTreeMap<ScalarValue, BTreeSet<String>>,
}

impl FieldIndex {
    pub(crate) fn new() -> Self {
        FieldIndex::default()
    }

    /// Add an id under a value, creating the bucket if absent.
    pub(crate) fn add(&mut self, value: ScalarValue, id: &str) {
        self.buckets.entry(value).or_default().insert(id.to_string());
    }

    /// Remove an id from a value's bucket, dropping the bucket if emptied.
    pub(crate) fn remove(&mut self, value: &ScalarValue, id: &str) {
        if let Some(ids) = self.buckets.get_mut(value) {
            ids.remove(id);
            if ids.is_empty() {
                self.buckets.remove(value);
            }
        }
    }

    /// Number of live value buckets.
    pub(crate) fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Ids currently holding a value.
    #[cfg(test)]
    pub(crate) fn ids_for(&self, value: &ScalarValue) -> Option<&BTreeSet<String>> {
        self.buckets.get(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_and_remove() {
        let mut index = FieldIndex::new();
        index.add(ScalarValue::from("blue"), "a");
        index.add(ScalarValue::from("blue"), "b");
        index.add(ScalarValue::from("red"), "c");

        assert_eq!(index.bucket_count(), 2);
        assert_eq!(index.ids_for(&ScalarValue::from("blue")).unwrap().len(), 2);

        index.remove(&ScalarValue::from("blue"), "a");
        assert_eq!(index.ids_for(&ScalarValue::from("blue")).unwrap().len(), 1);
    }

    #[test]
    fn test_empty_bucket_is_dropped() {
        let mut index = FieldIndex::new();
        index.add(ScalarValue::from(7), "a");
        index.remove(&ScalarValue::from(7), "a");
        assert_eq!(index.bucket_count(), 0);
        assert!(index.ids_for(&ScalarValue::from(7)).is_none());
    }

    #[test]
    fn test_remove_unknown_value_is_noop() {
        let mut index = FieldIndex::new();
        index.add(ScalarValue::from("x"), "a");
        index.remove(&ScalarValue::from("y"), "a");
        assert_eq!(index.bucket_count(), 1);
    }
}
