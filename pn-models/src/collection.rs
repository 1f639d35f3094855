//! Typed, paginated response collections.
//!
//! Carrier query endpoints return one page of results wrapped in a response
//! object carrying pagination metadata. `ResponseCollection` maps such a
//! payload onto an ordered, position-keyed set of entities with
//! collection-style access and a restartable traversal cursor.

use std::collections::BTreeMap;

use pn_core::error::{PnError, PnResult};
use serde_json::Value;

use crate::entity::ResultEntity;

/// Key of the nested results array, as the carrier spells it.
const RESULTS_FIELD: &str = "result(s)";

/// A paginated, array-like wrapper around a sequence of result entities.
///
/// Entries live in an ordered map from integer position to entity, so
/// positions stay stable across removals: deleting an entry leaves a gap
/// rather than shifting its successors. Pagination metadata rides alongside
/// as independent optional strings, exactly as the server reports them
/// (`result_count` is never reconciled against the number of entries).
///
/// The traversal cursor is shared mutable state on the collection itself.
/// It is not synchronized; confine an instance to one task and do not
/// remove entries ahead of the cursor mid-pass.
#[derive(Debug, Clone)]
pub struct ResponseCollection<T> {
    entries: BTreeMap<usize, T>,
    total_pages: Option<String>,
    requested_page: Option<String>,
    result_count: Option<String>,
    postnl_key: Option<String>,
    cursor: usize,
}

impl<T> Default for ResponseCollection<T> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
            total_pages: None,
            requested_page: None,
            result_count: None,
            postnl_key: None,
            cursor: 0,
        }
    }
}

impl<T> ResponseCollection<T> {
    /// Create an empty collection with all metadata unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a collection from an in-memory sequence of entities plus
    /// pagination metadata. Entities take positions `0..n` in order.
    pub fn with_results(
        results: Vec<T>,
        total_pages: Option<String>,
        requested_page: Option<String>,
        postnl_key: Option<String>,
    ) -> Self {
        let mut collection = Self::new();
        collection.set_results(results);
        collection.total_pages = total_pages;
        collection.requested_page = requested_page;
        collection.postnl_key = postnl_key;
        collection
    }

    // --- Results access ---

    /// All live entities in ascending position order.
    pub fn results(&self) -> Vec<&T> {
        self.entries.values().collect()
    }

    /// Replace the result set. Entities are reassigned positions `0..n`
    /// densely; existing gaps are discarded.
    pub fn set_results(&mut self, results: Vec<T>) -> &mut Self {
        self.entries = results.into_iter().enumerate().collect();
        self
    }

    // --- Metadata accessors ---

    /// Total number of pages available server-side, as reported.
    pub fn total_pages(&self) -> Option<&str> {
        self.total_pages.as_deref()
    }

    pub fn set_total_pages(&mut self, total_pages: Option<String>) -> &mut Self {
        self.total_pages = total_pages;
        self
    }

    /// Page number that was requested.
    pub fn requested_page(&self) -> Option<&str> {
        self.requested_page.as_deref()
    }

    pub fn set_requested_page(&mut self, requested_page: Option<String>) -> &mut Self {
        self.requested_page = requested_page;
        self
    }

    /// Result count reported by the server for the current page. May
    /// diverge from [`len`](Self::len); the two are never reconciled.
    pub fn result_count(&self) -> Option<&str> {
        self.result_count.as_deref()
    }

    pub fn set_result_count(&mut self, result_count: Option<String>) -> &mut Self {
        self.result_count = result_count;
        self
    }

    /// Opaque pagination/session token echoed by the server.
    pub fn postnl_key(&self) -> Option<&str> {
        self.postnl_key.as_deref()
    }

    pub fn set_postnl_key(&mut self, postnl_key: Option<String>) -> &mut Self {
        self.postnl_key = postnl_key;
        self
    }

    // --- Position protocol ---

    /// Number of live entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether an entry is present at the given position.
    pub fn contains(&self, position: usize) -> bool {
        self.entries.contains_key(&position)
    }

    /// Entry at a position, or `None` when absent. Never panics.
    pub fn get(&self, position: usize) -> Option<&T> {
        self.entries.get(&position)
    }

    pub fn get_mut(&mut self, position: usize) -> Option<&mut T> {
        self.entries.get_mut(&position)
    }

    /// Replace or create the entry at an explicit position. Returns the
    /// previous entry, if any.
    pub fn insert(&mut self, position: usize, entity: T) -> Option<T> {
        self.entries.insert(position, entity)
    }

    /// Append at the position after the last live entry (0 when empty).
    /// Returns the position used.
    pub fn push(&mut self, entity: T) -> usize {
        let position = self
            .entries
            .last_key_value()
            .map(|(last, _)| last + 1)
            .unwrap_or(0);
        self.entries.insert(position, entity);
        position
    }

    /// Remove the entry at a position, leaving a gap. Later entries keep
    /// their positions; only [`len`](Self::len) shrinks.
    pub fn remove(&mut self, position: usize) -> Option<T> {
        self.entries.remove(&position)
    }

    // --- Traversal cursor ---

    /// Entry at the cursor, or `None` when the cursor sits on a gap or
    /// past the end.
    pub fn current(&self) -> Option<&T> {
        self.entries.get(&self.cursor)
    }

    /// Move the cursor to the next live position in ascending order.
    /// No-op when no live position follows.
    pub fn advance(&mut self) {
        if let Some((&next, _)) = self.entries.range(self.cursor + 1..).next() {
            self.cursor = next;
        }
    }

    /// Position of the cursor, or `None` when it does not sit on a live
    /// entry.
    pub fn key(&self) -> Option<usize> {
        if self.valid() {
            Some(self.cursor)
        } else {
            None
        }
    }

    /// Whether the cursor sits on a live entry.
    pub fn valid(&self) -> bool {
        self.entries.contains_key(&self.cursor)
    }

    /// Reset the cursor to position 0.
    pub fn rewind(&mut self) {
        self.cursor = 0;
    }
}

impl<T: ResultEntity> ResponseCollection<T> {
    /// Deserialize a collection from a raw response payload.
    ///
    /// A payload without the `T::RESPONSE_KEY` wrapper yields an empty
    /// collection with all metadata unset; a missing wrapper means "no
    /// data", not malformed input. When the wrapper is present, the
    /// pagination fields are each optional, the nested `result(s)` array
    /// is required, and entities are appended in source order. Entity
    /// validation failures propagate unchanged.
    ///
    /// Only the first element of the results array is shape-checked up
    /// front; later elements are left to the entity deserializer.
    pub fn from_json(raw: &Value) -> PnResult<Self> {
        let mut collection = Self::new();
        let Some(value) = raw.get(T::RESPONSE_KEY) else {
            return Ok(collection);
        };

        collection.total_pages = string_field(value, "totalPages");
        collection.requested_page = string_field(value, "requestedPage");
        collection.result_count = string_field(value, "resultCount");
        collection.postnl_key = string_field(value, "postnlKey");

        let items = value.get(RESULTS_FIELD).and_then(Value::as_array).ok_or_else(|| {
            PnError::InvalidArgument(format!(
                "{} payload is missing the {RESULTS_FIELD} array",
                T::RESPONSE_KEY
            ))
        })?;

        if let Some(first) = items.first() {
            if !first.is_object() {
                return Err(PnError::InvalidArgument(format!(
                    "invalid {} results array given",
                    T::ENTITY_KEY
                )));
            }
        }

        for item in items {
            let wrapped = serde_json::json!({ T::ENTITY_KEY: item });
            collection.push(T::from_json(&wrapped)?);
        }

        Ok(collection)
    }

    /// Serialize the collection's logical content back to the wire shape.
    ///
    /// Set metadata fields and live entities (in ascending position order)
    /// are emitted under the `T::RESPONSE_KEY` wrapper; unset metadata is
    /// omitted.
    pub fn to_json(&self) -> Value {
        let mut inner = serde_json::Map::new();
        if let Some(v) = &self.total_pages {
            inner.insert("totalPages".into(), Value::String(v.clone()));
        }
        if let Some(v) = &self.requested_page {
            inner.insert("requestedPage".into(), Value::String(v.clone()));
        }
        if let Some(v) = &self.result_count {
            inner.insert("resultCount".into(), Value::String(v.clone()));
        }
        if let Some(v) = &self.postnl_key {
            inner.insert("postnlKey".into(), Value::String(v.clone()));
        }
        let items: Vec<Value> = self.entries.values().map(T::to_json).collect();
        inner.insert(RESULTS_FIELD.into(), Value::Array(items));

        let mut outer = serde_json::Map::new();
        outer.insert(T::RESPONSE_KEY.into(), Value::Object(inner));
        Value::Object(outer)
    }
}

impl<'a, T> IntoIterator for &'a ResponseCollection<T> {
    type Item = &'a T;
    type IntoIter = std::collections::btree_map::Values<'a, usize, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.values()
    }
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct TestResult {
        name: String,
    }

    impl ResultEntity for TestResult {
        const RESPONSE_KEY: &'static str = "TestResponse";
        const ENTITY_KEY: &'static str = "TestResult";

        fn from_json(raw: &Value) -> PnResult<Self> {
            let inner = raw.get(Self::ENTITY_KEY).ok_or_else(|| {
                PnError::InvalidArgument(format!("missing {} wrapper", Self::ENTITY_KEY))
            })?;
            serde_json::from_value(inner.clone())
                .map_err(|e| PnError::InvalidArgument(format!("{}: {e}", Self::ENTITY_KEY)))
        }

        fn to_json(&self) -> Value {
            serde_json::to_value(self).unwrap_or(Value::Null)
        }
    }

    fn entity(name: &str) -> TestResult {
        TestResult { name: name.into() }
    }

    fn three_entities() -> ResponseCollection<TestResult> {
        ResponseCollection::with_results(
            vec![entity("a"), entity("b"), entity("c")],
            None,
            None,
            None,
        )
    }

    #[test]
    fn test_with_results_preserves_order() {
        let collection = three_entities();
        let names: Vec<&str> = collection.results().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c"]);
        assert_eq!(collection.len(), 3);
    }

    #[test]
    fn test_fluent_metadata_setters() {
        let mut collection: ResponseCollection<TestResult> = ResponseCollection::new();
        collection
            .set_total_pages(Some("3".into()))
            .set_requested_page(Some("1".into()))
            .set_result_count(Some("25".into()))
            .set_postnl_key(Some("token".into()));
        assert_eq!(collection.total_pages(), Some("3"));
        assert_eq!(collection.requested_page(), Some("1"));
        assert_eq!(collection.result_count(), Some("25"));
        assert_eq!(collection.postnl_key(), Some("token"));
    }

    #[test]
    fn test_from_json_without_wrapper_is_empty() {
        let collection =
            ResponseCollection::<TestResult>::from_json(&serde_json::json!({})).unwrap();
        assert_eq!(collection.len(), 0);
        assert!(collection.total_pages().is_none());
        assert!(collection.requested_page().is_none());
        assert!(collection.result_count().is_none());
        assert!(collection.postnl_key().is_none());
    }

    #[test]
    fn test_from_json_full_payload() {
        let raw = serde_json::json!({
            "TestResponse": {
                "totalPages": "3",
                "requestedPage": "1",
                "result(s)": [
                    {"name": "first"},
                    {"name": "second"}
                ]
            }
        });
        let collection = ResponseCollection::<TestResult>::from_json(&raw).unwrap();
        assert_eq!(collection.total_pages(), Some("3"));
        assert_eq!(collection.requested_page(), Some("1"));
        assert!(collection.result_count().is_none());
        assert_eq!(collection.len(), 2);
        assert_eq!(collection.get(0).unwrap().name, "first");
        assert_eq!(collection.get(1).unwrap().name, "second");
    }

    #[test]
    fn test_from_json_missing_results_array() {
        let raw = serde_json::json!({"TestResponse": {"totalPages": "1"}});
        let err = ResponseCollection::<TestResult>::from_json(&raw).unwrap_err();
        assert!(matches!(err, PnError::InvalidArgument(_)));
    }

    #[test]
    fn test_from_json_non_object_first_element() {
        let raw = serde_json::json!({
            "TestResponse": {"result(s)": ["plain string", {"name": "x"}]}
        });
        let err = ResponseCollection::<TestResult>::from_json(&raw).unwrap_err();
        assert!(matches!(err, PnError::InvalidArgument(_)));
    }

    #[test]
    fn test_from_json_entity_error_propagates() {
        let raw = serde_json::json!({
            "TestResponse": {"result(s)": [{"name": "ok"}, {"wrong": true}]}
        });
        let err = ResponseCollection::<TestResult>::from_json(&raw).unwrap_err();
        assert!(matches!(err, PnError::InvalidArgument(_)));
    }

    #[test]
    fn test_push_appends_in_sequence() {
        let mut collection: ResponseCollection<TestResult> = ResponseCollection::new();
        assert_eq!(collection.push(entity("a")), 0);
        assert_eq!(collection.push(entity("b")), 1);
        assert_eq!(collection.push(entity("c")), 2);
    }

    #[test]
    fn test_insert_at_explicit_position() {
        let mut collection: ResponseCollection<TestResult> = ResponseCollection::new();
        collection.insert(5, entity("far"));
        assert_eq!(collection.get(5).unwrap().name, "far");
        assert!(collection.get(4).is_none());
        // Appending continues after the highest live position.
        assert_eq!(collection.push(entity("next")), 6);
    }

    #[test]
    fn test_remove_leaves_gap() {
        let mut collection = three_entities();
        let removed = collection.remove(1).unwrap();
        assert_eq!(removed.name, "b");
        assert_eq!(collection.len(), 2);
        assert!(!collection.contains(1));
        assert!(collection.contains(0));
        assert!(collection.contains(2));
    }

    #[test]
    fn test_cursor_traversal_skips_gap() {
        let mut collection = three_entities();
        collection.remove(1);
        collection.rewind();

        assert!(collection.valid());
        assert_eq!(collection.key(), Some(0));
        assert_eq!(collection.current().unwrap().name, "a");

        collection.advance();
        assert_eq!(collection.key(), Some(2));
        assert_eq!(collection.current().unwrap().name, "c");

        // At the end, advance is a no-op.
        collection.advance();
        assert_eq!(collection.key(), Some(2));
    }

    #[test]
    fn test_cursor_invalid_past_end() {
        let mut collection: ResponseCollection<TestResult> = ResponseCollection::new();
        assert!(!collection.valid());
        assert!(collection.key().is_none());
        assert!(collection.current().is_none());

        collection.push(entity("only"));
        collection.rewind();
        assert!(collection.valid());
    }

    #[test]
    fn test_rewind_resets_to_zero() {
        let mut collection = three_entities();
        collection.advance();
        collection.advance();
        assert_eq!(collection.key(), Some(2));
        collection.rewind();
        assert_eq!(collection.key(), Some(0));
    }

    #[test]
    fn test_borrowing_iterator_order() {
        let mut collection = three_entities();
        collection.remove(0);
        let names: Vec<&str> = (&collection).into_iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["b", "c"]);
    }

    #[test]
    fn test_round_trip() {
        let raw = serde_json::json!({
            "TestResponse": {
                "totalPages": "2",
                "requestedPage": "1",
                "resultCount": "2",
                "postnlKey": "abc",
                "result(s)": [
                    {"name": "first"},
                    {"name": "second"}
                ]
            }
        });
        let collection = ResponseCollection::<TestResult>::from_json(&raw).unwrap();
        let reparsed =
            ResponseCollection::<TestResult>::from_json(&collection.to_json()).unwrap();

        assert_eq!(reparsed.total_pages(), collection.total_pages());
        assert_eq!(reparsed.requested_page(), collection.requested_page());
        assert_eq!(reparsed.result_count(), collection.result_count());
        assert_eq!(reparsed.postnl_key(), collection.postnl_key());
        assert_eq!(
            reparsed.results().into_iter().cloned().collect::<Vec<_>>(),
            collection.results().into_iter().cloned().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_set_results_discards_gaps() {
        let mut collection = three_entities();
        collection.remove(1);
        collection.set_results(vec![entity("x"), entity("y")]);
        assert_eq!(collection.len(), 2);
        assert_eq!(collection.get(0).unwrap().name, "x");
        assert_eq!(collection.get(1).unwrap().name, "y");
    }
}
