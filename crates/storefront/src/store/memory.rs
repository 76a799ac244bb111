//! In-process document store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::{Document, DocumentStore, FieldUpdate, Snapshot, StoreError};

/// Default ceiling on the number of values accepted by an "in" query.
pub const DEFAULT_IN_QUERY_LIMIT: usize = 30;

/// Document store kept in memory.
///
/// Collections preserve insertion order. The store can be switched offline to
/// simulate transport failures, and enforces a ceiling on "in" query sizes the
/// same way hosted document databases do.
#[derive(Debug)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, Vec<Snapshot>>>,
    offline: AtomicBool,
    in_query_limit: usize,
    queries: AtomicUsize,
    writes: AtomicUsize,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::with_in_query_limit(DEFAULT_IN_QUERY_LIMIT)
    }

    /// Create an empty store with a custom "in" query ceiling.
    #[must_use]
    pub fn with_in_query_limit(in_query_limit: usize) -> Self {
        Self {
            collections: RwLock::new(HashMap::new()),
            offline: AtomicBool::new(false),
            in_query_limit,
            queries: AtomicUsize::new(0),
            writes: AtomicUsize::new(0),
        }
    }

    /// Add a document under a freshly generated id and return that id.
    pub async fn add(&self, collection: &str, data: Document) -> String {
        let id = uuid::Uuid::new_v4().simple().to_string();
        self.collections
            .write()
            .await
            .entry(collection.to_owned())
            .or_default()
            .push(Snapshot {
                id: id.clone(),
                data,
            });
        id
    }

    /// Make every subsequent call fail with [`StoreError::Unavailable`].
    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    /// Number of `list`/`query_in` calls served so far.
    #[must_use]
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    /// Number of `set`/`update` calls applied so far.
    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    fn ensure_online(&self) -> Result<(), StoreError> {
        if self.offline.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("store is offline".to_owned()));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        self.ensure_online()?;
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|doc| doc.id == id))
            .map(|doc| doc.data.clone()))
    }

    async fn set(&self, collection: &str, id: &str, document: Document) -> Result<(), StoreError> {
        self.ensure_online()?;
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_owned()).or_default();
        match docs.iter_mut().find(|doc| doc.id == id) {
            Some(existing) => existing.data = document,
            None => docs.push(Snapshot {
                id: id.to_owned(),
                data: document,
            }),
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        updates: Vec<(String, FieldUpdate)>,
    ) -> Result<(), StoreError> {
        self.ensure_online()?;
        let mut collections = self.collections.write().await;
        let doc = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|doc| doc.id == id))
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.to_owned(),
                id: id.to_owned(),
            })?;

        // Validate everything first so a rejected update leaves the document untouched.
        for (field, update) in &updates {
            let is_array_op = matches!(
                update,
                FieldUpdate::ArrayUnion(_) | FieldUpdate::ArrayRemove(_)
            );
            if is_array_op
                && let Some(current) = doc.data.get(field)
                && !current.is_array()
            {
                return Err(StoreError::Rejected(format!(
                    "field {field} is not an array"
                )));
            }
        }

        for (field, update) in updates {
            apply_update(&mut doc.data, field, update);
        }
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn list(&self, collection: &str) -> Result<Vec<Snapshot>, StoreError> {
        self.ensure_online()?;
        self.queries.fetch_add(1, Ordering::SeqCst);
        let collections = self.collections.read().await;
        Ok(collections.get(collection).cloned().unwrap_or_default())
    }

    async fn query_in(
        &self,
        collection: &str,
        field: &str,
        values: &[Value],
    ) -> Result<Vec<Snapshot>, StoreError> {
        self.ensure_online()?;
        if values.is_empty() {
            return Err(StoreError::Rejected(
                "'in' filter requires a non-empty value list".to_owned(),
            ));
        }
        if values.len() > self.in_query_limit {
            return Err(StoreError::Rejected(format!(
                "'in' filter supports at most {} values (got {})",
                self.in_query_limit,
                values.len()
            )));
        }

        self.queries.fetch_add(1, Ordering::SeqCst);
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .map(|docs| {
                docs.iter()
                    .filter(|doc| doc.data.get(field).is_some_and(|v| values.contains(v)))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default())
    }
}

fn apply_update(data: &mut Document, field: String, update: FieldUpdate) {
    match update {
        FieldUpdate::Set(value) => {
            data.insert(field, value);
        }
        FieldUpdate::ArrayUnion(values) => {
            let entry = data
                .entry(field)
                .or_insert_with(|| Value::Array(Vec::new()));
            if let Value::Array(items) = entry {
                for value in values {
                    if !items.contains(&value) {
                        items.push(value);
                    }
                }
            }
        }
        FieldUpdate::ArrayRemove(values) => {
            if let Some(Value::Array(items)) = data.get_mut(&field) {
                items.retain(|item| !values.contains(item));
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn doc(value: Value) -> Document {
        match value {
            Value::Object(map) => map,
            _ => Document::new(),
        }
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let store = MemoryStore::new();
        store.set("users", "u1", doc(json!({"name": "Ann"}))).await.unwrap();

        let read = store.get("users", "u1").await.unwrap().unwrap();
        assert_eq!(read.get("name"), Some(&json!("Ann")));
        assert!(store.get("users", "u2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_missing_document_fails() {
        let store = MemoryStore::new();
        let err = store
            .update("users", "ghost", vec![("name".into(), FieldUpdate::Set(json!("x")))])
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_array_union_and_remove_are_set_operations() {
        let store = MemoryStore::new();
        store.set("users", "u1", doc(json!({"favorites": ["a"]}))).await.unwrap();

        store
            .update(
                "users",
                "u1",
                vec![("favorites".into(), FieldUpdate::ArrayUnion(vec![json!("a"), json!("b")]))],
            )
            .await
            .unwrap();
        let read = store.get("users", "u1").await.unwrap().unwrap();
        assert_eq!(read.get("favorites"), Some(&json!(["a", "b"])));

        store
            .update(
                "users",
                "u1",
                vec![("favorites".into(), FieldUpdate::ArrayRemove(vec![json!("a")]))],
            )
            .await
            .unwrap();
        let read = store.get("users", "u1").await.unwrap().unwrap();
        assert_eq!(read.get("favorites"), Some(&json!(["b"])));
    }

    #[tokio::test]
    async fn test_array_union_creates_missing_field() {
        let store = MemoryStore::new();
        store.set("users", "u1", Document::new()).await.unwrap();
        store
            .update(
                "users",
                "u1",
                vec![("favorites".into(), FieldUpdate::ArrayUnion(vec![json!("p1")]))],
            )
            .await
            .unwrap();
        let read = store.get("users", "u1").await.unwrap().unwrap();
        assert_eq!(read.get("favorites"), Some(&json!(["p1"])));
    }

    #[tokio::test]
    async fn test_array_op_on_scalar_is_rejected_without_side_effects() {
        let store = MemoryStore::new();
        store
            .set("users", "u1", doc(json!({"favorites": "oops", "name": "A"})))
            .await
            .unwrap();
        let err = store
            .update(
                "users",
                "u1",
                vec![
                    ("name".into(), FieldUpdate::Set(json!("B"))),
                    ("favorites".into(), FieldUpdate::ArrayUnion(vec![json!("p1")])),
                ],
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Rejected(_)));
        let read = store.get("users", "u1").await.unwrap().unwrap();
        assert_eq!(read.get("name"), Some(&json!("A")));
    }

    #[tokio::test]
    async fn test_query_in_enforces_limit() {
        let store = MemoryStore::with_in_query_limit(2);
        store.add("products", doc(json!({"id": "a"}))).await;
        store.add("products", doc(json!({"id": "b"}))).await;

        let found = store
            .query_in("products", "id", &[json!("a"), json!("zzz")])
            .await
            .unwrap();
        assert_eq!(found.len(), 1);

        let err = store
            .query_in("products", "id", &[json!("a"), json!("b"), json!("c")])
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Rejected(_)));
        assert!(store.query_in("products", "id", &[]).await.is_err());
    }

    #[tokio::test]
    async fn test_list_preserves_insertion_order() {
        let store = MemoryStore::new();
        for name in ["one", "two", "three"] {
            store.add("products", doc(json!({"name": name}))).await;
        }
        let names: Vec<Value> = store
            .list("products")
            .await
            .unwrap()
            .into_iter()
            .filter_map(|snap| snap.data.get("name").cloned())
            .collect();
        assert_eq!(names, [json!("one"), json!("two"), json!("three")]);
        assert_eq!(store.query_count(), 1);
    }

    #[tokio::test]
    async fn test_offline_store_fails_every_call() {
        let store = MemoryStore::new();
        store.set_offline(true);
        assert!(matches!(
            store.list("products").await,
            Err(StoreError::Unavailable(_))
        ));
        assert!(store.get("users", "u1").await.is_err());
        store.set_offline(false);
        assert!(store.list("products").await.is_ok());
    }
}
