use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use async_trait::async_trait;
use bson::{oid::ObjectId, Document};

use super::store::DocumentStore;
use crate::errors::Result;

/// In-process store with the same contract as [`super::store::MongoStore`].
/// Backs the test suite; documents iterate in id order.
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, BTreeMap<String, Document>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn matches(document: &Document, filter: &Document) -> bool {
    filter
        .iter()
        .all(|(key, value)| document.get(key) == Some(value))
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        let collections = self.collections.read().unwrap();
        Ok(collections
            .get(collection)
            .and_then(|records| records.get(id))
            .cloned())
    }

    async fn find(&self, collection: &str, filter: Document) -> Result<Vec<Document>> {
        let collections = self.collections.read().unwrap();
        let Some(records) = collections.get(collection) else {
            return Ok(Vec::new());
        };
        Ok(records
            .values()
            .filter(|document| matches(document, &filter))
            .cloned()
            .collect())
    }

    async fn insert(&self, collection: &str, mut document: Document) -> Result<String> {
        let id = ObjectId::new().to_hex();
        document.insert("_id", id.clone());

        let mut collections = self.collections.write().unwrap();
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.clone(), document);
        Ok(id)
    }

    async fn set(&self, collection: &str, id: &str, mut document: Document) -> Result<()> {
        document.insert("_id", id);

        let mut collections = self.collections.write().unwrap();
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id.to_string(), document);
        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, patch: Document) -> Result<bool> {
        let mut collections = self.collections.write().unwrap();
        let Some(document) = collections
            .get_mut(collection)
            .and_then(|records| records.get_mut(id))
        else {
            return Ok(false);
        };

        for (key, value) in patch {
            document.insert(key, value);
        }
        Ok(true)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<()> {
        let mut collections = self.collections.write().unwrap();
        if let Some(records) = collections.get_mut(collection) {
            records.remove(id);
        }
        Ok(())
    }
}
