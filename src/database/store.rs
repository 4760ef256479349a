use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::{
    bson::{doc, oid::ObjectId, Document},
    Collection, Database,
};

use crate::errors::Result;

/// Schemaless per-collection record store. Every persisted entity goes
/// through this seam, so tests can swap the Mongo backend for an in-memory
/// one without touching the services.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetches a single document by id.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>>;

    /// Equality-filter query. Returned documents carry their `_id`.
    async fn find(&self, collection: &str, filter: Document) -> Result<Vec<Document>>;

    /// Inserts with a store-generated id and returns it.
    async fn insert(&self, collection: &str, document: Document) -> Result<String>;

    /// Writes the full document at a caller-chosen id, overwriting silently.
    async fn set(&self, collection: &str, id: &str, document: Document) -> Result<()>;

    /// Merges `patch` into the document's top-level fields. Returns false
    /// when no document matched.
    async fn update(&self, collection: &str, id: &str, patch: Document) -> Result<bool>;

    /// Idempotent removal.
    async fn delete(&self, collection: &str, id: &str) -> Result<()>;
}

pub struct MongoStore {
    db: Database,
}

impl MongoStore {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.db.collection::<Document>(name)
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>> {
        let found = self
            .collection(collection)
            .find_one(doc! { "_id": id })
            .await?;
        Ok(found)
    }

    async fn find(&self, collection: &str, filter: Document) -> Result<Vec<Document>> {
        let cursor = self.collection(collection).find(filter).await?;
        let documents: Vec<Document> = cursor.try_collect().await?;
        Ok(documents)
    }

    async fn insert(&self, collection: &str, mut document: Document) -> Result<String> {
        let id = ObjectId::new().to_hex();
        document.insert("_id", id.clone());
        self.collection(collection).insert_one(document).await?;
        Ok(id)
    }

    async fn set(&self, collection: &str, id: &str, mut document: Document) -> Result<()> {
        document.insert("_id", id);
        self.collection(collection)
            .replace_one(doc! { "_id": id }, document)
            .upsert(true)
            .await?;
        Ok(())
    }

    async fn update(&self, collection: &str, id: &str, patch: Document) -> Result<bool> {
        let result = self
            .collection(collection)
            .update_one(doc! { "_id": id }, doc! { "$set": patch })
            .await?;
        Ok(result.matched_count > 0)
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<()> {
        self.collection(collection)
            .delete_one(doc! { "_id": id })
            .await?;
        Ok(())
    }
}
