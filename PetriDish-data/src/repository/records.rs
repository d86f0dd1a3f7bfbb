use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::{Collection, Database};
use tracing::debug;

use crate::models::record::display_bson;
use super::errors::RepositoryError;

/// Repository trait for the shared patients collection
#[async_trait]
pub trait RecordRepositoryTrait: Send + Sync {
    /// Append one document, returning the identifier the store assigned
    async fn insert(&self, document: Document) -> Result<String, RepositoryError>;

    /// Every document in the collection, in store order
    async fn find_all(&self) -> Result<Vec<Document>, RepositoryError>;

    /// Check that the store answers
    async fn ping(&self) -> Result<(), RepositoryError>;
}

/// Repository backed by a MongoDB collection.
///
/// The driver pools connections internally, so clones share them.
#[derive(Debug, Clone)]
pub struct MongoRecordRepository {
    database: Database,
    collection: Collection<Document>,
}

impl MongoRecordRepository {
    /// Create a new repository
    pub fn new(database: Database, collection: Collection<Document>) -> Self {
        Self { database, collection }
    }
}

#[async_trait]
impl RecordRepositoryTrait for MongoRecordRepository {
    async fn insert(&self, document: Document) -> Result<String, RepositoryError> {
        let result = self.collection.insert_one(document, None).await?;
        let id = display_bson(&result.inserted_id);
        debug!("Inserted document {} into {}", id, self.collection.name());
        Ok(id)
    }

    async fn find_all(&self) -> Result<Vec<Document>, RepositoryError> {
        let cursor = self.collection.find(None, None).await?;
        let documents: Vec<Document> = cursor.try_collect().await?;
        debug!("Read {} documents from {}", documents.len(), self.collection.name());
        Ok(documents)
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        self.database.run_command(doc! { "ping": 1 }, None).await?;
        Ok(())
    }
}
