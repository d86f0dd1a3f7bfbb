use std::sync::{Arc, RwLock};
use async_trait::async_trait;
use mongodb::bson::{oid::ObjectId, Document};

use crate::models::record::{display_bson, fields};
use super::errors::RepositoryError;
use super::records::RecordRepositoryTrait;

/// In-memory storage for documents, kept in insertion order
#[derive(Debug, Clone, Default)]
pub struct InMemoryRecordRepository {
    /// Storage shared by all clones
    documents: Arc<RwLock<Vec<Document>>>,
    /// When set, every operation reports the store as unavailable
    failing: bool,
}

impl InMemoryRecordRepository {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-loaded with documents
    pub fn with_documents(documents: Vec<Document>) -> Self {
        Self {
            documents: Arc::new(RwLock::new(documents)),
            failing: false,
        }
    }

    /// Create a store whose every operation fails
    #[cfg(any(test, feature = "mock"))]
    pub fn failing() -> Self {
        Self {
            documents: Arc::default(),
            failing: true,
        }
    }

    /// Number of stored documents
    pub fn len(&self) -> Result<usize, RepositoryError> {
        Ok(self.documents.read()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, RepositoryError> {
        Ok(self.len()? == 0)
    }

    fn check_available(&self) -> Result<(), RepositoryError> {
        if self.failing {
            Err(RepositoryError::Unavailable("in-memory store is configured to fail".to_string()))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl RecordRepositoryTrait for InMemoryRecordRepository {
    async fn insert(&self, mut document: Document) -> Result<String, RepositoryError> {
        self.check_available()?;

        if !document.contains_key(fields::ID) {
            document.insert(fields::ID, ObjectId::new());
        }
        let id = document.get(fields::ID).map(display_bson).unwrap_or_default();

        self.documents.write()?.push(document);
        Ok(id)
    }

    async fn find_all(&self) -> Result<Vec<Document>, RepositoryError> {
        self.check_available()?;
        Ok(self.documents.read()?.clone())
    }

    async fn ping(&self) -> Result<(), RepositoryError> {
        self.check_available()
    }
}
