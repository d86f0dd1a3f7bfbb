use std::sync::Arc;
use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use petri_dish_data::bson::Document;
use petri_dish_data::models::{BloodPressureProjection, Record, RecordKind, StoredDocument};
use petri_dish_data::repository::{RecordRepositoryTrait, RepositoryError};

use crate::entities::forms::{BloodPressureForm, PatientForm};

/// Record service errors
#[derive(Debug, Error)]
pub enum RecordServiceError {
    /// Repository error
    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Whether a submitted record reached the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Persistence {
    /// Stored under the given identifier
    Stored { id: String },
    /// The store rejected the write or could not be reached
    Failed { reason: String },
}

/// Result of handling one form submission.
///
/// A failed write is a value here, not an error: the caller still answers the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionOutcome {
    pub kind: RecordKind,
    pub persistence: Persistence,
    /// Form fields that were absent or blank, stored as empty strings
    pub missing_fields: Vec<&'static str>,
}

impl SubmissionOutcome {
    pub fn is_stored(&self) -> bool {
        matches!(self.persistence, Persistence::Stored { .. })
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields.is_empty()
    }
}

/// Result of reading the collection. On failure `items` is empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadOutcome<T> {
    pub items: Vec<T>,
    pub failure: Option<String>,
}

impl<T> ReadOutcome<T> {
    pub fn loaded(items: Vec<T>) -> Self {
        Self { items, failure: None }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            items: Vec::new(),
            failure: Some(reason.into()),
        }
    }

    pub fn is_loaded(&self) -> bool {
        self.failure.is_none()
    }
}

/// Trait for record service operations
#[async_trait]
pub trait RecordServiceTrait: Send + Sync {
    /// Store a patient registration
    async fn register_patient(&self, form: PatientForm) -> SubmissionOutcome;

    /// Store a blood pressure reading
    async fn record_blood_pressure(&self, form: BloodPressureForm) -> SubmissionOutcome;

    /// Every stored document, untyped
    async fn list_documents(&self) -> ReadOutcome<StoredDocument>;

    /// Every stored document projected onto the blood pressure fields
    async fn dashboard_rows(&self) -> ReadOutcome<BloodPressureProjection>;

    /// Check that the store is reachable
    async fn check_store(&self) -> Result<(), RecordServiceError>;
}

/// Record service over an injected repository
pub struct RecordService {
    repository: Arc<dyn RecordRepositoryTrait>,
}

impl RecordService {
    /// Create a new record service
    pub fn new(repository: Arc<dyn RecordRepositoryTrait>) -> Self {
        Self { repository }
    }

    async fn submit(&self, record: Record, missing_fields: Vec<&'static str>) -> SubmissionOutcome {
        let kind = record.kind();
        let persistence = match self.store(record).await {
            Ok(id) => Persistence::Stored { id },
            Err(e) => Persistence::Failed { reason: e.to_string() },
        };

        SubmissionOutcome {
            kind,
            persistence,
            missing_fields,
        }
    }

    async fn store(&self, record: Record) -> Result<String, RecordServiceError> {
        let id = self.repository.insert(record.to_document()).await?;
        debug!("Stored {:?} record {}", record.kind(), id);
        Ok(id)
    }

    async fn load<T>(&self, convert: impl Fn(Document) -> T + Send) -> ReadOutcome<T> {
        match self.repository.find_all().await {
            Ok(documents) => ReadOutcome::loaded(documents.into_iter().map(convert).collect()),
            Err(e) => ReadOutcome::failed(RecordServiceError::from(e).to_string()),
        }
    }
}

#[async_trait]
impl RecordServiceTrait for RecordService {
    async fn register_patient(&self, form: PatientForm) -> SubmissionOutcome {
        let missing_fields = form.missing_fields();
        self.submit(form.into_record(), missing_fields).await
    }

    async fn record_blood_pressure(&self, form: BloodPressureForm) -> SubmissionOutcome {
        let missing_fields = form.missing_fields();
        self.submit(form.into_record(), missing_fields).await
    }

    async fn list_documents(&self) -> ReadOutcome<StoredDocument> {
        self.load(StoredDocument::new).await
    }

    async fn dashboard_rows(&self) -> ReadOutcome<BloodPressureProjection> {
        self.load(|document| BloodPressureProjection::from_document(&document)).await
    }

    async fn check_store(&self) -> Result<(), RecordServiceError> {
        self.repository.ping().await?;
        Ok(())
    }
}

/// Create a record service over the given repository
pub fn create_record_service(
    repository: Arc<dyn RecordRepositoryTrait>,
) -> Arc<dyn RecordServiceTrait> {
    Arc::new(RecordService::new(repository))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::mock;
    use petri_dish_data::bson::doc;
    use petri_dish_data::repository::InMemoryRecordRepository;

    mock! {
        pub Repository {}

        #[async_trait]
        impl RecordRepositoryTrait for Repository {
            async fn insert(&self, document: Document) -> Result<String, RepositoryError>;
            async fn find_all(&self) -> Result<Vec<Document>, RepositoryError>;
            async fn ping(&self) -> Result<(), RepositoryError>;
        }
    }

    fn unavailable() -> RepositoryError {
        RepositoryError::Unavailable("connection refused".to_string())
    }

    fn ana() -> PatientForm {
        PatientForm {
            full_name: Some("Ana Silva".to_string()),
            email: Some("ana@example.com".to_string()),
            cpf: Some("12345678900".to_string()),
        }
    }

    #[tokio::test]
    async fn test_register_patient_stores_exact_fields() {
        let repository = InMemoryRecordRepository::new();
        let service = RecordService::new(Arc::new(repository.clone()));

        let outcome = service.register_patient(ana()).await;
        assert!(outcome.is_stored());
        assert!(outcome.is_complete());
        assert_eq!(outcome.kind, RecordKind::Patient);

        let documents = repository.find_all().await.unwrap();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].get_str("full_name").unwrap(), "Ana Silva");
        assert_eq!(documents[0].get_str("email").unwrap(), "ana@example.com");
        assert_eq!(documents[0].get_str("cpf").unwrap(), "12345678900");
    }

    #[tokio::test]
    async fn test_insert_failure_is_reported_not_raised() {
        let mut repository = MockRepository::new();
        repository.expect_insert().times(1).returning(|_| Err(unavailable()));
        let service = RecordService::new(Arc::new(repository));

        let outcome = service
            .record_blood_pressure(BloodPressureForm {
                systolic_pressure: Some("120".to_string()),
                diastolic_pressure: Some("80".to_string()),
            })
            .await;

        assert!(!outcome.is_stored());
        assert!(matches!(
            outcome.persistence,
            Persistence::Failed { ref reason } if reason.contains("connection refused")
        ));
    }

    #[tokio::test]
    async fn test_missing_fields_are_reported_and_stored_empty() {
        let mut repository = MockRepository::new();
        repository
            .expect_insert()
            .withf(|document| {
                document == &doc! { "full_name": "", "email": "ana@example.com", "cpf": "" }
            })
            .times(1)
            .returning(|_| Ok("abc".to_string()));
        let service = RecordService::new(Arc::new(repository));

        let outcome = service
            .register_patient(PatientForm {
                email: Some("ana@example.com".to_string()),
                ..Default::default()
            })
            .await;

        assert_eq!(outcome.persistence, Persistence::Stored { id: "abc".to_string() });
        assert_eq!(outcome.missing_fields, vec!["full_name", "cpf"]);
    }

    #[tokio::test]
    async fn test_dashboard_rows_project_every_document() {
        let repository = InMemoryRecordRepository::with_documents(vec![
            doc! { "full_name": "Ana Silva", "email": "ana@example.com", "cpf": "12345678900" },
            doc! { "systolic_pressure": "120", "diastolic_pressure": "80" },
        ]);
        let service = RecordService::new(Arc::new(repository));

        let rows = service.dashboard_rows().await;
        assert!(rows.is_loaded());
        assert_eq!(rows.items.len(), 2);
        assert_eq!(rows.items[0], BloodPressureProjection::default());
        assert_eq!(rows.items[1].systolic_pressure, "120");
        assert_eq!(rows.items[1].diastolic_pressure, "80");
        assert_eq!(rows.items[1].date, "");
    }

    #[tokio::test]
    async fn test_read_failure_yields_empty_list() {
        let mut repository = MockRepository::new();
        repository.expect_find_all().returning(|| Err(unavailable()));
        let service = RecordService::new(Arc::new(repository));

        let listed = service.list_documents().await;
        assert!(listed.items.is_empty());
        assert!(listed.failure.unwrap().contains("connection refused"));

        let rows = service.dashboard_rows().await;
        assert!(!rows.is_loaded());
    }

    #[tokio::test]
    async fn test_list_documents_matches_store_count() {
        let repository = InMemoryRecordRepository::new();
        let service = create_record_service(Arc::new(repository.clone()));

        service.register_patient(ana()).await;
        service.record_blood_pressure(BloodPressureForm::default()).await;

        let listed = service.list_documents().await;
        assert_eq!(listed.items.len(), repository.len().unwrap());
        assert_eq!(listed.items[0].field("full_name"), Some("Ana Silva"));
    }

    #[tokio::test]
    async fn test_check_store_propagates_ping_failure() {
        let mut repository = MockRepository::new();
        repository.expect_ping().returning(|| Err(unavailable()));
        let service = RecordService::new(Arc::new(repository));

        assert!(service.check_store().await.is_err());
    }
}
