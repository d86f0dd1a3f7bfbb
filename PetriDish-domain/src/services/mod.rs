pub mod records;

// Domain services
// This module contains the intake flow between the handlers and the store.

// Re-export service traits and factory functions
pub use records::{
    create_record_service, Persistence, ReadOutcome, RecordService, RecordServiceError,
    RecordServiceTrait, SubmissionOutcome,
};
