// Storage models for the shared patients collection
pub mod record;

pub use record::{
    BloodPressureProjection, BloodPressureRecord, DocumentField, PatientRecord, Record, RecordKind,
    StoredDocument,
};
