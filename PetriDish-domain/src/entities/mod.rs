// Domain entities
pub mod forms;

// Re-export common types for easier imports
pub use forms::{BloodPressureForm, PatientForm};
