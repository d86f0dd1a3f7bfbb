// Testing utilities for the domain layer
// This module is only available when the "mock" feature is enabled

use std::sync::Arc;

pub use petri_dish_data::repository::InMemoryRecordRepository;

use crate::entities::forms::{BloodPressureForm, PatientForm};
use crate::services::{RecordService, RecordServiceTrait};

/// Service over a fresh in-memory store, plus a handle to inspect that store
pub fn in_memory_service() -> (Arc<dyn RecordServiceTrait>, InMemoryRecordRepository) {
    let repository = InMemoryRecordRepository::new();
    let service: Arc<dyn RecordServiceTrait> =
        Arc::new(RecordService::new(Arc::new(repository.clone())));
    (service, repository)
}

/// Service whose store rejects every operation
pub fn failing_service() -> Arc<dyn RecordServiceTrait> {
    Arc::new(RecordService::new(Arc::new(InMemoryRecordRepository::failing())))
}

/// A fully filled-in patient form
pub fn patient_form(full_name: &str, email: &str, cpf: &str) -> PatientForm {
    PatientForm {
        full_name: Some(full_name.to_string()),
        email: Some(email.to_string()),
        cpf: Some(cpf.to_string()),
    }
}

/// A fully filled-in blood pressure form
pub fn blood_pressure_form(systolic: &str, diastolic: &str) -> BloodPressureForm {
    BloodPressureForm {
        systolic_pressure: Some(systolic.to_string()),
        diastolic_pressure: Some(diastolic.to_string()),
    }
}
