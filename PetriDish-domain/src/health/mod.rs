//! Domain layer health check functionality
//! This module reports whether the record store is reachable

use crate::services::RecordServiceTrait;

/// System health status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemStatus {
    /// The store answers
    Healthy,
    /// The store cannot be reached; pages still render but show no data
    Unhealthy,
}

/// Represents a health component with status and optional details
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthComponent {
    /// Status of the component
    pub status: SystemStatus,
    /// Optional details about the component status
    pub details: Option<String>,
}

/// Represents the overall health of the system
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SystemHealth {
    /// Overall system status
    pub status: SystemStatus,
    /// Record store status
    pub database: HealthComponent,
}

/// Get overall system health
pub async fn get_system_health(service: &dyn RecordServiceTrait) -> SystemHealth {
    let database = match service.check_store().await {
        Ok(()) => HealthComponent {
            status: SystemStatus::Healthy,
            details: None,
        },
        Err(e) => HealthComponent {
            status: SystemStatus::Unhealthy,
            details: Some(e.to_string()),
        },
    };

    SystemHealth {
        status: database.status,
        database,
    }
}
