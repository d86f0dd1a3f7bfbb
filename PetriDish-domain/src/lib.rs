// PetriDish Domain
// This crate contains the intake logic for the PetriDish application

// Services that implement the intake flow
pub mod services;

// Domain entities
pub mod entities;

// Health checks and system status
pub mod health;

// Re-export the data layer for convenience
pub use petri_dish_data::{bson, database, models};

// Testing utilities - only available with mock feature
#[cfg(feature = "mock")]
pub mod testing;
