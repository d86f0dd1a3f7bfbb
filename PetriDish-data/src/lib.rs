// PetriDish Data
// This crate handles data access for the patients collection

// Database configuration and connection management
pub mod database;

// Repository implementations for data access
pub mod repository;

// Data storage models
pub mod models;

// Re-export the document type so callers don't need a direct mongodb dependency
pub use mongodb::bson;
