// Repository module structure
pub mod errors;
mod records;
mod in_memory;

// Re-export commonly used types
pub use errors::RepositoryError;
pub use records::{MongoRecordRepository, RecordRepositoryTrait};
pub use in_memory::InMemoryRecordRepository;
