// Database modules
pub mod connection;

// Re-export database connection functions
pub use connection::*;
