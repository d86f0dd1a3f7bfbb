pub mod health;
pub mod pages;

// Re-export handlers for easier imports
pub use health::health_check;
pub use pages::{display_data, show_form, submit_blood_pressure, submit_form, user_dashboard};
