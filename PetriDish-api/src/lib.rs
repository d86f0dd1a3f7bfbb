// PetriDish-api lib.rs
//
// HTML front end for patient registration and blood pressure readings.

// Public modules
pub mod api;
pub mod render;
