//! Domain models and error taxonomy for the export command.

pub mod errors;
pub mod model;
