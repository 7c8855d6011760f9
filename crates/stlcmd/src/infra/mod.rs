//! Infrastructure adapters: host collaborator seams and configuration.

pub mod config;
pub mod headless;
pub mod host;
