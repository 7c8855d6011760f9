//! Application layer: the command lifecycle and its export pipeline.

pub mod command;
pub mod export;
pub mod naming;
pub mod store;
pub mod tasks;
pub mod validate;
