//! Commands module - service layer for policy simulation runs

pub(crate) mod service;
mod simulate;

pub use service::PolicySimulatorService;
