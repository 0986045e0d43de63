//! Backlog domain and lifecycle consistency engine.
//!
//! Models the agile planning hierarchy (projects, product backlogs, epics,
//! sprint backlogs, user stories, acceptance criteria and tasks) and enforces
//! the lifecycle rules that keep it consistent: stories start in `todo`,
//! reach `done` only once every acceptance criterion is met, and leave the
//! graph together with everything they own. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Lifecycle rules in [`validation`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
pub mod validation;

#[cfg(test)]
mod tests;
