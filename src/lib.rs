//! Agile backlog: domain model and lifecycle rules for agile planning.
//!
//! This crate keeps a project's planning graph consistent: which stories sit
//! in which backlog or sprint, when a story may move to `done`, and what
//! disappears along with a deleted parent.
//!
//! # Architecture
//!
//! The crate follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for persistence
//! - **Adapters**: Concrete implementations of ports
//!
//! # Modules
//!
//! - [`backlog`]: Backlog entities, lifecycle validation and services

pub mod backlog;
