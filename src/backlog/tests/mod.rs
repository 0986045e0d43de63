//! Unit tests for the backlog module.

mod service_tests;
