//! In-memory persistence for backlog entities.

mod store;

pub use store::InMemoryBacklogStore;
