//! Shared test helpers for in-memory backlog integration tests.

use agile_backlog::backlog::{
    adapters::memory::InMemoryBacklogStore,
    domain::{
        ProductBacklog, ProductBacklogId, ProductBacklogName, StoryHome, StoryNarrative,
        UserStory, UserStoryDraft, UserStoryName,
    },
    services::BacklogServices,
};
use mockable::DefaultClock;
use rstest::fixture;
use std::sync::Arc;

/// Service bundle over an in-memory store.
pub type InMemoryServices = BacklogServices<InMemoryBacklogStore, DefaultClock>;

/// Provides a fresh in-memory store for each test.
#[fixture]
pub fn store() -> InMemoryBacklogStore {
    InMemoryBacklogStore::new()
}

/// Provides a clock for entity creation.
#[fixture]
pub fn clock() -> DefaultClock {
    DefaultClock
}

/// Builds the service bundle over a clone of `store`.
pub fn services_over(store: &InMemoryBacklogStore) -> InMemoryServices {
    BacklogServices::new(Arc::new(store.clone()), Arc::new(DefaultClock))
}

/// Creates an unpersisted product backlog.
///
/// # Errors
///
/// Returns an error if the name is invalid.
pub fn backlog(name: &str, clock: &DefaultClock) -> eyre::Result<ProductBacklog> {
    Ok(ProductBacklog::new(ProductBacklogName::new(name)?, clock))
}

/// Creates an unpersisted story living in `product_backlog_id`.
///
/// # Errors
///
/// Returns an error if the name or narrative is invalid.
pub fn story_in(
    product_backlog_id: ProductBacklogId,
    name: &str,
    priority: i32,
    clock: &DefaultClock,
) -> eyre::Result<UserStory> {
    let draft = UserStoryDraft {
        name: UserStoryName::new(name)?,
        narrative: StoryNarrative::new("user", "the feature", "it helps")?,
        priority,
    };
    Ok(UserStory::new(
        draft,
        StoryHome::ProductBacklog(product_backlog_id),
        clock,
    ))
}
