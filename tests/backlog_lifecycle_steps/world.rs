//! Shared world state for backlog lifecycle BDD scenarios.

use std::sync::Arc;

use agile_backlog::backlog::{
    adapters::memory::InMemoryBacklogStore,
    domain::{ProductBacklog, Project, SprintBacklog, UserStory},
    services::{BacklogServiceError, BacklogServices, UserStoryRequest},
};
use mockable::DefaultClock;
use rstest::fixture;

/// Service bundle used by the BDD world.
pub type TestServices = BacklogServices<InMemoryBacklogStore, DefaultClock>;

/// Scenario world for backlog lifecycle behaviour tests.
pub struct BacklogWorld {
    pub services: TestServices,
    pub project: Option<Project>,
    pub product_backlog: Option<ProductBacklog>,
    pub sprint_backlog: Option<SprintBacklog>,
    pub story: Option<UserStory>,
    pub last_error: Option<BacklogServiceError>,
}

impl BacklogWorld {
    /// Creates a world over an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            services: BacklogServices::new(
                Arc::new(InMemoryBacklogStore::new()),
                Arc::new(DefaultClock),
            ),
            project: None,
            product_backlog: None,
            sprint_backlog: None,
            story: None,
            last_error: None,
        }
    }

    /// Returns the backlog created by an earlier step.
    ///
    /// # Errors
    ///
    /// Returns an error if no backlog was created.
    pub fn product_backlog(&self) -> Result<&ProductBacklog, eyre::Report> {
        self.product_backlog
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing product backlog in scenario world"))
    }

    /// Returns the story created by an earlier step.
    ///
    /// # Errors
    ///
    /// Returns an error if no story was created.
    pub fn story(&self) -> Result<&UserStory, eyre::Report> {
        self.story
            .as_ref()
            .ok_or_else(|| eyre::eyre!("missing user story in scenario world"))
    }

    /// Records the outcome of a step that is allowed to fail.
    pub fn record<T>(&mut self, result: Result<T, BacklogServiceError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.last_error = Some(err);
                None
            }
        }
    }
}

impl Default for BacklogWorld {
    fn default() -> Self {
        Self::new()
    }
}

/// Builds a story request with a fixed narrative.
#[must_use]
pub fn story_request(name: String) -> UserStoryRequest {
    UserStoryRequest::new(name, "customer", "to reset my password", "I can log in again")
}

/// Fixture that creates a new scenario world.
#[fixture]
pub fn world() -> BacklogWorld {
    BacklogWorld::default()
}

/// Runs an async operation within sync step definitions.
pub fn run_async<T>(future: impl std::future::Future<Output = T>) -> T {
    tokio::task::block_in_place(|| tokio::runtime::Handle::current().block_on(future))
}
