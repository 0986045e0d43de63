//! One handle over every backlog service, sharing a repository and clock.

use super::{
    AcceptanceCriteriaService, EpicService, ProductBacklogService, ProjectService,
    SprintBacklogService, TaskService, UserStoryService,
};
use crate::backlog::ports::BacklogRepository;
use mockable::Clock;
use std::sync::Arc;

/// Every backlog service wired to the same repository and clock.
#[derive(Clone)]
pub struct BacklogServices<R, C>
where
    R: BacklogRepository,
    C: Clock + Send + Sync,
{
    projects: ProjectService<R, C>,
    product_backlogs: ProductBacklogService<R, C>,
    epics: EpicService<R, C>,
    sprint_backlogs: SprintBacklogService<R, C>,
    user_stories: UserStoryService<R, C>,
    acceptance_criteria: AcceptanceCriteriaService<R, C>,
    tasks: TaskService<R, C>,
}

impl<R, C> BacklogServices<R, C>
where
    R: BacklogRepository,
    C: Clock + Send + Sync,
{
    /// Builds every service over `repository` and `clock`.
    #[must_use]
    pub fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self {
            projects: ProjectService::new(Arc::clone(&repository), Arc::clone(&clock)),
            product_backlogs: ProductBacklogService::new(
                Arc::clone(&repository),
                Arc::clone(&clock),
            ),
            epics: EpicService::new(Arc::clone(&repository), Arc::clone(&clock)),
            sprint_backlogs: SprintBacklogService::new(
                Arc::clone(&repository),
                Arc::clone(&clock),
            ),
            user_stories: UserStoryService::new(Arc::clone(&repository), Arc::clone(&clock)),
            acceptance_criteria: AcceptanceCriteriaService::new(
                Arc::clone(&repository),
                Arc::clone(&clock),
            ),
            tasks: TaskService::new(repository, clock),
        }
    }

    /// Project operations.
    #[must_use]
    pub const fn projects(&self) -> &ProjectService<R, C> {
        &self.projects
    }

    /// Product backlog operations.
    #[must_use]
    pub const fn product_backlogs(&self) -> &ProductBacklogService<R, C> {
        &self.product_backlogs
    }

    /// Epic operations.
    #[must_use]
    pub const fn epics(&self) -> &EpicService<R, C> {
        &self.epics
    }

    /// Sprint backlog operations.
    #[must_use]
    pub const fn sprint_backlogs(&self) -> &SprintBacklogService<R, C> {
        &self.sprint_backlogs
    }

    /// User story operations.
    #[must_use]
    pub const fn user_stories(&self) -> &UserStoryService<R, C> {
        &self.user_stories
    }

    /// Acceptance criteria operations.
    #[must_use]
    pub const fn acceptance_criteria(&self) -> &AcceptanceCriteriaService<R, C> {
        &self.acceptance_criteria
    }

    /// Task operations.
    #[must_use]
    pub const fn tasks(&self) -> &TaskService<R, C> {
        &self.tasks
    }
}
