//! Repository ports for backlog lookups.
//!
//! Each aggregate gets a finder trait. Writes never go through these traits;
//! they are collected into a [`super::UnitOfWork`] and committed through
//! [`super::UnitOfWorkPort`] so multi-entity operations apply atomically.

use super::UnitOfWorkPort;
use crate::backlog::domain::{
    AcceptanceCriteria, AcceptanceCriteriaId, EntityRef, Epic, EpicId, ProductBacklog,
    ProductBacklogId, Project, ProjectId, ProjectStatus, SprintBacklog, SprintBacklogId, Task,
    TaskId, TaskStatus, UserStory, UserStoryId, UserStoryStatus,
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use thiserror::Error;

/// Result type for backlog repository operations.
pub type BacklogRepositoryResult<T> = Result<T, BacklogRepositoryError>;

/// Project lookups.
#[async_trait]
pub trait ProjectRepository: Send + Sync {
    /// Finds a project by identifier.
    ///
    /// Returns `None` when the project does not exist.
    async fn find_project(&self, id: ProjectId) -> BacklogRepositoryResult<Option<Project>>;

    /// Returns every project.
    async fn all_projects(&self) -> BacklogRepositoryResult<Vec<Project>>;

    /// Returns the projects in the given status.
    async fn projects_by_status(
        &self,
        status: ProjectStatus,
    ) -> BacklogRepositoryResult<Vec<Project>>;

    /// Returns projects starting strictly after `start` and ending strictly
    /// before `end`. Projects missing either date never match.
    async fn projects_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> BacklogRepositoryResult<Vec<Project>>;
}

/// Product backlog lookups.
#[async_trait]
pub trait ProductBacklogRepository: Send + Sync {
    /// Finds a product backlog by identifier.
    ///
    /// Returns `None` when the backlog does not exist.
    async fn find_product_backlog(
        &self,
        id: ProductBacklogId,
    ) -> BacklogRepositoryResult<Option<ProductBacklog>>;

    /// Returns every product backlog.
    async fn all_product_backlogs(&self) -> BacklogRepositoryResult<Vec<ProductBacklog>>;
}

/// Epic lookups.
#[async_trait]
pub trait EpicRepository: Send + Sync {
    /// Finds an epic by identifier.
    ///
    /// Returns `None` when the epic does not exist.
    async fn find_epic(&self, id: EpicId) -> BacklogRepositoryResult<Option<Epic>>;

    /// Returns every epic.
    async fn all_epics(&self) -> BacklogRepositoryResult<Vec<Epic>>;

    /// Returns the epics owned by a product backlog.
    async fn epics_by_product_backlog(
        &self,
        product_backlog_id: ProductBacklogId,
    ) -> BacklogRepositoryResult<Vec<Epic>>;

    /// Returns epics whose name contains `fragment`, ignoring case.
    async fn epics_by_name(&self, fragment: &str) -> BacklogRepositoryResult<Vec<Epic>>;

    /// Returns the number of stored epics.
    async fn count_epics(&self) -> BacklogRepositoryResult<usize>;
}

/// Sprint backlog lookups.
#[async_trait]
pub trait SprintBacklogRepository: Send + Sync {
    /// Finds a sprint backlog by identifier.
    ///
    /// Returns `None` when the sprint does not exist.
    async fn find_sprint_backlog(
        &self,
        id: SprintBacklogId,
    ) -> BacklogRepositoryResult<Option<SprintBacklog>>;

    /// Returns every sprint backlog.
    async fn all_sprint_backlogs(&self) -> BacklogRepositoryResult<Vec<SprintBacklog>>;

    /// Returns the sprints planned from a product backlog.
    async fn sprint_backlogs_by_product_backlog(
        &self,
        product_backlog_id: ProductBacklogId,
    ) -> BacklogRepositoryResult<Vec<SprintBacklog>>;
}

/// User story lookups.
#[async_trait]
pub trait UserStoryRepository: Send + Sync {
    /// Finds a user story by identifier.
    ///
    /// Returns `None` when the story does not exist.
    async fn find_user_story(&self, id: UserStoryId) -> BacklogRepositoryResult<Option<UserStory>>;

    /// Returns the stories living in a product backlog, ordered by priority
    /// ascending. Stories moved to a sprint are not included.
    async fn user_stories_by_product_backlog(
        &self,
        product_backlog_id: ProductBacklogId,
    ) -> BacklogRepositoryResult<Vec<UserStory>>;

    /// Returns the stories living in a product backlog with the given status.
    async fn user_stories_by_status_and_product_backlog(
        &self,
        status: UserStoryStatus,
        product_backlog_id: ProductBacklogId,
    ) -> BacklogRepositoryResult<Vec<UserStory>>;

    /// Returns the stories linked to an epic.
    async fn user_stories_by_epic(&self, epic_id: EpicId) -> BacklogRepositoryResult<Vec<UserStory>>;

    /// Returns the stories assigned to a sprint.
    async fn user_stories_by_sprint_backlog(
        &self,
        sprint_backlog_id: SprintBacklogId,
    ) -> BacklogRepositoryResult<Vec<UserStory>>;
}

/// Acceptance criteria lookups.
#[async_trait]
pub trait AcceptanceCriteriaRepository: Send + Sync {
    /// Finds a criterion by identifier.
    ///
    /// Returns `None` when the criterion does not exist.
    async fn find_acceptance_criteria(
        &self,
        id: AcceptanceCriteriaId,
    ) -> BacklogRepositoryResult<Option<AcceptanceCriteria>>;

    /// Returns every criterion.
    async fn all_acceptance_criteria(&self) -> BacklogRepositoryResult<Vec<AcceptanceCriteria>>;

    /// Returns the criteria owned by a story.
    async fn acceptance_criteria_by_user_story(
        &self,
        user_story_id: UserStoryId,
    ) -> BacklogRepositoryResult<Vec<AcceptanceCriteria>>;

    /// Returns the criteria with the given met flag.
    async fn acceptance_criteria_by_met(
        &self,
        met: bool,
    ) -> BacklogRepositoryResult<Vec<AcceptanceCriteria>>;
}

/// Task lookups.
#[async_trait]
pub trait TaskRepository: Send + Sync {
    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist.
    async fn find_task(&self, id: TaskId) -> BacklogRepositoryResult<Option<Task>>;

    /// Returns every task.
    async fn all_tasks(&self) -> BacklogRepositoryResult<Vec<Task>>;

    /// Returns the tasks in the given status.
    async fn tasks_by_status(&self, status: TaskStatus) -> BacklogRepositoryResult<Vec<Task>>;

    /// Returns the tasks owned by a story.
    async fn tasks_by_user_story(
        &self,
        user_story_id: UserStoryId,
    ) -> BacklogRepositoryResult<Vec<Task>>;

    /// Returns tasks starting at or after `start` and ending at or before
    /// `end`. Tasks missing either date never match.
    async fn tasks_in_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> BacklogRepositoryResult<Vec<Task>>;
}

/// The complete persistence collaborator required by backlog services.
pub trait BacklogRepository:
    ProjectRepository
    + ProductBacklogRepository
    + EpicRepository
    + SprintBacklogRepository
    + UserStoryRepository
    + AcceptanceCriteriaRepository
    + TaskRepository
    + UnitOfWorkPort
{
}

impl<T> BacklogRepository for T where
    T: ProjectRepository
        + ProductBacklogRepository
        + EpicRepository
        + SprintBacklogRepository
        + UserStoryRepository
        + AcceptanceCriteriaRepository
        + TaskRepository
        + UnitOfWorkPort
{
}

/// Errors returned by backlog repository implementations.
#[derive(Debug, Clone, Error)]
pub enum BacklogRepositoryError {
    /// An inserted entity already exists.
    #[error("duplicate {0}")]
    Duplicate(EntityRef),

    /// An updated or removed entity does not exist.
    #[error("{0} not found")]
    NotFound(EntityRef),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl BacklogRepositoryError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
