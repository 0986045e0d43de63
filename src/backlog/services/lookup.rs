//! Lookups that turn a missing entity into [`BacklogServiceError::NotFound`].

use super::{BacklogServiceError, BacklogServiceResult};
use crate::backlog::{
    domain::{
        AcceptanceCriteria, AcceptanceCriteriaId, Epic, EpicId, ProductBacklog, ProductBacklogId,
        Project, ProjectId, SprintBacklog, SprintBacklogId, StoryDependents, Task, TaskId,
        UserStory, UserStoryId,
    },
    ports::{
        AcceptanceCriteriaRepository, EpicRepository, ProductBacklogRepository,
        ProjectRepository, SprintBacklogRepository, TaskRepository, UserStoryRepository,
    },
};
use std::collections::HashSet;
use tracing::debug;

pub(super) async fn project<R>(repository: &R, id: ProjectId) -> BacklogServiceResult<Project>
where
    R: ProjectRepository + ?Sized,
{
    debug!(project_id = %id, "looking up project");
    repository
        .find_project(id)
        .await?
        .ok_or(BacklogServiceError::NotFound(id.into()))
}

pub(super) async fn product_backlog<R>(
    repository: &R,
    id: ProductBacklogId,
) -> BacklogServiceResult<ProductBacklog>
where
    R: ProductBacklogRepository + ?Sized,
{
    debug!(product_backlog_id = %id, "looking up product backlog");
    repository
        .find_product_backlog(id)
        .await?
        .ok_or(BacklogServiceError::NotFound(id.into()))
}

pub(super) async fn epic<R>(repository: &R, id: EpicId) -> BacklogServiceResult<Epic>
where
    R: EpicRepository + ?Sized,
{
    debug!(epic_id = %id, "looking up epic");
    repository
        .find_epic(id)
        .await?
        .ok_or(BacklogServiceError::NotFound(id.into()))
}

pub(super) async fn sprint_backlog<R>(
    repository: &R,
    id: SprintBacklogId,
) -> BacklogServiceResult<SprintBacklog>
where
    R: SprintBacklogRepository + ?Sized,
{
    debug!(sprint_backlog_id = %id, "looking up sprint backlog");
    repository
        .find_sprint_backlog(id)
        .await?
        .ok_or(BacklogServiceError::NotFound(id.into()))
}

pub(super) async fn user_story<R>(
    repository: &R,
    id: UserStoryId,
) -> BacklogServiceResult<UserStory>
where
    R: UserStoryRepository + ?Sized,
{
    debug!(user_story_id = %id, "looking up user story");
    repository
        .find_user_story(id)
        .await?
        .ok_or(BacklogServiceError::NotFound(id.into()))
}

pub(super) async fn acceptance_criteria<R>(
    repository: &R,
    id: AcceptanceCriteriaId,
) -> BacklogServiceResult<AcceptanceCriteria>
where
    R: AcceptanceCriteriaRepository + ?Sized,
{
    debug!(acceptance_criteria_id = %id, "looking up acceptance criteria");
    repository
        .find_acceptance_criteria(id)
        .await?
        .ok_or(BacklogServiceError::NotFound(id.into()))
}

pub(super) async fn task<R>(repository: &R, id: TaskId) -> BacklogServiceResult<Task>
where
    R: TaskRepository + ?Sized,
{
    debug!(task_id = %id, "looking up task");
    repository
        .find_task(id)
        .await?
        .ok_or(BacklogServiceError::NotFound(id.into()))
}

/// Collects the ids a story's deletion cascades to.
pub(super) async fn story_dependents<R>(
    repository: &R,
    story: UserStoryId,
) -> BacklogServiceResult<StoryDependents>
where
    R: AcceptanceCriteriaRepository + TaskRepository + ?Sized,
{
    let criteria = repository
        .acceptance_criteria_by_user_story(story)
        .await?
        .iter()
        .map(AcceptanceCriteria::id)
        .collect();
    let tasks = repository
        .tasks_by_user_story(story)
        .await?
        .iter()
        .map(Task::id)
        .collect();
    Ok(StoryDependents {
        story,
        criteria,
        tasks,
    })
}

/// Collects the dependents of several stories, skipping repeats.
pub(super) async fn stories_dependents<R>(
    repository: &R,
    stories: impl IntoIterator<Item = UserStoryId>,
) -> BacklogServiceResult<Vec<StoryDependents>>
where
    R: AcceptanceCriteriaRepository + TaskRepository + ?Sized,
{
    let mut seen = HashSet::new();
    let mut dependents = Vec::new();
    for story in stories {
        if !seen.insert(story) {
            continue;
        }
        dependents.push(story_dependents(repository, story).await?);
    }
    Ok(dependents)
}
