//! Sprint backlog service.

use super::{error::rejected, lookup, BacklogServiceResult, UserStoryRequest};
use crate::backlog::{
    domain::{
        CascadePlan, ProductBacklogId, SprintBacklog, SprintBacklogId, SprintBacklogName,
        StoryHome, UserStory, UserStoryId,
    },
    ports::{BacklogRepository, UnitOfWork},
    validation::validate_story_in_sprint,
};
use mockable::Clock;
use std::sync::Arc;
use tracing::{debug, info};

/// Request payload for creating or renaming a sprint backlog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SprintBacklogRequest {
    name: String,
}

impl SprintBacklogRequest {
    /// Creates a request with the required name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Sprint backlog orchestration service.
#[derive(Clone)]
pub struct SprintBacklogService<R, C>
where
    R: BacklogRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> SprintBacklogService<R, C>
where
    R: BacklogRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new sprint backlog service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Plans a sprint from a product backlog.
    ///
    /// # Errors
    ///
    /// Returns [`super::BacklogServiceError`] when the backlog does not exist,
    /// the name is invalid, or persistence fails.
    pub async fn create(
        &self,
        product_backlog_id: ProductBacklogId,
        request: SprintBacklogRequest,
    ) -> BacklogServiceResult<SprintBacklog> {
        let mut backlog = lookup::product_backlog(&*self.repository, product_backlog_id).await?;
        let name = SprintBacklogName::new(request.name)?;
        let sprint = SprintBacklog::new(name, product_backlog_id, &*self.clock);
        backlog.touch(&*self.clock);
        self.repository
            .commit(UnitOfWork::new().insert(sprint.clone()).update(backlog))
            .await?;
        info!(
            product_backlog_id = %product_backlog_id,
            sprint_backlog_id = %sprint.id(),
            "created sprint backlog"
        );
        Ok(sprint)
    }

    /// Finds a sprint by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`super::BacklogServiceError::NotFound`] when the sprint does
    /// not exist.
    pub async fn find_by_id(&self, id: SprintBacklogId) -> BacklogServiceResult<SprintBacklog> {
        lookup::sprint_backlog(&*self.repository, id).await
    }

    /// Returns every sprint.
    ///
    /// # Errors
    ///
    /// Returns [`super::BacklogServiceError::Repository`] when persistence
    /// lookup fails.
    pub async fn list_all(&self) -> BacklogServiceResult<Vec<SprintBacklog>> {
        Ok(self.repository.all_sprint_backlogs().await?)
    }

    /// Renames a sprint.
    ///
    /// # Errors
    ///
    /// Returns [`super::BacklogServiceError`] when the sprint does not exist,
    /// the name is invalid, or persistence fails.
    pub async fn rename(
        &self,
        id: SprintBacklogId,
        request: SprintBacklogRequest,
    ) -> BacklogServiceResult<SprintBacklog> {
        let mut sprint = lookup::sprint_backlog(&*self.repository, id).await?;
        sprint.rename(SprintBacklogName::new(request.name)?, &*self.clock);
        self.repository
            .commit(UnitOfWork::new().update(sprint.clone()))
            .await?;
        info!(sprint_backlog_id = %id, "renamed sprint backlog");
        Ok(sprint)
    }

    /// Returns the stories assigned to the sprint.
    ///
    /// # Errors
    ///
    /// Returns [`super::BacklogServiceError::NotFound`] when the sprint does
    /// not exist.
    pub async fn user_stories(&self, id: SprintBacklogId) -> BacklogServiceResult<Vec<UserStory>> {
        lookup::sprint_backlog(&*self.repository, id).await?;
        Ok(self.repository.user_stories_by_sprint_backlog(id).await?)
    }

    /// Creates a story directly inside the sprint. It starts in `todo`.
    ///
    /// # Errors
    ///
    /// Returns [`super::BacklogServiceError`] when the sprint does not exist,
    /// the request is invalid, or persistence fails.
    pub async fn add_user_story(
        &self,
        id: SprintBacklogId,
        request: UserStoryRequest,
    ) -> BacklogServiceResult<UserStory> {
        let mut sprint = lookup::sprint_backlog(&*self.repository, id).await?;
        if let Some(status) = request.requested_status() {
            debug!(requested = %status, "new stories start in todo; requested status ignored");
        }
        let story = UserStory::new(
            request.into_draft()?,
            StoryHome::SprintBacklog(id),
            &*self.clock,
        );
        sprint.touch(&*self.clock);
        self.repository
            .commit(UnitOfWork::new().insert(story.clone()).update(sprint))
            .await?;
        info!(
            sprint_backlog_id = %id,
            user_story_id = %story.id(),
            "added user story to sprint backlog"
        );
        Ok(story)
    }

    /// Deletes a story assigned to the sprint, with its criteria and tasks.
    ///
    /// # Errors
    ///
    /// Returns [`super::BacklogServiceError::NotFound`] when either entity is
    /// missing and a lifecycle error when the story is not in this sprint.
    pub async fn remove_user_story(
        &self,
        id: SprintBacklogId,
        story_id: UserStoryId,
    ) -> BacklogServiceResult<()> {
        let mut sprint = lookup::sprint_backlog(&*self.repository, id).await?;
        let story = lookup::user_story(&*self.repository, story_id).await?;
        validate_story_in_sprint(&story, id).map_err(rejected)?;
        let dependents = lookup::story_dependents(&*self.repository, story_id).await?;
        let plan = CascadePlan::user_story(dependents);
        let removed = plan.len();
        sprint.touch(&*self.clock);
        self.repository
            .commit(UnitOfWork::new().update(sprint).cascade(plan))
            .await?;
        info!(
            sprint_backlog_id = %id,
            user_story_id = %story_id,
            removed,
            "removed user story from sprint backlog"
        );
        Ok(())
    }

    /// Deletes the sprint. Its stories return to the sprint's product
    /// backlog.
    ///
    /// # Errors
    ///
    /// Returns [`super::BacklogServiceError`] when the sprint does not exist
    /// or persistence fails.
    pub async fn delete(&self, id: SprintBacklogId) -> BacklogServiceResult<()> {
        let sprint = lookup::sprint_backlog(&*self.repository, id).await?;
        let mut stories = self.repository.user_stories_by_sprint_backlog(id).await?;
        for story in &mut stories {
            story.return_to_backlog(sprint.product_backlog_id(), &*self.clock);
        }
        let returned = stories.len();
        self.repository
            .commit(UnitOfWork::new().update_all(stories).remove(id))
            .await?;
        info!(sprint_backlog_id = %id, returned, "deleted sprint backlog");
        Ok(())
    }
}
