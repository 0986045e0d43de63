//! User story service: the guarded story lifecycle.
//!
//! Every status change, epic link and deletion is checked by the lifecycle
//! rules in [`crate::backlog::validation`] before anything is written.

use super::{error::rejected, lookup, BacklogServiceResult, ProductBacklogService};
use crate::backlog::{
    domain::{
        AcceptanceCriteria, CascadePlan, EpicId, ProductBacklogId, SprintBacklogId,
        StoryNarrative, TransitionGuard, UserStory, UserStoryDraft, UserStoryId, UserStoryName,
        UserStoryStatus,
    },
    ports::{BacklogRepository, UnitOfWork},
    validation::validate_can_delete,
};
use mockable::Clock;
use std::sync::Arc;
use tracing::info;

/// Request payload for creating or replacing a user story.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserStoryRequest {
    name: String,
    role: String,
    feature: String,
    benefit: String,
    priority: i32,
    status: Option<UserStoryStatus>,
}

impl UserStoryRequest {
    /// Creates a request with the required name and narrative parts.
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        role: impl Into<String>,
        feature: impl Into<String>,
        benefit: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            role: role.into(),
            feature: feature.into(),
            benefit: benefit.into(),
            priority: 0,
            status: None,
        }
    }

    /// Sets the priority. Lower values are more important.
    #[must_use]
    pub const fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Records a status on the request.
    ///
    /// Creation and update never honour it: new stories start in `todo` and
    /// status only moves through [`UserStoryService::change_status`].
    #[must_use]
    pub const fn with_status(mut self, status: UserStoryStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub(super) const fn requested_status(&self) -> Option<UserStoryStatus> {
        self.status
    }

    pub(super) fn into_draft(self) -> BacklogServiceResult<UserStoryDraft> {
        Ok(UserStoryDraft {
            name: UserStoryName::new(self.name)?,
            narrative: StoryNarrative::new(self.role, self.feature, self.benefit)?,
            priority: self.priority,
        })
    }
}

/// User story orchestration service.
#[derive(Clone)]
pub struct UserStoryService<R, C>
where
    R: BacklogRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> UserStoryService<R, C>
where
    R: BacklogRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new user story service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Creates a story in a product backlog.
    ///
    /// Equivalent to [`ProductBacklogService::add_user_story`].
    ///
    /// # Errors
    ///
    /// Returns [`super::BacklogServiceError`] when the backlog does not exist,
    /// the request is invalid, or persistence fails.
    pub async fn create(
        &self,
        product_backlog_id: ProductBacklogId,
        request: UserStoryRequest,
    ) -> BacklogServiceResult<UserStory> {
        ProductBacklogService::new(Arc::clone(&self.repository), Arc::clone(&self.clock))
            .add_user_story(product_backlog_id, request)
            .await
    }

    /// Finds a story by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`super::BacklogServiceError::NotFound`] when the story does
    /// not exist.
    pub async fn find_by_id(&self, id: UserStoryId) -> BacklogServiceResult<UserStory> {
        lookup::user_story(&*self.repository, id).await
    }

    /// Replaces name, narrative and priority. A status on the request is
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns [`super::BacklogServiceError`] when the story does not exist,
    /// the request is invalid, or persistence fails.
    pub async fn update(
        &self,
        id: UserStoryId,
        request: UserStoryRequest,
    ) -> BacklogServiceResult<UserStory> {
        let mut story = lookup::user_story(&*self.repository, id).await?;
        story.apply(request.into_draft()?, &*self.clock);
        self.commit_update(story, "updated user story").await
    }

    /// Moves the story to `status`.
    ///
    /// # Errors
    ///
    /// Returns [`super::BacklogServiceError::NotFound`] when the story does
    /// not exist and a lifecycle error when entering `done` with unmet
    /// acceptance criteria.
    pub async fn change_status(
        &self,
        id: UserStoryId,
        status: UserStoryStatus,
    ) -> BacklogServiceResult<UserStory> {
        let mut story = lookup::user_story(&*self.repository, id).await?;
        let criteria = match status.entry_guard() {
            TransitionGuard::AllCriteriaMet => {
                self.repository.acceptance_criteria_by_user_story(id).await?
            }
            TransitionGuard::Unguarded => Vec::new(),
        };
        story
            .change_status(status, &criteria, &*self.clock)
            .map_err(rejected)?;
        self.repository
            .commit(UnitOfWork::new().update(story.clone()))
            .await?;
        info!(user_story_id = %id, status = %status, "changed user story status");
        Ok(story)
    }

    /// Links the story to an epic.
    ///
    /// # Errors
    ///
    /// Returns [`super::BacklogServiceError::NotFound`] when either entity is
    /// missing and a lifecycle error when the story is not in `todo`.
    pub async fn link_to_epic(
        &self,
        id: UserStoryId,
        epic_id: EpicId,
    ) -> BacklogServiceResult<UserStory> {
        let mut story = lookup::user_story(&*self.repository, id).await?;
        lookup::epic(&*self.repository, epic_id).await?;
        story.link_to_epic(epic_id, &*self.clock).map_err(rejected)?;
        self.repository
            .commit(UnitOfWork::new().update(story.clone()))
            .await?;
        info!(user_story_id = %id, epic_id = %epic_id, "linked user story to epic");
        Ok(story)
    }

    /// Clears the story's epic link.
    ///
    /// # Errors
    ///
    /// Returns [`super::BacklogServiceError`] when the story does not exist
    /// or persistence fails.
    pub async fn unlink_from_epic(&self, id: UserStoryId) -> BacklogServiceResult<UserStory> {
        let mut story = lookup::user_story(&*self.repository, id).await?;
        story.unlink_from_epic(&*self.clock);
        self.commit_update(story, "unlinked user story from epic").await
    }

    /// Assigns the story to a sprint. It leaves its product backlog.
    ///
    /// # Errors
    ///
    /// Returns [`super::BacklogServiceError::NotFound`] when either entity is
    /// missing.
    pub async fn move_to_sprint(
        &self,
        id: UserStoryId,
        sprint_backlog_id: SprintBacklogId,
    ) -> BacklogServiceResult<UserStory> {
        let mut story = lookup::user_story(&*self.repository, id).await?;
        lookup::sprint_backlog(&*self.repository, sprint_backlog_id).await?;
        story.move_to_sprint(sprint_backlog_id, &*self.clock);
        self.repository
            .commit(UnitOfWork::new().update(story.clone()))
            .await?;
        info!(
            user_story_id = %id,
            sprint_backlog_id = %sprint_backlog_id,
            "moved user story to sprint"
        );
        Ok(story)
    }

    /// Returns the story's acceptance criteria.
    ///
    /// # Errors
    ///
    /// Returns [`super::BacklogServiceError::NotFound`] when the story does
    /// not exist.
    pub async fn acceptance_criteria(
        &self,
        id: UserStoryId,
    ) -> BacklogServiceResult<Vec<AcceptanceCriteria>> {
        lookup::user_story(&*self.repository, id).await?;
        Ok(self.repository.acceptance_criteria_by_user_story(id).await?)
    }

    /// Returns the stories in a product backlog with the given status.
    ///
    /// # Errors
    ///
    /// Returns [`super::BacklogServiceError::NotFound`] when the backlog does
    /// not exist.
    pub async fn by_status_and_product_backlog(
        &self,
        status: UserStoryStatus,
        product_backlog_id: ProductBacklogId,
    ) -> BacklogServiceResult<Vec<UserStory>> {
        lookup::product_backlog(&*self.repository, product_backlog_id).await?;
        Ok(self
            .repository
            .user_stories_by_status_and_product_backlog(status, product_backlog_id)
            .await?)
    }

    /// Returns the stories linked to an epic.
    ///
    /// # Errors
    ///
    /// Returns [`super::BacklogServiceError::NotFound`] when the epic does
    /// not exist.
    pub async fn by_epic(&self, epic_id: EpicId) -> BacklogServiceResult<Vec<UserStory>> {
        lookup::epic(&*self.repository, epic_id).await?;
        Ok(self.repository.user_stories_by_epic(epic_id).await?)
    }

    /// Returns the stories assigned to a sprint.
    ///
    /// # Errors
    ///
    /// Returns [`super::BacklogServiceError::NotFound`] when the sprint does
    /// not exist.
    pub async fn by_sprint_backlog(
        &self,
        sprint_backlog_id: SprintBacklogId,
    ) -> BacklogServiceResult<Vec<UserStory>> {
        lookup::sprint_backlog(&*self.repository, sprint_backlog_id).await?;
        Ok(self
            .repository
            .user_stories_by_sprint_backlog(sprint_backlog_id)
            .await?)
    }

    /// Deletes a `todo` story with its acceptance criteria and tasks.
    ///
    /// # Errors
    ///
    /// Returns [`super::BacklogServiceError::NotFound`] when the story does
    /// not exist and a lifecycle error when it has left `todo`.
    pub async fn delete(&self, id: UserStoryId) -> BacklogServiceResult<()> {
        let story = lookup::user_story(&*self.repository, id).await?;
        validate_can_delete(&story).map_err(rejected)?;
        let dependents = lookup::story_dependents(&*self.repository, id).await?;
        let plan = CascadePlan::user_story(dependents);
        let removed = plan.len();
        self.repository
            .commit(UnitOfWork::new().cascade(plan))
            .await?;
        info!(user_story_id = %id, removed, "deleted user story");
        Ok(())
    }

    async fn commit_update(
        &self,
        story: UserStory,
        message: &'static str,
    ) -> BacklogServiceResult<UserStory> {
        self.repository
            .commit(UnitOfWork::new().update(story.clone()))
            .await?;
        info!(user_story_id = %story.id(), "{message}");
        Ok(story)
    }
}
