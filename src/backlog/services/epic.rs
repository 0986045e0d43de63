//! Epic service: grouping stories and cascading epic removal.

use super::{error::rejected, lookup, BacklogServiceResult};
use crate::backlog::{
    domain::{
        CascadePlan, Epic, EpicDescription, EpicDraft, EpicId, EpicName, ProductBacklog,
        UserStory, UserStoryId,
    },
    ports::{BacklogRepository, UnitOfWork},
};
use mockable::Clock;
use std::sync::Arc;
use tracing::info;

/// Request payload for creating or replacing an epic.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpicRequest {
    name: String,
    description: Option<String>,
}

impl EpicRequest {
    /// Creates a request with the required name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub(super) fn into_draft(self) -> BacklogServiceResult<EpicDraft> {
        Ok(EpicDraft {
            name: EpicName::new(self.name)?,
            description: self
                .description
                .filter(|text| !text.trim().is_empty())
                .map(EpicDescription::new)
                .transpose()?,
        })
    }
}

/// An epic with the number of stories linked to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpicSummary {
    /// The epic itself.
    pub epic: Epic,
    /// Number of linked stories.
    pub user_story_count: usize,
}

/// Epic orchestration service.
#[derive(Clone)]
pub struct EpicService<R, C>
where
    R: BacklogRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> EpicService<R, C>
where
    R: BacklogRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new epic service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Finds an epic by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`super::BacklogServiceError::NotFound`] when the epic does
    /// not exist.
    pub async fn find_by_id(&self, id: EpicId) -> BacklogServiceResult<Epic> {
        lookup::epic(&*self.repository, id).await
    }

    /// Returns an epic with its linked story count.
    ///
    /// # Errors
    ///
    /// Returns [`super::BacklogServiceError::NotFound`] when the epic does
    /// not exist.
    pub async fn summary(&self, id: EpicId) -> BacklogServiceResult<EpicSummary> {
        let epic = lookup::epic(&*self.repository, id).await?;
        self.summarise(epic).await
    }

    /// Returns every epic with its linked story count.
    ///
    /// # Errors
    ///
    /// Returns [`super::BacklogServiceError::Repository`] when persistence
    /// lookup fails.
    pub async fn list_all(&self) -> BacklogServiceResult<Vec<EpicSummary>> {
        let epics = self.repository.all_epics().await?;
        let mut summaries = Vec::with_capacity(epics.len());
        for epic in epics {
            summaries.push(self.summarise(epic).await?);
        }
        Ok(summaries)
    }

    /// Returns epics whose name contains `fragment`, ignoring case.
    ///
    /// # Errors
    ///
    /// Returns [`super::BacklogServiceError::Repository`] when persistence
    /// lookup fails.
    pub async fn search_by_name(&self, fragment: &str) -> BacklogServiceResult<Vec<Epic>> {
        Ok(self.repository.epics_by_name(fragment).await?)
    }

    /// Returns the number of epics.
    ///
    /// # Errors
    ///
    /// Returns [`super::BacklogServiceError::Repository`] when persistence
    /// lookup fails.
    pub async fn count(&self) -> BacklogServiceResult<usize> {
        Ok(self.repository.count_epics().await?)
    }

    /// Replaces the name and description of an epic.
    ///
    /// # Errors
    ///
    /// Returns [`super::BacklogServiceError`] when the epic does not exist,
    /// the request is invalid, or persistence fails.
    pub async fn update(&self, id: EpicId, request: EpicRequest) -> BacklogServiceResult<Epic> {
        let mut epic = lookup::epic(&*self.repository, id).await?;
        epic.apply(request.into_draft()?, &*self.clock);
        self.repository
            .commit(UnitOfWork::new().update(epic.clone()))
            .await?;
        info!(epic_id = %id, "updated epic");
        Ok(epic)
    }

    /// Returns the stories linked to the epic.
    ///
    /// # Errors
    ///
    /// Returns [`super::BacklogServiceError::NotFound`] when the epic does
    /// not exist.
    pub async fn user_stories(&self, id: EpicId) -> BacklogServiceResult<Vec<UserStory>> {
        lookup::epic(&*self.repository, id).await?;
        Ok(self.repository.user_stories_by_epic(id).await?)
    }

    /// Returns the backlog owning the epic.
    ///
    /// # Errors
    ///
    /// Returns [`super::BacklogServiceError::NotFound`] when the epic or its
    /// backlog does not exist.
    pub async fn product_backlog_of(&self, id: EpicId) -> BacklogServiceResult<ProductBacklog> {
        let epic = lookup::epic(&*self.repository, id).await?;
        lookup::product_backlog(&*self.repository, epic.product_backlog_id()).await
    }

    /// Links an existing story to the epic.
    ///
    /// # Errors
    ///
    /// Returns [`super::BacklogServiceError::NotFound`] when either entity is
    /// missing and a lifecycle error when the story is not in `todo`.
    pub async fn add_user_story(
        &self,
        id: EpicId,
        story_id: UserStoryId,
    ) -> BacklogServiceResult<UserStory> {
        lookup::epic(&*self.repository, id).await?;
        let mut story = lookup::user_story(&*self.repository, story_id).await?;
        story.link_to_epic(id, &*self.clock).map_err(rejected)?;
        self.repository
            .commit(UnitOfWork::new().update(story.clone()))
            .await?;
        info!(epic_id = %id, user_story_id = %story_id, "linked user story to epic");
        Ok(story)
    }

    /// Deletes the epic and every story linked to it, with their criteria
    /// and tasks.
    ///
    /// # Errors
    ///
    /// Returns [`super::BacklogServiceError`] when the epic does not exist or
    /// persistence fails.
    pub async fn delete(&self, id: EpicId) -> BacklogServiceResult<()> {
        lookup::epic(&*self.repository, id).await?;
        let stories = self.repository.user_stories_by_epic(id).await?;
        let dependents =
            lookup::stories_dependents(&*self.repository, stories.iter().map(UserStory::id))
                .await?;
        let plan = CascadePlan::epic(id, dependents);
        let removed = plan.len();
        self.repository
            .commit(UnitOfWork::new().cascade(plan))
            .await?;
        info!(epic_id = %id, removed, "deleted epic");
        Ok(())
    }

    async fn summarise(&self, epic: Epic) -> BacklogServiceResult<EpicSummary> {
        let user_story_count = self.repository.user_stories_by_epic(epic.id()).await?.len();
        Ok(EpicSummary {
            epic,
            user_story_count,
        })
    }
}
