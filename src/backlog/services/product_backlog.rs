//! Product backlog service: composition of epics, stories and sprints.

use super::{
    error::rejected, lookup, BacklogServiceResult, EpicRequest, UserStoryRequest,
};
use crate::backlog::{
    domain::{
        CascadePlan, Epic, ProductBacklog, ProductBacklogId, ProductBacklogName, Project,
        SprintBacklog, StoryHome, UserStory, UserStoryStatus,
    },
    ports::{BacklogRepository, UnitOfWork},
    validation::validate_has_project,
};
use mockable::Clock;
use std::sync::Arc;
use tracing::{debug, info};

/// Request payload for creating a product backlog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductBacklogRequest {
    name: String,
}

impl ProductBacklogRequest {
    /// Creates a request with the required name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// A product backlog with the sizes of its owned collections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductBacklogSummary {
    /// The backlog itself.
    pub product_backlog: ProductBacklog,
    /// Number of epics owned by the backlog.
    pub epic_count: usize,
    /// Number of stories currently living in the backlog.
    pub user_story_count: usize,
    /// Number of sprints planned from the backlog.
    pub sprint_backlog_count: usize,
}

/// Product backlog orchestration service.
#[derive(Clone)]
pub struct ProductBacklogService<R, C>
where
    R: BacklogRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> ProductBacklogService<R, C>
where
    R: BacklogRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new product backlog service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Creates an unowned product backlog.
    ///
    /// # Errors
    ///
    /// Returns [`super::BacklogServiceError`] when the name is blank or
    /// persistence fails.
    pub async fn create(
        &self,
        request: ProductBacklogRequest,
    ) -> BacklogServiceResult<ProductBacklog> {
        let name = ProductBacklogName::new(request.name)?;
        let backlog = ProductBacklog::new(name, &*self.clock);
        self.repository
            .commit(UnitOfWork::new().insert(backlog.clone()))
            .await?;
        info!(product_backlog_id = %backlog.id(), "created product backlog");
        Ok(backlog)
    }

    /// Finds a product backlog by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`super::BacklogServiceError::NotFound`] when the backlog does
    /// not exist.
    pub async fn find_by_id(&self, id: ProductBacklogId) -> BacklogServiceResult<ProductBacklog> {
        lookup::product_backlog(&*self.repository, id).await
    }

    /// Returns a backlog together with the sizes of its collections.
    ///
    /// # Errors
    ///
    /// Returns [`super::BacklogServiceError::NotFound`] when the backlog does
    /// not exist.
    pub async fn summary(&self, id: ProductBacklogId) -> BacklogServiceResult<ProductBacklogSummary> {
        let product_backlog = lookup::product_backlog(&*self.repository, id).await?;
        let epic_count = self.repository.epics_by_product_backlog(id).await?.len();
        let user_story_count = self
            .repository
            .user_stories_by_product_backlog(id)
            .await?
            .len();
        let sprint_backlog_count = self
            .repository
            .sprint_backlogs_by_product_backlog(id)
            .await?
            .len();
        Ok(ProductBacklogSummary {
            product_backlog,
            epic_count,
            user_story_count,
            sprint_backlog_count,
        })
    }

    /// Returns every product backlog.
    ///
    /// # Errors
    ///
    /// Returns [`super::BacklogServiceError::Repository`] when persistence
    /// lookup fails.
    pub async fn list_all(&self) -> BacklogServiceResult<Vec<ProductBacklog>> {
        Ok(self.repository.all_product_backlogs().await?)
    }

    /// Returns the stories living in the backlog, most important first.
    ///
    /// # Errors
    ///
    /// Returns [`super::BacklogServiceError::NotFound`] when the backlog does
    /// not exist.
    pub async fn user_stories(&self, id: ProductBacklogId) -> BacklogServiceResult<Vec<UserStory>> {
        lookup::product_backlog(&*self.repository, id).await?;
        Ok(self.repository.user_stories_by_product_backlog(id).await?)
    }

    /// Returns the stories living in the backlog with the given status.
    ///
    /// # Errors
    ///
    /// Returns [`super::BacklogServiceError::NotFound`] when the backlog does
    /// not exist.
    pub async fn user_stories_by_status(
        &self,
        id: ProductBacklogId,
        status: UserStoryStatus,
    ) -> BacklogServiceResult<Vec<UserStory>> {
        lookup::product_backlog(&*self.repository, id).await?;
        Ok(self
            .repository
            .user_stories_by_status_and_product_backlog(status, id)
            .await?)
    }

    /// Returns the epics owned by the backlog.
    ///
    /// # Errors
    ///
    /// Returns [`super::BacklogServiceError::NotFound`] when the backlog does
    /// not exist.
    pub async fn epics(&self, id: ProductBacklogId) -> BacklogServiceResult<Vec<Epic>> {
        lookup::product_backlog(&*self.repository, id).await?;
        Ok(self.repository.epics_by_product_backlog(id).await?)
    }

    /// Returns the sprints planned from the backlog.
    ///
    /// # Errors
    ///
    /// Returns [`super::BacklogServiceError::NotFound`] when the backlog does
    /// not exist.
    pub async fn sprint_backlogs(
        &self,
        id: ProductBacklogId,
    ) -> BacklogServiceResult<Vec<SprintBacklog>> {
        lookup::product_backlog(&*self.repository, id).await?;
        Ok(self.repository.sprint_backlogs_by_product_backlog(id).await?)
    }

    /// Creates an epic owned by the backlog.
    ///
    /// # Errors
    ///
    /// Returns [`super::BacklogServiceError`] when the backlog does not exist,
    /// the request is invalid, or persistence fails.
    pub async fn add_epic(
        &self,
        id: ProductBacklogId,
        request: EpicRequest,
    ) -> BacklogServiceResult<Epic> {
        let mut backlog = lookup::product_backlog(&*self.repository, id).await?;
        let epic = Epic::new(request.into_draft()?, id, &*self.clock);
        backlog.touch(&*self.clock);
        self.repository
            .commit(UnitOfWork::new().insert(epic.clone()).update(backlog))
            .await?;
        info!(product_backlog_id = %id, epic_id = %epic.id(), "added epic to product backlog");
        Ok(epic)
    }

    /// Creates a story living in the backlog.
    ///
    /// The story always starts in `todo`; a status carried by the request is
    /// ignored.
    ///
    /// # Errors
    ///
    /// Returns [`super::BacklogServiceError`] when the backlog does not exist,
    /// the request is invalid, or persistence fails.
    pub async fn add_user_story(
        &self,
        id: ProductBacklogId,
        request: UserStoryRequest,
    ) -> BacklogServiceResult<UserStory> {
        let mut backlog = lookup::product_backlog(&*self.repository, id).await?;
        if let Some(status) = request.requested_status() {
            debug!(requested = %status, "new stories start in todo; requested status ignored");
        }
        let story = UserStory::new(
            request.into_draft()?,
            StoryHome::ProductBacklog(id),
            &*self.clock,
        );
        backlog.touch(&*self.clock);
        self.repository
            .commit(UnitOfWork::new().insert(story.clone()).update(backlog))
            .await?;
        info!(
            product_backlog_id = %id,
            user_story_id = %story.id(),
            "added user story to product backlog"
        );
        Ok(story)
    }

    /// Returns the project owning the backlog.
    ///
    /// # Errors
    ///
    /// Returns [`super::BacklogServiceError::NotFound`] when the backlog does
    /// not exist, and a lifecycle error of kind `NotFound` when it has no
    /// project.
    pub async fn project_of(&self, id: ProductBacklogId) -> BacklogServiceResult<Project> {
        let backlog = lookup::product_backlog(&*self.repository, id).await?;
        let project_id = validate_has_project(&backlog).map_err(rejected)?;
        lookup::project(&*self.repository, project_id).await
    }

    /// Deletes the backlog with its epics, sprints and stories.
    ///
    /// Stories reached through the backlog itself, through its sprints, or
    /// through its epics are removed with their criteria and tasks. The
    /// owning project, if any, loses its backlog link.
    ///
    /// # Errors
    ///
    /// Returns [`super::BacklogServiceError`] when the backlog does not exist
    /// or persistence fails.
    pub async fn delete(&self, id: ProductBacklogId) -> BacklogServiceResult<()> {
        let backlog = lookup::product_backlog(&*self.repository, id).await?;
        let epics = self.repository.epics_by_product_backlog(id).await?;
        let sprints = self.repository.sprint_backlogs_by_product_backlog(id).await?;

        let mut stories: Vec<UserStory> = self.repository.user_stories_by_product_backlog(id).await?;
        for sprint in &sprints {
            stories.extend(
                self.repository
                    .user_stories_by_sprint_backlog(sprint.id())
                    .await?,
            );
        }
        for epic in &epics {
            stories.extend(self.repository.user_stories_by_epic(epic.id()).await?);
        }
        let dependents =
            lookup::stories_dependents(&*self.repository, stories.iter().map(UserStory::id))
                .await?;

        let owner = match backlog.project_id() {
            Some(project_id) => self.repository.find_project(project_id).await?,
            None => None,
        };

        let plan = CascadePlan::product_backlog(
            id,
            epics.iter().map(Epic::id).collect(),
            sprints.iter().map(SprintBacklog::id).collect(),
            dependents,
        );
        let removed = plan.len();
        let mut work = UnitOfWork::new();
        if let Some(mut project) = owner {
            project.clear_product_backlog(&*self.clock);
            work = work.update(project);
        }
        self.repository.commit(work.cascade(plan)).await?;
        info!(product_backlog_id = %id, removed, "deleted product backlog");
        Ok(())
    }
}
