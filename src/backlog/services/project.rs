//! Project service: scheduling, status and product backlog assignment.

use super::{error::rejected, lookup, BacklogServiceResult};
use crate::backlog::{
    domain::{ProductBacklogId, Project, ProjectDraft, ProjectId, ProjectName, ProjectStatus},
    ports::{BacklogRepository, UnitOfWork},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use tracing::info;

/// Request payload for creating or replacing a project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRequest {
    name: String,
    description: Option<String>,
    status: Option<ProjectStatus>,
    start_date: Option<DateTime<Utc>>,
    end_date: Option<DateTime<Utc>>,
}

impl ProjectRequest {
    /// Creates a request with the required name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: None,
            status: None,
            start_date: None,
            end_date: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the status. Defaults to [`ProjectStatus::NotStarted`].
    #[must_use]
    pub const fn with_status(mut self, status: ProjectStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the planned start date.
    #[must_use]
    pub const fn with_start_date(mut self, start_date: DateTime<Utc>) -> Self {
        self.start_date = Some(start_date);
        self
    }

    /// Sets the planned end date.
    #[must_use]
    pub const fn with_end_date(mut self, end_date: DateTime<Utc>) -> Self {
        self.end_date = Some(end_date);
        self
    }

    fn into_draft(self) -> BacklogServiceResult<ProjectDraft> {
        Ok(ProjectDraft {
            name: ProjectName::new(self.name)?,
            description: self.description,
            status: self.status.unwrap_or_default(),
            start_date: self.start_date,
            end_date: self.end_date,
        })
    }
}

/// Project orchestration service.
#[derive(Clone)]
pub struct ProjectService<R, C>
where
    R: BacklogRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> ProjectService<R, C>
where
    R: BacklogRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new project service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Creates a project.
    ///
    /// # Errors
    ///
    /// Returns [`super::BacklogServiceError`] when the name is blank, the
    /// dates are out of order, or persistence fails.
    pub async fn create(&self, request: ProjectRequest) -> BacklogServiceResult<Project> {
        let draft = request.into_draft()?;
        let project = Project::new(draft, &*self.clock).map_err(rejected)?;
        self.repository
            .commit(UnitOfWork::new().insert(project.clone()))
            .await?;
        info!(project_id = %project.id(), "created project");
        Ok(project)
    }

    /// Replaces every editable field of a project.
    ///
    /// # Errors
    ///
    /// Returns [`super::BacklogServiceError`] when the project does not exist,
    /// the request is invalid, or persistence fails.
    pub async fn update(
        &self,
        id: ProjectId,
        request: ProjectRequest,
    ) -> BacklogServiceResult<Project> {
        let mut project = lookup::project(&*self.repository, id).await?;
        let draft = request.into_draft()?;
        project.apply(draft, &*self.clock).map_err(rejected)?;
        self.commit_update(project, "updated project").await
    }

    /// Finds a project by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`super::BacklogServiceError::NotFound`] when the project does
    /// not exist.
    pub async fn find_by_id(&self, id: ProjectId) -> BacklogServiceResult<Project> {
        lookup::project(&*self.repository, id).await
    }

    /// Returns every project.
    ///
    /// # Errors
    ///
    /// Returns [`super::BacklogServiceError::Repository`] when persistence
    /// lookup fails.
    pub async fn list_all(&self) -> BacklogServiceResult<Vec<Project>> {
        Ok(self.repository.all_projects().await?)
    }

    /// Returns the projects in `status`.
    ///
    /// # Errors
    ///
    /// Returns [`super::BacklogServiceError::Repository`] when persistence
    /// lookup fails.
    pub async fn by_status(&self, status: ProjectStatus) -> BacklogServiceResult<Vec<Project>> {
        Ok(self.repository.projects_by_status(status).await?)
    }

    /// Returns projects starting strictly after `start` and ending strictly
    /// before `end`.
    ///
    /// # Errors
    ///
    /// Returns [`super::BacklogServiceError::Repository`] when persistence
    /// lookup fails.
    pub async fn between_dates(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> BacklogServiceResult<Vec<Project>> {
        Ok(self.repository.projects_between(start, end).await?)
    }

    /// Sets the start date.
    ///
    /// # Errors
    ///
    /// Returns [`super::BacklogServiceError`] when the project does not exist,
    /// the date falls after the current end date, or persistence fails.
    pub async fn update_start_date(
        &self,
        id: ProjectId,
        start: DateTime<Utc>,
    ) -> BacklogServiceResult<Project> {
        let mut project = lookup::project(&*self.repository, id).await?;
        project
            .set_start_date(start, &*self.clock)
            .map_err(rejected)?;
        self.commit_update(project, "updated project start date")
            .await
    }

    /// Sets the end date.
    ///
    /// # Errors
    ///
    /// Returns [`super::BacklogServiceError`] when the project does not exist,
    /// the date falls before the current start date, or persistence fails.
    pub async fn update_end_date(
        &self,
        id: ProjectId,
        end: DateTime<Utc>,
    ) -> BacklogServiceResult<Project> {
        let mut project = lookup::project(&*self.repository, id).await?;
        project.set_end_date(end, &*self.clock).map_err(rejected)?;
        self.commit_update(project, "updated project end date").await
    }

    /// Sets the lifecycle status.
    ///
    /// # Errors
    ///
    /// Returns [`super::BacklogServiceError`] when the project does not exist
    /// or persistence fails.
    pub async fn update_status(
        &self,
        id: ProjectId,
        status: ProjectStatus,
    ) -> BacklogServiceResult<Project> {
        let mut project = lookup::project(&*self.repository, id).await?;
        project.set_status(status, &*self.clock);
        self.commit_update(project, "updated project status").await
    }

    /// Assigns a product backlog to a project, writing both sides together.
    ///
    /// # Errors
    ///
    /// Returns [`super::BacklogServiceError::NotFound`] when either entity is
    /// missing and a lifecycle error of kind `AlreadyAssigned` when the
    /// project already has a backlog or the backlog already has a project.
    pub async fn assign_product_backlog(
        &self,
        project_id: ProjectId,
        product_backlog_id: ProductBacklogId,
    ) -> BacklogServiceResult<Project> {
        let mut project = lookup::project(&*self.repository, project_id).await?;
        let mut backlog = lookup::product_backlog(&*self.repository, product_backlog_id).await?;
        project
            .assign_product_backlog(product_backlog_id, &*self.clock)
            .map_err(rejected)?;
        backlog
            .assign_to_project(project_id, &*self.clock)
            .map_err(rejected)?;
        self.repository
            .commit(UnitOfWork::new().update(project.clone()).update(backlog))
            .await?;
        info!(
            project_id = %project_id,
            product_backlog_id = %product_backlog_id,
            "assigned product backlog to project"
        );
        Ok(project)
    }

    /// Deletes a project. Its product backlog survives and becomes unowned.
    ///
    /// # Errors
    ///
    /// Returns [`super::BacklogServiceError`] when the project does not exist
    /// or persistence fails.
    pub async fn delete(&self, id: ProjectId) -> BacklogServiceResult<()> {
        let project = lookup::project(&*self.repository, id).await?;
        let owned_backlog = match project.product_backlog_id() {
            Some(backlog_id) => self.repository.find_product_backlog(backlog_id).await?,
            None => None,
        };
        let mut work = UnitOfWork::new();
        if let Some(mut backlog) = owned_backlog {
            backlog.clear_project(&*self.clock);
            work = work.update(backlog);
        }
        self.repository.commit(work.remove(id)).await?;
        info!(project_id = %id, "deleted project");
        Ok(())
    }

    async fn commit_update(
        &self,
        project: Project,
        message: &'static str,
    ) -> BacklogServiceResult<Project> {
        self.repository
            .commit(UnitOfWork::new().update(project.clone()))
            .await?;
        info!(project_id = %project.id(), "{message}");
        Ok(project)
    }
}
