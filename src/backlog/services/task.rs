//! Task service: scheduling and status of implementation work.

use super::{error::rejected, lookup, BacklogServiceResult};
use crate::backlog::{
    domain::{Task, TaskDescription, TaskDraft, TaskId, TaskStatus, TaskTitle, UserStoryId},
    ports::{BacklogRepository, UnitOfWork},
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use tracing::info;

/// Request payload for creating or replacing a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRequest {
    title: String,
    description: String,
    status: TaskStatus,
    start_date: Option<DateTime<Utc>>,
    end_date: Option<DateTime<Utc>>,
}

impl TaskRequest {
    /// Creates an unscheduled `todo` task request.
    #[must_use]
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            status: TaskStatus::Todo,
            start_date: None,
            end_date: None,
        }
    }

    /// Sets the status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
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

    fn into_draft(self) -> BacklogServiceResult<TaskDraft> {
        Ok(TaskDraft {
            title: TaskTitle::new(self.title)?,
            description: TaskDescription::new(self.description)?,
            status: self.status,
            start_date: self.start_date,
            end_date: self.end_date,
        })
    }
}

/// Task orchestration service.
#[derive(Clone)]
pub struct TaskService<R, C>
where
    R: BacklogRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> TaskService<R, C>
where
    R: BacklogRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new task service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Creates a task under a story.
    ///
    /// # Errors
    ///
    /// Returns [`super::BacklogServiceError`] when the story does not exist,
    /// the request is invalid, or persistence fails.
    pub async fn create(
        &self,
        user_story_id: UserStoryId,
        request: TaskRequest,
    ) -> BacklogServiceResult<Task> {
        lookup::user_story(&*self.repository, user_story_id).await?;
        let task =
            Task::new(request.into_draft()?, user_story_id, &*self.clock).map_err(rejected)?;
        self.repository
            .commit(UnitOfWork::new().insert(task.clone()))
            .await?;
        info!(user_story_id = %user_story_id, task_id = %task.id(), "created task");
        Ok(task)
    }

    /// Finds a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`super::BacklogServiceError::NotFound`] when the task does
    /// not exist.
    pub async fn find_by_id(&self, id: TaskId) -> BacklogServiceResult<Task> {
        lookup::task(&*self.repository, id).await
    }

    /// Returns every task.
    ///
    /// # Errors
    ///
    /// Returns [`super::BacklogServiceError::Repository`] when persistence
    /// lookup fails.
    pub async fn list_all(&self) -> BacklogServiceResult<Vec<Task>> {
        Ok(self.repository.all_tasks().await?)
    }

    /// Returns the tasks in `status`.
    ///
    /// # Errors
    ///
    /// Returns [`super::BacklogServiceError::Repository`] when persistence
    /// lookup fails.
    pub async fn by_status(&self, status: TaskStatus) -> BacklogServiceResult<Vec<Task>> {
        Ok(self.repository.tasks_by_status(status).await?)
    }

    /// Returns the tasks under a story.
    ///
    /// # Errors
    ///
    /// Returns [`super::BacklogServiceError::NotFound`] when the story does
    /// not exist.
    pub async fn by_user_story(&self, user_story_id: UserStoryId) -> BacklogServiceResult<Vec<Task>> {
        lookup::user_story(&*self.repository, user_story_id).await?;
        Ok(self.repository.tasks_by_user_story(user_story_id).await?)
    }

    /// Returns tasks scheduled entirely within `[start, end]`.
    ///
    /// # Errors
    ///
    /// Returns [`super::BacklogServiceError::Repository`] when persistence
    /// lookup fails.
    pub async fn in_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> BacklogServiceResult<Vec<Task>> {
        Ok(self.repository.tasks_in_date_range(start, end).await?)
    }

    /// Replaces every editable field of a task.
    ///
    /// # Errors
    ///
    /// Returns [`super::BacklogServiceError`] when the task does not exist,
    /// the request is invalid, or persistence fails.
    pub async fn update(&self, id: TaskId, request: TaskRequest) -> BacklogServiceResult<Task> {
        let mut task = lookup::task(&*self.repository, id).await?;
        task.apply(request.into_draft()?, &*self.clock)
            .map_err(rejected)?;
        self.commit_update(task, "updated task").await
    }

    /// Sets the status.
    ///
    /// # Errors
    ///
    /// Returns [`super::BacklogServiceError`] when the task does not exist or
    /// persistence fails.
    pub async fn update_status(&self, id: TaskId, status: TaskStatus) -> BacklogServiceResult<Task> {
        let mut task = lookup::task(&*self.repository, id).await?;
        task.set_status(status, &*self.clock);
        self.commit_update(task, "updated task status").await
    }

    /// Sets the start date.
    ///
    /// # Errors
    ///
    /// Returns [`super::BacklogServiceError`] when the task does not exist,
    /// the date falls after the current end date, or persistence fails.
    pub async fn update_start_date(
        &self,
        id: TaskId,
        start: DateTime<Utc>,
    ) -> BacklogServiceResult<Task> {
        let mut task = lookup::task(&*self.repository, id).await?;
        task.set_start_date(start, &*self.clock).map_err(rejected)?;
        self.commit_update(task, "updated task start date").await
    }

    /// Sets the end date.
    ///
    /// # Errors
    ///
    /// Returns [`super::BacklogServiceError`] when the task does not exist,
    /// the date falls before the current start date, or persistence fails.
    pub async fn update_end_date(
        &self,
        id: TaskId,
        end: DateTime<Utc>,
    ) -> BacklogServiceResult<Task> {
        let mut task = lookup::task(&*self.repository, id).await?;
        task.set_end_date(end, &*self.clock).map_err(rejected)?;
        self.commit_update(task, "updated task end date").await
    }

    /// Deletes a task.
    ///
    /// # Errors
    ///
    /// Returns [`super::BacklogServiceError`] when the task does not exist or
    /// persistence fails.
    pub async fn delete(&self, id: TaskId) -> BacklogServiceResult<()> {
        lookup::task(&*self.repository, id).await?;
        self.repository.commit(UnitOfWork::new().remove(id)).await?;
        info!(task_id = %id, "deleted task");
        Ok(())
    }

    async fn commit_update(&self, task: Task, message: &'static str) -> BacklogServiceResult<Task> {
        self.repository
            .commit(UnitOfWork::new().update(task.clone()))
            .await?;
        info!(task_id = %task.id(), "{message}");
        Ok(task)
    }
}
