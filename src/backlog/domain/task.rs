//! Task entity: an atomic unit of work under a user story.

use super::{
    DateBoundary, DatedSubject, LifecycleViolation, TaskDescription, TaskId, TaskStatus, TaskTitle,
    UserStoryId, guards,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Caller-editable task fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    /// Task title.
    pub title: TaskTitle,
    /// Task description.
    pub description: TaskDescription,
    /// Lifecycle status; tasks keep whatever the caller supplies.
    pub status: TaskStatus,
    /// Planned start, if scheduled.
    pub start_date: Option<DateTime<Utc>>,
    /// Planned end, if scheduled.
    pub end_date: Option<DateTime<Utc>>,
}

/// A unit of implementation work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: TaskTitle,
    description: TaskDescription,
    status: TaskStatus,
    start_date: Option<DateTime<Utc>>,
    end_date: Option<DateTime<Utc>>,
    user_story_id: UserStoryId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a task for the given story.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleViolation::InvalidDateRange`] when the draft's start
    /// date falls after its end date.
    pub fn new(
        draft: TaskDraft,
        user_story_id: UserStoryId,
        clock: &impl Clock,
    ) -> Result<Self, LifecycleViolation> {
        guards::date_order(
            DatedSubject::Task,
            DateBoundary::Start,
            draft.start_date,
            draft.end_date,
        )?;
        let timestamp = clock.utc();
        Ok(Self {
            id: TaskId::new(),
            title: draft.title,
            description: draft.description,
            status: draft.status,
            start_date: draft.start_date,
            end_date: draft.end_date,
            user_story_id,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task title.
    #[must_use]
    pub const fn title(&self) -> &TaskTitle {
        &self.title
    }

    /// Returns the task description.
    #[must_use]
    pub const fn description(&self) -> &TaskDescription {
        &self.description
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns the planned start date.
    #[must_use]
    pub const fn start_date(&self) -> Option<DateTime<Utc>> {
        self.start_date
    }

    /// Returns the planned end date.
    #[must_use]
    pub const fn end_date(&self) -> Option<DateTime<Utc>> {
        self.end_date
    }

    /// Returns the owning story.
    #[must_use]
    pub const fn user_story_id(&self) -> UserStoryId {
        self.user_story_id
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Replaces every editable field. The owning story is preserved.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleViolation::InvalidDateRange`] when the new start
    /// date falls after the new end date.
    pub fn apply(
        &mut self,
        draft: TaskDraft,
        clock: &impl Clock,
    ) -> Result<(), LifecycleViolation> {
        guards::date_order(
            DatedSubject::Task,
            DateBoundary::Start,
            draft.start_date,
            draft.end_date,
        )?;
        self.title = draft.title;
        self.description = draft.description;
        self.status = draft.status;
        self.start_date = draft.start_date;
        self.end_date = draft.end_date;
        self.touch(clock);
        Ok(())
    }

    /// Sets the status. Task statuses are unguarded.
    pub fn set_status(&mut self, status: TaskStatus, clock: &impl Clock) {
        self.status = status;
        self.touch(clock);
    }

    /// Sets the start date, checked against the current end date.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleViolation::InvalidDateRange`] when `start` falls
    /// after the current end date.
    pub fn set_start_date(
        &mut self,
        start: DateTime<Utc>,
        clock: &impl Clock,
    ) -> Result<(), LifecycleViolation> {
        guards::date_order(DatedSubject::Task, DateBoundary::Start, Some(start), self.end_date)?;
        self.start_date = Some(start);
        self.touch(clock);
        Ok(())
    }

    /// Sets the end date, checked against the current start date.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleViolation::InvalidDateRange`] when `end` falls
    /// before the current start date.
    pub fn set_end_date(
        &mut self,
        end: DateTime<Utc>,
        clock: &impl Clock,
    ) -> Result<(), LifecycleViolation> {
        guards::date_order(DatedSubject::Task, DateBoundary::End, self.start_date, Some(end))?;
        self.end_date = Some(end);
        self.touch(clock);
        Ok(())
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
