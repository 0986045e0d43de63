//! Project aggregate root.

use super::{
    DateBoundary, DatedSubject, LifecycleViolation, ProductBacklogId, ProjectId, ProjectName,
    ProjectStatus, guards,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Caller-editable project fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectDraft {
    /// Project name.
    pub name: ProjectName,
    /// Optional free-text description.
    pub description: Option<String>,
    /// Lifecycle status.
    pub status: ProjectStatus,
    /// Planned start, if scheduled.
    pub start_date: Option<DateTime<Utc>>,
    /// Planned end, if scheduled.
    pub end_date: Option<DateTime<Utc>>,
}

impl ProjectDraft {
    /// Creates a draft with the default status and no schedule.
    #[must_use]
    pub fn new(name: ProjectName) -> Self {
        Self {
            name,
            description: None,
            status: ProjectStatus::default(),
            start_date: None,
            end_date: None,
        }
    }
}

/// A project owning at most one product backlog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    id: ProjectId,
    name: ProjectName,
    description: Option<String>,
    status: ProjectStatus,
    start_date: Option<DateTime<Utc>>,
    end_date: Option<DateTime<Utc>>,
    product_backlog_id: Option<ProductBacklogId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Project {
    /// Creates a project from a draft.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleViolation::InvalidDateRange`] when the draft's start
    /// date falls after its end date.
    pub fn new(draft: ProjectDraft, clock: &impl Clock) -> Result<Self, LifecycleViolation> {
        guards::date_order(
            DatedSubject::Project,
            DateBoundary::Start,
            draft.start_date,
            draft.end_date,
        )?;
        let timestamp = clock.utc();
        Ok(Self {
            id: ProjectId::new(),
            name: draft.name,
            description: draft.description,
            status: draft.status,
            start_date: draft.start_date,
            end_date: draft.end_date,
            product_backlog_id: None,
            created_at: timestamp,
            updated_at: timestamp,
        })
    }

    /// Returns the project identifier.
    #[must_use]
    pub const fn id(&self) -> ProjectId {
        self.id
    }

    /// Returns the project name.
    #[must_use]
    pub const fn name(&self) -> &ProjectName {
        &self.name
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> ProjectStatus {
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

    /// Returns the assigned product backlog, if any.
    #[must_use]
    pub const fn product_backlog_id(&self) -> Option<ProductBacklogId> {
        self.product_backlog_id
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

    /// Replaces every editable field. The backlog link is preserved.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleViolation::InvalidDateRange`] when the new start
    /// date falls after the new end date.
    pub fn apply(
        &mut self,
        draft: ProjectDraft,
        clock: &impl Clock,
    ) -> Result<(), LifecycleViolation> {
        guards::date_order(
            DatedSubject::Project,
            DateBoundary::Start,
            draft.start_date,
            draft.end_date,
        )?;
        self.name = draft.name;
        self.description = draft.description;
        self.status = draft.status;
        self.start_date = draft.start_date;
        self.end_date = draft.end_date;
        self.touch(clock);
        Ok(())
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
        guards::date_order(DatedSubject::Project, DateBoundary::Start, Some(start), self.end_date)?;
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
        guards::date_order(DatedSubject::Project, DateBoundary::End, self.start_date, Some(end))?;
        self.end_date = Some(end);
        self.touch(clock);
        Ok(())
    }

    /// Sets the lifecycle status. Project statuses are unguarded.
    pub fn set_status(&mut self, status: ProjectStatus, clock: &impl Clock) {
        self.status = status;
        self.touch(clock);
    }

    /// Records the product backlog owned by this project.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleViolation::ProductBacklogAlreadyAssigned`] when a
    /// backlog is already assigned.
    pub fn assign_product_backlog(
        &mut self,
        product_backlog_id: ProductBacklogId,
        clock: &impl Clock,
    ) -> Result<(), LifecycleViolation> {
        guards::project_has_no_backlog(self.id, self.product_backlog_id)?;
        self.product_backlog_id = Some(product_backlog_id);
        self.touch(clock);
        Ok(())
    }

    /// Drops the backlog link after the backlog itself was deleted.
    pub(crate) fn clear_product_backlog(&mut self, clock: &impl Clock) {
        self.product_backlog_id = None;
        self.touch(clock);
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
