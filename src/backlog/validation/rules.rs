//! Individual lifecycle rule implementations.
//!
//! Each rule is a pure function over one or two entities. Rules return
//! `Ok(())` (or the looked-up value) on success and a specific
//! [`LifecycleViolation`] on failure; they never mutate their arguments.

use crate::backlog::domain::{
    AcceptanceCriteria, DateBoundary, DatedSubject, LifecycleViolation, ProductBacklog, Project,
    ProjectId, SprintBacklogId, TodoGatedOperation, UserStory, guards,
};
use chrono::{DateTime, Utc};

/// Validates that every criterion belonging to `story` is met.
///
/// Criteria owned by other stories are ignored, and a story without
/// criteria passes.
///
/// # Errors
///
/// Returns `LifecycleViolation::UnmetAcceptanceCriteria` with the number of
/// unmet criteria.
pub fn validate_can_mark_as_done(
    story: &UserStory,
    criteria: &[AcceptanceCriteria],
) -> Result<(), LifecycleViolation> {
    guards::all_criteria_met(story.id(), criteria)
}

/// Validates that the story may be grouped under an epic.
///
/// # Errors
///
/// Returns `LifecycleViolation::StoryNotInTodo` unless the story is `todo`.
pub fn validate_can_link_to_epic(story: &UserStory) -> Result<(), LifecycleViolation> {
    require_todo(story, TodoGatedOperation::LinkToEpic)
}

/// Validates that the story may be deleted.
///
/// # Errors
///
/// Returns `LifecycleViolation::StoryNotInTodo` unless the story is `todo`.
pub fn validate_can_delete(story: &UserStory) -> Result<(), LifecycleViolation> {
    require_todo(story, TodoGatedOperation::Delete)
}

/// Validates that the story's core fields may be modified.
///
/// No operation currently calls this rule; story updates are accepted in
/// every status.
///
/// # Errors
///
/// Returns `LifecycleViolation::StoryNotInTodo` unless the story is `todo`.
pub fn validate_is_todo_status(story: &UserStory) -> Result<(), LifecycleViolation> {
    require_todo(story, TodoGatedOperation::Modify)
}

fn require_todo(
    story: &UserStory,
    operation: TodoGatedOperation,
) -> Result<(), LifecycleViolation> {
    guards::require_todo(story.id(), story.status(), operation)
}

/// Validates a complete start/end pair.
///
/// Passes when either end is absent; fails only when both are present and
/// `start > end`. Equal dates are accepted.
///
/// # Errors
///
/// Returns `LifecycleViolation::InvalidDateRange` reported against the start
/// boundary.
///
/// # Examples
///
/// ```rust
/// use agile_backlog::backlog::domain::DatedSubject;
/// use agile_backlog::backlog::validation::validate_date_range;
/// use chrono::{Duration, Utc};
///
/// let start = Utc::now();
/// let end = start + Duration::days(3);
/// assert!(validate_date_range(DatedSubject::Task, Some(start), Some(end)).is_ok());
/// assert!(validate_date_range(DatedSubject::Task, Some(end), Some(start)).is_err());
/// assert!(validate_date_range(DatedSubject::Task, Some(end), None).is_ok());
/// ```
pub fn validate_date_range(
    subject: DatedSubject,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> Result<(), LifecycleViolation> {
    guards::date_order(subject, DateBoundary::Start, start, end)
}

/// Validates a new start date against the entity's existing end date.
///
/// # Errors
///
/// Returns `LifecycleViolation::InvalidDateRange` when `new_start` falls
/// after `existing_end`.
pub fn validate_start_date(
    subject: DatedSubject,
    new_start: DateTime<Utc>,
    existing_end: Option<DateTime<Utc>>,
) -> Result<(), LifecycleViolation> {
    guards::date_order(subject, DateBoundary::Start, Some(new_start), existing_end)
}

/// Validates a new end date against the entity's existing start date.
///
/// # Errors
///
/// Returns `LifecycleViolation::InvalidDateRange` when `new_end` falls
/// before `existing_start`.
pub fn validate_end_date(
    subject: DatedSubject,
    existing_start: Option<DateTime<Utc>>,
    new_end: DateTime<Utc>,
) -> Result<(), LifecycleViolation> {
    guards::date_order(subject, DateBoundary::End, existing_start, Some(new_end))
}

/// Validates that the project does not own a product backlog yet.
///
/// # Errors
///
/// Returns `LifecycleViolation::ProductBacklogAlreadyAssigned` naming the
/// backlog already assigned.
pub fn validate_product_backlog_assignment(project: &Project) -> Result<(), LifecycleViolation> {
    guards::project_has_no_backlog(project.id(), project.product_backlog_id())
}

/// Validates that the backlog does not belong to a project yet.
///
/// # Errors
///
/// Returns `LifecycleViolation::ProductBacklogAlreadyOwned` naming the
/// current owner.
pub fn validate_backlog_unowned(backlog: &ProductBacklog) -> Result<(), LifecycleViolation> {
    guards::backlog_has_no_owner(backlog.id(), backlog.project_id())
}

/// Validates that the backlog belongs to a project and returns its id.
///
/// # Errors
///
/// Returns `LifecycleViolation::MissingProject` when the backlog is unowned.
pub fn validate_has_project(backlog: &ProductBacklog) -> Result<ProjectId, LifecycleViolation> {
    backlog
        .project_id()
        .ok_or(LifecycleViolation::MissingProject {
            product_backlog_id: backlog.id(),
        })
}

/// Validates that the story is currently assigned to `sprint_backlog_id`.
///
/// # Errors
///
/// Returns `LifecycleViolation::StoryNotInSprint` when the story lives in
/// another sprint or in a product backlog.
pub fn validate_story_in_sprint(
    story: &UserStory,
    sprint_backlog_id: SprintBacklogId,
) -> Result<(), LifecycleViolation> {
    let actual = story.sprint_backlog_id();
    if actual == Some(sprint_backlog_id) {
        return Ok(());
    }
    Err(LifecycleViolation::StoryNotInSprint {
        story_id: story.id(),
        sprint_backlog_id,
        actual_sprint_backlog_id: actual,
    })
}
