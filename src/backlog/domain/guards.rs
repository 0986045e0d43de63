//! Invariant checks shared by entity mutators and the public validators.

use super::{
    AcceptanceCriteria, DateBoundary, DatedSubject, LifecycleViolation, ProductBacklogId,
    ProjectId, TodoGatedOperation, UserStoryId, UserStoryStatus,
};
use chrono::{DateTime, Utc};

/// Fails when any criterion owned by `story_id` is unmet.
pub(crate) fn all_criteria_met(
    story_id: UserStoryId,
    criteria: &[AcceptanceCriteria],
) -> Result<(), LifecycleViolation> {
    let unmet = criteria
        .iter()
        .filter(|criterion| criterion.user_story_id() == story_id && !criterion.is_met())
        .count();
    if unmet > 0 {
        return Err(LifecycleViolation::UnmetAcceptanceCriteria { story_id, unmet });
    }
    Ok(())
}

pub(crate) fn require_todo(
    story_id: UserStoryId,
    status: UserStoryStatus,
    operation: TodoGatedOperation,
) -> Result<(), LifecycleViolation> {
    if status.is_todo() {
        return Ok(());
    }
    Err(LifecycleViolation::StoryNotInTodo {
        story_id,
        status,
        operation,
    })
}

/// Fails only when both ends are present and `start > end`.
pub(crate) fn date_order(
    subject: DatedSubject,
    boundary: DateBoundary,
    start: Option<DateTime<Utc>>,
    end: Option<DateTime<Utc>>,
) -> Result<(), LifecycleViolation> {
    match (start, end) {
        (Some(from), Some(to)) if from > to => Err(LifecycleViolation::InvalidDateRange {
            subject,
            boundary,
            start: from,
            end: to,
        }),
        _ => Ok(()),
    }
}

pub(crate) fn project_has_no_backlog(
    project_id: ProjectId,
    current: Option<ProductBacklogId>,
) -> Result<(), LifecycleViolation> {
    match current {
        Some(product_backlog_id) => Err(LifecycleViolation::ProductBacklogAlreadyAssigned {
            project_id,
            product_backlog_id,
        }),
        None => Ok(()),
    }
}

pub(crate) fn backlog_has_no_owner(
    product_backlog_id: ProductBacklogId,
    current: Option<ProjectId>,
) -> Result<(), LifecycleViolation> {
    match current {
        Some(project_id) => Err(LifecycleViolation::ProductBacklogAlreadyOwned {
            product_backlog_id,
            project_id,
        }),
        None => Ok(()),
    }
}
