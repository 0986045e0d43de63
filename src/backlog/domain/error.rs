//! Error types for backlog domain validation and lifecycle rules.

use super::{ProductBacklogId, ProjectId, SprintBacklogId, UserStoryId, UserStoryStatus};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Coarse classification of every failure the engine can report.
///
/// Callers translating failures into transport statuses match on this
/// rather than on individual variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// A referenced entity does not exist.
    NotFound,
    /// A lifecycle precondition was not satisfied.
    BusinessRuleViolation,
    /// An exactly-once relationship was attempted a second time.
    AlreadyAssigned,
    /// Caller-supplied field values failed validation.
    InvalidInput,
    /// The persistence collaborator failed.
    Persistence,
}

impl FailureKind {
    /// Returns the canonical representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not_found",
            Self::BusinessRuleViolation => "business_rule_violation",
            Self::AlreadyAssigned => "already_assigned",
            Self::InvalidInput => "invalid_input",
            Self::Persistence => "persistence",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validated text fields, named for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextField {
    /// Project name.
    ProjectName,
    /// Product backlog name.
    ProductBacklogName,
    /// Epic name.
    EpicName,
    /// Epic description.
    EpicDescription,
    /// Sprint backlog name.
    SprintBacklogName,
    /// User story name.
    UserStoryName,
    /// "As a ..." part of a story narrative.
    Role,
    /// "I want ..." part of a story narrative.
    Feature,
    /// "So that ..." part of a story narrative.
    Benefit,
    /// Given clause of an acceptance criterion.
    Given,
    /// When clause of an acceptance criterion.
    When,
    /// Then clause of an acceptance criterion.
    Then,
    /// Acceptance criterion clause read back without its position.
    Clause,
    /// Task title.
    TaskTitle,
    /// Task description.
    TaskDescription,
}

impl TextField {
    /// Returns the field label used in messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::ProjectName => "project name",
            Self::ProductBacklogName => "product backlog name",
            Self::EpicName => "epic name",
            Self::EpicDescription => "epic description",
            Self::SprintBacklogName => "sprint backlog name",
            Self::UserStoryName => "user story name",
            Self::Role => "role",
            Self::Feature => "feature",
            Self::Benefit => "benefit",
            Self::Given => "given condition",
            Self::When => "when condition",
            Self::Then => "then condition",
            Self::Clause => "acceptance criterion clause",
            Self::TaskTitle => "task title",
            Self::TaskDescription => "task description",
        }
    }
}

impl fmt::Display for TextField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Errors returned while constructing validated domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BacklogDomainError {
    /// A required text field is empty after trimming.
    #[error("{0} must not be blank")]
    BlankField(TextField),

    /// A text field falls outside its permitted length range.
    #[error("{field} must be between {min} and {max} characters, got {actual}")]
    LengthOutOfRange {
        /// The offending field.
        field: TextField,
        /// Minimum permitted length in characters.
        min: usize,
        /// Maximum permitted length in characters.
        max: usize,
        /// Actual length in characters.
        actual: usize,
    },
}

impl BacklogDomainError {
    /// Returns the failure classification.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        FailureKind::InvalidInput
    }
}

/// Error returned while parsing a status value from persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown {entity} status: {value}")]
pub struct ParseStatusError {
    /// Label of the entity whose status failed to parse.
    pub entity: &'static str,
    /// The rejected raw value.
    pub value: String,
}

/// Operations that are only permitted while a story is still `todo`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TodoGatedOperation {
    /// Deleting the story.
    Delete,
    /// Linking the story to an epic.
    LinkToEpic,
    /// Editing the story's core fields.
    Modify,
}

impl TodoGatedOperation {
    /// Returns the rejection message shown when the gate is closed.
    #[must_use]
    pub const fn rejection_message(self) -> &'static str {
        match self {
            Self::Delete => "Only stories in TODO state can be deleted.",
            Self::LinkToEpic => "Cannot link an epic to a user story with status higher than TODO",
            Self::Modify => "Only stories in TODO status can be modified.",
        }
    }
}

/// Entities that carry an optional start/end date pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatedSubject {
    /// Project schedule.
    Project,
    /// Task schedule.
    Task,
}

/// Which end of a date range was being written when validation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DateBoundary {
    /// The start date.
    Start,
    /// The end date.
    End,
}

const fn date_range_message(subject: &DatedSubject, boundary: &DateBoundary) -> &'static str {
    match (*subject, *boundary) {
        (DatedSubject::Project, DateBoundary::Start) => "Start date must be before end date",
        (DatedSubject::Project, DateBoundary::End) => "End date must be after start date",
        (DatedSubject::Task, DateBoundary::Start) => "Start date cannot be after the end date",
        (DatedSubject::Task, DateBoundary::End) => "End date cannot be before the start date",
    }
}

/// A lifecycle validator rejected the requested mutation.
///
/// The display text is the business-rule message; the fields identify the
/// entities involved.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LifecycleViolation {
    /// The story has at least one unmet acceptance criterion.
    #[error("All acceptance criteria must be met to mark as DONE.")]
    UnmetAcceptanceCriteria {
        /// Story whose transition was rejected.
        story_id: UserStoryId,
        /// Number of unmet criteria.
        unmet: usize,
    },

    /// The operation requires the story to be in `todo`.
    #[error("{}", .operation.rejection_message())]
    StoryNotInTodo {
        /// Story that was not in `todo`.
        story_id: UserStoryId,
        /// Status the story was actually in.
        status: UserStoryStatus,
        /// Operation that was rejected.
        operation: TodoGatedOperation,
    },

    /// A start date would fall after its end date.
    #[error("{}", date_range_message(.subject, .boundary))]
    InvalidDateRange {
        /// Entity type whose schedule was rejected.
        subject: DatedSubject,
        /// Boundary being written.
        boundary: DateBoundary,
        /// Candidate start date.
        start: DateTime<Utc>,
        /// Candidate end date.
        end: DateTime<Utc>,
    },

    /// The project already owns a product backlog.
    #[error("This project already has a ProductBacklog assigned")]
    ProductBacklogAlreadyAssigned {
        /// Project that already has a backlog.
        project_id: ProjectId,
        /// Backlog currently assigned.
        product_backlog_id: ProductBacklogId,
    },

    /// The product backlog already belongs to a project.
    #[error("This ProductBacklog already belongs to a project")]
    ProductBacklogAlreadyOwned {
        /// Backlog that already has an owner.
        product_backlog_id: ProductBacklogId,
        /// Project currently owning it.
        project_id: ProjectId,
    },

    /// The product backlog has no associated project.
    #[error("No project associated with this product backlog")]
    MissingProject {
        /// Backlog without a project.
        product_backlog_id: ProductBacklogId,
    },

    /// The story is not assigned to the sprint it is being removed from.
    #[error("User story does not belong to the specified sprint backlog")]
    StoryNotInSprint {
        /// Story being removed.
        story_id: UserStoryId,
        /// Sprint named by the caller.
        sprint_backlog_id: SprintBacklogId,
        /// Sprint the story is actually assigned to, if any.
        actual_sprint_backlog_id: Option<SprintBacklogId>,
    },
}

impl LifecycleViolation {
    /// Returns the failure classification.
    #[must_use]
    pub const fn kind(&self) -> FailureKind {
        match self {
            Self::ProductBacklogAlreadyAssigned { .. } | Self::ProductBacklogAlreadyOwned { .. } => {
                FailureKind::AlreadyAssigned
            }
            Self::MissingProject { .. } => FailureKind::NotFound,
            Self::UnmetAcceptanceCriteria { .. }
            | Self::StoryNotInTodo { .. }
            | Self::InvalidDateRange { .. }
            | Self::StoryNotInSprint { .. } => FailureKind::BusinessRuleViolation,
        }
    }
}
