//! Lifecycle status enums and their transition rules.
//!
//! The machines are deliberately permissive: the only guarded edge is entry
//! into [`UserStoryStatus::Done`], which requires every acceptance criterion
//! of the story to be met.

use super::ParseStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Precondition attached to entering a status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransitionGuard {
    /// The status may be entered from any status.
    Unguarded,
    /// Every acceptance criterion of the story must be met.
    AllCriteriaMet,
}

/// Project lifecycle status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectStatus {
    /// Work has not started.
    #[default]
    NotStarted,
    /// Work is under way.
    InProgress,
    /// The project has been delivered.
    Completed,
}

impl ProjectStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "not_started",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }
}

impl fmt::Display for ProjectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ProjectStatus {
    type Error = ParseStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "not_started" => Ok(Self::NotStarted),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            _ => Err(ParseStatusError {
                entity: "project",
                value: value.to_owned(),
            }),
        }
    }
}

/// User story lifecycle status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserStoryStatus {
    /// Not yet started; the only status in which a story can be linked to an
    /// epic or deleted.
    #[default]
    Todo,
    /// Being implemented.
    InProgress,
    /// Complete. Stories may be reopened.
    Done,
}

impl UserStoryStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::Done => "done",
        }
    }

    /// Returns the precondition for entering this status.
    #[must_use]
    pub const fn entry_guard(self) -> TransitionGuard {
        match self {
            Self::Done => TransitionGuard::AllCriteriaMet,
            Self::Todo | Self::InProgress => TransitionGuard::Unguarded,
        }
    }

    /// Returns whether this status is `todo`.
    #[must_use]
    pub const fn is_todo(self) -> bool {
        matches!(self, Self::Todo)
    }
}

impl fmt::Display for UserStoryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for UserStoryStatus {
    type Error = ParseStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "todo" => Ok(Self::Todo),
            "in_progress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            _ => Err(ParseStatusError {
                entity: "user story",
                value: value.to_owned(),
            }),
        }
    }
}

/// Task lifecycle status. Every transition is permitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not yet started.
    #[default]
    Todo,
    /// Being worked on.
    InProgress,
    /// Finished.
    Done,
}

impl TaskStatus {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "todo" => Ok(Self::Todo),
            "in_progress" => Ok(Self::InProgress),
            "done" => Ok(Self::Done),
            _ => Err(ParseStatusError {
                entity: "task",
                value: value.to_owned(),
            }),
        }
    }
}
