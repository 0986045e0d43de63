//! Typed references to any entity in the backlog graph.

use super::{
    AcceptanceCriteriaId, EpicId, ProductBacklogId, ProjectId, SprintBacklogId, TaskId,
    UserStoryId,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// The kinds of entity tracked by the backlog engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A [`super::Project`].
    Project,
    /// A [`super::ProductBacklog`].
    ProductBacklog,
    /// An [`super::Epic`].
    Epic,
    /// A [`super::SprintBacklog`].
    SprintBacklog,
    /// A [`super::UserStory`].
    UserStory,
    /// An [`super::AcceptanceCriteria`].
    AcceptanceCriteria,
    /// A [`super::Task`].
    Task,
}

impl EntityKind {
    /// Returns the human-readable label used in error messages.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Project => "project",
            Self::ProductBacklog => "product backlog",
            Self::Epic => "epic",
            Self::SprintBacklog => "sprint backlog",
            Self::UserStory => "user story",
            Self::AcceptanceCriteria => "acceptance criteria",
            Self::Task => "task",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Identifier of an entity together with its kind.
///
/// Used wherever a single value has to name "some entity", such as missing
/// lookups and cascade removals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum EntityRef {
    /// Reference to a project.
    Project(ProjectId),
    /// Reference to a product backlog.
    ProductBacklog(ProductBacklogId),
    /// Reference to an epic.
    Epic(EpicId),
    /// Reference to a sprint backlog.
    SprintBacklog(SprintBacklogId),
    /// Reference to a user story.
    UserStory(UserStoryId),
    /// Reference to an acceptance criterion.
    AcceptanceCriteria(AcceptanceCriteriaId),
    /// Reference to a task.
    Task(TaskId),
}

impl EntityRef {
    /// Returns the kind of the referenced entity.
    #[must_use]
    pub const fn kind(self) -> EntityKind {
        match self {
            Self::Project(_) => EntityKind::Project,
            Self::ProductBacklog(_) => EntityKind::ProductBacklog,
            Self::Epic(_) => EntityKind::Epic,
            Self::SprintBacklog(_) => EntityKind::SprintBacklog,
            Self::UserStory(_) => EntityKind::UserStory,
            Self::AcceptanceCriteria(_) => EntityKind::AcceptanceCriteria,
            Self::Task(_) => EntityKind::Task,
        }
    }

    /// Returns the raw UUID of the referenced entity.
    #[must_use]
    pub const fn uuid(self) -> Uuid {
        match self {
            Self::Project(id) => id.into_inner(),
            Self::ProductBacklog(id) => id.into_inner(),
            Self::Epic(id) => id.into_inner(),
            Self::SprintBacklog(id) => id.into_inner(),
            Self::UserStory(id) => id.into_inner(),
            Self::AcceptanceCriteria(id) => id.into_inner(),
            Self::Task(id) => id.into_inner(),
        }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.kind(), self.uuid())
    }
}

impl From<ProjectId> for EntityRef {
    fn from(id: ProjectId) -> Self {
        Self::Project(id)
    }
}

impl From<ProductBacklogId> for EntityRef {
    fn from(id: ProductBacklogId) -> Self {
        Self::ProductBacklog(id)
    }
}

impl From<EpicId> for EntityRef {
    fn from(id: EpicId) -> Self {
        Self::Epic(id)
    }
}

impl From<SprintBacklogId> for EntityRef {
    fn from(id: SprintBacklogId) -> Self {
        Self::SprintBacklog(id)
    }
}

impl From<UserStoryId> for EntityRef {
    fn from(id: UserStoryId) -> Self {
        Self::UserStory(id)
    }
}

impl From<AcceptanceCriteriaId> for EntityRef {
    fn from(id: AcceptanceCriteriaId) -> Self {
        Self::AcceptanceCriteria(id)
    }
}

impl From<TaskId> for EntityRef {
    fn from(id: TaskId) -> Self {
        Self::Task(id)
    }
}
