//! Domain model for the backlog hierarchy.
//!
//! Entities reference each other by identifier only. Collections such as
//! "the stories of an epic" are repository queries, so the graph has no
//! cyclic ownership and serialises as flat tables.

mod acceptance_criteria;
mod cascade;
mod entity;
mod epic;
mod error;
pub(crate) mod guards;
mod ids;
mod placement;
mod product_backlog;
mod project;
mod sprint_backlog;
mod status;
mod task;
mod text;
mod user_story;

pub use acceptance_criteria::{AcceptanceCriteria, AcceptanceCriteriaDraft};
pub use cascade::{CascadePlan, StoryDependents};
pub use entity::{EntityKind, EntityRef};
pub use epic::{Epic, EpicDraft};
pub use error::{
    BacklogDomainError, DateBoundary, DatedSubject, FailureKind, LifecycleViolation,
    ParseStatusError, TextField, TodoGatedOperation,
};
pub use ids::{
    AcceptanceCriteriaId, EpicId, ProductBacklogId, ProjectId, SprintBacklogId, TaskId,
    UserStoryId,
};
pub use placement::StoryPlacement;
pub use product_backlog::ProductBacklog;
pub use project::{Project, ProjectDraft};
pub use sprint_backlog::SprintBacklog;
pub use status::{ProjectStatus, TaskStatus, TransitionGuard, UserStoryStatus};
pub use task::{Task, TaskDraft};
pub use text::{
    BddClause, EpicDescription, EpicName, ProductBacklogName, ProjectName, SprintBacklogName,
    StoryNarrative, TaskDescription, TaskTitle, UserStoryName,
};
pub use user_story::{StoryHome, UserStory, UserStoryDraft};
