//! Atomic write batches.

use super::BacklogRepositoryResult;
use crate::backlog::domain::{
    AcceptanceCriteria, CascadePlan, EntityRef, Epic, ProductBacklog, Project, SprintBacklog,
    Task, UserStory,
};
use async_trait::async_trait;

/// Any entity that can be written through a [`UnitOfWork`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BacklogRecord {
    /// A project.
    Project(Project),
    /// A product backlog.
    ProductBacklog(ProductBacklog),
    /// An epic.
    Epic(Epic),
    /// A sprint backlog.
    SprintBacklog(SprintBacklog),
    /// A user story.
    UserStory(UserStory),
    /// An acceptance criterion.
    AcceptanceCriteria(AcceptanceCriteria),
    /// A task.
    Task(Task),
}

impl BacklogRecord {
    /// Returns a reference naming the wrapped entity.
    #[must_use]
    pub fn entity_ref(&self) -> EntityRef {
        match self {
            Self::Project(project) => project.id().into(),
            Self::ProductBacklog(backlog) => backlog.id().into(),
            Self::Epic(epic) => epic.id().into(),
            Self::SprintBacklog(sprint) => sprint.id().into(),
            Self::UserStory(story) => story.id().into(),
            Self::AcceptanceCriteria(criterion) => criterion.id().into(),
            Self::Task(task) => task.id().into(),
        }
    }
}

macro_rules! record_from {
    ($($variant:ident),+ $(,)?) => {
        $(
            impl From<$variant> for BacklogRecord {
                fn from(value: $variant) -> Self {
                    Self::$variant(value)
                }
            }
        )+
    };
}

record_from!(
    Project,
    ProductBacklog,
    Epic,
    SprintBacklog,
    UserStory,
    AcceptanceCriteria,
    Task,
);

/// Inserts, updates and removals committed together.
///
/// Implementations check every write before applying any of them: an insert
/// of an existing id, or an update or removal of a missing id, rejects the
/// whole batch and leaves storage untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UnitOfWork {
    inserts: Vec<BacklogRecord>,
    updates: Vec<BacklogRecord>,
    removals: Vec<EntityRef>,
}

impl UnitOfWork {
    /// Creates an empty unit of work.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a new entity.
    #[must_use]
    pub fn insert(mut self, record: impl Into<BacklogRecord>) -> Self {
        self.inserts.push(record.into());
        self
    }

    /// Replaces an existing entity.
    #[must_use]
    pub fn update(mut self, record: impl Into<BacklogRecord>) -> Self {
        self.updates.push(record.into());
        self
    }

    /// Replaces several existing entities.
    #[must_use]
    pub fn update_all<R>(mut self, records: impl IntoIterator<Item = R>) -> Self
    where
        R: Into<BacklogRecord>,
    {
        self.updates.extend(records.into_iter().map(Into::into));
        self
    }

    /// Removes an existing entity.
    #[must_use]
    pub fn remove(mut self, entity: impl Into<EntityRef>) -> Self {
        self.removals.push(entity.into());
        self
    }

    /// Removes every entity named by a cascade plan, in plan order.
    #[must_use]
    pub fn cascade(mut self, plan: CascadePlan) -> Self {
        self.removals.extend(plan.into_removals());
        self
    }

    /// Returns the pending inserts.
    #[must_use]
    pub fn inserts(&self) -> &[BacklogRecord] {
        &self.inserts
    }

    /// Returns the pending updates.
    #[must_use]
    pub fn updates(&self) -> &[BacklogRecord] {
        &self.updates
    }

    /// Returns the pending removals.
    #[must_use]
    pub fn removals(&self) -> &[EntityRef] {
        &self.removals
    }

    /// Returns whether nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inserts.is_empty() && self.updates.is_empty() && self.removals.is_empty()
    }

    /// Splits the unit into inserts, updates and removals.
    #[must_use]
    pub fn into_parts(self) -> (Vec<BacklogRecord>, Vec<BacklogRecord>, Vec<EntityRef>) {
        (self.inserts, self.updates, self.removals)
    }
}

/// Atomic commit contract.
#[async_trait]
pub trait UnitOfWorkPort: Send + Sync {
    /// Applies every write in `work`, or none of them.
    ///
    /// # Errors
    ///
    /// Returns [`super::BacklogRepositoryError::Duplicate`] when an insert
    /// names an existing entity and [`super::BacklogRepositoryError::NotFound`]
    /// when an update or removal names a missing one.
    async fn commit(&self, work: UnitOfWork) -> BacklogRepositoryResult<()>;
}
