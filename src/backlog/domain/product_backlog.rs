//! Product backlog aggregate.
//!
//! Epics, stories and sprints reference their backlog by id; the backlog
//! itself only records the owning project.

use super::{LifecycleViolation, ProductBacklogId, ProductBacklogName, ProjectId, guards};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// The ordered collection of epics, stories and sprints for one project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductBacklog {
    id: ProductBacklogId,
    name: ProductBacklogName,
    project_id: Option<ProjectId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProductBacklog {
    /// Creates an unowned product backlog.
    #[must_use]
    pub fn new(name: ProductBacklogName, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: ProductBacklogId::new(),
            name,
            project_id: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Returns the backlog identifier.
    #[must_use]
    pub const fn id(&self) -> ProductBacklogId {
        self.id
    }

    /// Returns the backlog name.
    #[must_use]
    pub const fn name(&self) -> &ProductBacklogName {
        &self.name
    }

    /// Returns the owning project, if assigned.
    #[must_use]
    pub const fn project_id(&self) -> Option<ProjectId> {
        self.project_id
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

    /// Records the project owning this backlog.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleViolation::ProductBacklogAlreadyOwned`] when another
    /// project already owns the backlog.
    pub fn assign_to_project(
        &mut self,
        project_id: ProjectId,
        clock: &impl Clock,
    ) -> Result<(), LifecycleViolation> {
        guards::backlog_has_no_owner(self.id, self.project_id)?;
        self.project_id = Some(project_id);
        self.touch(clock);
        Ok(())
    }

    /// Drops the project link after the project itself was deleted.
    pub(crate) fn clear_project(&mut self, clock: &impl Clock) {
        self.project_id = None;
        self.touch(clock);
    }

    /// Refreshes the modification timestamp after a child was added.
    pub fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
