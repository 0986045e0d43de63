//! Sprint backlog entity.

use super::{ProductBacklogId, SprintBacklogId, SprintBacklogName};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// The stories selected for one iteration of a product backlog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SprintBacklog {
    id: SprintBacklogId,
    name: SprintBacklogName,
    product_backlog_id: ProductBacklogId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl SprintBacklog {
    /// Creates a sprint inside the given backlog.
    #[must_use]
    pub fn new(
        name: SprintBacklogName,
        product_backlog_id: ProductBacklogId,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: SprintBacklogId::new(),
            name,
            product_backlog_id,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Returns the sprint identifier.
    #[must_use]
    pub const fn id(&self) -> SprintBacklogId {
        self.id
    }

    /// Returns the sprint name.
    #[must_use]
    pub const fn name(&self) -> &SprintBacklogName {
        &self.name
    }

    /// Returns the product backlog the sprint was planned from.
    #[must_use]
    pub const fn product_backlog_id(&self) -> ProductBacklogId {
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

    /// Renames the sprint.
    pub fn rename(&mut self, name: SprintBacklogName, clock: &impl Clock) {
        self.name = name;
        self.touch(clock);
    }

    /// Refreshes the modification timestamp after a story was added.
    pub fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
