//! Epic entity: a thematic grouping of user stories within one backlog.

use super::{EpicDescription, EpicId, EpicName, ProductBacklogId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Caller-editable epic fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EpicDraft {
    /// Epic name.
    pub name: EpicName,
    /// Optional description.
    pub description: Option<EpicDescription>,
}

/// An epic owned by a product backlog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Epic {
    id: EpicId,
    name: EpicName,
    description: Option<EpicDescription>,
    product_backlog_id: ProductBacklogId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Epic {
    /// Creates an epic inside the given backlog.
    #[must_use]
    pub fn new(draft: EpicDraft, product_backlog_id: ProductBacklogId, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: EpicId::new(),
            name: draft.name,
            description: draft.description,
            product_backlog_id,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Returns the epic identifier.
    #[must_use]
    pub const fn id(&self) -> EpicId {
        self.id
    }

    /// Returns the epic name.
    #[must_use]
    pub const fn name(&self) -> &EpicName {
        &self.name
    }

    /// Returns the description, if any.
    #[must_use]
    pub const fn description(&self) -> Option<&EpicDescription> {
        self.description.as_ref()
    }

    /// Returns the owning backlog.
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

    /// Replaces the name and description.
    pub fn apply(&mut self, draft: EpicDraft, clock: &impl Clock) {
        self.name = draft.name;
        self.description = draft.description;
        self.updated_at = clock.utc();
    }
}
