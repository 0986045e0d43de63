//! Derived "where is this story" view.

use super::{EpicId, ProductBacklogId, SprintBacklogId, StoryHome};
use serde::{Deserialize, Serialize};

/// The four reachable combinations of a story's home and epic link.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "placement", rename_all = "snake_case")]
pub enum StoryPlacement {
    /// In a product backlog, not grouped under an epic.
    InBacklog {
        /// Backlog holding the story.
        product_backlog_id: ProductBacklogId,
    },
    /// In a product backlog and grouped under an epic.
    InEpicOnly {
        /// Backlog holding the story.
        product_backlog_id: ProductBacklogId,
        /// Epic grouping the story.
        epic_id: EpicId,
    },
    /// Assigned to a sprint, not grouped under an epic.
    InSprint {
        /// Sprint holding the story.
        sprint_backlog_id: SprintBacklogId,
    },
    /// Assigned to a sprint and grouped under an epic.
    InEpicAndSprint {
        /// Epic grouping the story.
        epic_id: EpicId,
        /// Sprint holding the story.
        sprint_backlog_id: SprintBacklogId,
    },
}

impl StoryPlacement {
    /// Computes the placement from a home and an optional epic link.
    #[must_use]
    pub const fn of(home: StoryHome, epic: Option<EpicId>) -> Self {
        match (home, epic) {
            (StoryHome::ProductBacklog(product_backlog_id), None) => {
                Self::InBacklog { product_backlog_id }
            }
            (StoryHome::ProductBacklog(product_backlog_id), Some(epic_id)) => Self::InEpicOnly {
                product_backlog_id,
                epic_id,
            },
            (StoryHome::SprintBacklog(sprint_backlog_id), None) => {
                Self::InSprint { sprint_backlog_id }
            }
            (StoryHome::SprintBacklog(sprint_backlog_id), Some(epic_id)) => {
                Self::InEpicAndSprint {
                    epic_id,
                    sprint_backlog_id,
                }
            }
        }
    }

    /// Returns whether the story is assigned to a sprint.
    #[must_use]
    pub const fn is_in_sprint(self) -> bool {
        matches!(self, Self::InSprint { .. } | Self::InEpicAndSprint { .. })
    }

    /// Returns the linked epic, if any.
    #[must_use]
    pub const fn epic_id(self) -> Option<EpicId> {
        match self {
            Self::InEpicOnly { epic_id, .. } | Self::InEpicAndSprint { epic_id, .. } => {
                Some(epic_id)
            }
            Self::InBacklog { .. } | Self::InSprint { .. } => None,
        }
    }
}
