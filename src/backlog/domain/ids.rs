//! Identifier newtypes for backlog entities.
//!
//! Every entity table is keyed by its own UUID wrapper so that a story
//! identifier can never be passed where an epic identifier is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            #[doc = concat!("Creates a new random ", $label, " identifier.")]
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Returns the wrapped UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl AsRef<Uuid> for $name {
            fn as_ref(&self) -> &Uuid {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

entity_id!(
    /// Unique identifier for a project.
    ProjectId,
    "project"
);

entity_id!(
    /// Unique identifier for a product backlog.
    ProductBacklogId,
    "product backlog"
);

entity_id!(
    /// Unique identifier for an epic.
    EpicId,
    "epic"
);

entity_id!(
    /// Unique identifier for a sprint backlog.
    SprintBacklogId,
    "sprint backlog"
);

entity_id!(
    /// Unique identifier for a user story.
    UserStoryId,
    "user story"
);

entity_id!(
    /// Unique identifier for an acceptance criterion.
    AcceptanceCriteriaId,
    "acceptance criteria"
);

entity_id!(
    /// Unique identifier for an implementation task.
    TaskId,
    "task"
);
