//! Given/When/Then acceptance criterion attached to a user story.

use super::{AcceptanceCriteriaId, BddClause, UserStoryId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Caller-editable criterion fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptanceCriteriaDraft {
    /// Given clause.
    pub given: BddClause,
    /// When clause.
    pub when: BddClause,
    /// Then clause.
    pub then: BddClause,
    /// Whether the criterion currently holds.
    pub met: bool,
}

/// A condition that must hold before its story can be marked done.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcceptanceCriteria {
    id: AcceptanceCriteriaId,
    given: BddClause,
    when: BddClause,
    then: BddClause,
    met: bool,
    user_story_id: UserStoryId,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl AcceptanceCriteria {
    /// Creates a criterion for the given story.
    #[must_use]
    pub fn new(
        draft: AcceptanceCriteriaDraft,
        user_story_id: UserStoryId,
        clock: &impl Clock,
    ) -> Self {
        let timestamp = clock.utc();
        Self {
            id: AcceptanceCriteriaId::new(),
            given: draft.given,
            when: draft.when,
            then: draft.then,
            met: draft.met,
            user_story_id,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Returns the criterion identifier.
    #[must_use]
    pub const fn id(&self) -> AcceptanceCriteriaId {
        self.id
    }

    /// Returns the Given clause.
    #[must_use]
    pub const fn given(&self) -> &BddClause {
        &self.given
    }

    /// Returns the When clause.
    #[must_use]
    pub const fn when(&self) -> &BddClause {
        &self.when
    }

    /// Returns the Then clause.
    #[must_use]
    pub const fn then(&self) -> &BddClause {
        &self.then
    }

    /// Returns whether the criterion is met.
    #[must_use]
    pub const fn is_met(&self) -> bool {
        self.met
    }

    /// Returns the owning story.
    #[must_use]
    pub const fn user_story_id(&self) -> UserStoryId {
        self.user_story_id
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

    /// Replaces the clauses and met flag.
    pub fn apply(&mut self, draft: AcceptanceCriteriaDraft, clock: &impl Clock) {
        self.given = draft.given;
        self.when = draft.when;
        self.then = draft.then;
        self.met = draft.met;
        self.updated_at = clock.utc();
    }

    /// Sets the met flag.
    pub fn set_met(&mut self, met: bool, clock: &impl Clock) {
        self.met = met;
        self.updated_at = clock.utc();
    }
}
