//! User story entity, its home, and its guarded mutations.

use super::{
    AcceptanceCriteria, EpicId, LifecycleViolation, ProductBacklogId, SprintBacklogId,
    StoryNarrative, StoryPlacement, TodoGatedOperation, TransitionGuard, UserStoryId, UserStoryName,
    UserStoryStatus, guards,
};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// The single collection a story currently lives in.
///
/// A story sits in exactly one of its product backlog or a sprint backlog.
/// Moving into a sprint replaces the backlog home.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum StoryHome {
    /// The story waits in a product backlog.
    ProductBacklog(ProductBacklogId),
    /// The story is assigned to a sprint.
    SprintBacklog(SprintBacklogId),
}

/// Caller-editable user story fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserStoryDraft {
    /// Story name.
    pub name: UserStoryName,
    /// Role, feature and benefit.
    pub narrative: StoryNarrative,
    /// Ordering key; lower values are more important.
    pub priority: i32,
}

/// A user-facing requirement owning acceptance criteria and tasks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserStory {
    id: UserStoryId,
    name: UserStoryName,
    narrative: StoryNarrative,
    priority: i32,
    status: UserStoryStatus,
    home: StoryHome,
    epic_id: Option<EpicId>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserStory {
    /// Creates a story in `home`. New stories always start in `todo`.
    #[must_use]
    pub fn new(draft: UserStoryDraft, home: StoryHome, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: UserStoryId::new(),
            name: draft.name,
            narrative: draft.narrative,
            priority: draft.priority,
            status: UserStoryStatus::Todo,
            home,
            epic_id: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Returns the story identifier.
    #[must_use]
    pub const fn id(&self) -> UserStoryId {
        self.id
    }

    /// Returns the story name.
    #[must_use]
    pub const fn name(&self) -> &UserStoryName {
        &self.name
    }

    /// Returns the story narrative.
    #[must_use]
    pub const fn narrative(&self) -> &StoryNarrative {
        &self.narrative
    }

    /// Returns the priority; lower values come first.
    #[must_use]
    pub const fn priority(&self) -> i32 {
        self.priority
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> UserStoryStatus {
        self.status
    }

    /// Returns the collection the story lives in.
    #[must_use]
    pub const fn home(&self) -> StoryHome {
        self.home
    }

    /// Returns the product backlog, when the story lives there.
    #[must_use]
    pub const fn product_backlog_id(&self) -> Option<ProductBacklogId> {
        match self.home {
            StoryHome::ProductBacklog(id) => Some(id),
            StoryHome::SprintBacklog(_) => None,
        }
    }

    /// Returns the sprint, when the story is assigned to one.
    #[must_use]
    pub const fn sprint_backlog_id(&self) -> Option<SprintBacklogId> {
        match self.home {
            StoryHome::SprintBacklog(id) => Some(id),
            StoryHome::ProductBacklog(_) => None,
        }
    }

    /// Returns the linked epic, if any.
    #[must_use]
    pub const fn epic_id(&self) -> Option<EpicId> {
        self.epic_id
    }

    /// Returns where the story sits in the backlog hierarchy.
    #[must_use]
    pub const fn placement(&self) -> StoryPlacement {
        StoryPlacement::of(self.home, self.epic_id)
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

    /// Replaces name, narrative and priority. Status is left untouched.
    pub fn apply(&mut self, draft: UserStoryDraft, clock: &impl Clock) {
        self.name = draft.name;
        self.narrative = draft.narrative;
        self.priority = draft.priority;
        self.touch(clock);
    }

    /// Moves the story to `status`.
    ///
    /// `criteria` must hold the story's acceptance criteria; it is only
    /// consulted when the target status is guarded.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleViolation::UnmetAcceptanceCriteria`] when entering
    /// `done` while any criterion is unmet.
    pub fn change_status(
        &mut self,
        status: UserStoryStatus,
        criteria: &[AcceptanceCriteria],
        clock: &impl Clock,
    ) -> Result<(), LifecycleViolation> {
        match status.entry_guard() {
            TransitionGuard::AllCriteriaMet => guards::all_criteria_met(self.id, criteria)?,
            TransitionGuard::Unguarded => {}
        }
        self.status = status;
        self.touch(clock);
        Ok(())
    }

    /// Groups the story under `epic_id`. The home is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`LifecycleViolation::StoryNotInTodo`] unless the story is in
    /// `todo`.
    pub fn link_to_epic(
        &mut self,
        epic_id: EpicId,
        clock: &impl Clock,
    ) -> Result<(), LifecycleViolation> {
        guards::require_todo(self.id, self.status, TodoGatedOperation::LinkToEpic)?;
        self.epic_id = Some(epic_id);
        self.touch(clock);
        Ok(())
    }

    /// Clears the epic link.
    pub fn unlink_from_epic(&mut self, clock: &impl Clock) {
        self.epic_id = None;
        self.touch(clock);
    }

    /// Assigns the story to a sprint, clearing its product backlog home.
    pub fn move_to_sprint(&mut self, sprint_backlog_id: SprintBacklogId, clock: &impl Clock) {
        self.home = StoryHome::SprintBacklog(sprint_backlog_id);
        self.touch(clock);
    }

    /// Returns the story to a product backlog when its sprint goes away.
    pub(crate) fn return_to_backlog(
        &mut self,
        product_backlog_id: ProductBacklogId,
        clock: &impl Clock,
    ) {
        self.home = StoryHome::ProductBacklog(product_backlog_id);
        self.touch(clock);
    }

    fn touch(&mut self, clock: &impl Clock) {
        self.updated_at = clock.utc();
    }
}
