//! Explicit cascade-delete plans.
//!
//! A plan enumerates every entity removed by one deletion, ordered so that
//! children always precede their owners. Only ownership edges cascade:
//! backlog → epics/sprints/stories, epic → linked stories, and
//! story → criteria/tasks. Sprint membership never cascades.

use super::{
    AcceptanceCriteriaId, EntityRef, EpicId, ProductBacklogId, SprintBacklogId, TaskId,
    UserStoryId,
};
use std::collections::HashSet;

/// A story together with the ids of the children it owns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoryDependents {
    /// The story being removed.
    pub story: UserStoryId,
    /// Criteria owned by the story.
    pub criteria: Vec<AcceptanceCriteriaId>,
    /// Tasks owned by the story.
    pub tasks: Vec<TaskId>,
}

impl StoryDependents {
    /// Creates the dependents of a story without children.
    #[must_use]
    pub const fn leaf(story: UserStoryId) -> Self {
        Self {
            story,
            criteria: Vec::new(),
            tasks: Vec::new(),
        }
    }
}

/// Ordered, duplicate-free set of removals produced by one deletion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CascadePlan {
    removals: Vec<EntityRef>,
    seen: HashSet<EntityRef>,
}

impl CascadePlan {
    /// Plans the deletion of a single story with its criteria and tasks.
    #[must_use]
    pub fn user_story(dependents: StoryDependents) -> Self {
        let mut plan = Self::default();
        plan.push_story(dependents);
        plan
    }

    /// Plans the deletion of an epic and every story linked to it.
    #[must_use]
    pub fn epic(epic_id: EpicId, stories: Vec<StoryDependents>) -> Self {
        let mut plan = Self::default();
        for story in stories {
            plan.push_story(story);
        }
        plan.push(EntityRef::Epic(epic_id));
        plan
    }

    /// Plans the deletion of a product backlog and everything it owns.
    ///
    /// `stories` may list the same story more than once (for example a story
    /// linked to one of the epics and living in one of the sprints); each
    /// entity appears in the plan once.
    #[must_use]
    pub fn product_backlog(
        product_backlog_id: ProductBacklogId,
        epics: Vec<EpicId>,
        sprints: Vec<SprintBacklogId>,
        stories: Vec<StoryDependents>,
    ) -> Self {
        let mut plan = Self::default();
        for story in stories {
            plan.push_story(story);
        }
        for epic_id in epics {
            plan.push(EntityRef::Epic(epic_id));
        }
        for sprint_id in sprints {
            plan.push(EntityRef::SprintBacklog(sprint_id));
        }
        plan.push(EntityRef::ProductBacklog(product_backlog_id));
        plan
    }

    /// Returns the removals, children before owners.
    #[must_use]
    pub fn removals(&self) -> &[EntityRef] {
        &self.removals
    }

    /// Returns whether the plan removes `entity`.
    #[must_use]
    pub fn contains(&self, entity: EntityRef) -> bool {
        self.seen.contains(&entity)
    }

    /// Returns the number of removals.
    #[must_use]
    pub fn len(&self) -> usize {
        self.removals.len()
    }

    /// Returns whether the plan removes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.removals.is_empty()
    }

    /// Consumes the plan, returning the ordered removals.
    #[must_use]
    pub fn into_removals(self) -> Vec<EntityRef> {
        self.removals
    }

    fn push_story(&mut self, dependents: StoryDependents) {
        let StoryDependents {
            story,
            criteria,
            tasks,
        } = dependents;
        for criterion in criteria {
            self.push(EntityRef::AcceptanceCriteria(criterion));
        }
        for task in tasks {
            self.push(EntityRef::Task(task));
        }
        self.push(EntityRef::UserStory(story));
    }

    fn push(&mut self, entity: EntityRef) {
        if self.seen.insert(entity) {
            self.removals.push(entity);
        }
    }
}
