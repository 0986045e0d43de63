//! In-memory backlog store for tests and embedding.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

use crate::backlog::{
    domain::{
        AcceptanceCriteria, AcceptanceCriteriaId, EntityRef, Epic, EpicId, ProductBacklog,
        ProductBacklogId, Project, ProjectId, ProjectStatus, SprintBacklog, SprintBacklogId, Task,
        TaskId, TaskStatus, UserStory, UserStoryId, UserStoryStatus,
    },
    ports::{
        AcceptanceCriteriaRepository, BacklogRecord, BacklogRepositoryError,
        BacklogRepositoryResult, EpicRepository, ProductBacklogRepository, ProjectRepository,
        SprintBacklogRepository, TaskRepository, UnitOfWork, UnitOfWorkPort, UserStoryRepository,
    },
};

/// Thread-safe in-memory implementation of every backlog port.
///
/// Clones share the same tables.
#[derive(Debug, Clone, Default)]
pub struct InMemoryBacklogStore {
    state: Arc<RwLock<BacklogTables>>,
}

#[derive(Debug, Default)]
struct BacklogTables {
    projects: HashMap<ProjectId, Project>,
    product_backlogs: HashMap<ProductBacklogId, ProductBacklog>,
    epics: HashMap<EpicId, Epic>,
    sprint_backlogs: HashMap<SprintBacklogId, SprintBacklog>,
    user_stories: HashMap<UserStoryId, UserStory>,
    acceptance_criteria: HashMap<AcceptanceCriteriaId, AcceptanceCriteria>,
    tasks: HashMap<TaskId, Task>,
}

impl BacklogTables {
    fn contains(&self, entity: EntityRef) -> bool {
        match entity {
            EntityRef::Project(id) => self.projects.contains_key(&id),
            EntityRef::ProductBacklog(id) => self.product_backlogs.contains_key(&id),
            EntityRef::Epic(id) => self.epics.contains_key(&id),
            EntityRef::SprintBacklog(id) => self.sprint_backlogs.contains_key(&id),
            EntityRef::UserStory(id) => self.user_stories.contains_key(&id),
            EntityRef::AcceptanceCriteria(id) => self.acceptance_criteria.contains_key(&id),
            EntityRef::Task(id) => self.tasks.contains_key(&id),
        }
    }

    fn put(&mut self, record: BacklogRecord) {
        match record {
            BacklogRecord::Project(project) => {
                self.projects.insert(project.id(), project);
            }
            BacklogRecord::ProductBacklog(backlog) => {
                self.product_backlogs.insert(backlog.id(), backlog);
            }
            BacklogRecord::Epic(epic) => {
                self.epics.insert(epic.id(), epic);
            }
            BacklogRecord::SprintBacklog(sprint) => {
                self.sprint_backlogs.insert(sprint.id(), sprint);
            }
            BacklogRecord::UserStory(story) => {
                self.user_stories.insert(story.id(), story);
            }
            BacklogRecord::AcceptanceCriteria(criterion) => {
                self.acceptance_criteria.insert(criterion.id(), criterion);
            }
            BacklogRecord::Task(task) => {
                self.tasks.insert(task.id(), task);
            }
        }
    }

    fn delete(&mut self, entity: EntityRef) {
        match entity {
            EntityRef::Project(id) => {
                self.projects.remove(&id);
            }
            EntityRef::ProductBacklog(id) => {
                self.product_backlogs.remove(&id);
            }
            EntityRef::Epic(id) => {
                self.epics.remove(&id);
            }
            EntityRef::SprintBacklog(id) => {
                self.sprint_backlogs.remove(&id);
            }
            EntityRef::UserStory(id) => {
                self.user_stories.remove(&id);
            }
            EntityRef::AcceptanceCriteria(id) => {
                self.acceptance_criteria.remove(&id);
            }
            EntityRef::Task(id) => {
                self.tasks.remove(&id);
            }
        }
    }

    /// Checks every write in the batch against the current tables.
    fn check(&self, work: &UnitOfWork) -> BacklogRepositoryResult<()> {
        let mut inserted = Vec::with_capacity(work.inserts().len());
        for record in work.inserts() {
            let entity = record.entity_ref();
            if self.contains(entity) || inserted.contains(&entity) {
                return Err(BacklogRepositoryError::Duplicate(entity));
            }
            inserted.push(entity);
        }
        let targets = work
            .updates()
            .iter()
            .map(BacklogRecord::entity_ref)
            .chain(work.removals().iter().copied());
        for entity in targets {
            if !self.contains(entity) {
                return Err(BacklogRepositoryError::NotFound(entity));
            }
        }
        Ok(())
    }
}

impl InMemoryBacklogStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> BacklogRepositoryResult<RwLockReadGuard<'_, BacklogTables>> {
        self.state.read().map_err(|err| {
            BacklogRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }

    fn write(&self) -> BacklogRepositoryResult<RwLockWriteGuard<'_, BacklogTables>> {
        self.state.write().map_err(|err| {
            BacklogRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })
    }
}

/// Returns matching rows ordered by creation time, then id.
fn select<K, V, F>(
    table: &HashMap<K, V>,
    predicate: F,
    key: impl Fn(&V) -> (DateTime<Utc>, K),
) -> Vec<V>
where
    K: Eq + Hash + Ord,
    V: Clone,
    F: Fn(&V) -> bool,
{
    let mut rows: Vec<V> = table.values().filter(|row| predicate(row)).cloned().collect();
    rows.sort_by_key(key);
    rows
}

fn project_key(project: &Project) -> (DateTime<Utc>, ProjectId) {
    (project.created_at(), project.id())
}

fn backlog_key(backlog: &ProductBacklog) -> (DateTime<Utc>, ProductBacklogId) {
    (backlog.created_at(), backlog.id())
}

fn epic_key(epic: &Epic) -> (DateTime<Utc>, EpicId) {
    (epic.created_at(), epic.id())
}

fn sprint_key(sprint: &SprintBacklog) -> (DateTime<Utc>, SprintBacklogId) {
    (sprint.created_at(), sprint.id())
}

fn story_key(story: &UserStory) -> (DateTime<Utc>, UserStoryId) {
    (story.created_at(), story.id())
}

fn criterion_key(criterion: &AcceptanceCriteria) -> (DateTime<Utc>, AcceptanceCriteriaId) {
    (criterion.created_at(), criterion.id())
}

fn task_key(task: &Task) -> (DateTime<Utc>, TaskId) {
    (task.created_at(), task.id())
}

#[async_trait]
impl UnitOfWorkPort for InMemoryBacklogStore {
    async fn commit(&self, work: UnitOfWork) -> BacklogRepositoryResult<()> {
        let mut state = self.write()?;
        state.check(&work)?;
        let (inserts, updates, removals) = work.into_parts();
        debug!(
            inserts = inserts.len(),
            updates = updates.len(),
            removals = removals.len(),
            "committing unit of work"
        );
        for record in inserts.into_iter().chain(updates) {
            state.put(record);
        }
        for entity in removals {
            state.delete(entity);
        }
        Ok(())
    }
}

#[async_trait]
impl ProjectRepository for InMemoryBacklogStore {
    async fn find_project(&self, id: ProjectId) -> BacklogRepositoryResult<Option<Project>> {
        Ok(self.read()?.projects.get(&id).cloned())
    }

    async fn all_projects(&self) -> BacklogRepositoryResult<Vec<Project>> {
        Ok(select(&self.read()?.projects, |_| true, project_key))
    }

    async fn projects_by_status(
        &self,
        status: ProjectStatus,
    ) -> BacklogRepositoryResult<Vec<Project>> {
        let state = self.read()?;
        Ok(select(
            &state.projects,
            |project| project.status() == status,
            project_key,
        ))
    }

    async fn projects_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> BacklogRepositoryResult<Vec<Project>> {
        let state = self.read()?;
        Ok(select(
            &state.projects,
            |project| {
                matches!(
                    (project.start_date(), project.end_date()),
                    (Some(from), Some(to)) if from > start && to < end
                )
            },
            project_key,
        ))
    }
}

#[async_trait]
impl ProductBacklogRepository for InMemoryBacklogStore {
    async fn find_product_backlog(
        &self,
        id: ProductBacklogId,
    ) -> BacklogRepositoryResult<Option<ProductBacklog>> {
        Ok(self.read()?.product_backlogs.get(&id).cloned())
    }

    async fn all_product_backlogs(&self) -> BacklogRepositoryResult<Vec<ProductBacklog>> {
        Ok(select(&self.read()?.product_backlogs, |_| true, backlog_key))
    }
}

#[async_trait]
impl EpicRepository for InMemoryBacklogStore {
    async fn find_epic(&self, id: EpicId) -> BacklogRepositoryResult<Option<Epic>> {
        Ok(self.read()?.epics.get(&id).cloned())
    }

    async fn all_epics(&self) -> BacklogRepositoryResult<Vec<Epic>> {
        Ok(select(&self.read()?.epics, |_| true, epic_key))
    }

    async fn epics_by_product_backlog(
        &self,
        product_backlog_id: ProductBacklogId,
    ) -> BacklogRepositoryResult<Vec<Epic>> {
        let state = self.read()?;
        Ok(select(
            &state.epics,
            |epic| epic.product_backlog_id() == product_backlog_id,
            epic_key,
        ))
    }

    async fn epics_by_name(&self, fragment: &str) -> BacklogRepositoryResult<Vec<Epic>> {
        let needle = fragment.to_lowercase();
        let state = self.read()?;
        Ok(select(
            &state.epics,
            |epic| epic.name().as_str().to_lowercase().contains(&needle),
            epic_key,
        ))
    }

    async fn count_epics(&self) -> BacklogRepositoryResult<usize> {
        Ok(self.read()?.epics.len())
    }
}

#[async_trait]
impl SprintBacklogRepository for InMemoryBacklogStore {
    async fn find_sprint_backlog(
        &self,
        id: SprintBacklogId,
    ) -> BacklogRepositoryResult<Option<SprintBacklog>> {
        Ok(self.read()?.sprint_backlogs.get(&id).cloned())
    }

    async fn all_sprint_backlogs(&self) -> BacklogRepositoryResult<Vec<SprintBacklog>> {
        Ok(select(&self.read()?.sprint_backlogs, |_| true, sprint_key))
    }

    async fn sprint_backlogs_by_product_backlog(
        &self,
        product_backlog_id: ProductBacklogId,
    ) -> BacklogRepositoryResult<Vec<SprintBacklog>> {
        let state = self.read()?;
        Ok(select(
            &state.sprint_backlogs,
            |sprint| sprint.product_backlog_id() == product_backlog_id,
            sprint_key,
        ))
    }
}

#[async_trait]
impl UserStoryRepository for InMemoryBacklogStore {
    async fn find_user_story(&self, id: UserStoryId) -> BacklogRepositoryResult<Option<UserStory>> {
        Ok(self.read()?.user_stories.get(&id).cloned())
    }

    async fn user_stories_by_product_backlog(
        &self,
        product_backlog_id: ProductBacklogId,
    ) -> BacklogRepositoryResult<Vec<UserStory>> {
        let state = self.read()?;
        let mut stories = select(
            &state.user_stories,
            |story| story.product_backlog_id() == Some(product_backlog_id),
            story_key,
        );
        stories.sort_by_key(UserStory::priority);
        Ok(stories)
    }

    async fn user_stories_by_status_and_product_backlog(
        &self,
        status: UserStoryStatus,
        product_backlog_id: ProductBacklogId,
    ) -> BacklogRepositoryResult<Vec<UserStory>> {
        let state = self.read()?;
        Ok(select(
            &state.user_stories,
            |story| {
                story.status() == status && story.product_backlog_id() == Some(product_backlog_id)
            },
            story_key,
        ))
    }

    async fn user_stories_by_epic(&self, epic_id: EpicId) -> BacklogRepositoryResult<Vec<UserStory>> {
        let state = self.read()?;
        Ok(select(
            &state.user_stories,
            |story| story.epic_id() == Some(epic_id),
            story_key,
        ))
    }

    async fn user_stories_by_sprint_backlog(
        &self,
        sprint_backlog_id: SprintBacklogId,
    ) -> BacklogRepositoryResult<Vec<UserStory>> {
        let state = self.read()?;
        Ok(select(
            &state.user_stories,
            |story| story.sprint_backlog_id() == Some(sprint_backlog_id),
            story_key,
        ))
    }
}

#[async_trait]
impl AcceptanceCriteriaRepository for InMemoryBacklogStore {
    async fn find_acceptance_criteria(
        &self,
        id: AcceptanceCriteriaId,
    ) -> BacklogRepositoryResult<Option<AcceptanceCriteria>> {
        Ok(self.read()?.acceptance_criteria.get(&id).cloned())
    }

    async fn all_acceptance_criteria(&self) -> BacklogRepositoryResult<Vec<AcceptanceCriteria>> {
        Ok(select(&self.read()?.acceptance_criteria, |_| true, criterion_key))
    }

    async fn acceptance_criteria_by_user_story(
        &self,
        user_story_id: UserStoryId,
    ) -> BacklogRepositoryResult<Vec<AcceptanceCriteria>> {
        let state = self.read()?;
        Ok(select(
            &state.acceptance_criteria,
            |criterion| criterion.user_story_id() == user_story_id,
            criterion_key,
        ))
    }

    async fn acceptance_criteria_by_met(
        &self,
        met: bool,
    ) -> BacklogRepositoryResult<Vec<AcceptanceCriteria>> {
        let state = self.read()?;
        Ok(select(
            &state.acceptance_criteria,
            |criterion| criterion.is_met() == met,
            criterion_key,
        ))
    }
}

#[async_trait]
impl TaskRepository for InMemoryBacklogStore {
    async fn find_task(&self, id: TaskId) -> BacklogRepositoryResult<Option<Task>> {
        Ok(self.read()?.tasks.get(&id).cloned())
    }

    async fn all_tasks(&self) -> BacklogRepositoryResult<Vec<Task>> {
        Ok(select(&self.read()?.tasks, |_| true, task_key))
    }

    async fn tasks_by_status(&self, status: TaskStatus) -> BacklogRepositoryResult<Vec<Task>> {
        let state = self.read()?;
        Ok(select(&state.tasks, |task| task.status() == status, task_key))
    }

    async fn tasks_by_user_story(
        &self,
        user_story_id: UserStoryId,
    ) -> BacklogRepositoryResult<Vec<Task>> {
        let state = self.read()?;
        Ok(select(
            &state.tasks,
            |task| task.user_story_id() == user_story_id,
            task_key,
        ))
    }

    async fn tasks_in_date_range(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> BacklogRepositoryResult<Vec<Task>> {
        let state = self.read()?;
        Ok(select(
            &state.tasks,
            |task| {
                matches!(
                    (task.start_date(), task.end_date()),
                    (Some(from), Some(to)) if from >= start && to <= end
                )
            },
            task_key,
        ))
    }
}
