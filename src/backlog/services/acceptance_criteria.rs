//! Acceptance criteria service.

use super::{lookup, BacklogServiceResult};
use crate::backlog::{
    domain::{
        AcceptanceCriteria, AcceptanceCriteriaDraft, AcceptanceCriteriaId, BddClause, TextField,
        UserStory, UserStoryId,
    },
    ports::{BacklogRepository, UnitOfWork},
};
use mockable::Clock;
use std::sync::Arc;
use tracing::info;

/// Request payload for creating or replacing an acceptance criterion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AcceptanceCriteriaRequest {
    given: String,
    when: String,
    then: String,
    met: bool,
}

impl AcceptanceCriteriaRequest {
    /// Creates an unmet criterion from its three clauses.
    #[must_use]
    pub fn new(
        given: impl Into<String>,
        when: impl Into<String>,
        then: impl Into<String>,
    ) -> Self {
        Self {
            given: given.into(),
            when: when.into(),
            then: then.into(),
            met: false,
        }
    }

    /// Sets the met flag.
    #[must_use]
    pub const fn with_met(mut self, met: bool) -> Self {
        self.met = met;
        self
    }

    fn into_draft(self) -> BacklogServiceResult<AcceptanceCriteriaDraft> {
        Ok(AcceptanceCriteriaDraft {
            given: BddClause::new(TextField::Given, self.given)?,
            when: BddClause::new(TextField::When, self.when)?,
            then: BddClause::new(TextField::Then, self.then)?,
            met: self.met,
        })
    }
}

/// Acceptance criteria orchestration service.
#[derive(Clone)]
pub struct AcceptanceCriteriaService<R, C>
where
    R: BacklogRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
}

impl<R, C> AcceptanceCriteriaService<R, C>
where
    R: BacklogRepository,
    C: Clock + Send + Sync,
{
    /// Creates a new acceptance criteria service.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self { repository, clock }
    }

    /// Attaches a criterion to a story.
    ///
    /// # Errors
    ///
    /// Returns [`super::BacklogServiceError`] when the story does not exist,
    /// a clause is invalid, or persistence fails.
    pub async fn create(
        &self,
        user_story_id: UserStoryId,
        request: AcceptanceCriteriaRequest,
    ) -> BacklogServiceResult<AcceptanceCriteria> {
        lookup::user_story(&*self.repository, user_story_id).await?;
        let criteria = AcceptanceCriteria::new(request.into_draft()?, user_story_id, &*self.clock);
        self.repository
            .commit(UnitOfWork::new().insert(criteria.clone()))
            .await?;
        info!(
            user_story_id = %user_story_id,
            acceptance_criteria_id = %criteria.id(),
            "created acceptance criteria"
        );
        Ok(criteria)
    }

    /// Finds a criterion by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`super::BacklogServiceError::NotFound`] when the criterion
    /// does not exist.
    pub async fn find_by_id(
        &self,
        id: AcceptanceCriteriaId,
    ) -> BacklogServiceResult<AcceptanceCriteria> {
        lookup::acceptance_criteria(&*self.repository, id).await
    }

    /// Returns every criterion.
    ///
    /// # Errors
    ///
    /// Returns [`super::BacklogServiceError::Repository`] when persistence
    /// lookup fails.
    pub async fn list_all(&self) -> BacklogServiceResult<Vec<AcceptanceCriteria>> {
        Ok(self.repository.all_acceptance_criteria().await?)
    }

    /// Returns the criteria whose met flag equals `met`.
    ///
    /// # Errors
    ///
    /// Returns [`super::BacklogServiceError::Repository`] when persistence
    /// lookup fails.
    pub async fn by_met(&self, met: bool) -> BacklogServiceResult<Vec<AcceptanceCriteria>> {
        Ok(self.repository.acceptance_criteria_by_met(met).await?)
    }

    /// Replaces the clauses and met flag of a criterion.
    ///
    /// # Errors
    ///
    /// Returns [`super::BacklogServiceError`] when the criterion does not
    /// exist, a clause is invalid, or persistence fails.
    pub async fn update(
        &self,
        id: AcceptanceCriteriaId,
        request: AcceptanceCriteriaRequest,
    ) -> BacklogServiceResult<AcceptanceCriteria> {
        let mut criteria = lookup::acceptance_criteria(&*self.repository, id).await?;
        criteria.apply(request.into_draft()?, &*self.clock);
        self.commit_update(criteria, "updated acceptance criteria")
            .await
    }

    /// Marks a criterion as met or unmet.
    ///
    /// # Errors
    ///
    /// Returns [`super::BacklogServiceError`] when the criterion does not
    /// exist or persistence fails.
    pub async fn update_met(
        &self,
        id: AcceptanceCriteriaId,
        met: bool,
    ) -> BacklogServiceResult<AcceptanceCriteria> {
        let mut criteria = lookup::acceptance_criteria(&*self.repository, id).await?;
        criteria.set_met(met, &*self.clock);
        self.commit_update(criteria, "updated acceptance criteria met flag")
            .await
    }

    /// Returns the story a criterion belongs to.
    ///
    /// # Errors
    ///
    /// Returns [`super::BacklogServiceError::NotFound`] when the criterion or
    /// its story does not exist.
    pub async fn user_story_of(&self, id: AcceptanceCriteriaId) -> BacklogServiceResult<UserStory> {
        let criteria = lookup::acceptance_criteria(&*self.repository, id).await?;
        lookup::user_story(&*self.repository, criteria.user_story_id()).await
    }

    /// Deletes a criterion.
    ///
    /// # Errors
    ///
    /// Returns [`super::BacklogServiceError`] when the criterion does not
    /// exist or persistence fails.
    pub async fn delete(&self, id: AcceptanceCriteriaId) -> BacklogServiceResult<()> {
        lookup::acceptance_criteria(&*self.repository, id).await?;
        self.repository.commit(UnitOfWork::new().remove(id)).await?;
        info!(acceptance_criteria_id = %id, "deleted acceptance criteria");
        Ok(())
    }

    async fn commit_update(
        &self,
        criteria: AcceptanceCriteria,
        message: &'static str,
    ) -> BacklogServiceResult<AcceptanceCriteria> {
        self.repository
            .commit(UnitOfWork::new().update(criteria.clone()))
            .await?;
        info!(acceptance_criteria_id = %criteria.id(), "{message}");
        Ok(criteria)
    }
}
