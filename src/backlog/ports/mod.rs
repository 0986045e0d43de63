//! Port contracts for backlog persistence.
//!
//! Ports define infrastructure-agnostic interfaces used by backlog services.

pub mod repository;
pub mod unit_of_work;

pub use repository::{
    AcceptanceCriteriaRepository, BacklogRepository, BacklogRepositoryError,
    BacklogRepositoryResult, EpicRepository, ProductBacklogRepository, ProjectRepository,
    SprintBacklogRepository, TaskRepository, UserStoryRepository,
};
pub use unit_of_work::{BacklogRecord, UnitOfWork, UnitOfWorkPort};
