//! Application services orchestrating backlog lifecycle operations.
//!
//! Each service loads what it needs through the repository port, applies the
//! domain mutation, and writes every affected entity in one unit of work.

mod acceptance_criteria;
mod bundle;
mod epic;
mod error;
mod lookup;
mod product_backlog;
mod project;
mod sprint_backlog;
mod task;
mod user_story;

pub use acceptance_criteria::{AcceptanceCriteriaRequest, AcceptanceCriteriaService};
pub use bundle::BacklogServices;
pub use epic::{EpicRequest, EpicService, EpicSummary};
pub use error::{BacklogServiceError, BacklogServiceResult};
pub use product_backlog::{ProductBacklogRequest, ProductBacklogService, ProductBacklogSummary};
pub use project::{ProjectRequest, ProjectService};
pub use sprint_backlog::{SprintBacklogRequest, SprintBacklogService};
pub use task::{TaskRequest, TaskService};
pub use user_story::{UserStoryRequest, UserStoryService};
