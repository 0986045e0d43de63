//! Service orchestration tests for projects, backlogs, epics, sprints and
//! tasks.

use std::sync::Arc;

use crate::backlog::{
    adapters::memory::InMemoryBacklogStore,
    domain::{
        EntityRef, FailureKind, ProjectStatus, TaskId, TaskStatus, UserStoryId, UserStoryStatus,
    },
    ports::{
        BacklogRepositoryError, EpicRepository, ProductBacklogRepository, ProjectRepository,
        SprintBacklogRepository, TaskRepository,
    },
    services::{
        BacklogServiceError, BacklogServices, EpicRequest, ProductBacklogRequest, ProjectRequest,
        SprintBacklogRequest, TaskRequest, UserStoryRequest,
    },
};
use chrono::{Duration, Utc};
use eyre::{bail, ensure};
use mockable::DefaultClock;
use rstest::{fixture, rstest};

type TestServices = BacklogServices<InMemoryBacklogStore, DefaultClock>;

#[fixture]
fn store() -> InMemoryBacklogStore {
    InMemoryBacklogStore::new()
}

#[fixture]
fn services(store: InMemoryBacklogStore) -> TestServices {
    BacklogServices::new(Arc::new(store), Arc::new(DefaultClock))
}

fn story_request(name: &str) -> UserStoryRequest {
    UserStoryRequest::new(name, "planner", "to track the work", "nothing is forgotten")
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn project_create_and_lookup_round_trip(services: TestServices) -> eyre::Result<()> {
    let created = services
        .projects()
        .create(ProjectRequest::new("Apollo").with_description("Moon landing"))
        .await?;
    let fetched = services.projects().find_by_id(created.id()).await?;

    ensure!(fetched == created);
    ensure!(fetched.status() == ProjectStatus::NotStarted);
    ensure!(fetched.description() == Some("Moon landing"));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn project_queries_filter_by_status_and_dates(services: TestServices) -> eyre::Result<()> {
    let origin = Utc::now();
    let inside = services
        .projects()
        .create(
            ProjectRequest::new("Inside")
                .with_status(ProjectStatus::InProgress)
                .with_start_date(origin + Duration::days(1))
                .with_end_date(origin + Duration::days(5)),
        )
        .await?;
    services
        .projects()
        .create(
            ProjectRequest::new("Touching")
                .with_start_date(origin)
                .with_end_date(origin + Duration::days(5)),
        )
        .await?;

    let in_progress = services.projects().by_status(ProjectStatus::InProgress).await?;
    ensure!(in_progress == vec![inside.clone()]);

    let between = services
        .projects()
        .between_dates(origin, origin + Duration::days(10))
        .await?;
    ensure!(between == vec![inside]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn project_end_date_update_is_validated(services: TestServices) -> eyre::Result<()> {
    let start = Utc::now();
    let project = services
        .projects()
        .create(ProjectRequest::new("Apollo").with_start_date(start))
        .await?;

    let result = services
        .projects()
        .update_end_date(project.id(), start - Duration::days(1))
        .await;

    let Err(err) = result else {
        bail!("end date before start should be rejected");
    };
    ensure!(err.kind() == FailureKind::BusinessRuleViolation);
    let stored = services.projects().find_by_id(project.id()).await?;
    ensure!(stored.end_date().is_none());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn assigning_backlog_links_both_sides_once(
    store: InMemoryBacklogStore,
) -> eyre::Result<()> {
    let services = BacklogServices::new(Arc::new(store.clone()), Arc::new(DefaultClock));
    let project = services.projects().create(ProjectRequest::new("Apollo")).await?;
    let backlog = services
        .product_backlogs()
        .create(ProductBacklogRequest::new("Main"))
        .await?;

    services
        .projects()
        .assign_product_backlog(project.id(), backlog.id())
        .await?;

    let stored_backlog = store.find_product_backlog(backlog.id()).await?;
    ensure!(stored_backlog.and_then(|found| found.project_id()) == Some(project.id()));
    let owner = services.product_backlogs().project_of(backlog.id()).await?;
    ensure!(owner.id() == project.id());

    let spare = services
        .product_backlogs()
        .create(ProductBacklogRequest::new("Spare"))
        .await?;
    let Err(err) = services
        .projects()
        .assign_product_backlog(project.id(), spare.id())
        .await
    else {
        bail!("second assignment should be rejected");
    };
    ensure!(err.kind() == FailureKind::AlreadyAssigned);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn backlog_owned_elsewhere_cannot_be_assigned(
    store: InMemoryBacklogStore,
) -> eyre::Result<()> {
    let services = BacklogServices::new(Arc::new(store.clone()), Arc::new(DefaultClock));
    let apollo = services.projects().create(ProjectRequest::new("Apollo")).await?;
    let gemini = services.projects().create(ProjectRequest::new("Gemini")).await?;
    let backlog = services
        .product_backlogs()
        .create(ProductBacklogRequest::new("Main"))
        .await?;
    services
        .projects()
        .assign_product_backlog(apollo.id(), backlog.id())
        .await?;

    let Err(err) = services
        .projects()
        .assign_product_backlog(gemini.id(), backlog.id())
        .await
    else {
        bail!("owned backlog should not move to another project");
    };

    ensure!(err.kind() == FailureKind::AlreadyAssigned);
    let Some(stored_gemini) = store.find_project(gemini.id()).await? else {
        bail!("second project should still exist");
    };
    ensure!(stored_gemini.product_backlog_id().is_none());
    let Some(stored_apollo) = store.find_project(apollo.id()).await? else {
        bail!("owning project should still exist");
    };
    ensure!(stored_apollo.product_backlog_id() == Some(backlog.id()));
    let stored_backlog = store.find_product_backlog(backlog.id()).await?;
    ensure!(stored_backlog.and_then(|found| found.project_id()) == Some(apollo.id()));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_backlog_removes_stories_reachable_twice(
    store: InMemoryBacklogStore,
) -> eyre::Result<()> {
    let services = BacklogServices::new(Arc::new(store.clone()), Arc::new(DefaultClock));
    let backlog = services
        .product_backlogs()
        .create(ProductBacklogRequest::new("Main"))
        .await?;
    let epic = services
        .product_backlogs()
        .add_epic(backlog.id(), EpicRequest::new("Reporting"))
        .await?;
    let sprint = services
        .sprint_backlogs()
        .create(backlog.id(), SprintBacklogRequest::new("Sprint 1"))
        .await?;
    let names = [
        "Export weekly report",
        "Export monthly report",
        "Export yearly summary",
    ];
    for (index, name) in names.into_iter().enumerate() {
        let story = services
            .user_stories()
            .create(backlog.id(), story_request(name))
            .await?;
        services
            .user_stories()
            .link_to_epic(story.id(), epic.id())
            .await?;
        services
            .tasks()
            .create(story.id(), TaskRequest::new("Build query", "Aggregate the rows"))
            .await?;
        if index == 0 {
            services
                .user_stories()
                .move_to_sprint(story.id(), sprint.id())
                .await?;
        }
    }

    services.product_backlogs().delete(backlog.id()).await?;

    ensure!(store.all_tasks().await?.is_empty());
    ensure!(store.all_epics().await?.is_empty());
    ensure!(store.all_sprint_backlogs().await?.is_empty());
    ensure!(store.all_product_backlogs().await?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_project_keeps_backlog_unowned(store: InMemoryBacklogStore) -> eyre::Result<()> {
    let services = BacklogServices::new(Arc::new(store.clone()), Arc::new(DefaultClock));
    let project = services.projects().create(ProjectRequest::new("Apollo")).await?;
    let backlog = services
        .product_backlogs()
        .create(ProductBacklogRequest::new("Main"))
        .await?;
    services
        .projects()
        .assign_product_backlog(project.id(), backlog.id())
        .await?;

    services.projects().delete(project.id()).await?;

    ensure!(store.find_project(project.id()).await?.is_none());
    let Some(orphan) = store.find_product_backlog(backlog.id()).await? else {
        bail!("backlog should survive project deletion");
    };
    ensure!(orphan.project_id().is_none());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn missing_project_is_reported_as_not_found(services: TestServices) -> eyre::Result<()> {
    let backlog = services
        .product_backlogs()
        .create(ProductBacklogRequest::new("Main"))
        .await?;

    let Err(err) = services.product_backlogs().project_of(backlog.id()).await else {
        bail!("unowned backlog has no project");
    };
    ensure!(err.kind() == FailureKind::NotFound);
    ensure!(matches!(err, BacklogServiceError::Lifecycle(_)));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn backlog_summary_counts_owned_collections(services: TestServices) -> eyre::Result<()> {
    let backlog = services
        .product_backlogs()
        .create(ProductBacklogRequest::new("Main"))
        .await?;
    services
        .product_backlogs()
        .add_epic(backlog.id(), EpicRequest::new("Payments"))
        .await?;
    services
        .product_backlogs()
        .add_user_story(backlog.id(), story_request("Refund a payment"))
        .await?;
    services
        .sprint_backlogs()
        .create(backlog.id(), SprintBacklogRequest::new("Sprint 1"))
        .await?;

    let summary = services.product_backlogs().summary(backlog.id()).await?;

    ensure!(summary.epic_count == 1);
    ensure!(summary.user_story_count == 1);
    ensure!(summary.sprint_backlog_count == 1);
    ensure!(summary.product_backlog.updated_at() >= backlog.updated_at());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn backlog_stories_are_ordered_by_priority(services: TestServices) -> eyre::Result<()> {
    let backlog = services
        .product_backlogs()
        .create(ProductBacklogRequest::new("Main"))
        .await?;
    let low = services
        .product_backlogs()
        .add_user_story(
            backlog.id(),
            story_request("Archive old invoices").with_priority(5),
        )
        .await?;
    let high = services
        .product_backlogs()
        .add_user_story(backlog.id(), story_request("Send the invoice").with_priority(1))
        .await?;

    let stories = services.product_backlogs().user_stories(backlog.id()).await?;

    ensure!(stories == vec![high, low]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn epic_search_and_count(services: TestServices) -> eyre::Result<()> {
    let backlog = services
        .product_backlogs()
        .create(ProductBacklogRequest::new("Main"))
        .await?;
    let payments = services
        .product_backlogs()
        .add_epic(
            backlog.id(),
            EpicRequest::new("Payments").with_description("Card and wallet"),
        )
        .await?;
    services
        .product_backlogs()
        .add_epic(backlog.id(), EpicRequest::new("Onboarding"))
        .await?;

    let found = services.epics().search_by_name("PAY").await?;
    ensure!(found == vec![payments.clone()]);
    ensure!(services.epics().count().await? == 2);
    let owner = services.epics().product_backlog_of(payments.id()).await?;
    ensure!(owner.id() == backlog.id());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn invalid_epic_name_is_rejected_before_writing(services: TestServices) -> eyre::Result<()> {
    let backlog = services
        .product_backlogs()
        .create(ProductBacklogRequest::new("Main"))
        .await?;

    let Err(err) = services
        .product_backlogs()
        .add_epic(backlog.id(), EpicRequest::new("UI"))
        .await
    else {
        bail!("two-character epic name should be rejected");
    };
    ensure!(err.kind() == FailureKind::InvalidInput);
    ensure!(services.epics().count().await? == 0);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn sprint_story_starts_in_todo_in_sprint(services: TestServices) -> eyre::Result<()> {
    let backlog = services
        .product_backlogs()
        .create(ProductBacklogRequest::new("Main"))
        .await?;
    let sprint = services
        .sprint_backlogs()
        .create(backlog.id(), SprintBacklogRequest::new("Sprint 1"))
        .await?;

    let story = services
        .sprint_backlogs()
        .add_user_story(
            sprint.id(),
            story_request("Print a receipt")
                .with_status(UserStoryStatus::Done),
        )
        .await?;

    ensure!(story.status().is_todo());
    ensure!(story.sprint_backlog_id() == Some(sprint.id()));
    ensure!(story.product_backlog_id().is_none());
    let members = services.sprint_backlogs().user_stories(sprint.id()).await?;
    ensure!(members == vec![story]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn removing_story_from_wrong_sprint_is_rejected(services: TestServices) -> eyre::Result<()> {
    let backlog = services
        .product_backlogs()
        .create(ProductBacklogRequest::new("Main"))
        .await?;
    let first = services
        .sprint_backlogs()
        .create(backlog.id(), SprintBacklogRequest::new("Sprint 1"))
        .await?;
    let second = services
        .sprint_backlogs()
        .create(backlog.id(), SprintBacklogRequest::new("Sprint 2"))
        .await?;
    let story = services
        .sprint_backlogs()
        .add_user_story(first.id(), story_request("Print a receipt"))
        .await?;

    let Err(err) = services
        .sprint_backlogs()
        .remove_user_story(second.id(), story.id())
        .await
    else {
        bail!("story is not in the second sprint");
    };
    ensure!(err.kind() == FailureKind::BusinessRuleViolation);

    services
        .sprint_backlogs()
        .remove_user_story(first.id(), story.id())
        .await?;
    let Err(missing) = services.user_stories().find_by_id(story.id()).await else {
        bail!("story should be gone");
    };
    ensure!(missing.kind() == FailureKind::NotFound);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_sprint_returns_stories_to_backlog(services: TestServices) -> eyre::Result<()> {
    let backlog = services
        .product_backlogs()
        .create(ProductBacklogRequest::new("Main"))
        .await?;
    let sprint = services
        .sprint_backlogs()
        .create(backlog.id(), SprintBacklogRequest::new("Sprint 1"))
        .await?;
    let story = services
        .product_backlogs()
        .add_user_story(backlog.id(), story_request("Print a receipt"))
        .await?;
    services
        .user_stories()
        .move_to_sprint(story.id(), sprint.id())
        .await?;

    services.sprint_backlogs().delete(sprint.id()).await?;

    let returned = services.user_stories().find_by_id(story.id()).await?;
    ensure!(returned.product_backlog_id() == Some(backlog.id()));
    ensure!(returned.sprint_backlog_id().is_none());
    ensure!(services.sprint_backlogs().list_all().await?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn task_dates_and_range_queries(services: TestServices) -> eyre::Result<()> {
    let backlog = services
        .product_backlogs()
        .create(ProductBacklogRequest::new("Main"))
        .await?;
    let story = services
        .product_backlogs()
        .add_user_story(backlog.id(), story_request("Print a receipt"))
        .await?;
    let origin = Utc::now();
    let task = services
        .tasks()
        .create(
            story.id(),
            TaskRequest::new("Design layout", "Pick a receipt template")
                .with_start_date(origin)
                .with_end_date(origin + Duration::days(2)),
        )
        .await?;

    let in_range = services
        .tasks()
        .in_date_range(origin, origin + Duration::days(2))
        .await?;
    ensure!(in_range == vec![task.clone()]);

    let Err(err) = services
        .tasks()
        .update_start_date(task.id(), origin + Duration::days(3))
        .await
    else {
        bail!("start after end should be rejected");
    };
    ensure!(err.to_string() == "Start date cannot be after the end date");

    let done = services
        .tasks()
        .update_status(task.id(), TaskStatus::Done)
        .await?;
    ensure!(services.tasks().by_status(TaskStatus::Done).await? == vec![done]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn task_for_missing_story_is_not_found(services: TestServices) -> eyre::Result<()> {
    let missing = UserStoryId::new();

    let Err(err) = services
        .tasks()
        .create(missing, TaskRequest::new("Design layout", "Pick a template"))
        .await
    else {
        bail!("task needs an existing story");
    };
    ensure!(matches!(
        err,
        BacklogServiceError::NotFound(EntityRef::UserStory(id)) if id == missing
    ));
    Ok(())
}

#[rstest]
fn repository_not_found_maps_to_not_found_kind() {
    let err = BacklogServiceError::Repository(BacklogRepositoryError::NotFound(
        EntityRef::Task(TaskId::new()),
    ));
    assert_eq!(err.kind(), FailureKind::NotFound);
}
