//! End-to-end planning flows through the service bundle.

use super::helpers::{services_over, store};
use agile_backlog::backlog::{
    adapters::memory::InMemoryBacklogStore,
    domain::{FailureKind, StoryPlacement, TaskStatus, UserStoryStatus},
    ports::{AcceptanceCriteriaRepository, TaskRepository, UserStoryRepository},
    services::{
        AcceptanceCriteriaRequest, EpicRequest, ProductBacklogRequest, ProjectRequest,
        SprintBacklogRequest, TaskRequest, UserStoryRequest,
    },
};
use eyre::{bail, ensure};
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn story_travels_from_backlog_to_done(store: InMemoryBacklogStore) -> eyre::Result<()> {
    let services = services_over(&store);
    let project = services.projects().create(ProjectRequest::new("Shop")).await?;
    let backlog = services
        .product_backlogs()
        .create(ProductBacklogRequest::new("Shop backlog"))
        .await?;
    services
        .projects()
        .assign_product_backlog(project.id(), backlog.id())
        .await?;
    let epic = services
        .product_backlogs()
        .add_epic(backlog.id(), EpicRequest::new("Checkout"))
        .await?;
    let sprint = services
        .sprint_backlogs()
        .create(backlog.id(), SprintBacklogRequest::new("Sprint 1"))
        .await?;
    let story = services
        .user_stories()
        .create(
            backlog.id(),
            UserStoryRequest::new("Pay with a card", "shopper", "to pay by card", "I can buy"),
        )
        .await?;
    services
        .user_stories()
        .link_to_epic(story.id(), epic.id())
        .await?;
    let criterion = services
        .acceptance_criteria()
        .create(
            story.id(),
            AcceptanceCriteriaRequest::new("a full basket", "the card is valid", "the order is placed"),
        )
        .await?;
    let task = services
        .tasks()
        .create(story.id(), TaskRequest::new("Call gateway", "Integrate the gateway API"))
        .await?;

    let planned = services
        .user_stories()
        .move_to_sprint(story.id(), sprint.id())
        .await?;
    ensure!(
        planned.placement()
            == StoryPlacement::InEpicAndSprint {
                epic_id: epic.id(),
                sprint_backlog_id: sprint.id(),
            }
    );

    services
        .user_stories()
        .change_status(story.id(), UserStoryStatus::InProgress)
        .await?;
    services
        .tasks()
        .update_status(task.id(), TaskStatus::Done)
        .await?;
    services
        .acceptance_criteria()
        .update_met(criterion.id(), true)
        .await?;
    let done = services
        .user_stories()
        .change_status(story.id(), UserStoryStatus::Done)
        .await?;

    ensure!(done.status() == UserStoryStatus::Done);
    let owner = services.product_backlogs().project_of(backlog.id()).await?;
    ensure!(owner.id() == project.id());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn reopening_a_criterion_blocks_done_again(store: InMemoryBacklogStore) -> eyre::Result<()> {
    let services = services_over(&store);
    let backlog = services
        .product_backlogs()
        .create(ProductBacklogRequest::new("Shop backlog"))
        .await?;
    let story = services
        .user_stories()
        .create(
            backlog.id(),
            UserStoryRequest::new("Pay with a card", "shopper", "to pay by card", "I can buy"),
        )
        .await?;
    let criterion = services
        .acceptance_criteria()
        .create(
            story.id(),
            AcceptanceCriteriaRequest::new("a full basket", "the card is valid", "the order is placed")
                .with_met(true),
        )
        .await?;
    services
        .acceptance_criteria()
        .update_met(criterion.id(), false)
        .await?;

    let Err(err) = services
        .user_stories()
        .change_status(story.id(), UserStoryStatus::Done)
        .await
    else {
        bail!("reopened criterion should block done");
    };
    ensure!(err.kind() == FailureKind::BusinessRuleViolation);
    let Some(stored) = store.find_user_story(story.id()).await? else {
        bail!("story should still exist");
    };
    ensure!(stored.status() == UserStoryStatus::Todo);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn removing_sprint_story_cascades_to_children(
    store: InMemoryBacklogStore,
) -> eyre::Result<()> {
    let services = services_over(&store);
    let backlog = services
        .product_backlogs()
        .create(ProductBacklogRequest::new("Shop backlog"))
        .await?;
    let sprint = services
        .sprint_backlogs()
        .create(backlog.id(), SprintBacklogRequest::new("Sprint 1"))
        .await?;
    let story = services
        .sprint_backlogs()
        .add_user_story(
            sprint.id(),
            UserStoryRequest::new("Print the invoice", "clerk", "a printout", "filing"),
        )
        .await?;
    services
        .acceptance_criteria()
        .create(
            story.id(),
            AcceptanceCriteriaRequest::new("an order", "the clerk prints", "paper comes out"),
        )
        .await?;
    services
        .tasks()
        .create(story.id(), TaskRequest::new("Render PDF", "Lay out the invoice"))
        .await?;

    services
        .sprint_backlogs()
        .remove_user_story(sprint.id(), story.id())
        .await?;

    ensure!(store.find_user_story(story.id()).await?.is_none());
    ensure!(store.acceptance_criteria_by_user_story(story.id()).await?.is_empty());
    ensure!(store.tasks_by_user_story(story.id()).await?.is_empty());
    ensure!(services.sprint_backlogs().find_by_id(sprint.id()).await.is_ok());
    Ok(())
}
