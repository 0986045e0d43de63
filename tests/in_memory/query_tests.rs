//! Finder filters and ordering of the in-memory store.

use super::helpers::{backlog, clock, story_in, store};
use agile_backlog::backlog::{
    adapters::memory::InMemoryBacklogStore,
    domain::{
        AcceptanceCriteria, AcceptanceCriteriaDraft, BddClause, SprintBacklog, SprintBacklogName,
        TextField, UserStoryStatus,
    },
    ports::{AcceptanceCriteriaRepository, UnitOfWork, UnitOfWorkPort, UserStoryRepository},
};
use eyre::ensure;
use mockable::DefaultClock;
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn backlog_stories_exclude_sprint_members(
    store: InMemoryBacklogStore,
    clock: DefaultClock,
) -> eyre::Result<()> {
    let main = backlog("Main", &clock)?;
    let sprint = SprintBacklog::new(SprintBacklogName::new("Sprint 1")?, main.id(), &clock);
    let waiting = story_in(main.id(), "Reset my password", 2, &clock)?;
    let mut planned = story_in(main.id(), "Change my email address", 1, &clock)?;
    planned.move_to_sprint(sprint.id(), &clock);
    store
        .commit(
            UnitOfWork::new()
                .insert(main.clone())
                .insert(sprint.clone())
                .insert(waiting.clone())
                .insert(planned.clone()),
        )
        .await?;

    ensure!(store.user_stories_by_product_backlog(main.id()).await? == vec![waiting.clone()]);
    ensure!(store.user_stories_by_sprint_backlog(sprint.id()).await? == vec![planned]);
    let todo = store
        .user_stories_by_status_and_product_backlog(UserStoryStatus::Todo, main.id())
        .await?;
    ensure!(todo == vec![waiting]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn backlog_stories_sort_by_priority(
    store: InMemoryBacklogStore,
    clock: DefaultClock,
) -> eyre::Result<()> {
    let main = backlog("Main", &clock)?;
    let later = story_in(main.id(), "Export to spreadsheet", 9, &clock)?;
    let first = story_in(main.id(), "Log in with a passkey", -1, &clock)?;
    let middle = story_in(main.id(), "Reset my password", 4, &clock)?;
    store
        .commit(
            UnitOfWork::new()
                .insert(main.clone())
                .insert(later.clone())
                .insert(first.clone())
                .insert(middle.clone()),
        )
        .await?;

    let ordered = store.user_stories_by_product_backlog(main.id()).await?;

    ensure!(ordered == vec![first, middle, later]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn criteria_filter_by_met_flag(
    store: InMemoryBacklogStore,
    clock: DefaultClock,
) -> eyre::Result<()> {
    let main = backlog("Main", &clock)?;
    let story = story_in(main.id(), "Reset my password", 0, &clock)?;
    let make = |met: bool| -> eyre::Result<AcceptanceCriteria> {
        let draft = AcceptanceCriteriaDraft {
            given: BddClause::new(TextField::Given, "a known user")?,
            when: BddClause::new(TextField::When, "they ask for a reset")?,
            then: BddClause::new(TextField::Then, "a link is mailed")?,
            met,
        };
        Ok(AcceptanceCriteria::new(draft, story.id(), &clock))
    };
    let met = make(true)?;
    let unmet = make(false)?;
    store
        .commit(
            UnitOfWork::new()
                .insert(main)
                .insert(story.clone())
                .insert(met.clone())
                .insert(unmet.clone()),
        )
        .await?;

    ensure!(store.acceptance_criteria_by_met(true).await? == vec![met]);
    ensure!(store.acceptance_criteria_by_met(false).await? == vec![unmet]);
    ensure!(store.acceptance_criteria_by_user_story(story.id()).await?.len() == 2);
    Ok(())
}
