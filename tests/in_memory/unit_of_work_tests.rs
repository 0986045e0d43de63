//! Unit-of-work commit semantics for the in-memory store.

use super::helpers::{backlog, clock, story_in, store};
use agile_backlog::backlog::{
    adapters::memory::InMemoryBacklogStore,
    domain::{EntityRef, UserStoryId},
    ports::{
        BacklogRepositoryError, ProductBacklogRepository, UnitOfWork, UnitOfWorkPort,
        UserStoryRepository,
    },
};
use eyre::{bail, ensure};
use mockable::DefaultClock;
use rstest::rstest;

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn commit_applies_inserts_and_updates(
    store: InMemoryBacklogStore,
    clock: DefaultClock,
) -> eyre::Result<()> {
    let mut main = backlog("Main", &clock)?;
    let story = story_in(main.id(), "Reset my password", 0, &clock)?;
    store.commit(UnitOfWork::new().insert(main.clone())).await?;

    main.touch(&clock);
    store
        .commit(UnitOfWork::new().insert(story.clone()).update(main.clone()))
        .await?;

    ensure!(store.find_product_backlog(main.id()).await? == Some(main));
    ensure!(store.find_user_story(story.id()).await? == Some(story));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_commit_leaves_store_unchanged(
    store: InMemoryBacklogStore,
    clock: DefaultClock,
) -> eyre::Result<()> {
    let main = backlog("Main", &clock)?;
    store.commit(UnitOfWork::new().insert(main.clone())).await?;
    let story = story_in(main.id(), "Reset my password", 0, &clock)?;
    let missing = UserStoryId::new();

    let result = store
        .commit(UnitOfWork::new().insert(story.clone()).remove(missing))
        .await;

    let Err(BacklogRepositoryError::NotFound(entity)) = result else {
        bail!("removing a missing story should fail");
    };
    ensure!(entity == EntityRef::UserStory(missing));
    ensure!(store.find_user_story(story.id()).await?.is_none());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn duplicate_insert_is_rejected(
    store: InMemoryBacklogStore,
    clock: DefaultClock,
) -> eyre::Result<()> {
    let main = backlog("Main", &clock)?;
    store.commit(UnitOfWork::new().insert(main.clone())).await?;

    let result = store.commit(UnitOfWork::new().insert(main.clone())).await;

    ensure!(matches!(
        result,
        Err(BacklogRepositoryError::Duplicate(EntityRef::ProductBacklog(id))) if id == main.id()
    ));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn updating_missing_entity_is_rejected(
    store: InMemoryBacklogStore,
    clock: DefaultClock,
) -> eyre::Result<()> {
    let ghost = backlog("Ghost", &clock)?;

    let result = store.commit(UnitOfWork::new().update(ghost.clone())).await;

    ensure!(matches!(
        result,
        Err(BacklogRepositoryError::NotFound(EntityRef::ProductBacklog(id))) if id == ghost.id()
    ));
    ensure!(store.all_product_backlogs().await?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn clones_share_tables(store: InMemoryBacklogStore, clock: DefaultClock) -> eyre::Result<()> {
    let twin = store.clone();
    let main = backlog("Main", &clock)?;

    store.commit(UnitOfWork::new().insert(main.clone())).await?;

    ensure!(twin.find_product_backlog(main.id()).await? == Some(main));
    Ok(())
}
