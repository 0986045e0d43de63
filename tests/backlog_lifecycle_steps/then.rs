//! Then steps for backlog lifecycle BDD scenarios.

use super::world::{BacklogWorld, run_async};
use agile_backlog::backlog::domain::UserStoryStatus;
use rstest_bdd_macros::then;

#[then(r#"the story status is "{status}""#)]
fn story_status_is(world: &BacklogWorld, status: String) -> Result<(), eyre::Report> {
    let expected = UserStoryStatus::try_from(status.as_str())?;
    let story_id = world.story()?.id();
    let stored = run_async(world.services.user_stories().find_by_id(story_id))?;

    if stored.status() != expected {
        return Err(eyre::eyre!(
            "expected status {expected}, found {}",
            stored.status()
        ));
    }
    Ok(())
}

#[then("the story lives in the product backlog")]
fn story_lives_in_backlog(world: &BacklogWorld) -> Result<(), eyre::Report> {
    let backlog_id = world.product_backlog()?.id();
    let story = world.story()?;
    if story.product_backlog_id() != Some(backlog_id) || story.sprint_backlog_id().is_some() {
        return Err(eyre::eyre!("expected story in product backlog, found {:?}", story.home()));
    }
    Ok(())
}

#[then("the story lives in the sprint")]
fn story_lives_in_sprint(world: &BacklogWorld) -> Result<(), eyre::Report> {
    let sprint_id = world
        .sprint_backlog
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing sprint backlog in scenario world"))?
        .id();
    let story = world.story()?;
    if story.sprint_backlog_id() != Some(sprint_id) || story.product_backlog_id().is_some() {
        return Err(eyre::eyre!("expected story in sprint, found {:?}", story.home()));
    }
    Ok(())
}

#[then("the product backlog lists no stories")]
fn backlog_lists_no_stories(world: &BacklogWorld) -> Result<(), eyre::Report> {
    let backlog_id = world.product_backlog()?.id();
    let stories = run_async(world.services.product_backlogs().user_stories(backlog_id))?;
    if !stories.is_empty() {
        return Err(eyre::eyre!("expected no backlog stories, found {}", stories.len()));
    }
    Ok(())
}

#[then(r#"the operation fails with "{message}""#)]
fn operation_fails_with(world: &BacklogWorld, message: String) -> Result<(), eyre::Report> {
    let err = world
        .last_error
        .as_ref()
        .ok_or_else(|| eyre::eyre!("expected the operation to fail"))?;
    if err.to_string() != message {
        return Err(eyre::eyre!("expected failure {message:?}, got {err}"));
    }
    Ok(())
}

#[then(r#"the operation fails as "{kind}""#)]
fn operation_fails_as(world: &BacklogWorld, kind: String) -> Result<(), eyre::Report> {
    let err = world
        .last_error
        .as_ref()
        .ok_or_else(|| eyre::eyre!("expected the operation to fail"))?;
    if err.kind().as_str() != kind {
        return Err(eyre::eyre!("expected {kind} failure, got {} ({err})", err.kind()));
    }
    Ok(())
}
