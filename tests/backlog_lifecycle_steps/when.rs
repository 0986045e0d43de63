//! When steps for backlog lifecycle BDD scenarios.

use super::world::{BacklogWorld, run_async, story_request};
use agile_backlog::backlog::{
    domain::UserStoryStatus,
    services::ProductBacklogRequest,
};
use eyre::WrapErr;
use rstest_bdd_macros::when;

#[when(r#"a user story "{name}" is added requesting status "{status}""#)]
fn story_added_with_status(
    world: &mut BacklogWorld,
    name: String,
    status: String,
) -> Result<(), eyre::Report> {
    let requested = UserStoryStatus::try_from(status.as_str())?;
    let backlog_id = world.product_backlog()?.id();
    let story = run_async(
        world
            .services
            .product_backlogs()
            .add_user_story(backlog_id, story_request(name).with_status(requested)),
    )
    .wrap_err("add user story in scenario")?;
    world.story = Some(story);
    Ok(())
}

#[when(r#"the story status is changed to "{status}""#)]
fn story_status_is_changed(world: &mut BacklogWorld, status: String) -> Result<(), eyre::Report> {
    let target = UserStoryStatus::try_from(status.as_str())?;
    let story_id = world.story()?.id();
    let result = run_async(
        world
            .services
            .user_stories()
            .change_status(story_id, target),
    );
    if let Some(story) = world.record(result) {
        world.story = Some(story);
    }
    Ok(())
}

#[when(r#"another product backlog "{name}" is assigned to the project"#)]
fn another_backlog_assigned(world: &mut BacklogWorld, name: String) -> Result<(), eyre::Report> {
    let project_id = world
        .project
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing project in scenario world"))?
        .id();
    let spare = run_async(
        world
            .services
            .product_backlogs()
            .create(ProductBacklogRequest::new(name)),
    )
    .wrap_err("create spare product backlog")?;
    let result = run_async(
        world
            .services
            .projects()
            .assign_product_backlog(project_id, spare.id()),
    );
    world.record(result);
    Ok(())
}

#[when("the story is moved to the sprint")]
fn story_moved_to_sprint(world: &mut BacklogWorld) -> Result<(), eyre::Report> {
    let story_id = world.story()?.id();
    let sprint_id = world
        .sprint_backlog
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing sprint backlog in scenario world"))?
        .id();
    let story = run_async(
        world
            .services
            .user_stories()
            .move_to_sprint(story_id, sprint_id),
    )
    .wrap_err("move story to sprint")?;
    world.story = Some(story);
    Ok(())
}

#[when("the story is deleted")]
fn story_is_deleted(world: &mut BacklogWorld) -> Result<(), eyre::Report> {
    let story_id = world.story()?.id();
    let result = run_async(world.services.user_stories().delete(story_id));
    world.record(result);
    Ok(())
}
