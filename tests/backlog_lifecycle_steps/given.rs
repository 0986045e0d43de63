//! Given steps for backlog lifecycle BDD scenarios.

use super::world::{BacklogWorld, run_async, story_request};
use agile_backlog::backlog::{
    domain::UserStoryStatus,
    services::{
        AcceptanceCriteriaRequest, ProductBacklogRequest, ProjectRequest, SprintBacklogRequest,
    },
};
use eyre::WrapErr;
use rstest_bdd_macros::given;

#[given(r#"a project named "{name}""#)]
fn project_named(world: &mut BacklogWorld, name: String) -> Result<(), eyre::Report> {
    let project = run_async(world.services.projects().create(ProjectRequest::new(name)))
        .wrap_err("create project for scenario")?;
    world.project = Some(project);
    Ok(())
}

#[given(r#"a product backlog named "{name}""#)]
fn product_backlog_named(world: &mut BacklogWorld, name: String) -> Result<(), eyre::Report> {
    let backlog = run_async(
        world
            .services
            .product_backlogs()
            .create(ProductBacklogRequest::new(name)),
    )
    .wrap_err("create product backlog for scenario")?;
    world.product_backlog = Some(backlog);
    Ok(())
}

#[given("the product backlog is assigned to the project")]
fn backlog_assigned_to_project(world: &mut BacklogWorld) -> Result<(), eyre::Report> {
    let project_id = world
        .project
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing project in scenario world"))?
        .id();
    let backlog_id = world.product_backlog()?.id();
    let project = run_async(
        world
            .services
            .projects()
            .assign_product_backlog(project_id, backlog_id),
    )
    .wrap_err("assign product backlog in scenario setup")?;
    world.project = Some(project);
    Ok(())
}

#[given(r#"a user story "{name}" in the product backlog"#)]
fn story_in_backlog(world: &mut BacklogWorld, name: String) -> Result<(), eyre::Report> {
    let backlog_id = world.product_backlog()?.id();
    let story = run_async(
        world
            .services
            .user_stories()
            .create(backlog_id, story_request(name)),
    )
    .wrap_err("create user story for scenario")?;
    world.story = Some(story);
    Ok(())
}

#[given(r#"a sprint backlog named "{name}""#)]
fn sprint_backlog_named(world: &mut BacklogWorld, name: String) -> Result<(), eyre::Report> {
    let backlog_id = world.product_backlog()?.id();
    let sprint = run_async(
        world
            .services
            .sprint_backlogs()
            .create(backlog_id, SprintBacklogRequest::new(name)),
    )
    .wrap_err("create sprint backlog for scenario")?;
    world.sprint_backlog = Some(sprint);
    Ok(())
}

fn add_criterion(world: &BacklogWorld, met: bool) -> Result<(), eyre::Report> {
    let story_id = world.story()?.id();
    let request = AcceptanceCriteriaRequest::new(
        "a registered customer",
        "they request a reset link",
        "an email is sent",
    )
    .with_met(met);
    run_async(
        world
            .services
            .acceptance_criteria()
            .create(story_id, request),
    )
    .wrap_err("create acceptance criterion for scenario")?;
    Ok(())
}

#[given("the story has an acceptance criterion that is not met")]
fn story_has_unmet_criterion(world: &mut BacklogWorld) -> Result<(), eyre::Report> {
    add_criterion(world, false)
}

#[given("the story has an acceptance criterion that is met")]
fn story_has_met_criterion(world: &mut BacklogWorld) -> Result<(), eyre::Report> {
    add_criterion(world, true)
}

#[given(r#"the story status has been changed to "{status}""#)]
fn story_status_changed(world: &mut BacklogWorld, status: String) -> Result<(), eyre::Report> {
    let target = UserStoryStatus::try_from(status.as_str())?;
    let story_id = world.story()?.id();
    let story = run_async(
        world
            .services
            .user_stories()
            .change_status(story_id, target),
    )
    .wrap_err("change story status in scenario setup")?;
    world.story = Some(story);
    Ok(())
}
