//! Lifecycle validators guarding backlog mutations.
//!
//! Services call these before changing any state, so a rejected operation
//! never leaves a partial mutation behind. Entity mutators enforce the same
//! invariants through the domain's own guards; this module depends on the
//! domain and never the other way round.

pub mod rules;

pub use rules::{
    validate_backlog_unowned, validate_can_delete, validate_can_link_to_epic,
    validate_can_mark_as_done, validate_date_range, validate_end_date, validate_has_project,
    validate_is_todo_status, validate_product_backlog_assignment, validate_start_date,
    validate_story_in_sprint,
};
