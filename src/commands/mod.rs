//! Action handlers
//!
//! One handler per user-facing action. Each handler sequences its steps
//! explicitly (prepare, then delegate); there is no fallthrough between
//! actions and no cached "already initialized" state.

mod bootstrap;
mod clean;
mod run;

pub use bootstrap::cmd_bootstrap;
pub use clean::cmd_clean;
pub use run::{cmd_apply, cmd_destroy, cmd_init, cmd_plan, cmd_show};
