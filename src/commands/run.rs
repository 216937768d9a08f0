//! Delegated action handlers - init, plan, apply, show, destroy.

use std::path::Path;

use crate::config::Params;
use crate::error::TfstageResult;
use crate::process::ProcessRunner;
use crate::terraform::{TerraformClient, PLAN_FILE};
use crate::workspace::{self, Workspace};

/// Prepare the workspace and initialize terraform in the configuration.
pub fn cmd_init<R: ProcessRunner>(base: &Path, params: &Params, runner: &R) -> TfstageResult<()> {
    let workspace = Workspace::new(base, params, runner);
    workspace.prepare(params)?;
    TerraformClient::new(runner).init(workspace.config_dir())
}

/// Full init sequence, then compute and save a change set.
pub fn cmd_plan<R: ProcessRunner>(base: &Path, params: &Params, runner: &R) -> TfstageResult<()> {
    let workspace = Workspace::new(base, params, runner);
    workspace.prepare(params)?;
    let terraform = TerraformClient::new(runner);
    terraform.init(workspace.config_dir())?;
    terraform.plan(workspace.config_dir(), &params.passthrough)
}

/// Full init sequence, then apply the saved change set, computing one first
/// when none exists.
pub fn cmd_apply<R: ProcessRunner>(base: &Path, params: &Params, runner: &R) -> TfstageResult<()> {
    let workspace = Workspace::new(base, params, runner);
    workspace.prepare(params)?;
    let terraform = TerraformClient::new(runner);
    terraform.init(workspace.config_dir())?;
    if !workspace.config_dir().join(PLAN_FILE).exists() {
        terraform.plan(workspace.config_dir(), &params.passthrough)?;
    }
    terraform.apply(workspace.config_dir(), &params.passthrough)
}

/// Inspect state in the existing configuration subtree, no re-preparation.
pub fn cmd_show<R: ProcessRunner>(base: &Path, params: &Params, runner: &R) -> TfstageResult<()> {
    TerraformClient::new(runner).show(&workspace::config_dir(base, params), &params.passthrough)
}

/// Destroy resources from the existing configuration subtree, no
/// re-preparation.
pub fn cmd_destroy<R: ProcessRunner>(
    base: &Path,
    params: &Params,
    runner: &R,
) -> TfstageResult<()> {
    TerraformClient::new(runner).destroy(&workspace::config_dir(base, params), &params.passthrough)
}
