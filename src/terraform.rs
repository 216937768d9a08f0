//! Provisioning client
//!
//! Thin wrapper over the `terraform` binary. The wrapper never inspects
//! terraform's output or state; it only assembles argument lists, runs the
//! command inside the prepared configuration subtree, and propagates the
//! exit code.

use std::path::Path;

use crate::error::{TfstageError, TfstageResult};
use crate::process::ProcessRunner;

/// Saved change set produced by `plan` and consumed by `apply`.
pub const PLAN_FILE: &str = "terraform.tfplan";

pub struct TerraformClient<'a, R: ProcessRunner> {
    runner: &'a R,
}

impl<'a, R: ProcessRunner> TerraformClient<'a, R> {
    pub fn new(runner: &'a R) -> Self {
        Self { runner }
    }

    pub fn init(&self, dir: &Path) -> TfstageResult<()> {
        self.expect_success(dir, "init", &[], &[])
    }

    /// `terraform plan -out terraform.tfplan <extra>`
    pub fn plan(&self, dir: &Path, extra: &[String]) -> TfstageResult<()> {
        self.expect_success(dir, "plan", &["-out", PLAN_FILE], extra)
    }

    /// `terraform apply <extra> terraform.tfplan`
    pub fn apply(&self, dir: &Path, extra: &[String]) -> TfstageResult<()> {
        let mut args: Vec<&str> = vec!["apply"];
        args.extend(extra.iter().map(String::as_str));
        args.push(PLAN_FILE);
        self.run(dir, "apply", &args)
    }

    pub fn show(&self, dir: &Path, extra: &[String]) -> TfstageResult<()> {
        self.expect_success(dir, "show", &[], extra)
    }

    pub fn destroy(&self, dir: &Path, extra: &[String]) -> TfstageResult<()> {
        self.expect_success(dir, "destroy", &[], extra)
    }

    fn expect_success(
        &self,
        dir: &Path,
        subcommand: &str,
        fixed: &[&str],
        extra: &[String],
    ) -> TfstageResult<()> {
        let mut args: Vec<&str> = vec![subcommand];
        args.extend_from_slice(fixed);
        args.extend(extra.iter().map(String::as_str));
        self.run(dir, subcommand, &args)
    }

    fn run(&self, dir: &Path, subcommand: &str, args: &[&str]) -> TfstageResult<()> {
        let code = self.runner.run("terraform", args, dir)?;
        if code != 0 {
            return Err(TfstageError::DelegatedFailure {
                tool: format!("terraform {}", subcommand),
                code,
            });
        }
        Ok(())
    }
}
