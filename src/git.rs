//! Version-control client
//!
//! Thin wrapper over the `git` binary: clone, fetch, hard reset, and origin
//! discovery, all routed through the process-runner seam. Failures propagate
//! git's own exit code; nothing is retried.

use std::path::Path;

use crate::error::{TfstageError, TfstageResult};
use crate::process::ProcessRunner;

pub struct GitClient<'a, R: ProcessRunner> {
    runner: &'a R,
}

impl<'a, R: ProcessRunner> GitClient<'a, R> {
    pub fn new(runner: &'a R) -> Self {
        Self { runner }
    }

    /// Clone the library into `dest`.
    pub fn clone_into(&self, url: &str, dest: &Path) -> TfstageResult<()> {
        let dest = dest.to_string_lossy();
        self.expect_success(&["clone", url, dest.as_ref()], Path::new("."))
    }

    /// Fetch the origin remote inside an existing checkout.
    pub fn fetch(&self, repo: &Path) -> TfstageResult<()> {
        self.expect_success(&["fetch", "origin"], repo)
    }

    /// Hard-reset the checkout to `revision`, discarding local drift.
    pub fn reset_hard(&self, repo: &Path, revision: &str) -> TfstageResult<()> {
        self.expect_success(&["reset", "--hard", revision], repo)
    }

    /// Name of the caller's origin remote with any `.git` suffix stripped,
    /// used as the default environment. None when `cwd` is not a repository
    /// or has no origin remote.
    pub fn remote_basename(&self, cwd: &Path) -> Option<String> {
        let out = self
            .runner
            .capture("git", &["config", "--get", "remote.origin.url"], cwd)
            .ok()?;
        if out.code != 0 {
            return None;
        }
        let url = out.stdout.trim();
        if url.is_empty() {
            return None;
        }
        let name = url.rsplit(['/', ':']).next().unwrap_or(url);
        let name = name.strip_suffix(".git").unwrap_or(name);
        if name.is_empty() {
            None
        } else {
            Some(name.to_string())
        }
    }

    fn expect_success(&self, args: &[&str], cwd: &Path) -> TfstageResult<()> {
        let code = self.runner.run("git", args, cwd)?;
        if code != 0 {
            return Err(TfstageError::DelegatedFailure {
                tool: format!("git {}", args.first().copied().unwrap_or_default()),
                code,
            });
        }
        Ok(())
    }
}
