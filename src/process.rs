//! Process execution seam.
//!
//! Every external command (git, terraform) goes through the `ProcessRunner`
//! trait so dispatch and preparation logic can be exercised in tests without
//! spawning real subprocesses.

use std::path::Path;
use std::process::{Command, Stdio};

use crate::error::{TfstageError, TfstageResult};

/// Captured output of a query-style command.
#[derive(Debug, Clone)]
pub struct Capture {
    pub code: i32,
    pub stdout: String,
}

/// Abstract subprocess interface: (program, args, working directory) in,
/// exit code out.
pub trait ProcessRunner {
    /// Run a command with inherited stdio and return its exit code.
    fn run(&self, program: &str, args: &[&str], cwd: &Path) -> TfstageResult<i32>;

    /// Run a command capturing stdout, for queries whose output we parse.
    fn capture(&self, program: &str, args: &[&str], cwd: &Path) -> TfstageResult<Capture>;
}

/// Real subprocess runner. Children inherit stdout/stderr so terraform and
/// git output streams straight through to the caller.
pub struct SystemRunner {
    debug: bool,
}

impl SystemRunner {
    pub fn new(debug: bool) -> Self {
        Self { debug }
    }

    fn trace(&self, program: &str, args: &[&str]) {
        if self.debug {
            eprintln!("+ {} {}", program, args.join(" "));
        }
    }
}

impl ProcessRunner for SystemRunner {
    fn run(&self, program: &str, args: &[&str], cwd: &Path) -> TfstageResult<i32> {
        self.trace(program, args);
        let status = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .status()
            .map_err(|e| TfstageError::Spawn {
                tool: program.to_string(),
                source: e,
            })?;
        // A child killed by a signal has no exit code; report plain failure.
        Ok(status.code().unwrap_or(1))
    }

    fn capture(&self, program: &str, args: &[&str], cwd: &Path) -> TfstageResult<Capture> {
        self.trace(program, args);
        let output = Command::new(program)
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .output()
            .map_err(|e| TfstageError::Spawn {
                tool: program.to_string(),
                source: e,
            })?;
        Ok(Capture {
            code: output.status.code().unwrap_or(1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        })
    }
}
