//! Common test utilities for tfstage CLI tests.
//!
//! Provides `TestEnv`: an isolated project directory plus fake `git` and
//! `terraform` executables placed on PATH. The fakes append every invocation
//! to a log file the assertions read, and their behavior is steered through
//! environment variables:
//!
//! - `FAKE_REMOTE`: directory the fake `git clone` copies from
//! - `FAKE_ORIGIN_URL`: output of `git config --get remote.origin.url`
//!   (empty means "not a repository")
//! - `FAKE_GIT_FAIL_CMD` / `FAKE_GIT_FAIL_CODE`: make one git subcommand fail
//! - `FAKE_TF_FAIL_CMD` / `FAKE_TF_FAIL_CODE`: make one terraform subcommand
//!   fail

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

/// Remote URL the fake git reports for the project directory, making
/// `staging.example.com` the discovered default environment.
pub const FAKE_ORIGIN_URL: &str = "git@github.com:acme/staging.example.com.git";

const GIT_SCRIPT: &str = r#"#!/bin/sh
[ -n "$FAKE_LOG" ] && echo "git $*" >> "$FAKE_LOG"
if [ -n "$FAKE_GIT_FAIL_CMD" ] && [ "$1" = "$FAKE_GIT_FAIL_CMD" ]; then
  exit "${FAKE_GIT_FAIL_CODE:-1}"
fi
case "$1" in
  clone)
    dest="$3"
    mkdir -p "$dest"
    cp -R "$FAKE_REMOTE"/. "$dest"/
    ;;
  config)
    if [ -z "$FAKE_ORIGIN_URL" ]; then
      exit 1
    fi
    echo "$FAKE_ORIGIN_URL"
    ;;
esac
exit 0
"#;

const TERRAFORM_SCRIPT: &str = r#"#!/bin/sh
[ -n "$FAKE_LOG" ] && echo "terraform $*" >> "$FAKE_LOG"
if [ -n "$FAKE_TF_FAIL_CMD" ] && [ "$1" = "$FAKE_TF_FAIL_CMD" ]; then
  exit "${FAKE_TF_FAIL_CODE:-1}"
fi
if [ "$1" = "plan" ]; then
  prev=""
  for arg in "$@"; do
    if [ "$prev" = "-out" ]; then
      : > "$arg"
    fi
    prev="$arg"
  done
fi
exit 0
"#;

/// Result of running the tfstage CLI
#[derive(Debug)]
pub struct TestResult {
    pub success: bool,
    pub exit_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl TestResult {
    /// Combine stdout and stderr
    pub fn combined_output(&self) -> String {
        format!("{}\n{}", self.stdout, self.stderr)
    }
}

/// Isolated test environment with a project directory, a fake remote
/// library, and fake external tools.
pub struct TestEnv {
    pub project_root: TempDir,
    harness: TempDir,
}

impl TestEnv {
    /// Environment with the default remote: one `app` configuration whose
    /// files carry the environment placeholder.
    pub fn new() -> Self {
        let env = Self::empty();
        env.write_remote_file(
            "configurations/app/main.tf",
            "variable \"domain\" {\n  default = \"__ENVIRONMENT__\"\n}\n",
        );
        env.write_remote_file(
            "configurations/app/dns/records.tf",
            "zone = \"api.__ENVIRONMENT__\"\n",
        );
        env
    }

    /// Environment with an empty remote library.
    pub fn empty() -> Self {
        let project_root = TempDir::new().expect("Failed to create project temp dir");
        let harness = TempDir::new().expect("Failed to create harness temp dir");

        let bin_dir = harness.path().join("bin");
        fs::create_dir_all(&bin_dir).expect("Failed to create fake bin dir");
        fs::create_dir_all(harness.path().join("remote")).expect("Failed to create fake remote");

        let env = Self {
            project_root,
            harness,
        };
        env.install_fake("git", GIT_SCRIPT);
        env.install_fake("terraform", TERRAFORM_SCRIPT);
        env
    }

    fn install_fake(&self, name: &str, script: &str) {
        let path = self.harness.path().join("bin").join(name);
        fs::write(&path, script).expect("Failed to write fake tool");
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&path, fs::Permissions::from_mode(0o755))
                .expect("Failed to mark fake tool executable");
        }
    }

    /// Get path relative to the project root
    pub fn project_path(&self, relative: &str) -> PathBuf {
        self.project_root.path().join(relative)
    }

    /// Write a file into the project directory
    pub fn write_project_file(&self, relative: &str, content: &str) {
        write_file(&self.project_path(relative), content);
    }

    /// Write the local settings file
    pub fn write_settings(&self, content: &str) {
        self.write_project_file("tfstage.toml", content);
    }

    /// Write a file into the fake remote library
    pub fn write_remote_file(&self, relative: &str, content: &str) {
        write_file(&self.harness.path().join("remote").join(relative), content);
    }

    /// Every fake-tool invocation so far, one `"tool arg arg"` line each
    pub fn invocations(&self) -> Vec<String> {
        let log = self.harness.path().join("invocations.log");
        fs::read_to_string(log)
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Forget previously recorded invocations
    pub fn clear_invocations(&self) {
        let _ = fs::remove_file(self.harness.path().join("invocations.log"));
    }

    /// Run tfstage in this environment from the project root
    pub fn run(&self, args: &[&str]) -> TestResult {
        self.run_with_env(args, &[])
    }

    /// Run tfstage with extra environment variables set on the child.
    /// Later entries override the harness defaults, so tests can replace
    /// `FAKE_ORIGIN_URL` or set `ENVIRONMENT` and friends.
    pub fn run_with_env(&self, args: &[&str], env_vars: &[(&str, &str)]) -> TestResult {
        let bin_dir = self.harness.path().join("bin");
        let path = match std::env::var("PATH") {
            Ok(orig) => format!("{}:{}", bin_dir.display(), orig),
            Err(_) => bin_dir.display().to_string(),
        };

        let mut cmd = Command::new(env!("CARGO_BIN_EXE_tfstage"));
        cmd.current_dir(self.project_root.path())
            .args(args)
            .env("PATH", path)
            .env("FAKE_LOG", self.harness.path().join("invocations.log"))
            .env("FAKE_REMOTE", self.harness.path().join("remote"))
            .env("FAKE_ORIGIN_URL", FAKE_ORIGIN_URL);

        // The wrapper's own configuration variables must come from the test,
        // never from the machine running it.
        for key in ["CONFIGURATION", "GIT_REVISION", "LIB_URL", "ENVIRONMENT", "DEBUG"] {
            cmd.env_remove(key);
        }
        for (key, value) in env_vars {
            cmd.env(key, value);
        }

        let output = cmd.output().expect("Failed to execute tfstage");
        output_to_result(output)
    }
}

fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("Failed to create directories");
    }
    fs::write(path, content).expect("Failed to write file");
}

fn output_to_result(output: Output) -> TestResult {
    TestResult {
        success: output.status.success(),
        exit_code: output.status.code().unwrap_or(-1),
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
    }
}
