//! Working-directory preparation
//!
//! The workspace is a disposable clone of the configuration library under
//! `./.tmp`, pinned to the resolved revision. Preparation also copies local
//! override files into the selected configuration and substitutes the
//! environment placeholder, so the subtree is ready for terraform as-is.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::{Params, CONFIGURATIONS_DIR, PLACEHOLDER};
use crate::error::TfstageResult;
use crate::git::GitClient;
use crate::process::ProcessRunner;

/// Local files with these extensions are copied into the configuration
/// before terraform runs.
const OVERRIDE_EXTENSIONS: &[&str] = &["tf", "tfvars"];

/// Path of the active configuration subtree for this invocation.
pub fn config_dir(base: &Path, params: &Params) -> PathBuf {
    base.join(&params.work_dir)
        .join(CONFIGURATIONS_DIR)
        .join(params.configuration.as_deref().unwrap_or_default())
}

pub struct Workspace<'a, R: ProcessRunner> {
    base: PathBuf,
    root: PathBuf,
    config_dir: PathBuf,
    git: GitClient<'a, R>,
}

impl<'a, R: ProcessRunner> Workspace<'a, R> {
    pub fn new(base: &Path, params: &Params, runner: &'a R) -> Self {
        Self {
            base: base.to_path_buf(),
            root: base.join(&params.work_dir),
            config_dir: config_dir(base, params),
            git: GitClient::new(runner),
        }
    }

    pub fn config_dir(&self) -> &Path {
        &self.config_dir
    }

    /// Bring the working copy to the pinned revision and parameterize it.
    ///
    /// Idempotent: an existing checkout is fetched and hard-reset rather than
    /// re-cloned, so repeated calls converge on the pinned revision whatever
    /// state the last run left behind.
    pub fn prepare(&self, params: &Params) -> TfstageResult<()> {
        if !self.config_dir.exists() {
            // Stale or missing checkout: start over from a fresh clone.
            let _ = fs::remove_dir_all(&self.root);
            println!("Cloning {} into {}", params.lib_url, self.root.display());
            self.git.clone_into(&params.lib_url, &self.root)?;
        }
        self.git.fetch(&self.root)?;
        self.git.reset_hard(&self.root, &params.revision)?;
        self.copy_overrides();
        if let Some(environment) = params.environment.as_deref() {
            substitute_tree(&self.config_dir, environment)?;
        }
        Ok(())
    }

    /// Copy local override files next to the settings file into the
    /// configuration. Best effort: absent files and failed copies are
    /// ignored.
    fn copy_overrides(&self) {
        let Ok(entries) = fs::read_dir(&self.base) else {
            return;
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_file() || !is_override(&path) {
                continue;
            }
            if let Some(name) = path.file_name() {
                let _ = fs::copy(&path, self.config_dir.join(name));
            }
        }
    }
}

fn is_override(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| OVERRIDE_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

/// Replace the environment placeholder in every text file under `dir`.
/// Files that are not valid UTF-8 are left alone.
fn substitute_tree(dir: &Path, environment: &str) -> TfstageResult<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if path.is_dir() {
            substitute_tree(&path, environment)?;
        } else if let Ok(content) = fs::read_to_string(&path) {
            if content.contains(PLACEHOLDER) {
                fs::write(&path, content.replace(PLACEHOLDER, environment))?;
            }
        }
    }
    Ok(())
}
