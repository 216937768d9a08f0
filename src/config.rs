//! Parameter resolution for tfstage
//!
//! Implements the configuration hierarchy:
//! 1. CLI flags (highest priority)
//! 2. Environment variables (CONFIGURATION, GIT_REVISION, LIB_URL, ENVIRONMENT, DEBUG)
//! 3. Local settings file (./tfstage.toml)
//! 4. Built-in defaults (lowest priority)
//!
//! The resolved `Params` struct is built once at startup and passed to every
//! handler; nothing reads ambient state after that.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::cli::Cli;
use crate::error::{TfstageError, TfstageResult};

/// Disposable staging area holding the fetched library.
pub const WORK_DIR: &str = ".tmp";

/// Subdirectory of the library that holds the named configurations.
pub const CONFIGURATIONS_DIR: &str = "configurations";

/// Local settings file, generated by `bootstrap` and loaded at startup.
pub const SETTINGS_FILE: &str = "tfstage.toml";

/// Token replaced by the resolved environment name during preparation.
pub const PLACEHOLDER: &str = "__ENVIRONMENT__";

pub const DEFAULT_REVISION: &str = "origin/main";
pub const DEFAULT_LIB_URL: &str = "https://github.com/tfstage/terraform-configurations.git";

/// The closed set of user-facing actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Bootstrap,
    Init,
    Plan,
    Apply,
    Show,
    Destroy,
    Clean,
}

impl Action {
    pub fn name(self) -> &'static str {
        match self {
            Self::Bootstrap => "bootstrap",
            Self::Init => "init",
            Self::Plan => "plan",
            Self::Apply => "apply",
            Self::Show => "show",
            Self::Destroy => "destroy",
            Self::Clean => "clean",
        }
    }

    pub fn requires_configuration(self) -> bool {
        matches!(
            self,
            Self::Bootstrap | Self::Init | Self::Plan | Self::Apply | Self::Destroy
        )
    }

    pub fn requires_environment(self) -> bool {
        matches!(self, Self::Bootstrap | Self::Init | Self::Plan | Self::Apply)
    }

    pub fn requires_revision(self) -> bool {
        matches!(self, Self::Bootstrap)
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Contents of the local settings file: key = value pairs for the same
/// fields the environment variables cover.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub configuration: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub lib_url: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
}

/// Non-fatal warning about a settings key we do not understand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

impl fmt::Display for SettingsWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown key '{}' in {}", self.key, self.file.display())?;
        if let Some(line) = self.line {
            write!(f, ":{}", line)?;
        }
        if let Some(suggestion) = &self.suggestion {
            write!(f, " (did you mean '{}'?)", suggestion)?;
        }
        Ok(())
    }
}

impl Settings {
    /// Load the settings file if present; an absent file is not an error.
    pub fn load_or_default(path: &Path) -> TfstageResult<(Self, Vec<SettingsWarning>)> {
        if !path.exists() {
            return Ok((Self::default(), Vec::new()));
        }
        Self::load_with_warnings(path)
    }

    /// Load settings and collect non-fatal warnings for unknown keys.
    pub fn load_with_warnings(path: &Path) -> TfstageResult<(Self, Vec<SettingsWarning>)> {
        let content = fs::read_to_string(path)?;

        let mut unknown_paths: Vec<String> = Vec::new();
        let deserializer = toml::de::Deserializer::new(&content);

        let settings: Self = serde_ignored::deserialize(deserializer, |path| {
            unknown_paths.push(path.to_string());
        })
        .map_err(|e| TfstageError::InvalidSettings {
            file: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let warnings = unknown_paths
            .into_iter()
            .map(|path_str| {
                let key = path_str
                    .rsplit('.')
                    .next()
                    .unwrap_or(path_str.as_str())
                    .to_string();
                SettingsWarning {
                    key: key.clone(),
                    file: path.to_path_buf(),
                    line: find_line_number(&content, &key),
                    suggestion: suggest_key(&key),
                }
            })
            .collect();

        Ok((settings, warnings))
    }
}

/// Fully resolved invocation parameters, immutable after resolution.
#[derive(Debug, Clone)]
pub struct Params {
    pub configuration: Option<String>,
    pub revision: String,
    pub lib_url: String,
    pub environment: Option<String>,
    pub work_dir: PathBuf,
    pub passthrough: Vec<String>,
    pub debug: bool,
}

impl Params {
    /// Merge flags, environment variables, settings, and defaults.
    pub fn resolve(cli: &Cli, settings: &Settings) -> Self {
        let configuration = resolve_field(
            cli.configuration.clone(),
            env_non_empty("CONFIGURATION"),
            settings.configuration.clone(),
        );
        let revision = resolve_field(
            cli.revision.clone(),
            env_non_empty("GIT_REVISION"),
            settings.revision.clone(),
        )
        .unwrap_or_else(|| DEFAULT_REVISION.to_string());
        let lib_url = resolve_field(
            cli.lib_url.clone(),
            env_non_empty("LIB_URL"),
            settings.lib_url.clone(),
        )
        .unwrap_or_else(|| DEFAULT_LIB_URL.to_string());
        let environment = resolve_field(
            cli.environment.clone(),
            env_non_empty("ENVIRONMENT"),
            settings.environment.clone(),
        );

        Self {
            configuration,
            revision,
            lib_url,
            environment,
            work_dir: PathBuf::from(WORK_DIR),
            passthrough: cli.command.passthrough().to_vec(),
            debug: cli.debug || env_truthy("DEBUG"),
        }
    }

    /// Check the action-specific mandatory fields.
    pub fn validate_for(&self, action: Action) -> TfstageResult<()> {
        if action.requires_configuration() && is_blank(&self.configuration) {
            return Err(TfstageError::MissingParameter {
                name: "configuration",
                action: action.name(),
                flag: "configuration",
                env: "CONFIGURATION",
            });
        }
        if action.requires_environment() && is_blank(&self.environment) {
            return Err(TfstageError::MissingParameter {
                name: "environment",
                action: action.name(),
                flag: "environment",
                env: "ENVIRONMENT",
            });
        }
        if action.requires_revision() && self.revision.is_empty() {
            return Err(TfstageError::MissingParameter {
                name: "revision",
                action: action.name(),
                flag: "revision",
                env: "GIT_REVISION",
            });
        }
        Ok(())
    }
}

/// Precedence for one field: flag beats environment beats settings file.
fn resolve_field(
    flag: Option<String>,
    env: Option<String>,
    file: Option<String>,
) -> Option<String> {
    flag.or(env).or(file)
}

fn is_blank(value: &Option<String>) -> bool {
    value.as_deref().map_or(true, str::is_empty)
}

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}

fn env_truthy(name: &str) -> bool {
    match std::env::var(name) {
        Ok(v) => {
            let v = v.to_lowercase();
            !v.is_empty() && v != "0" && v != "false"
        }
        Err(_) => false,
    }
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    for (i, line) in content.lines().enumerate() {
        if line.contains(needle) {
            return Some(i + 1);
        }
    }
    None
}

fn suggest_key(unknown: &str) -> Option<String> {
    const CANDIDATES: &[&str] = &["configuration", "revision", "lib_url", "environment"];

    let mut best: Option<(&str, usize)> = None;
    for candidate in CANDIDATES {
        let dist = levenshtein(unknown, candidate);
        best = match best {
            None => Some((candidate, dist)),
            Some((_, best_dist)) if dist < best_dist => Some((candidate, dist)),
            Some(current) => Some(current),
        };
    }

    match best {
        Some((candidate, dist)) if dist <= 3 => Some(candidate.to_string()),
        _ => None,
    }
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let a_bytes = a.as_bytes();
    let b_bytes = b.as_bytes();

    let mut prev: Vec<usize> = (0..=b_bytes.len()).collect();
    let mut curr = vec![0usize; b_bytes.len() + 1];

    for (i, &ac) in a_bytes.iter().enumerate() {
        curr[0] = i + 1;
        for (j, &bc) in b_bytes.iter().enumerate() {
            let cost = if ac == bc { 0 } else { 1 };
            curr[j + 1] = std::cmp::min(
                std::cmp::min(prev[j + 1] + 1, curr[j] + 1),
                prev[j] + cost,
            );
        }
        prev.clone_from_slice(&curr);
    }

    prev[b_bytes.len()]
}
