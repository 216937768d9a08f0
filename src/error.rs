//! Error types for tfstage
//!
//! Uses `thiserror` for library errors. The binary maps these onto exit
//! codes: usage errors exit 1, delegated-tool failures exit with the
//! child's own code.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for tfstage operations
pub type TfstageResult<T> = Result<T, TfstageError>;

/// Main error type for tfstage operations
#[derive(Error, Debug)]
pub enum TfstageError {
    /// Mandatory parameter absent after full resolution
    #[error("missing required parameter '{name}' for '{action}' (pass --{flag} or set {env})")]
    MissingParameter {
        name: &'static str,
        action: &'static str,
        flag: &'static str,
        env: &'static str,
    },

    /// Settings file present but not parseable
    #[error("invalid settings in {file}: {message}")]
    InvalidSettings { file: PathBuf, message: String },

    /// Bootstrap refuses to clobber an existing settings file
    #[error("{file} already exists - bootstrap expects an empty configuration directory")]
    SettingsExists { file: PathBuf },

    /// External binary could not be started at all
    #[error("failed to run '{tool}': {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },

    /// External binary ran and exited non-zero
    #[error("'{tool}' failed with exit code {code}")]
    DelegatedFailure { tool: String, code: i32 },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TfstageError {
    /// Usage errors get help text appended by the binary.
    pub fn is_usage(&self) -> bool {
        matches!(self, Self::MissingParameter { .. })
    }

    /// Process exit code for this error. Delegated failures propagate the
    /// child's code unchanged; everything else is a plain failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::DelegatedFailure { code, .. } => *code,
            _ => 1,
        }
    }
}
