//! Bootstrap command - scaffold a new configuration directory
//!
//! Intended to run once in an otherwise-empty directory: writes the ignore
//! file, a credential template, an example override file, and a settings
//! file capturing the resolved parameters, then prepares the workspace so
//! the directory is immediately usable with `tfstage plan`.

use std::fs;
use std::path::Path;

use crate::config::{Params, Settings, SETTINGS_FILE};
use crate::error::{TfstageError, TfstageResult};
use crate::process::ProcessRunner;
use crate::workspace::Workspace;

pub fn cmd_bootstrap<R: ProcessRunner>(
    base: &Path,
    params: &Params,
    runner: &R,
) -> TfstageResult<()> {
    scaffold(base, params)?;

    let workspace = Workspace::new(base, params, runner);
    workspace.prepare(params)?;

    println!();
    println!("Next: run `tfstage plan` to review the change set");
    Ok(())
}

fn scaffold(dir: &Path, params: &Params) -> TfstageResult<()> {
    let settings_path = dir.join(SETTINGS_FILE);
    if settings_path.exists() {
        return Err(TfstageError::SettingsExists {
            file: settings_path,
        });
    }

    fs::write(dir.join(".gitignore"), GITIGNORE_TEMPLATE)?;
    fs::write(dir.join(".env.template"), ENV_TEMPLATE)?;
    fs::write(dir.join("terraform.tfvars.example"), TFVARS_EXAMPLE)?;

    let settings = Settings {
        configuration: params.configuration.clone(),
        revision: Some(params.revision.clone()),
        lib_url: Some(params.lib_url.clone()),
        environment: params.environment.clone(),
    };
    let body = toml::to_string(&settings).map_err(|e| TfstageError::InvalidSettings {
        file: settings_path.clone(),
        message: e.to_string(),
    })?;
    fs::write(&settings_path, format!("{}{}", SETTINGS_HEADER, body))?;

    for name in [
        ".gitignore",
        ".env.template",
        "terraform.tfvars.example",
        SETTINGS_FILE,
    ] {
        println!("Created {}", dir.join(name).display());
    }
    Ok(())
}

// Template content strings

const SETTINGS_HEADER: &str = r#"# tfstage settings for this configuration directory.
# Flags and the CONFIGURATION/GIT_REVISION/LIB_URL/ENVIRONMENT variables
# override these values.

"#;

const GITIGNORE_TEMPLATE: &str = r#"# tfstage working directory
.tmp/

# Saved change sets
*.tfplan

# Environment credentials (keep the .template committed)
.env
"#;

const ENV_TEMPLATE: &str = r#"# Credentials for this configuration.
# Copy to .env, fill in, and source before running tfstage; .env itself is
# ignored by git.

export AWS_ACCESS_KEY_ID=
export AWS_SECRET_ACCESS_KEY=
export AWS_DEFAULT_REGION=
"#;

const TFVARS_EXAMPLE: &str = r#"# Example local overrides.
# Any *.tf or *.tfvars file in this directory is copied into the prepared
# configuration before terraform runs. Copy this file to terraform.tfvars to
# take effect. The __ENVIRONMENT__ token is substituted like everything else.

# domain = "__ENVIRONMENT__"
# instance_count = 2
"#;
