//! Clean command handler
//!
//! Removes the working directory. Always succeeds: a missing directory and a
//! failed removal are both swallowed, since the next preparation re-creates
//! everything from scratch anyway.

use std::fs;
use std::path::Path;

use crate::config::Params;
use crate::error::TfstageResult;

pub fn cmd_clean(base: &Path, params: &Params) -> TfstageResult<()> {
    let work_dir = base.join(&params.work_dir);
    if work_dir.exists() {
        let _ = fs::remove_dir_all(&work_dir);
        println!("Removed working directory {}", work_dir.display());
    }
    Ok(())
}
