use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Get the Codex sessions directory (~/.codex/sessions)
pub fn default_sessions_dir() -> Result<PathBuf> {
    let home = env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".codex").join("sessions"))
}
