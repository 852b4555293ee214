use std::borrow::Cow;
use std::env;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result, bail};

use crate::models::DateKey;

/// File suffix of session logs
pub const SESSION_FILE_SUFFIX: &str = ".jsonl";

/// Split a session file path into its date folder and file name
///
/// Returns `None` unless `path`, relative to `root`, is exactly
/// `<yyyy>/<mm>/<dd>/<name>.jsonl` with a valid [`DateKey`].
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use codex_sessions::utils::split_session_path;
///
/// let (date, name) =
///     split_session_path(Path::new("/s"), Path::new("/s/2026/01/09/a.jsonl")).unwrap();
/// assert_eq!(date.to_string(), "2026-01-09");
/// assert_eq!(name, "a.jsonl");
/// ```
pub fn split_session_path(root: &Path, path: &Path) -> Option<(DateKey, String)> {
    let rel = path.strip_prefix(root).ok()?;
    let parts = rel
        .components()
        .map(|c| match c {
            Component::Normal(part) => part.to_str(),
            _ => None,
        })
        .collect::<Option<Vec<&str>>>()?;

    let [year, month, day, name] = parts.as_slice() else {
        return None;
    };
    if !name.ends_with(SESSION_FILE_SUFFIX) {
        return None;
    }
    let date = DateKey::parse(year, month, day)?;
    Some((date, name.to_string()))
}

/// Expand a leading `~` or `~/` to the home directory
///
/// # Errors
///
/// Returns an error if the path is empty, or if it starts with `~` and `HOME`
/// is not set.
pub fn expand_home(path: &str) -> Result<PathBuf> {
    expand_home_internal(path, None)
}

pub(crate) fn expand_home_internal(path: &str, home_override: Option<&str>) -> Result<PathBuf> {
    if path.is_empty() {
        bail!("Sessions directory cannot be empty");
    }
    if path != "~" && !path.starts_with("~/") {
        return Ok(PathBuf::from(path));
    }

    let home = match home_override {
        Some(home) => home.to_string(),
        None => env::var("HOME").context("HOME environment variable not set")?,
    };
    match path.strip_prefix("~/") {
        Some(rest) => Ok(PathBuf::from(home).join(rest)),
        None => Ok(PathBuf::from(home)),
    }
}

/// Formats a path with ~ substitution for the home directory
///
/// # Examples
///
/// ```no_run
/// use std::path::PathBuf;
/// use codex_sessions::format_path_with_tilde;
///
/// let path = PathBuf::from("/Users/alice/.codex/sessions");
/// // Returns "~/.codex/sessions" if HOME=/Users/alice
/// let formatted = format_path_with_tilde(&path);
/// ```
pub fn format_path_with_tilde(path: &Path) -> String {
    format_path_with_tilde_internal(path, None)
}

pub(crate) fn format_path_with_tilde_internal(path: &Path, home_override: Option<&str>) -> String {
    let home_from_env = env::var("HOME").ok();
    let home = home_override.or(home_from_env.as_deref());

    let path_str = path.to_string_lossy();
    if let Some(home) = home
        && !home.is_empty()
        && let Ok(rest) = path.strip_prefix(home)
    {
        if rest.as_os_str().is_empty() {
            return "~".to_string();
        }
        return format!("~/{}", rest.to_string_lossy());
    }

    match path_str {
        Cow::Borrowed(s) => s.to_string(),
        Cow::Owned(s) => s,
    }
}
