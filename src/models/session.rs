use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::date::DateKey;

/// Directory key used when a session has no working directory metadata
pub const UNKNOWN_CWD: &str = "(unknown)";

/// Header of a session file, taken from its `session_meta` record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMeta {
    #[serde(default, deserialize_with = "crate::parsers::deserializers::deserialize_null_default")]
    pub id: String,
    #[serde(default, deserialize_with = "crate::parsers::deserializers::deserialize_null_default")]
    pub timestamp: String,
    #[serde(default, deserialize_with = "crate::parsers::deserializers::deserialize_null_default")]
    pub cwd: String,
    #[serde(default, deserialize_with = "crate::parsers::deserializers::deserialize_null_default")]
    pub originator: String,
    #[serde(default, deserialize_with = "crate::parsers::deserializers::deserialize_null_default")]
    pub cli_version: String,
    #[serde(default, deserialize_with = "crate::parsers::deserializers::deserialize_null_default")]
    pub instructions: String,
}

impl SessionMeta {
    pub fn is_empty(&self) -> bool {
        self.id.is_empty()
            && self.timestamp.is_empty()
            && self.cwd.is_empty()
            && self.originator.is_empty()
            && self.cli_version.is_empty()
            && self.instructions.is_empty()
    }

    /// Fill any empty field from `other`, keeping fields already known
    pub fn merge_missing(&mut self, other: SessionMeta) {
        fill(&mut self.id, other.id);
        fill(&mut self.timestamp, other.timestamp);
        fill(&mut self.cwd, other.cwd);
        fill(&mut self.originator, other.originator);
        fill(&mut self.cli_version, other.cli_version);
        fill(&mut self.instructions, other.instructions);
    }

    /// Shell snippet that resumes this session, or `None` without an id
    pub fn resume_command(&self) -> Option<String> {
        if self.id.is_empty() {
            return None;
        }
        if self.cwd.is_empty() {
            return Some(format!("codex resume {}", self.id));
        }
        Some(format!("cd {}\ncodex resume {}", shell_quote(&self.cwd), self.id))
    }
}

fn fill(target: &mut String, value: String) {
    if target.is_empty() {
        *target = value;
    }
}

fn shell_quote(value: &str) -> String {
    if value.is_empty() {
        return "''".to_string();
    }
    format!("'{}'", value.replace('\'', r"'\''"))
}

/// Map blank working directories to [`UNKNOWN_CWD`]
pub fn normalize_cwd(value: &str) -> &str {
    if value.trim().is_empty() { UNKNOWN_CWD } else { value }
}

/// A session log file as seen by one scanner refresh
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SessionFile {
    pub date: DateKey,
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
    pub modified: DateTime<Utc>,
    pub meta: Option<SessionMeta>,
}

impl SessionFile {
    /// Grouping key for the working-directory view
    pub fn cwd_key(&self) -> &str {
        match &self.meta {
            Some(meta) => normalize_cwd(&meta.cwd),
            None => UNKNOWN_CWD,
        }
    }
}
