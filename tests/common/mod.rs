//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use serde_json::{Value, json};
use tempfile::TempDir;

/// Builder for creating test sessions directory trees (`yyyy/mm/dd/<name>.jsonl`)
pub struct SessionsDirBuilder {
    temp_dir: TempDir,
}

impl SessionsDirBuilder {
    /// Create a new builder with an empty sessions directory
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self { temp_dir }
    }

    /// Get the path to the sessions directory
    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Add a session file under `date` (`yyyy/mm/dd`) built from `lines`
    pub fn with_session(self, date: &str, name: &str, lines: &[LineBuilder]) -> Self {
        let content = lines.iter().map(|l| l.to_json()).collect::<Vec<_>>().join("\n") + "\n";
        self.with_raw_file(&format!("{date}/{name}"), &content)
    }

    /// Add a file at `rel` with exactly `content`
    pub fn with_raw_file(self, rel: &str, content: &str) -> Self {
        write_file(self.temp_dir.path(), rel, content);
        self
    }

    /// Backdate a file's modification time by `secs`
    pub fn aged(self, rel: &str, secs: u64) -> Self {
        set_age(&self.temp_dir.path().join(rel), secs);
        self
    }

    /// Build and return the temp directory (consumes self)
    pub fn build(self) -> TempDir {
        self.temp_dir
    }
}

impl Default for SessionsDirBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub fn write_file(root: &Path, rel: &str, content: &str) -> PathBuf {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().expect("path has a parent")).expect("Failed to create dirs");
    fs::write(&path, content).expect("Failed to write file");
    path
}

pub fn set_age(path: &Path, secs: u64) {
    let file = fs::File::options().write(true).open(path).expect("Failed to open file");
    file.set_modified(SystemTime::now() - Duration::from_secs(secs))
        .expect("Failed to set mtime");
}

/// Builder for a single session log line
pub struct LineBuilder {
    timestamp: String,
    kind: String,
    payload: Value,
}

impl LineBuilder {
    fn new(kind: &str, payload: Value) -> Self {
        Self { timestamp: "2026-01-09T10:00:00.000Z".to_string(), kind: kind.to_string(), payload }
    }

    /// A `session_meta` header
    pub fn session_meta(id: &str, cwd: &str) -> Self {
        Self::new(
            "session_meta",
            json!({
                "id": id,
                "timestamp": "2026-01-09T09:59:58.000Z",
                "cwd": cwd,
                "originator": "codex_cli_rs",
                "cli_version": "0.63.0",
                "instructions": null
            }),
        )
    }

    /// A user message
    pub fn user(text: &str) -> Self {
        Self::message("user", "input_text", text)
    }

    /// An assistant message
    pub fn assistant(text: &str) -> Self {
        Self::message("assistant", "output_text", text)
    }

    /// A reasoning item with one summary fragment
    pub fn reasoning(summary: &str) -> Self {
        Self::new(
            "response_item",
            json!({
                "type": "reasoning",
                "summary": [{ "type": "summary_text", "text": summary }]
            }),
        )
    }

    /// A tool call, which never reaches the timeline
    pub fn function_call(name: &str) -> Self {
        Self::new(
            "response_item",
            json!({ "type": "function_call", "name": name, "arguments": "{}", "call_id": "c1" }),
        )
    }

    /// An event record, which never reaches the timeline
    pub fn event(message: &str) -> Self {
        Self::new("event_msg", json!({ "type": "agent_message", "message": message }))
    }

    /// A user message carrying an environment context block
    pub fn environment_context(cwd: &str) -> Self {
        Self::user(&format!("<environment_context>\n  <cwd>{cwd}</cwd>\n</environment_context>"))
    }

    fn message(role: &str, part: &str, text: &str) -> Self {
        Self::new(
            "response_item",
            json!({
                "type": "message",
                "role": role,
                "content": [{ "type": part, "text": text }]
            }),
        )
    }

    pub fn timestamp(mut self, timestamp: &str) -> Self {
        self.timestamp = timestamp.to_string();
        self
    }

    pub fn to_json(&self) -> String {
        json!({ "timestamp": self.timestamp, "type": self.kind, "payload": self.payload })
            .to_string()
    }
}

/// One date with a single conversation
pub fn minimal_sessions_dir() -> TempDir {
    SessionsDirBuilder::new()
        .with_session(
            "2026/01/09",
            "rollout-a.jsonl",
            &[
                LineBuilder::session_meta("sess-a", "/work/alpha"),
                LineBuilder::user("hello"),
                LineBuilder::assistant("hi there"),
            ],
        )
        .build()
}

/// Several dates, directories and a mix of record types
pub fn realistic_sessions_dir() -> TempDir {
    SessionsDirBuilder::new()
        .with_session(
            "2026/01/08",
            "rollout-old.jsonl",
            &[
                LineBuilder::session_meta("sess-old", "/work/alpha"),
                LineBuilder::user("set up the database migration"),
                LineBuilder::reasoning("Plan the schema"),
                LineBuilder::function_call("shell"),
                LineBuilder::assistant("Migration created"),
            ],
        )
        .with_session(
            "2026/01/09",
            "rollout-new.jsonl",
            &[
                LineBuilder::session_meta("sess-new", "/work/beta"),
                LineBuilder::user(
                    "# Context\nfiles...\n## My request for Codex:\nfix the migration test",
                ),
                LineBuilder::event("thinking"),
                LineBuilder::assistant("Fixed the test"),
            ],
        )
        .with_session(
            "2026/01/09",
            "rollout-nohdr.jsonl",
            &[LineBuilder::user("no header here"), LineBuilder::assistant("still indexed")],
        )
        .aged("2026/01/08/rollout-old.jsonl", 7200)
        .aged("2026/01/09/rollout-new.jsonl", 60)
        .aged("2026/01/09/rollout-nohdr.jsonl", 600)
        .build()
}
