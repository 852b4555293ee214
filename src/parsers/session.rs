use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::debug;

use super::envelope::{
    Envelope, ROLE_ASSISTANT, ROLE_USER, ReasoningItem, ResponseItem, TYPE_MESSAGE,
    TYPE_REASONING, TYPE_RESPONSE_ITEM, TYPE_SESSION_META, join_text, pretty_json,
};
use super::merge::merge_consecutive;
use crate::models::{ConversationEntry, RoleClass, Session, SessionMeta};

/// User messages are cut down to the text after this marker when trimming is enabled
pub const USER_REQUEST_MARKER: &str = "## My request for Codex:";

const EMPTY_PLACEHOLDER: &str = "(empty)";

/// Parser settings fixed at boot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    pub trim_user_request: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { trim_user_request: true }
    }
}

/// What a single log line contributed to the session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    Entry(ConversationEntry),
    Header(SessionMeta),
    /// A valid record outside display scope (tool calls, events, ...)
    Ignored,
    /// Not a decodable record
    Malformed,
}

/// Parse a session JSONL file into its header and merged timeline
///
/// Lines are decoded independently; undecodable lines are skipped. Only I/O
/// failures are returned as errors.
pub fn parse_session_file(path: &Path, options: ParseOptions) -> Result<Session> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open session file: {}", path.display()))?;
    let mut session = parse_session(BufReader::new(file), options)
        .with_context(|| format!("Failed to read session file: {}", path.display()))?;
    session.path = path.to_path_buf();
    Ok(session)
}

/// Parse session records from any buffered reader
pub fn parse_session<R: BufRead>(mut reader: R, options: ParseOptions) -> io::Result<Session> {
    let mut session = Session::default();
    let mut entries = Vec::new();
    let mut buf = Vec::new();
    let mut line_num = 0;
    let mut malformed = 0;

    while let Some(line) = next_line(&mut reader, &mut buf)? {
        line_num += 1;
        match parse_line(&line, line_num, options) {
            LineOutcome::Entry(entry) => entries.push(entry),
            // Last header wins when a file carries several session_meta records
            LineOutcome::Header(meta) => session.meta = Some(meta),
            LineOutcome::Ignored => {}
            LineOutcome::Malformed => malformed += 1,
        }
    }

    if malformed > 0 {
        debug!(lines = line_num, malformed, "skipped undecodable session lines");
    }

    session.entries = merge_consecutive(entries);
    Ok(session)
}

/// Decode one line (without its terminator)
pub fn parse_line(line: &str, line_num: usize, options: ParseOptions) -> LineOutcome {
    let Some(env) = Envelope::decode(line) else {
        return LineOutcome::Malformed;
    };

    match env.kind.as_str() {
        TYPE_SESSION_META => match SessionMeta::deserialize(&env.payload) {
            Ok(meta) => LineOutcome::Header(meta),
            Err(_) => LineOutcome::Malformed,
        },
        TYPE_RESPONSE_ITEM => parse_response_item(&env, line, line_num, options),
        _ => LineOutcome::Ignored,
    }
}

fn parse_response_item(
    env: &Envelope,
    raw: &str,
    line_num: usize,
    options: ParseOptions,
) -> LineOutcome {
    let Ok(item) = ResponseItem::deserialize(&env.payload) else {
        return LineOutcome::Malformed;
    };

    let (role, title, mut content) = match item.item_type.as_str() {
        TYPE_MESSAGE => {
            let title = match item.role.as_str() {
                ROLE_USER => "User",
                ROLE_ASSISTANT => "Agent",
                _ => return LineOutcome::Ignored,
            };
            let mut content = join_text(&item.content);
            if item.role == ROLE_USER {
                content = trim_user_request(&content, options);
            }
            (item.role.clone(), title, content)
        }
        TYPE_REASONING => {
            let content = ReasoningItem::deserialize(&env.payload)
                .map(|reasoning| join_text(&reasoning.summary))
                .unwrap_or_default();
            (ROLE_ASSISTANT.to_string(), "Reasoning", content)
        }
        _ => return LineOutcome::Ignored,
    };

    if content.is_empty() {
        content = pretty_json(&env.payload);
    }
    if content.trim().is_empty() {
        content = EMPTY_PLACEHOLDER.to_string();
    }

    LineOutcome::Entry(ConversationEntry {
        line: line_num,
        timestamp: env.timestamp.clone(),
        entry_type: env.kind.clone(),
        subtype: item.item_type,
        class: RoleClass::for_role(&role),
        role,
        title: title.to_string(),
        content,
        raw: raw.to_string(),
    })
}

/// Keep only the text after [`USER_REQUEST_MARKER`], if trimming is enabled and
/// the marker is present
pub fn trim_user_request(content: &str, options: ParseOptions) -> String {
    if !options.trim_user_request {
        return content.to_string();
    }
    match content.find(USER_REQUEST_MARKER) {
        Some(index) => content[index + USER_REQUEST_MARKER.len()..].trim().to_string(),
        None => content.to_string(),
    }
}

/// Read the next `\n`-terminated record, stripping trailing CR/LF
///
/// Invalid UTF-8 is replaced rather than rejected so one bad byte cannot end a parse.
pub(crate) fn next_line<R: BufRead>(
    reader: &mut R,
    buf: &mut Vec<u8>,
) -> io::Result<Option<String>> {
    buf.clear();
    if reader.read_until(b'\n', buf)? == 0 {
        return Ok(None);
    }
    let text = String::from_utf8_lossy(buf.as_slice());
    Ok(Some(text.trim_end_matches(['\r', '\n']).to_string()))
}
