use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use super::envelope::{
    Envelope, ROLE_USER, ResponseItem, TYPE_MESSAGE, TYPE_RESPONSE_ITEM, TYPE_SESSION_META,
    join_text,
};
use super::session::next_line;
use crate::models::SessionMeta;

const ENVIRONMENT_CONTEXT_TAG: &str = "<environment_context>";
const CWD_OPEN_TAG: &str = "<cwd>";
const CWD_CLOSE_TAG: &str = "</cwd>";

/// Read just enough of a session file to learn its header
///
/// Stops as soon as both the session id and working directory are known, so large
/// files are not read end to end. Returns `Ok(None)` when no header record exists;
/// only I/O failures are errors.
pub fn parse_session_meta(path: &Path) -> Result<Option<SessionMeta>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open session file: {}", path.display()))?;
    read_session_meta(BufReader::new(file))
        .with_context(|| format!("Failed to read session header: {}", path.display()))
}

pub fn read_session_meta<R: BufRead>(mut reader: R) -> io::Result<Option<SessionMeta>> {
    let mut buf = Vec::new();
    let mut meta: Option<SessionMeta> = None;
    let mut cwd_candidate: Option<String> = None;

    while let Some(line) = next_line(&mut reader, &mut buf)? {
        let Some(env) = Envelope::decode(&line) else {
            continue;
        };

        if cwd_candidate.is_none() {
            cwd_candidate =
                user_message_text(&env, &line).and_then(|text| extract_cwd_from_text(&text));
        }

        match meta.as_mut() {
            None => meta = meta_from_envelope(&env, &line),
            Some(current)
                if current.id.is_empty()
                    || current.cwd.is_empty()
                    || current.timestamp.is_empty() =>
            {
                if let Some(parsed) = meta_from_envelope(&env, &line) {
                    current.merge_missing(parsed);
                }
            }
            Some(_) => {}
        }

        if let Some(current) = meta.as_mut()
            && current.cwd.is_empty()
            && let Some(cwd) = &cwd_candidate
        {
            current.cwd = cwd.clone();
        }

        if let Some(current) = &meta
            && !current.id.is_empty()
            && !current.cwd.is_empty()
        {
            break;
        }
    }

    Ok(meta)
}

/// Header from either an enveloped `session_meta` record or a legacy flat line
/// carrying the fields at top level
fn meta_from_envelope(env: &Envelope, line: &str) -> Option<SessionMeta> {
    if env.kind == TYPE_SESSION_META {
        return SessionMeta::deserialize(&env.payload).ok();
    }
    if !env.kind.is_empty() {
        return None;
    }
    serde_json::from_str::<SessionMeta>(line).ok().filter(|meta| !meta.is_empty())
}

/// Text of a user message, from a `response_item` record or a legacy top-level
/// `message` line
fn user_message_text(env: &Envelope, line: &str) -> Option<String> {
    let item = match env.kind.as_str() {
        TYPE_RESPONSE_ITEM => ResponseItem::deserialize(&env.payload).ok()?,
        TYPE_MESSAGE => serde_json::from_str::<ResponseItem>(line).ok()?,
        _ => return None,
    };
    if item.item_type != TYPE_MESSAGE || item.role != ROLE_USER {
        return None;
    }
    let text = join_text(&item.content);
    if text.is_empty() { None } else { Some(text) }
}

/// Pull the `<cwd>` value out of an `<environment_context>` block
pub fn extract_cwd_from_text(text: &str) -> Option<String> {
    let start = text.find(ENVIRONMENT_CONTEXT_TAG)?;
    let context = &text[start + ENVIRONMENT_CONTEXT_TAG.len()..];
    let open = context.find(CWD_OPEN_TAG)?;
    let value = &context[open + CWD_OPEN_TAG.len()..];
    let close = value.find(CWD_CLOSE_TAG)?;
    let cwd = value[..close].trim();
    if cwd.is_empty() { None } else { Some(cwd.to_string()) }
}
