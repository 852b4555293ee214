//! JSONL parsers for Codex session logs
//!
//! # Error Handling Strategy
//!
//! Parsing is **best effort per line**:
//!
//! - **Individual line failures**: A line that is not a decodable envelope, or whose payload
//!   does not match the shape its type announces, is reported as [`LineOutcome::Malformed`]
//!   and skipped. It never aborts the file.
//!
//! - **Out-of-scope records**: Tool calls, tool output and event records decode fine but are
//!   reported as [`LineOutcome::Ignored`] and dropped from the timeline.
//!
//! - **Error propagation**: Only I/O failures (open/read) are returned as `anyhow` errors.
//!   Callers decide whether a failed file is fatal; the scanner and search index both
//!   degrade gracefully.
//!
//! Two entry points exist: [`parse_session_file`] builds the full merged timeline, and
//! [`parse_session_meta`] reads only as far as needed to learn the session header.

pub mod deserializers;
pub mod envelope;
pub mod merge;
pub mod meta;
pub mod session;

pub use merge::merge_consecutive;
pub use meta::{parse_session_meta, read_session_meta};
pub use session::{
    LineOutcome, ParseOptions, USER_REQUEST_MARKER, parse_line, parse_session, parse_session_file,
    trim_user_request,
};
