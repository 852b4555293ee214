//! Data models for Codex session logs.
//!
//! - [`DateKey`] - A `yyyy/mm/dd` folder under the sessions root
//! - [`SessionFile`] / [`SessionMeta`] - A log file on disk and its header
//! - [`ConversationEntry`] / [`Session`] - The parsed, merged timeline of one file
//! - [`SearchResult`] - A substring match with its preview
//!
//! Header fields use the null-tolerant deserializers in `parsers::deserializers`.

pub mod date;
pub mod entry;
pub mod search;
pub mod session;

pub use date::DateKey;
pub use entry::{ConversationEntry, RoleClass, Session};
pub use search::SearchResult;
pub use session::{SessionFile, SessionMeta, UNKNOWN_CWD, normalize_cwd};
