//! Codex Sessions - Browse and search Codex CLI session logs
//!
//! This library indexes the session logs Codex writes under `~/.codex/sessions/`,
//! laid out as `yyyy/mm/dd/<name>.jsonl`. It supports:
//!
//! - Scanning the date-partitioned tree into an immutable snapshot
//! - Reading each session's header (id, working directory, CLI version)
//! - Parsing a session into a merged, display-ready conversation timeline
//! - Case-insensitive full-text search with incremental reindexing
//! - Periodic background refresh of both indexes
//!
//! # Example
//!
//! ```no_run
//! use codex_sessions::{ParseOptions, Scanner, SearchIndex};
//!
//! let scanner = Scanner::new("/Users/alice/.codex/sessions");
//! scanner.refresh()?;
//!
//! let index = SearchIndex::new(ParseOptions::default());
//! index.refresh_from(&scanner)?;
//! for hit in index.search("migration", 10) {
//!     println!("{} {}:{} {}", hit.date, hit.file, hit.line, hit.preview);
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod cli;
pub mod config;
pub mod indexer;
pub mod models;
pub mod parsers;
pub mod refresher;
pub mod search;
pub mod utils;

// Re-export commonly used types
pub use config::Config;
pub use indexer::{ScanSnapshot, Scanner};
pub use models::{ConversationEntry, DateKey, SearchResult, Session, SessionFile, SessionMeta};
pub use parsers::{ParseOptions, parse_session_file, parse_session_meta};
pub use refresher::{Refresher, refresh_all};
pub use search::SearchIndex;
pub use utils::paths::format_path_with_tilde;
