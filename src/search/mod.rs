//! Full-text search over session message content
//!
//! # Error Handling Strategy
//!
//! A search refresh **never drops good data**:
//!
//! - **Per-file failures**: A file that fails to parse keeps whatever entries were cached
//!   for it before. New files that fail are simply absent until a later refresh succeeds.
//!
//! - **Reporting**: Failures are logged as they happen and collected in [`RefreshStats`].
//!   [`SearchIndex::refresh_from`] returns the first one as an error only after the new
//!   snapshot has been published.
//!
//! Queries never fail: a blank query returns nothing and limits are clamped.

pub mod index;
pub mod loader;
pub mod preview;

pub use index::{DEFAULT_LIMIT, FileFailure, MAX_LIMIT, RefreshStats, SearchIndex};
pub use loader::{FileLoader, SessionLoader};
pub use preview::{make_preview, match_span};
