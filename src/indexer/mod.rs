//! Directory scanning for the date-partitioned sessions tree
//!
//! # Error Handling Strategy
//!
//! A refresh is **all or nothing**:
//!
//! - **Structural failures**: A missing or unreadable root, or any I/O error during the
//!   directory walk, aborts the refresh. The previously published snapshot stays in place,
//!   so readers keep seeing the last good view.
//!
//! - **File-level issues**: Files outside the `yyyy/mm/dd/<name>.jsonl` layout are skipped
//!   silently. A file whose header cannot be read is still indexed, just without a header.
//!
//! - **Publication**: A new [`ScanSnapshot`] is built completely before being swapped in,
//!   so the per-date, per-name and per-directory views never disagree.

pub mod scanner;
pub mod snapshot;

pub use scanner::{ScanStats, Scanner};
pub use snapshot::ScanSnapshot;
