use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Error, Result};
use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use rayon::prelude::*;
use tracing::{debug, info, warn};

use super::loader::{FileLoader, SessionLoader};
use super::preview::{make_preview, match_span};
use crate::indexer::{ScanSnapshot, Scanner};
use crate::models::{SearchResult, SessionFile};
use crate::parsers::ParseOptions;

/// Result count used when the caller asks for zero
pub const DEFAULT_LIMIT: usize = 50;

/// Upper bound on results for a single query
pub const MAX_LIMIT: usize = 200;

#[derive(Debug)]
struct SearchEntry {
    line: usize,
    role: String,
    content: String,
    lower: String,
}

/// Searchable entries of one file, with the labels every match reports
#[derive(Debug)]
struct FileEntries {
    date: String,
    path: String,
    file: String,
    entries: Vec<SearchEntry>,
}

#[derive(Debug, Clone)]
struct CachedFile {
    size: u64,
    modified: DateTime<Utc>,
    entries: Arc<FileEntries>,
}

impl CachedFile {
    fn matches(&self, file: &SessionFile) -> bool {
        self.size == file.size && self.modified == file.modified
    }
}

#[derive(Debug, Default)]
struct SearchSnapshot {
    files: HashMap<PathBuf, CachedFile>,
    /// Canonical browse order of the scan the snapshot was built from
    ordered: Vec<Arc<FileEntries>>,
    entry_count: usize,
}

/// A file that could not be re-parsed during a refresh
#[derive(Debug)]
pub struct FileFailure {
    pub path: PathBuf,
    pub error: Error,
}

/// Outcome of a search refresh
#[derive(Debug, Default)]
pub struct RefreshStats {
    pub files: usize,
    pub reused: usize,
    pub reparsed: usize,
    pub entries: usize,
    pub failures: Vec<FileFailure>,
}

/// Case-insensitive substring index over message content
///
/// Files whose size and modification time are unchanged since the last refresh
/// keep their cached entries without being re-parsed. Like the [`Scanner`], the
/// index publishes each refresh as one immutable snapshot, so a query never sees a
/// half-applied refresh.
pub struct SearchIndex<L = FileLoader> {
    loader: L,
    snapshot: RwLock<Arc<SearchSnapshot>>,
    refresh_lock: Mutex<()>,
}

impl SearchIndex<FileLoader> {
    pub fn new(options: ParseOptions) -> Self {
        Self::with_loader(FileLoader::new(options))
    }
}

impl Default for SearchIndex<FileLoader> {
    fn default() -> Self {
        Self::new(ParseOptions::default())
    }
}

impl<L: SessionLoader> SearchIndex<L> {
    pub fn with_loader(loader: L) -> Self {
        Self {
            loader,
            snapshot: RwLock::new(Arc::new(SearchSnapshot::default())),
            refresh_lock: Mutex::new(()),
        }
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    /// Bring the index up to date with the scanner's current view
    ///
    /// # Errors
    ///
    /// Returns the first file failure after the whole pass has completed and the new
    /// snapshot is published. Failed files keep their previously cached entries.
    pub fn refresh_from(&self, scanner: &Scanner) -> Result<RefreshStats> {
        let scan = scanner.snapshot();
        let mut stats = self.refresh_from_snapshot(&scan);
        if stats.failures.is_empty() {
            return Ok(stats);
        }
        let first = stats.failures.remove(0);
        Err(first.error.context(format!(
            "Failed to index {} session file(s)",
            stats.failures.len() + 1
        )))
    }

    /// Refresh against a specific scan snapshot, collecting failures instead of
    /// returning them
    pub fn refresh_from_snapshot(&self, scan: &ScanSnapshot) -> RefreshStats {
        let _guard = self.refresh_lock.lock();
        let existing = self.snapshot.read().clone();

        let mut next: HashMap<PathBuf, CachedFile> = HashMap::with_capacity(scan.len());
        let mut to_parse: Vec<&SessionFile> = Vec::new();
        for file in scan.files() {
            match existing.files.get(&file.path) {
                Some(cached) if cached.matches(file) => {
                    next.insert(file.path.clone(), cached.clone());
                }
                _ => to_parse.push(file),
            }
        }
        let reused = next.len();

        let parsed: Vec<(&SessionFile, Result<FileEntries>)> =
            to_parse.into_par_iter().map(|file| (file, self.build_entries(file))).collect();

        let mut reparsed = 0;
        let mut failures = Vec::new();
        for (file, result) in parsed {
            match result {
                Ok(entries) => {
                    reparsed += 1;
                    next.insert(
                        file.path.clone(),
                        CachedFile {
                            size: file.size,
                            modified: file.modified,
                            entries: Arc::new(entries),
                        },
                    );
                }
                Err(error) => {
                    warn!(path = %file.path.display(), error = %error, "failed to index session");
                    if let Some(previous) = existing.files.get(&file.path) {
                        next.insert(file.path.clone(), previous.clone());
                    }
                    failures.push(FileFailure { path: file.path.clone(), error });
                }
            }
        }

        let ordered: Vec<Arc<FileEntries>> = scan
            .files()
            .filter_map(|file| next.get(&file.path).map(|cached| Arc::clone(&cached.entries)))
            .collect();
        let entry_count = ordered.iter().map(|file| file.entries.len()).sum();

        let stats = RefreshStats {
            files: next.len(),
            reused,
            reparsed,
            entries: entry_count,
            failures,
        };

        *self.snapshot.write() = Arc::new(SearchSnapshot { files: next, ordered, entry_count });

        info!(
            files = stats.files,
            reused = stats.reused,
            reparsed = stats.reparsed,
            entries = stats.entries,
            failures = stats.failures.len(),
            "search index refreshed"
        );
        stats
    }

    /// Find entries containing `query`, ignoring case
    ///
    /// Results follow browse order (newest date first, then file order, then line)
    /// and stop at `limit`. A `limit` of zero means [`DEFAULT_LIMIT`]; anything above
    /// [`MAX_LIMIT`] is clamped. A blank query matches nothing.
    pub fn search(&self, query: &str, limit: usize) -> Vec<SearchResult> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }
        let limit = effective_limit(limit);
        let needle = query.to_lowercase();

        let snapshot = self.snapshot.read().clone();
        let mut results = Vec::with_capacity(limit.min(snapshot.entry_count));

        'files: for file in &snapshot.ordered {
            for entry in &file.entries {
                let Some(byte_at) = entry.lower.find(&needle) else {
                    continue;
                };
                let preview = match match_span(&entry.content, byte_at, needle.len()) {
                    Some((at, len)) => make_preview(&entry.content, Some(at), len),
                    None => make_preview(&entry.content, None, 0),
                };
                results.push(SearchResult {
                    date: file.date.clone(),
                    path: file.path.clone(),
                    file: file.file.clone(),
                    line: entry.line,
                    role: entry.role.clone(),
                    preview,
                });
                if results.len() >= limit {
                    break 'files;
                }
            }
        }

        debug!(query, results = results.len(), "search completed");
        results
    }

    /// Number of searchable entries
    pub fn len(&self) -> usize {
        self.snapshot.read().entry_count
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of files with cached entries
    pub fn file_count(&self) -> usize {
        self.snapshot.read().files.len()
    }

    fn build_entries(&self, file: &SessionFile) -> Result<FileEntries> {
        let session = self.loader.load(&file.path)?;
        let entries = session
            .entries
            .into_iter()
            .filter_map(|entry| {
                let content = entry.content.trim();
                if content.is_empty() {
                    return None;
                }
                Some(SearchEntry {
                    line: entry.line,
                    role: entry.role,
                    lower: content.to_lowercase(),
                    content: content.to_string(),
                })
            })
            .collect();

        Ok(FileEntries {
            date: file.date.to_string(),
            path: file.date.path(),
            file: file.name.clone(),
            entries,
        })
    }
}

fn effective_limit(limit: usize) -> usize {
    match limit {
        0 => DEFAULT_LIMIT,
        n => n.min(MAX_LIMIT),
    }
}
