use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use rayon::prelude::*;
use tracing::{debug, info};
use walkdir::WalkDir;

use super::snapshot::ScanSnapshot;
use crate::models::{DateKey, SessionFile, SessionMeta, normalize_cwd};
use crate::parsers::parse_session_meta;
use crate::utils::split_session_path;

/// `<root>/<yyyy>/<mm>/<dd>/<file>`
const SESSION_PATH_DEPTH: usize = 4;

/// Summary of one successful scanner refresh
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanStats {
    pub files: usize,
    pub dates: usize,
    pub without_header: usize,
}

/// A file that passed path validation, before its header is read
struct Candidate {
    date: DateKey,
    name: String,
    path: PathBuf,
    size: u64,
    modified: DateTime<Utc>,
}

impl Candidate {
    /// Header failures are tolerated: the file is still indexed, just without a header
    fn into_session_file(self) -> SessionFile {
        let meta = match parse_session_meta(&self.path) {
            Ok(meta) => meta,
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "session header unreadable");
                None
            }
        };
        SessionFile {
            date: self.date,
            name: self.name,
            path: self.path,
            size: self.size,
            modified: self.modified,
            meta,
        }
    }
}

/// Keeps a browsable snapshot of the session files under a root directory
///
/// [`Scanner::refresh`] builds a complete new [`ScanSnapshot`] off to the side and
/// publishes it with a single swap. Readers clone the current `Arc` under a short
/// shared lock and copy results out of it, so they see either the old or the new
/// snapshot in full, never a mix.
pub struct Scanner {
    root: PathBuf,
    snapshot: RwLock<Arc<ScanSnapshot>>,
}

impl Scanner {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into(), snapshot: RwLock::new(Arc::new(ScanSnapshot::default())) }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Rescan the sessions directory
    ///
    /// # Errors
    ///
    /// Returns an error if the root is unset or cannot be read, or if any I/O error
    /// occurs while walking the tree. On error the previous snapshot stays published.
    /// Files with unexpected paths are skipped silently.
    pub fn refresh(&self) -> Result<ScanStats> {
        if self.root.as_os_str().is_empty() {
            bail!("Sessions directory is not set");
        }
        let metadata = fs::metadata(&self.root).with_context(|| {
            format!("Failed to read sessions directory: {}", self.root.display())
        })?;
        if !metadata.is_dir() {
            bail!("Sessions path is not a directory: {}", self.root.display());
        }

        let candidates = collect_candidates(&self.root)?;
        let files: Vec<SessionFile> =
            candidates.into_par_iter().map(Candidate::into_session_file).collect();

        let snapshot = ScanSnapshot::build(files, Utc::now());
        let stats = ScanStats {
            files: snapshot.len(),
            dates: snapshot.dates().len(),
            without_header: snapshot.files().filter(|f| f.meta.is_none()).count(),
        };

        *self.snapshot.write() = Arc::new(snapshot);

        info!(
            root = %self.root.display(),
            files = stats.files,
            dates = stats.dates,
            without_header = stats.without_header,
            "sessions scanned"
        );
        Ok(stats)
    }

    /// The current snapshot; stays valid and unchanged even if a refresh replaces it
    pub fn snapshot(&self) -> Arc<ScanSnapshot> {
        self.snapshot.read().clone()
    }

    /// Time of the last successful refresh
    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        self.snapshot().updated()
    }

    /// All indexed dates, newest first
    pub fn dates(&self) -> Vec<DateKey> {
        self.snapshot().dates().to_vec()
    }

    pub fn sessions_by_date(&self, date: &DateKey) -> Vec<SessionFile> {
        self.snapshot().sessions_by_date(date).to_vec()
    }

    /// Files for a working directory; blank input selects the unknown bucket
    pub fn sessions_by_working_directory(&self, cwd: &str) -> Vec<SessionFile> {
        self.snapshot().sessions_by_cwd(normalize_cwd(cwd)).to_vec()
    }

    pub fn lookup(&self, date: &DateKey, name: &str) -> Option<SessionFile> {
        self.snapshot().lookup(date, name).cloned()
    }

    pub fn working_directories(&self) -> Vec<String> {
        self.snapshot().working_directories()
    }

    /// File counts per working directory, sorted with the unknown bucket last
    pub fn working_directory_counts(&self) -> Vec<(String, usize)> {
        self.snapshot().working_directory_counts()
    }

    /// Per-directory counts of files modified at or after `since`, with the largest count
    pub fn recent_working_directory_counts(
        &self,
        since: DateTime<Utc>,
    ) -> (HashMap<String, usize>, usize) {
        let snapshot = self.snapshot();
        count_by_cwd(snapshot.files().filter(|file| file.modified >= since))
    }

    /// Per-directory counts over the newest `limit` dates, with the largest count
    pub fn working_directory_counts_for_latest_dates(
        &self,
        limit: usize,
    ) -> (HashMap<String, usize>, usize) {
        let snapshot = self.snapshot();
        count_by_cwd(
            snapshot
                .dates()
                .iter()
                .take(limit)
                .flat_map(|date| snapshot.sessions_by_date(date).iter()),
        )
    }

    /// Header of a file in the current snapshot
    pub fn meta_for(&self, date: &DateKey, name: &str) -> Option<SessionMeta> {
        self.snapshot().lookup(date, name).and_then(|file| file.meta.clone())
    }
}

fn count_by_cwd<'a>(
    files: impl Iterator<Item = &'a SessionFile>,
) -> (HashMap<String, usize>, usize) {
    let mut counts: HashMap<String, usize> = HashMap::new();
    let mut max = 0;
    for file in files {
        let count = counts.entry(file.cwd_key().to_string()).or_default();
        *count += 1;
        max = max.max(*count);
    }
    (counts, max)
}

/// Walk the tree and stat every file that sits at `yyyy/mm/dd/<name>.jsonl`
///
/// Any walk or stat error aborts the whole scan.
fn collect_candidates(root: &Path) -> Result<Vec<Candidate>> {
    let mut candidates = Vec::new();

    for entry in WalkDir::new(root).min_depth(1).max_depth(SESSION_PATH_DEPTH) {
        let entry = entry
            .with_context(|| format!("Failed to walk sessions directory: {}", root.display()))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let Some((date, name)) = split_session_path(root, entry.path()) else {
            continue;
        };

        let metadata = entry
            .metadata()
            .with_context(|| format!("Failed to stat session file: {}", entry.path().display()))?;
        let modified = metadata.modified().with_context(|| {
            format!("Failed to read modification time: {}", entry.path().display())
        })?;

        candidates.push(Candidate {
            date,
            name,
            path: entry.into_path(),
            size: metadata.len(),
            modified: DateTime::<Utc>::from(modified),
        });
    }

    Ok(candidates)
}
