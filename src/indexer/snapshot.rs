use std::cmp::Ordering;
use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::models::{DateKey, SessionFile, UNKNOWN_CWD};

/// Immutable result of one directory walk
///
/// All three views are derived from the same file list, so they always agree. A
/// snapshot is never modified after construction; the scanner replaces it whole.
#[derive(Debug, Default)]
pub struct ScanSnapshot {
    dates: Vec<DateKey>,
    by_date: HashMap<DateKey, Vec<SessionFile>>,
    by_name: HashMap<String, SessionFile>,
    by_cwd: HashMap<String, Vec<SessionFile>>,
    updated: Option<DateTime<Utc>>,
}

impl ScanSnapshot {
    pub fn build(files: Vec<SessionFile>, updated: DateTime<Utc>) -> Self {
        let mut by_date: HashMap<DateKey, Vec<SessionFile>> = HashMap::new();
        let mut by_name = HashMap::with_capacity(files.len());
        let mut by_cwd: HashMap<String, Vec<SessionFile>> = HashMap::new();

        for file in files {
            by_name.insert(name_key(&file.date, &file.name), file.clone());
            by_cwd.entry(file.cwd_key().to_string()).or_default().push(file.clone());
            by_date.entry(file.date.clone()).or_default().push(file);
        }

        for files in by_date.values_mut().chain(by_cwd.values_mut()) {
            files.sort_by(newest_first);
        }

        let mut dates: Vec<DateKey> = by_date.keys().cloned().collect();
        dates.sort_by(|a, b| b.cmp(a));

        Self { dates, by_date, by_name, by_cwd, updated: Some(updated) }
    }

    /// Dates, newest first
    pub fn dates(&self) -> &[DateKey] {
        &self.dates
    }

    pub fn sessions_by_date(&self, date: &DateKey) -> &[SessionFile] {
        self.by_date.get(date).map(Vec::as_slice).unwrap_or_default()
    }

    /// `cwd` must already be normalized
    pub fn sessions_by_cwd(&self, cwd: &str) -> &[SessionFile] {
        self.by_cwd.get(cwd).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn lookup(&self, date: &DateKey, name: &str) -> Option<&SessionFile> {
        self.by_name.get(&name_key(date, name))
    }

    /// Every file in canonical browse order: dates newest first, then each date's order
    pub fn files(&self) -> impl Iterator<Item = &SessionFile> {
        self.dates.iter().flat_map(|date| self.sessions_by_date(date).iter())
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    pub fn updated(&self) -> Option<DateTime<Utc>> {
        self.updated
    }

    /// Directory keys in display order, [`UNKNOWN_CWD`] last
    pub fn working_directories(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.by_cwd.keys().cloned().collect();
        keys.sort_by(|a, b| cwd_order(a, b));
        keys
    }

    pub fn working_directory_counts(&self) -> Vec<(String, usize)> {
        self.working_directories()
            .into_iter()
            .map(|key| {
                let count = self.by_cwd[&key].len();
                (key, count)
            })
            .collect()
    }
}

fn name_key(date: &DateKey, name: &str) -> String {
    format!("{}/{}", date.path(), name)
}

/// Modification time descending, file name ascending on ties
pub fn newest_first(a: &SessionFile, b: &SessionFile) -> Ordering {
    b.modified.cmp(&a.modified).then_with(|| a.name.cmp(&b.name))
}

/// Lexicographic, except the unknown sentinel always sorts last
pub fn cwd_order(a: &str, b: &str) -> Ordering {
    match (a == UNKNOWN_CWD, b == UNKNOWN_CWD) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => a.cmp(b),
    }
}
