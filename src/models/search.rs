use serde::Serialize;

/// A single search match, as handed to rendering collaborators
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    /// `yyyy-mm-dd`
    pub date: String,
    /// `yyyy/mm/dd`
    pub path: String,
    pub file: String,
    pub line: usize,
    pub role: String,
    pub preview: String,
}
