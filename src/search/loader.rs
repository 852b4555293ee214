use std::path::Path;

use anyhow::Result;

use crate::models::Session;
use crate::parsers::{ParseOptions, parse_session_file};

/// Source of parsed sessions for the search index
///
/// The index calls this for every new or changed file, possibly from several
/// threads at once.
pub trait SessionLoader: Send + Sync {
    fn load(&self, path: &Path) -> Result<Session>;
}

/// Loads sessions from disk with the full parser
#[derive(Debug, Clone, Copy, Default)]
pub struct FileLoader {
    options: ParseOptions,
}

impl FileLoader {
    pub fn new(options: ParseOptions) -> Self {
        Self { options }
    }
}

impl SessionLoader for FileLoader {
    fn load(&self, path: &Path) -> Result<Session> {
        parse_session_file(path, self.options)
    }
}
