use std::env;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Result, bail};

use crate::parsers::ParseOptions;
use crate::utils::{default_sessions_dir, expand_home};

/// Environment variable that overrides the default sessions directory
pub const SESSIONS_DIR_ENV: &str = "CODEX_SESSIONS_DIR";

/// Default delay between background rescans
pub const DEFAULT_RESCAN_INTERVAL: Duration = Duration::from_secs(120);

/// Runtime settings, fixed at boot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub sessions_dir: PathBuf,
    pub rescan_interval: Duration,
    pub trim_user_request: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sessions_dir: default_sessions_dir().unwrap_or_default(),
            rescan_interval: DEFAULT_RESCAN_INTERVAL,
            trim_user_request: true,
        }
    }
}

impl Config {
    /// Build the configuration from command-line values
    ///
    /// An explicit `sessions_dir` wins over [`SESSIONS_DIR_ENV`], which wins over
    /// `~/.codex/sessions`. A leading `~` is expanded. `full` turns off user-request
    /// trimming.
    pub fn resolve(sessions_dir: Option<&str>, full: bool) -> Result<Self> {
        let mut cfg = Self::default();
        let requested =
            sessions_dir.map(str::to_string).or_else(|| env::var(SESSIONS_DIR_ENV).ok());
        if let Some(dir) = requested {
            cfg.sessions_dir = expand_home(&dir)?;
        }
        cfg.trim_user_request = !full;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn with_rescan_interval(mut self, interval: Duration) -> Result<Self> {
        self.rescan_interval = interval;
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sessions_dir.as_os_str().is_empty() {
            bail!("Sessions directory cannot be empty");
        }
        if self.rescan_interval.is_zero() {
            bail!("Rescan interval must be positive");
        }
        Ok(())
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions { trim_user_request: self.trim_user_request }
    }
}
