//! Periodic background refresh of the scanner and search index

use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, info, warn};

use crate::indexer::{ScanStats, Scanner};
use crate::search::{RefreshStats, SearchIndex, SessionLoader};

/// What one refresh cycle achieved
#[derive(Debug, Default)]
pub struct CycleReport {
    /// `None` when the directory scan failed
    pub scan: Option<ScanStats>,
    /// `None` when the search refresh was skipped
    pub search: Option<RefreshStats>,
}

/// Run one refresh cycle: rescan the directory, then update the search index
///
/// A failed scan skips the search refresh, since the published scan snapshot did
/// not change. Failures are logged; per-file search failures end up in the
/// returned stats.
pub fn refresh_all<L: SessionLoader>(scanner: &Scanner, search: &SearchIndex<L>) -> CycleReport {
    let scan = match scanner.refresh() {
        Ok(stats) => stats,
        Err(err) => {
            warn!(root = %scanner.root().display(), error = %format!("{err:#}"), "rescan failed");
            return CycleReport::default();
        }
    };

    let stats = search.refresh_from_snapshot(&scanner.snapshot());
    if let Some(first) = stats.failures.first() {
        warn!(
            path = %first.path.display(),
            failures = stats.failures.len(),
            "search reindex incomplete"
        );
    }
    CycleReport { scan: Some(scan), search: Some(stats) }
}

/// Handle to the background refresh thread
///
/// Each cycle runs [`refresh_all`], so scanner and search refreshes never overlap.
/// The thread stops when [`Refresher::stop`] is called or the handle is dropped.
pub struct Refresher {
    stop_tx: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Refresher {
    pub fn spawn<L>(
        scanner: Arc<Scanner>,
        search: Arc<SearchIndex<L>>,
        interval: Duration,
    ) -> Result<Self>
    where
        L: SessionLoader + 'static,
    {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let handle = thread::Builder::new()
            .name("session-refresher".to_string())
            .spawn(move || {
                info!(interval_secs = interval.as_secs_f64(), "refresher started");
                loop {
                    match stop_rx.recv_timeout(interval) {
                        Err(RecvTimeoutError::Timeout) => {
                            let report = refresh_all(&scanner, &search);
                            debug!(
                                scanned = report.scan.is_some(),
                                files = report.scan.map(|s| s.files).unwrap_or_default(),
                                "refresh cycle finished"
                            );
                        }
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                info!("refresher stopped");
            })
            .context("Failed to spawn refresher thread")?;

        Ok(Self { stop_tx: Some(stop_tx), handle: Some(handle) })
    }

    /// Signal the thread and wait for any in-flight cycle to finish
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take()
            && handle.join().is_err()
        {
            warn!("refresher thread panicked");
        }
    }
}

impl Drop for Refresher {
    fn drop(&mut self) {
        self.shutdown();
    }
}
