// File watcher - polls the watched paths and posts restart triggers

use crate::config::WatchConfig;
use crate::trigger::TriggerSender;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::{debug, warn};

/// Polling file watcher.
///
/// Scans the configured directories on a fixed interval and posts a
/// restart trigger whenever the set of files or any modification time
/// differs from the previous scan. One trigger is also posted at startup
/// so the command runs immediately.
pub struct FileWatcher {
    paths: Vec<PathBuf>,
    extensions: Vec<String>,
    ignore_dirs: Vec<String>,
    interval: Duration,
    mtimes: HashMap<PathBuf, SystemTime>,
}

impl FileWatcher {
    pub fn new(config: &WatchConfig) -> Self {
        Self {
            paths: config.watch_paths.clone(),
            extensions: config.watch_extensions.clone(),
            ignore_dirs: config.ignore_dirs.clone(),
            interval: Duration::from_millis(config.poll_interval_ms),
            mtimes: HashMap::new(),
        }
    }

    /// Watch until the task is dropped or aborted.
    ///
    /// The trigger sender is owned by this task; ending the watcher
    /// closes the trigger channel and thereby shuts the supervisor down.
    pub async fn run(mut self, trigger: TriggerSender) {
        self.mtimes = self.scan();
        debug!(files = self.mtimes.len(), "watcher baseline established");

        // Run the command once at startup
        trigger.trigger();

        let mut interval = tokio::time::interval(self.interval);
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            interval.tick().await;
            if self.poll() {
                debug!("change detected");
                trigger.trigger();
            }
        }
    }

    /// Rescan and report whether anything changed since the last scan
    pub fn poll(&mut self) -> bool {
        let seen = self.scan();
        let changed = seen != self.mtimes;
        self.mtimes = seen;
        changed
    }

    fn scan(&self) -> HashMap<PathBuf, SystemTime> {
        let mut seen = HashMap::new();

        for root in &self.paths {
            let mut stack = vec![root.clone()];
            while let Some(dir) = stack.pop() {
                let entries = match std::fs::read_dir(&dir) {
                    Ok(entries) => entries,
                    Err(e) => {
                        warn!(path = %dir.display(), error = %e, "failed to read directory");
                        continue;
                    }
                };

                for entry in entries.flatten() {
                    let path = entry.path();
                    let metadata = match entry.metadata() {
                        Ok(metadata) => metadata,
                        Err(_) => continue,
                    };

                    if metadata.is_dir() {
                        if !self.is_ignored(&path) {
                            stack.push(path);
                        }
                    } else if self.matches(&path) {
                        if let Ok(mtime) = metadata.modified() {
                            seen.insert(path, mtime);
                        }
                    }
                }
            }
        }

        seen
    }

    fn is_ignored(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|name| name.to_str())
            .map(|name| self.ignore_dirs.iter().any(|d| d == name))
            .unwrap_or(false)
    }

    /// Whether a file participates in change detection
    pub fn matches(&self, path: &Path) -> bool {
        if self.extensions.is_empty() {
            return true;
        }

        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| self.extensions.iter().any(|e| e == ext))
            .unwrap_or(false)
    }
}
