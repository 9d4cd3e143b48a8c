//! Directory walker: depth-first from a task root, matching leaf names against one pattern.
//! Checks the cancel token once per entry; skips whatever it cannot read.

use chrono::Local;
use log::{debug, warn};
use walkdir::WalkDir;

use crate::engine::matcher::name_matches;
use crate::engine::tools::is_traversable;
use crate::{Match, SearchTask};

use super::context::CancelToken;

/// How a walk ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WalkOutcome {
    Completed,
    /// Stopped early because the cancel token fired.
    Aborted,
    /// Never started: the worker saw AbortSweep or Terminate already set.
    Skipped,
}

/// Per-walk counters, for debug logging.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct WalkStats {
    pub visited: usize,
    pub matched: usize,
    pub skipped: usize,
}

/// Walk `task.root` and call `on_match` for every non-directory entry whose name contains
/// `task.pattern`.
///
/// - Symlinks are followed (stat semantics); loops are skipped like unreadable entries.
/// - A directory is entered only if it passes `access(R_OK | X_OK)`; others are skipped silently.
/// - Entries whose metadata or listing fails are skipped, with a warning when `verbose`.
/// - Directory names are never matched.
///
/// Directory handles are owned by the iterator and closed on every return path.
pub fn walk<F>(
    task: &SearchTask,
    verbose: bool,
    cancel: &CancelToken,
    mut on_match: F,
) -> (WalkOutcome, WalkStats)
where
    F: FnMut(&Match),
{
    let mut stats = WalkStats::default();
    let iter = WalkDir::new(&task.root)
        .follow_links(true)
        .into_iter()
        .filter_entry(|e| {
            e.depth() == 0 || !e.file_type().is_dir() || is_traversable(e.path())
        });

    for entry_result in iter {
        if cancel.is_cancelled() {
            debug!(
                "Walk for {:?} aborted after {} entries",
                task.pattern.as_str(),
                stats.visited
            );
            return (WalkOutcome::Aborted, stats);
        }
        let entry = match entry_result {
            Ok(entry) => entry,
            Err(err) => {
                stats.skipped += 1;
                if verbose {
                    log_skipped(&err);
                }
                continue;
            }
        };
        if entry.depth() == 0 {
            if !entry.file_type().is_dir() {
                if verbose {
                    warn!("Skipping unreadable directory: {}", entry.path().display());
                }
                stats.skipped += 1;
                return (WalkOutcome::Completed, stats);
            }
            continue;
        }
        stats.visited += 1;
        if entry.file_type().is_dir() {
            continue;
        }
        if name_matches(entry.file_name(), &task.pattern) {
            stats.matched += 1;
            let found = Match {
                timestamp: Local::now(),
                path: entry.into_path(),
                pattern: task.pattern.clone(),
            };
            on_match(&found);
        }
    }
    (WalkOutcome::Completed, stats)
}

fn log_skipped(err: &walkdir::Error) {
    let Some(path) = err.path() else {
        warn!("Skipping unreadable entry: {}", err);
        return;
    };
    if err.loop_ancestor().is_some() {
        warn!("Skipping symlink loop: {}", path.display());
    } else if path.is_dir() {
        warn!("Skipping unreadable directory: {}", path.display());
    } else {
        warn!("Skipping unreadable file: {}", path.display());
    }
}
