//! Public and internal types for the sweep engine.

use chrono::{DateTime, Local};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::utils::config::SweepConsts;

/// A plain substring searched for in file names. Case-sensitive; no wildcards.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Pattern(Arc<str>);

impl Pattern {
    pub fn new(s: impl AsRef<str>) -> Self {
        Pattern(Arc::from(s.as_ref()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Pattern {
    fn from(s: &str) -> Self {
        Pattern::new(s)
    }
}

impl From<String> for Pattern {
    fn from(s: String) -> Self {
        Pattern(Arc::from(s))
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One walk: the root to start from and the single pattern to look for.
#[derive(Clone, Debug)]
pub struct SearchTask {
    pub root: PathBuf,
    pub pattern: Pattern,
}

/// A file whose name contains the pattern. Produced once, then handed to the sink.
#[derive(Clone, Debug)]
pub struct Match {
    pub timestamp: DateTime<Local>,
    /// Root joined with every component down to the file (not canonicalized past the root).
    pub path: PathBuf,
    pub pattern: Pattern,
}

/// Log line layout: `YYYY-MM-DD HH:MM:SS | /abs/path | pattern`.
impl fmt::Display for Match {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} | {}",
            self.timestamp.format("%F %T"),
            self.path.display(),
            self.pattern
        )
    }
}

/// Last control signal delivered to the process.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(usize)]
pub enum Signal {
    None = 0,
    /// SIGUSR1: cut the current sweep short and start the next one without pausing.
    AbortSweep = 1,
    /// SIGUSR2: relayed to workers and ends collection early; the loop keeps going.
    Terminate = 2,
}

impl Signal {
    pub fn from_raw(raw: usize) -> Signal {
        match raw {
            1 => Signal::AbortSweep,
            2 => Signal::Terminate,
            _ => Signal::None,
        }
    }
}

/// Where match records go. The daemon logs them; tests collect them.
pub type MatchSink = Arc<dyn Fn(&Match) + Send + Sync>;

/// Options for the sweep loop (built from the CLI, or by a lib caller).
#[derive(Clone, Debug)]
pub struct SweepOpts {
    /// Tree every worker walks. Must be absolute so match paths are absolute.
    pub root: PathBuf,
    /// One worker per pattern per sweep.
    pub patterns: Vec<Pattern>,
    /// Pause between sweeps (skipped while AbortSweep is latched).
    pub interval: Duration,
    /// Log unreadable paths, received signals and sleep/wake events.
    pub verbose: bool,
    /// Reset the signal state to None at the start of every sweep.
    pub rearm: bool,
}

impl Default for SweepOpts {
    fn default() -> Self {
        Self {
            root: PathBuf::from(SweepConsts::DEFAULT_ROOT),
            patterns: Vec::new(),
            interval: Duration::from_secs(SweepConsts::DEFAULT_INTERVAL_SECS),
            verbose: false,
            rearm: false,
        }
    }
}

impl SweepOpts {
    /// One task per pattern, all rooted at [`Self::root`].
    pub fn tasks(&self) -> Vec<SearchTask> {
        self.patterns
            .iter()
            .map(|pattern| SearchTask {
                root: self.root.clone(),
                pattern: pattern.clone(),
            })
            .collect()
    }
}
