use clap::Parser;
use std::path::PathBuf;

use crate::utils::LogTarget;
use crate::utils::config::{PackagePaths, SweepConsts};

/// Background file-name sweeper.
#[derive(Clone, Debug, Parser)]
#[command(name = "fsweep", version)]
#[command(
    about = "Sweep a tree on an interval and log every file whose name contains a pattern.",
    after_help = "Signals: SIGUSR1 aborts the current sweep, SIGUSR2 ends its collection early, \
                  SIGINT/SIGTERM/SIGHUP shut down."
)]
pub struct Cli {
    /// Substrings to look for in file names. One worker per pattern per sweep.
    #[arg(value_name = "PATTERN", required = true, num_args = 1..)]
    pub patterns: Vec<String>,

    /// Log unreadable paths, received signals and sleep/wake events.
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Pause between sweeps, in whole seconds.
    #[arg(
        short = 't',
        long = "interval",
        value_name = "SECONDS",
        default_value_t = SweepConsts::DEFAULT_INTERVAL_SECS
    )]
    pub interval: u64,

    /// Tree to sweep.
    #[arg(short = 'r', long, value_name = "DIR", default_value = SweepConsts::DEFAULT_ROOT)]
    pub root: PathBuf,

    /// Stay attached to the terminal and log to stderr.
    #[arg(long)]
    pub foreground: bool,

    /// Log to this file once detached instead of syslog. Syslog fallback: `<tmp>/fsweep.log`.
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Write the daemon's pid here once detached.
    #[arg(long, value_name = "PATH")]
    pub pid_file: Option<PathBuf>,

    /// Reset the signal state at the start of every sweep instead of latching it.
    #[arg(long)]
    pub rearm: bool,
}

impl Cli {
    /// Log path for the detached daemon, defaulting to the package log file in the temp dir.
    pub fn log_path(&self) -> PathBuf {
        self.log_file
            .clone()
            .unwrap_or_else(|| PackagePaths::get().default_log_path())
    }

    /// Stderr in the foreground; once detached, the explicit log file if one was given,
    /// else syslog.
    pub fn log_target(&self) -> LogTarget {
        if self.foreground {
            LogTarget::Stderr { color: true }
        } else if self.log_file.is_some() {
            LogTarget::Stderr { color: false }
        } else {
            LogTarget::Syslog
        }
    }
}
