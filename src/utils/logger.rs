use anyhow::{Context, anyhow};
use colored::Colorize;
use env_logger::{Builder, Target};
use log::{Level, LevelFilter, Record, warn};
use std::io::Write;
use syslog::{BasicLogger, Facility, Formatter3164};

/// Where log records go.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogTarget {
    /// env_logger on stderr. Colored in the foreground; plain when stderr is the log file.
    Stderr { color: bool },
    /// The local syslog daemon, facility `daemon`, tagged with the package name and pid.
    Syslog,
}

/// Install the global logger. `verbose` raises this crate to debug.
///
/// If syslog cannot be reached, falls back to plain stderr (the daemon's log file).
pub fn setup_logging(verbose: bool, target: LogTarget) {
    let level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    match target {
        LogTarget::Stderr { color } => setup_stderr(level, color),
        LogTarget::Syslog => {
            if let Err(e) = setup_syslog(level) {
                setup_stderr(level, false);
                warn!("Syslog unavailable, logging to stderr: {:#}", e);
            }
        }
    }
}

fn setup_stderr(level: LevelFilter, color: bool) {
    colored::control::set_override(color);

    let _ = Builder::from_default_env()
        .filter_level(LevelFilter::Warn) // Default: only warnings from dependencies
        .filter_module(env!("CARGO_PKG_NAME"), level) // Our crate: use requested level
        .target(Target::Stderr)
        .format(|buf, record| {
            let name = env!("CARGO_PKG_NAME");
            let line = match record.level() {
                Level::Info => format!("[{}] {}", name.cyan(), record.args()),
                lvl => {
                    let level_str = match lvl {
                        Level::Error => "ERROR".red(),
                        Level::Warn => "WARN".yellow(),
                        Level::Debug => "DEBUG".blue(),
                        _ => "TRACE".normal(),
                    };
                    let tag = origin(record).white();
                    format!("[{} {} {}] {}", name.cyan(), level_str, tag, record.args())
                }
            };
            writeln!(buf, "{}", line)
        })
        .try_init();
}

/// Worker thread name (`fsweep-worker-<sweep>.<worker>`) when logged from a worker, else the
/// record's module path.
fn origin(record: &Record<'_>) -> String {
    match std::thread::current().name() {
        Some(name) if name != "main" => name.to_string(),
        _ => record.target().to_string(),
    }
}

/// Call after detaching so the pid in each line is the daemon's.
fn setup_syslog(level: LevelFilter) -> anyhow::Result<()> {
    let formatter = Formatter3164 {
        facility: Facility::LOG_DAEMON,
        hostname: None,
        process: env!("CARGO_PKG_NAME").to_string(),
        pid: std::process::id(),
    };
    let logger = syslog::unix(formatter)
        .map_err(|e| anyhow!("connect to syslog: {}", e))?;
    log::set_boxed_logger(Box::new(BasicLogger::new(logger)))
        .context("install syslog logger")?;
    log::set_max_level(level);
    Ok(())
}
