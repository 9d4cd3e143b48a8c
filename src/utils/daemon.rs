//! Detach from the controlling terminal (Unix).

use anyhow::{Context, Result};
use daemonize::Daemonize;
use std::fs::OpenOptions;
use std::path::Path;

/// Fork into the background: the invoking process exits 0, the child becomes a session
/// leader with cwd `/`, umask 0, stdin on /dev/null and stdout/stderr appended to `log_path`.
/// Log records only land there when logging goes to stderr; panics always do.
/// Returns only in the detached child.
///
/// Must run before any thread is spawned or signal handler installed; neither survives the fork.
pub fn detach(log_path: &Path, pid_file: Option<&Path>) -> Result<()> {
    let open_log = || {
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_path)
            .with_context(|| format!("open log file {}", log_path.display()))
    };
    let out = open_log()?;
    let err = open_log()?;

    let umask: libc::mode_t = 0;
    let mut daemon = Daemonize::new()
        .working_directory("/")
        .umask(umask)
        .stdout(out)
        .stderr(err);
    if let Some(pid) = pid_file {
        // cwd changes to `/` before the pid file is written.
        let pid = std::path::absolute(pid)
            .with_context(|| format!("resolve pid file path {}", pid.display()))?;
        daemon = daemon.pid_file(pid);
    }
    daemon.start().context("detach into background")?;
    Ok(())
}
