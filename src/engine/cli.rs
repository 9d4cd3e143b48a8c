//! CLI command handler: validate, detach unless --foreground, then sweep until shut down.

use anyhow::Result;
use log::debug;
use std::time::Duration;

use crate::engine::arg_parser::Cli;
use crate::engine::tools::{canonicalize_root, running_as_root};
use crate::utils::{detach, setup_logging};
use crate::{Pattern, SweepOpts};

/// Validate the command line into sweep options. Fails on a root that is not a directory.
pub fn setup_opts(cli: &Cli) -> Result<SweepOpts> {
    Ok(SweepOpts {
        root: canonicalize_root(&cli.root)?,
        patterns: cli.patterns.iter().map(|p| Pattern::from(p.as_str())).collect(),
        interval: Duration::from_secs(cli.interval),
        verbose: cli.verbose,
        rearm: cli.rearm,
    })
}

/// Everything that can fail as a usage error happens before detaching, so the invoking
/// process still reports it on its own stderr.
pub fn handle_run(cli: &Cli) -> Result<()> {
    let opts = setup_opts(cli)?;
    if !cli.foreground {
        detach(&cli.log_path(), cli.pid_file.as_deref())?;
    }
    setup_logging(cli.verbose, cli.log_target());
    if !running_as_root() {
        debug!("Not running as root; directories this user cannot read will be skipped.");
    }
    crate::sweep_forever(&opts)?;
    Ok(())
}
