//! fsweep: background file-name sweeper with signal-driven sweep cancellation

pub mod engine;
pub mod pipeline;
pub mod types;
pub mod utils;

/// Re-export types for API
pub use types::*;

use log::{debug, info};
use std::sync::Arc;

use crate::pipeline::{Shutdown, SignalState, Supervisor};

/// Result alias used by public fsweep API
pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, Error>;

/// Match sink that writes one info line per match: `YYYY-MM-DD HH:MM:SS | path | pattern`.
pub fn log_sink() -> MatchSink {
    Arc::new(|m: &Match| info!("{}", m))
}

/// Install the OS signal handlers (SIGUSR1/SIGUSR2 relay, SIGINT/SIGTERM/SIGHUP shutdown) and
/// sweep with `opts` until a shutdown signal arrives. Matches go to the log.
///
/// Handlers are process-wide and can only be installed once; lib callers that manage signals
/// themselves should build a [`Supervisor`] directly.
pub fn sweep_forever(opts: &SweepOpts) -> Result<u64> {
    debug!(
        "{} CONFIG:{:#?}",
        env!("CARGO_PKG_NAME").to_string().to_uppercase(),
        opts
    );
    let signals = SignalState::new();
    signals.install_os_handlers()?;
    let shutdown = Shutdown::new();
    shutdown.install_os_handler()?;

    let mut supervisor = Supervisor::new(opts.clone(), signals, shutdown, log_sink());
    Ok(supervisor.run())
}
