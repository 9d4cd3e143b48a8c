//! Signal relay: OS handlers record the last control signal into [`SignalState`]; the
//! supervisor reads it and rebroadcasts it to the worker group.

use anyhow::{Context, Result};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::Signal;

/// Shared, asynchronously written record of the last control signal.
///
/// Starts at [`Signal::None`]. Handlers overwrite it; nothing resets it unless the sweep
/// loop was asked to re-arm, so an AbortSweep stays visible to every later sweep.
#[derive(Clone, Debug, Default)]
pub struct SignalState {
    raw: Arc<AtomicUsize>,
}

impl SignalState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self) -> Signal {
        Signal::from_raw(self.raw.load(Ordering::SeqCst))
    }

    /// Record `signal` as the latest one. Same effect as delivery through the OS handler.
    pub fn raise(&self, signal: Signal) {
        self.raw.store(signal as usize, Ordering::SeqCst);
    }

    pub fn reset(&self) {
        self.raise(Signal::None);
    }

    /// Route SIGUSR1 to AbortSweep and SIGUSR2 to Terminate.
    ///
    /// Handlers stay installed for the life of the process. Install after detaching.
    #[cfg(unix)]
    pub fn install_os_handlers(&self) -> Result<()> {
        self.register(libc::SIGUSR1, Signal::AbortSweep)
            .context("install SIGUSR1 handler")?;
        self.register(libc::SIGUSR2, Signal::Terminate)
            .context("install SIGUSR2 handler")?;
        Ok(())
    }

    #[cfg(not(unix))]
    pub fn install_os_handlers(&self) -> Result<()> {
        Ok(())
    }

    #[cfg(unix)]
    fn register(&self, signo: libc::c_int, signal: Signal) -> std::io::Result<()> {
        let raw = Arc::clone(&self.raw);
        // The action only does an atomic store, which is async-signal-safe.
        unsafe {
            signal_hook_registry::register(signo, move || {
                raw.store(signal as usize, Ordering::SeqCst);
            })?;
        }
        Ok(())
    }
}

/// The workers of one sweep, as seen by the supervisor for rebroadcasting.
///
/// Workers are threads of this process and read the same [`SignalState`], so relaying a
/// signal to the group is a store into their shared view.
pub struct WorkerGroup {
    shared: SignalState,
}

impl WorkerGroup {
    pub fn new(shared: SignalState) -> Self {
        Self { shared }
    }

    /// Make `signal` visible to every worker still walking.
    pub fn broadcast(&self, signal: Signal) {
        self.shared.raise(signal);
    }
}
