//! Shared cancellation state handed to every worker: the signal relay state plus the
//! operator shutdown request.

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, bounded};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use crate::Signal;

use super::relay::SignalState;

/// Operator shutdown request (SIGINT/SIGTERM/SIGHUP). Separate from the relayed signals:
/// it is the only thing that ends the sweep loop.
#[derive(Clone, Debug)]
pub struct Shutdown {
    requested: Arc<AtomicBool>,
    wake_tx: Sender<()>,
    wake_rx: Receiver<()>,
}

impl Default for Shutdown {
    fn default() -> Self {
        let (wake_tx, wake_rx) = bounded(1);
        Self {
            requested: Arc::new(AtomicBool::new(false)),
            wake_tx,
            wake_rx,
        }
    }
}

impl Shutdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flag the shutdown and wake a sleeping supervisor. Safe to call repeatedly.
    pub fn request(&self) {
        self.requested.store(true, Ordering::SeqCst);
        let _ = self.wake_tx.try_send(());
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Sleep up to `timeout`. Returns true if a shutdown was requested before or during the wait.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        if self.is_requested() {
            return true;
        }
        match self.wake_rx.recv_timeout(timeout) {
            Ok(()) | Err(RecvTimeoutError::Disconnected) => true,
            Err(RecvTimeoutError::Timeout) => self.is_requested(),
        }
    }

    /// Route SIGINT/SIGTERM/SIGHUP to [`Self::request`]. Once per process; install after detaching.
    pub fn install_os_handler(&self) -> anyhow::Result<()> {
        use anyhow::Context;
        let handler = self.clone();
        ctrlc::set_handler(move || handler.request()).context("set shutdown signal handler")
    }
}

/// What a walk checks before each entry.
#[derive(Clone, Debug)]
pub struct CancelToken {
    signals: SignalState,
    shutdown: Shutdown,
}

impl CancelToken {
    pub fn new(signals: SignalState, shutdown: Shutdown) -> Self {
        Self { signals, shutdown }
    }

    /// Latest relayed signal.
    pub fn signal(&self) -> Signal {
        self.signals.get()
    }

    /// True once AbortSweep was delivered (and not re-armed) or a shutdown was requested.
    /// Terminate alone does not stop a walk.
    pub fn is_cancelled(&self) -> bool {
        self.signals.get() == Signal::AbortSweep || self.shutdown.is_requested()
    }
}
