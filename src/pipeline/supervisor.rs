//! Sweep supervisor: spawn one worker per pattern, collect their exits while reacting to the
//! relayed signal state, pause, repeat until an operator shutdown.

use crossbeam_channel::{Receiver, unbounded};
use log::{debug, error, info};

use crate::{MatchSink, Signal, SweepOpts};

use super::context::{CancelToken, Shutdown};
use super::relay::{SignalState, WorkerGroup};
use super::worker::{WorkerContext, WorkerExit, WorkerRecord, spawn_worker};

/// Why a sweep's collection phase ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollectionEnd {
    /// Every spawned worker was reaped.
    AllReaped,
    /// Terminate was seen on a reap; the remaining workers were left running.
    Terminated,
    /// No live worker was left to report (none started, or the rest died without reporting).
    WaitFailed,
}

/// Summary of one sweep.
#[derive(Clone, Debug)]
pub struct SweepReport {
    pub sweep: u64,
    pub spawned: usize,
    /// Exits of the reaped workers, in reap order.
    pub exits: Vec<WorkerExit>,
    pub end: CollectionEnd,
}

impl SweepReport {
    pub fn reaped(&self) -> usize {
        self.exits.len()
    }
}

pub struct Supervisor {
    opts: SweepOpts,
    signals: SignalState,
    shutdown: Shutdown,
    sink: MatchSink,
    sweeps: u64,
}

impl Supervisor {
    pub fn new(
        opts: SweepOpts,
        signals: SignalState,
        shutdown: Shutdown,
        sink: MatchSink,
    ) -> Self {
        Self {
            opts,
            signals,
            shutdown,
            sink,
            sweeps: 0,
        }
    }

    /// Sweep until a shutdown is requested. Returns the number of sweeps run.
    pub fn run(&mut self) -> u64 {
        info!(
            "Sweeping {} for {} pattern(s), pausing {}s between sweeps",
            self.opts.root.display(),
            self.opts.patterns.len(),
            self.opts.interval.as_secs()
        );
        loop {
            let report = self.run_sweep();
            debug!("{:?}", report);
            if self.shutdown.is_requested() || !self.pause() {
                break;
            }
        }
        info!("Shutdown requested; stopped after {} sweep(s)", self.sweeps);
        self.sweeps
    }

    /// One sweep: spawn phase then collection phase. Does not pause.
    pub fn run_sweep(&mut self) -> SweepReport {
        if self.opts.rearm {
            self.signals.reset();
        }
        let sweep = self.sweeps;
        self.sweeps += 1;

        let (exit_tx, exit_rx) = unbounded::<WorkerExit>();
        let ctx = WorkerContext {
            verbose: self.opts.verbose,
            cancel: CancelToken::new(self.signals.clone(), self.shutdown.clone()),
            sink: self.sink.clone(),
        };
        let mut live: Vec<WorkerRecord> = Vec::with_capacity(self.opts.patterns.len());
        for (id, task) in self.opts.tasks().into_iter().enumerate() {
            let pattern = task.pattern.clone();
            match spawn_worker(sweep, id, task, ctx.clone(), exit_tx.clone()) {
                Ok(record) => live.push(record),
                Err(e) => error!("Failed to start worker for {:?}: {}", pattern.as_str(), e),
            }
        }
        // Only workers hold senders now; recv fails once none is left.
        drop(exit_tx);

        let spawned = live.len();
        let mut exits = Vec::with_capacity(spawned);
        let end = self.collect(&mut live, &mut exits, &exit_rx);
        if !live.is_empty() {
            debug!(
                "Sweep {} leaves {} worker(s) running: {:?}",
                sweep,
                live.len(),
                live.iter().map(|r| r.pattern.as_str()).collect::<Vec<_>>()
            );
        }
        SweepReport {
            sweep,
            spawned,
            exits,
            end,
        }
    }

    /// Block on worker exits. Each reap re-reads the signal state: AbortSweep is relayed and
    /// collection goes on; Terminate is relayed and collection stops.
    fn collect(
        &self,
        live: &mut Vec<WorkerRecord>,
        exits: &mut Vec<WorkerExit>,
        exit_rx: &Receiver<WorkerExit>,
    ) -> CollectionEnd {
        let group = WorkerGroup::new(self.signals.clone());
        if live.is_empty() {
            error!("No workers to wait for");
            return CollectionEnd::WaitFailed;
        }
        while !live.is_empty() {
            let exit = match exit_rx.recv() {
                Ok(exit) => exit,
                Err(_) => {
                    error!("Failed waiting for workers: {} never reported", live.len());
                    return CollectionEnd::WaitFailed;
                }
            };
            reap(live, &exit);
            exits.push(exit);

            match self.signals.get() {
                Signal::AbortSweep => {
                    if self.opts.verbose {
                        info!("Received SIGUSR1, aborting sweep");
                    }
                    group.broadcast(Signal::AbortSweep);
                }
                Signal::Terminate => {
                    if self.opts.verbose {
                        info!("Received SIGUSR2, ending collection");
                    }
                    group.broadcast(Signal::Terminate);
                    return CollectionEnd::Terminated;
                }
                Signal::None => {}
            }
        }
        CollectionEnd::AllReaped
    }

    /// Pause between sweeps unless AbortSweep is set. Returns false if a shutdown cut it short.
    pub fn pause(&self) -> bool {
        if self.signals.get() == Signal::AbortSweep {
            debug!("AbortSweep set; starting next sweep without pausing");
            return !self.shutdown.is_requested();
        }
        if self.opts.verbose {
            info!("Sleeping for {}s", self.opts.interval.as_secs());
        }
        if self.shutdown.wait_timeout(self.opts.interval) {
            return false;
        }
        if self.opts.verbose {
            info!("Woke up");
        }
        true
    }
}

/// Drop the record of the worker that sent `exit` and join its thread, which has nothing left
/// to do.
fn reap(live: &mut Vec<WorkerRecord>, exit: &WorkerExit) {
    let Some(pos) = live.iter().position(|r| r.id == exit.id) else {
        return;
    };
    let record = live.swap_remove(pos);
    if record.handle.join().is_err() {
        error!("Worker for {:?} panicked after reporting", record.pattern.as_str());
    }
    debug!(
        "Reaped worker {} ({:?}): {:?}",
        record.id,
        record.pattern.as_str(),
        exit.outcome
    );
}
