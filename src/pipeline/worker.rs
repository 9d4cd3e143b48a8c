//! Search worker: one thread, one task, one walk.

use crossbeam_channel::Sender;
use log::debug;
use std::io;
use std::thread::{self, JoinHandle};

use crate::utils::config::PackagePaths;
use crate::{MatchSink, Pattern, SearchTask, Signal};

use super::context::CancelToken;
use super::walk::{WalkOutcome, walk};

/// Identity of a worker within its sweep.
pub type WorkerId = usize;

/// Sent by a worker when it is done: walk completed, aborted, or skipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WorkerExit {
    pub id: WorkerId,
    pub outcome: WalkOutcome,
}

/// Supervisor-side bookkeeping for a spawned worker.
pub struct WorkerRecord {
    pub id: WorkerId,
    pub pattern: Pattern,
    pub handle: JoinHandle<()>,
}

/// Everything a worker thread needs besides its task.
#[derive(Clone)]
pub struct WorkerContext {
    pub verbose: bool,
    pub cancel: CancelToken,
    pub sink: MatchSink,
}

/// Start a worker thread that walks `task` once (or not at all if AbortSweep or Terminate is
/// already set when it starts), sends its [`WorkerExit`] on `exit_tx`, and ends.
///
/// Never retries. A panic inside the walk drops `exit_tx` without sending; the supervisor sees
/// that as a failed wait once no live worker is left to report.
pub fn spawn_worker(
    sweep: u64,
    id: WorkerId,
    task: SearchTask,
    ctx: WorkerContext,
    exit_tx: Sender<WorkerExit>,
) -> io::Result<WorkerRecord> {
    let pattern = task.pattern.clone();
    let handle = thread::Builder::new()
        .name(PackagePaths::get().worker_thread_name(sweep, id))
        .spawn(move || {
            let outcome = run_task(id, &task, &ctx);
            let _ = exit_tx.send(WorkerExit { id, outcome });
        })?;
    Ok(WorkerRecord {
        id,
        pattern,
        handle,
    })
}

fn run_task(id: WorkerId, task: &SearchTask, ctx: &WorkerContext) -> WalkOutcome {
    // Terminate is only checked here, never per entry.
    let pending = ctx.cancel.signal();
    if pending != Signal::None {
        debug!(
            "Worker {} ({:?}) not walking: {:?} already set",
            id,
            task.pattern.as_str(),
            pending
        );
        return WalkOutcome::Skipped;
    }
    let sink = ctx.sink.as_ref();
    let (outcome, stats) = walk(task, ctx.verbose, &ctx.cancel, |m| sink(m));
    debug!(
        "Worker {} ({:?}) finished: {:?}, {} visited, {} matched, {} skipped",
        id,
        task.pattern.as_str(),
        outcome,
        stats.visited,
        stats.matched,
        stats.skipped
    );
    outcome
}
