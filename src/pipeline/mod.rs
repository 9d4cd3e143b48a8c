//! Sweep pipeline: walker, workers, supervisor and the signal relay between them.

pub mod context;
pub mod relay;
pub mod supervisor;
pub mod walk;
pub mod worker;

pub use context::{CancelToken, Shutdown};
pub use relay::{SignalState, WorkerGroup};
pub use supervisor::{CollectionEnd, Supervisor, SweepReport};
pub use walk::{WalkOutcome, WalkStats, walk};
pub use worker::{WorkerContext, WorkerExit, WorkerId, WorkerRecord, spawn_worker};
