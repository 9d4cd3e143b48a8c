//! Application configuration constants.
//! Defaults and package-derived paths in one place.

use std::path::PathBuf;
use std::sync::OnceLock;

// ---- Package / paths (from CARGO_PKG_NAME, cached) ----

/// Package-derived names: built once from `CARGO_PKG_NAME`, then cached.
pub struct PackagePaths {
    log_filename: String,
    worker_thread_prefix: String,
}

static PACKAGE_PATHS: OnceLock<PackagePaths> = OnceLock::new();

impl PackagePaths {
    /// Build and cache names from `CARGO_PKG_NAME`. Called once on first use.
    pub fn get() -> &'static PackagePaths {
        PACKAGE_PATHS.get_or_init(|| {
            let pkg = env!("CARGO_PKG_NAME");
            PackagePaths {
                log_filename: format!("{pkg}.log"),
                worker_thread_prefix: format!("{pkg}-worker"),
            }
        })
    }

    /// Default log destination for the detached daemon: `$TMPDIR/<pkg>.log`.
    pub fn default_log_path(&self) -> PathBuf {
        std::env::temp_dir().join(&self.log_filename)
    }

    /// Thread name for worker `worker` of sweep `sweep`.
    pub fn worker_thread_name(&self, sweep: u64, worker: usize) -> String {
        format!("{}-{sweep}.{worker}", self.worker_thread_prefix)
    }
}

// ---- Sweep loop ----

/// Defaults for the sweep loop.
pub struct SweepConsts;

impl SweepConsts {
    /// Pause between sweeps in seconds when `-t` is not given.
    pub const DEFAULT_INTERVAL_SECS: u64 = 2;
    /// Tree walked by every worker when `--root` is not given.
    pub const DEFAULT_ROOT: &'static str = "/";
}

/// Exit status for usage errors (bad flag, missing pattern, bad root).
pub const USAGE_EXIT_CODE: i32 = 1;
