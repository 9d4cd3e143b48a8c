pub mod config;
pub mod daemon;
pub mod logger;

pub use config::*;
pub use daemon::detach;
pub use logger::{LogTarget, setup_logging};
