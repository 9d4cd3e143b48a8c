//! Engine: argument parsing, the command handler, matching and path helpers.

pub mod arg_parser;
pub mod cli;
pub mod matcher;
pub mod tools;

// Re-export commonly used functions
pub use arg_parser::Cli;
pub use cli::{handle_run, setup_opts};
pub use matcher::name_matches;
pub use tools::{canonicalize_root, is_traversable, running_as_root};
