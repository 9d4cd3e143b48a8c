//! fsweep CLI: detach and sweep a tree for file names containing the given patterns.

use anyhow::Result;
use clap::Parser;
use fsweep::engine::arg_parser::Cli;
use fsweep::engine::handle_run;
use fsweep::utils::USAGE_EXIT_CODE;

fn main() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // --help / --version go to stdout and exit 0; usage errors exit 1.
            let code = if e.use_stderr() { USAGE_EXIT_CODE } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };
    handle_run(&cli)
}
