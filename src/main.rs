use clap::Parser;
use std::process;

use tasksync::cli::{self, Cli};
use tasksync::logging;

fn main() {
    let cli_args = Cli::parse();

    if let Err(e) = logging::init(cli_args.verbose) {
        eprintln!("Warning: {e}");
    }

    process::exit(cli::run(cli_args));
}
