pub mod clear;
pub mod commands;
pub mod sync;

use std::path::PathBuf;

pub use commands::*;

use crate::config;
use crate::error::TasksyncError;
use crate::output;

/// Run the command line and return the process exit code.
pub fn run(cli: Cli) -> i32 {
    let config_path = match resolve_config_path(cli.config) {
        Ok(path) => path,
        Err(e) => {
            output::print_error(&e, cli.json);
            return 1;
        }
    };

    // clap requires --file unless --clear-config is given.
    match (cli.clear_config, cli.file) {
        (false, Some(file)) => sync::run(&file, &config_path, cli.dry_run, cli.json),
        _ => clear::run(&config_path, cli.json),
    }
}

fn resolve_config_path(flag: Option<PathBuf>) -> Result<PathBuf, TasksyncError> {
    match flag {
        Some(path) => Ok(path),
        None => config::default_config_path(),
    }
}
