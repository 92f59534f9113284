use std::path::Path;

use crate::config;
use crate::error::TasksyncError;
use crate::output;

pub fn run(config_path: &Path, json_output: bool) -> i32 {
    match run_inner(config_path, json_output) {
        Ok(code) => code,
        Err(e) => {
            output::print_error(&e, json_output);
            1
        }
    }
}

fn run_inner(config_path: &Path, json_output: bool) -> Result<i32, TasksyncError> {
    let removed = config::clear(config_path)?;
    if json_output {
        println!(
            "{}",
            output::json::render(&output::json::success(output::json::config_cleared(
                &config_path.to_string_lossy(),
                removed,
            )))
        );
    } else if removed {
        println!("Configuration cleared");
    } else {
        println!("No configuration file");
    }
    Ok(0)
}
