pub mod json;
pub mod text;

use crate::error::TasksyncError;

/// Report a fatal error the way the active output mode expects.
pub fn print_error(err: &TasksyncError, json_output: bool) {
    if json_output {
        println!("{}", json::render(&json::error(err)));
    } else {
        eprintln!("Error: {}", err.message);
    }
}
