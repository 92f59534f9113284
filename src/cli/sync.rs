use std::fs;
use std::path::Path;

use tracing::info;

use crate::client::SyncClient;
use crate::config::{self, TerminalPrompter};
use crate::error::TasksyncError;
use crate::output;
use crate::parser;

pub fn run(file: &Path, config_path: &Path, dry_run: bool, json_output: bool) -> i32 {
    match run_inner(file, config_path, dry_run, json_output) {
        Ok(code) => code,
        Err(e) => {
            output::print_error(&e, json_output);
            1
        }
    }
}

fn run_inner(file: &Path, config_path: &Path, dry_run: bool, json_output: bool) -> Result<i32, TasksyncError> {
    if !file.is_file() {
        return Err(TasksyncError::file_not_found(&file.display().to_string()));
    }

    let content = fs::read_to_string(file)?;
    let mut tasks = parser::parse(&content);

    if tasks.is_empty() {
        if json_output {
            println!(
                "{}",
                output::json::render(&output::json::success(output::json::no_tasks(
                    &file.display().to_string()
                )))
            );
        } else {
            eprintln!("Warning: no tasks found in {}", file.display());
        }
        return Ok(0);
    }

    let project = parser::project_name_for(file)?;
    parser::assign_project(&mut tasks, &project);
    info!(%project, count = tasks.len(), "parsed task list");

    if dry_run {
        if json_output {
            println!(
                "{}",
                output::json::render(&output::json::success(output::json::dry_run(&project, &tasks)))
            );
        } else {
            output::text::print_found(&project, tasks.len());
            output::text::print_task_list(&tasks);
        }
        return Ok(0);
    }

    if !json_output {
        output::text::print_found(&project, tasks.len());
    }

    let creds = config::resolve_credentials(config_path, |key| std::env::var(key).ok(), &mut TerminalPrompter)?;
    let client = SyncClient::new(&creds.api_base)?;

    if !json_output {
        println!("Logging in...");
    }
    let token = client.login(&creds.email, &creds.password)?;

    if !json_output {
        println!("Syncing...");
    }
    let synced = client.sync_tasks(&token, &tasks)?;

    if json_output {
        println!(
            "{}",
            output::json::render(&output::json::success(output::json::sync_result(
                &project,
                tasks.len(),
                synced,
            )))
        );
    } else {
        println!("Synced to the tracking platform ({synced} tasks)");
    }
    Ok(0)
}
