pub mod fields;

use std::collections::HashSet;
use std::path::Path;

use chrono::{Local, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::{debug, warn};

use crate::models::{TaskRecord, TaskStatus};

pub use fields::DETAIL_WINDOW;

const IN_PROGRESS_HEADER: &str = "## 进行中";
const COMPLETED_HEADER: &str = "## 已完成";

static ENTRY_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\*\*([^*]+)\*\*\s*-\s*(.+)").unwrap_or_else(|e| panic!("Invalid entry regex: {e}"))
});

/// Section the scanner is currently inside.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    InProgress,
    Completed,
}

impl Section {
    /// Section change caused by `line`: `Some(Some(_))` enters a section,
    /// `Some(None)` leaves it, `None` means the line is not a header.
    fn transition(line: &str) -> Option<Option<Self>> {
        if line.contains(IN_PROGRESS_HEADER) {
            Some(Some(Self::InProgress))
        } else if line.contains(COMPLETED_HEADER) {
            Some(Some(Self::Completed))
        } else if line.starts_with("## ") {
            Some(None)
        } else {
            None
        }
    }
}

/// Parse with the current local time as the default start time.
pub fn parse(content: &str) -> Vec<TaskRecord> {
    parse_task_list(content, Local::now().naive_local())
}

/// Turn document text into task records, in document order.
///
/// `now` becomes the start time of every task without a `开始时间` line.
/// Lines that look like tasks but do not match the entry shape are skipped.
/// When an identifier repeats, only its last entry is kept, in that entry's
/// position, so a task moved from `## 进行中` to `## 已完成` syncs as completed.
pub fn parse_task_list(content: &str, now: NaiveDateTime) -> Vec<TaskRecord> {
    let lines: Vec<&str> = content.lines().collect();
    let default_start = now.format("%Y-%m-%dT%H:%M:%S%.6f").to_string();

    let mut tasks = Vec::new();
    let mut section: Option<Section> = None;

    for (idx, line) in lines.iter().enumerate() {
        if let Some(next) = Section::transition(line) {
            section = next;
        }

        if section.is_none() || !line.trim().starts_with("- [") {
            continue;
        }

        let Some(task) = parse_task_entry(&lines, idx, &default_start) else {
            debug!(line = idx + 1, "skipping unrecognized task line");
            continue;
        };

        tasks.push(task);
    }

    let tasks = keep_last_occurrence(tasks);
    debug!(count = tasks.len(), "parsed task list");
    tasks
}

fn keep_last_occurrence(tasks: Vec<TaskRecord>) -> Vec<TaskRecord> {
    let mut seen = HashSet::new();
    let mut kept: Vec<TaskRecord> = tasks
        .into_iter()
        .rev()
        .filter(|t| {
            let first_from_end = seen.insert(t.change_id.clone());
            if !first_from_end {
                warn!(change_id = %t.change_id, "duplicate task id, keeping the later entry");
            }
            first_from_end
        })
        .collect();
    kept.reverse();
    kept
}

/// Parse the task line at `lines[idx]` plus its detail block.
pub fn parse_task_entry(lines: &[&str], idx: usize, default_start: &str) -> Option<TaskRecord> {
    let line = lines.get(idx)?;
    let caps = ENTRY_PATTERN.captures(line)?;

    let change_id = caps[1].trim();
    if change_id.is_empty() {
        return None;
    }
    let title = caps[2].trim();

    let mut task = TaskRecord::new(change_id, title, TaskStatus::from_checkbox(line), default_start);

    let end = lines.len().min(idx + 1 + DETAIL_WINDOW);
    for detail in &lines[idx + 1..end] {
        let detail = detail.trim();
        if fields::ends_detail_block(detail) {
            break;
        }
        fields::apply_detail_line(&mut task, detail);
    }

    Some(task)
}

/// Name of the directory that contains `path`, after resolving it.
pub fn project_name_for(path: &Path) -> std::io::Result<String> {
    let resolved = path.canonicalize()?;
    Ok(resolved
        .parent()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default())
}

/// Back-fill the project name on every record.
pub fn assign_project(tasks: &mut [TaskRecord], project_name: &str) {
    for task in tasks.iter_mut() {
        task.project_name = Some(project_name.to_string());
    }
}
