use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Pending,
    InProgress,
    Completed,
}

impl TaskStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
        }
    }

    /// Status implied by the checkbox on a task line. Only `[x]` and `[/]`
    /// carry meaning; every other marker reads as pending.
    pub fn from_checkbox(line: &str) -> Self {
        if line.contains("- [x]") {
            Self::Completed
        } else if line.contains("- [/]") {
            Self::InProgress
        } else {
            Self::Pending
        }
    }
}

pub const DEFAULT_COMPLEXITY: u32 = 3;

/// One checklist entry together with its detail annotations, in the shape the
/// sync endpoint expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskRecord {
    pub change_id: String,
    pub title: String,
    pub status: TaskStatus,
    pub complexity: u32,
    pub start_time: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_time: Option<String>,
    pub interaction_count: u32,
    pub rework_count: u32,
    pub efficiency_score: Option<f64>,
    pub project_name: Option<String>,
}

impl TaskRecord {
    pub fn new(change_id: impl Into<String>, title: impl Into<String>, status: TaskStatus, start_time: impl Into<String>) -> Self {
        Self {
            change_id: change_id.into(),
            title: title.into(),
            status,
            complexity: DEFAULT_COMPLEXITY,
            start_time: start_time.into(),
            end_time: None,
            interaction_count: 0,
            rework_count: 0,
            efficiency_score: None,
            project_name: None,
        }
    }
}
