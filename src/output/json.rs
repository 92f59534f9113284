use serde_json::{json, Value};

use crate::error::TasksyncError;
use crate::models::TaskRecord;

pub fn success(data: Value) -> Value {
    json!({
        "success": true,
        "data": data
    })
}

pub fn error(err: &TasksyncError) -> Value {
    json!({
        "success": false,
        "error": {
            "code": err.code.as_str(),
            "message": err.message
        }
    })
}

pub fn render(v: &Value) -> String {
    serde_json::to_string_pretty(v).unwrap_or_else(|_| v.to_string())
}

pub fn task_json(t: &TaskRecord) -> Value {
    serde_json::to_value(t).unwrap_or(Value::Null)
}

pub fn no_tasks(path: &str) -> Value {
    json!({
        "file": path,
        "found": 0,
        "synced": 0,
        "warning": "No tasks found"
    })
}

pub fn dry_run(project: &str, tasks: &[TaskRecord]) -> Value {
    json!({
        "project": project,
        "found": tasks.len(),
        "dry_run": true,
        "tasks": tasks.iter().map(task_json).collect::<Vec<_>>()
    })
}

pub fn sync_result(project: &str, found: usize, synced: usize) -> Value {
    json!({
        "project": project,
        "found": found,
        "synced": synced
    })
}

pub fn config_cleared(path: &str, removed: bool) -> Value {
    json!({
        "path": path,
        "removed": removed
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn error_envelope() {
        let v = error(&TasksyncError::new(ErrorCode::FileNotFound, "File not found: x.md"));
        assert_eq!(v["success"], false);
        assert_eq!(v["error"]["code"], "FILE_NOT_FOUND");
        assert_eq!(v["error"]["message"], "File not found: x.md");
    }

    #[test]
    fn sync_envelope() {
        let v = success(sync_result("demo", 3, 2));
        assert_eq!(v["success"], true);
        assert_eq!(v["data"]["found"], 3);
        assert_eq!(v["data"]["synced"], 2);
    }
}
