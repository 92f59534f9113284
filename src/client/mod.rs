use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::TasksyncError;
use crate::models::TaskRecord;

const LOGIN_PATH: &str = "/auth/login";
const SYNC_PATH: &str = "/tasks/sync";
const BODY_PREVIEW_LIMIT: usize = 512;

#[derive(Debug, Deserialize)]
struct LoginResponse {
    access_token: String,
}

#[derive(Debug, Serialize)]
struct SyncRequest<'a> {
    tasks: &'a [TaskRecord],
}

pub struct SyncClient {
    http: Client,
    api_base: String,
}

impl SyncClient {
    /// Requests carry no timeout; a stalled server blocks the run.
    pub fn new(api_base: &str) -> Result<Self, TasksyncError> {
        let http = Client::builder().timeout(None::<Duration>).build()?;
        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    /// Exchange email and password for a bearer token.
    pub fn login(&self, email: &str, password: &str) -> Result<String, TasksyncError> {
        let url = format!("{}{LOGIN_PATH}", self.api_base);
        debug!(%url, %email, "logging in");

        let resp = self
            .http
            .post(&url)
            .form(&[("username", email), ("password", password)])
            .send()?;
        let status = resp.status();
        let body = resp.text()?;

        if status != StatusCode::OK {
            debug!(status = status.as_u16(), "login rejected");
            return Err(TasksyncError::login_failed(&login_error_detail(&body)));
        }

        let parsed: LoginResponse = serde_json::from_str(&body).map_err(|e| {
            TasksyncError::http(format!(
                "Unexpected login response: {e} | body={}",
                preview_body(&body)
            ))
        })?;
        Ok(parsed.access_token)
    }

    /// Submit every record in one request; returns how many the server
    /// reports as synchronized.
    pub fn sync_tasks(&self, token: &str, tasks: &[TaskRecord]) -> Result<usize, TasksyncError> {
        let url = format!("{}{SYNC_PATH}", self.api_base);
        debug!(%url, count = tasks.len(), "syncing tasks");

        let resp = self
            .http
            .post(&url)
            .bearer_auth(token)
            .json(&SyncRequest { tasks })
            .send()?;
        let status = resp.status();
        let body = resp.text()?;

        if status != StatusCode::OK {
            debug!(status = status.as_u16(), "sync rejected");
            return Err(TasksyncError::sync_failed(&body));
        }

        let synced: Vec<Value> = serde_json::from_str(&body).map_err(|e| {
            TasksyncError::http(format!(
                "Unexpected sync response: {e} | body={}",
                preview_body(&body)
            ))
        })?;
        Ok(synced.len())
    }
}

/// Human-readable reason for a rejected login.
fn login_error_detail(body: &str) -> String {
    if body.trim().is_empty() {
        return "connection failed".to_string();
    }
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => match map.get("detail") {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => "unknown error".to_string(),
        },
        _ => "unknown error".to_string(),
    }
}

fn preview_body(body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "<empty body>".to_string();
    }
    let mut out: String = trimmed.chars().take(BODY_PREVIEW_LIMIT).collect();
    if trimmed.chars().count() > BODY_PREVIEW_LIMIT {
        out.push_str("...");
    }
    out
}
