use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    MissingCredentials,
    FileNotFound,
    ConfigError,
    LoginFailed,
    SyncFailed,
    HttpError,
    IoError,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MissingCredentials => "MISSING_CREDENTIALS",
            Self::FileNotFound => "FILE_NOT_FOUND",
            Self::ConfigError => "CONFIG_ERROR",
            Self::LoginFailed => "LOGIN_FAILED",
            Self::SyncFailed => "SYNC_FAILED",
            Self::HttpError => "HTTP_ERROR",
            Self::IoError => "IO_ERROR",
        }
    }
}

#[derive(Debug, Error)]
#[error("{message}")]
pub struct TasksyncError {
    pub code: ErrorCode,
    pub message: String,
}

impl TasksyncError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn missing_credentials() -> Self {
        Self::new(
            ErrorCode::MissingCredentials,
            "No credentials provided. Set TEAM_SKILL_EMAIL/TEAM_SKILL_PASSWORD or enter them when prompted.",
        )
    }

    pub fn file_not_found(path: &str) -> Self {
        Self::new(ErrorCode::FileNotFound, format!("File not found: {path}"))
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    pub fn login_failed(detail: &str) -> Self {
        Self::new(ErrorCode::LoginFailed, format!("Login failed: {detail}"))
    }

    pub fn sync_failed(body: &str) -> Self {
        Self::new(ErrorCode::SyncFailed, format!("Sync failed: {body}"))
    }

    pub fn http(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::HttpError, message)
    }

    pub fn io(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::IoError, message)
    }
}

impl From<std::io::Error> for TasksyncError {
    fn from(e: std::io::Error) -> Self {
        Self::io(e.to_string())
    }
}

impl From<reqwest::Error> for TasksyncError {
    fn from(e: reqwest::Error) -> Self {
        let url = e.url().map(|u| u.to_string()).unwrap_or_default();
        if e.is_connect() {
            Self::http(format!("Could not connect to {url}: {e}"))
        } else if e.is_decode() {
            Self::http(format!("Could not decode response from {url}: {e}"))
        } else {
            Self::http(e.to_string())
        }
    }
}
