pub mod prompt;

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::TasksyncError;

pub use prompt::{Prompter, TerminalPrompter};

pub const DEFAULT_API_BASE: &str = "http://localhost:8000/api";
pub const CONFIG_FILE_NAME: &str = ".sync_config.json";

pub const ENV_EMAIL: &str = "TEAM_SKILL_EMAIL";
pub const ENV_PASSWORD: &str = "TEAM_SKILL_PASSWORD";
pub const ENV_API: &str = "TEAM_SKILL_API";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api: Option<String>,
}

impl SyncConfig {
    pub fn has_credentials(&self) -> bool {
        !self.email.is_empty() && !self.password.is_empty()
    }
}

/// Where the credentials in use were found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialSource {
    Environment,
    ConfigFile,
    Prompt,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
    pub api_base: String,
    pub source: CredentialSource,
}

/// Default config location: next to the running executable.
pub fn default_config_path() -> Result<PathBuf, TasksyncError> {
    let exe = std::env::current_exe()
        .map_err(|e| TasksyncError::config(format!("Cannot locate executable: {e}")))?;
    let dir = exe
        .parent()
        .ok_or_else(|| TasksyncError::config("Executable has no parent directory"))?;
    Ok(dir.join(CONFIG_FILE_NAME))
}

/// Read the config file. A missing or unreadable file yields an empty config.
pub fn load(path: &Path) -> SyncConfig {
    let raw = match fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            debug!(path = %path.display(), error = %e, "no usable config file");
            return SyncConfig::default();
        }
    };
    serde_json::from_str(&raw).unwrap_or_else(|e| {
        warn!(path = %path.display(), error = %e, "ignoring malformed config file");
        SyncConfig::default()
    })
}

pub fn save(path: &Path, config: &SyncConfig) -> Result<(), TasksyncError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let body = serde_json::to_string_pretty(config)
        .map_err(|e| TasksyncError::config(e.to_string()))?;
    fs::write(path, body)?;
    Ok(())
}

/// Remove the config file. Returns whether a file was there to remove.
pub fn clear(path: &Path) -> Result<bool, TasksyncError> {
    match fs::remove_file(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

fn normalize_api(api: Option<&str>) -> String {
    let api = api.map(str::trim).filter(|s| !s.is_empty()).unwrap_or(DEFAULT_API_BASE);
    api.trim_end_matches('/').to_string()
}

/// Resolve login credentials from the environment, then `config_path`, then
/// `prompter`. `env` looks up environment variables so callers can inject them.
pub fn resolve_credentials<E, P>(
    config_path: &Path,
    env: E,
    prompter: &mut P,
) -> Result<Credentials, TasksyncError>
where
    E: Fn(&str) -> Option<String>,
    P: Prompter + ?Sized,
{
    let non_empty = |key: &str| env(key).filter(|v| !v.is_empty());
    if let (Some(email), Some(password)) = (non_empty(ENV_EMAIL), non_empty(ENV_PASSWORD)) {
        debug!(%email, "using credentials from environment");
        return Ok(Credentials {
            api_base: normalize_api(non_empty(ENV_API).as_deref()),
            email,
            password,
            source: CredentialSource::Environment,
        });
    }

    let stored = load(config_path);
    if stored.has_credentials() {
        prompter.notice(&format!("Using stored credentials ({})", stored.email));
        return Ok(Credentials {
            api_base: normalize_api(stored.api.as_deref()),
            email: stored.email,
            password: stored.password,
            source: CredentialSource::ConfigFile,
        });
    }

    prompter.notice("No stored configuration, please log in:");
    let email = prompter.ask("  Email: ")?.trim().to_string();
    let password = prompter.ask_secret("  Password: ")?;
    let api_input = prompter.ask(&format!("  API base [{DEFAULT_API_BASE}]: "))?;
    let api_base = normalize_api(Some(&api_input));

    if email.is_empty() || password.is_empty() {
        return Err(TasksyncError::missing_credentials());
    }

    let answer = prompter.ask("  Save configuration? (y/N): ")?;
    if answer.trim().eq_ignore_ascii_case("y") {
        let config = SyncConfig {
            email: email.clone(),
            password: password.clone(),
            api: Some(api_base.clone()),
        };
        match save(config_path, &config) {
            Ok(()) => prompter.notice(&format!("Configuration saved to {}", config_path.display())),
            Err(e) => {
                warn!(path = %config_path.display(), error = %e, "failed to save config");
                prompter.notice(&format!("Could not save configuration: {e}"));
            }
        }
    }

    Ok(Credentials {
        email,
        password,
        api_base,
        source: CredentialSource::Prompt,
    })
}
