#[allow(deprecated)]
use assert_cmd::Command;
use mockito::{Matcher, Mock, ServerGuard};
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

// ─── helpers ───────────────────────────────────────────────────────

const SAMPLE_DOC: &str = "\
# 任务清单

## 进行中
- [/] **feat-export** - 导出报表
  - 开始时间: 2024-03-01 10:00
  - 复杂度: ⭐⭐⭐
  - 交互轮次: 4

## 已完成
- [x] **T-1** - Fix bug
  - 复杂度: ⭐⭐⭐⭐
  - 开始时间: 2024-01-01 09:30
  - 完成时间: 2024-01-01 11:00
  - 返工次数: 1
  - 效率得分: 88.5

## 待办
- [ ] **T-9** - Not synced
";

struct TestEnv {
    dir: TempDir,
}

impl TestEnv {
    fn new() -> Self {
        let dir = TempDir::new().expect("create tempdir");
        fs::create_dir(dir.path().join("demo-project")).expect("create project dir");
        Self { dir }
    }

    fn config_path(&self) -> PathBuf {
        self.dir.path().join("sync_config.json")
    }

    fn write_doc(&self, content: &str) -> PathBuf {
        let p = self.dir.path().join("demo-project").join("任务清单.md");
        fs::write(&p, content).expect("write task list");
        p
    }

    fn write_config(&self, api: &str) {
        let config = serde_json::json!({
            "email": "dev@example.com",
            "password": "hunter2",
            "api": api
        });
        fs::write(self.config_path(), config.to_string()).expect("write config");
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("tasksync").expect("binary");
        cmd.current_dir(self.dir.path())
            .env_remove("TEAM_SKILL_EMAIL")
            .env_remove("TEAM_SKILL_PASSWORD")
            .env_remove("TEAM_SKILL_API")
            .env_remove("RUST_LOG")
            .arg("--config")
            .arg(self.config_path());
        cmd
    }

    fn run_json(&self, args: &[&str], stdin: &str) -> (i32, Value) {
        let output = self
            .cmd()
            .args(args)
            .arg("--json")
            .write_stdin(stdin)
            .output()
            .expect("run");
        let stdout = String::from_utf8_lossy(&output.stdout);
        let v = serde_json::from_str(&stdout)
            .unwrap_or_else(|e| panic!("parse JSON failed: {e}\nstdout: {stdout}"));
        (output.status.code().unwrap_or(-1), v)
    }
}

fn mock_login(server: &mut ServerGuard, email: &str, password: &str) -> Mock {
    server
        .mock("POST", "/auth/login")
        .match_body(Matcher::AllOf(vec![
            Matcher::UrlEncoded("username".into(), email.into()),
            Matcher::UrlEncoded("password".into(), password.into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"access_token":"tok-abc","token_type":"bearer"}"#)
        .create()
}

fn mock_sync(server: &mut ServerGuard) -> Mock {
    server
        .mock("POST", "/tasks/sync")
        .match_header("authorization", "Bearer tok-abc")
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex(r#""change_id":"feat-export""#.into()),
            Matcher::Regex(r#""change_id":"T-1""#.into()),
            Matcher::Regex(r#""project_name":"demo-project""#.into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{"id":1},{"id":2}]"#)
        .create()
}

// ─── parsing ───────────────────────────────────────────────────────

#[test]
fn dry_run_lists_parsed_tasks() {
    let env = TestEnv::new();
    let doc = env.write_doc(SAMPLE_DOC);

    let (code, v) = env.run_json(&["-f", doc.to_str().unwrap(), "--dry-run"], "");
    assert_eq!(code, 0);
    assert_eq!(v["success"], true);
    assert_eq!(v["data"]["project"], "demo-project");
    assert_eq!(v["data"]["found"], 2);

    let tasks = v["data"]["tasks"].as_array().unwrap();
    assert_eq!(tasks[0]["change_id"], "feat-export");
    assert_eq!(tasks[0]["status"], "in_progress");
    assert_eq!(tasks[0]["start_time"], "2024-03-01T10:00:00");
    assert_eq!(tasks[0]["interaction_count"], 4);

    assert_eq!(tasks[1]["change_id"], "T-1");
    assert_eq!(tasks[1]["title"], "Fix bug");
    assert_eq!(tasks[1]["status"], "completed");
    assert_eq!(tasks[1]["complexity"], 4);
    assert_eq!(tasks[1]["end_time"], "2024-01-01T11:00:00");
    assert_eq!(tasks[1]["rework_count"], 1);
    assert_eq!(tasks[1]["efficiency_score"], 88.5);

    assert!(tasks.iter().all(|t| t["project_name"] == "demo-project"));
}

#[test]
fn dry_run_text_output() {
    let env = TestEnv::new();
    let doc = env.write_doc(SAMPLE_DOC);

    env.cmd()
        .args(["-f", doc.to_str().unwrap(), "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Project: demo-project"))
        .stdout(predicate::str::contains("Found 2 tasks"))
        .stdout(predicate::str::contains("[completed] T-1 - Fix bug"));
}

#[test]
fn missing_file_fails() {
    let env = TestEnv::new();
    let (code, v) = env.run_json(&["-f", "nope.md"], "");
    assert_eq!(code, 1);
    assert_eq!(v["success"], false);
    assert_eq!(v["error"]["code"], "FILE_NOT_FOUND");
}

#[test]
fn missing_file_text_error() {
    let env = TestEnv::new();
    env.cmd()
        .args(["-f", "nope.md"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("File not found: nope.md"));
}

#[test]
fn no_tasks_is_a_warning() {
    let env = TestEnv::new();
    let doc = env.write_doc("# 任务清单\n\n## 待办\n- [ ] **T-1** - later\n");

    env.cmd()
        .args(["-f", doc.to_str().unwrap()])
        .assert()
        .success()
        .stderr(predicate::str::contains("no tasks found"));

    let (code, v) = env.run_json(&["-f", doc.to_str().unwrap()], "");
    assert_eq!(code, 0);
    assert_eq!(v["data"]["found"], 0);
}

#[test]
fn file_flag_is_required() {
    let env = TestEnv::new();
    env.cmd().assert().failure();
}

// ─── sync ──────────────────────────────────────────────────────────

#[test]
fn sync_with_stored_config() {
    let env = TestEnv::new();
    let doc = env.write_doc(SAMPLE_DOC);
    let mut server = mockito::Server::new();
    env.write_config(&server.url());
    let login = mock_login(&mut server, "dev@example.com", "hunter2");
    let sync = mock_sync(&mut server);

    let (code, v) = env.run_json(&["-f", doc.to_str().unwrap()], "");
    assert_eq!(code, 0, "unexpected failure: {v}");
    assert_eq!(v["data"]["project"], "demo-project");
    assert_eq!(v["data"]["found"], 2);
    assert_eq!(v["data"]["synced"], 2);

    login.assert();
    sync.assert();
}

#[test]
fn sync_text_reports_count() {
    let env = TestEnv::new();
    let doc = env.write_doc(SAMPLE_DOC);
    let mut server = mockito::Server::new();
    env.write_config(&server.url());
    let _login = mock_login(&mut server, "dev@example.com", "hunter2");
    let _sync = mock_sync(&mut server);

    env.cmd()
        .args(["-f", doc.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 2 tasks"))
        .stdout(predicate::str::contains("Synced to the tracking platform (2 tasks)"))
        .stderr(predicate::str::contains("Using stored credentials (dev@example.com)"));
}

#[test]
fn environment_credentials_win_over_config() {
    let env = TestEnv::new();
    let doc = env.write_doc(SAMPLE_DOC);
    let mut server = mockito::Server::new();
    env.write_config("http://127.0.0.1:9");
    let login = mock_login(&mut server, "ci@example.com", "from-env");
    let sync = mock_sync(&mut server);

    let output = env
        .cmd()
        .env("TEAM_SKILL_EMAIL", "ci@example.com")
        .env("TEAM_SKILL_PASSWORD", "from-env")
        .env("TEAM_SKILL_API", server.url())
        .args(["-f", doc.to_str().unwrap(), "--json"])
        .output()
        .expect("run");
    assert_eq!(output.status.code(), Some(0));

    login.assert();
    sync.assert();
}

#[test]
fn prompted_credentials_can_be_saved() {
    let env = TestEnv::new();
    let doc = env.write_doc(SAMPLE_DOC);
    let mut server = mockito::Server::new();
    let _login = mock_login(&mut server, "new@example.com", "pw");
    let _sync = mock_sync(&mut server);

    let stdin = format!("new@example.com\npw\n{}\ny\n", server.url());
    let (code, v) = env.run_json(&["-f", doc.to_str().unwrap()], &stdin);
    assert_eq!(code, 0, "unexpected failure: {v}");

    let saved: Value = serde_json::from_str(&fs::read_to_string(env.config_path()).unwrap()).unwrap();
    assert_eq!(saved["email"], "new@example.com");
    assert_eq!(saved["password"], "pw");
    assert_eq!(saved["api"], server.url());
}

#[test]
fn missing_credentials_fail() {
    let env = TestEnv::new();
    let doc = env.write_doc(SAMPLE_DOC);

    let (code, v) = env.run_json(&["-f", doc.to_str().unwrap()], "");
    assert_eq!(code, 1);
    assert_eq!(v["error"]["code"], "MISSING_CREDENTIALS");
    assert!(!env.config_path().exists());
}

#[test]
fn login_failure_shows_detail() {
    let env = TestEnv::new();
    let doc = env.write_doc(SAMPLE_DOC);
    let mut server = mockito::Server::new();
    env.write_config(&server.url());
    let _login = server
        .mock("POST", "/auth/login")
        .with_status(401)
        .with_body(r#"{"detail":"Incorrect email or password"}"#)
        .create();
    let sync = server.mock("POST", "/tasks/sync").expect(0).create();

    let (code, v) = env.run_json(&["-f", doc.to_str().unwrap()], "");
    assert_eq!(code, 1);
    assert_eq!(v["error"]["code"], "LOGIN_FAILED");
    assert_eq!(v["error"]["message"], "Login failed: Incorrect email or password");
    sync.assert();
}

#[test]
fn sync_failure_shows_body() {
    let env = TestEnv::new();
    let doc = env.write_doc(SAMPLE_DOC);
    let mut server = mockito::Server::new();
    env.write_config(&server.url());
    let _login = mock_login(&mut server, "dev@example.com", "hunter2");
    let _sync = server
        .mock("POST", "/tasks/sync")
        .with_status(500)
        .with_body("internal error")
        .create();

    env.cmd()
        .args(["-f", doc.to_str().unwrap()])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Sync failed: internal error"));
}

// ─── config ────────────────────────────────────────────────────────

#[test]
fn clear_config_removes_file() {
    let env = TestEnv::new();
    env.write_config("http://localhost:8000/api");

    env.cmd()
        .arg("--clear-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration cleared"));
    assert!(!env.config_path().exists());

    env.cmd()
        .arg("--clear-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("No configuration file"));
}

#[test]
fn clear_config_json() {
    let env = TestEnv::new();
    let (code, v) = env.run_json(&["--clear-config"], "");
    assert_eq!(code, 0);
    assert_eq!(v["data"]["removed"], false);
}

#[test]
fn clear_config_wins_over_file() {
    let env = TestEnv::new();
    env.write_config("http://localhost:8000/api");
    let doc = env.write_doc(SAMPLE_DOC);

    env.cmd()
        .arg("--clear-config")
        .arg("-f")
        .arg(&doc)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration cleared"));
    assert!(!env.config_path().exists());
}
