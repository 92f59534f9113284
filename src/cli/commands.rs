use std::path::PathBuf;

use clap::Parser;

const VERSION: &str = env!("TASKSYNC_VERSION");

#[derive(Parser)]
#[command(
    name = "tasksync",
    version = VERSION,
    about = "Sync a 任务清单.md task list to the team efficiency tracking platform",
    after_help = "\
DOCUMENT FORMAT:
  Tasks are read from the `## 进行中` and `## 已完成` sections only:
    - [x] **T-1** - Fix bug
      - 开始时间: 2024-01-01 09:30
      - 复杂度: ⭐⭐⭐⭐
      - 交互轮次: 5
      - 返工次数: 1
      - 效率得分: 87.5
      - 完成时间: 2024-01-01 11:00
  `[x]` is completed, `[/]` is in progress, anything else is pending.
  The project name is the name of the directory holding the file.

CREDENTIALS:
  1. TEAM_SKILL_EMAIL / TEAM_SKILL_PASSWORD (/ TEAM_SKILL_API)
  2. Config file (--config, TASKSYNC_CONFIG, or .sync_config.json next to the binary)
  3. Interactive prompt, optionally saved to the config file

EXIT CODES:
  0  Success (including when no tasks were found)
  1  Error (missing credentials, missing file, login or sync failure)"
)]
pub struct Cli {
    /// Task list file to sync
    #[arg(short = 'f', long, required_unless_present = "clear_config")]
    pub file: Option<PathBuf>,

    /// Remove the stored login configuration and exit
    #[arg(long)]
    pub clear_config: bool,

    /// Path of the stored login configuration
    #[arg(long, env = "TASKSYNC_CONFIG")]
    pub config: Option<PathBuf>,

    /// Parse and print the tasks without logging in or syncing
    #[arg(long)]
    pub dry_run: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Show debug logs on stderr
    #[arg(short, long)]
    pub verbose: bool,
}
