use chrono::NaiveDateTime;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::warn;

use crate::models::TaskRecord;

/// Number of lines after a task entry that may carry its detail fields.
pub const DETAIL_WINDOW: usize = 14;

const STAR: char = '⭐';
const COMPLEXITY_LABEL: &str = "复杂度:";

static START_TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"开始时间:\s*(\d{4}-\d{2}-\d{2})\s+(\d{2}[:：]\d{2})")
        .unwrap_or_else(|e| panic!("Invalid start time regex: {e}"))
});

static END_TIME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"完成时间:\s*(\d{4}-\d{2}-\d{2})\s+(\d{2}[:：]\d{2})")
        .unwrap_or_else(|e| panic!("Invalid end time regex: {e}"))
});

static INTERACTIONS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"交互轮次:\s*(\d+)").unwrap_or_else(|e| panic!("Invalid interaction regex: {e}"))
});

static REWORKS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"返工次数:\s*(\d+)").unwrap_or_else(|e| panic!("Invalid rework regex: {e}"))
});

static SCORE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"效率得分:\s*([\d.．]+)").unwrap_or_else(|e| panic!("Invalid score regex: {e}"))
});

/// True for lines that end a detail block: another task entry or any header.
pub fn ends_detail_block(trimmed: &str) -> bool {
    trimmed.starts_with("- [") || trimmed.starts_with("##")
}

/// Apply every field recognized on `line` to `task`. Unrecognized or
/// malformed values leave the existing value untouched.
///
/// ```text
///   - 开始时间: 2024-01-01 09:30
///   - 复杂度: ⭐⭐⭐⭐
///   - 交互轮次: 5
///   - 返工次数: 1
///   - 效率得分: 87.5
///   - 完成时间: 2024-01-01 11:00
/// ```
pub fn apply_detail_line(task: &mut TaskRecord, line: &str) {
    if let Some(ts) = capture_timestamp(&START_TIME, line, "开始时间") {
        task.start_time = ts;
    }

    if line.contains(COMPLEXITY_LABEL) {
        let stars = line.chars().filter(|&c| c == STAR).count();
        if stars > 0 {
            task.complexity = u32::try_from(stars).unwrap_or(u32::MAX);
        }
    }

    if let Some(n) = capture_count(&INTERACTIONS, line, "交互轮次") {
        task.interaction_count = n;
    }

    if let Some(n) = capture_count(&REWORKS, line, "返工次数") {
        task.rework_count = n;
    }

    if let Some(caps) = SCORE.captures(line) {
        match ascii_digits(&caps[1]).parse::<f64>() {
            Ok(score) => task.efficiency_score = Some(score),
            Err(_) => warn!(field = "效率得分", value = &caps[1], "ignoring malformed score"),
        }
    }

    if let Some(ts) = capture_timestamp(&END_TIME, line, "完成时间") {
        task.end_time = Some(ts);
    }
}

/// Normalize `YYYY-MM-DD` + `HH:MM` into `YYYY-MM-DDTHH:MM:00`. Full-width
/// digits are accepted.
pub fn normalize_timestamp(date: &str, time: &str) -> Option<String> {
    let raw = ascii_digits(&format!("{date} {time}"));
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%d %H:%M")
        .ok()
        .map(|dt| dt.format("%Y-%m-%dT%H:%M:%S").to_string())
}

/// Map full-width digits, colon and period to their ASCII forms.
fn ascii_digits(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '０'..='９' => char::from(b'0' + (c as u32 - '０' as u32) as u8),
            '：' => ':',
            '．' => '.',
            other => other,
        })
        .collect()
}

fn capture_timestamp(re: &Regex, line: &str, field: &str) -> Option<String> {
    let caps = re.captures(line)?;
    let ts = normalize_timestamp(&caps[1], &caps[2]);
    if ts.is_none() {
        warn!(field, value = %format!("{} {}", &caps[1], &caps[2]), "ignoring invalid timestamp");
    }
    ts
}

fn capture_count(re: &Regex, line: &str, field: &str) -> Option<u32> {
    let caps = re.captures(line)?;
    let parsed = ascii_digits(&caps[1]).parse().ok();
    if parsed.is_none() {
        warn!(field, value = &caps[1], "ignoring count that is not a valid u32");
    }
    parsed
}
