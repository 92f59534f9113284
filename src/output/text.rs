use crate::models::TaskRecord;

pub fn print_task(t: &TaskRecord) {
    println!("  [{}] {} - {}", t.status.as_str(), t.change_id, t.title);
    println!(
        "      complexity={} interactions={} reworks={}",
        t.complexity, t.interaction_count, t.rework_count
    );
    println!("      started: {}", t.start_time);
    if let Some(ref end) = t.end_time {
        println!("      finished: {end}");
    }
    if let Some(score) = t.efficiency_score {
        println!("      efficiency: {score}");
    }
}

pub fn print_task_list(tasks: &[TaskRecord]) {
    for t in tasks {
        print_task(t);
    }
}

pub fn print_found(project: &str, count: usize) {
    println!("Project: {project}");
    println!("Found {count} tasks");
}
