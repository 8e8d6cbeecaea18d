//! CLI smoke entry point.
//!
//! # Responsibility
//! - Drive the task store through the mock data source end to end.
//! - Print deterministic `key=value` lines for quick local sanity checks.

use chrono::{DateTime, Utc};
use std::process::ExitCode;
use taskdeck_core::{
    core_version, init_logging_from_config, ping, AppConfig, LatencyConfig, MockTaskStore,
    NewTask, StoreResult, Task,
};

const DEMO_TASK_TITLE: &str = "Review pull requests";

#[tokio::main]
async fn main() -> ExitCode {
    println!("taskdeck_core ping={}", ping());
    println!("taskdeck_core version={}", core_version());

    let config = AppConfig::from_env();
    if let Err(err) = init_logging_from_config(&config.logging) {
        eprintln!("logging disabled: {err}");
    }
    println!("backend_configured={}", config.is_backend_configured());

    // The smoke run skips simulated latency.
    let store = MockTaskStore::with_mock_data(LatencyConfig::none());
    match run_demo(&store).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("demo failed: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run_demo(store: &MockTaskStore) -> StoreResult<()> {
    store.fetch_tasks().await?;
    print_stats("after_fetch", store);

    let created = store
        .add_task(NewTask::new(DEMO_TASK_TITLE).category("General"))
        .await?;
    store.toggle_complete(created.id).await?;
    print_stats("after_add", store);

    for task in store.tasks() {
        println!("{}", task_line(&task));
    }

    store.delete_task(created.id).await?;
    store.sign_out().await?;
    println!(
        "signed_out session={} tasks={}",
        store.session().is_some(),
        store.tasks().len()
    );
    Ok(())
}

fn print_stats(label: &str, store: &MockTaskStore) {
    let stats = store.stats();
    println!(
        "{label} total={} completed={} upcoming={} overdue={} progress={}%",
        stats.total, stats.completed, stats.upcoming, stats.overdue, stats.progress
    );
}

fn task_line(task: &Task) -> String {
    let due = task
        .due_date
        .and_then(DateTime::<Utc>::from_timestamp_millis)
        .map(|due| due.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string());
    format!(
        "task id={} done={} due={} title={:?}",
        task.id, task.completed, due, task.title
    )
}
