//! Periodic recurrence sweep ticker.

use std::time::Duration;

use engine::Engine;

/// Runs the reset sweep every `interval_minutes`, forever.
///
/// Failures are logged and the ticker keeps going; a broken task never
/// stops the schedule.
pub async fn run(engine: Engine, interval_minutes: u64) {
    let mut ticker = tokio::time::interval(Duration::from_secs(interval_minutes * 60));
    // The first tick completes immediately; consume it so the sweep waits
    // a full period after startup.
    ticker.tick().await;

    loop {
        ticker.tick().await;
        match engine.run_reset_sweep().await {
            Ok(report) => {
                tracing::info!(
                    "sweep finished: {} users, {} scanned, {} reset, {} skipped",
                    report.users,
                    report.scanned,
                    report.reset,
                    report.skipped
                );
                for failure in &report.failures {
                    tracing::warn!(
                        "sweep could not reset task {}: {}",
                        failure.task_id,
                        failure.error
                    );
                }
            }
            Err(err) => tracing::error!("sweep failed: {err}"),
        }
    }
}
