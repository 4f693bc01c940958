//! Cancellable background tasks.
//!
//! Cache sweeps and metrics reporting run on fixed intervals, concurrent
//! with foreground request handling. Each timer is owned by the component
//! that starts it and stops cleanly through [`BackgroundTask::shutdown`],
//! which signals the task and joins it so no work outlives its owner.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

/// Handle to a periodic background task.
///
/// Dropping the handle also stops the task (the shutdown channel closes),
/// but [`shutdown`](Self::shutdown) additionally waits for the in-flight
/// tick to finish.
pub struct BackgroundTask {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl BackgroundTask {
    /// Spawn a task that runs `tick` every `period` until shut down.
    ///
    /// Requires a tokio runtime context.
    pub(crate) fn spawn_periodic<F>(name: &'static str, period: Duration, mut tick: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        let (shutdown, mut rx) = watch::channel(false);
        let handle = tokio::spawn(async move {
            let mut timer = tokio::time::interval(period);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = timer.tick() => tick(),
                    _ = rx.changed() => break,
                }
            }
            debug!(task = name, "background task stopped");
        });
        Self { shutdown, handle }
    }

    /// Signal the task to stop and wait for it to finish.
    pub async fn shutdown(self) {
        let _ = self.shutdown.send(true);
        let _ = self.handle.await;
    }
}
