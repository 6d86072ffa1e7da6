//! Background refresh task.
//!
//! [`spawn_refresh`] reloads once immediately and then on every interval
//! tick, regardless of whether the previous attempt succeeded. There is no
//! backoff and no retry between ticks. The task runs until its
//! [`CancellationToken`] is cancelled.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::loader::SnapshotLoader;

/// Default time between reloads.
pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(1800);

/// Shortest accepted interval; [`tokio::time::interval`] rejects zero.
const MIN_REFRESH_INTERVAL: Duration = Duration::from_millis(1);

/// Spawn the periodic reload loop on the current Tokio runtime.
///
/// Cancellation is observed between reloads. A reload already in flight
/// runs to completion (or to the HTTP client's timeout) before the task
/// exits.
pub fn spawn_refresh(
    loader: Arc<SnapshotLoader>,
    every: Duration,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    let every = every.max(MIN_REFRESH_INTERVAL);

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(interval_secs = every.as_secs(), "catalog refresh task started");

        loop {
            tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            if loader.reload().await.is_err() {
                warn!(
                    ready = loader.store().is_ready(),
                    "serving previous snapshot until next refresh"
                );
            }
        }

        info!("catalog refresh task stopped");
    })
}
