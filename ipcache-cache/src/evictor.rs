//! Background task that flushes the entry map on a fixed period.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::entries::EntryMap;

/// Owned handle to the eviction task.
///
/// The task stops when [`Evictor::stop`] is called or when the evictor is
/// dropped (the shutdown channel closes).
#[derive(Debug)]
pub(crate) struct Evictor {
    shutdown_tx: broadcast::Sender<()>,
    handle: Mutex<Option<JoinHandle<()>>>,
    period: Duration,
}

impl Evictor {
    /// Spawns the eviction loop on `runtime`.
    ///
    /// The first flush happens one full `period` after spawning.
    pub(crate) fn spawn(entries: Arc<EntryMap>, period: Duration, runtime: &Handle) -> Self {
        let (shutdown_tx, mut shutdown_rx) = broadcast::channel(1);

        let handle = runtime.spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            info!(
                period_ms = period.as_millis() as u64,
                "Started cache eviction"
            );

            loop {
                tokio::select! {
                    _ = interval.tick() => {
                        let dropped = entries.flush();
                        debug!(dropped, epoch = entries.epoch(), "Flushed cache");
                    }

                    // Explicit stop, or every sender dropped
                    _ = shutdown_rx.recv() => {
                        break;
                    }
                }
            }

            info!("Cache eviction stopped");
        });

        Self {
            shutdown_tx,
            handle: Mutex::new(Some(handle)),
            period,
        }
    }

    /// Signals the loop to stop and waits for it to finish. Idempotent.
    pub(crate) async fn stop(&self) {
        let Some(handle) = self.handle.lock().take() else {
            return;
        };

        // No receiver means the task already exited
        let _ = self.shutdown_tx.send(());

        if let Err(e) = handle.await {
            warn!(error = %e, "Eviction task ended abnormally");
        }
    }

    pub(crate) fn is_running(&self) -> bool {
        self.handle
            .lock()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    pub(crate) fn period(&self) -> Duration {
        self.period
    }
}
