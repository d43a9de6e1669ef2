//! Optional background expiry pass.
//!
//! The registry expires state lazily, on `/list` and `/status/{id}`.  When a
//! sweep interval is configured this task also calls
//! [`Registry::sweep`] periodically, so abandoned requests and silent
//! devices are cleared even if nobody asks about them.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info};

use presence_core::Registry;

/// Spawns the sweeper.  It exits on its own once `running` is cleared.
pub fn spawn_sweeper(
    registry: Arc<Registry>,
    every: Duration,
    running: Arc<AtomicBool>,
) -> JoinHandle<()> {
    info!("registry sweeper running every {every:?}");
    tokio::spawn(async move {
        let mut ticker = interval(every);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately; skip it so the first sweep
        // happens one full interval after startup.
        ticker.tick().await;

        while running.load(Ordering::Relaxed) {
            ticker.tick().await;
            let report = registry.sweep();
            debug!(
                evicted = report.evicted,
                expired = report.expired,
                "sweep complete"
            );
        }
        debug!("registry sweeper stopped");
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use presence_core::{ManualClock, TimeoutPolicy};

    #[tokio::test]
    async fn test_sweeper_evicts_silent_devices() {
        // Arrange: one device, already stale by the registry's clock.
        let clock = Arc::new(ManualClock::new());
        let registry = Arc::new(Registry::with_clock(
            TimeoutPolicy::default(),
            clock.clone(),
        ));
        registry.register("dev1", "10.0.0.1", None).unwrap();
        clock.advance(Duration::from_secs(21));
        let running = Arc::new(AtomicBool::new(true));

        // Act
        let handle = spawn_sweeper(
            Arc::clone(&registry),
            Duration::from_millis(10),
            Arc::clone(&running),
        );
        tokio::time::sleep(Duration::from_millis(100)).await;
        running.store(false, Ordering::Relaxed);
        tokio::time::timeout(Duration::from_secs(1), handle)
            .await
            .expect("sweeper must stop")
            .expect("sweeper must not panic");

        // Assert: removed without any /list call.
        assert!(registry.is_empty());
    }
}
