//! ScheduleHandle - owned repeating timer

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error};

/// Handle to a running timer task
///
/// Acquired on start, released by `cancel`.
pub struct ScheduleHandle {
    token: CancellationToken,
    join: JoinHandle<u64>,
}

impl ScheduleHandle {
    /// Call `on_tick` every `period`, starting one `period` from now
    ///
    /// `on_tick` receives the 1-based tick number. It runs on the timer task
    /// and must not block; long work belongs in a spawned task.
    ///
    /// # Panics
    /// If `period` is zero.
    pub fn every<F>(period: Duration, mut on_tick: F) -> Self
    where
        F: FnMut(u64) + Send + 'static,
    {
        let token = CancellationToken::new();
        let cancelled = token.clone();

        let join = tokio::spawn(async move {
            let mut timer = interval_at(Instant::now() + period, period);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

            let mut fired = 0u64;
            loop {
                tokio::select! {
                    biased;
                    _ = cancelled.cancelled() => break,
                    _ = timer.tick() => {
                        fired += 1;
                        on_tick(fired);
                    }
                }
            }
            debug!(ticks = fired, "Timer stopped");
            fired
        });

        Self { token, join }
    }

    /// Whether the timer is still registered
    pub fn is_active(&self) -> bool {
        !self.token.is_cancelled() && !self.join.is_finished()
    }

    /// Stop the timer, returns the number of ticks it fired
    ///
    /// No tick fires after this returns.
    pub async fn cancel(self) -> u64 {
        self.token.cancel();
        match self.join.await {
            Ok(fired) => fired,
            Err(e) => {
                error!(error = ?e, "Timer task panicked");
                0
            }
        }
    }
}
