//! Periodic expiry sweeps.
//!
//! The scheduler owns no lifecycle state: it only pushes
//! `CheckEndedVotes` commands through a [`LifecycleHandle`] at a fixed
//! cadence and waits for each sweep to finish before scheduling the next,
//! so sweeps never overlap. Expiry is evaluated against stored end times on
//! every pass, which makes a missed tick harmless.

use crate::use_cases::actor::LifecycleHandle;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// How often ended votes are swept for.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(60);

/// Grace period before the first sweep, giving the platform connection time
/// to settle after startup.
pub const DEFAULT_STARTUP_DELAY: Duration = Duration::from_secs(5);

/// Periodically asks the lifecycle to finalize ended votes.
pub struct ExpiryScheduler {
    handle: LifecycleHandle,
    poll_interval: Duration,
    startup_delay: Duration,
    cancel: CancellationToken,
}

impl ExpiryScheduler {
    pub fn new(handle: LifecycleHandle) -> Self {
        Self {
            handle,
            poll_interval: DEFAULT_POLL_INTERVAL,
            startup_delay: DEFAULT_STARTUP_DELAY,
            cancel: CancellationToken::new(),
        }
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub fn with_startup_delay(mut self, startup_delay: Duration) -> Self {
        self.startup_delay = startup_delay;
        self
    }

    /// Stop sweeping when `cancel` is triggered.
    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Sweep until the lifecycle queue shuts down.
    ///
    /// The first sweep runs right after the startup delay; later sweeps are
    /// spaced `poll_interval` apart, measured from sweep start.
    pub async fn run(self) {
        info!(
            poll_interval_secs = self.poll_interval.as_secs(),
            "expiry scheduler started"
        );
        tokio::select! {
            _ = self.cancel.cancelled() => return,
            _ = tokio::time::sleep(self.startup_delay) => {}
        }

        let mut ticker = tokio::time::interval(self.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = self.cancel.cancelled() => {
                    debug!("expiry scheduler cancelled");
                    return;
                }
                _ = ticker.tick() => {}
            }
            if !self.handle.check_ended_votes().await {
                debug!("lifecycle queue gone; expiry scheduler stopping");
                return;
            }
        }
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }
}
