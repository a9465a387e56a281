//! Background expiry sweep

use chrono::{DateTime, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use wordhint_core::SessionStore;

/// Spawn a task sweeping expired sessions every `period`
///
/// The task runs until aborted.
pub fn spawn_sweeper(store: Arc<SessionStore>, period: Duration) -> JoinHandle<()> {
    spawn_sweeper_with_clock(store, period, Utc::now)
}

/// As [`spawn_sweeper`], reading the current time from `clock`
pub fn spawn_sweeper_with_clock<C>(
    store: Arc<SessionStore>,
    period: Duration,
    clock: C,
) -> JoinHandle<()>
where
    C: Fn() -> DateTime<Utc> + Send + 'static,
{
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // first tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;
            store.sweep(clock());
        }
    })
}
