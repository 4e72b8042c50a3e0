//! Async driver
//!
//! Runs a load operation on a tokio interval instead of a game loop. Each
//! period calls `on_frame` (to let a simulated host advance) and then ticks
//! the operation once.

use crate::operation::{LoadOperation, LoadOutcome};
use std::time::Duration;
use tokio::time::{MissedTickBehavior, interval};
use tracing::instrument;

/// Tick `operation` every `period` until it is terminal
#[instrument(skip_all, fields(asset = %operation.asset()))]
pub async fn run_to_completion<F>(
    operation: &mut LoadOperation,
    period: Duration,
    mut on_frame: F,
) -> LoadOutcome
where
    F: FnMut(),
{
    let mut ticker = interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    while !operation.is_done() {
        ticker.tick().await;
        on_frame();
        operation.tick();
    }

    operation.outcome()
}
