//! Tick sources driving the poll loop

use std::time::Duration;

use async_trait::async_trait;
use tokio::time::{Interval, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Something that says when to poll next
#[async_trait]
pub trait Ticker: Send {
    /// Wait for the next tick. Returns false once no more ticks will come.
    async fn tick(&mut self) -> bool;
}

/// Ticks immediately, then every `period`, until cancelled
pub struct IntervalTicker {
    interval: Interval,
    cancel: CancellationToken,
}

impl IntervalTicker {
    pub fn new(period: Duration, cancel: CancellationToken) -> Self {
        let mut interval = tokio::time::interval(period.max(Duration::from_millis(1)));
        // A slow tick pushes the schedule back instead of causing a burst
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        Self { interval, cancel }
    }
}

#[async_trait]
impl Ticker for IntervalTicker {
    async fn tick(&mut self) -> bool {
        if self.cancel.is_cancelled() {
            return false;
        }
        tokio::select! {
            _ = self.interval.tick() => true,
            _ = self.cancel.cancelled() => {
                tracing::debug!("Ticker cancelled");
                false
            }
        }
    }
}

/// Fires a fixed number of ticks back to back, then stops
#[derive(Debug, Clone)]
pub struct CountedTicker {
    remaining: usize,
}

impl CountedTicker {
    pub fn new(ticks: usize) -> Self {
        Self { remaining: ticks }
    }

    pub fn remaining(&self) -> usize {
        self.remaining
    }
}

#[async_trait]
impl Ticker for CountedTicker {
    async fn tick(&mut self) -> bool {
        if self.remaining == 0 {
            return false;
        }
        self.remaining -= 1;
        true
    }
}
