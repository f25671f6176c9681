//! Wall-clock cadence for periodic server work in Noughts.
//!
//! The server loop wakes at least once per receive timeout. On each wake it
//! asks a [`Cadence`] whether a period has elapsed; if so, it runs the
//! periodic job (the room announcement) once.
//!
//! A cadence never sleeps and never reads the clock itself. The caller
//! passes `now`, which keeps the loop single-threaded and lets tests step
//! time by hand.
//!
//! # Integration
//!
//! ```ignore
//! loop {
//!     let datagram = transport.recv_timeout(recv_timeout).await?;
//!     // ... dispatch ...
//!     if cadence.poll(Instant::now()).is_some() {
//!         lobby.announce();
//!     }
//! }
//! ```
//!
//! # Overruns
//!
//! If the loop was held up for several periods, a single tick fires and
//! the next one is scheduled a full period after `now`. Missed periods are
//! counted in [`TickInfo::ticks_skipped`], never replayed.

use std::time::{Duration, Instant};

use tracing::{debug, trace, warn};

/// Shortest period a cadence will accept.
pub const MIN_PERIOD: Duration = Duration::from_millis(1);

// ---------------------------------------------------------------------------
// Tick info (returned to caller each tick)
// ---------------------------------------------------------------------------

/// Information about a fired tick, returned by [`Cadence::poll`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickInfo {
    /// Monotonically increasing tick number (starts at 1).
    pub tick: u64,
    /// The configured period.
    pub dt: Duration,
    /// `true` if this tick fired a full period or more past its deadline.
    pub overrun: bool,
    /// How many whole periods were skipped.
    pub ticks_skipped: u64,
}

// ---------------------------------------------------------------------------
// Metrics
// ---------------------------------------------------------------------------

/// Running totals for a cadence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickMetrics {
    /// Total ticks fired.
    pub total_ticks: u64,
    /// Total ticks that fired late enough to skip a period.
    pub total_overruns: u64,
    /// Total periods skipped.
    pub total_skipped: u64,
    /// Largest delay between a deadline and the poll that noticed it.
    pub max_lateness: Duration,
}

// ---------------------------------------------------------------------------
// Cadence
// ---------------------------------------------------------------------------

/// Fires at most once per period, driven by the caller's clock.
#[derive(Debug, Clone)]
pub struct Cadence {
    period: Duration,
    next_due: Instant,
    tick_count: u64,
    metrics: TickMetrics,
}

impl Cadence {
    /// A cadence whose first tick is due one `period` after `now`.
    ///
    /// Periods shorter than [`MIN_PERIOD`] are raised to it.
    pub fn new(period: Duration, now: Instant) -> Self {
        let period = if period < MIN_PERIOD {
            warn!(
                period_ms = period.as_secs_f64() * 1000.0,
                min_ms = MIN_PERIOD.as_secs_f64() * 1000.0,
                "cadence period too short, clamping"
            );
            MIN_PERIOD
        } else {
            period
        };

        debug!(period_ms = period.as_millis() as u64, "cadence created");

        Self {
            period,
            next_due: now + period,
            tick_count: 0,
            metrics: TickMetrics::default(),
        }
    }

    /// Fires a tick if the deadline has passed as of `now`.
    ///
    /// Returns `None` before the deadline. A `now` earlier than a previous
    /// call is tolerated and simply does not fire.
    pub fn poll(&mut self, now: Instant) -> Option<TickInfo> {
        if now < self.next_due {
            return None;
        }

        let late_by = now.duration_since(self.next_due);
        let ticks_skipped = (late_by.as_nanos() / self.period.as_nanos()) as u64;
        let overrun = ticks_skipped > 0;

        self.tick_count += 1;
        self.next_due = now + self.period;

        if overrun {
            warn!(
                tick = self.tick_count,
                skipped = ticks_skipped,
                late_ms = late_by.as_secs_f64() * 1000.0,
                "cadence overrun, skipping ahead"
            );
            self.metrics.total_overruns += 1;
        }
        self.metrics.total_ticks += 1;
        self.metrics.total_skipped += ticks_skipped;
        self.metrics.max_lateness = self.metrics.max_lateness.max(late_by);

        trace!(tick = self.tick_count, overrun, "cadence fired");

        Some(TickInfo {
            tick: self.tick_count,
            dt: self.period,
            overrun,
            ticks_skipped,
        })
    }

    /// How long until the next tick is due, zero if it already is.
    pub fn time_until_due(&self, now: Instant) -> Duration {
        self.next_due.saturating_duration_since(now)
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Snapshot of current metrics.
    pub fn metrics(&self) -> &TickMetrics {
        &self.metrics
    }
}
