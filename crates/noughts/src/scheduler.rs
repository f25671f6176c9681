//! Liveness and announcement scheduling.
//!
//! Runs once per loop iteration, after any dispatch. Announces open rooms
//! when the announcement cadence fires, then sweeps silent players.

use std::time::{Duration, Instant};

use noughts_tick::{Cadence, TickMetrics};

use crate::{Lobby, Outbound};

/// Time-driven work on top of a [`Lobby`].
pub struct Scheduler {
    announce: Cadence,
}

impl Scheduler {
    /// First announcement is due one `announce_interval` after `now`.
    pub fn new(announce_interval: Duration, now: Instant) -> Self {
        Self {
            announce: Cadence::new(announce_interval, now),
        }
    }

    /// Runs whatever is due as of `now` and returns the messages to send.
    pub fn run_due(&mut self, lobby: &mut Lobby, now: Instant) -> Vec<Outbound> {
        let mut out = Vec::new();
        if let Some(tick) = self.announce.poll(now) {
            tracing::trace!(tick = tick.tick, "periodic announcement");
            out.extend(lobby.announce());
        }
        out.extend(lobby.sweep(now));
        out
    }

    /// How long until the next announcement is due, zero if it already is.
    pub fn time_until_due(&self, now: Instant) -> Duration {
        self.announce.time_until_due(now)
    }

    pub fn announce_metrics(&self) -> &TickMetrics {
        self.announce.metrics()
    }
}
