//! Cancellable single-shot round timers for Parlor.
//!
//! Every mini-game advances on a deadline: 60 s per drawing round, 15 s per
//! quiz question, 120 s of spy discussion. A [`RoundTimer`] holds at most one
//! pending deadline and stamps it with two counters:
//!
//! - `epoch`: which mode session the timer belongs to. A new game gets a
//!   new epoch, so an expiry from a finished game can never be mistaken for
//!   one from the current game.
//! - `seq`: bumped on every [`arm`](RoundTimer::arm) and
//!   [`cancel`](RoundTimer::cancel), so re-arming for the next round makes
//!   the previous round's [`Expiry`] stale.
//!
//! # Integration
//!
//! The timer owns no task. It sits inside the room actor's `tokio::select!`
//! loop, which keeps timer firings serialized with inbound events:
//!
//! ```ignore
//! loop {
//!     tokio::select! {
//!         Some(cmd) = cmd_rx.recv() => { /* handle commands */ }
//!         expiry = timer.expired() => {
//!             if timer.fire(expiry) {
//!                 // advance the round
//!             }
//!         }
//!     }
//! }
//! ```

use std::time::Duration;

use tokio::time::{self, Instant};
use tracing::{debug, trace};

// ---------------------------------------------------------------------------
// Expiry
// ---------------------------------------------------------------------------

/// Identifies one armed deadline. Returned by [`RoundTimer::arm`] and
/// yielded by [`RoundTimer::expired`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Expiry {
    /// Mode-session generation the timer was created for.
    pub epoch: u64,
    /// Arm counter within that session.
    pub seq: u64,
}

// ---------------------------------------------------------------------------
// RoundTimer
// ---------------------------------------------------------------------------

/// A cancel-and-replace, single-shot deadline.
///
/// Dropping the timer drops the deadline with it: nothing is spawned, so
/// there is nothing left behind to fire after the owning game ends.
#[derive(Debug)]
pub struct RoundTimer {
    epoch: u64,
    seq: u64,
    deadline: Option<Instant>,
}

impl RoundTimer {
    /// Creates a disarmed timer for the given mode-session generation.
    pub fn new(epoch: u64) -> Self {
        Self {
            epoch,
            seq: 0,
            deadline: None,
        }
    }

    /// Arms the timer to expire `after` from now, replacing any pending
    /// deadline. The previous [`Expiry`] (if any) becomes stale.
    pub fn arm(&mut self, after: Duration) -> Expiry {
        self.seq += 1;
        self.deadline = Some(Instant::now() + after);
        trace!(
            epoch = self.epoch,
            seq = self.seq,
            after_ms = after.as_millis() as u64,
            "round timer armed"
        );
        self.token()
    }

    /// Disarms the timer. Idempotent; a pending [`Expiry`] becomes stale.
    pub fn cancel(&mut self) {
        if self.deadline.take().is_some() {
            self.seq += 1;
            trace!(epoch = self.epoch, seq = self.seq, "round timer cancelled");
        }
    }

    /// Consumes `expiry` if it is the one currently pending.
    ///
    /// Returns `true` exactly once per armed deadline. Stale or foreign
    /// expiries return `false` and leave the timer untouched.
    pub fn fire(&mut self, expiry: Expiry) -> bool {
        if self.current() != Some(expiry) {
            debug!(
                epoch = self.epoch,
                seq = self.seq,
                stale_epoch = expiry.epoch,
                stale_seq = expiry.seq,
                "ignoring stale timer expiry"
            );
            return false;
        }
        self.deadline = None;
        true
    }

    /// Waits until the pending deadline passes and returns its [`Expiry`].
    ///
    /// Does not disarm: call [`fire`](Self::fire) with the result. When the
    /// timer is disarmed this future pends forever, so it is safe as a
    /// `tokio::select!` branch. Cancel-safe.
    pub async fn expired(&self) -> Expiry {
        let Some(deadline) = self.deadline else {
            return std::future::pending().await;
        };
        time::sleep_until(deadline).await;
        self.token()
    }

    /// The pending expiry, or `None` when disarmed.
    pub fn current(&self) -> Option<Expiry> {
        self.deadline.map(|_| self.token())
    }

    /// Whether a deadline is pending.
    pub fn is_armed(&self) -> bool {
        self.deadline.is_some()
    }

    /// Time left until the pending deadline (zero once it has passed).
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|d| d.saturating_duration_since(Instant::now()))
    }

    /// The mode-session generation this timer belongs to.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    fn token(&self) -> Expiry {
        Expiry {
            epoch: self.epoch,
            seq: self.seq,
        }
    }
}
