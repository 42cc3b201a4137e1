//! Expiry of transient reveal and message state.
//!
//! Each [`TimerKind`] has at most one pending deadline. Arming replaces the
//! pending one, so a burst of reveals extends the window instead of stacking
//! expiries. Deadlines are tagged with the view generation they were armed
//! in; the caller drops expiries whose generation no longer matches.
//!
//! Time is passed in, never read. The manager is polled from the same tick
//! that drives the rest of the engine.

use std::time::Duration;

/// Default reveal window.
pub const DEFAULT_REVEAL_WINDOW: Duration = Duration::from_secs(3);

/// Default message window.
pub const DEFAULT_MESSAGE_WINDOW: Duration = Duration::from_secs(4);

/// Transient state with a deadline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Revealed cards from a bluff call.
    Reveal,
    /// Server notice.
    Message,
}

/// A deadline that has passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expiry {
    /// Which state expired.
    pub kind: TimerKind,
    /// View generation at arm time.
    pub generation: u64,
}

#[derive(Debug, Clone, Copy)]
struct Pending<I> {
    armed_at: I,
    generation: u64,
}

/// Pending deadlines for reveal and message state.
#[derive(Debug, Clone)]
pub struct TimerManager<I> {
    reveal_window: Duration,
    message_window: Duration,
    reveal: Option<Pending<I>>,
    message: Option<Pending<I>>,
}

impl<I> TimerManager<I>
where
    I: Copy + Ord + std::ops::Sub<Output = Duration>,
{
    /// Create a manager with the given windows.
    pub fn new(reveal_window: Duration, message_window: Duration) -> Self {
        Self { reveal_window, message_window, reveal: None, message: None }
    }

    /// Window length for a kind.
    pub fn window(&self, kind: TimerKind) -> Duration {
        match kind {
            TimerKind::Reveal => self.reveal_window,
            TimerKind::Message => self.message_window,
        }
    }

    /// Start or restart the window for `kind` at `now`.
    pub fn arm(&mut self, kind: TimerKind, now: I, generation: u64) {
        *self.slot(kind) = Some(Pending { armed_at: now, generation });
    }

    /// Drop the pending deadline for `kind`. Returns whether one was pending.
    pub fn cancel(&mut self, kind: TimerKind) -> bool {
        self.slot(kind).take().is_some()
    }

    /// Drop every pending deadline.
    pub fn cancel_all(&mut self) {
        self.reveal = None;
        self.message = None;
    }

    /// True if a deadline is pending for `kind`.
    pub fn is_armed(&self, kind: TimerKind) -> bool {
        match kind {
            TimerKind::Reveal => self.reveal.is_some(),
            TimerKind::Message => self.message.is_some(),
        }
    }

    /// Remove and return every deadline that has passed at `now`.
    ///
    /// Reveal expiries come before message expiries.
    pub fn poll_expired(&mut self, now: I) -> Vec<Expiry> {
        let mut expired = Vec::new();
        for kind in [TimerKind::Reveal, TimerKind::Message] {
            let window = self.window(kind);
            let slot = self.slot(kind);
            if let Some(pending) = *slot
                && now >= pending.armed_at
                && now - pending.armed_at >= window
            {
                *slot = None;
                expired.push(Expiry { kind, generation: pending.generation });
            }
        }
        expired
    }

    /// Time left until the earliest pending deadline.
    pub fn time_until_next(&self, now: I) -> Option<Duration> {
        [(self.reveal, self.reveal_window), (self.message, self.message_window)]
            .into_iter()
            .filter_map(|(pending, window)| {
                let pending = pending?;
                let elapsed = if now >= pending.armed_at {
                    now - pending.armed_at
                } else {
                    Duration::ZERO
                };
                Some(window.saturating_sub(elapsed))
            })
            .min()
    }

    fn slot(&mut self, kind: TimerKind) -> &mut Option<Pending<I>> {
        match kind {
            TimerKind::Reveal => &mut self.reveal,
            TimerKind::Message => &mut self.message,
        }
    }
}

impl<I> Default for TimerManager<I>
where
    I: Copy + Ord + std::ops::Sub<Output = Duration>,
{
    fn default() -> Self {
        Self::new(DEFAULT_REVEAL_WINDOW, DEFAULT_MESSAGE_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Elapsed time since an arbitrary epoch stands in for an instant.
    type Ms = Duration;

    fn ms(n: u64) -> Ms {
        Duration::from_millis(n)
    }

    fn timers() -> TimerManager<Ms> {
        TimerManager::new(ms(3000), ms(4000))
    }

    #[test]
    fn expires_after_window() {
        let mut t = timers();
        t.arm(TimerKind::Reveal, ms(0), 1);

        assert!(t.poll_expired(ms(2999)).is_empty());
        assert_eq!(t.poll_expired(ms(3000)), vec![Expiry { kind: TimerKind::Reveal, generation: 1 }]);
        assert!(!t.is_armed(TimerKind::Reveal));
        assert!(t.poll_expired(ms(9000)).is_empty());
    }

    #[test]
    fn rearm_extends_window() {
        let mut t = timers();
        t.arm(TimerKind::Reveal, ms(0), 1);
        t.arm(TimerKind::Reveal, ms(2000), 1);

        assert!(t.poll_expired(ms(3000)).is_empty());
        assert_eq!(t.poll_expired(ms(5000)).len(), 1);
    }

    #[test]
    fn cancel_prevents_expiry() {
        let mut t = timers();
        t.arm(TimerKind::Message, ms(0), 1);
        assert!(t.cancel(TimerKind::Message));
        assert!(!t.cancel(TimerKind::Message));
        assert!(t.poll_expired(ms(10_000)).is_empty());
    }

    #[test]
    fn kinds_are_independent() {
        let mut t = timers();
        t.arm(TimerKind::Reveal, ms(0), 1);
        t.arm(TimerKind::Message, ms(0), 2);

        let first = t.poll_expired(ms(3500));
        assert_eq!(first, vec![Expiry { kind: TimerKind::Reveal, generation: 1 }]);
        let second = t.poll_expired(ms(4000));
        assert_eq!(second, vec![Expiry { kind: TimerKind::Message, generation: 2 }]);
    }

    #[test]
    fn time_until_next_picks_earliest() {
        let mut t = timers();
        assert_eq!(t.time_until_next(ms(0)), None);

        t.arm(TimerKind::Message, ms(0), 1);
        t.arm(TimerKind::Reveal, ms(500), 1);
        assert_eq!(t.time_until_next(ms(1000)), Some(ms(2500)));
        assert_eq!(t.time_until_next(ms(10_000)), Some(Duration::ZERO));
    }
}
