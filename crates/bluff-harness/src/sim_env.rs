//! Virtual-clock environment.
//!
//! [`SimEnv`] implements [`Environment`] with a clock that only moves when
//! a test calls [`SimEnv::advance`] or awaits [`Environment::sleep`]. Clones
//! share the clock, so a driver and the client it feeds always agree on
//! `now`.

use std::{
    ops::{Add, Sub},
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::Duration,
};

use bluff_core::Environment;

/// Point on the virtual timeline, measured from the simulation start.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SimInstant(Duration);

impl SimInstant {
    /// The simulation start.
    pub const START: Self = Self(Duration::ZERO);

    /// Time elapsed since the simulation start.
    pub fn since_start(self) -> Duration {
        self.0
    }
}

impl Sub for SimInstant {
    type Output = Duration;

    fn sub(self, rhs: Self) -> Duration {
        self.0.saturating_sub(rhs.0)
    }
}

impl Add<Duration> for SimInstant {
    type Output = Self;

    fn add(self, rhs: Duration) -> Self {
        Self(self.0.saturating_add(rhs))
    }
}

/// Deterministic environment for simulation.
#[derive(Debug, Clone, Default)]
pub struct SimEnv {
    elapsed_nanos: Arc<AtomicU64>,
}

impl SimEnv {
    /// New environment with the clock at [`SimInstant::START`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward.
    pub fn advance(&self, by: Duration) {
        let nanos = u64::try_from(by.as_nanos()).unwrap_or(u64::MAX);
        let _ = self.elapsed_nanos.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |current| {
            Some(current.saturating_add(nanos))
        });
    }
}

impl Environment for SimEnv {
    type Instant = SimInstant;

    fn now(&self) -> SimInstant {
        SimInstant(Duration::from_nanos(self.elapsed_nanos.load(Ordering::SeqCst)))
    }

    /// Sleeping jumps the clock and completes immediately.
    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send {
        self.advance(duration);
        std::future::ready(())
    }
}
