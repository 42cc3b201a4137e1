//! Environment abstraction for deterministic testing.
//!
//! Decouples the engine from the system clock. Production uses real time,
//! simulation uses a virtual clock that only moves when the test says so, so
//! reveal and message expiry can be exercised without sleeping.

use std::time::Duration;

/// Abstract environment providing time and async sleep.
///
/// # Invariants
///
/// Implementations MUST guarantee that `now()` never goes backwards.
pub trait Environment: Clone + Send + Sync + 'static {
    /// The specific instant type used by this environment.
    ///
    /// Production environments use `std::time::Instant`, while simulation
    /// environments use virtual time.
    type Instant: Copy + Ord + Send + Sync + std::fmt::Debug + std::ops::Sub<Output = Duration>;

    /// Current time (monotonic).
    fn now(&self) -> Self::Instant;

    /// Sleeps for the specified duration.
    ///
    /// Only driver code awaits this; engine logic takes time as an argument.
    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send;
}
