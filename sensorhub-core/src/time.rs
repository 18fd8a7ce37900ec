//! Time management for the hub
//!
//! Every message carries a `ts` field of monotonic milliseconds since boot,
//! and both the sampling and heartbeat timers compare against the same
//! clock. Boards provide it from a hardware timer; tests and the simulator
//! use `sim::SimClock`.

/// Timestamp in milliseconds since boot
pub type Timestamp = u64;

/// Monotonic millisecond clock
pub trait Clock {
    /// Milliseconds since boot. Must never go backwards.
    fn now_ms(&self) -> Timestamp;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> Timestamp {
        (**self).now_ms()
    }
}

/// Milliseconds elapsed between two readings of the same clock
///
/// Saturates at zero so a misbehaving clock can never make a timer fire
/// early.
#[inline]
pub fn elapsed_ms(earlier: Timestamp, now: Timestamp) -> u64 {
    now.saturating_sub(earlier)
}
