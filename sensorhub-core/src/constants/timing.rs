//! Timing Constants
//!
//! Intervals and bounded waits used by the scheduler loop and the sensor
//! probes. All blocking waits in the firmware are listed here.

// ===== SCHEDULER INTERVALS =====

/// Default sampling interval (milliseconds).
///
/// 1 Hz is the boot-time rate until an operator issues `SET_RATE`.
pub const DEFAULT_SAMPLE_INTERVAL_MS: u32 = 1000;

/// Minimum sampling interval (milliseconds).
///
/// Below this the ultrasonic echo wait (up to 30 ms) plus a one-wire
/// conversion no longer fit comfortably inside one pass.
pub const MIN_SAMPLE_INTERVAL_MS: u32 = 100;

/// Heartbeat interval (milliseconds).
///
/// Fixed, independent of the sampling interval.
pub const HEARTBEAT_INTERVAL_MS: u32 = 5000;

// ===== HARDWARE WAITS =====

/// Settle time after initializing a DHT sensor (milliseconds).
pub const DHT_SETTLE_MS: u32 = 100;

/// Settle time after initializing the one-wire bus (milliseconds).
pub const ONE_WIRE_SETTLE_MS: u32 = 50;

/// Maximum wait for an ultrasonic echo pulse (microseconds).
///
/// 30 ms of round trip is roughly 5 m of range for an HC-SR04.
pub const ECHO_TIMEOUT_US: u32 = 30_000;

/// Trigger line held low before the pulse (microseconds).
pub const TRIGGER_PRE_LOW_US: u32 = 2;

/// Trigger pulse width (microseconds).
///
/// Source: HC-SR04 datasheet (10 µs minimum)
pub const TRIGGER_PULSE_US: u32 = 10;

/// Pause between logging a reset and performing it (milliseconds).
///
/// Gives the UART time to drain the LOG line.
pub const RESET_DELAY_MS: u32 = 100;
