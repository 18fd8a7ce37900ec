//! Constants for the SensorHub core
//!
//! Every timing value, buffer size and sensor-specific magic number used by
//! the firmware lives here, with the datasheet or wire-contract reason it
//! has the value it has.
//!
//! ## Organization
//!
//! - **Timing**: sampling, heartbeat and hardware settle/timeout values
//! - **Protocol**: line protocol sizes and fixed message texts
//! - **Sensors**: bus addresses, register maps and conversion factors

/// Sampling, heartbeat and hardware wait durations.
pub mod timing;

/// Wire protocol sizes and fixed message texts.
pub mod protocol;

/// Sensor addresses, identities and conversion factors.
pub mod sensors;

// Re-export commonly used constants for convenience
pub use timing::{
    DEFAULT_SAMPLE_INTERVAL_MS, MIN_SAMPLE_INTERVAL_MS, HEARTBEAT_INTERVAL_MS,
    ECHO_TIMEOUT_US,
};

pub use protocol::{COMMAND_BUFFER_CAPACITY, LINE_CAPACITY, FLOAT_PRECISION};

pub use sensors::{SPEED_OF_SOUND_CM_PER_US, SEA_LEVEL_PRESSURE_HPA};
