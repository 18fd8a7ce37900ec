//! Error Types for the Hub
//!
//! ## Design Philosophy
//!
//! The hub runs on a microcontroller with a few kilobytes of RAM, so every
//! error here is small, `Copy` where possible, and carries only
//! `&'static str` context:
//!
//! 1. **No Heap Allocation**: error text is a fixed literal that can be
//!    written straight onto the wire.
//! 2. **Advisory vs. fatal**: sensor absence and transient read failures are
//!    not errors at all. They never show up here.
//! 3. **Propagated, not swallowed**: transport failures bubble up through
//!    `SensorHub::update` so the board loop decides what to do.
//!
//! ## Error Categories
//!
//! ### Operator errors (reported on the wire as ERROR messages)
//! - `CommandError`: bad `SET_RATE` argument, unknown command
//!
//! ### Build-time / setup errors
//! - `ConfigError`: wiring or timing configuration rejected at startup
//!
//! ### Runtime errors (returned to the caller)
//! - `EncodeError`: a message did not fit the line buffer
//! - `HubError`: transport failure or encode failure during a tick

use thiserror_no_std::Error;

/// Rejected operator command
///
/// Each variant maps to the exact text sent back in an ERROR message.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    /// `SET_RATE` with no argument
    #[error("SET_RATE requires value")]
    MissingRateValue,

    /// `SET_RATE` argument is not a non-negative integer
    #[error("SET_RATE requires integer value")]
    InvalidRateValue,

    /// `SET_RATE` argument under the bus timing floor
    #[error("SET_RATE too low (min 100 ms)")]
    RateTooLow {
        /// The rejected interval in milliseconds
        requested: u32,
    },

    /// Anything outside the command grammar
    #[error("Unknown command")]
    Unknown,
}

impl CommandError {
    /// Fixed text carried by the ERROR message
    pub const fn message(&self) -> &'static str {
        match self {
            Self::MissingRateValue => "SET_RATE requires value",
            Self::InvalidRateValue => "SET_RATE requires integer value",
            Self::RateTooLow { .. } => "SET_RATE too low (min 100 ms)",
            Self::Unknown => "Unknown command",
        }
    }
}

/// Message encoding failure
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncodeError {
    /// The message does not fit the fixed-capacity line buffer
    #[error("Encoded line exceeds {capacity} bytes")]
    LineTooLong {
        /// Capacity of the line buffer in bytes
        capacity: usize,
    },
}

/// Configuration rejected at startup
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// Default sampling interval is under the bus timing floor
    #[error("Sample interval {interval_ms} ms below minimum {min_ms} ms")]
    IntervalBelowFloor {
        /// Configured interval
        interval_ms: u32,
        /// Minimum allowed interval
        min_ms: u32,
    },

    /// A link speed of zero cannot be configured on the UART
    #[error("Baud rate must be non-zero")]
    ZeroBaudRate,

    /// Heartbeat interval of zero would flood the link
    #[error("Heartbeat interval must be non-zero")]
    ZeroHeartbeat,

    /// Two roles were bound to the same pin
    #[error("Pin {pin} bound twice: {reason}")]
    PinConflict {
        /// The shared pin
        pin: u8,
        /// Which binding collided
        reason: &'static str,
    },

    /// Barometer binding lists no candidate addresses
    #[error("Barometer binding has no I2C addresses")]
    NoBarometerAddress,
}

/// Failure during a scheduler tick or the boot sequence
#[derive(Error, Debug, Clone, PartialEq)]
pub enum HubError<E: core::fmt::Debug> {
    /// The transport refused a write or a read failed
    #[error("Transport error: {0:?}")]
    Transport(E),

    /// A message could not be encoded
    #[error("Encode error: {0}")]
    Encode(EncodeError),
}

impl<E: core::fmt::Debug> From<EncodeError> for HubError<E> {
    fn from(err: EncodeError) -> Self {
        Self::Encode(err)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for CommandError {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(fmt, "{}", self.message())
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for ConfigError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::IntervalBelowFloor { interval_ms, min_ms } =>
                defmt::write!(fmt, "Interval {} ms below {} ms", interval_ms, min_ms),
            Self::ZeroBaudRate =>
                defmt::write!(fmt, "Zero baud rate"),
            Self::ZeroHeartbeat =>
                defmt::write!(fmt, "Zero heartbeat interval"),
            Self::PinConflict { pin, reason } =>
                defmt::write!(fmt, "Pin {} bound twice: {}", pin, reason),
            Self::NoBarometerAddress =>
                defmt::write!(fmt, "No barometer address"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_error_text_matches_display() {
        let errors = [
            CommandError::MissingRateValue,
            CommandError::InvalidRateValue,
            CommandError::RateTooLow { requested: 50 },
            CommandError::Unknown,
        ];
        for err in errors {
            assert_eq!(format!("{}", err), err.message());
        }
    }

    #[test]
    fn encode_error_converts_into_hub_error() {
        let err: HubError<()> = EncodeError::LineTooLong { capacity: 256 }.into();
        assert_eq!(err, HubError::Encode(EncodeError::LineTooLong { capacity: 256 }));
    }
}
