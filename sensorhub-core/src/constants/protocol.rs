//! Line Protocol Constants
//!
//! Buffer sizes and the fixed texts that form part of the wire contract.
//! Upstream consumers match on these strings, so they must not change.

// ===== BUFFER SIZES =====

/// Maximum bytes kept for one inbound command line.
///
/// Excess bytes are silently dropped.
pub const COMMAND_BUFFER_CAPACITY: usize = 120;

/// Capacity of one encoded outbound line (bytes, without the terminator).
///
/// Sized for the worst case the encoder can produce: a full INVENTORY with
/// a 20-digit `ts`, 3-digit pins and eight analog channels is 266 bytes, and
/// a BMP280 DATA line with three `f32::MIN` fields is 257 bytes.
pub const LINE_CAPACITY: usize = 288;

/// Fractional digits for floating-point fields.
pub const FLOAT_PRECISION: usize = 6;

/// Maximum nesting depth of the encoder (root, `sensors`, class object).
pub const MAX_NESTING: usize = 4;

/// Default UART speed (baud).
pub const DEFAULT_BAUD_RATE: u32 = 115_200;

// ===== FIXED MESSAGE TEXTS =====

/// LOG emitted first on boot.
pub const MSG_BOOTING: &str = "Booting Sensor Hub...";

/// LOG reply to `PING`.
pub const MSG_PONG: &str = "PONG";

/// LOG reply to `START`.
pub const MSG_STREAMING_ENABLED: &str = "Streaming enabled";

/// LOG reply to `STOP`.
pub const MSG_STREAMING_PAUSED: &str = "Streaming paused";

/// LOG reply to a valid `SET_RATE`.
pub const MSG_RATE_UPDATED: &str = "Sample rate updated";

/// LOG emitted right before a reset.
pub const MSG_RESETTING: &str = "Resetting...";
