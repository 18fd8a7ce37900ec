//! Line protocol - flat JSON-like messages, one per line
//!
//! ## Overview
//!
//! Everything the hub says goes out as a single line:
//!
//! ```text
//! {"type":"INVENTORY","ts":12,"sensors":{"DHT":{"model":"DHT22"},"ANALOG":{"channels":["14"]}}}
//! {"type":"DATA","ts":1012,"sensor":"DHT","values":{"temperature_c":22.500000,"humidity_pct":41.000000}}
//! {"type":"HEARTBEAT","ts":5000,"interval_ms":1000,"mode":"STREAMING"}
//! {"type":"LOG","ts":5100,"message":"PONG"}
//! {"type":"ERROR","ts":5200,"message":"Unknown command"}
//! ```
//!
//! ## Wire Contract
//!
//! - `type` then `ts` are always the first two fields
//! - floats carry exactly six fractional digits, integers none
//! - strings are emitted verbatim; they only ever come from fixed literals
//!   and formatted numbers, so no escaping is performed
//! - the only nesting is INVENTORY's `sensors` map, the per-class metadata
//!   objects inside it, ANALOG's `channels` list and DATA's `values` object
//!
//! Lines are assembled in a fixed-capacity buffer (`Frame`) and handed to
//! the transport whole, so a partially written message never reaches the
//! link.

mod frame;
pub mod messages;

pub use frame::{Frame, Line};

/// Message discriminator carried in the `type` field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MessageType {
    /// One sensor reading
    Data,
    /// Detected sensors
    Inventory,
    /// Periodic liveness and sampler status
    Heartbeat,
    /// Informational text, including command acknowledgements
    Log,
    /// Rejected command
    Error,
}

impl MessageType {
    /// Value of the `type` field
    pub const fn as_str(&self) -> &'static str {
        match self {
            MessageType::Data => "DATA",
            MessageType::Inventory => "INVENTORY",
            MessageType::Heartbeat => "HEARTBEAT",
            MessageType::Log => "LOG",
            MessageType::Error => "ERROR",
        }
    }
}

/// Typed numeric payload value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Number {
    /// Encoded with six fractional digits
    Float(f32),
    /// Encoded without a fractional part
    Int(i64),
}
