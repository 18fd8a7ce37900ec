//! Firmware core for the SensorHub
//!
//! Auto-detects which of the supported sensors are wired to the board,
//! streams their readings as line-delimited JSON messages over a serial
//! transport, and interprets a small set of text commands.
//!
//! Key constraints:
//! - Single cooperative thread, no interrupts touching hub state
//! - No heap allocation in the firmware path (fixed-capacity buffers)
//! - Only bounded blocking waits (echo timing, startup settle delays)
//!
//! ```no_run
//! use sensorhub_core::{HubConfig, SensorHub};
//! use sensorhub_core::sim::{MemoryTransport, SimBoard, SimClock};
//!
//! let clock = SimClock::new(0);
//! let mut hub = SensorHub::new(
//!     SimBoard::fully_populated(),
//!     MemoryTransport::new(),
//!     clock.clone(),
//!     HubConfig::default(),
//! ).unwrap();
//!
//! hub.begin().unwrap();
//! loop {
//!     clock.advance(10);
//!     hub.update().unwrap();
//! }
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![deny(unsafe_code)]
#![warn(missing_docs)]

#[cfg(feature = "sim")]
extern crate alloc;

#[macro_use]
mod logging;

pub mod command;
pub mod config;
pub mod constants;
pub mod detector;
pub mod drivers;
pub mod errors;
pub mod hub;
pub mod ports;
pub mod protocol;
pub mod registry;
pub mod sampler;
pub mod time;

#[cfg(feature = "sim")]
pub mod sim;

// Public API
pub use command::{Command, LineBuffer};
pub use config::HubConfig;
pub use detector::Detector;
pub use errors::{CommandError, ConfigError, EncodeError, HubError};
pub use hub::{SensorHub, TickReport};
pub use ports::{Board, Transport};
pub use protocol::{Frame, MessageType};
pub use registry::{Detection, DeviceRegistry, SensorClass, SensorMetadata};
pub use sampler::{Mode, Sample, SamplerState};
pub use time::{Clock, Timestamp};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
