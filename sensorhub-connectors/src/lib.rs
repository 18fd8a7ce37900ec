//! Host-side connectors for the SensorHub
//!
//! ## Overview
//!
//! The firmware core speaks a line protocol over a byte stream. This crate
//! holds the pieces that live on the other end of that stream, or that run
//! the core on a desktop:
//!
//! - **transport**: core `Transport` implementations over `std::io`
//!   (serial devices opened as files, sockets, pipes) and over an `mpsc`
//!   channel fed by a reader thread
//! - **decode**: typed decoding of every outbound message with serde, for
//!   the upstream aggregator and for tests
//! - **config**: loading a `HubConfig` from a JSON file
//!
//! The `sensorhub-sim` binary ties them together: the core runs against a
//! simulated board, commands come from stdin and messages go to stdout.
//!
//! ## Example Usage
//!
//! ```rust
//! use sensorhub_connectors::decode::{decode_line, HubMessage};
//!
//! let msg = decode_line(r#"{"type":"LOG","ts":12,"message":"PONG"}"#)?;
//! assert_eq!(msg, HubMessage::Log { ts: 12, message: "PONG".into() });
//! # Ok::<(), sensorhub_connectors::decode::DecodeError>(())
//! ```

pub mod config;
pub mod decode;
pub mod transport;

pub use config::load_config;
pub use decode::{decode_line, DecodeError, HubMessage};
pub use transport::{ChannelTransport, IoTransport};

use sensorhub_core::{ConfigError, HubError};
use thiserror::Error;

/// Common connector errors
#[derive(Debug, Error)]
pub enum ConnectorError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed configuration file: {0}")]
    ConfigFormat(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Config(ConfigError),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Hub error: {0}")]
    Hub(HubError<std::io::Error>),
}

impl From<ConfigError> for ConnectorError {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl From<HubError<std::io::Error>> for ConnectorError {
    fn from(err: HubError<std::io::Error>) -> Self {
        Self::Hub(err)
    }
}
