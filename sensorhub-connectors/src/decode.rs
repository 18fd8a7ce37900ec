//! Typed decoding of the outbound line protocol
//!
//! Each line is one JSON object whose `type` field selects the shape. The
//! decoder also enforces the framing rule the aggregator relies on for
//! cheap routing: `type` and `ts` are the first two fields.

use std::collections::BTreeMap;
use std::io::BufRead;

use serde::Deserialize;
use thiserror::Error;

/// Decoding failure
#[derive(Debug, Error)]
pub enum DecodeError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Line does not start with type and ts: {line}")]
    LeadingFields { line: String },

    #[error("Read error: {0}")]
    Io(#[from] std::io::Error),
}

/// Sampler mode in HEARTBEAT
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum StreamMode {
    Streaming,
    Paused,
}

/// One INVENTORY metadata value
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    /// Model, bus or pin description
    Text(String),
    /// Analog channel list
    List(Vec<String>),
}

/// Any message the hub emits
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum HubMessage {
    /// One sensor reading
    Data {
        ts: u64,
        sensor: String,
        values: BTreeMap<String, f64>,
    },
    /// Detected sensors with their metadata
    Inventory {
        ts: u64,
        sensors: BTreeMap<String, BTreeMap<String, MetadataValue>>,
    },
    /// Liveness and sampler status
    Heartbeat {
        ts: u64,
        interval_ms: u32,
        mode: StreamMode,
    },
    /// Informational text
    Log { ts: u64, message: String },
    /// Rejected command
    Error { ts: u64, message: String },
}

impl HubMessage {
    /// Milliseconds since hub boot
    pub fn ts(&self) -> u64 {
        match self {
            HubMessage::Data { ts, .. }
            | HubMessage::Inventory { ts, .. }
            | HubMessage::Heartbeat { ts, .. }
            | HubMessage::Log { ts, .. }
            | HubMessage::Error { ts, .. } => *ts,
        }
    }

    /// Value of the `type` field
    pub fn kind(&self) -> &'static str {
        match self {
            HubMessage::Data { .. } => "DATA",
            HubMessage::Inventory { .. } => "INVENTORY",
            HubMessage::Heartbeat { .. } => "HEARTBEAT",
            HubMessage::Log { .. } => "LOG",
            HubMessage::Error { .. } => "ERROR",
        }
    }
}

/// Decode one line; a trailing line terminator is ignored
pub fn decode_line(line: &str) -> Result<HubMessage, DecodeError> {
    let line = line.trim_end_matches(['\r', '\n']);
    if !has_leading_fields(line) {
        return Err(DecodeError::LeadingFields { line: line.to_string() });
    }
    Ok(serde_json::from_str(line)?)
}

fn has_leading_fields(line: &str) -> bool {
    let Some(rest) = line.strip_prefix(r#"{"type":""#) else {
        return false;
    };
    match rest.find('"') {
        Some(end) => rest[end..].starts_with(r#"","ts":"#),
        None => false,
    }
}

/// Decode every non-blank line of a stream
pub fn decode_lines<R: BufRead>(reader: R) -> impl Iterator<Item = Result<HubMessage, DecodeError>> {
    reader.lines().filter_map(|line| match line {
        Ok(line) if line.trim().is_empty() => None,
        Ok(line) => Some(decode_line(&line)),
        Err(err) => Some(Err(err.into())),
    })
}
