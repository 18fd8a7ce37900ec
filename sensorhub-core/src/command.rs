//! Command interpreter
//!
//! Inbound bytes are collected into lines by `LineBuffer`, parsed into a
//! `Command`, then applied to the sampler state. Applying a command yields a
//! `Reply` telling the scheduler what to put on the wire; commands never
//! write to the transport themselves.
//!
//! ```text
//! PING | INVENTORY | START | STOP | SET_RATE <ms> | STATUS | RESET
//! ```
//!
//! Matching is case-insensitive on whole, whitespace-separated tokens.

use core::fmt;
use core::str::FromStr;

use heapless::Vec;

use crate::constants::protocol::{
    COMMAND_BUFFER_CAPACITY, MSG_PONG, MSG_RATE_UPDATED, MSG_STREAMING_ENABLED,
    MSG_STREAMING_PAUSED,
};
use crate::errors::CommandError;
use crate::sampler::SamplerState;

/// A raw inbound line, without terminator
pub type RawLine = Vec<u8, COMMAND_BUFFER_CAPACITY>;

/// Accumulates inbound bytes into lines
///
/// Bytes past the capacity are dropped until the next terminator. `\n` and
/// `\r` both terminate, and an empty line is never yielded, so CRLF input
/// produces one line.
#[derive(Debug, Default)]
pub struct LineBuffer {
    buf: RawLine,
}

impl LineBuffer {
    /// Empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one byte; returns the completed line on a terminator
    pub fn push(&mut self, byte: u8) -> Option<RawLine> {
        match byte {
            b'\n' | b'\r' => {
                if self.buf.is_empty() {
                    None
                } else {
                    Some(core::mem::take(&mut self.buf))
                }
            }
            _ => {
                // Overflow is silently dropped
                let _ = self.buf.push(byte);
                None
            }
        }
    }

    /// Bytes buffered so far
    pub fn pending(&self) -> &[u8] {
        &self.buf
    }

    /// Discard any partial line
    pub fn clear(&mut self) {
        self.buf.clear();
    }
}

/// Parsed operator command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Liveness check
    Ping,
    /// Re-send the detection results
    Inventory,
    /// Resume streaming
    Start,
    /// Pause streaming
    Stop,
    /// Change the sampling interval (ms); the floor is checked when applied
    SetRate(u32),
    /// INVENTORY followed by HEARTBEAT
    Status,
    /// Reinitialize and re-run detection
    Reset,
}

impl Command {
    /// Parse a raw line
    ///
    /// Returns `None` for a blank line, which gets no reply. Bytes that are
    /// not valid UTF-8 cannot form a command and parse as unknown.
    pub fn from_line(raw: &[u8]) -> Option<Result<Command, CommandError>> {
        let text = match core::str::from_utf8(raw) {
            Ok(text) => text.trim(),
            Err(_) => return Some(Err(CommandError::Unknown)),
        };
        if text.is_empty() {
            None
        } else {
            Some(text.parse())
        }
    }

    /// Apply to the sampler state and say what to emit
    ///
    /// On error the state is left untouched.
    pub fn apply(self, state: &mut SamplerState) -> Reply {
        match self {
            Command::Ping => Reply::Log(MSG_PONG),
            Command::Inventory => Reply::Inventory,
            Command::Start => {
                state.set_streaming(true);
                Reply::Log(MSG_STREAMING_ENABLED)
            }
            Command::Stop => {
                state.set_streaming(false);
                Reply::Log(MSG_STREAMING_PAUSED)
            }
            Command::SetRate(interval_ms) => match state.set_sample_interval(interval_ms) {
                Ok(()) => Reply::Log(MSG_RATE_UPDATED),
                Err(err) => Reply::Error(err),
            },
            Command::Status => Reply::Status,
            Command::Reset => Reply::Reset,
        }
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut tokens = line.split_ascii_whitespace();
        let keyword = tokens.next().ok_or(CommandError::Unknown)?;

        if keyword.eq_ignore_ascii_case("SET_RATE") {
            let value = tokens.next().ok_or(CommandError::MissingRateValue)?;
            if tokens.next().is_some() {
                return Err(CommandError::InvalidRateValue);
            }
            let interval_ms = value.parse::<u32>().map_err(|_| CommandError::InvalidRateValue)?;
            return Ok(Command::SetRate(interval_ms));
        }

        if tokens.next().is_some() {
            return Err(CommandError::Unknown);
        }

        const KEYWORDS: [(&str, Command); 6] = [
            ("PING", Command::Ping),
            ("INVENTORY", Command::Inventory),
            ("START", Command::Start),
            ("STOP", Command::Stop),
            ("STATUS", Command::Status),
            ("RESET", Command::Reset),
        ];
        KEYWORDS
            .iter()
            .find(|(name, _)| keyword.eq_ignore_ascii_case(name))
            .map(|(_, command)| *command)
            .ok_or(CommandError::Unknown)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Ping => f.write_str("PING"),
            Command::Inventory => f.write_str("INVENTORY"),
            Command::Start => f.write_str("START"),
            Command::Stop => f.write_str("STOP"),
            Command::SetRate(ms) => write!(f, "SET_RATE {}", ms),
            Command::Status => f.write_str("STATUS"),
            Command::Reset => f.write_str("RESET"),
        }
    }
}

/// What the scheduler emits for an applied command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reply {
    /// LOG with fixed text
    Log(&'static str),
    /// ERROR with the error's text
    Error(CommandError),
    /// INVENTORY only
    Inventory,
    /// INVENTORY then HEARTBEAT
    Status,
    /// LOG, delay, then the boot sequence
    Reset,
}
