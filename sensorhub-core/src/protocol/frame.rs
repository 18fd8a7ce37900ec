//! Fixed-capacity line builder

use core::fmt::{self, Write};

use heapless::{String, Vec};

use super::{MessageType, Number};
use crate::constants::protocol::{FLOAT_PRECISION, LINE_CAPACITY, MAX_NESTING};
use crate::errors::EncodeError;
use crate::time::Timestamp;

/// One encoded message, without the line terminator
pub type Line = String<LINE_CAPACITY>;

/// Builder for a single message line
///
/// Writing never fails midway: an overflow is remembered and reported by
/// [`Frame::finish`], so callers chain field writes without checking each
/// one.
///
/// ```rust
/// use sensorhub_core::protocol::{Frame, MessageType};
///
/// let mut frame = Frame::new(MessageType::Log, 42);
/// frame.str("message", "PONG");
/// let line = frame.finish().unwrap();
/// assert_eq!(line.as_str(), r#"{"type":"LOG","ts":42,"message":"PONG"}"#);
/// ```
pub struct Frame {
    line: Line,
    /// One entry per open object/list: `true` until its first member
    open: Vec<bool, MAX_NESTING>,
    overflow: bool,
}

impl Frame {
    /// Start a message; writes `type` and `ts`
    pub fn new(kind: MessageType, ts: Timestamp) -> Self {
        let mut frame = Self {
            line: String::new(),
            open: Vec::new(),
            overflow: false,
        };
        frame.raw("{");
        frame.push_level();
        frame.str("type", kind.as_str());
        frame.key("ts");
        frame.fmt_raw(format_args!("{}", ts));
        frame
    }

    /// String field
    pub fn str(&mut self, key: &str, value: &str) -> &mut Self {
        self.key(key);
        self.raw("\"");
        self.raw(value);
        self.raw("\"");
        self
    }

    /// String field whose contents are formatted in place
    pub fn str_fmt(&mut self, key: &str, value: fmt::Arguments<'_>) -> &mut Self {
        self.key(key);
        self.raw("\"");
        self.fmt_raw(value);
        self.raw("\"");
        self
    }

    /// Integer field
    pub fn int(&mut self, key: &str, value: i64) -> &mut Self {
        self.key(key);
        self.fmt_raw(format_args!("{}", value));
        self
    }

    /// Floating-point field with fixed precision
    pub fn float(&mut self, key: &str, value: f32) -> &mut Self {
        self.key(key);
        self.fmt_raw(format_args!("{:.*}", FLOAT_PRECISION, value));
        self
    }

    /// Numeric field of either kind
    pub fn number(&mut self, key: &str, value: Number) -> &mut Self {
        match value {
            Number::Float(v) => self.float(key, v),
            Number::Int(v) => self.int(key, v),
        }
    }

    /// Open a nested object under `key`
    pub fn begin_object(&mut self, key: &str) -> &mut Self {
        self.key(key);
        self.raw("{");
        self.push_level();
        self
    }

    /// Close the innermost nested object
    pub fn end_object(&mut self) -> &mut Self {
        self.raw("}");
        self.open.pop();
        self
    }

    /// List of quoted items under `key`
    pub fn str_list<I>(&mut self, key: &str, items: I) -> &mut Self
    where
        I: IntoIterator,
        I::Item: fmt::Display,
    {
        self.key(key);
        self.raw("[");
        for (i, item) in items.into_iter().enumerate() {
            if i > 0 {
                self.raw(",");
            }
            self.fmt_raw(format_args!("\"{}\"", item));
        }
        self.raw("]");
        self
    }

    /// Close every open object and return the line
    pub fn finish(mut self) -> Result<Line, EncodeError> {
        while !self.open.is_empty() {
            self.end_object();
        }
        if self.overflow {
            return Err(EncodeError::LineTooLong { capacity: LINE_CAPACITY });
        }
        Ok(self.line)
    }

    fn key(&mut self, key: &str) {
        if let Some(first) = self.open.last_mut() {
            if *first {
                *first = false;
            } else {
                self.raw(",");
            }
        }
        self.raw("\"");
        self.raw(key);
        self.raw("\":");
    }

    fn push_level(&mut self) {
        if self.open.push(true).is_err() {
            self.overflow = true;
        }
    }

    fn raw(&mut self, s: &str) {
        if self.line.push_str(s).is_err() {
            self.overflow = true;
        }
    }

    fn fmt_raw(&mut self, args: fmt::Arguments<'_>) {
        if self.line.write_fmt(args).is_err() {
            self.overflow = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_and_ts_lead() {
        let line = Frame::new(MessageType::Heartbeat, 5000).finish().unwrap();
        assert_eq!(line.as_str(), r#"{"type":"HEARTBEAT","ts":5000}"#);
    }

    #[test]
    fn floats_have_six_digits_ints_none() {
        let mut frame = Frame::new(MessageType::Data, 1);
        frame.float("a", 23.5).int("b", -7).number("c", Number::Float(0.0));
        let line = frame.finish().unwrap();
        assert_eq!(
            line.as_str(),
            r#"{"type":"DATA","ts":1,"a":23.500000,"b":-7,"c":0.000000}"#
        );
    }

    #[test]
    fn nested_objects_and_lists() {
        let mut frame = Frame::new(MessageType::Inventory, 3);
        frame.begin_object("sensors");
        frame.begin_object("DHT").str("model", "DHT22").end_object();
        frame.begin_object("ANALOG").str_list("channels", [14u8, 15]).end_object();
        frame.begin_object("EMPTY").end_object();
        let line = frame.finish().unwrap();
        assert_eq!(
            line.as_str(),
            r#"{"type":"INVENTORY","ts":3,"sensors":{"DHT":{"model":"DHT22"},"ANALOG":{"channels":["14","15"]},"EMPTY":{}}}"#
        );
    }

    #[test]
    fn empty_list() {
        let mut frame = Frame::new(MessageType::Inventory, 0);
        frame.str_list("channels", core::iter::empty::<u8>());
        assert!(frame.finish().unwrap().ends_with(r#""channels":[]}"#));
    }

    #[test]
    fn formatted_strings() {
        let mut frame = Frame::new(MessageType::Log, 0);
        frame.str_fmt("pins", format_args!("TRIG:D{},ECHO:D{}", 4, 5));
        assert!(frame.finish().unwrap().ends_with(r#""pins":"TRIG:D4,ECHO:D5"}"#));
    }

    #[test]
    fn overflow_is_reported_not_truncated() {
        let mut frame = Frame::new(MessageType::Log, 0);
        for _ in 0..40 {
            frame.str("message", "0123456789");
        }
        assert_eq!(
            frame.finish(),
            Err(EncodeError::LineTooLong { capacity: LINE_CAPACITY })
        );
    }
}
