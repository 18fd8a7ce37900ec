//! Encoders for each outbound message shape

use super::{Frame, Line, MessageType};
use crate::errors::EncodeError;
use crate::registry::{DeviceRegistry, SensorMetadata};
use crate::sampler::{Mode, Sample};
use crate::time::Timestamp;

/// `{"type":"LOG","ts":..,"message":".."}`
pub fn log(ts: Timestamp, message: &str) -> Result<Line, EncodeError> {
    text(MessageType::Log, ts, message)
}

/// `{"type":"ERROR","ts":..,"message":".."}`
pub fn error(ts: Timestamp, message: &str) -> Result<Line, EncodeError> {
    text(MessageType::Error, ts, message)
}

fn text(kind: MessageType, ts: Timestamp, message: &str) -> Result<Line, EncodeError> {
    let mut frame = Frame::new(kind, ts);
    frame.str("message", message);
    frame.finish()
}

/// `{"type":"HEARTBEAT","ts":..,"interval_ms":..,"mode":".."}`
///
/// `interval_ms` is the current sampling interval, not the heartbeat
/// period.
pub fn heartbeat(ts: Timestamp, interval_ms: u32, mode: Mode) -> Result<Line, EncodeError> {
    let mut frame = Frame::new(MessageType::Heartbeat, ts);
    frame.int("interval_ms", interval_ms as i64).str("mode", mode.as_str());
    frame.finish()
}

/// `{"type":"INVENTORY","ts":..,"sensors":{..}}` with one entry per present
/// class, in fixed class order
pub fn inventory(ts: Timestamp, registry: &DeviceRegistry) -> Result<Line, EncodeError> {
    let mut frame = Frame::new(MessageType::Inventory, ts);
    frame.begin_object("sensors");

    for (class, meta) in registry.present() {
        frame.begin_object(class.wire_name());
        match meta {
            SensorMetadata::Dht { model } => {
                frame.str("model", model.name());
            }
            SensorMetadata::OneWire { .. } => {
                frame.str("bus", "OneWire");
            }
            SensorMetadata::Barometer { .. } => {
                frame.str("bus", "I2C");
            }
            SensorMetadata::Ultrasonic { trigger, echo } => {
                frame.str_fmt("pins", format_args!("TRIG:D{},ECHO:D{}", trigger, echo));
            }
            SensorMetadata::Motion { pin } => {
                frame.str_fmt("pin", format_args!("{}", pin));
            }
            SensorMetadata::Analog { channels } => {
                frame.str_list("channels", channels.iter());
            }
        }
        frame.end_object();
    }

    frame.finish()
}

/// `{"type":"DATA","ts":..,"sensor":"..","values":{..}}`
///
/// An empty `values` object is still emitted when every field of the read
/// was invalid.
pub fn data(ts: Timestamp, sample: &Sample) -> Result<Line, EncodeError> {
    let mut frame = Frame::new(MessageType::Data, ts);
    frame.str("sensor", sample.class.wire_name());
    frame.begin_object("values");
    for (key, value) in &sample.values {
        frame.number(key, *value);
    }
    frame.finish()
}
