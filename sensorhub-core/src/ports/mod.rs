//! Hardware and transport ports
//!
//! Ports are the traits the firmware core talks to instead of touching
//! registers or pins directly. A real board implements them over its HAL;
//! the `sim` module implements them in memory for tests.
//!
//! - **DhtSensor**: single-wire DHT11/DHT22 temperature + humidity
//! - **OneWireBus**: Dallas one-wire bus with DS18B20 conversions
//! - **GpioPort**: pin modes, digital levels, pulse timing
//! - **AnalogPort**: raw ADC reads
//! - **Transport**: the serial link carrying the line protocol
//!
//! The barometer bus and settle delays use the `embedded-hal` traits
//! (`I2c`, `DelayNs`) directly, so any HAL implementation plugs in as is.

pub mod analog;
pub mod dht;
pub mod gpio;
pub mod one_wire;
pub mod transport;

pub use analog::AnalogPort;
pub use dht::{DhtModel, DhtReading, DhtSensor};
pub use gpio::{GpioPort, Level, Pin, PinMode};
pub use one_wire::{OneWireBus, RomCode};
pub use transport::Transport;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::I2c;

/// Everything the detector and sampler need from the board
///
/// Blanket-implemented for any type providing all the ports, so a board
/// support crate only implements the individual traits.
pub trait Board: DhtSensor + OneWireBus + GpioPort + AnalogPort + I2c + DelayNs {}

impl<T> Board for T where T: DhtSensor + OneWireBus + GpioPort + AnalogPort + I2c + DelayNs {}
