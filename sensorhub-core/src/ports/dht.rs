//! DHT sensor port - single-wire temperature/humidity sensors
//!
//! The DHT protocol is a bit-banged timing protocol, so the board's HAL
//! owns it. The core only needs "initialize" and "give me the last
//! reading", with NaN marking a channel that failed to read.

use super::gpio::Pin;

/// Supported DHT variants
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "UPPERCASE"))]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DhtModel {
    /// DHT11: 1 °C / 1 %RH resolution
    Dht11,
    /// DHT22 / AM2302: 0.1 °C / 0.1 %RH resolution
    Dht22,
}

impl DhtModel {
    /// Name reported in the INVENTORY metadata
    pub const fn name(&self) -> &'static str {
        match self {
            DhtModel::Dht11 => "DHT11",
            DhtModel::Dht22 => "DHT22",
        }
    }
}

/// One DHT read. Either channel may be NaN when the read failed.
#[derive(Debug, Clone, Copy)]
pub struct DhtReading {
    /// Air temperature in °C
    pub temperature_c: f32,
    /// Relative humidity in %
    pub humidity_pct: f32,
}

impl DhtReading {
    /// Reading with both channels failed
    pub const fn failed() -> Self {
        Self {
            temperature_c: f32::NAN,
            humidity_pct: f32::NAN,
        }
    }
}

/// Port for DHT-style sensors
pub trait DhtSensor {
    /// Configure the data pin and sensor variant
    fn dht_begin(&mut self, pin: Pin, model: DhtModel);

    /// Read both channels
    fn dht_read(&mut self) -> DhtReading;
}
