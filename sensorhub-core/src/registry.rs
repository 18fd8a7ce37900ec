//! Device registry - which sensor classes were found at boot
//!
//! The registry is written once by the detector and read by the sampler and
//! the INVENTORY encoder. Nothing else mutates it; a RESET clears it and
//! detection runs again.

use heapless::Vec;

use crate::constants::sensors::MAX_ANALOG_CHANNELS;
use crate::drivers::Bmp280Calibration;
use crate::ports::{DhtModel, Pin};

/// Supported sensor families
///
/// The declaration order is the fixed order used for detection, INVENTORY
/// and sampling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum SensorClass {
    /// DHT11/DHT22 temperature + humidity
    Dht = 0,
    /// DS18B20 on a one-wire bus
    OneWireTemp = 1,
    /// BMP280 barometer on I2C
    Barometer = 2,
    /// HC-SR04 ultrasonic ranger
    Ultrasonic = 3,
    /// PIR motion sensor on a digital input
    Motion = 4,
    /// Raw analog inputs
    AnalogChannel = 5,
}

impl SensorClass {
    /// Number of classes
    pub const COUNT: usize = 6;

    /// All classes in probe/sample order
    pub const ALL: [SensorClass; Self::COUNT] = [
        SensorClass::Dht,
        SensorClass::OneWireTemp,
        SensorClass::Barometer,
        SensorClass::Ultrasonic,
        SensorClass::Motion,
        SensorClass::AnalogChannel,
    ];

    /// Name used in the `sensor` field and the INVENTORY keys
    pub const fn wire_name(&self) -> &'static str {
        match self {
            SensorClass::Dht => "DHT",
            SensorClass::OneWireTemp => "DS18B20",
            SensorClass::Barometer => "BMP280",
            SensorClass::Ultrasonic => "HC_SR04",
            SensorClass::Motion => "PIR",
            SensorClass::AnalogChannel => "ANALOG",
        }
    }

    const fn index(&self) -> usize {
        *self as usize
    }
}

/// Class-specific facts recorded at detection time
#[derive(Debug, Clone, PartialEq)]
pub enum SensorMetadata {
    /// DHT variant
    Dht {
        /// Configured model
        model: DhtModel,
    },
    /// DS18B20 found on the one-wire bus
    OneWire {
        /// Data pin of the bus
        pin: Pin,
    },
    /// BMP280 answering at `address`
    Barometer {
        /// I2C address that returned the expected chip id
        address: u8,
        /// Trimming parameters loaded at detection
        calibration: Bmp280Calibration,
    },
    /// HC-SR04 trigger/echo pair
    Ultrasonic {
        /// Trigger output pin
        trigger: Pin,
        /// Echo input pin
        echo: Pin,
    },
    /// PIR on a digital input
    Motion {
        /// Input pin
        pin: Pin,
    },
    /// Analog channels that read nonzero at boot
    Analog {
        /// Pins of the present channels, in configuration order
        channels: Vec<Pin, MAX_ANALOG_CHANNELS>,
    },
}

/// Detection outcome for one class
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Detection {
    /// Not probed yet, not configured, or nothing answered
    #[default]
    Absent,
    /// Device found
    Present(SensorMetadata),
}

impl Detection {
    /// Whether a device was found
    pub fn is_present(&self) -> bool {
        matches!(self, Detection::Present(_))
    }

    /// Metadata if present
    pub fn metadata(&self) -> Option<&SensorMetadata> {
        match self {
            Detection::Present(meta) => Some(meta),
            Detection::Absent => None,
        }
    }
}

/// Detection state for every sensor class
#[derive(Debug, Clone, Default)]
pub struct DeviceRegistry {
    entries: [Detection; SensorClass::COUNT],
}

impl DeviceRegistry {
    /// Registry with every class absent
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome for `class`
    pub fn record(&mut self, class: SensorClass, detection: Detection) {
        self.entries[class.index()] = detection;
    }

    /// Outcome for `class`
    pub fn get(&self, class: SensorClass) -> &Detection {
        &self.entries[class.index()]
    }

    /// Whether `class` was found
    pub fn is_present(&self, class: SensorClass) -> bool {
        self.get(class).is_present()
    }

    /// Present classes with their metadata, in fixed order
    pub fn present(&self) -> impl Iterator<Item = (SensorClass, &SensorMetadata)> + '_ {
        SensorClass::ALL
            .iter()
            .filter_map(move |class| self.get(*class).metadata().map(|meta| (*class, meta)))
    }

    /// Number of present classes
    pub fn present_count(&self) -> usize {
        self.entries.iter().filter(|entry| entry.is_present()).count()
    }

    /// Pins of the analog channels found present (empty if none)
    pub fn analog_channels(&self) -> &[Pin] {
        match self.get(SensorClass::AnalogChannel) {
            Detection::Present(SensorMetadata::Analog { channels }) => channels,
            _ => &[],
        }
    }

    /// Forget everything (RESET)
    pub fn clear(&mut self) {
        self.entries = Default::default();
    }
}
