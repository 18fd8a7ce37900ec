//! Board wiring and timing configuration
//!
//! Which pin or bus each sensor class sits on is injected here instead of
//! being baked into the detector. A binding set to `None` means "not wired
//! on this board": the class is recorded absent without probing.
//!
//! `HubConfig::default()` reproduces the reference Arduino Nano wiring:
//!
//! ```text
//! D2  DHT22 data        D4  HC-SR04 TRIG     A0-A3  analog inputs
//! D3  DS18B20 data      D5  HC-SR04 ECHO     I2C    BMP280 @ 0x76 / 0x77
//! D6  PIR output
//! ```

use heapless::Vec;

use crate::constants::protocol::DEFAULT_BAUD_RATE;
use crate::constants::sensors::{
    ANALOG_PIN_A0, BMP280_ADDRESS_PRIMARY, BMP280_ADDRESS_SECONDARY, MAX_ANALOG_CHANNELS,
    SEA_LEVEL_PRESSURE_HPA,
};
use crate::constants::timing::{
    DEFAULT_SAMPLE_INTERVAL_MS, HEARTBEAT_INTERVAL_MS, MIN_SAMPLE_INTERVAL_MS,
};
use crate::errors::ConfigError;
use crate::ports::{DhtModel, Pin};

/// DHT data pin and variant
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct DhtBinding {
    /// Data pin
    pub pin: Pin,
    /// Sensor variant
    pub model: DhtModel,
}

/// One-wire bus pin
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct OneWireBinding {
    /// Bus data pin
    pub pin: Pin,
}

/// Candidate I2C addresses for the barometer, probed in order
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct BarometerBinding {
    /// Addresses to try
    pub addresses: Vec<u8, 4>,
}

/// Ultrasonic trigger/echo pair
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct UltrasonicBinding {
    /// Trigger output
    pub trigger: Pin,
    /// Echo input
    pub echo: Pin,
}

/// Motion sensor input pin
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
pub struct MotionBinding {
    /// Digital input
    pub pin: Pin,
}

/// Complete hub configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HubConfig {
    /// UART speed used by the board bring-up code
    pub baud_rate: u32,
    /// Sampling interval at boot and after RESET
    pub sample_interval_ms: u32,
    /// Heartbeat interval
    pub heartbeat_interval_ms: u32,
    /// Sea-level reference for barometric altitude (hPa)
    pub sea_level_hpa: f32,
    /// DHT wiring
    pub dht: Option<DhtBinding>,
    /// One-wire wiring
    pub one_wire: Option<OneWireBinding>,
    /// Barometer wiring
    pub barometer: Option<BarometerBinding>,
    /// Ultrasonic wiring
    pub ultrasonic: Option<UltrasonicBinding>,
    /// Motion wiring
    pub motion: Option<MotionBinding>,
    /// Analog pins to probe, in report order
    pub analog_pins: Vec<Pin, MAX_ANALOG_CHANNELS>,
}

impl Default for HubConfig {
    fn default() -> Self {
        let mut addresses = Vec::new();
        let _ = addresses.push(BMP280_ADDRESS_PRIMARY);
        let _ = addresses.push(BMP280_ADDRESS_SECONDARY);

        let mut analog_pins = Vec::new();
        for offset in 0..4 {
            let _ = analog_pins.push(ANALOG_PIN_A0 + offset);
        }

        Self {
            baud_rate: DEFAULT_BAUD_RATE,
            sample_interval_ms: DEFAULT_SAMPLE_INTERVAL_MS,
            heartbeat_interval_ms: HEARTBEAT_INTERVAL_MS,
            sea_level_hpa: SEA_LEVEL_PRESSURE_HPA,
            dht: Some(DhtBinding { pin: 2, model: DhtModel::Dht22 }),
            one_wire: Some(OneWireBinding { pin: 3 }),
            barometer: Some(BarometerBinding { addresses }),
            ultrasonic: Some(UltrasonicBinding { trigger: 4, echo: 5 }),
            motion: Some(MotionBinding { pin: 6 }),
            analog_pins,
        }
    }
}

impl HubConfig {
    /// Configuration with nothing wired
    ///
    /// Useful as a starting point for boards that only carry a few sensors.
    pub fn unwired() -> Self {
        Self {
            dht: None,
            one_wire: None,
            barometer: None,
            ultrasonic: None,
            motion: None,
            analog_pins: Vec::new(),
            ..Self::default()
        }
    }

    /// Override the boot-time sampling interval
    pub fn with_sample_interval(mut self, interval_ms: u32) -> Self {
        self.sample_interval_ms = interval_ms;
        self
    }

    /// Check timing floors and pin assignments
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_interval_ms < MIN_SAMPLE_INTERVAL_MS {
            return Err(ConfigError::IntervalBelowFloor {
                interval_ms: self.sample_interval_ms,
                min_ms: MIN_SAMPLE_INTERVAL_MS,
            });
        }

        if self.baud_rate == 0 {
            return Err(ConfigError::ZeroBaudRate);
        }

        if self.heartbeat_interval_ms == 0 {
            return Err(ConfigError::ZeroHeartbeat);
        }

        if let Some(barometer) = &self.barometer {
            if barometer.addresses.is_empty() {
                return Err(ConfigError::NoBarometerAddress);
            }
        }

        if let Some(ultrasonic) = &self.ultrasonic {
            if ultrasonic.trigger == ultrasonic.echo {
                return Err(ConfigError::PinConflict {
                    pin: ultrasonic.trigger,
                    reason: "ultrasonic trigger and echo",
                });
            }
        }

        self.check_digital_pins()
    }

    /// Digital bindings must not share a pin
    fn check_digital_pins(&self) -> Result<(), ConfigError> {
        let mut used: Vec<(Pin, &'static str), 8> = Vec::new();
        let mut claim = |pin: Pin, role: &'static str| -> Result<(), ConfigError> {
            if used.iter().any(|(taken, _)| *taken == pin) {
                return Err(ConfigError::PinConflict { pin, reason: role });
            }
            // Capacity covers every digital role
            let _ = used.push((pin, role));
            Ok(())
        };

        if let Some(dht) = &self.dht {
            claim(dht.pin, "dht")?;
        }
        if let Some(one_wire) = &self.one_wire {
            claim(one_wire.pin, "one-wire")?;
        }
        if let Some(ultrasonic) = &self.ultrasonic {
            claim(ultrasonic.trigger, "ultrasonic trigger")?;
            claim(ultrasonic.echo, "ultrasonic echo")?;
        }
        if let Some(motion) = &self.motion {
            claim(motion.pin, "motion")?;
        }
        Ok(())
    }
}
