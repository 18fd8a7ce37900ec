//! Startup sensor detection
//!
//! Each class has its own probing strategy:
//!
//! | Class       | Strategy                                            |
//! |-------------|-----------------------------------------------------|
//! | DHT         | initialize, settle, one read; any valid channel     |
//! | DS18B20     | bus search finds at least one ROM                   |
//! | BMP280      | chip-id register matches at a candidate address     |
//! | HC-SR04     | trigger pulse returns a nonzero echo                |
//! | PIR         | the input level can be read                         |
//! | Analog      | per channel, a nonzero raw reading                  |
//!
//! Absence is a normal outcome and not an error. Classes without a binding
//! in `HubConfig` are recorded absent without touching the hardware.

use heapless::Vec;

use crate::config::HubConfig;
use crate::constants::timing::{DHT_SETTLE_MS, ONE_WIRE_SETTLE_MS};
use crate::drivers::{hcsr04, Bmp280};
use crate::ports::{Board, PinMode, RomCode};
use crate::registry::{Detection, DeviceRegistry, SensorClass, SensorMetadata};

/// Probes the board according to the configured wiring
pub struct Detector<'a> {
    config: &'a HubConfig,
}

impl<'a> Detector<'a> {
    /// Detector for `config`
    pub fn new(config: &'a HubConfig) -> Self {
        Self { config }
    }

    /// Probe every class in fixed order and record the outcomes
    pub fn detect_all<B: Board>(&self, board: &mut B, registry: &mut DeviceRegistry) {
        for class in SensorClass::ALL {
            let detection = self.probe(board, class);
            hub_debug!(
                "probe {}: {}",
                class.wire_name(),
                if detection.is_present() { "present" } else { "absent" }
            );
            registry.record(class, detection);
        }
        hub_info!("detection found {} sensor classes", registry.present_count());
    }

    /// Probe a single class
    pub fn probe<B: Board>(&self, board: &mut B, class: SensorClass) -> Detection {
        let found = match class {
            SensorClass::Dht => self.probe_dht(board),
            SensorClass::OneWireTemp => self.probe_one_wire(board),
            SensorClass::Barometer => self.probe_barometer(board),
            SensorClass::Ultrasonic => self.probe_ultrasonic(board),
            SensorClass::Motion => self.probe_motion(board),
            SensorClass::AnalogChannel => self.probe_analog(board),
        };
        found.map_or(Detection::Absent, Detection::Present)
    }

    fn probe_dht<B: Board>(&self, board: &mut B) -> Option<SensorMetadata> {
        let binding = self.config.dht?;
        board.dht_begin(binding.pin, binding.model);
        board.delay_ms(DHT_SETTLE_MS);

        let reading = board.dht_read();
        let responsive = reading.temperature_c.is_finite() || reading.humidity_pct.is_finite();
        responsive.then_some(SensorMetadata::Dht { model: binding.model })
    }

    fn probe_one_wire<B: Board>(&self, board: &mut B) -> Option<SensorMetadata> {
        let binding = self.config.one_wire?;
        board.one_wire_begin(binding.pin);
        board.delay_ms(ONE_WIRE_SETTLE_MS);

        let mut rom: RomCode = [0; 8];
        board.reset_search();
        let found = board.search(&mut rom);
        board.reset_search();
        found.then_some(SensorMetadata::OneWire { pin: binding.pin })
    }

    fn probe_barometer<B: Board>(&self, board: &mut B) -> Option<SensorMetadata> {
        let binding = self.config.barometer.as_ref()?;

        for &address in &binding.addresses {
            // A NACK just means nothing lives at this address
            if !matches!(Bmp280::probe(board, address), Ok(true)) {
                continue;
            }
            match Bmp280::init(board, address) {
                Ok(sensor) => {
                    return Some(SensorMetadata::Barometer {
                        address,
                        calibration: *sensor.calibration(),
                    });
                }
                Err(_) => {
                    hub_warn!("BMP280 at address {} answered but failed to initialize", address);
                }
            }
        }
        None
    }

    fn probe_ultrasonic<B: Board>(&self, board: &mut B) -> Option<SensorMetadata> {
        let binding = self.config.ultrasonic?;
        board.pin_mode(binding.trigger, PinMode::Output);
        board.pin_mode(binding.echo, PinMode::Input);

        let duration = hcsr04::echo_duration_us(board, binding.trigger, binding.echo);
        (duration > 0).then_some(SensorMetadata::Ultrasonic {
            trigger: binding.trigger,
            echo: binding.echo,
        })
    }

    fn probe_motion<B: Board>(&self, board: &mut B) -> Option<SensorMetadata> {
        let binding = self.config.motion?;
        board.pin_mode(binding.pin, PinMode::Input);
        board
            .digital_read(binding.pin)
            .map(|_| SensorMetadata::Motion { pin: binding.pin })
    }

    fn probe_analog<B: Board>(&self, board: &mut B) -> Option<SensorMetadata> {
        let mut channels = Vec::new();
        for &pin in &self.config.analog_pins {
            if board.analog_read(pin) != 0 {
                // Same capacity as the configured pin list
                let _ = channels.push(pin);
            }
        }
        (!channels.is_empty()).then_some(SensorMetadata::Analog { channels })
    }
}

#[cfg(all(test, feature = "sim"))]
mod tests {
    use super::*;
    use crate::config::{MotionBinding, UltrasonicBinding};
    use crate::ports::{DhtModel, DhtReading, Level};
    use crate::sim::SimBoard;

    fn detect(board: &mut SimBoard, config: &HubConfig) -> DeviceRegistry {
        let mut registry = DeviceRegistry::new();
        Detector::new(config).detect_all(board, &mut registry);
        registry
    }

    #[test]
    fn fully_populated_board() {
        let mut board = SimBoard::fully_populated();
        let registry = detect(&mut board, &HubConfig::default());

        for class in SensorClass::ALL {
            assert!(registry.is_present(class), "{:?} missing", class);
        }
        assert_eq!(registry.analog_channels(), &[14, 16]);
        assert!(matches!(
            registry.get(SensorClass::Barometer).metadata(),
            Some(SensorMetadata::Barometer { address: 0x76, .. })
        ));
    }

    #[test]
    fn bare_board_detects_nothing() {
        let mut board = SimBoard::new();
        let registry = detect(&mut board, &HubConfig::default());
        assert_eq!(registry.present_count(), 0);
    }

    #[test]
    fn unwired_config_never_probes() {
        let mut board = SimBoard::fully_populated();
        let registry = detect(&mut board, &HubConfig::unwired());
        assert_eq!(registry.present_count(), 0);
        assert_eq!(board.dht_pin(), None);
        assert_eq!(board.delayed_ns(), 0);
    }

    #[test]
    fn dht_with_one_valid_channel_is_present() {
        let mut board = SimBoard::new().with_dht(DhtReading {
            temperature_c: f32::NAN,
            humidity_pct: 55.0,
        });
        let registry = detect(&mut board, &HubConfig::default());
        assert_eq!(
            registry.get(SensorClass::Dht).metadata(),
            Some(&SensorMetadata::Dht { model: DhtModel::Dht22 })
        );
        assert_eq!(board.dht_pin(), Some(2));
    }

    #[test]
    fn dht_reporting_only_infinities_is_absent() {
        let mut board = SimBoard::new().with_dht(DhtReading {
            temperature_c: f32::INFINITY,
            humidity_pct: f32::NEG_INFINITY,
        });
        let registry = detect(&mut board, &HubConfig::default());
        assert!(!registry.is_present(SensorClass::Dht));
    }

    #[test]
    fn barometer_falls_back_to_secondary_address() {
        let mut board = SimBoard::new().with_bmp280(0x77);
        let registry = detect(&mut board, &HubConfig::default());
        assert!(matches!(
            registry.get(SensorClass::Barometer).metadata(),
            Some(SensorMetadata::Barometer { address: 0x77, .. })
        ));
    }

    #[test]
    fn wrong_chip_id_is_absent() {
        // BME280 reports 0x60
        let mut board = SimBoard::new().with_i2c_device(0x76, 0x60);
        let registry = detect(&mut board, &HubConfig::default());
        assert!(!registry.is_present(SensorClass::Barometer));
    }

    #[test]
    fn ultrasonic_timeout_is_absent() {
        let mut board = SimBoard::fully_populated().with_echo(5, 0);
        let registry = detect(&mut board, &HubConfig::default());
        assert!(!registry.is_present(SensorClass::Ultrasonic));
    }

    #[test]
    fn custom_wiring_is_honoured() {
        let config = HubConfig {
            ultrasonic: Some(UltrasonicBinding { trigger: 8, echo: 9 }),
            motion: Some(MotionBinding { pin: 7 }),
            ..HubConfig::unwired()
        };
        let mut board = SimBoard::new().with_echo(9, 580).with_motion(7, Level::High);
        let registry = detect(&mut board, &config);
        assert_eq!(
            registry.get(SensorClass::Ultrasonic).metadata(),
            Some(&SensorMetadata::Ultrasonic { trigger: 8, echo: 9 })
        );
        assert!(registry.is_present(SensorClass::Motion));
    }
}
