//! Sensor Specifications
//!
//! Addresses, register maps and conversion factors for the supported
//! sensor families.

// ===== BAROMETER (BMP280) =====

/// Primary I2C address (SDO tied low).
pub const BMP280_ADDRESS_PRIMARY: u8 = 0x76;

/// Secondary I2C address (SDO tied high).
pub const BMP280_ADDRESS_SECONDARY: u8 = 0x77;

/// Chip identification register.
pub const BMP280_REG_CHIP_ID: u8 = 0xD0;

/// Expected content of the chip identification register.
///
/// Source: BMP280 datasheet §4.3.1
pub const BMP280_CHIP_ID: u8 = 0x58;

/// First factory calibration register (dig_T1 LSB).
pub const BMP280_REG_CALIBRATION: u8 = 0x88;

/// Measurement control register.
pub const BMP280_REG_CTRL_MEAS: u8 = 0xF4;

/// Standby/filter configuration register.
pub const BMP280_REG_CONFIG: u8 = 0xF5;

/// First raw data register (press_msb).
pub const BMP280_REG_DATA: u8 = 0xF7;

/// ctrl_meas: temperature x2, pressure x16, normal mode.
pub const BMP280_CTRL_MEAS_NORMAL: u8 = 0b010_101_11;

/// config: 500 ms standby, IIR filter x16.
pub const BMP280_CONFIG_DEFAULT: u8 = 0b100_100_00;

/// Standard sea-level pressure for altitude estimation (hPa).
pub const SEA_LEVEL_PRESSURE_HPA: f32 = 1013.25;

// ===== ONE-WIRE TEMPERATURE (DS18B20) =====

/// Reading returned when the device dropped off the bus (°C).
///
/// Source: DallasTemperature library `DEVICE_DISCONNECTED_C`
pub const DS18B20_DISCONNECTED_C: f32 = -127.0;

// ===== ULTRASONIC (HC-SR04) =====

/// Speed of sound at ~20 °C in centimetres per microsecond.
pub const SPEED_OF_SOUND_CM_PER_US: f32 = 0.0343;

// ===== ANALOG =====

/// Maximum analog channels tracked by the registry.
pub const MAX_ANALOG_CHANNELS: usize = 8;

/// First analog pin number on an ATmega328 Nano (A0).
pub const ANALOG_PIN_A0: u8 = 14;
