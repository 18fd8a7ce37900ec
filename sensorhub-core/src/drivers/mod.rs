//! Sensor drivers built on the hardware ports
//!
//! Only the parts with real protocol logic live here. DHT and DS18B20
//! conversions stay behind their ports since the board HAL owns the bit
//! timing.

pub mod bmp280;
pub mod hcsr04;

pub use bmp280::{altitude_m, Bmp280, Bmp280Calibration, Bmp280Measurement};
