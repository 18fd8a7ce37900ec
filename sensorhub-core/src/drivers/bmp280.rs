//! BMP280 barometer over I2C
//!
//! Detection reads the chip-id register; sampling reads the factory
//! trimming parameters once, then converts raw ADC words with the
//! floating-point compensation formulas from the datasheet (§8.1).
//!
//! ```text
//! 0x88..0x9F  calibration (dig_T1..dig_P9, little endian)
//! 0xD0        chip id (0x58)
//! 0xF4        ctrl_meas   0xF5 config
//! 0xF7..0xFC  press_msb press_lsb press_xlsb temp_msb temp_lsb temp_xlsb
//! ```

use embedded_hal::i2c::I2c;

use crate::constants::sensors::{
    BMP280_CHIP_ID, BMP280_CONFIG_DEFAULT, BMP280_CTRL_MEAS_NORMAL, BMP280_REG_CALIBRATION,
    BMP280_REG_CHIP_ID, BMP280_REG_CONFIG, BMP280_REG_CTRL_MEAS, BMP280_REG_DATA,
};

/// Raw value reported while a measurement was skipped
const ADC_SKIPPED: i32 = 0x80000;

/// Factory trimming parameters, named after the datasheet's `dig_*` words
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[allow(missing_docs)]
pub struct Bmp280Calibration {
    pub t1: u16,
    pub t2: i16,
    pub t3: i16,
    pub p1: u16,
    pub p2: i16,
    pub p3: i16,
    pub p4: i16,
    pub p5: i16,
    pub p6: i16,
    pub p7: i16,
    pub p8: i16,
    pub p9: i16,
}

impl Bmp280Calibration {
    /// Decode the 24 calibration bytes starting at 0x88
    pub fn from_bytes(raw: &[u8; 24]) -> Self {
        let u = |i: usize| u16::from_le_bytes([raw[i], raw[i + 1]]);
        let s = |i: usize| i16::from_le_bytes([raw[i], raw[i + 1]]);
        Self {
            t1: u(0),
            t2: s(2),
            t3: s(4),
            p1: u(6),
            p2: s(8),
            p3: s(10),
            p4: s(12),
            p5: s(14),
            p6: s(16),
            p7: s(18),
            p8: s(20),
            p9: s(22),
        }
    }

    /// Temperature in °C plus the `t_fine` carry used by pressure
    pub fn compensate_temperature(&self, adc_t: i32) -> (f64, f64) {
        let adc = adc_t as f64;
        let t1 = self.t1 as f64;
        let var1 = (adc / 16384.0 - t1 / 1024.0) * self.t2 as f64;
        let delta = adc / 131072.0 - t1 / 8192.0;
        let var2 = delta * delta * self.t3 as f64;
        let t_fine = var1 + var2;
        (t_fine / 5120.0, t_fine)
    }

    /// Pressure in Pa, or `None` when the trimming data would divide by zero
    pub fn compensate_pressure(&self, adc_p: i32, t_fine: f64) -> Option<f64> {
        let mut var1 = t_fine / 2.0 - 64000.0;
        let mut var2 = var1 * var1 * self.p6 as f64 / 32768.0;
        var2 += var1 * self.p5 as f64 * 2.0;
        var2 = var2 / 4.0 + self.p4 as f64 * 65536.0;
        var1 = (self.p3 as f64 * var1 * var1 / 524288.0 + self.p2 as f64 * var1) / 524288.0;
        var1 = (1.0 + var1 / 32768.0) * self.p1 as f64;
        if var1 == 0.0 {
            return None;
        }

        let mut p = 1048576.0 - adc_p as f64;
        p = (p - var2 / 4096.0) * 6250.0 / var1;
        let var1 = self.p9 as f64 * p * p / 2147483648.0;
        let var2 = p * self.p8 as f64 / 32768.0;
        Some(p + (var1 + var2 + self.p7 as f64) / 16.0)
    }
}

/// One compensated measurement; NaN marks a channel that was skipped
#[derive(Debug, Clone, Copy)]
pub struct Bmp280Measurement {
    /// Temperature in °C
    pub temperature_c: f32,
    /// Pressure in Pa
    pub pressure_pa: f32,
}

/// Initialized BMP280 at a known address
#[derive(Debug, Clone, Copy)]
pub struct Bmp280 {
    address: u8,
    calibration: Bmp280Calibration,
}

impl Bmp280 {
    /// Whether a BMP280 answers at `address` with the expected chip id
    pub fn probe<I: I2c>(i2c: &mut I, address: u8) -> Result<bool, I::Error> {
        let mut id = [0u8; 1];
        i2c.write_read(address, &[BMP280_REG_CHIP_ID], &mut id)?;
        Ok(id[0] == BMP280_CHIP_ID)
    }

    /// Load calibration and start continuous measurements
    pub fn init<I: I2c>(i2c: &mut I, address: u8) -> Result<Self, I::Error> {
        let mut raw = [0u8; 24];
        i2c.write_read(address, &[BMP280_REG_CALIBRATION], &mut raw)?;
        i2c.write(address, &[BMP280_REG_CONFIG, BMP280_CONFIG_DEFAULT])?;
        i2c.write(address, &[BMP280_REG_CTRL_MEAS, BMP280_CTRL_MEAS_NORMAL])?;
        Ok(Self {
            address,
            calibration: Bmp280Calibration::from_bytes(&raw),
        })
    }

    /// Driver for a device already initialized, e.g. from registry data
    pub fn new(address: u8, calibration: Bmp280Calibration) -> Self {
        Self { address, calibration }
    }

    /// I2C address in use
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Trimming parameters read at init
    pub fn calibration(&self) -> &Bmp280Calibration {
        &self.calibration
    }

    /// Burst-read and compensate the latest temperature and pressure
    pub fn measure<I: I2c>(&self, i2c: &mut I) -> Result<Bmp280Measurement, I::Error> {
        let mut data = [0u8; 6];
        i2c.write_read(self.address, &[BMP280_REG_DATA], &mut data)?;

        let adc_p = raw20(data[0], data[1], data[2]);
        let adc_t = raw20(data[3], data[4], data[5]);

        if adc_t == ADC_SKIPPED {
            return Ok(Bmp280Measurement {
                temperature_c: f32::NAN,
                pressure_pa: f32::NAN,
            });
        }

        let (temperature_c, t_fine) = self.calibration.compensate_temperature(adc_t);
        let pressure_pa = if adc_p == ADC_SKIPPED {
            None
        } else {
            self.calibration.compensate_pressure(adc_p, t_fine)
        };

        Ok(Bmp280Measurement {
            temperature_c: temperature_c as f32,
            pressure_pa: pressure_pa.map_or(f32::NAN, |p| p as f32),
        })
    }
}

fn raw20(msb: u8, lsb: u8, xlsb: u8) -> i32 {
    ((msb as i32) << 12) | ((lsb as i32) << 4) | ((xlsb as i32) >> 4)
}

/// Altitude in metres from pressure, international barometric formula
pub fn altitude_m(pressure_pa: f32, sea_level_hpa: f32) -> f32 {
    let hpa = pressure_pa / 100.0;
    44330.0 * (1.0 - libm::powf(hpa / sea_level_hpa, 0.1903))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Worked example from the datasheet (§8.1 / §3.12)
    fn datasheet_calibration() -> Bmp280Calibration {
        Bmp280Calibration {
            t1: 27504,
            t2: 26435,
            t3: -1000,
            p1: 36477,
            p2: -10685,
            p3: 3024,
            p4: 2855,
            p5: 140,
            p6: -7,
            p7: 15500,
            p8: -14600,
            p9: 6000,
        }
    }

    #[test]
    fn datasheet_temperature() {
        let (t, _) = datasheet_calibration().compensate_temperature(519888);
        assert!((t - 25.08).abs() < 0.01, "got {}", t);
    }

    #[test]
    fn datasheet_pressure() {
        let cal = datasheet_calibration();
        let (_, t_fine) = cal.compensate_temperature(519888);
        let p = cal.compensate_pressure(415148, t_fine).unwrap();
        assert!((p - 100653.27).abs() < 1.0, "got {}", p);
    }

    #[test]
    fn zero_p1_does_not_divide() {
        let cal = Bmp280Calibration { p1: 0, ..datasheet_calibration() };
        let (_, t_fine) = cal.compensate_temperature(519888);
        assert!(cal.compensate_pressure(415148, t_fine).is_none());
    }

    #[test]
    fn calibration_round_trips_from_bytes() {
        let cal = datasheet_calibration();
        let mut raw = [0u8; 24];
        let words: [u16; 12] = [
            cal.t1, cal.t2 as u16, cal.t3 as u16, cal.p1, cal.p2 as u16, cal.p3 as u16,
            cal.p4 as u16, cal.p5 as u16, cal.p6 as u16, cal.p7 as u16, cal.p8 as u16,
            cal.p9 as u16,
        ];
        for (i, word) in words.iter().enumerate() {
            raw[i * 2..i * 2 + 2].copy_from_slice(&word.to_le_bytes());
        }
        assert_eq!(Bmp280Calibration::from_bytes(&raw), cal);
    }

    #[test]
    fn altitude_at_sea_level_is_zero() {
        assert!(altitude_m(101325.0, 1013.25).abs() < 0.01);
        // ~1 hPa per 8 m near the ground
        let alt = altitude_m(100325.0, 1013.25);
        assert!((alt - 83.0).abs() < 2.0, "got {}", alt);
    }

    #[test]
    fn raw20_packs_bits() {
        assert_eq!(raw20(0x80, 0x00, 0x00), ADC_SKIPPED);
        assert_eq!(raw20(0x65, 0x5A, 0xC0), 415148);
    }
}
