//! One-wire bus port
//!
//! Covers the two layers the hub uses: the ROM search (for detection) and
//! DS18B20 conversions (for sampling).

use super::gpio::Pin;

/// 64-bit one-wire ROM code
pub type RomCode = [u8; 8];

/// Port for a Dallas one-wire bus with temperature conversions
pub trait OneWireBus {
    /// Initialize the bus on `pin`
    fn one_wire_begin(&mut self, pin: Pin);

    /// Restart the ROM search from the first device
    fn reset_search(&mut self);

    /// Find the next device; `true` and `rom` filled if one was found
    fn search(&mut self, rom: &mut RomCode) -> bool;

    /// Start a conversion on every device and wait for it
    fn request_temperatures(&mut self);

    /// Last converted temperature of the `index`-th device in °C
    ///
    /// Returns the disconnected sentinel (-127 °C) when the device did not
    /// answer.
    fn temperature_c(&mut self, index: u8) -> f32;
}
