//! Analog input port

use super::gpio::Pin;

/// Raw ADC access
pub trait AnalogPort {
    /// Raw conversion result for `pin` (10-bit on the Nano, 0..=1023)
    ///
    /// A floating or grounded input reads zero, which is how unused
    /// channels are told apart from wired ones.
    fn analog_read(&mut self, pin: Pin) -> u16;
}
