//! Digital I/O port
//!
//! Pins are addressed by board pin number, since the wiring comes from
//! `HubConfig` at runtime rather than from typed HAL pins.

/// Board pin number (Arduino numbering: D0-D13, A0 = 14 ...)
pub type Pin = u8;

/// Digital level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Level {
    /// Logic low
    Low,
    /// Logic high
    High,
}

impl Level {
    /// 0 for low, 1 for high
    pub const fn as_int(&self) -> i64 {
        match self {
            Level::Low => 0,
            Level::High => 1,
        }
    }
}

/// Pin direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PinMode {
    /// High-impedance input
    Input,
    /// Push-pull output
    Output,
}

/// Port for digital pins and pulse timing
pub trait GpioPort {
    /// Set pin direction
    fn pin_mode(&mut self, pin: Pin, mode: PinMode);

    /// Drive an output pin
    fn digital_write(&mut self, pin: Pin, level: Level);

    /// Sample an input pin
    ///
    /// Returns `None` if the pin cannot be read at all (not routed on this
    /// board).
    fn digital_read(&mut self, pin: Pin) -> Option<Level>;

    /// Length in microseconds of the next pulse at `level` on `pin`
    ///
    /// Blocks for at most `timeout_us`; returns 0 on timeout.
    fn pulse_in(&mut self, pin: Pin, level: Level, timeout_us: u32) -> u32;
}
