//! HC-SR04 ultrasonic ranger
//!
//! ```text
//! TRIG  __|‾‾‾‾‾‾‾‾‾‾|____________________
//!          10 µs
//! ECHO  _______________|‾‾‾‾‾‾‾‾‾‾‾‾|_____
//!                       round trip
//! ```

use embedded_hal::delay::DelayNs;

use crate::constants::sensors::SPEED_OF_SOUND_CM_PER_US;
use crate::constants::timing::{ECHO_TIMEOUT_US, TRIGGER_PRE_LOW_US, TRIGGER_PULSE_US};
use crate::ports::{GpioPort, Level, Pin};

/// Fire one trigger pulse and time the echo
///
/// Returns the echo width in microseconds, or 0 if nothing came back within
/// the echo timeout. Pins must already be configured as output/input.
pub fn echo_duration_us<B>(board: &mut B, trigger: Pin, echo: Pin) -> u32
where
    B: GpioPort + DelayNs,
{
    board.digital_write(trigger, Level::Low);
    board.delay_us(TRIGGER_PRE_LOW_US);
    board.digital_write(trigger, Level::High);
    board.delay_us(TRIGGER_PULSE_US);
    board.digital_write(trigger, Level::Low);
    board.pulse_in(echo, Level::High, ECHO_TIMEOUT_US)
}

/// One-way distance for a round-trip echo width
pub fn distance_cm(duration_us: u32) -> f32 {
    (duration_us as f32 / 2.0) * SPEED_OF_SOUND_CM_PER_US
}
