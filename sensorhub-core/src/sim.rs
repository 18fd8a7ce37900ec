//! Simulated board, clock and transport
//!
//! In-memory implementations of every port, for tests and the host
//! simulator. `SimBoard` behaves like the hardware closely enough for the
//! detector and sampler: a BMP280 register file behind an I2C address, a
//! one-wire bus with ROM search, an echo pin with a fixed pulse width, and
//! per-pin digital and analog values.

use alloc::collections::VecDeque;
use alloc::rc::Rc;
use alloc::string::String;
use alloc::vec::Vec;
use core::cell::Cell;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};

use crate::constants::sensors::{
    BMP280_ADDRESS_PRIMARY, BMP280_CHIP_ID, BMP280_REG_CALIBRATION, BMP280_REG_CHIP_ID,
    BMP280_REG_DATA, DS18B20_DISCONNECTED_C,
};
use crate::ports::{
    AnalogPort, DhtModel, DhtReading, DhtSensor, GpioPort, Level, OneWireBus, Pin, PinMode,
    RomCode, Transport,
};
use crate::time::{Clock, Timestamp};

const PIN_COUNT: usize = 32;

/// Trimming words from the BMP280 datasheet compensation example
const DATASHEET_CALIBRATION: [u16; 12] = [
    27504, 26435, (-1000i16) as u16, 36477, (-10685i16) as u16, 3024, 2855, 140,
    (-7i16) as u16, 15500, (-14600i16) as u16, 6000,
];

/// Raw pressure from the same example (≈ 100653 Pa)
pub const DATASHEET_ADC_P: u32 = 415_148;

/// Raw temperature from the same example (≈ 25.08 °C)
pub const DATASHEET_ADC_T: u32 = 519_888;

/// Simple I2C target with a 256-byte register file and auto-increment
#[derive(Debug, Clone)]
struct SimI2cDevice {
    address: u8,
    regs: [u8; 256],
    pointer: u8,
}

impl SimI2cDevice {
    fn new(address: u8, chip_id: u8) -> Self {
        let mut regs = [0u8; 256];
        regs[BMP280_REG_CHIP_ID as usize] = chip_id;
        let base = BMP280_REG_CALIBRATION as usize;
        for (i, word) in DATASHEET_CALIBRATION.iter().enumerate() {
            regs[base + i * 2..base + i * 2 + 2].copy_from_slice(&word.to_le_bytes());
        }
        let mut device = Self { address, regs, pointer: 0 };
        device.set_raw(DATASHEET_ADC_P, DATASHEET_ADC_T);
        device
    }

    fn set_raw(&mut self, adc_p: u32, adc_t: u32) {
        let base = BMP280_REG_DATA as usize;
        self.regs[base..base + 3].copy_from_slice(&pack20(adc_p));
        self.regs[base + 3..base + 6].copy_from_slice(&pack20(adc_t));
    }

    fn write(&mut self, bytes: &[u8]) {
        if let Some((register, data)) = bytes.split_first() {
            self.pointer = *register;
            for byte in data {
                self.regs[self.pointer as usize] = *byte;
                self.pointer = self.pointer.wrapping_add(1);
            }
        }
    }

    fn read(&mut self, buf: &mut [u8]) {
        for slot in buf {
            *slot = self.regs[self.pointer as usize];
            self.pointer = self.pointer.wrapping_add(1);
        }
    }
}

fn pack20(value: u32) -> [u8; 3] {
    [(value >> 12) as u8, (value >> 4) as u8, ((value & 0x0F) << 4) as u8]
}

/// In-memory board implementing every hardware port
#[derive(Debug, Clone)]
pub struct SimBoard {
    dht: Option<DhtReading>,
    dht_begun: Option<(Pin, DhtModel)>,
    roms: Vec<RomCode>,
    search_cursor: usize,
    ds18b20_c: f32,
    one_wire_pin: Option<Pin>,
    conversions: u32,
    i2c: Option<SimI2cDevice>,
    echo: Option<(Pin, u32)>,
    inputs: [Option<Level>; PIN_COUNT],
    outputs: [Option<Level>; PIN_COUNT],
    modes: [Option<PinMode>; PIN_COUNT],
    analog: [u16; PIN_COUNT],
    trigger_pulses: u32,
    delayed_ns: u64,
}

impl Default for SimBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl SimBoard {
    /// Board with nothing attached
    pub fn new() -> Self {
        Self {
            dht: None,
            dht_begun: None,
            roms: Vec::new(),
            search_cursor: 0,
            ds18b20_c: DS18B20_DISCONNECTED_C,
            one_wire_pin: None,
            conversions: 0,
            i2c: None,
            echo: None,
            inputs: [None; PIN_COUNT],
            outputs: [None; PIN_COUNT],
            modes: [None; PIN_COUNT],
            analog: [0; PIN_COUNT],
            trigger_pulses: 0,
            delayed_ns: 0,
        }
    }

    /// Every sensor of the reference wiring attached and responding
    ///
    /// DHT 22.5 °C / 41 %RH, DS18B20 21.25 °C, BMP280 at 0x76 with the
    /// datasheet sample values, 20 cm echo on D5, PIR low on D6, and analog
    /// signal on A0 (512) and A2 (1023) only.
    pub fn fully_populated() -> Self {
        Self::new()
            .with_dht(DhtReading { temperature_c: 22.5, humidity_pct: 41.0 })
            .with_ds18b20([0x28, 0xFF, 0x4C, 0x1A, 0x60, 0x17, 0x05, 0x9E], 21.25)
            .with_bmp280(BMP280_ADDRESS_PRIMARY)
            .with_echo(5, 1166)
            .with_motion(6, Level::Low)
            .with_analog(14, 512)
            .with_analog(16, 1023)
    }

    /// Attach a DHT returning `reading`
    pub fn with_dht(mut self, reading: DhtReading) -> Self {
        self.dht = Some(reading);
        self
    }

    /// Attach a DS18B20 with ROM code `rom` reading `temperature_c`
    pub fn with_ds18b20(mut self, rom: RomCode, temperature_c: f32) -> Self {
        self.roms.push(rom);
        self.ds18b20_c = temperature_c;
        self
    }

    /// Attach a BMP280 at `address`
    pub fn with_bmp280(self, address: u8) -> Self {
        self.with_i2c_device(address, BMP280_CHIP_ID)
    }

    /// Attach a BMP280-like device reporting `chip_id`
    pub fn with_i2c_device(mut self, address: u8, chip_id: u8) -> Self {
        self.i2c = Some(SimI2cDevice::new(address, chip_id));
        self
    }

    /// Echo of `width_us` on `pin` after each trigger (0 = never answers)
    pub fn with_echo(mut self, pin: Pin, width_us: u32) -> Self {
        self.echo = Some((pin, width_us));
        self
    }

    /// Make `pin` readable at `level`
    pub fn with_motion(mut self, pin: Pin, level: Level) -> Self {
        self.set_level(pin, Some(level));
        self
    }

    /// Raw ADC value on `pin`
    pub fn with_analog(mut self, pin: Pin, raw: u16) -> Self {
        self.set_analog(pin, raw);
        self
    }

    /// Change the DHT reading (`None` detaches it)
    pub fn set_dht(&mut self, reading: Option<DhtReading>) {
        self.dht = reading;
    }

    /// Change the DS18B20 temperature; -127 simulates a dropout
    pub fn set_ds18b20_temperature(&mut self, temperature_c: f32) {
        self.ds18b20_c = temperature_c;
    }

    /// Change the raw BMP280 ADC words; 0x80000 marks a skipped channel
    pub fn set_bmp280_raw(&mut self, adc_p: u32, adc_t: u32) {
        if let Some(device) = self.i2c.as_mut() {
            device.set_raw(adc_p, adc_t);
        }
    }

    /// Remove the I2C device
    pub fn detach_i2c(&mut self) {
        self.i2c = None;
    }

    /// Change the echo width on the configured echo pin
    pub fn set_echo_width(&mut self, width_us: u32) {
        if let Some((_, width)) = self.echo.as_mut() {
            *width = width_us;
        }
    }

    /// Input level of `pin` (`None` = unreadable)
    pub fn set_level(&mut self, pin: Pin, level: Option<Level>) {
        if let Some(slot) = self.inputs.get_mut(pin as usize) {
            *slot = level;
        }
    }

    /// Raw ADC value of `pin`
    pub fn set_analog(&mut self, pin: Pin, raw: u16) {
        if let Some(slot) = self.analog.get_mut(pin as usize) {
            *slot = raw;
        }
    }

    /// Pin passed to `dht_begin`, if it was called
    pub fn dht_pin(&self) -> Option<Pin> {
        self.dht_begun.map(|(pin, _)| pin)
    }

    /// Last level driven on `pin`
    pub fn output_level(&self, pin: Pin) -> Option<Level> {
        self.outputs.get(pin as usize).copied().flatten()
    }

    /// Mode last set on `pin`
    pub fn pin_mode_of(&self, pin: Pin) -> Option<PinMode> {
        self.modes.get(pin as usize).copied().flatten()
    }

    /// Rising edges driven on any output
    pub fn trigger_pulses(&self) -> u32 {
        self.trigger_pulses
    }

    /// One-wire conversions requested
    pub fn conversions(&self) -> u32 {
        self.conversions
    }

    /// Total time spent in `DelayNs`
    pub fn delayed_ns(&self) -> u64 {
        self.delayed_ns
    }
}

impl DhtSensor for SimBoard {
    fn dht_begin(&mut self, pin: Pin, model: DhtModel) {
        self.dht_begun = Some((pin, model));
    }

    fn dht_read(&mut self) -> DhtReading {
        match (self.dht_begun, self.dht) {
            (Some(_), Some(reading)) => reading,
            _ => DhtReading::failed(),
        }
    }
}

impl OneWireBus for SimBoard {
    fn one_wire_begin(&mut self, pin: Pin) {
        self.one_wire_pin = Some(pin);
    }

    fn reset_search(&mut self) {
        self.search_cursor = 0;
    }

    fn search(&mut self, rom: &mut RomCode) -> bool {
        if self.one_wire_pin.is_none() {
            return false;
        }
        match self.roms.get(self.search_cursor) {
            Some(found) => {
                *rom = *found;
                self.search_cursor += 1;
                true
            }
            None => false,
        }
    }

    fn request_temperatures(&mut self) {
        self.conversions += 1;
    }

    fn temperature_c(&mut self, index: u8) -> f32 {
        if (index as usize) < self.roms.len() {
            self.ds18b20_c
        } else {
            DS18B20_DISCONNECTED_C
        }
    }
}

impl GpioPort for SimBoard {
    fn pin_mode(&mut self, pin: Pin, mode: PinMode) {
        if let Some(slot) = self.modes.get_mut(pin as usize) {
            *slot = Some(mode);
        }
    }

    fn digital_write(&mut self, pin: Pin, level: Level) {
        if let Some(slot) = self.outputs.get_mut(pin as usize) {
            if level == Level::High && *slot != Some(Level::High) {
                self.trigger_pulses += 1;
            }
            *slot = Some(level);
        }
    }

    fn digital_read(&mut self, pin: Pin) -> Option<Level> {
        self.inputs.get(pin as usize).copied().flatten()
    }

    fn pulse_in(&mut self, pin: Pin, level: Level, timeout_us: u32) -> u32 {
        match self.echo {
            Some((echo, width)) if echo == pin && level == Level::High && width <= timeout_us => width,
            _ => 0,
        }
    }
}

impl AnalogPort for SimBoard {
    fn analog_read(&mut self, pin: Pin) -> u16 {
        self.analog.get(pin as usize).copied().unwrap_or(0)
    }
}

impl ErrorType for SimBoard {
    type Error = ErrorKind;
}

impl I2c for SimBoard {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let device = self
            .i2c
            .as_mut()
            .filter(|device| device.address == address)
            .ok_or(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address))?;

        for operation in operations {
            match operation {
                Operation::Write(bytes) => device.write(bytes),
                Operation::Read(buf) => device.read(buf),
            }
        }
        Ok(())
    }
}

impl DelayNs for SimBoard {
    fn delay_ns(&mut self, ns: u32) {
        self.delayed_ns += ns as u64;
    }
}

/// Hand-driven clock whose clones share one counter
#[derive(Debug, Clone, Default)]
pub struct SimClock {
    now: Rc<Cell<Timestamp>>,
}

impl SimClock {
    /// Clock starting at `start`
    pub fn new(start: Timestamp) -> Self {
        Self { now: Rc::new(Cell::new(start)) }
    }

    /// Move forward by `ms`
    pub fn advance(&self, ms: u64) {
        self.now.set(self.now.get() + ms);
    }

    /// Jump to an absolute time
    pub fn set(&self, now: Timestamp) {
        self.now.set(now);
    }
}

impl Clock for SimClock {
    fn now_ms(&self) -> Timestamp {
        self.now.get()
    }
}

/// Failure injected into `MemoryTransport`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LinkDown;

/// Transport backed by an input queue and a list of written lines
#[derive(Debug, Default)]
pub struct MemoryTransport {
    input: VecDeque<u8>,
    lines: Vec<String>,
    link_down: bool,
}

impl MemoryTransport {
    /// Empty transport
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue bytes for the hub to read
    pub fn push_input(&mut self, text: &str) {
        self.input.extend(text.bytes());
    }

    /// Bytes not yet read by the hub
    pub fn pending_input(&self) -> usize {
        self.input.len()
    }

    /// Every line written so far
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Take and clear the written lines
    pub fn take_lines(&mut self) -> Vec<String> {
        core::mem::take(&mut self.lines)
    }

    /// Make every read and write fail
    pub fn set_link_down(&mut self, down: bool) {
        self.link_down = down;
    }
}

impl Transport for MemoryTransport {
    type Error = LinkDown;

    fn read_byte(&mut self) -> nb::Result<u8, Self::Error> {
        if self.link_down {
            return Err(nb::Error::Other(LinkDown));
        }
        self.input.pop_front().ok_or(nb::Error::WouldBlock)
    }

    fn write_line(&mut self, line: &str) -> Result<(), Self::Error> {
        if self.link_down {
            return Err(LinkDown);
        }
        self.lines.push(String::from(line));
        Ok(())
    }
}
