//! Sampling state and per-class reads
//!
//! `SamplerState` holds the operator-controlled knobs (streaming flag and
//! interval) alongside the scheduler's bookkeeping timestamps. The knobs are
//! only changed through commands, the timestamps only by the scheduler.
//!
//! `Sampler` performs one pass over the present classes. Every read is
//! best-effort: a channel that comes back NaN, non-finite or as a
//! "disconnected" sentinel is left out of the DATA message, and the class
//! stays present.

use heapless::Vec;

use crate::config::HubConfig;
use crate::constants::sensors::DS18B20_DISCONNECTED_C;
use crate::constants::timing::MIN_SAMPLE_INTERVAL_MS;
use crate::drivers::{altitude_m, hcsr04, Bmp280};
use crate::errors::CommandError;
use crate::ports::{Board, Pin};
use crate::protocol::Number;
use crate::registry::{DeviceRegistry, SensorClass, SensorMetadata};
use crate::time::{elapsed_ms, Timestamp};

/// Maximum fields in one DATA message
pub const MAX_FIELDS: usize = 4;

/// Streaming mode as reported in HEARTBEAT
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// DATA is emitted every interval
    Streaming,
    /// Sampling suspended; heartbeats and commands continue
    Paused,
}

impl Mode {
    /// Value of the `mode` field
    pub const fn as_str(&self) -> &'static str {
        match self {
            Mode::Streaming => "STREAMING",
            Mode::Paused => "PAUSED",
        }
    }
}

/// Scheduler-visible sampling state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SamplerState {
    streaming: bool,
    sample_interval_ms: u32,
    last_sample: Timestamp,
    last_heartbeat: Timestamp,
}

impl SamplerState {
    /// Streaming at `sample_interval_ms`, timers at zero
    ///
    /// The interval is clamped to the floor so the invariant holds even for
    /// an unvalidated value.
    pub fn new(sample_interval_ms: u32) -> Self {
        Self {
            streaming: true,
            sample_interval_ms: sample_interval_ms.max(MIN_SAMPLE_INTERVAL_MS),
            last_sample: 0,
            last_heartbeat: 0,
        }
    }

    /// Current mode
    pub fn mode(&self) -> Mode {
        if self.streaming {
            Mode::Streaming
        } else {
            Mode::Paused
        }
    }

    /// Whether DATA is being emitted
    pub fn is_streaming(&self) -> bool {
        self.streaming
    }

    /// Enable or pause sampling. Idempotent.
    pub fn set_streaming(&mut self, streaming: bool) {
        self.streaming = streaming;
    }

    /// Current sampling interval
    pub fn sample_interval_ms(&self) -> u32 {
        self.sample_interval_ms
    }

    /// Change the sampling interval; rejected below the floor
    pub fn set_sample_interval(&mut self, interval_ms: u32) -> Result<(), CommandError> {
        if interval_ms < MIN_SAMPLE_INTERVAL_MS {
            return Err(CommandError::RateTooLow { requested: interval_ms });
        }
        self.sample_interval_ms = interval_ms;
        Ok(())
    }

    /// Time of the last sampling pass
    pub fn last_sample(&self) -> Timestamp {
        self.last_sample
    }

    /// Time of the last heartbeat
    pub fn last_heartbeat(&self) -> Timestamp {
        self.last_heartbeat
    }

    /// Restart both timers at `now` (end of the boot sequence)
    pub fn restart_timers(&mut self, now: Timestamp) {
        self.last_sample = now;
        self.last_heartbeat = now;
    }

    /// Whether a sampling pass is due
    pub fn sample_due(&self, now: Timestamp) -> bool {
        self.streaming && elapsed_ms(self.last_sample, now) >= self.sample_interval_ms as u64
    }

    /// Record a completed sampling pass
    pub fn mark_sampled(&mut self, now: Timestamp) {
        self.last_sample = now;
    }

    /// Whether a heartbeat is due
    pub fn heartbeat_due(&self, now: Timestamp, heartbeat_interval_ms: u32) -> bool {
        elapsed_ms(self.last_heartbeat, now) >= heartbeat_interval_ms as u64
    }

    /// Record an emitted heartbeat
    pub fn mark_heartbeat(&mut self, now: Timestamp) {
        self.last_heartbeat = now;
    }
}

/// One DATA payload: the class and its valid fields, in emit order
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    /// Reporting class
    pub class: SensorClass,
    /// Valid fields only
    pub values: Vec<(&'static str, Number), MAX_FIELDS>,
}

impl Sample {
    /// Sample with no fields yet
    pub fn new(class: SensorClass) -> Self {
        Self { class, values: Vec::new() }
    }

    /// Add a float field if it is a usable number
    pub fn float(&mut self, key: &'static str, value: f32) -> &mut Self {
        if value.is_finite() {
            self.push(key, Number::Float(value));
        }
        self
    }

    /// Add an integer field
    pub fn int(&mut self, key: &'static str, value: i64) -> &mut Self {
        self.push(key, Number::Int(value));
        self
    }

    /// Value of `key`, if present
    pub fn get(&self, key: &str) -> Option<Number> {
        self.values.iter().find(|(k, _)| *k == key).map(|(_, v)| *v)
    }

    fn push(&mut self, key: &'static str, value: Number) {
        // Every class reports at most MAX_FIELDS fields
        let _ = self.values.push((key, value));
    }
}

/// Reads present sensors according to the registry
pub struct Sampler<'a> {
    config: &'a HubConfig,
}

impl<'a> Sampler<'a> {
    /// Sampler using the configured sea-level reference
    pub fn new(config: &'a HubConfig) -> Self {
        Self { config }
    }

    /// One pass over every present class, in fixed order
    ///
    /// Each sample is handed to `emit` as soon as it is read; the first
    /// error from `emit` stops the pass. Returns the number of samples
    /// emitted. Analog channels produce one sample each.
    pub fn pass<B, E, F>(
        &self,
        board: &mut B,
        registry: &DeviceRegistry,
        mut emit: F,
    ) -> Result<usize, E>
    where
        B: Board,
        F: FnMut(&Sample) -> Result<(), E>,
    {
        let mut emitted = 0;
        for (class, meta) in registry.present() {
            if let SensorMetadata::Analog { channels } = meta {
                for pin in channels {
                    emit(&self.read_analog(board, *pin))?;
                    emitted += 1;
                }
            } else {
                emit(&self.read(board, class, meta))?;
                emitted += 1;
            }
        }
        Ok(emitted)
    }

    /// Read one non-analog class
    pub fn read<B: Board>(&self, board: &mut B, class: SensorClass, meta: &SensorMetadata) -> Sample {
        let mut sample = Sample::new(class);

        match meta {
            SensorMetadata::Dht { .. } => {
                let reading = board.dht_read();
                sample
                    .float("temperature_c", reading.temperature_c)
                    .float("humidity_pct", reading.humidity_pct);
            }
            SensorMetadata::OneWire { .. } => {
                board.request_temperatures();
                let t = board.temperature_c(0);
                if t != DS18B20_DISCONNECTED_C {
                    sample.float("temperature_c", t);
                }
            }
            SensorMetadata::Barometer { address, calibration } => {
                match Bmp280::new(*address, *calibration).measure(board) {
                    Ok(m) => {
                        sample
                            .float("temperature_c", m.temperature_c)
                            .float("pressure_pa", m.pressure_pa)
                            .float("altitude_m", altitude_m(m.pressure_pa, self.config.sea_level_hpa));
                    }
                    Err(_) => {
                        hub_warn!("BMP280 read failed at address {}", address);
                    }
                }
            }
            SensorMetadata::Ultrasonic { trigger, echo } => {
                let duration = hcsr04::echo_duration_us(board, *trigger, *echo);
                if duration > 0 {
                    sample.float("distance_cm", hcsr04::distance_cm(duration));
                }
            }
            SensorMetadata::Motion { pin } => {
                if let Some(level) = board.digital_read(*pin) {
                    sample.int("motion", level.as_int());
                }
            }
            SensorMetadata::Analog { channels } => {
                // Callers normally go through `pass`; report the first channel
                if let Some(pin) = channels.first() {
                    return self.read_analog(board, *pin);
                }
            }
        }

        sample
    }

    fn read_analog<B: Board>(&self, board: &mut B, pin: Pin) -> Sample {
        let raw = board.analog_read(pin);
        let mut sample = Sample::new(SensorClass::AnalogChannel);
        sample.int("pin", pin as i64).int("raw", raw as i64);
        sample
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_streams_at_interval() {
        let state = SamplerState::new(1000);
        assert_eq!(state.mode(), Mode::Streaming);
        assert_eq!(state.sample_interval_ms(), 1000);
        assert_eq!(SamplerState::new(10).sample_interval_ms(), MIN_SAMPLE_INTERVAL_MS);
    }

    #[test]
    fn interval_floor() {
        let mut state = SamplerState::new(1000);
        assert_eq!(
            state.set_sample_interval(99),
            Err(CommandError::RateTooLow { requested: 99 })
        );
        assert_eq!(state.sample_interval_ms(), 1000);
        assert!(state.set_sample_interval(100).is_ok());
        assert_eq!(state.sample_interval_ms(), 100);
    }

    #[test]
    fn sample_due_only_when_streaming() {
        let mut state = SamplerState::new(1000);
        state.restart_timers(500);
        assert!(!state.sample_due(1499));
        assert!(state.sample_due(1500));

        state.set_streaming(false);
        assert!(!state.sample_due(10_000));
        assert_eq!(state.mode(), Mode::Paused);
    }

    #[test]
    fn heartbeat_due_independent_of_streaming() {
        let mut state = SamplerState::new(100);
        state.set_streaming(false);
        state.restart_timers(0);
        assert!(!state.heartbeat_due(4999, 5000));
        assert!(state.heartbeat_due(5000, 5000));
        state.mark_heartbeat(5000);
        assert!(!state.heartbeat_due(5001, 5000));
    }

    #[test]
    fn clock_going_backwards_never_fires() {
        let mut state = SamplerState::new(100);
        state.restart_timers(1000);
        assert!(!state.sample_due(0));
        assert!(!state.heartbeat_due(0, 5000));
    }

    #[test]
    fn sample_drops_invalid_floats() {
        let mut sample = Sample::new(SensorClass::Dht);
        sample
            .float("temperature_c", f32::NAN)
            .float("humidity_pct", 40.0)
            .float("other", f32::INFINITY);
        assert_eq!(sample.values.len(), 1);
        assert_eq!(sample.get("humidity_pct"), Some(Number::Float(40.0)));
        assert_eq!(sample.get("temperature_c"), None);
    }
}
