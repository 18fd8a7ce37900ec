//! The scheduler loop
//!
//! `SensorHub` owns the board, the transport, the clock and all mutable
//! state. The board firmware calls [`SensorHub::begin`] once and then
//! [`SensorHub::update`] as often as it likes; each update:
//!
//! 1. drains every pending input byte through the command interpreter
//! 2. emits a HEARTBEAT if the heartbeat interval elapsed
//! 3. runs a sampling pass if streaming and the sample interval elapsed
//!
//! Nothing here blocks beyond the bounded hardware waits in the detector and
//! sampler.

use crate::command::{Command, LineBuffer, Reply};
use crate::config::HubConfig;
use crate::constants::protocol::{MSG_BOOTING, MSG_RESETTING};
use crate::constants::timing::RESET_DELAY_MS;
use crate::detector::Detector;
use crate::errors::{ConfigError, EncodeError, HubError};
use crate::ports::{Board, Transport};
use crate::protocol::{messages, Line};
use crate::registry::DeviceRegistry;
use crate::sampler::{Sampler, SamplerState};
use crate::time::Clock;

/// What one call to `update` did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Commands dispatched (blank lines excluded)
    pub commands: usize,
    /// Whether a HEARTBEAT was emitted by the timer
    pub heartbeat: bool,
    /// DATA messages emitted by the sampling pass
    pub samples: usize,
    /// Whether a RESET was performed
    pub reset: bool,
}

/// Sensor hub firmware core
pub struct SensorHub<B, T, C>
where
    B: Board,
    T: Transport,
    C: Clock,
{
    board: B,
    transport: T,
    clock: C,
    config: HubConfig,
    registry: DeviceRegistry,
    state: SamplerState,
    input: LineBuffer,
}

impl<B, T, C> SensorHub<B, T, C>
where
    B: Board,
    T: Transport,
    C: Clock,
{
    /// Build a hub; the configuration is validated first
    pub fn new(board: B, transport: T, clock: C, config: HubConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let state = SamplerState::new(config.sample_interval_ms);
        Ok(Self {
            board,
            transport,
            clock,
            config,
            registry: DeviceRegistry::new(),
            state,
            input: LineBuffer::new(),
        })
    }

    /// Boot sequence: LOG, detection, INVENTORY, HEARTBEAT, timers restarted
    pub fn begin(&mut self) -> Result<(), HubError<T::Error>> {
        hub_info!(
            "booting at {} baud, sample interval {} ms",
            self.config.baud_rate,
            self.state.sample_interval_ms()
        );
        self.emit_log(MSG_BOOTING)?;

        Detector::new(&self.config).detect_all(&mut self.board, &mut self.registry);

        self.emit_inventory()?;
        self.emit_heartbeat()?;
        self.state.restart_timers(self.clock.now_ms());
        Ok(())
    }

    /// One scheduler tick
    pub fn update(&mut self) -> Result<TickReport, HubError<T::Error>> {
        let mut report = TickReport::default();

        self.drain_input(&mut report)?;

        let now = self.clock.now_ms();
        if self.state.heartbeat_due(now, self.config.heartbeat_interval_ms) {
            self.emit_heartbeat()?;
            self.state.mark_heartbeat(now);
            report.heartbeat = true;
        }

        let now = self.clock.now_ms();
        if self.state.sample_due(now) {
            report.samples = self.sample_pass()?;
            self.state.mark_sampled(now);
        }

        Ok(report)
    }

    /// LOG, short delay, then reinitialize everything and boot again
    ///
    /// Detection results, sampler state and any partial input line are
    /// discarded; the sampling interval returns to the configured default.
    pub fn reset(&mut self) -> Result<(), HubError<T::Error>> {
        hub_info!("reset requested");
        self.emit_log(MSG_RESETTING)?;
        self.board.delay_ms(RESET_DELAY_MS);

        self.registry.clear();
        self.state = SamplerState::new(self.config.sample_interval_ms);
        self.input.clear();

        self.begin()
    }

    /// Detection results
    pub fn registry(&self) -> &DeviceRegistry {
        &self.registry
    }

    /// Sampling state
    pub fn state(&self) -> &SamplerState {
        &self.state
    }

    /// Active configuration
    pub fn config(&self) -> &HubConfig {
        &self.config
    }

    /// The board
    pub fn board(&self) -> &B {
        &self.board
    }

    /// The board, mutably (e.g. to change simulated readings)
    pub fn board_mut(&mut self) -> &mut B {
        &mut self.board
    }

    /// The transport
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The transport, mutably
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// Take the parts back
    pub fn into_parts(self) -> (B, T, C) {
        (self.board, self.transport, self.clock)
    }

    fn drain_input(&mut self, report: &mut TickReport) -> Result<(), HubError<T::Error>> {
        loop {
            let byte = match self.transport.read_byte() {
                Ok(byte) => byte,
                Err(nb::Error::WouldBlock) => return Ok(()),
                Err(nb::Error::Other(err)) => return Err(HubError::Transport(err)),
            };

            let Some(line) = self.input.push(byte) else {
                continue;
            };
            let Some(parsed) = Command::from_line(&line) else {
                continue;
            };
            report.commands += 1;

            let reply = match parsed {
                Ok(command) => {
                    hub_debug!("command {}", command);
                    command.apply(&mut self.state)
                }
                Err(err) => Reply::Error(err),
            };

            if reply == Reply::Reset {
                self.reset()?;
                self.discard_pending_input()?;
                report.reset = true;
                return Ok(());
            }
            self.emit_reply(reply)?;
        }
    }

    /// Drop whatever arrived before the reset took effect
    fn discard_pending_input(&mut self) -> Result<(), HubError<T::Error>> {
        loop {
            match self.transport.read_byte() {
                Ok(_) => {}
                Err(nb::Error::WouldBlock) => return Ok(()),
                Err(nb::Error::Other(err)) => return Err(HubError::Transport(err)),
            }
        }
    }

    fn emit_reply(&mut self, reply: Reply) -> Result<(), HubError<T::Error>> {
        match reply {
            Reply::Log(text) => self.emit_log(text),
            Reply::Error(err) => {
                hub_warn!("command rejected: {}", err.message());
                let line = messages::error(self.clock.now_ms(), err.message());
                self.send(line)
            }
            Reply::Inventory => self.emit_inventory(),
            Reply::Status => {
                self.emit_inventory()?;
                self.emit_heartbeat()
            }
            Reply::Reset => self.reset(),
        }
    }

    fn sample_pass(&mut self) -> Result<usize, HubError<T::Error>> {
        let Self { board, transport, clock, config, registry, .. } = self;
        Sampler::new(config).pass(board, registry, |sample| {
            let line = messages::data(clock.now_ms(), sample)?;
            transport.write_line(&line).map_err(HubError::Transport)
        })
    }

    fn emit_log(&mut self, text: &str) -> Result<(), HubError<T::Error>> {
        let line = messages::log(self.clock.now_ms(), text);
        self.send(line)
    }

    fn emit_inventory(&mut self) -> Result<(), HubError<T::Error>> {
        let line = messages::inventory(self.clock.now_ms(), &self.registry);
        self.send(line)
    }

    fn emit_heartbeat(&mut self) -> Result<(), HubError<T::Error>> {
        let line = messages::heartbeat(
            self.clock.now_ms(),
            self.state.sample_interval_ms(),
            self.state.mode(),
        );
        self.send(line)
    }

    fn send(&mut self, line: Result<Line, EncodeError>) -> Result<(), HubError<T::Error>> {
        let line = line?;
        self.transport.write_line(&line).map_err(HubError::Transport)
    }
}

#[cfg(all(test, feature = "sim"))]
mod tests {
    use super::*;
    use crate::registry::SensorClass;
    use crate::sim::{LinkDown, MemoryTransport, SimBoard, SimClock};
    use crate::Mode;

    type SimHub = SensorHub<SimBoard, MemoryTransport, SimClock>;

    fn booted(board: SimBoard) -> (SimHub, SimClock) {
        let clock = SimClock::new(0);
        let mut hub =
            SensorHub::new(board, MemoryTransport::new(), clock.clone(), HubConfig::default())
                .unwrap();
        hub.begin().unwrap();
        hub.transport_mut().take_lines();
        (hub, clock)
    }

    fn send(hub: &mut SimHub, input: &str) -> std::vec::Vec<std::string::String> {
        hub.transport_mut().push_input(input);
        hub.update().unwrap();
        hub.transport_mut().take_lines()
    }

    #[test]
    fn invalid_config_rejected() {
        let config = HubConfig::default().with_sample_interval(10);
        let result = SensorHub::new(SimBoard::new(), MemoryTransport::new(), SimClock::new(0), config);
        assert!(matches!(result, Err(ConfigError::IntervalBelowFloor { .. })));
    }

    #[test]
    fn boot_sequence_order() {
        let clock = SimClock::new(42);
        let mut hub = SensorHub::new(
            SimBoard::fully_populated(),
            MemoryTransport::new(),
            clock.clone(),
            HubConfig::default(),
        )
        .unwrap();
        hub.begin().unwrap();

        let lines = hub.transport().lines();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], r#"{"type":"LOG","ts":42,"message":"Booting Sensor Hub..."}"#);
        assert!(lines[1].starts_with(r#"{"type":"INVENTORY","ts":42,"sensors":{"DHT":"#));
        assert_eq!(
            lines[2],
            r#"{"type":"HEARTBEAT","ts":42,"interval_ms":1000,"mode":"STREAMING"}"#
        );
        assert_eq!(hub.state().last_sample(), 42);
        assert_eq!(hub.state().last_heartbeat(), 42);
    }

    #[test]
    fn ping_and_unknown() {
        let (mut hub, _) = booted(SimBoard::new());
        assert_eq!(send(&mut hub, "ping\n"), [r#"{"type":"LOG","ts":0,"message":"PONG"}"#]);
        assert_eq!(
            send(&mut hub, "FOO\r\n"),
            [r#"{"type":"ERROR","ts":0,"message":"Unknown command"}"#]
        );
        assert!(send(&mut hub, "\n\r\n   \n").is_empty());
    }

    #[test]
    fn one_reply_per_command_in_one_drain() {
        let (mut hub, _) = booted(SimBoard::new());
        hub.transport_mut().push_input("STOP\nSET_RATE 250\nSTART\n");
        let report = hub.update().unwrap();
        assert_eq!(report.commands, 3);
        assert_eq!(hub.transport_mut().take_lines().len(), 3);
        assert_eq!(hub.state().sample_interval_ms(), 250);
        assert_eq!(hub.state().mode(), Mode::Streaming);
    }

    #[test]
    fn partial_line_waits_for_terminator() {
        let (mut hub, _) = booted(SimBoard::new());
        assert!(send(&mut hub, "PI").is_empty());
        assert_eq!(send(&mut hub, "NG\n").len(), 1);
    }

    #[test]
    fn sampling_follows_interval() {
        let (mut hub, clock) = booted(SimBoard::fully_populated());

        clock.advance(999);
        assert_eq!(hub.update().unwrap().samples, 0);

        clock.advance(1);
        // DHT, DS18B20, BMP280, HC_SR04, PIR, two analog channels
        assert_eq!(hub.update().unwrap().samples, 7);
        assert_eq!(hub.state().last_sample(), 1000);
    }

    #[test]
    fn paused_hub_keeps_heartbeating() {
        let (mut hub, clock) = booted(SimBoard::fully_populated());
        send(&mut hub, "STOP\n");

        clock.advance(5000);
        let report = hub.update().unwrap();
        assert!(report.heartbeat);
        assert_eq!(report.samples, 0);
        assert_eq!(
            hub.transport_mut().take_lines(),
            [r#"{"type":"HEARTBEAT","ts":5000,"interval_ms":1000,"mode":"PAUSED"}"#]
        );
    }

    #[test]
    fn reset_reboots_and_drops_rest_of_drain() {
        let (mut hub, clock) = booted(SimBoard::fully_populated());
        send(&mut hub, "SET_RATE 300\nSTOP\n");
        clock.advance(700);

        hub.transport_mut().push_input("RESET\nPING\n");
        let report = hub.update().unwrap();
        assert!(report.reset);
        assert_eq!(report.commands, 1);

        let lines = hub.transport_mut().take_lines();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].contains("Resetting..."));
        assert!(lines[1].contains("Booting Sensor Hub..."));
        assert!(lines[2].contains(r#""type":"INVENTORY""#));
        assert!(lines[3].contains(r#""interval_ms":1000,"mode":"STREAMING""#));

        assert_eq!(hub.transport().pending_input(), 0);
        assert_eq!(hub.state().last_sample(), 700);
        assert_eq!(hub.registry().present_count(), SensorClass::COUNT);
    }

    #[test]
    fn transport_failure_propagates() {
        let (mut hub, _) = booted(SimBoard::new());
        hub.transport_mut().set_link_down(true);
        assert_eq!(hub.update(), Err(HubError::Transport(LinkDown)));
    }
}
