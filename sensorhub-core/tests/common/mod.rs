//! Common test utilities for the hub integration tests
//!
//! - `Harness`: a booted hub on a simulated board with a shared clock
//! - `wire`: helpers for inspecting emitted lines

#![allow(dead_code)]

pub mod wire;

use sensorhub_core::sim::{MemoryTransport, SimBoard, SimClock};
use sensorhub_core::{HubConfig, SensorHub, TickReport};

/// Hub over the in-memory ports
pub type SimHub = SensorHub<SimBoard, MemoryTransport, SimClock>;

/// Booted hub plus everything it has written
pub struct Harness {
    pub hub: SimHub,
    pub clock: SimClock,
    /// Lines written since boot, including the boot sequence
    pub lines: Vec<String>,
}

impl Harness {
    /// Boot `board` with the default configuration at t = 0
    pub fn boot(board: SimBoard) -> Self {
        Self::boot_with(board, HubConfig::default())
    }

    /// Boot `board` with `config` at t = 0
    pub fn boot_with(board: SimBoard, config: HubConfig) -> Self {
        let clock = SimClock::new(0);
        let mut hub = SensorHub::new(board, MemoryTransport::new(), clock.clone(), config)
            .expect("valid config");
        hub.begin().expect("boot");
        let lines = hub.transport_mut().take_lines();
        Self { hub, clock, lines }
    }

    /// Queue `input`, run one tick, return the lines it produced
    pub fn command(&mut self, input: &str) -> Vec<String> {
        self.hub.transport_mut().push_input(input);
        self.tick().1
    }

    /// One tick at the current time
    pub fn tick(&mut self) -> (TickReport, Vec<String>) {
        let report = self.hub.update().expect("tick");
        let new = self.hub.transport_mut().take_lines();
        self.lines.extend(new.iter().cloned());
        (report, new)
    }

    /// Advance `duration_ms` in steps of `step_ms`, ticking after each
    ///
    /// Returns the reports and every line emitted along the way.
    pub fn run_for(&mut self, duration_ms: u64, step_ms: u64) -> (Vec<TickReport>, Vec<String>) {
        let mut reports = Vec::new();
        let mut lines = Vec::new();
        let mut elapsed = 0;
        while elapsed < duration_ms {
            self.clock.advance(step_ms);
            elapsed += step_ms;
            let (report, new) = self.tick();
            reports.push(report);
            lines.extend(new);
        }
        (reports, lines)
    }
}
