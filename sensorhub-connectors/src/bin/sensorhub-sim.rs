//! SensorHub simulator
//!
//! Runs the firmware core against a simulated board. Commands are read from
//! stdin, protocol lines are written to stdout, diagnostics go to stderr.
//!
//! # Usage
//!
//! ```bash
//! # Reference wiring, real time, until stdin closes
//! sensorhub-sim --exit-on-eof
//!
//! # Ten simulated seconds as fast as possible
//! echo "SET_RATE 250" | sensorhub-sim --fast --duration-ms 10000
//!
//! # Custom wiring with debug diagnostics
//! RUST_LOG=debug sensorhub-sim --config wiring.json --board climate
//! ```

use std::io::{self, BufReader};
use std::path::PathBuf;
use std::process::ExitCode;
use std::thread;
use std::time::{Duration, Instant};

use clap::{Parser, ValueEnum};
use sensorhub_connectors::{load_config, ChannelTransport, ConnectorError};
use sensorhub_core::ports::DhtReading;
use sensorhub_core::sim::{SimBoard, SimClock};
use sensorhub_core::{Clock, HubConfig, SensorHub};

/// Run the SensorHub core over stdin/stdout
#[derive(Parser, Debug)]
#[command(name = "sensorhub-sim")]
#[command(version)]
#[command(about = "Run the SensorHub firmware core against a simulated board", long_about = None)]
struct Args {
    /// JSON file with the board wiring (defaults to the reference wiring)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Which sensors the simulated board carries
    #[arg(short, long, value_enum, default_value_t = BoardPreset::Full)]
    board: BoardPreset,

    /// Stop after this many milliseconds of hub time
    #[arg(long, value_name = "MS")]
    duration_ms: Option<u64>,

    /// Scheduler tick period
    #[arg(long, value_name = "MS", default_value_t = 10)]
    tick_ms: u64,

    /// Advance simulated time by one tick per loop instead of following the wall clock
    #[arg(long)]
    fast: bool,

    /// Exit once stdin is closed and drained
    #[arg(long)]
    exit_on_eof: bool,

    /// Enable debug diagnostics on stderr
    #[arg(short, long)]
    verbose: bool,
}

/// Simulated board populations
#[derive(Debug, Clone, Copy, ValueEnum)]
enum BoardPreset {
    /// Every supported sensor attached
    Full,
    /// DHT22 and BMP280 only
    Climate,
    /// Nothing attached
    Bare,
}

impl BoardPreset {
    fn build(self) -> SimBoard {
        match self {
            BoardPreset::Full => SimBoard::fully_populated(),
            BoardPreset::Climate => SimBoard::new()
                .with_dht(DhtReading { temperature_c: 22.5, humidity_pct: 41.0 })
                .with_bmp280(0x76),
            BoardPreset::Bare => SimBoard::new(),
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(args.verbose);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("sensorhub-sim: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> Result<(), ConnectorError> {
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => HubConfig::default(),
    };

    let transport = ChannelTransport::spawn_reader(BufReader::new(io::stdin()), io::stdout());
    let clock = SimClock::new(0);
    let mut hub = SensorHub::new(args.board.build(), transport, clock.clone(), config)?;

    log::info!(
        "board preset {:?}, simulated link at {} baud, tick {} ms",
        args.board,
        hub.config().baud_rate,
        args.tick_ms
    );
    hub.begin()?;

    let tick = Duration::from_millis(args.tick_ms.max(1));
    let started = Instant::now();
    loop {
        if args.fast {
            clock.advance(args.tick_ms.max(1));
        } else {
            thread::sleep(tick);
            clock.set(started.elapsed().as_millis() as u64);
        }

        let report = hub.update()?;
        if report.reset {
            log::info!("hub reset");
        }

        if args.duration_ms.is_some_and(|limit| clock.now_ms() >= limit) {
            break;
        }
        if args.exit_on_eof && hub.transport().is_closed() {
            break;
        }
    }

    log::info!("stopped after {} ms", clock.now_ms());
    Ok(())
}

fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };

    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Warn)
        .filter_module("sensorhub_core", level.parse().unwrap_or(log::LevelFilter::Info))
        .filter_module("sensorhub_sim", level.parse().unwrap_or(log::LevelFilter::Info))
        .format_timestamp(None)
        .target(env_logger::Target::Stderr)
        .init();
}
