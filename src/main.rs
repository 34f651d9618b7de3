//! gpiod — Main Entry Point
//!
//! Drives one GPIO pin from commands written to a named pipe.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │                                                              │
//! │  FifoChannel      HardwareAdapter            LogEventSink    │
//! │  (CommandSource)  (Pin + Random + Sleeper)   (EventSink)     │
//! │                                                              │
//! │  ─────────────────── Port Trait Boundary ─────────────────   │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────────┐  │
//! │  │            EffectService (pure logic)                  │  │
//! │  │  parse · FSM · blink · pulse                           │  │
//! │  └────────────────────────────────────────────────────────┘  │
//! │                                                              │
//! │  ShutdownFlag (SIGINT / SIGTERM)                             │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! Exit status: 0 after a clean shutdown or a usage/version request,
//! 1 when startup fails.

#![deny(unused_must_use)]

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::error::ErrorKind;
use clap::Parser;
use log::{error, info};

use gpiod::adapters::fifo::FifoChannel;
use gpiod::adapters::hardware::HardwareAdapter;
use gpiod::adapters::log_sink::LogEventSink;
use gpiod::adapters::urandom::UrandomSource;
use gpiod::app::service::EffectService;
use gpiod::config::{DaemonConfig, LogTarget};
use gpiod::error::StartupError;
use gpiod::logging;
use gpiod::shutdown::ShutdownFlag;

#[cfg(feature = "gpiocdev")]
use gpiod::adapters::gpio_chip::GpioChipPins;
#[cfg(not(feature = "gpiocdev"))]
use gpiod::adapters::sim_pins::SimulatedPins;

const VERSION: &str = env!("CARGO_PKG_VERSION");

// ── Command line ──────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(version, about = "GPIO daemon", disable_version_flag = true)]
struct Cli {
    /// Command channel path (default: /tmp/<program>.fifo)
    #[arg(short = 'f', value_name = "PATH")]
    fifo: Option<PathBuf>,

    /// JSON configuration file
    #[arg(short = 'c', value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log to stderr instead of the system log
    #[arg(short = 'F')]
    foreground: bool,

    /// Display version and exit
    #[arg(short = 'v')]
    version: bool,
}

/// `<program>, version X.Y.Z`, printed for `-v` and for unknown flags.
fn version_banner(program: &str) -> String {
    format!("{}, version {}", program, VERSION)
}

/// File name of argv[0], used for the default FIFO path and messages.
fn program_name() -> String {
    std::env::args_os()
        .next()
        .as_deref()
        .map(Path::new)
        .and_then(Path::file_name)
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| env!("CARGO_PKG_NAME").to_owned())
}

// ── Main ──────────────────────────────────────────────────────

fn main() -> ExitCode {
    let program = program_name();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.kind() == ErrorKind::DisplayHelp => e.exit(),
        Err(_) => {
            // Unrecognised options print the version banner and exit cleanly.
            eprintln!("{}", version_banner(&program));
            return ExitCode::SUCCESS;
        }
    };
    if cli.version {
        eprintln!("{}", version_banner(&program));
        return ExitCode::SUCCESS;
    }

    // Config comes first so it can choose the log target; a load failure
    // is reported once the logger is up.
    let config = load_config(&cli);
    let target = if cli.foreground {
        LogTarget::Stderr
    } else {
        config.as_ref().map_or(LogTarget::default(), |c| c.log_target)
    };
    logging::init(&program, target);
    info!("{} v{} starting", program, VERSION);

    match config.and_then(|config| run(&program, &config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("fatal: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(cli: &Cli) -> Result<DaemonConfig> {
    let mut config = match &cli.config {
        Some(path) => DaemonConfig::load(path).context(StartupError::Config)?,
        None => DaemonConfig::default(),
    };
    if let Some(path) = &cli.fifo {
        config.fifo_path = Some(path.clone());
    }
    Ok(config)
}

fn run(program: &str, config: &DaemonConfig) -> Result<()> {
    // ── 1. Signals ────────────────────────────────────────────
    let shutdown = ShutdownFlag::new();
    shutdown
        .install_signal_handler()
        .context(StartupError::SignalHandler)?;

    // ── 2. GPIO + entropy ─────────────────────────────────────
    let pins = open_pins(config).context(StartupError::GpioInit)?;
    let rng = UrandomSource::open(&config.entropy_path)
        .with_context(|| format!("'{}'", config.entropy_path.display()))
        .context(StartupError::EntropyOpen)?;

    // ── 3. Command channel ────────────────────────────────────
    let fifo_path = config.resolve_fifo_path(program);
    let mut channel = FifoChannel::create(&fifo_path).map_err(|e| {
        let stage = e.stage();
        anyhow::Error::new(e)
            .context(format!("'{}'", fifo_path.display()))
            .context(stage)
    })?;

    // ── 4. Effect loop ────────────────────────────────────────
    let mut hw = HardwareAdapter::new(pins, rng);
    let mut sink = LogEventSink::new();
    let mut service = EffectService::new(config);
    service.run(&shutdown, &mut channel, &mut hw, &mut sink);

    // ── 5. Cleanup ────────────────────────────────────────────
    let (_pins, rng) = hw.shutdown();
    drop(rng);
    drop(channel);
    info!("Shutdown complete");
    Ok(())
}

#[cfg(feature = "gpiocdev")]
fn open_pins(config: &DaemonConfig) -> Result<GpioChipPins> {
    GpioChipPins::open(&config.gpio_chip, &config.consumer)
        .with_context(|| format!("opening '{}'", config.gpio_chip.display()))
}

#[cfg(not(feature = "gpiocdev"))]
fn open_pins(_config: &DaemonConfig) -> Result<SimulatedPins> {
    Ok(SimulatedPins::new())
}
