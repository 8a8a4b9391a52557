//! CS35L41 System Test Harness - Emulator Entry Point
//!
//! Runs the test sequencer against a simulated board. Each line read from
//! stdin is one press of the user button.
//!
//! ```bash
//! RUST_LOG=debug cargo run -p harness --features emulator -- --identity right
//! ```

use std::io::BufRead;

use anyhow::Context;
use clap::{Parser, ValueEnum};
use harness::emulator::{SimulatedBoard, SimulatedDut};
use harness::{HarnessConfig, RunLoop, APP_NAME, APP_VERSION};
use platform::{DutIdentity, FaultLatch};
use tokio::sync::mpsc;
use tokio::time::Duration;
use tracing_subscriber::EnvFilter;

/// Fault callback target handed to the board layer.
static FAULTS: FaultLatch = FaultLatch::new();

#[derive(Parser)]
#[command(name = "harness-emulator")]
#[command(about = "Step the CS35L41 test sequence against a simulated board", long_about = None)]
#[command(version)]
struct Cli {
    /// Channel identity the simulated DUT reports
    #[arg(long, value_enum, default_value_t = Channel::Left)]
    identity: Channel,
    /// Status polls after power-up before the DSP reports processing
    #[arg(long, default_value_t = 1)]
    processing_latency: u32,
    /// Idle tick between loop iterations, in milliseconds
    #[arg(long, default_value_t = 250)]
    tick_ms: u64,
}

#[derive(Clone, Copy, ValueEnum)]
enum Channel {
    Left,
    Right,
}

impl From<Channel> for DutIdentity {
    fn from(channel: Channel) -> Self {
        match channel {
            Channel::Left => DutIdentity::Left,
            Channel::Right => DutIdentity::Right,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    // stdin is blocking; read it on its own thread and forward presses.
    let (tx, rx) = mpsc::unbounded_channel();
    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            if line.is_err() || tx.send(()).is_err() {
                break;
            }
        }
    });

    let dut = SimulatedDut::new(cli.identity.into(), cli.processing_latency);
    let board = SimulatedBoard::new(dut, rx, Duration::from_millis(cli.tick_ms));
    let mut run_loop = RunLoop::new(board, HarnessConfig::default(), &FAULTS);

    tracing::info!("{APP_NAME} v{APP_VERSION} (emulator) - press Enter to step");

    let outcome = run_loop.run().await;
    match outcome {
        Ok(never) => match never {},
        Err(fault) => {
            Err(fault).with_context(|| format!("sequence halted in {}", run_loop.state()))
        }
    }
}
