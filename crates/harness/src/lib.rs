//! CS35L41 System Test Harness
//!
//! Manually stepped test sequencer for a CS35L41 smart amplifier. Each press
//! of the user button advances the DUT one step through reset, calibration
//! boot, calibration, normal boot, power, mute and hibernate, then the cycle
//! starts over.
//!
//! # Architecture
//!
//! ```text
//! Emulator / hardware entry point
//!         ↓
//! RunLoop (poll, edge latch, idle)
//!         ↓
//! Sequencer (state table)
//!         ↓
//! platform traits (board-support layer)
//! ```
//!
//! Faults from the board layer surface as [`platform::BoardFault`] and end
//! the loop; the entry point decides what to do with the process.
//!
//! # Features
//!
//! - `emulator` - Simulated board, tokio runtime, tracing output
//! - `defmt` - defmt logging for hardware builds
//! - `std` - Enable standard library
//!
//! # Emulator
//!
//! ```bash
//! cargo run -p harness --features emulator -- --identity right
//! ```

#![cfg_attr(all(not(test), not(feature = "std")), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)]
// Logging discipline
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
#![warn(clippy::dbg_macro)] // dbg! should not be left in committed code
// Intentional allows for this codebase:
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_possible_truncation)]

pub mod button;
pub mod config;
pub mod run_loop;
pub mod sequencer;

#[cfg(feature = "emulator")]
pub mod emulator;

mod log;

pub use button::EdgeLatch;
pub use config::{HarnessConfig, APP_NAME, APP_VERSION};
pub use run_loop::{HarnessBoard, RunLoop};
pub use sequencer::{Sequencer, SequencerState};
