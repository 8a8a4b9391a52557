//! Board-support abstraction for the CS35L41 system test harness
//!
//! This crate provides trait-based abstractions for everything the test
//! sequencer touches on the board, enabling development and testing without
//! physical hardware.
//!
//! # Architecture Layers
//!
//! ```text
//! Harness (sequencer + run loop)
//!         ↓
//! Platform BSP (this crate - trait abstractions)
//!         ↓
//! Board-support layer (vendor HAL, CS35L41 driver)
//! ```
//!
//! # Capabilities
//!
//! - [`BoardSupport`] - Bring-up and per-iteration maintenance
//! - [`DeviceControl`] - DUT reset, boot, power, calibration, mute, hibernate
//! - [`AudioPlayback`] - Fixed test-signal playback
//! - [`ButtonInput`] - Debounced push-button edges
//! - [`IdleWait`] - Low-power wait for the next event
//! - [`FaultLatch`] - Out-of-band fault reporting
//!
//! # Features
//!
//! - `std`: Enable standard library support and [`mocks`] (for testing)
//! - `defmt`: Enable defmt logging derives
//!
//! # Example
//!
//! ```no_run
//! use platform::{BoardFault, DeviceControl};
//!
//! fn cycle_power<D: DeviceControl>(dut: &mut D) -> Result<(), BoardFault> {
//!     dut.power_down()?;
//!     dut.power_up()
//! }
//! ```

// ── Lint policy ─────────────────────────────────────────────────────────────
#![deny(clippy::unwrap_used)] // no .unwrap() in production code
#![deny(clippy::expect_used)] // no .expect() in production code
#![deny(clippy::panic)] // no panic!() in production code
#![deny(clippy::unreachable)] // no unreachable!() that isn't documented
#![deny(unused_must_use)]
// all Results must be handled
// ────────────────────────────────────────────────────────────────────────────
#![cfg_attr(not(test), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(unsafe_op_in_unsafe_fn)] // unsafe fn body is not implicitly unsafe block
#![warn(clippy::print_stdout)] // prefer tracing/defmt over println! in lib code
// Pedantic lints suppressed for this board-support crate:
#![allow(clippy::doc_markdown)] // register names in doc comments
#![allow(clippy::must_use_candidate)] // hardware accessors — callers decide
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(async_fn_in_trait)] // single-threaded executor, Send bounds not needed

#[cfg(feature = "std")]
extern crate std;

pub mod audio;
pub mod board;
pub mod dut;
pub mod input;
pub mod mocks;
pub mod power;

pub use audio::{AudioPlayback, TestSignal};
pub use board::{BoardFault, BoardStatus, BoardSupport, FaultLatch};
pub use dut::{BootMode, DeviceControl, DutIdentity, GainDb, OutOfRangeError};
pub use input::{ButtonId, ButtonInput};
pub use power::IdleWait;
