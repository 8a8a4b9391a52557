//! Test-signal playback abstraction
//!
//! The board streams fixed test signals into the DUT's serial audio port.
//! Playback is fire-and-forget: `play` returns once the stream is running.

use crate::board::BoardFault;

/// Audio playback trait
pub trait AudioPlayback {
    /// Stop any running stream. No-op when already stopped.
    fn stop(&mut self) -> Result<(), BoardFault>;

    /// Start streaming `signal` in a loop until [`stop`](Self::stop).
    fn play(&mut self, signal: TestSignal) -> Result<(), BoardFault>;
}

/// Fixed test signals stored on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TestSignal {
    /// Digital silence (keeps the serial port clocked during calibration)
    Silence,
    /// 1 kHz sine, both channels, −20 dBFS
    Stereo1kHz20dBFs,
}
