//! Harness configuration and constants
//!
//! Central values used across the harness. Per-channel gain trims live in
//! [`HarnessConfig`] so tests and the emulator can substitute their own.

use platform::{ButtonId, DutIdentity, GainDb};

/// The application name
pub const APP_NAME: &str = "CS35L41 System Test Harness";

/// Application version (synchronized with Cargo.toml)
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Digital gain applied when the DUT reports the left channel.
pub const LEFT_CHANNEL_GAIN: GainDb = GainDb::new(-6);

/// Digital gain applied for every other identity.
pub const OTHER_CHANNEL_GAIN: GainDb = GainDb::new(-10);

/// Runtime configuration of the sequencer and run loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Gain for [`DutIdentity::Left`].
    pub left_gain: GainDb,
    /// Gain for any other identity.
    pub other_gain: GainDb,
    /// Button that steps the sequence.
    pub button: ButtonId,
}

impl HarnessConfig {
    /// Gain trim for a DUT reporting `identity`.
    pub const fn gain_for(&self, identity: DutIdentity) -> GainDb {
        match identity {
            DutIdentity::Left => self.left_gain,
            DutIdentity::Right | DutIdentity::Other(_) => self.other_gain,
        }
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            left_gain: LEFT_CHANNEL_GAIN,
            other_gain: OTHER_CHANNEL_GAIN,
            button: ButtonId::User,
        }
    }
}
