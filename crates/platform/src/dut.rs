//! Device-under-test control.
//!
//! The DUT is a CS35L41 boosted smart amplifier. Every call blocks until the
//! part is ready again (the board layer owns any "wait for ready" polling),
//! so callers never observe a command in flight.

use crate::board::BoardFault;

/// DUT boot mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BootMode {
    /// Boot the calibration firmware (only used to run self-calibration).
    Calibration,
    /// Boot the normal playback firmware.
    Normal,
}

/// Channel identity reported by the DUT.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DutIdentity {
    /// Left-channel amplifier.
    Left,
    /// Right-channel amplifier.
    Right,
    /// Any other id the board reported.
    Other(u8),
}

/// Error returned when a value is out of the valid range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct OutOfRangeError {
    /// The rejected value.
    pub value: i16,
    /// Inclusive minimum.
    pub min: i16,
    /// Inclusive maximum.
    pub max: i16,
}

// ── GainDb ───────────────────────────────────────────────────────────────────

/// Digital (PCM) gain in whole dB, limited to the CS35L41 range −102..=+12 dB.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct GainDb(i8);

impl GainDb {
    /// Lowest settable gain.
    pub const MIN: Self = Self(-102);
    /// Highest settable gain.
    pub const MAX: Self = Self(12);
    /// Unity gain.
    pub const UNITY: Self = Self(0);

    /// Create a gain, clamping into `MIN..=MAX`.
    #[must_use]
    pub const fn new(db: i8) -> Self {
        if db < Self::MIN.0 {
            Self::MIN
        } else if db > Self::MAX.0 {
            Self::MAX
        } else {
            Self(db)
        }
    }

    /// Create a gain, rejecting values outside `MIN..=MAX`.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRangeError`] if `db` is outside −102..=12.
    pub fn try_new(db: i16) -> Result<Self, OutOfRangeError> {
        let min = i16::from(Self::MIN.0);
        let max = i16::from(Self::MAX.0);
        if (min..=max).contains(&db) {
            // In range, so it fits in i8.
            #[allow(clippy::cast_possible_truncation)]
            Ok(Self(db as i8))
        } else {
            Err(OutOfRangeError {
                value: db,
                min,
                max,
            })
        }
    }

    /// Gain in dB.
    #[must_use]
    pub const fn get(self) -> i8 {
        self.0
    }

    /// `AMP_VOL_PCM` field value: 11-bit two's complement, 0.125 dB per LSB.
    ///
    /// 0 dB → `0x000`, −6 dB → `0x7D0`, +12 dB → `0x060`.
    #[must_use]
    pub fn to_pcm_volume_code(self) -> u16 {
        // −816..=96 steps; always representable in 11 bits.
        let steps = i16::from(self.0).saturating_mul(8);
        #[allow(clippy::cast_sign_loss)]
        let raw = steps as u16;
        raw & PCM_VOLUME_MASK
    }
}

/// Width mask of the `AMP_VOL_PCM` field.
pub const PCM_VOLUME_MASK: u16 = 0x07FF;

impl core::fmt::Display for GainDb {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{} dB", self.0)
    }
}

// ── DeviceControl ────────────────────────────────────────────────────────────

/// Lifecycle and status operations on the DUT.
pub trait DeviceControl {
    /// Hardware reset.
    fn reset(&mut self) -> Result<(), BoardFault>;

    /// Load firmware and boot in `mode`.
    fn boot(&mut self, mode: BootMode) -> Result<(), BoardFault>;

    /// Power up the amplifier.
    fn power_up(&mut self) -> Result<(), BoardFault>;

    /// Power down the amplifier.
    fn power_down(&mut self) -> Result<(), BoardFault>;

    /// Run the speaker calibration routine. Requires calibration boot.
    fn calibrate(&mut self) -> Result<(), BoardFault>;

    /// Mute (`true`) or unmute (`false`) the output.
    fn mute(&mut self, muted: bool) -> Result<(), BoardFault>;

    /// Enter hibernation.
    fn hibernate(&mut self) -> Result<(), BoardFault>;

    /// Leave hibernation.
    fn wake(&mut self) -> Result<(), BoardFault>;

    /// Read the channel identity.
    fn identity(&mut self) -> Result<DutIdentity, BoardFault>;

    /// Apply a digital gain trim.
    fn set_digital_gain(&mut self, gain: GainDb) -> Result<(), BoardFault>;

    /// Whether the DSP has started processing audio.
    fn is_processing(&mut self) -> Result<bool, BoardFault>;
}
