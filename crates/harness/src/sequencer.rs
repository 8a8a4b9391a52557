//! Push-button test sequencer.
//!
//! Walks the DUT through a fixed lifecycle, one step per operator press:
//!
//! ```text
//! CAL_POWERED_DOWN ─► CAL_BOOTED ─► CAL_POWERED_UP ─► CALIBRATED ─► POWERED_DOWN
//!        ▲                                                              │
//!        │                                                              ▼
//!     WAKING ◄─ HIBERNATING ◄─ UNMUTED ◄─ MUTED ◄─ PROCESSING_CONFIRMED ◄─ CHECK_PROCESSING ◄─ BOOTED
//!                                                                        ⟲ (until processing)
//! ```
//!
//! On a press the actions of the *current* state run in order, then the
//! state moves on. A failing action leaves the state where it was, and so
//! does a fault reported through the [`FaultLatch`] while an action ran: no
//! further action of that step is issued.
//! CHECK_PROCESSING is the only conditional step: it stays put until the DUT
//! reports that its DSP is processing audio.

use platform::{AudioPlayback, BoardFault, BootMode, DeviceControl, FaultLatch, TestSignal};

use crate::config::HarnessConfig;
use crate::log;

/// Position in the test cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SequencerState {
    /// Cycle start: DUT idle, about to boot for calibration.
    CalPoweredDown,
    /// Calibration firmware booted.
    CalBooted,
    /// Powered up in calibration mode.
    CalPoweredUp,
    /// Calibration done.
    Calibrated,
    /// Powered down after calibration, about to boot normally.
    PoweredDown,
    /// Normal firmware booted, gain trimmed.
    Booted,
    /// Powered up, waiting for the DSP to report processing.
    CheckProcessing,
    /// DSP processing confirmed.
    ProcessingConfirmed,
    /// Output muted.
    Muted,
    /// Output unmuted.
    Unmuted,
    /// Powered down, about to hibernate.
    Hibernating,
    /// Hibernating, about to wake.
    Waking,
}

impl SequencerState {
    /// State entered at process start.
    pub const INITIAL: Self = Self::CalPoweredDown;

    /// Every state in cycle order.
    pub const ALL: [Self; 12] = [
        Self::CalPoweredDown,
        Self::CalBooted,
        Self::CalPoweredUp,
        Self::Calibrated,
        Self::PoweredDown,
        Self::Booted,
        Self::CheckProcessing,
        Self::ProcessingConfirmed,
        Self::Muted,
        Self::Unmuted,
        Self::Hibernating,
        Self::Waking,
    ];

    /// Next state in the cycle when the step completes.
    pub const fn successor(self) -> Self {
        match self {
            Self::CalPoweredDown => Self::CalBooted,
            Self::CalBooted => Self::CalPoweredUp,
            Self::CalPoweredUp => Self::Calibrated,
            Self::Calibrated => Self::PoweredDown,
            Self::PoweredDown => Self::Booted,
            Self::Booted => Self::CheckProcessing,
            Self::CheckProcessing => Self::ProcessingConfirmed,
            Self::ProcessingConfirmed => Self::Muted,
            Self::Muted => Self::Unmuted,
            Self::Unmuted => Self::Hibernating,
            Self::Hibernating => Self::Waking,
            Self::Waking => Self::CalPoweredDown,
        }
    }

    /// Stable label for logs.
    pub const fn name(self) -> &'static str {
        match self {
            Self::CalPoweredDown => "CAL_POWERED_DOWN",
            Self::CalBooted => "CAL_BOOTED",
            Self::CalPoweredUp => "CAL_POWERED_UP",
            Self::Calibrated => "CALIBRATED",
            Self::PoweredDown => "POWERED_DOWN",
            Self::Booted => "BOOTED",
            Self::CheckProcessing => "CHECK_PROCESSING",
            Self::ProcessingConfirmed => "PROCESSING_CONFIRMED",
            Self::Muted => "MUTED",
            Self::Unmuted => "UNMUTED",
            Self::Hibernating => "HIBERNATING",
            Self::Waking => "WAKING",
        }
    }
}

impl Default for SequencerState {
    fn default() -> Self {
        Self::INITIAL
    }
}

impl core::fmt::Display for SequencerState {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.name())
    }
}

/// The test sequencer. Owns the current state; holds no hardware.
#[derive(Debug, Clone)]
pub struct Sequencer {
    state: SequencerState,
    config: HarnessConfig,
}

impl Sequencer {
    /// Sequencer at [`SequencerState::INITIAL`].
    pub fn new(config: HarnessConfig) -> Self {
        Self::resume_at(SequencerState::INITIAL, config)
    }

    /// Sequencer positioned at `state`.
    pub fn resume_at(state: SequencerState, config: HarnessConfig) -> Self {
        Self { state, config }
    }

    /// Current state.
    pub fn state(&self) -> SequencerState {
        self.state
    }

    /// Configuration in use.
    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Evaluate one button edge.
    ///
    /// Without a press nothing happens. With a press the current state's
    /// actions run in order, then the state is updated. Returns the state
    /// after the call.
    ///
    /// `faults` is checked before the step and after every board call.
    ///
    /// # Errors
    ///
    /// The first failing board call, or the fault latched while it ran, is
    /// returned and the state is left unchanged.
    pub fn advance<B>(
        &mut self,
        pressed: bool,
        board: &mut B,
        faults: &FaultLatch,
    ) -> Result<SequencerState, BoardFault>
    where
        B: DeviceControl + AudioPlayback + ?Sized,
    {
        if !pressed {
            return Ok(self.state);
        }
        faults.check()?;

        let from = self.state;
        let to = self.step(board, faults)?;
        self.state = to;

        if to == from {
            log::held(from);
        } else {
            log::transition(from, to);
        }
        Ok(to)
    }

    /// Run the actions of the current state and return the state to enter.
    fn step<B>(&self, board: &mut B, faults: &FaultLatch) -> Result<SequencerState, BoardFault>
    where
        B: DeviceControl + AudioPlayback + ?Sized,
    {
        match self.state {
            SequencerState::CalPoweredDown => {
                guarded(faults, board.stop())?;
                guarded(faults, board.play(TestSignal::Silence))?;
                guarded(faults, board.reset())?;
                guarded(faults, board.boot(BootMode::Calibration))?;
            }
            SequencerState::CalBooted | SequencerState::Booted => {
                guarded(faults, board.power_up())?;
            }
            SequencerState::CalPoweredUp => guarded(faults, board.calibrate())?,
            SequencerState::Calibrated | SequencerState::Unmuted => {
                guarded(faults, board.power_down())?;
            }
            SequencerState::PoweredDown => {
                guarded(faults, board.stop())?;
                guarded(faults, board.play(TestSignal::Stereo1kHz20dBFs))?;
                guarded(faults, board.reset())?;
                guarded(faults, board.boot(BootMode::Normal))?;
                let identity = guarded(faults, board.identity())?;
                guarded(faults, board.set_digital_gain(self.config.gain_for(identity)))?;
            }
            SequencerState::CheckProcessing => {
                if !guarded(faults, board.is_processing())? {
                    return Ok(SequencerState::CheckProcessing);
                }
            }
            SequencerState::ProcessingConfirmed => guarded(faults, board.mute(true))?,
            SequencerState::Muted => guarded(faults, board.mute(false))?,
            SequencerState::Hibernating => guarded(faults, board.hibernate())?,
            SequencerState::Waking => guarded(faults, board.wake())?,
        }
        Ok(self.state.successor())
    }
}

/// A board call's result, failed if a fault was latched while the call ran.
fn guarded<T>(faults: &FaultLatch, result: Result<T, BoardFault>) -> Result<T, BoardFault> {
    let value = result?;
    faults.check()?;
    Ok(value)
}

impl Default for Sequencer {
    fn default() -> Self {
        Self::new(HarnessConfig::default())
    }
}
