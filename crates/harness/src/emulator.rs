//! Emulator board
//!
//! Desktop stand-in for the board-support layer. Provides the same
//! interface as the hardware BSP so the harness can be stepped from a
//! terminal without a CS35L41 attached.
//!
//! Button presses arrive over a channel. The simulated DUT enforces the
//! ordering the real part needs (boot before power-up, calibration firmware
//! before calibrate, wake before anything after hibernate) and reports
//! violations through the fault callback, exactly like a BSP error would.

#![allow(clippy::use_debug)] // desktop-only; Debug output goes to tracing

use platform::{
    AudioPlayback, BoardFault, BoardStatus, BoardSupport, BootMode, ButtonId, ButtonInput,
    DeviceControl, DutIdentity, FaultLatch, GainDb, IdleWait, TestSignal,
};
use tokio::sync::mpsc;
use tokio::time::Duration;

/// Command issued before the DUT was booted.
pub const STATUS_NOT_BOOTED: BoardStatus = BoardStatus(0x10);
/// `calibrate` outside calibration firmware or while powered down.
pub const STATUS_WRONG_MODE: BoardStatus = BoardStatus(0x11);
/// Command issued while hibernating.
pub const STATUS_HIBERNATING: BoardStatus = BoardStatus(0x12);

/// Simulated CS35L41.
#[derive(Debug, Clone)]
pub struct SimulatedDut {
    identity: DutIdentity,
    processing_latency: u32,
    booted: Option<BootMode>,
    powered: bool,
    hibernating: bool,
    muted: bool,
    gain: GainDb,
    polls_since_power_up: u32,
}

impl SimulatedDut {
    /// DUT reporting `identity` whose DSP starts processing after
    /// `processing_latency` status polls following a normal-mode power-up.
    pub fn new(identity: DutIdentity, processing_latency: u32) -> Self {
        Self {
            identity,
            processing_latency,
            booted: None,
            powered: false,
            hibernating: false,
            muted: false,
            gain: GainDb::UNITY,
            polls_since_power_up: 0,
        }
    }

    /// Current gain trim.
    pub fn gain(&self) -> GainDb {
        self.gain
    }

    /// Whether the output is muted.
    pub fn is_muted(&self) -> bool {
        self.muted
    }

    /// Whether the amplifier is powered.
    pub fn is_powered(&self) -> bool {
        self.powered
    }

    fn require_awake(&self) -> Result<(), BoardStatus> {
        if self.hibernating {
            Err(STATUS_HIBERNATING)
        } else {
            Ok(())
        }
    }

    fn require_booted(&self) -> Result<BootMode, BoardStatus> {
        self.require_awake()?;
        self.booted.ok_or(STATUS_NOT_BOOTED)
    }
}

/// Emulator board
pub struct SimulatedBoard {
    dut: SimulatedDut,
    presses: mpsc::UnboundedReceiver<()>,
    input_open: bool,
    pending_presses: u32,
    tick: Duration,
    faults: Option<&'static FaultLatch>,
    playing: Option<TestSignal>,
}

impl SimulatedBoard {
    /// Board driving `dut`, fed presses from `presses`, idling at most
    /// `tick` between iterations.
    pub fn new(dut: SimulatedDut, presses: mpsc::UnboundedReceiver<()>, tick: Duration) -> Self {
        Self {
            dut,
            presses,
            input_open: true,
            pending_presses: 0,
            tick,
            faults: None,
            playing: None,
        }
    }

    /// The simulated DUT.
    pub fn dut(&self) -> &SimulatedDut {
        &self.dut
    }

    /// Signal currently streaming.
    pub fn playing(&self) -> Option<TestSignal> {
        self.playing
    }

    /// Report `status` through the fault callback and hand it back as an error.
    fn fault(&self, status: BoardStatus) -> BoardFault {
        tracing::warn!(status = status.0, "BSP error");
        if let Some(faults) = self.faults {
            faults.report(status);
        }
        BoardFault::new(status)
    }

    fn check(&self, result: Result<(), BoardStatus>) -> Result<(), BoardFault> {
        result.map_err(|status| self.fault(status))
    }

    fn drain_presses(&mut self) {
        loop {
            match self.presses.try_recv() {
                Ok(()) => self.pending_presses = self.pending_presses.saturating_add(1),
                Err(mpsc::error::TryRecvError::Empty) => break,
                Err(mpsc::error::TryRecvError::Disconnected) => {
                    self.input_open = false;
                    break;
                }
            }
        }
    }
}

impl BoardSupport for SimulatedBoard {
    fn initialize(&mut self, faults: &'static FaultLatch) -> Result<(), BoardFault> {
        tracing::debug!(tick_ms = self.tick.as_millis() as u64, "Emulator board initialized");
        self.faults = Some(faults);
        Ok(())
    }

    fn initialize_dut(&mut self) -> Result<(), BoardFault> {
        tracing::debug!(identity = ?self.dut.identity, "Emulator DUT initialized");
        Ok(())
    }

    fn process_pending(&mut self) -> Result<(), BoardFault> {
        self.drain_presses();
        Ok(())
    }
}

impl DeviceControl for SimulatedBoard {
    fn reset(&mut self) -> Result<(), BoardFault> {
        tracing::info!("DUT: reset");
        let identity = self.dut.identity;
        let latency = self.dut.processing_latency;
        self.dut = SimulatedDut::new(identity, latency);
        Ok(())
    }

    fn boot(&mut self, mode: BootMode) -> Result<(), BoardFault> {
        tracing::info!(?mode, "DUT: boot");
        self.check(self.dut.require_awake())?;
        self.dut.booted = Some(mode);
        self.dut.powered = false;
        Ok(())
    }

    fn power_up(&mut self) -> Result<(), BoardFault> {
        tracing::info!("DUT: power up");
        self.check(self.dut.require_booted().map(|_| ()))?;
        self.dut.powered = true;
        self.dut.polls_since_power_up = 0;
        Ok(())
    }

    fn power_down(&mut self) -> Result<(), BoardFault> {
        tracing::info!("DUT: power down");
        self.check(self.dut.require_booted().map(|_| ()))?;
        self.dut.powered = false;
        Ok(())
    }

    fn calibrate(&mut self) -> Result<(), BoardFault> {
        tracing::info!("DUT: calibrate");
        let mode = self.dut.require_booted().map_err(|status| self.fault(status))?;
        if mode != BootMode::Calibration || !self.dut.powered {
            return Err(self.fault(STATUS_WRONG_MODE));
        }
        Ok(())
    }

    fn mute(&mut self, muted: bool) -> Result<(), BoardFault> {
        tracing::info!(muted, "DUT: mute");
        self.check(self.dut.require_booted().map(|_| ()))?;
        self.dut.muted = muted;
        Ok(())
    }

    fn hibernate(&mut self) -> Result<(), BoardFault> {
        tracing::info!("DUT: hibernate");
        self.check(self.dut.require_awake())?;
        self.dut.hibernating = true;
        Ok(())
    }

    fn wake(&mut self) -> Result<(), BoardFault> {
        tracing::info!("DUT: wake");
        self.dut.hibernating = false;
        Ok(())
    }

    fn identity(&mut self) -> Result<DutIdentity, BoardFault> {
        self.check(self.dut.require_booted().map(|_| ()))?;
        tracing::info!(identity = ?self.dut.identity, "DUT: identity");
        Ok(self.dut.identity)
    }

    fn set_digital_gain(&mut self, gain: GainDb) -> Result<(), BoardFault> {
        tracing::info!(%gain, code = gain.to_pcm_volume_code(), "DUT: digital gain");
        self.check(self.dut.require_booted().map(|_| ()))?;
        self.dut.gain = gain;
        Ok(())
    }

    fn is_processing(&mut self) -> Result<bool, BoardFault> {
        let mode = self.dut.require_booted().map_err(|status| self.fault(status))?;
        if mode != BootMode::Normal || !self.dut.powered {
            tracing::info!(processing = false, "DUT: status");
            return Ok(false);
        }
        self.dut.polls_since_power_up = self.dut.polls_since_power_up.saturating_add(1);
        let processing = self.dut.polls_since_power_up > self.dut.processing_latency;
        tracing::info!(processing, "DUT: status");
        Ok(processing)
    }
}

impl AudioPlayback for SimulatedBoard {
    fn stop(&mut self) -> Result<(), BoardFault> {
        tracing::info!("Audio: stop");
        self.playing = None;
        Ok(())
    }

    fn play(&mut self, signal: TestSignal) -> Result<(), BoardFault> {
        tracing::info!(?signal, "Audio: play");
        self.playing = Some(signal);
        Ok(())
    }
}

impl ButtonInput for SimulatedBoard {
    fn consume_edge(&mut self, button: ButtonId) -> bool {
        match button {
            ButtonId::User => {
                self.drain_presses();
                let pressed = self.pending_presses > 0;
                self.pending_presses = 0;
                pressed
            }
        }
    }
}

impl IdleWait for SimulatedBoard {
    async fn idle_until_next_event(&mut self) {
        if !self.input_open {
            tokio::time::sleep(self.tick).await;
            return;
        }
        tokio::select! {
            press = self.presses.recv() => match press {
                Some(()) => self.pending_presses = self.pending_presses.saturating_add(1),
                None => self.input_open = false,
            },
            () = tokio::time::sleep(self.tick) => {}
        }
    }
}
