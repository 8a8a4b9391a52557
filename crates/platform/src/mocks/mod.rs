//! Mock implementations for testing
//!
//! [`MockBoard`] implements every platform trait without hardware and keeps
//! an ordered log of the DUT and playback commands it received, so tests can
//! assert exact command sequences.

#![cfg(any(test, feature = "std"))]

use crate::*;

/// Capacity of the [`MockBoard`] command log. Later commands are dropped.
pub const CALL_LOG_CAPACITY: usize = 128;

/// Capacity of the scripted `is_processing` answers.
pub const PROCESSING_SCRIPT_CAPACITY: usize = 16;

/// One DUT or playback command observed by [`MockBoard`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoardCall {
    /// [`DeviceControl::reset`]
    Reset,
    /// [`DeviceControl::boot`]
    Boot(BootMode),
    /// [`DeviceControl::power_up`]
    PowerUp,
    /// [`DeviceControl::power_down`]
    PowerDown,
    /// [`DeviceControl::calibrate`]
    Calibrate,
    /// [`DeviceControl::mute`]
    Mute(bool),
    /// [`DeviceControl::hibernate`]
    Hibernate,
    /// [`DeviceControl::wake`]
    Wake,
    /// [`DeviceControl::identity`]
    Identity,
    /// [`DeviceControl::set_digital_gain`]
    SetDigitalGain(GainDb),
    /// [`DeviceControl::is_processing`]
    IsProcessing,
    /// [`AudioPlayback::stop`]
    StopPlayback,
    /// [`AudioPlayback::play`]
    Play(TestSignal),
}

/// Failure injected on one command.
#[derive(Debug, Clone, Copy)]
struct Injected {
    call: BoardCall,
    status: BoardStatus,
    report: bool,
}

/// Mock board — records all commands for test assertions.
pub struct MockBoard {
    calls: heapless::Vec<BoardCall, CALL_LOG_CAPACITY>,
    faults: Option<&'static FaultLatch>,
    fail_on: Option<Injected>,
    report_on: Option<(BoardCall, BoardStatus)>,
    background_fault: Option<BoardStatus>,
    /// Identity reported by [`DeviceControl::identity`].
    pub identity: DutIdentity,
    processing_script: heapless::Deque<bool, PROCESSING_SCRIPT_CAPACITY>,
    /// `is_processing` answer once the script is exhausted.
    pub processing_default: bool,
    pending_presses: u32,
    /// Whether [`BoardSupport::initialize`] has been called.
    pub initialized: bool,
    /// Whether [`BoardSupport::initialize_dut`] has been called.
    pub dut_initialized: bool,
    /// Number of [`BoardSupport::process_pending`] calls.
    pub process_pending_count: usize,
    /// Number of [`ButtonInput::consume_edge`] calls.
    pub edge_polls: usize,
    /// Number of completed [`IdleWait::idle_until_next_event`] calls.
    pub idle_count: usize,
    /// Last gain applied, if any.
    pub gain: Option<GainDb>,
    /// Current mute state.
    pub muted: bool,
    /// Signal currently playing.
    pub playing: Option<TestSignal>,
}

impl MockBoard {
    /// Create a mock reporting [`DutIdentity::Left`] and always processing.
    pub fn new() -> Self {
        Self {
            calls: heapless::Vec::new(),
            faults: None,
            fail_on: None,
            report_on: None,
            background_fault: None,
            identity: DutIdentity::Left,
            processing_script: heapless::Deque::new(),
            processing_default: true,
            pending_presses: 0,
            initialized: false,
            dut_initialized: false,
            process_pending_count: 0,
            edge_polls: 0,
            idle_count: 0,
            gain: None,
            muted: false,
            playing: None,
        }
    }

    /// Attach a fault latch without going through [`BoardSupport::initialize`].
    #[must_use]
    pub fn with_faults(mut self, faults: &'static FaultLatch) -> Self {
        self.faults = Some(faults);
        self
    }

    /// Set the identity the DUT reports.
    #[must_use]
    pub fn with_identity(mut self, identity: DutIdentity) -> Self {
        self.identity = identity;
        self
    }

    /// Commands observed so far, oldest first.
    pub fn calls(&self) -> &[BoardCall] {
        &self.calls
    }

    /// Forget recorded commands.
    pub fn clear_calls(&mut self) {
        self.calls.clear();
    }

    /// Simulate one operator press. Presses accumulate until consumed.
    #[allow(clippy::arithmetic_side_effects)] // Mock counter; overflow not a concern in tests
    pub fn press(&mut self) {
        self.pending_presses += 1;
    }

    /// Queue answers for the next `is_processing` calls.
    pub fn script_processing(&mut self, answers: &[bool]) -> Result<(), bool> {
        for &answer in answers {
            self.processing_script.push_back(answer)?;
        }
        Ok(())
    }

    /// Make `call` fail with `status`, reporting into the fault latch as well.
    pub fn fail_on(&mut self, call: BoardCall, status: BoardStatus) {
        self.fail_on = Some(Injected { call, status, report: true });
    }

    /// Make `call` fail with `status` without touching the fault latch.
    pub fn fail_quietly_on(&mut self, call: BoardCall, status: BoardStatus) {
        self.fail_on = Some(Injected { call, status, report: false });
    }

    /// Report `status` through the fault callback while `call` runs, but let
    /// the call itself return `Ok`, as an interrupt-time fault would.
    pub fn report_on(&mut self, call: BoardCall, status: BoardStatus) {
        self.report_on = Some((call, status));
    }

    /// Report `status` through the fault callback during the next
    /// `process_pending`, while the call itself succeeds.
    pub fn raise_background_fault(&mut self, status: BoardStatus) {
        self.background_fault = Some(status);
    }

    fn record(&mut self, call: BoardCall) -> Result<(), BoardFault> {
        if self.calls.len() < self.calls.capacity() {
            let _ = self.calls.push(call);
        }
        if let (Some((target, status)), Some(faults)) = (self.report_on, self.faults) {
            if target == call {
                faults.report(status);
            }
        }
        match self.fail_on {
            Some(injected) if injected.call == call => {
                if let (true, Some(faults)) = (injected.report, self.faults) {
                    faults.report(injected.status);
                }
                Err(BoardFault::new(injected.status))
            }
            _ => Ok(()),
        }
    }
}

impl Default for MockBoard {
    fn default() -> Self {
        Self::new()
    }
}

impl BoardSupport for MockBoard {
    fn initialize(&mut self, faults: &'static FaultLatch) -> Result<(), BoardFault> {
        self.faults = Some(faults);
        self.initialized = true;
        Ok(())
    }

    fn initialize_dut(&mut self) -> Result<(), BoardFault> {
        self.dut_initialized = true;
        Ok(())
    }

    #[allow(clippy::arithmetic_side_effects)] // Mock counter; overflow not a concern in tests
    fn process_pending(&mut self) -> Result<(), BoardFault> {
        self.process_pending_count += 1;
        if let (Some(status), Some(faults)) = (self.background_fault.take(), self.faults) {
            faults.report(status);
        }
        Ok(())
    }
}

impl DeviceControl for MockBoard {
    fn reset(&mut self) -> Result<(), BoardFault> {
        self.record(BoardCall::Reset)
    }

    fn boot(&mut self, mode: BootMode) -> Result<(), BoardFault> {
        self.record(BoardCall::Boot(mode))
    }

    fn power_up(&mut self) -> Result<(), BoardFault> {
        self.record(BoardCall::PowerUp)
    }

    fn power_down(&mut self) -> Result<(), BoardFault> {
        self.record(BoardCall::PowerDown)
    }

    fn calibrate(&mut self) -> Result<(), BoardFault> {
        self.record(BoardCall::Calibrate)
    }

    fn mute(&mut self, muted: bool) -> Result<(), BoardFault> {
        self.record(BoardCall::Mute(muted))?;
        self.muted = muted;
        Ok(())
    }

    fn hibernate(&mut self) -> Result<(), BoardFault> {
        self.record(BoardCall::Hibernate)
    }

    fn wake(&mut self) -> Result<(), BoardFault> {
        self.record(BoardCall::Wake)
    }

    fn identity(&mut self) -> Result<DutIdentity, BoardFault> {
        self.record(BoardCall::Identity)?;
        Ok(self.identity)
    }

    fn set_digital_gain(&mut self, gain: GainDb) -> Result<(), BoardFault> {
        self.record(BoardCall::SetDigitalGain(gain))?;
        self.gain = Some(gain);
        Ok(())
    }

    fn is_processing(&mut self) -> Result<bool, BoardFault> {
        self.record(BoardCall::IsProcessing)?;
        Ok(self
            .processing_script
            .pop_front()
            .unwrap_or(self.processing_default))
    }
}

impl AudioPlayback for MockBoard {
    fn stop(&mut self) -> Result<(), BoardFault> {
        self.record(BoardCall::StopPlayback)?;
        self.playing = None;
        Ok(())
    }

    fn play(&mut self, signal: TestSignal) -> Result<(), BoardFault> {
        self.record(BoardCall::Play(signal))?;
        self.playing = Some(signal);
        Ok(())
    }
}

impl ButtonInput for MockBoard {
    #[allow(clippy::arithmetic_side_effects)] // Mock counter; overflow not a concern in tests
    fn consume_edge(&mut self, button: ButtonId) -> bool {
        self.edge_polls += 1;
        match button {
            ButtonId::User => {
                let pressed = self.pending_presses > 0;
                self.pending_presses = 0;
                pressed
            }
        }
    }
}

impl IdleWait for MockBoard {
    #[allow(clippy::arithmetic_side_effects)] // Mock counter; overflow not a concern in tests
    async fn idle_until_next_event(&mut self) {
        self.idle_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaked_latch() -> &'static FaultLatch {
        std::boxed::Box::leak(std::boxed::Box::new(FaultLatch::new()))
    }

    #[test]
    fn test_calls_are_logged_in_order() {
        let mut board = MockBoard::new();
        board.stop().unwrap();
        board.play(TestSignal::Silence).unwrap();
        board.reset().unwrap();
        board.boot(BootMode::Calibration).unwrap();
        assert_eq!(
            board.calls(),
            &[
                BoardCall::StopPlayback,
                BoardCall::Play(TestSignal::Silence),
                BoardCall::Reset,
                BoardCall::Boot(BootMode::Calibration),
            ]
        );
        assert_eq!(board.playing, Some(TestSignal::Silence));
    }

    #[test]
    fn test_presses_collapse_into_one_edge() {
        let mut board = MockBoard::new();
        board.press();
        board.press();
        assert!(board.consume_edge(ButtonId::User));
        assert!(!board.consume_edge(ButtonId::User));
        assert_eq!(board.edge_polls, 2);
    }

    #[test]
    fn test_processing_script_then_default() {
        let mut board = MockBoard::new();
        board.processing_default = false;
        board.script_processing(&[false, true]).unwrap();
        assert!(!board.is_processing().unwrap());
        assert!(board.is_processing().unwrap());
        assert!(!board.is_processing().unwrap());
    }

    #[test]
    fn test_fail_on_reports_and_errs() {
        let latch = leaked_latch();
        let mut board = MockBoard::new().with_faults(latch);
        board.fail_on(BoardCall::PowerUp, BoardStatus(7));
        assert_eq!(board.power_up(), Err(BoardFault::new(BoardStatus(7))));
        assert_eq!(latch.fault(), Some(BoardFault::new(BoardStatus(7))));
        assert_eq!(board.power_down(), Ok(()));
    }

    #[test]
    fn test_fail_quietly_leaves_latch_clear() {
        let latch = leaked_latch();
        let mut board = MockBoard::new().with_faults(latch);
        board.fail_quietly_on(BoardCall::Reset, BoardStatus(4));
        assert_eq!(board.reset(), Err(BoardFault::new(BoardStatus(4))));
        assert!(!latch.is_faulted());
    }

    #[test]
    fn test_report_on_latches_but_call_succeeds() {
        let latch = leaked_latch();
        let mut board = MockBoard::new().with_faults(latch);
        board.report_on(BoardCall::Reset, BoardStatus(0x55));
        assert_eq!(board.reset(), Ok(()));
        assert_eq!(latch.fault(), Some(BoardFault::new(BoardStatus(0x55))));
    }

    #[test]
    fn test_background_fault_reported_on_process_pending() {
        let latch = leaked_latch();
        let mut board = MockBoard::new();
        board.initialize(latch).unwrap();
        board.raise_background_fault(BoardStatus(3));
        assert!(!latch.is_faulted());
        assert_eq!(board.process_pending(), Ok(()));
        assert!(latch.is_faulted());
        assert_eq!(board.process_pending_count, 1);
    }

    #[tokio::test]
    async fn test_idle_counts() {
        let mut board = MockBoard::new();
        board.idle_until_next_event().await;
        board.idle_until_next_event().await;
        assert_eq!(board.idle_count, 2);
    }
}
