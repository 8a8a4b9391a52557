//! State-table tests for the push-button sequencer.
//!
//! Each row: from a given state, one press issues exactly these DUT/playback
//! commands, in this order, and lands in exactly this state.
//!
//! Run with: cargo test -p harness --test sequencer_table

#![allow(clippy::unwrap_used, clippy::indexing_slicing, clippy::arithmetic_side_effects)]

use harness::{HarnessConfig, Sequencer, SequencerState};
use platform::mocks::{BoardCall, MockBoard};
use platform::{
    BoardFault, BoardStatus, BoardSupport, BootMode, DutIdentity, FaultLatch, GainDb, TestSignal,
};

/// Never reported into: the mock only reports when handed a latch.
static NO_FAULTS: FaultLatch = FaultLatch::new();

fn press_from(state: SequencerState, board: &mut MockBoard) -> SequencerState {
    let mut seq = Sequencer::resume_at(state, HarnessConfig::default());
    seq.advance(true, board, &NO_FAULTS).unwrap()
}

fn assert_row(state: SequencerState, expected_calls: &[BoardCall], expected_next: SequencerState) {
    let mut board = MockBoard::new();
    let next = press_from(state, &mut board);
    assert_eq!(board.calls(), expected_calls, "commands issued from {state}");
    assert_eq!(next, expected_next, "successor of {state}");
}

// ── Rows ─────────────────────────────────────────────────────────────────────

#[test]
fn cal_powered_down_boots_calibration_firmware() {
    assert_row(
        SequencerState::CalPoweredDown,
        &[
            BoardCall::StopPlayback,
            BoardCall::Play(TestSignal::Silence),
            BoardCall::Reset,
            BoardCall::Boot(BootMode::Calibration),
        ],
        SequencerState::CalBooted,
    );
}

#[test]
fn cal_booted_powers_up() {
    assert_row(SequencerState::CalBooted, &[BoardCall::PowerUp], SequencerState::CalPoweredUp);
}

#[test]
fn cal_powered_up_calibrates() {
    assert_row(SequencerState::CalPoweredUp, &[BoardCall::Calibrate], SequencerState::Calibrated);
}

#[test]
fn calibrated_powers_down() {
    assert_row(SequencerState::Calibrated, &[BoardCall::PowerDown], SequencerState::PoweredDown);
}

#[test]
fn powered_down_boots_normal_firmware_with_left_trim() {
    assert_row(
        SequencerState::PoweredDown,
        &[
            BoardCall::StopPlayback,
            BoardCall::Play(TestSignal::Stereo1kHz20dBFs),
            BoardCall::Reset,
            BoardCall::Boot(BootMode::Normal),
            BoardCall::Identity,
            BoardCall::SetDigitalGain(GainDb::new(-6)),
        ],
        SequencerState::Booted,
    );
}

#[test]
fn booted_powers_up() {
    assert_row(SequencerState::Booted, &[BoardCall::PowerUp], SequencerState::CheckProcessing);
}

#[test]
fn check_processing_advances_when_processing() {
    assert_row(
        SequencerState::CheckProcessing,
        &[BoardCall::IsProcessing],
        SequencerState::ProcessingConfirmed,
    );
}

#[test]
fn processing_confirmed_mutes() {
    assert_row(
        SequencerState::ProcessingConfirmed,
        &[BoardCall::Mute(true)],
        SequencerState::Muted,
    );
}

#[test]
fn muted_unmutes() {
    assert_row(SequencerState::Muted, &[BoardCall::Mute(false)], SequencerState::Unmuted);
}

#[test]
fn unmuted_powers_down() {
    assert_row(SequencerState::Unmuted, &[BoardCall::PowerDown], SequencerState::Hibernating);
}

#[test]
fn hibernating_hibernates() {
    assert_row(SequencerState::Hibernating, &[BoardCall::Hibernate], SequencerState::Waking);
}

#[test]
fn waking_wakes_and_restarts_cycle() {
    assert_row(SequencerState::Waking, &[BoardCall::Wake], SequencerState::CalPoweredDown);
}

// ── No trigger ───────────────────────────────────────────────────────────────

#[test]
fn no_press_never_touches_the_board() {
    for state in SequencerState::ALL {
        let mut board = MockBoard::new();
        let mut seq = Sequencer::resume_at(state, HarnessConfig::default());
        assert_eq!(seq.advance(false, &mut board, &NO_FAULTS), Ok(state));
        assert_eq!(seq.state(), state);
        assert!(board.calls().is_empty(), "{state} issued commands without a press");
    }
}

// ── CHECK_PROCESSING branch ──────────────────────────────────────────────────

#[test]
fn check_processing_holds_while_not_processing() {
    let mut board = MockBoard::new();
    board.processing_default = false;
    let mut seq = Sequencer::resume_at(SequencerState::CheckProcessing, HarnessConfig::default());
    for _ in 0..10 {
        assert_eq!(
            seq.advance(true, &mut board, &NO_FAULTS),
            Ok(SequencerState::CheckProcessing)
        );
    }
    assert_eq!(board.calls().len(), 10);
    assert!(board.calls().iter().all(|c| *c == BoardCall::IsProcessing));
}

#[test]
fn check_processing_advances_on_first_true() {
    let mut board = MockBoard::new();
    board.script_processing(&[false, false, true]).unwrap();
    let mut seq = Sequencer::resume_at(SequencerState::CheckProcessing, HarnessConfig::default());
    assert_eq!(
        seq.advance(true, &mut board, &NO_FAULTS),
        Ok(SequencerState::CheckProcessing)
    );
    assert_eq!(
        seq.advance(true, &mut board, &NO_FAULTS),
        Ok(SequencerState::CheckProcessing)
    );
    assert_eq!(
        seq.advance(true, &mut board, &NO_FAULTS),
        Ok(SequencerState::ProcessingConfirmed)
    );
    assert_eq!(board.calls(), &[BoardCall::IsProcessing; 3]);
}

// ── Faults reported mid-step ─────────────────────────────────────────────────

fn leaked_latch() -> &'static FaultLatch {
    Box::leak(Box::new(FaultLatch::new()))
}

#[test]
fn callback_fault_during_normal_boot_stops_before_gain() {
    let latch = leaked_latch();
    let mut board = MockBoard::new();
    board.initialize(latch).unwrap();
    board.report_on(BoardCall::Boot(BootMode::Normal), BoardStatus(0x31));
    let mut seq = Sequencer::resume_at(SequencerState::PoweredDown, HarnessConfig::default());

    assert_eq!(
        seq.advance(true, &mut board, latch),
        Err(BoardFault::new(BoardStatus(0x31)))
    );
    assert_eq!(seq.state(), SequencerState::PoweredDown);
    assert_eq!(board.calls().last(), Some(&BoardCall::Boot(BootMode::Normal)));
    assert_eq!(board.gain, None);
}

#[test]
fn callback_fault_in_any_row_keeps_the_state() {
    for state in SequencerState::ALL {
        let latch = leaked_latch();
        let mut board = MockBoard::new();
        board.initialize(latch).unwrap();
        let mut seq = Sequencer::resume_at(state, HarnessConfig::default());
        // Learn the row's first command, then fault on it.
        let first = {
            let mut dry_run = MockBoard::new();
            Sequencer::resume_at(state, HarnessConfig::default())
                .advance(true, &mut dry_run, &NO_FAULTS)
                .unwrap();
            dry_run.calls()[0]
        };
        board.report_on(first, BoardStatus(0x40));

        assert_eq!(
            seq.advance(true, &mut board, latch),
            Err(BoardFault::new(BoardStatus(0x40))),
            "{state} ignored a callback fault"
        );
        assert_eq!(seq.state(), state);
        assert_eq!(board.calls(), &[first], "{state} kept issuing after the fault");
    }
}

// ── Gain selection ───────────────────────────────────────────────────────────

fn gain_calls(board: &MockBoard) -> Vec<GainDb> {
    board
        .calls()
        .iter()
        .filter_map(|c| match c {
            BoardCall::SetDigitalGain(g) => Some(*g),
            _ => None,
        })
        .collect()
}

#[test]
fn left_identity_gets_minus_six() {
    let mut board = MockBoard::new().with_identity(DutIdentity::Left);
    press_from(SequencerState::PoweredDown, &mut board);
    assert_eq!(gain_calls(&board), vec![GainDb::new(-6)]);
}

#[test]
fn right_identity_gets_minus_ten() {
    let mut board = MockBoard::new().with_identity(DutIdentity::Right);
    press_from(SequencerState::PoweredDown, &mut board);
    assert_eq!(gain_calls(&board), vec![GainDb::new(-10)]);
}

#[test]
fn unknown_identity_gets_minus_ten() {
    let mut board = MockBoard::new().with_identity(DutIdentity::Other(0x7f));
    press_from(SequencerState::PoweredDown, &mut board);
    assert_eq!(gain_calls(&board), vec![GainDb::new(-10)]);
}

// ── Full cycle ───────────────────────────────────────────────────────────────

#[test]
fn twelve_presses_return_to_start_issuing_each_action_once() {
    let mut board = MockBoard::new().with_identity(DutIdentity::Right);
    let mut seq = Sequencer::default();

    let mut visited = Vec::new();
    for _ in 0..12 {
        visited.push(seq.state());
        seq.advance(true, &mut board, &NO_FAULTS).unwrap();
    }

    assert_eq!(seq.state(), SequencerState::CalPoweredDown);
    assert_eq!(visited, SequencerState::ALL.to_vec());
    assert_eq!(
        board.calls(),
        &[
            BoardCall::StopPlayback,
            BoardCall::Play(TestSignal::Silence),
            BoardCall::Reset,
            BoardCall::Boot(BootMode::Calibration),
            BoardCall::PowerUp,
            BoardCall::Calibrate,
            BoardCall::PowerDown,
            BoardCall::StopPlayback,
            BoardCall::Play(TestSignal::Stereo1kHz20dBFs),
            BoardCall::Reset,
            BoardCall::Boot(BootMode::Normal),
            BoardCall::Identity,
            BoardCall::SetDigitalGain(GainDb::new(-10)),
            BoardCall::PowerUp,
            BoardCall::IsProcessing,
            BoardCall::Mute(true),
            BoardCall::Mute(false),
            BoardCall::PowerDown,
            BoardCall::Hibernate,
            BoardCall::Wake,
        ]
    );
}

#[test]
fn second_cycle_repeats_the_first() {
    let mut board = MockBoard::new();
    let mut seq = Sequencer::default();
    for _ in 0..12 {
        seq.advance(true, &mut board, &NO_FAULTS).unwrap();
    }
    let first: Vec<BoardCall> = board.calls().to_vec();
    board.clear_calls();
    for _ in 0..12 {
        seq.advance(true, &mut board, &NO_FAULTS).unwrap();
    }
    assert_eq!(board.calls(), first.as_slice());
    assert_eq!(seq.state(), SequencerState::CalPoweredDown);
}
