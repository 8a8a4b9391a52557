//! Run loop: polls the board, feeds button edges to the sequencer, idles.
//!
//! One iteration:
//!
//! ```text
//! fault? ─► process_pending ─► consume_edge ─► advance ─► clear edge ─► fault? ─► idle
//! ```
//!
//! The edge is cleared on every iteration, including ones where `advance`
//! did nothing or failed. The first fault, whether returned by a board call
//! or reported through the [`FaultLatch`], ends the loop before any further
//! transition.

use core::convert::Infallible;

use platform::{
    AudioPlayback, BoardFault, BoardSupport, ButtonInput, DeviceControl, FaultLatch, IdleWait,
};

use crate::button::EdgeLatch;
use crate::config::HarnessConfig;
use crate::log;
use crate::sequencer::{Sequencer, SequencerState};

/// Everything the run loop needs from the board-support layer.
pub trait HarnessBoard:
    BoardSupport + DeviceControl + AudioPlayback + ButtonInput + IdleWait
{
}

impl<T> HarnessBoard for T where
    T: BoardSupport + DeviceControl + AudioPlayback + ButtonInput + IdleWait
{
}

/// Drives a [`Sequencer`] against a board forever.
pub struct RunLoop<B> {
    board: B,
    sequencer: Sequencer,
    edge: EdgeLatch,
    faults: &'static FaultLatch,
}

impl<B: HarnessBoard> RunLoop<B> {
    /// Loop starting at [`SequencerState::INITIAL`].
    ///
    /// `faults` is handed to the board as its fault callback in
    /// [`start`](Self::start).
    pub fn new(board: B, config: HarnessConfig, faults: &'static FaultLatch) -> Self {
        Self {
            board,
            sequencer: Sequencer::new(config),
            edge: EdgeLatch::new(),
            faults,
        }
    }

    /// Board and DUT bring-up. Call once before [`iterate`](Self::iterate).
    pub fn start(&mut self) -> Result<(), BoardFault> {
        self.board.initialize(self.faults)?;
        self.faults.check()?;
        self.board.initialize_dut()?;
        self.faults.check()?;
        log::started();
        Ok(())
    }

    /// One loop iteration. Returns the sequencer state after it.
    ///
    /// # Errors
    ///
    /// Returns the first [`BoardFault`] observed. Once a fault is latched
    /// every later call fails immediately without touching the board.
    pub async fn iterate(&mut self) -> Result<SequencerState, BoardFault> {
        self.faults.check()?;
        self.board.process_pending()?;
        self.faults.check()?;

        let button = self.sequencer.config().button;
        self.edge.record(self.board.consume_edge(button));
        let outcome = self
            .sequencer
            .advance(self.edge.is_set(), &mut self.board, self.faults);
        self.edge.clear();
        let state = outcome?;

        self.faults.check()?;
        self.board.idle_until_next_event().await;
        Ok(state)
    }

    /// Bring up the board, then iterate until the first fault.
    ///
    /// Never returns `Ok`; the caller decides what a fault means for the
    /// process.
    pub async fn run(&mut self) -> Result<Infallible, BoardFault> {
        let outcome = self.run_inner().await;
        match outcome {
            Ok(never) => match never {},
            Err(fault) => {
                log::fault(fault, self.sequencer.state());
                Err(fault)
            }
        }
    }

    async fn run_inner(&mut self) -> Result<Infallible, BoardFault> {
        self.start()?;
        loop {
            self.iterate().await?;
        }
    }

    /// Current sequencer state.
    pub fn state(&self) -> SequencerState {
        self.sequencer.state()
    }

    /// The board.
    pub fn board(&self) -> &B {
        &self.board
    }

    /// The board, mutably.
    pub fn board_mut(&mut self) -> &mut B {
        &mut self.board
    }

    /// Give the board back.
    pub fn into_board(self) -> B {
        self.board
    }
}
