//! Board lifecycle, maintenance polling and fault reporting.
//!
//! The board-support layer reports internal errors out-of-band through a
//! callback. Here that callback is a [`FaultLatch`]: the board writes the
//! status word into it (possibly from interrupt context) and the run loop
//! polls it between steps.
//!
//! ```text
//! board layer ──report(status)──► FaultLatch ──fault()──► run loop ──Err──► main
//! ```

use core::sync::atomic::{AtomicU32, Ordering};

/// Raw status word returned by the board-support layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(transparent)]
pub struct BoardStatus(pub u32);

impl BoardStatus {
    /// Success.
    pub const OK: Self = Self(0);
    /// Generic failure, used when a call fails without a more specific code.
    pub const FAIL: Self = Self(1);

    /// Returns `true` for [`BoardStatus::OK`].
    pub const fn is_ok(self) -> bool {
        self.0 == Self::OK.0
    }
}

/// Unrecoverable board-support failure.
///
/// The only error kind in the harness. It is never retried: the first one
/// stops the sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct BoardFault {
    /// Status word reported by the board layer (never [`BoardStatus::OK`]).
    pub status: BoardStatus,
}

impl BoardFault {
    /// Fault carrying `status`.
    pub const fn new(status: BoardStatus) -> Self {
        Self { status }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for BoardFault {}

impl core::fmt::Display for BoardFault {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "board-support fault (status {:#x})", self.status.0)
    }
}

/// Sticky record of the first fault reported by the board layer.
///
/// `const`-constructible so it can sit in a `static` that the board layer
/// holds a `&'static` reference to.
#[derive(Debug)]
pub struct FaultLatch {
    status: AtomicU32,
}

impl FaultLatch {
    /// Empty latch.
    pub const fn new() -> Self {
        Self {
            status: AtomicU32::new(BoardStatus::OK.0),
        }
    }

    /// Fault callback entry point.
    ///
    /// `OK` is ignored. Only the first non-OK status is kept; later reports
    /// never overwrite it.
    pub fn report(&self, status: BoardStatus) {
        if status.is_ok() {
            return;
        }
        // Losing the exchange means a fault is already latched.
        let _ = self.status.compare_exchange(
            BoardStatus::OK.0,
            status.0,
            Ordering::AcqRel,
            Ordering::Acquire,
        );
    }

    /// The latched fault, if any.
    pub fn fault(&self) -> Option<BoardFault> {
        let status = BoardStatus(self.status.load(Ordering::Acquire));
        if status.is_ok() {
            None
        } else {
            Some(BoardFault::new(status))
        }
    }

    /// Returns `true` once any fault has been reported.
    pub fn is_faulted(&self) -> bool {
        self.fault().is_some()
    }

    /// Returns `Err` with the latched fault, if any.
    pub fn check(&self) -> Result<(), BoardFault> {
        match self.fault() {
            Some(fault) => Err(fault),
            None => Ok(()),
        }
    }
}

impl Default for FaultLatch {
    fn default() -> Self {
        Self::new()
    }
}

/// Board bring-up and background servicing.
pub trait BoardSupport {
    /// Bring up the board and register the fault callback.
    ///
    /// Called exactly once, before anything else.
    fn initialize(&mut self, faults: &'static FaultLatch) -> Result<(), BoardFault>;

    /// Bring up the device under test. Called once, after [`initialize`](Self::initialize).
    fn initialize_dut(&mut self) -> Result<(), BoardFault>;

    /// Service pending background work (interrupt bookkeeping, DUT events).
    ///
    /// Must be called once per run-loop iteration regardless of state.
    fn process_pending(&mut self) -> Result<(), BoardFault>;
}
