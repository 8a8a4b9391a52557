//! Button edge latch.
//!
//! Holds "pressed since the last evaluation". The run loop clears it exactly
//! once per iteration, after the sequencer has seen it, so one press never
//! advances the sequence by more than one step.

/// Single-bit press record.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct EdgeLatch {
    pressed: bool,
}

impl EdgeLatch {
    /// Cleared latch.
    pub const fn new() -> Self {
        Self { pressed: false }
    }

    /// Merge an edge observation. A `false` never clears a recorded press.
    pub fn record(&mut self, edge: bool) {
        self.pressed |= edge;
    }

    /// Whether a press is pending.
    pub const fn is_set(&self) -> bool {
        self.pressed
    }

    /// Drop the pending press.
    pub fn clear(&mut self) {
        self.pressed = false;
    }
}
