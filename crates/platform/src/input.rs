//! Push-button input abstraction

/// Debounced button edges
pub trait ButtonInput {
    /// Returns `true` if `button` was pressed at least once since the last
    /// call, then clears the record. Several presses collapse into one edge.
    fn consume_edge(&mut self, button: ButtonId) -> bool;
}

/// Physical buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonId {
    /// The operator push-button that steps the test sequence
    User,
}
