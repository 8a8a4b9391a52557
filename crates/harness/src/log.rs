//! Logging shim.
//!
//! Hardware builds log through defmt, the emulator through tracing. Plain
//! host builds (unit tests) log nothing.

use platform::BoardFault;

use crate::sequencer::SequencerState;

pub(crate) fn transition(from: SequencerState, to: SequencerState) {
    #[cfg(feature = "defmt")]
    defmt::info!("sequencer: {=str} -> {=str}", from.name(), to.name());
    #[cfg(feature = "emulator")]
    tracing::info!(from = from.name(), to = to.name(), "sequencer step");
    let _ = (from, to);
}

pub(crate) fn held(state: SequencerState) {
    #[cfg(feature = "defmt")]
    defmt::debug!("sequencer: holding in {=str}", state.name());
    #[cfg(feature = "emulator")]
    tracing::debug!(state = state.name(), "DUT not processing yet, press again");
    let _ = state;
}

pub(crate) fn started() {
    #[cfg(feature = "defmt")]
    defmt::info!(
        "{=str} v{=str}: board and DUT initialised",
        crate::config::APP_NAME,
        crate::config::APP_VERSION
    );
    #[cfg(feature = "emulator")]
    tracing::info!(
        version = crate::config::APP_VERSION,
        "{}: board and DUT initialised",
        crate::config::APP_NAME
    );
}

pub(crate) fn fault(fault: BoardFault, state: SequencerState) {
    #[cfg(feature = "defmt")]
    defmt::error!("{} in {=str}, halting", fault, state.name());
    #[cfg(feature = "emulator")]
    tracing::error!(%fault, state = state.name(), "halting");
    let _ = (fault, state);
}
