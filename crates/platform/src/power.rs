//! Power management abstraction
//!
//! The harness only needs one primitive: park the core until something
//! happens (timer tick or interrupt surfaced by the board layer).

/// Low-power idle
pub trait IdleWait {
    /// Sleep until the next external event.
    ///
    /// This is the only suspension point of the run loop and it is not
    /// cancellable.
    fn idle_until_next_event(&mut self) -> impl core::future::Future<Output = ()>;
}
