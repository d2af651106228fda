//! Parking primitive used by the coordinator while a transfer is in flight.

use embedded_hal::delay::DelayNs;

/// Parks the calling context between completion checks.
///
/// The coordinator re-checks the engine state before every park, so an
/// implementation may return early (woken by any interrupt) or spuriously
/// without affecting correctness; returning late only delays timeout
/// detection. On real targets this is typically a WFE/low-power-mode sleep
/// bounded by a timer; test harnesses drive simulated bus events from it
/// instead.
pub trait CompletionWait {
    /// Parks for at most `max_us` microseconds.
    fn park_us(&mut self, max_us: u32);
}

/// Busy-wait fallback built on [`DelayNs`].
///
/// Burns the whole slice instead of sleeping. Prefer a platform wait
/// primitive where power consumption matters.
pub struct PollingWait<D> {
    delay: D,
}

impl<D> PollingWait<D> {
    /// Wraps a delay provider.
    pub const fn new(delay: D) -> Self {
        Self { delay }
    }

    /// Consumes the waiter and returns the delay provider.
    pub fn release(self) -> D {
        self.delay
    }
}

impl<D: DelayNs> CompletionWait for PollingWait<D> {
    fn park_us(&mut self, max_us: u32) {
        self.delay.delay_us(max_us);
    }
}
