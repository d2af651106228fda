//! Interrupt bottom-half: advances the shared transfer state one bus event
//! at a time.

use core::cell::RefCell;

use critical_section::Mutex;

use crate::bus::{BusEvent, EventMask, SpiPhy};
use crate::frame::DUMMY_BYTE;
use crate::state::{Mode, Rearmed, Transfer};

struct Shared<PHY> {
    phy: PHY,
    transfer: Transfer,
}

/// The single object shared between the transaction coordinator and the
/// interrupt handler.
///
/// All access goes through a critical section, which gives both sides the
/// visibility and atomicity they need: the coordinator owns the state while
/// it is `Idle` (arming, tearing down), the handler owns it while a transfer
/// is in flight and the coordinator is parked. The engine can live in a
/// `static` and be referenced from an interrupt service routine directly.
pub struct TransferEngine<PHY> {
    shared: Mutex<RefCell<Shared<PHY>>>,
}

impl<PHY> TransferEngine<PHY> {
    /// Wraps a controller handle in an engine ready to arm transfers.
    pub const fn new(phy: PHY) -> Self {
        Self {
            shared: Mutex::new(RefCell::new(Shared {
                phy,
                transfer: Transfer::new(),
            })),
        }
    }

    /// `true` when no transfer is armed.
    pub fn is_idle(&self) -> bool {
        critical_section::with(|cs| self.shared.borrow_ref(cs).transfer.is_idle())
    }

    /// Current transfer direction.
    pub fn mode(&self) -> Mode {
        critical_section::with(|cs| self.shared.borrow_ref(cs).transfer.mode())
    }

    /// Bytes completed by the current (or most recent) transfer.
    pub fn progress(&self) -> usize {
        critical_section::with(|cs| self.shared.borrow_ref(cs).transfer.progress())
    }

    /// Runs `f` with exclusive access to the underlying controller handle.
    pub fn with_phy<R>(&self, f: impl FnOnce(&mut PHY) -> R) -> R {
        critical_section::with(|cs| f(&mut self.shared.borrow_ref_mut(cs).phy))
    }

    /// Consumes the engine and returns the controller handle.
    pub fn release(self) -> PHY {
        self.shared.into_inner().into_inner().phy
    }
}

impl<PHY: SpiPhy> TransferEngine<PHY> {
    /// Handles one controller byte-event.
    ///
    /// Call this from the SPI interrupt service routine (or an equivalent
    /// simulated event source). Events arriving while no transfer is armed,
    /// or for the wrong direction, are discarded; once the final byte of a
    /// transfer has been handled the state is `Idle` again, so completion
    /// cannot be signaled twice.
    pub fn on_event(&self, event: BusEvent) {
        critical_section::with(|cs| {
            let mut shared = self.shared.borrow_ref_mut(cs);
            let shared = &mut *shared;
            match (shared.transfer.mode(), event) {
                (Mode::Transmitting, BusEvent::TransmitReady) => {
                    if let Some((byte, _done)) = shared.transfer.next_outgoing() {
                        shared.phy.transmit(byte);
                    }
                }
                (Mode::Receiving, BusEvent::ReceiveReady) => {
                    let byte = shared.phy.receive();
                    shared.transfer.accept_incoming(byte);
                }
                (Mode::Receiving, BusEvent::TransmitReady) => {
                    // Nothing meaningful to send; keep the clock running so
                    // the device's reply arrives via the paired receive event.
                    shared.phy.transmit(DUMMY_BYTE);
                }
                // Receive events are not expected while transmitting, and no
                // event is expected while idle; both are safe to drop.
                (Mode::Transmitting, BusEvent::ReceiveReady) => {}
                (Mode::Idle, _) => {}
            }
        })
    }

    /// Arms an outgoing transfer without touching the controller.
    ///
    /// # Safety
    ///
    /// `data` must stay valid and unmoved until the engine is back in `Idle`
    /// (completion or [`TransferEngine::finish`]).
    pub(crate) unsafe fn arm_transmit(&self, data: &[u8]) -> Result<(), Rearmed> {
        critical_section::with(|cs| unsafe {
            self.shared
                .borrow_ref_mut(cs)
                .transfer
                .arm_transmit(data.as_ptr(), data.len())
        })
    }

    /// Arms an incoming transfer without touching the controller.
    ///
    /// # Safety
    ///
    /// `buf` must stay valid, unmoved and otherwise untouched until the
    /// engine is back in `Idle`.
    pub(crate) unsafe fn arm_receive(&self, buf: &mut [u8]) -> Result<(), Rearmed> {
        critical_section::with(|cs| unsafe {
            self.shared
                .borrow_ref_mut(cs)
                .transfer
                .arm_receive(buf.as_mut_ptr(), buf.len())
        })
    }

    /// Enables event delivery and emits the command byte that opens the
    /// transaction; the handler takes over from the first byte-event on.
    pub(crate) fn start(&self, command: u8, events: EventMask) {
        critical_section::with(|cs| {
            let mut shared = self.shared.borrow_ref_mut(cs);
            shared.phy.listen(events);
            shared.phy.transmit(command);
        })
    }

    /// Ends a transaction: stops event delivery and clears any state still
    /// armed, so the buffer borrow ends here on the abandonment path too.
    pub(crate) fn finish(&self) {
        critical_section::with(|cs| {
            let mut shared = self.shared.borrow_ref_mut(cs);
            shared.phy.unlisten();
            shared.transfer.disarm();
        })
    }
}
