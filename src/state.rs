//! Shared transfer state, advanced one byte at a time by the event handler.

use core::ptr;

/// Direction of the in-flight transfer, `Idle` when none is armed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Mode {
    /// No transfer armed.
    Idle,
    /// Emitting caller bytes onto the bus.
    Transmitting,
    /// Capturing device bytes into the caller's buffer.
    Receiving,
}

/// Arming was attempted while a transfer is already in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Rearmed;

/// Byte-transfer progress shared between the arming context and the event
/// handler.
///
/// Ownership of the mutable fields alternates strictly: the coordinator
/// writes only while the state is `Idle` (arming, disarming), the handler
/// only while a transfer is armed and the coordinator is parked. The caller's
/// buffer is borrowed, never copied; the raw pointers are dereferenced only
/// between arm and disarm.
pub(crate) struct Transfer {
    mode: Mode,
    tx: *const u8,
    rx: *mut u8,
    len: usize,
    pos: usize,
}

// SAFETY: the pointers refer to a caller buffer that stays valid for the
// whole transfer, and the alternating-ownership rule above means the two
// contexts never touch it concurrently.
unsafe impl Send for Transfer {}

impl Transfer {
    pub(crate) const fn new() -> Self {
        Self {
            mode: Mode::Idle,
            tx: ptr::null(),
            rx: ptr::null_mut(),
            len: 0,
            pos: 0,
        }
    }

    pub(crate) fn mode(&self) -> Mode {
        self.mode
    }

    pub(crate) fn is_idle(&self) -> bool {
        self.mode == Mode::Idle
    }

    /// Bytes completed by the current transfer. Survives completion, so the
    /// coordinator can observe `progress == len` after the final event.
    pub(crate) fn progress(&self) -> usize {
        self.pos
    }

    /// Arms an outgoing transfer.
    ///
    /// # Safety
    ///
    /// `data` must point to `len` readable bytes that stay valid and unmoved
    /// until the state returns to `Idle` (completion or [`Transfer::disarm`]).
    pub(crate) unsafe fn arm_transmit(
        &mut self,
        data: *const u8,
        len: usize,
    ) -> Result<(), Rearmed> {
        if self.mode != Mode::Idle {
            return Err(Rearmed);
        }
        self.tx = data;
        self.rx = ptr::null_mut();
        self.len = len;
        self.pos = 0;
        self.mode = Mode::Transmitting;
        Ok(())
    }

    /// Arms an incoming transfer.
    ///
    /// # Safety
    ///
    /// `buf` must point to `len` writable bytes that stay valid, unmoved and
    /// otherwise untouched until the state returns to `Idle`.
    pub(crate) unsafe fn arm_receive(&mut self, buf: *mut u8, len: usize) -> Result<(), Rearmed> {
        if self.mode != Mode::Idle {
            return Err(Rearmed);
        }
        self.tx = ptr::null();
        self.rx = buf;
        self.len = len;
        self.pos = 0;
        self.mode = Mode::Receiving;
        Ok(())
    }

    /// Returns the state to `Idle` and ends the buffer borrow. `pos` and
    /// `len` are kept for post-transfer observation.
    pub(crate) fn disarm(&mut self) {
        self.mode = Mode::Idle;
        self.tx = ptr::null();
        self.rx = ptr::null_mut();
    }

    /// Next byte to emit while transmitting, paired with a completion flag.
    ///
    /// Returns `None` outside `Transmitting` mode. Completion disarms the
    /// state, so the final byte is handed out exactly once.
    pub(crate) fn next_outgoing(&mut self) -> Option<(u8, bool)> {
        if self.mode != Mode::Transmitting || self.pos >= self.len {
            return None;
        }
        // SAFETY: an armed transmit guarantees `tx` covers `len` bytes and
        // `pos < len` was just checked.
        let byte = unsafe { *self.tx.add(self.pos) };
        self.pos += 1;
        let done = self.pos == self.len;
        if done {
            self.disarm();
        }
        Some((byte, done))
    }

    /// Stores a received byte while receiving, returning the completion flag.
    ///
    /// Returns `None` outside `Receiving` mode.
    pub(crate) fn accept_incoming(&mut self, byte: u8) -> Option<bool> {
        if self.mode != Mode::Receiving || self.pos >= self.len {
            return None;
        }
        // SAFETY: an armed receive guarantees `rx` covers `len` bytes and
        // `pos < len` was just checked.
        unsafe { *self.rx.add(self.pos) = byte };
        self.pos += 1;
        let done = self.pos == self.len;
        if done {
            self.disarm();
        }
        Some(done)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn walks_an_outgoing_buffer_in_order() {
        let data = [0x11u8, 0x22, 0x33];
        let mut xfer = Transfer::new();
        unsafe { xfer.arm_transmit(data.as_ptr(), data.len()) }.unwrap();
        assert_eq!(xfer.mode(), Mode::Transmitting);

        assert_eq!(xfer.next_outgoing(), Some((0x11, false)));
        assert_eq!(xfer.next_outgoing(), Some((0x22, false)));
        assert_eq!(xfer.next_outgoing(), Some((0x33, true)));

        assert!(xfer.is_idle());
        assert_eq!(xfer.progress(), 3);
        // the completed transfer never hands out another byte
        assert_eq!(xfer.next_outgoing(), None);
    }

    #[test]
    fn captures_incoming_bytes_in_order() {
        let mut buf = [0u8; 3];
        let mut xfer = Transfer::new();
        unsafe { xfer.arm_receive(buf.as_mut_ptr(), buf.len()) }.unwrap();
        assert_eq!(xfer.mode(), Mode::Receiving);

        assert_eq!(xfer.accept_incoming(0xA0), Some(false));
        assert_eq!(xfer.accept_incoming(0xA1), Some(false));
        assert_eq!(xfer.accept_incoming(0xA2), Some(true));

        assert!(xfer.is_idle());
        assert_eq!(xfer.progress(), 3);
        assert_eq!(buf, [0xA0, 0xA1, 0xA2]);
    }

    #[test]
    fn rejects_rearm_while_active() {
        let data = [0u8; 2];
        let mut other = [0u8; 2];
        let mut xfer = Transfer::new();
        unsafe { xfer.arm_transmit(data.as_ptr(), data.len()) }.unwrap();

        assert!(unsafe { xfer.arm_receive(other.as_mut_ptr(), other.len()) }.is_err());
        assert!(unsafe { xfer.arm_transmit(data.as_ptr(), data.len()) }.is_err());

        // the in-flight transfer is untouched
        assert_eq!(xfer.mode(), Mode::Transmitting);
        assert_eq!(xfer.progress(), 0);
    }

    #[test]
    fn disarm_forces_idle_mid_transfer() {
        let data = [0u8; 4];
        let mut xfer = Transfer::new();
        unsafe { xfer.arm_transmit(data.as_ptr(), data.len()) }.unwrap();
        xfer.next_outgoing().unwrap();

        xfer.disarm();
        assert!(xfer.is_idle());
        assert_eq!(xfer.next_outgoing(), None);

        // idle state can be re-armed immediately
        unsafe { xfer.arm_transmit(data.as_ptr(), data.len()) }.unwrap();
        assert_eq!(xfer.progress(), 0);
    }

    #[test]
    fn wrong_direction_advances_are_ignored() {
        let mut buf = [0u8; 1];
        let mut xfer = Transfer::new();
        unsafe { xfer.arm_receive(buf.as_mut_ptr(), buf.len()) }.unwrap();

        assert_eq!(xfer.next_outgoing(), None);
        assert_eq!(xfer.mode(), Mode::Receiving);
        assert_eq!(xfer.progress(), 0);

        xfer.disarm();
        assert_eq!(xfer.accept_incoming(0xFF), None);
        assert_eq!(buf, [0]);
    }
}
