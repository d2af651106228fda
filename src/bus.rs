//! Byte-level controller abstraction driven by the transfer engine.

/// Per-byte events raised by the SPI controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusEvent {
    /// The transmit buffer is empty and will accept another byte.
    TransmitReady,
    /// A received byte is waiting in the receive buffer.
    ReceiveReady,
}

/// Event kinds the controller should deliver for the current transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EventMask {
    /// Deliver transmit-buffer-empty events only (write transfers).
    Transmit,
    /// Deliver both transmit and receive events (read transfers, where every
    /// dummy byte clocked out produces a reply byte to collect).
    TransmitReceive,
}

/// Byte-granularity access to a synchronous serial controller.
///
/// Implementations wrap a memory-mapped peripheral, so the data-register
/// accessors are infallible; a bus partner that stops clocking surfaces as a
/// transaction-level timeout instead of a per-byte error.
pub trait SpiPhy {
    /// Loads a byte into the transmit buffer, starting its shift onto the bus.
    fn transmit(&mut self, byte: u8);

    /// Takes the most recently received byte out of the receive buffer.
    fn receive(&mut self) -> u8;

    /// Starts delivering the selected events.
    ///
    /// Implementations must clear stale event flags before enabling delivery,
    /// so a leftover flag from a previous transaction cannot fire as soon as
    /// the handler is hooked up.
    fn listen(&mut self, events: EventMask);

    /// Stops delivering all events.
    fn unlisten(&mut self);
}
