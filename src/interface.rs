//! Transport contract consumed by sensor driver libraries.

/// Abstraction over the register transport a sensor driver library expects:
/// a write callback and a read callback, each taking a register address and a
/// payload buffer.
///
/// Such libraries usually want a third, microsecond-delay callback. That one
/// is deliberately not part of this contract: it is plain busy-waiting with
/// no transport involvement, and `embedded_hal::delay` already covers it.
pub trait RegisterTransport {
    /// Error type produced by the concrete transport.
    type Error;

    /// Writes a single register.
    fn write_register(&mut self, register: u8, value: u8) -> core::result::Result<(), Self::Error>;

    /// Reads a single register.
    fn read_register(&mut self, register: u8) -> core::result::Result<u8, Self::Error>;

    /// Reads multiple consecutive registers into the provided buffer.
    fn read_many(&mut self, register: u8, buf: &mut [u8]) -> core::result::Result<(), Self::Error>;

    /// Writes multiple consecutive registers from the provided buffer.
    fn write_many(&mut self, register: u8, data: &[u8]) -> core::result::Result<(), Self::Error>;
}
