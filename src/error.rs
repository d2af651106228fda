//! Error handling primitives for the transport.

/// Crate-wide result type alias.
pub type Result<T, E> = core::result::Result<T, Error<E>>;

/// Error variants produced by the transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<E> {
    /// The device-select pin reported an error.
    Select(E),
    /// A transfer is already in flight; the new request was rejected.
    Busy,
    /// The requested length exceeds the configured controller limit.
    TransferTooLong,
    /// The bus partner did not produce the expected byte-events before the
    /// configured deadline passed.
    Timeout,
}

impl<E> From<E> for Error<E> {
    fn from(err: E) -> Self {
        Self::Select(err)
    }
}
