//! Wire framing for register transactions.
//!
//! A transaction is one command byte followed by `length` data bytes, framed
//! by the device-select line held low for the whole exchange. The command
//! byte carries the 7-bit register address, with the read flag in the most
//! significant bit.
#![allow(unused_parens)]

use modular_bitfield::prelude::*;

/// Placeholder byte clocked out during receive transfers. It carries no
/// payload; it only generates the clock edges the device needs to shift its
/// reply out.
pub const DUMMY_BYTE: u8 = 0x00;

/// Default upper bound on a single transfer, in bytes, matching common
/// controller-side buffering limits.
pub const DEFAULT_MAX_TRANSFER_LEN: usize = 46;

/// Mask selecting the 7-bit register address within a command byte.
pub const ADDRESS_MASK: u8 = 0x7F;

/// Bitfield representation of the command byte opening every transaction.
#[bitfield]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandByte {
    /// Register address (bits 0..=6).
    pub address: B7,
    /// Read flag (bit 7); clear for writes.
    pub read: bool,
}

impl CommandByte {
    /// Builds the command byte opening a write transaction.
    ///
    /// Addresses above `0x7F` are masked down to seven bits.
    pub fn for_write(register: u8) -> Self {
        Self::new().with_address(register & ADDRESS_MASK)
    }

    /// Builds the command byte opening a read transaction.
    pub fn for_read(register: u8) -> Self {
        Self::new()
            .with_address(register & ADDRESS_MASK)
            .with_read(true)
    }
}

impl From<u8> for CommandByte {
    fn from(value: u8) -> Self {
        Self::from_bytes([value])
    }
}

impl From<CommandByte> for u8 {
    fn from(value: CommandByte) -> Self {
        value.into_bytes()[0]
    }
}
