//! Transaction coordinator: the blocking register read/write entry points.

use embedded_hal::digital::OutputPin;

use crate::bus::{EventMask, SpiPhy};
use crate::config::{ConfigError, TransportConfig};
use crate::engine::TransferEngine;
use crate::error::{Error, Result};
use crate::frame::CommandByte;
use crate::interface::RegisterTransport;
use crate::wait::CompletionWait;

/// Blocking register transport over an interrupt-driven transfer engine.
///
/// Each operation arms the shared [`TransferEngine`], asserts the active-low
/// device-select line, emits the command byte and parks the calling context
/// until the event handler reports completion or the configured deadline
/// passes. The device is deselected and event delivery stopped on every
/// return path.
pub struct Transport<'e, PHY, CS, W> {
    engine: &'e TransferEngine<PHY>,
    cs: CS,
    wait: W,
    config: TransportConfig,
}

impl<'e, PHY, CS, W> Transport<'e, PHY, CS, W> {
    /// Creates a transport over the shared engine.
    ///
    /// `cs` is the active-low device-select output, expected to be driven
    /// high (deselected) by platform init.
    pub fn new(
        engine: &'e TransferEngine<PHY>,
        cs: CS,
        wait: W,
        config: TransportConfig,
    ) -> core::result::Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            engine,
            cs,
            wait,
            config,
        })
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Consumes the transport and returns the device-select pin and waiter.
    pub fn release(self) -> (CS, W) {
        (self.cs, self.wait)
    }
}

impl<'e, PHY, CS, W> Transport<'e, PHY, CS, W>
where
    PHY: SpiPhy,
    CS: OutputPin,
    W: CompletionWait,
{
    /// Writes `data` to consecutive device registers starting at `register`.
    ///
    /// An empty `data` is a legal no-op: the function returns immediately
    /// without selecting the device or generating any bus traffic.
    pub fn write_registers(&mut self, register: u8, data: &[u8]) -> Result<(), CS::Error> {
        if data.is_empty() {
            return Ok(());
        }
        self.check_len(data.len())?;

        // SAFETY: `data` outlives this call and `run` does not return until
        // the engine is back in `Idle`, so the armed pointer is never
        // dereferenced after the borrow ends.
        unsafe { self.engine.arm_transmit(data) }.map_err(|_| Error::Busy)?;

        self.run(CommandByte::for_write(register).into(), EventMask::Transmit)
    }

    /// Reads consecutive device registers starting at `register` into `buf`.
    ///
    /// An empty `buf` is a legal no-op, mirroring [`Self::write_registers`].
    pub fn read_registers(&mut self, register: u8, buf: &mut [u8]) -> Result<(), CS::Error> {
        if buf.is_empty() {
            return Ok(());
        }
        self.check_len(buf.len())?;

        // SAFETY: as in `write_registers`; additionally nothing here reads
        // or writes `buf` while the handler owns it.
        unsafe { self.engine.arm_receive(buf) }.map_err(|_| Error::Busy)?;

        self.run(
            CommandByte::for_read(register).into(),
            EventMask::TransmitReceive,
        )
    }

    fn check_len(&self, len: usize) -> Result<(), CS::Error> {
        if len > self.config.max_transfer_len {
            return Err(Error::TransferTooLong);
        }
        Ok(())
    }

    /// Select, emit the command byte, park until completion, deselect.
    fn run(&mut self, command: u8, events: EventMask) -> Result<(), CS::Error> {
        if let Err(e) = self.cs.set_low() {
            // end the buffer borrow before surfacing the pin fault
            self.engine.finish();
            return Err(Error::Select(e));
        }

        self.engine.start(command, events);
        let outcome = self.park_until_idle();

        // Completed or abandoned, the bus goes quiet and the device is
        // released before the outcome is reported.
        self.engine.finish();
        self.cs.set_high().map_err(Error::Select)?;
        outcome
    }

    fn park_until_idle(&mut self) -> Result<(), CS::Error> {
        let mut waited_us: u32 = 0;
        loop {
            // Completion is level-checked before every park, so a wakeup
            // raised while this context was still running cannot be lost.
            if self.engine.is_idle() {
                return Ok(());
            }
            if waited_us >= self.config.timeout_us {
                return Err(Error::Timeout);
            }
            let slice = self
                .config
                .poll_interval_us
                .min(self.config.timeout_us - waited_us);
            self.wait.park_us(slice);
            waited_us = waited_us.saturating_add(slice);
        }
    }
}

impl<'e, PHY, CS, W> RegisterTransport for Transport<'e, PHY, CS, W>
where
    PHY: SpiPhy,
    CS: OutputPin,
    W: CompletionWait,
{
    type Error = Error<CS::Error>;

    fn write_register(&mut self, register: u8, value: u8) -> core::result::Result<(), Self::Error> {
        self.write_registers(register, core::slice::from_ref(&value))
    }

    fn read_register(&mut self, register: u8) -> core::result::Result<u8, Self::Error> {
        let mut value = [0u8; 1];
        self.read_registers(register, &mut value)?;
        Ok(value[0])
    }

    fn read_many(&mut self, register: u8, buf: &mut [u8]) -> core::result::Result<(), Self::Error> {
        self.read_registers(register, buf)
    }

    fn write_many(&mut self, register: u8, data: &[u8]) -> core::result::Result<(), Self::Error> {
        self.write_registers(register, data)
    }
}
