//! SX127x register access
//!
//! This module provides the low-level interface to the chip's register space over SPI.
//! Every access is one chip-select framed transaction: an address byte whose MSB selects
//! write (1) or read (0), followed by one or more data bytes. Multi-byte registers and
//! the FIFO use the chip's burst mode, where the address auto-increments (or, for the
//! FIFO, the FIFO pointer advances) with every data byte.
//!
//! The driver owns the chip-select line rather than relying on an `SpiDevice`, so
//! chip-select is released here on every path, including failed transfers.
//!
//! # Example
//! ```ignore
//! use sx1278::{Device, Version};
//!
//! // Create device with SPI bus and chip-select pin
//! let spi = // ... SpiBus implementation
//! let cs = // ... OutputPin implementation
//! let mut device = Device::new(spi, cs);
//!
//! // Read a register
//! let version: Version = device.read_register()?;
//! ```

use core::convert::Infallible;

use embedded_hal::digital::{Error as _, OutputPin};
use embedded_hal::spi::{Error as _, SpiBus};
use regiface::{ByteArray, ReadableRegister, WritableRegister};

use crate::error::BusError;
use crate::registers::REG_FIFO;

const WRITE_FLAG: u8 = 0x80;
const ADDRESS_MASK: u8 = 0x7F;

/// Register interface to the SX127x radio.
///
/// Wraps the SPI bus and the chip-select line. One instance per chip; transactions
/// are not atomic with respect to other bus users, so it must not be shared without
/// external synchronisation.
pub struct Device<SPI, CS> {
    spi: SPI,
    cs: CS,
}

impl<SPI, CS> Device<SPI, CS> {
    /// Creates a new Device wrapping the bus and chip-select line.
    pub fn new(spi: SPI, cs: CS) -> Self {
        Self { spi, cs }
    }

    /// Releases the bus and chip-select line.
    pub fn release(self) -> (SPI, CS) {
        (self.spi, self.cs)
    }
}

impl<SPI, CS> Device<SPI, CS>
where
    SPI: SpiBus<u8>,
    CS: OutputPin,
{
    /// Drives chip-select inactive without a transfer.
    ///
    /// Used once before the first transaction, since the pin's initial level is unknown.
    pub fn deselect(&mut self) -> Result<(), BusError> {
        self.cs
            .set_high()
            .map_err(|err| BusError::ChipSelect(err.kind()))
    }

    /// Reads a register value from the device.
    ///
    /// # Errors
    /// * `BusError::Spi` - SPI communication failed
    /// * `BusError::ChipSelect` - chip-select could not be driven
    pub fn read_register<R>(&mut self) -> Result<R, BusError>
    where
        R: ReadableRegister<IdType = u8, Error = Infallible>,
    {
        let header = [R::id() & ADDRESS_MASK];
        let mut raw_value = R::Array::new();

        self.transaction(|spi| {
            spi.write(&header)?;
            spi.read(raw_value.as_mut())
        })?;

        match R::from_bytes(raw_value) {
            Ok(register) => Ok(register),
            Err(never) => match never {},
        }
    }

    /// Writes a value to a device register.
    ///
    /// # Errors
    /// * `BusError::Spi` - SPI communication failed
    /// * `BusError::ChipSelect` - chip-select could not be driven
    pub fn write_register<R>(&mut self, register: R) -> Result<(), BusError>
    where
        R: WritableRegister<IdType = u8, Error = Infallible>,
    {
        let header = [R::id() | WRITE_FLAG];
        let raw_value = match register.to_bytes() {
            Ok(raw_value) => raw_value,
            Err(never) => match never {},
        };

        self.transaction(|spi| {
            spi.write(&header)?;
            spi.write(raw_value.as_ref())
        })
    }

    /// Streams bytes into the FIFO at the current FIFO pointer.
    pub fn write_fifo(&mut self, bytes: &[u8]) -> Result<(), BusError> {
        self.transaction(|spi| {
            spi.write(&[REG_FIFO | WRITE_FLAG])?;
            spi.write(bytes)
        })
    }

    /// Streams bytes out of the FIFO from the current FIFO pointer.
    pub fn read_fifo(&mut self, bytes: &mut [u8]) -> Result<(), BusError> {
        self.transaction(|spi| {
            spi.write(&[REG_FIFO & ADDRESS_MASK])?;
            spi.read(bytes)
        })
    }

    /// Runs `operations` with chip-select asserted.
    ///
    /// Chip-select is deasserted whatever the outcome; the first failure is reported.
    fn transaction<T>(
        &mut self,
        operations: impl FnOnce(&mut SPI) -> Result<T, SPI::Error>,
    ) -> Result<T, BusError> {
        self.cs
            .set_low()
            .map_err(|err| BusError::ChipSelect(err.kind()))?;

        let result = operations(&mut self.spi);
        let flushed = self.spi.flush();
        let released = self.cs.set_high();

        let value = result.map_err(|err| BusError::Spi(err.kind()))?;
        flushed.map_err(|err| BusError::Spi(err.kind()))?;
        released.map_err(|err| BusError::ChipSelect(err.kind()))?;

        Ok(value)
    }
}
