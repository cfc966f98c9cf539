//! Driver error types
//!
//! HAL errors are reduced to their `embedded-hal` [`ErrorKind`](embedded_hal::spi::ErrorKind)
//! so the driver's own error types stay independent of the concrete bus and pin types.
//!
//! Receiving a corrupted packet is not an error: it is reported as
//! [`ReceiveOutcome::CrcError`](crate::ReceiveOutcome::CrcError).

use core::fmt;

use embedded_hal::{digital, spi};

/// A register transaction failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusError {
    /// The SPI transfer itself failed
    Spi(spi::ErrorKind),
    /// The chip-select line could not be driven
    ChipSelect(digital::ErrorKind),
}

/// Bringing up the radio failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum InitError {
    /// The version register did not hold the expected silicon revision.
    ///
    /// Usually a wiring or power fault. Nothing beyond the reset sequence and the
    /// version read was sent to the chip.
    ChipNotDetected {
        /// Value read back from the version register
        version: u8,
    },
    /// The reset line could not be driven
    ResetLine(digital::ErrorKind),
    /// A register transaction failed during configuration
    BusFailure(BusError),
}

/// Transmitting a packet failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TxError {
    /// The payload does not fit the one-byte payload length register
    PayloadTooLarge {
        /// Length of the rejected payload
        len: usize,
    },
    /// TxDone was not raised within the allowed time.
    ///
    /// The chip is left in transmit mode. Inspect it with
    /// [`Radio::chip_mode`](crate::Radio::chip_mode) or force standby with
    /// [`Radio::wake`](crate::Radio::wake) before retrying.
    Timeout,
    /// A register transaction failed
    BusFailure(BusError),
}

impl From<BusError> for InitError {
    fn from(err: BusError) -> Self {
        Self::BusFailure(err)
    }
}

impl From<BusError> for TxError {
    fn from(err: BusError) -> Self {
        Self::BusFailure(err)
    }
}

impl fmt::Display for BusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Spi(kind) => write!(f, "SPI transfer failed: {kind}"),
            Self::ChipSelect(kind) => write!(f, "chip-select line failed: {kind}"),
        }
    }
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ChipNotDetected { version } => {
                write!(f, "radio not detected (version register read {version:#04x})")
            }
            Self::ResetLine(kind) => write!(f, "reset line failed: {kind}"),
            Self::BusFailure(err) => write!(f, "{err}"),
        }
    }
}

impl fmt::Display for TxError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PayloadTooLarge { len } => {
                write!(f, "payload of {len} bytes exceeds the 255 byte limit")
            }
            Self::Timeout => f.write_str("transmission did not complete in time"),
            Self::BusFailure(err) => write!(f, "{err}"),
        }
    }
}

impl core::error::Error for BusError {}
impl core::error::Error for InitError {}
impl core::error::Error for TxError {}
