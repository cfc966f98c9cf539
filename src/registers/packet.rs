//! Packet handling registers
//!
//! This module contains registers for moving packets through the chip:
//! - FIFO data pointers and base addresses
//! - Payload length for TX and received byte count for RX
//! - Interrupt flags
//! - Preamble length and sync word
//!
//! The FIFO is 256 bytes shared between TX and RX. Data is pushed and pulled through
//! register 0x00 at the position held by [`FifoAddrPtr`], which advances on every access.

use core::convert::Infallible;

use bitflags::bitflags;
use regiface::{register, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

/// FIFO data register address, accessed as a burst
pub const REG_FIFO: u8 = 0x00;

/// Largest payload the one-byte length register can describe
pub const MAX_PAYLOAD_LEN: usize = 255;

/// SPI pointer into the FIFO (address: 0x0D)
#[register(0x0Du8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister, Default)]
pub struct FifoAddrPtr {
    /// Next FIFO byte read or written over SPI
    pub address: u8,
}

/// Start of the TX region in the FIFO (address: 0x0E)
#[register(0x0Eu8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister, Default)]
pub struct FifoTxBaseAddr {
    /// Base address the modulator reads from
    pub address: u8,
}

/// Start of the RX region in the FIFO (address: 0x0F)
#[register(0x0Fu8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister, Default)]
pub struct FifoRxBaseAddr {
    /// Base address the demodulator writes to
    pub address: u8,
}

/// Start of the last received packet (address: 0x10, read only)
#[register(0x10u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister)]
pub struct FifoRxCurrentAddr {
    /// FIFO address of the first byte of the last packet
    pub address: u8,
}

/// Length of the last received payload (address: 0x13, read only)
#[register(0x13u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister)]
pub struct RxNbBytes {
    /// Number of payload bytes
    pub count: u8,
}

/// Payload length for transmission (address: 0x22)
///
/// Must not be zero in explicit header mode.
#[register(0x22u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct PayloadLength {
    /// Number of FIFO bytes to send
    pub length: u8,
}

bitflags! {
    /// LoRa interrupt sources
    ///
    /// Flags latch until cleared by writing a one to their bit.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct IrqFlags: u8 {
        /// RX single mode timed out
        const RX_TIMEOUT = 1 << 7;
        /// A packet was received and is in the FIFO
        const RX_DONE = 1 << 6;
        /// The received payload failed its CRC
        const PAYLOAD_CRC_ERROR = 1 << 5;
        /// A valid explicit header was received
        const VALID_HEADER = 1 << 4;
        /// The FIFO payload was sent
        const TX_DONE = 1 << 3;
        /// Channel activity detection finished
        const CAD_DONE = 1 << 2;
        /// Frequency hopping channel change requested
        const FHSS_CHANGE_CHANNEL = 1 << 1;
        /// A valid LoRa signal was detected during CAD
        const CAD_DETECTED = 1 << 0;
    }
}

/// Interrupt flags register (address: 0x12)
///
/// Reading returns the latched flags. Writing clears every flag whose bit is set,
/// so writing [`IrqFlags::all`] clears everything.
#[register(0x12u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct IrqStatus {
    /// Latched flags on read, flags to clear on write
    pub flags: IrqFlags,
}

impl IrqStatus {
    /// Clear request for the given flags
    pub const fn clear(flags: IrqFlags) -> Self {
        Self { flags }
    }
}

/// Preamble length register (addresses: 0x20-0x21)
///
/// Programmed length in symbols; the radio adds 4.25 symbols. Written MSB first as
/// one burst.
#[register(0x20u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct PreambleLength {
    /// Preamble length in symbols
    pub symbols: u16,
}

impl Default for PreambleLength {
    fn default() -> Self {
        Self { symbols: 8 }
    }
}

/// LoRa sync word register (address: 0x39)
///
/// # Important Notes
/// - 0x12 is the customary private network value, 0x34 is used by LoRaWAN
/// - A receiver silently discards packets whose sync word differs from its own;
///   no interrupt is raised, so a mismatch cannot be told apart from silence
#[register(0x39u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct SyncWord {
    /// Sync word value
    pub value: u8,
}

impl Default for SyncWord {
    fn default() -> Self {
        Self { value: 0x12 }
    }
}

macro_rules! single_byte_register {
    ($($register:ident => $field:ident),* $(,)?) => {
        $(
            impl FromByteArray for $register {
                type Error = Infallible;
                type Array = [u8; 1];

                fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
                    Ok(Self { $field: bytes[0] })
                }
            }

            impl ToByteArray for $register {
                type Error = Infallible;
                type Array = [u8; 1];

                fn to_bytes(self) -> Result<Self::Array, Self::Error> {
                    Ok([self.$field])
                }
            }
        )*
    };
}

single_byte_register! {
    FifoAddrPtr => address,
    FifoTxBaseAddr => address,
    FifoRxBaseAddr => address,
    FifoRxCurrentAddr => address,
    RxNbBytes => count,
    PayloadLength => length,
    SyncWord => value,
}

impl FromByteArray for IrqStatus {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            flags: IrqFlags::from_bits_retain(bytes[0]),
        })
    }
}

impl ToByteArray for IrqStatus {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([self.flags.bits()])
    }
}

impl FromByteArray for PreambleLength {
    type Error = Infallible;
    type Array = [u8; 2];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            symbols: u16::from_be_bytes(bytes),
        })
    }
}

impl ToByteArray for PreambleLength {
    type Error = Infallible;
    type Array = [u8; 2];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok(self.symbols.to_be_bytes())
    }
}
