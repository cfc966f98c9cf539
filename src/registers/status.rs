//! Status registers
//!
//! Read-only registers reporting silicon revision and signal quality.
//! RSSI values are raw and need the band-dependent offset applied, see
//! [`LinkQuality`](crate::LinkQuality).

use core::convert::Infallible;

use regiface::{register, FromByteArray, ReadableRegister};

/// Silicon revision the driver accepts
pub const EXPECTED_VERSION: u8 = 0x12;

/// Silicon revision register (address: 0x42)
///
/// Reads 0x12 on SX1276/77/78/79 once the chip is out of reset. Anything else means
/// the chip is absent, unpowered or miswired.
#[register(0x42u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister)]
pub struct Version {
    /// Full revision (bits 7:4) and metal mask revision (bits 3:0)
    pub value: u8,
}

/// SNR of the last packet (address: 0x19)
///
/// Two's complement, in quarter dB.
#[register(0x19u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister)]
pub struct PktSnrValue {
    /// Raw SNR in 0.25 dB steps
    pub raw: i8,
}

/// RSSI of the last packet (address: 0x1A)
#[register(0x1Au8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister)]
pub struct PktRssiValue {
    /// Raw RSSI, offset depends on the RF band
    pub raw: u8,
}

/// Current RSSI (address: 0x1B)
///
/// Only meaningful while receiving.
#[register(0x1Bu8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister)]
pub struct RssiValue {
    /// Raw RSSI, offset depends on the RF band
    pub raw: u8,
}

impl FromByteArray for Version {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { value: bytes[0] })
    }
}

impl FromByteArray for PktSnrValue {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            raw: bytes[0] as i8,
        })
    }
}

impl FromByteArray for PktRssiValue {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { raw: bytes[0] })
    }
}

impl FromByteArray for RssiValue {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self { raw: bytes[0] })
    }
}
