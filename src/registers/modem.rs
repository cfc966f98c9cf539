//! LoRa modem configuration registers
//!
//! The three modem configuration registers pack the modulation parameters as
//! bitfields. Transmitter and receiver must agree on bandwidth, coding rate,
//! spreading factor and header mode or no packet is ever detected.

use core::convert::Infallible;

use regiface::{register, ToByteArray, WritableRegister};

/// Signal bandwidth, bits 7:4 of [`ModemConfig1`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Bandwidth {
    /// 7.8 kHz
    Khz7_8 = 0,
    /// 10.4 kHz
    Khz10_4 = 1,
    /// 15.6 kHz
    Khz15_6 = 2,
    /// 20.8 kHz
    Khz20_8 = 3,
    /// 31.25 kHz
    Khz31_25 = 4,
    /// 41.7 kHz
    Khz41_7 = 5,
    /// 62.5 kHz
    Khz62_5 = 6,
    /// 125 kHz
    Khz125 = 7,
    /// 250 kHz
    Khz250 = 8,
    /// 500 kHz
    Khz500 = 9,
}

impl Bandwidth {
    /// Bandwidth in Hz
    pub const fn hz(self) -> u32 {
        match self {
            Self::Khz7_8 => 7_800,
            Self::Khz10_4 => 10_400,
            Self::Khz15_6 => 15_600,
            Self::Khz20_8 => 20_800,
            Self::Khz31_25 => 31_250,
            Self::Khz41_7 => 41_700,
            Self::Khz62_5 => 62_500,
            Self::Khz125 => 125_000,
            Self::Khz250 => 250_000,
            Self::Khz500 => 500_000,
        }
    }
}

/// Error coding rate, bits 3:1 of [`ModemConfig1`]
///
/// Only affects the payload; the explicit header is always sent at 4/8.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CodingRate {
    /// 4/5
    Cr4_5 = 1,
    /// 4/6
    Cr4_6 = 2,
    /// 4/7
    Cr4_7 = 3,
    /// 4/8
    Cr4_8 = 4,
}

/// Spreading factor, bits 7:4 of [`ModemConfig2`]
///
/// SF6 is not offered: it only works in implicit header mode and needs its own
/// detection tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SpreadingFactor {
    /// 128 chips per symbol
    Sf7 = 7,
    /// 256 chips per symbol
    Sf8 = 8,
    /// 512 chips per symbol
    Sf9 = 9,
    /// 1024 chips per symbol
    Sf10 = 10,
    /// 2048 chips per symbol
    Sf11 = 11,
    /// 4096 chips per symbol
    Sf12 = 12,
}

impl SpreadingFactor {
    /// Chips per symbol (2^SF)
    pub const fn chips(self) -> u32 {
        1 << (self as u32)
    }
}

/// Modem configuration register 1 (address: 0x1D)
///
/// # Layout
/// - Bits 7:4: bandwidth
/// - Bits 3:1: coding rate
/// - Bit 0: implicit header mode
#[register(0x1Du8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, WritableRegister)]
pub struct ModemConfig1 {
    /// Signal bandwidth
    pub bandwidth: Bandwidth,
    /// Error coding rate
    pub coding_rate: CodingRate,
    /// Implicit (true) or explicit (false) header mode
    pub implicit_header: bool,
}

/// Modem configuration register 2 (address: 0x1E)
///
/// # Layout
/// - Bits 7:4: spreading factor
/// - Bit 3: continuous TX mode (test only)
/// - Bit 2: payload CRC generation on TX and check on RX
/// - Bits 1:0: RX single timeout MSB, left at zero
#[register(0x1Eu8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, WritableRegister)]
pub struct ModemConfig2 {
    /// Spreading factor
    pub spreading_factor: SpreadingFactor,
    /// Send the FIFO content repeatedly
    pub tx_continuous: bool,
    /// Append and check a payload CRC
    pub rx_payload_crc_on: bool,
}

/// Modem configuration register 3 (address: 0x26)
///
/// # Layout
/// - Bit 3: low data rate optimisation, mandatory when the symbol time exceeds 16 ms
/// - Bit 2: LNA gain set by the AGC loop instead of [`Lna`](crate::Lna)
#[register(0x26u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, WritableRegister)]
pub struct ModemConfig3 {
    /// Low data rate optimisation
    pub low_data_rate_optimize: bool,
    /// Automatic gain control
    pub agc_auto_on: bool,
}

impl ToByteArray for ModemConfig1 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([((self.bandwidth as u8) << 4)
            | ((self.coding_rate as u8) << 1)
            | self.implicit_header as u8])
    }
}

impl ToByteArray for ModemConfig2 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([((self.spreading_factor as u8) << 4)
            | ((self.tx_continuous as u8) << 3)
            | ((self.rx_payload_crc_on as u8) << 2)])
    }
}

impl ToByteArray for ModemConfig3 {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([((self.low_data_rate_optimize as u8) << 3) | ((self.agc_auto_on as u8) << 2)])
    }
}
