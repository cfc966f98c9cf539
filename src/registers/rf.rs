//! RF front-end registers
//!
//! This module contains registers for the RF path:
//! - Carrier frequency (FRF)
//! - Power amplifier selection and output level
//! - High power DAC
//! - Low noise amplifier gain and boost

use core::convert::Infallible;

use regiface::{register, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

/// Lowest output power reachable on the PA_BOOST pin, in dBm
pub const PA_BOOST_MIN_DBM: i8 = 2;
/// Highest output power reachable on the PA_BOOST pin without the +20 dBm mode, in dBm
pub const PA_BOOST_MAX_DBM: i8 = 17;

/// Carrier frequency register (addresses: 0x06-0x08)
///
/// 24-bit frequency word written MSB first as one burst.
/// F_rf = FXOSC * frf / 2^19, so one LSB is 61.035 Hz with the 32 MHz crystal.
///
/// # Important Notes
/// - The new frequency only takes effect when the LSB is written
/// - Must be written in sleep or standby mode
#[register(0x06u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct CarrierFrequency {
    /// 24-bit frequency word
    pub frf: u32,
}

/// Power amplifier configuration register (address: 0x09)
///
/// # Output power (PA_BOOST)
/// Pout = 17 - (15 - output_power) dBm, i.e. 2 to 17 dBm
#[register(0x09u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct PaConfig {
    /// Bit 7: route output through PA_BOOST (true) or RFO (false)
    pub pa_select: bool,
    /// Bits 6:4: maximum power for the RFO pin
    pub max_power: u8,
    /// Bits 3:0: output power step
    pub output_power: u8,
}

impl PaConfig {
    /// PA_BOOST output at the requested level.
    ///
    /// Levels outside 2..=17 dBm are clamped to the nearest bound.
    pub fn pa_boost(dbm: i8) -> Self {
        let dbm = dbm.clamp(PA_BOOST_MIN_DBM, PA_BOOST_MAX_DBM);
        Self {
            pa_select: true,
            max_power: 0,
            output_power: (dbm - PA_BOOST_MIN_DBM) as u8,
        }
    }
}

/// High power DAC register (address: 0x4D)
///
/// Enables the +20 dBm option on PA_BOOST.
///
/// # Important Notes
/// - Bits 7:3 are reserved and must keep their reset value (0x10)
/// - Default mode writes 0x84, high power mode writes 0x87
#[register(0x4Du8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct PaDac {
    /// Bits 2:0: 0x07 for high power, 0x04 default
    pub high_power: bool,
}

/// Low noise amplifier register (address: 0x0C)
#[register(0x0Cu8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct Lna {
    /// Bits 7:5: LNA gain, 1 = maximum
    pub gain: u8,
    /// Bits 4:3: low frequency LNA current adjustment
    pub boost_lf: u8,
    /// Bit 2: reserved, written back as read
    pub reserved: bool,
    /// Bits 1:0: high frequency LNA boost (150% LNA current)
    pub boost_hf: bool,
}

impl FromByteArray for CarrierFrequency {
    type Error = Infallible;
    type Array = [u8; 3];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            frf: u32::from_be_bytes([0, bytes[0], bytes[1], bytes[2]]),
        })
    }
}

impl ToByteArray for CarrierFrequency {
    type Error = Infallible;
    type Array = [u8; 3];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let [_, msb, mid, lsb] = self.frf.to_be_bytes();
        Ok([msb, mid, lsb])
    }
}

impl FromByteArray for PaConfig {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            pa_select: bytes[0] & 0x80 != 0,
            max_power: (bytes[0] >> 4) & 0x07,
            output_power: bytes[0] & 0x0F,
        })
    }
}

impl ToByteArray for PaConfig {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let select = if self.pa_select { 0x80 } else { 0x00 };
        Ok([select | ((self.max_power & 0x07) << 4) | (self.output_power & 0x0F)])
    }
}

impl FromByteArray for PaDac {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            high_power: bytes[0] & 0x07 == 0x07,
        })
    }
}

impl ToByteArray for PaDac {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        Ok([if self.high_power { 0x87 } else { 0x84 }])
    }
}

impl FromByteArray for Lna {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            gain: bytes[0] >> 5,
            boost_lf: (bytes[0] >> 3) & 0x03,
            reserved: bytes[0] & 0x04 != 0,
            boost_hf: bytes[0] & 0x03 == 0x03,
        })
    }
}

impl ToByteArray for Lna {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let reserved = if self.reserved { 0x04 } else { 0x00 };
        let boost = if self.boost_hf { 0x03 } else { 0x00 };
        Ok([((self.gain & 0x07) << 5) | ((self.boost_lf & 0x03) << 3) | reserved | boost])
    }
}
