//! Radio configuration
//!
//! [`RadioConfig`] is applied once by [`Radio::new`](crate::Radio::new). Frequency, sync
//! word and output power can be changed afterwards through narrow setters on the radio;
//! the modulation parameters cannot.

use core::fmt;

use crate::registers::{Bandwidth, CodingRate, SpreadingFactor};

/// Crystal oscillator frequency in Hz
pub const FXOSC_HZ: u64 = 32_000_000;

/// Fixed-point scale of the FRF register (2^19)
const FRF_SHIFT: u32 = 19;

/// Symbol duration above which low data rate optimisation is required, in µs
const LOW_DATA_RATE_SYMBOL_US: u32 = 16_000;

/// A carrier frequency inside the SX127x family range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Frequency(u32);

/// The requested frequency is outside the 137-1020 MHz family range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FrequencyError {
    /// Requested frequency in Hz
    OutOfRange {
        /// Rejected frequency in Hz
        hz: u32,
    },
}

impl Frequency {
    /// Lowest frequency supported by the family (SX1278 LF band)
    pub const MIN_HZ: u32 = 137_000_000;
    /// Highest frequency supported by the family (SX1276 HF band)
    pub const MAX_HZ: u32 = 1_020_000_000;

    /// 433 MHz ISM band
    pub const MHZ_433: Self = Self(433_000_000);
    /// 868 MHz SRD band
    pub const MHZ_868: Self = Self(868_000_000);
    /// 915 MHz ISM band
    pub const MHZ_915: Self = Self(915_000_000);

    /// Validates a frequency in Hz.
    pub const fn from_hz(hz: u32) -> Result<Self, FrequencyError> {
        if hz < Self::MIN_HZ || hz > Self::MAX_HZ {
            Err(FrequencyError::OutOfRange { hz })
        } else {
            Ok(Self(hz))
        }
    }

    /// Validates a frequency in whole MHz.
    pub const fn from_mhz(mhz: u32) -> Result<Self, FrequencyError> {
        match mhz.checked_mul(1_000_000) {
            Some(hz) => Self::from_hz(hz),
            None => Err(FrequencyError::OutOfRange { hz: u32::MAX }),
        }
    }

    /// Frequency in Hz
    pub const fn hz(self) -> u32 {
        self.0
    }

    /// 24-bit FRF register word: round(f * 2^19 / FXOSC).
    pub const fn frf(self) -> u32 {
        let scaled = (self.0 as u64) << FRF_SHIFT;
        ((scaled + FXOSC_HZ / 2) / FXOSC_HZ) as u32
    }

    /// Carrier frequency in Hz produced by an FRF word, rounded to the nearest Hz.
    pub const fn frf_to_hz(frf: u32) -> u32 {
        let scaled = frf as u64 * FXOSC_HZ;
        ((scaled + (1 << (FRF_SHIFT - 1))) >> FRF_SHIFT) as u32
    }

    /// Whether the frequency is served by the low frequency RF port (below 525 MHz).
    pub const fn is_low_band(self) -> bool {
        self.0 < 525_000_000
    }
}

impl TryFrom<u32> for Frequency {
    type Error = FrequencyError;

    fn try_from(hz: u32) -> Result<Self, Self::Error> {
        Self::from_hz(hz)
    }
}

impl fmt::Display for FrequencyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfRange { hz } => write!(
                f,
                "{hz} Hz is outside {}..={} Hz",
                Frequency::MIN_HZ,
                Frequency::MAX_HZ
            ),
        }
    }
}

impl core::error::Error for FrequencyError {}

/// Parameters applied when the radio is brought up.
///
/// Both ends of a link must agree on frequency, bandwidth, coding rate, spreading
/// factor, CRC and sync word. The default is a private 433 MHz network at SF7/125 kHz,
/// 4/5, 8 symbol preamble, sync word 0x12, 17 dBm on PA_BOOST with CRC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RadioConfig {
    /// Carrier frequency
    pub frequency: Frequency,
    /// Signal bandwidth
    pub bandwidth: Bandwidth,
    /// Error coding rate
    pub coding_rate: CodingRate,
    /// Spreading factor
    pub spreading_factor: SpreadingFactor,
    /// Network sync word
    pub sync_word: u8,
    /// Preamble length in symbols
    pub preamble_length: u16,
    /// Output power on PA_BOOST in dBm, clamped to 2..=17
    pub tx_power_dbm: i8,
    /// Payload CRC generation and check
    pub crc: bool,
}

impl Default for RadioConfig {
    fn default() -> Self {
        Self {
            frequency: Frequency::MHZ_433,
            bandwidth: Bandwidth::Khz125,
            coding_rate: CodingRate::Cr4_5,
            spreading_factor: SpreadingFactor::Sf7,
            sync_word: 0x12,
            preamble_length: 8,
            tx_power_dbm: 17,
            crc: true,
        }
    }
}

impl RadioConfig {
    /// Duration of one LoRa symbol in µs (2^SF / BW).
    pub const fn symbol_time_us(&self) -> u32 {
        let chips = self.spreading_factor.chips() as u64;
        (chips * 1_000_000 / self.bandwidth.hz() as u64) as u32
    }

    /// Whether low data rate optimisation must be enabled for this modulation.
    pub const fn low_data_rate_optimize(&self) -> bool {
        self.symbol_time_us() > LOW_DATA_RATE_SYMBOL_US
    }
}
