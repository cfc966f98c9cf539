//! Link quality of received packets
//!
//! The chip reports RSSI relative to a noise floor that depends on which RF port is in
//! use, so the offset to dBm changes at 525 MHz. SNR is reported in signed quarter dB.

use crate::config::Frequency;

/// RSSI offset on the low frequency port (below 525 MHz), in dB
pub const RSSI_OFFSET_LF: i16 = 164;
/// RSSI offset on the high frequency port, in dB
pub const RSSI_OFFSET_HF: i16 = 157;

/// Signal quality of the last successfully received packet.
///
/// Starts at zero and is only replaced by a packet that passed its CRC check; it is
/// never cleared, so after a corrupted packet it still describes the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkQuality {
    /// Packet RSSI in dBm
    pub rssi_dbm: i16,
    /// Packet SNR in dB, truncated towards zero
    pub snr_db: i8,
}

impl LinkQuality {
    /// Converts the raw packet RSSI and SNR register values.
    pub fn from_raw(rssi_raw: u8, snr_raw: i8, frequency: Frequency) -> Self {
        Self {
            rssi_dbm: rssi_dbm(rssi_raw, frequency),
            snr_db: snr_raw / 4,
        }
    }
}

/// Converts a raw RSSI register value to dBm for the given carrier.
pub fn rssi_dbm(raw: u8, frequency: Frequency) -> i16 {
    let offset = if frequency.is_low_band() {
        RSSI_OFFSET_LF
    } else {
        RSSI_OFFSET_HF
    };
    i16::from(raw) - offset
}
