//! Operating mode register

use core::convert::Infallible;

use regiface::{register, FromByteArray, ReadableRegister, ToByteArray, WritableRegister};

/// Transceiver mode, bits 2:0 of [`OpMode`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceMode {
    /// Lowest power; FIFO is not accessible. Only mode in which the modem type may change.
    Sleep = 0b000,
    /// Crystal oscillator running, FIFO accessible
    Standby = 0b001,
    /// Frequency synthesis for TX
    FsTx = 0b010,
    /// Transmit the packet in the FIFO, then return to standby
    Transmit = 0b011,
    /// Frequency synthesis for RX
    FsRx = 0b100,
    /// Receive packets until the mode is changed
    ReceiveContinuous = 0b101,
    /// Receive one packet, then return to standby
    ReceiveSingle = 0b110,
    /// Channel activity detection
    ChannelActivityDetection = 0b111,
}

impl DeviceMode {
    fn from_bits(bits: u8) -> Self {
        match bits & 0x07 {
            0b000 => Self::Sleep,
            0b001 => Self::Standby,
            0b010 => Self::FsTx,
            0b011 => Self::Transmit,
            0b100 => Self::FsRx,
            0b101 => Self::ReceiveContinuous,
            0b110 => Self::ReceiveSingle,
            _ => Self::ChannelActivityDetection,
        }
    }
}

/// Operating mode register (address: 0x01)
///
/// # Important Notes
/// - `long_range_mode` selects the LoRa modem. It may only change in sleep mode, and
///   a mode write without it drops the chip back to FSK/OOK framing, so every write
///   issued by this driver carries it.
/// - `low_frequency_mode_on` selects the LF register bank for test registers; the
///   driver keeps it cleared.
#[register(0x01u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ReadableRegister, WritableRegister)]
pub struct OpMode {
    /// Bit 7: LoRa (true) or FSK/OOK (false) modem
    pub long_range_mode: bool,
    /// Bit 3: access low frequency mode registers
    pub low_frequency_mode_on: bool,
    /// Bits 2:0: transceiver mode
    pub mode: DeviceMode,
}

impl OpMode {
    /// LoRa modem in the given transceiver mode
    pub const fn lora(mode: DeviceMode) -> Self {
        Self {
            long_range_mode: true,
            low_frequency_mode_on: false,
            mode,
        }
    }
}

impl FromByteArray for OpMode {
    type Error = Infallible;
    type Array = [u8; 1];

    fn from_bytes(bytes: Self::Array) -> Result<Self, Self::Error> {
        Ok(Self {
            long_range_mode: bytes[0] & 0x80 != 0,
            low_frequency_mode_on: bytes[0] & 0x08 != 0,
            mode: DeviceMode::from_bits(bytes[0]),
        })
    }
}

impl ToByteArray for OpMode {
    type Error = Infallible;
    type Array = [u8; 1];

    fn to_bytes(self) -> Result<Self::Array, Self::Error> {
        let mut byte = self.mode as u8;
        if self.long_range_mode {
            byte |= 0x80;
        }
        if self.low_frequency_mode_on {
            byte |= 0x08;
        }
        Ok([byte])
    }
}
