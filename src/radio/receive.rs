//! Receive path
//!
//! Reception is polled: [`Radio::start_listening`] puts the chip into continuous receive
//! and [`Radio::poll_received`] checks for a completed packet. The chip keeps only the
//! most recent packet; one that arrives before the previous was polled overwrites it.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

use super::{OperatingMode, Radio};
use crate::error::BusError;
use crate::link::LinkQuality;
use crate::registers::{
    FifoAddrPtr, FifoRxCurrentAddr, IrqFlags, IrqStatus, PktRssiValue, PktSnrValue, RxNbBytes,
};

/// Result of a receive poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ReceiveOutcome {
    /// No packet has completed since the last poll
    NoPacket,
    /// A packet passed its CRC check and was copied into the buffer
    Packet {
        /// Bytes written to the front of the buffer
        len: usize,
        /// Signal quality of this packet
        quality: LinkQuality,
    },
    /// A packet arrived but failed its CRC check; it was discarded
    CrcError,
}

impl<SPI, CS, RESET, DELAY> Radio<SPI, CS, RESET, DELAY>
where
    SPI: SpiBus<u8>,
    CS: OutputPin,
    RESET: OutputPin,
    DELAY: DelayNs,
{
    /// Puts the chip into continuous receive.
    ///
    /// Pending interrupt flags are dropped, so a packet received before this call is
    /// never reported. The radio stays listening across polls until another mode is
    /// requested.
    pub fn start_listening(&mut self) -> Result<(), BusError> {
        self.set_mode(OperatingMode::Standby)?;
        self.device.write_register(IrqStatus::clear(IrqFlags::all()))?;
        self.device.write_register(FifoAddrPtr { address: 0 })?;
        self.set_mode(OperatingMode::Listening)?;
        debug!("listening");
        Ok(())
    }

    /// Checks for a received packet and copies it into `buffer`.
    ///
    /// Payloads longer than `buffer` are truncated to its length. A packet that failed
    /// its CRC is consumed and reported as [`ReceiveOutcome::CrcError`] without touching
    /// `buffer` or [`link_quality`](Self::link_quality). The radio keeps listening
    /// whatever the outcome.
    pub fn poll_received(&mut self, buffer: &mut [u8]) -> Result<ReceiveOutcome, BusError> {
        let status: IrqStatus = self.device.read_register()?;
        if !status.flags.contains(IrqFlags::RX_DONE) {
            return Ok(ReceiveOutcome::NoPacket);
        }
        self.device.write_register(IrqStatus::clear(IrqFlags::RX_DONE))?;

        if status.flags.contains(IrqFlags::PAYLOAD_CRC_ERROR) {
            self.device
                .write_register(IrqStatus::clear(IrqFlags::PAYLOAD_CRC_ERROR))?;
            debug!("dropped packet with bad CRC");
            return Ok(ReceiveOutcome::CrcError);
        }

        let received: RxNbBytes = self.device.read_register()?;
        let received = usize::from(received.count);
        let len = received.min(buffer.len());
        if len < received {
            debug!("truncating {} byte packet to {} bytes", received, len);
        }

        let start: FifoRxCurrentAddr = self.device.read_register()?;
        self.device.write_register(FifoAddrPtr {
            address: start.address,
        })?;
        self.device.read_fifo(&mut buffer[..len])?;

        let rssi: PktRssiValue = self.device.read_register()?;
        let snr: PktSnrValue = self.device.read_register()?;
        let quality = LinkQuality::from_raw(rssi.raw, snr.raw, self.config.frequency);
        self.link_quality = quality;
        debug!(
            "received {} bytes, RSSI {} dBm, SNR {} dB",
            len, quality.rssi_dbm, quality.snr_db
        );

        Ok(ReceiveOutcome::Packet { len, quality })
    }
}
