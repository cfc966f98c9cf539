//! Transmit path

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

use super::{OperatingMode, Radio};
use crate::error::TxError;
use crate::registers::{FifoAddrPtr, IrqFlags, IrqStatus, PayloadLength, MAX_PAYLOAD_LEN};

/// Default upper bound on waiting for TxDone, in ms
///
/// Long enough for a full 255 byte payload at SF7/125 kHz (about 400 ms on air) with a
/// wide margin. Slower modulations need a larger bound.
pub const DEFAULT_TX_TIMEOUT_MS: u32 = 2_000;

/// Interval between TxDone polls
const TX_POLL_INTERVAL_MS: u32 = 1;

impl<SPI, CS, RESET, DELAY> Radio<SPI, CS, RESET, DELAY>
where
    SPI: SpiBus<u8>,
    CS: OutputPin,
    RESET: OutputPin,
    DELAY: DelayNs,
{
    /// Sends `payload` and blocks until the chip reports it sent.
    ///
    /// The chip is forced to standby first, which aborts listening; call
    /// [`start_listening`](Self::start_listening) again afterwards to keep receiving.
    /// Waiting is bounded by `timeout_ms`, measured by counting poll intervals on the
    /// radio's delay source. On success the radio is back in standby.
    ///
    /// # Errors
    /// * `TxError::PayloadTooLarge` - more than 255 bytes; nothing is sent to the chip
    /// * `TxError::Timeout` - TxDone did not arrive in time; the chip is left in
    ///   transmit mode, see [`wake`](Self::wake)
    /// * `TxError::BusFailure` - a register transaction failed
    pub fn transmit(&mut self, payload: &[u8], timeout_ms: u32) -> Result<(), TxError> {
        if payload.len() > MAX_PAYLOAD_LEN {
            return Err(TxError::PayloadTooLarge { len: payload.len() });
        }
        let length = payload.len() as u8;

        self.set_mode(OperatingMode::Standby)?;
        self.device.write_register(IrqStatus::clear(IrqFlags::all()))?;

        self.device.write_register(FifoAddrPtr { address: 0 })?;
        self.device.write_fifo(payload)?;
        self.device.write_register(PayloadLength { length })?;

        self.set_mode(OperatingMode::Transmitting)?;
        debug!("transmitting {} bytes", length);

        let mut waited_ms = 0;
        loop {
            let status: IrqStatus = self.device.read_register()?;
            if status.flags.contains(IrqFlags::TX_DONE) {
                break;
            }
            if waited_ms >= timeout_ms {
                warn!("no TxDone after {} ms", waited_ms);
                return Err(TxError::Timeout);
            }
            self.delay.delay_ms(TX_POLL_INTERVAL_MS);
            waited_ms += TX_POLL_INTERVAL_MS;
        }
        trace!("TxDone after {} ms", waited_ms);

        self.device.write_register(IrqStatus::clear(IrqFlags::TX_DONE))?;
        self.set_mode(OperatingMode::Standby)?;
        Ok(())
    }
}
