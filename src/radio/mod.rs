//! LoRa packet radio
//!
//! [`Radio`] owns the bus, chip-select, reset line and a delay source, and drives the
//! chip's mode state machine:
//!
//! ```text
//!            new()
//!              │
//!   sleep() ◄──┴──► Standby ◄── wake()
//!                    │   ▲
//!       transmit() ──┘   │ TxDone
//!                 Transmitting
//!                    │
//!   start_listening() ──► Listening (stays here across poll_received())
//! ```
//!
//! Both transmit and start of reception force standby before setting up the FIFO, so
//! the two paths never overlap. The radio is not internally synchronised: all
//! operations take `&mut self` and one task must own it.

mod receive;
mod transmit;

pub use receive::ReceiveOutcome;
pub use transmit::DEFAULT_TX_TIMEOUT_MS;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{Error as _, OutputPin};
use embedded_hal::spi::SpiBus;

use crate::config::{Frequency, RadioConfig};
use crate::device::Device;
use crate::error::{BusError, InitError};
use crate::link::{self, LinkQuality};
use crate::registers::{
    CarrierFrequency, DeviceMode, FifoRxBaseAddr, FifoTxBaseAddr, Lna, ModemConfig1,
    ModemConfig2, ModemConfig3, OpMode, PaConfig, PaDac, PreambleLength, RssiValue, SyncWord,
    Version, EXPECTED_VERSION, PA_BOOST_MAX_DBM, PA_BOOST_MIN_DBM,
};

/// Reset pulse and post-reset settle time, per edge
const RESET_SETTLE_MS: u32 = 10;
/// Settle time after a mode change that starts the oscillator
const MODE_SETTLE_MS: u32 = 10;

/// Operating mode as driven by this driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OperatingMode {
    /// Lowest power, FIFO inaccessible
    Sleep,
    /// Idle with oscillator running; the only mode the FIFO is accessed in
    Standby,
    /// Sending the FIFO content
    Transmitting,
    /// Continuous receive
    Listening,
}

impl From<OperatingMode> for DeviceMode {
    fn from(mode: OperatingMode) -> Self {
        match mode {
            OperatingMode::Sleep => DeviceMode::Sleep,
            OperatingMode::Standby => DeviceMode::Standby,
            OperatingMode::Transmitting => DeviceMode::Transmit,
            OperatingMode::Listening => DeviceMode::ReceiveContinuous,
        }
    }
}

/// Bus, pins and delay owned by a [`Radio`].
///
/// Returned by [`Radio::release`], and alongside the error when [`Radio::new`] or
/// `release` fails.
#[derive(Debug)]
pub struct Peripherals<SPI, CS, RESET, DELAY> {
    /// SPI bus
    pub spi: SPI,
    /// Chip-select line
    pub cs: CS,
    /// Reset line
    pub reset: RESET,
    /// Delay source
    pub delay: DELAY,
}

/// An SX1276/77/78 configured as a LoRa packet radio.
pub struct Radio<SPI, CS, RESET, DELAY> {
    device: Device<SPI, CS>,
    reset: RESET,
    delay: DELAY,
    config: RadioConfig,
    mode: OperatingMode,
    link_quality: LinkQuality,
}

impl<SPI, CS, RESET, DELAY> Radio<SPI, CS, RESET, DELAY>
where
    SPI: SpiBus<u8>,
    CS: OutputPin,
    RESET: OutputPin,
    DELAY: DelayNs,
{
    /// Resets the chip, checks it is present and applies `config`.
    ///
    /// Blocks for about 30 ms of settle time. The radio is left in standby. The
    /// stored transmit power is clamped to what was programmed.
    ///
    /// On failure the bus, pins and delay are handed back with the error so the caller
    /// can retry.
    ///
    /// # Errors
    /// * `InitError::ChipNotDetected` - the version register did not read 0x12; no
    ///   register was written
    /// * `InitError::ResetLine` - the reset line could not be driven
    /// * `InitError::BusFailure` - a register transaction failed
    #[allow(clippy::type_complexity)]
    pub fn new(
        spi: SPI,
        cs: CS,
        reset: RESET,
        delay: DELAY,
        mut config: RadioConfig,
    ) -> Result<Self, (InitError, Peripherals<SPI, CS, RESET, DELAY>)> {
        config.tx_power_dbm = config
            .tx_power_dbm
            .clamp(PA_BOOST_MIN_DBM, PA_BOOST_MAX_DBM);

        let mut radio = Self {
            device: Device::new(spi, cs),
            reset,
            delay,
            config,
            mode: OperatingMode::Sleep,
            link_quality: LinkQuality::default(),
        };

        match radio.init() {
            Ok(()) => Ok(radio),
            Err(err) => Err((err, radio.into_peripherals())),
        }
    }

    fn init(&mut self) -> Result<(), InitError> {
        self.device.deselect()?;
        self.hard_reset()?;

        let version: Version = self.device.read_register()?;
        if version.value != EXPECTED_VERSION {
            warn!("radio not detected, version register read {}", version.value);
            return Err(InitError::ChipNotDetected {
                version: version.value,
            });
        }
        debug!("radio detected, version {}", version.value);

        self.configure()?;
        info!("radio ready at {} Hz", self.config.frequency.hz());
        Ok(())
    }

    fn hard_reset(&mut self) -> Result<(), InitError> {
        self.reset
            .set_low()
            .map_err(|err| InitError::ResetLine(err.kind()))?;
        self.delay.delay_ms(RESET_SETTLE_MS);
        self.reset
            .set_high()
            .map_err(|err| InitError::ResetLine(err.kind()))?;
        self.delay.delay_ms(RESET_SETTLE_MS);
        Ok(())
    }

    fn configure(&mut self) -> Result<(), BusError> {
        // The modem type can only change in sleep
        self.set_mode(OperatingMode::Sleep)?;
        self.delay.delay_ms(MODE_SETTLE_MS);

        self.write_frequency(self.config.frequency)?;

        // TX and RX never run together, so both use the whole FIFO
        self.device.write_register(FifoTxBaseAddr { address: 0 })?;
        self.device.write_register(FifoRxBaseAddr { address: 0 })?;

        let lna: Lna = self.device.read_register()?;
        self.device.write_register(Lna {
            boost_hf: true,
            ..lna
        })?;

        self.device.write_register(ModemConfig1 {
            bandwidth: self.config.bandwidth,
            coding_rate: self.config.coding_rate,
            implicit_header: false,
        })?;
        self.device.write_register(ModemConfig2 {
            spreading_factor: self.config.spreading_factor,
            tx_continuous: false,
            rx_payload_crc_on: self.config.crc,
        })?;
        self.device.write_register(ModemConfig3 {
            low_data_rate_optimize: self.config.low_data_rate_optimize(),
            agc_auto_on: true,
        })?;

        self.device.write_register(PreambleLength {
            symbols: self.config.preamble_length,
        })?;
        self.device.write_register(SyncWord {
            value: self.config.sync_word,
        })?;
        self.device
            .write_register(PaConfig::pa_boost(self.config.tx_power_dbm))?;
        self.device.write_register(PaDac { high_power: true })?;

        self.set_mode(OperatingMode::Standby)?;
        self.delay.delay_ms(MODE_SETTLE_MS);
        Ok(())
    }

    /// Writes the chip's mode register. Every write selects the LoRa modem.
    fn set_mode(&mut self, mode: OperatingMode) -> Result<(), BusError> {
        self.device.write_register(OpMode::lora(mode.into()))?;
        trace!("mode {}", mode);
        self.mode = mode;
        Ok(())
    }

    fn write_frequency(&mut self, frequency: Frequency) -> Result<(), BusError> {
        self.device.write_register(CarrierFrequency {
            frf: frequency.frf(),
        })
    }

    /// Puts the chip into sleep mode, its lowest power state.
    ///
    /// Configuration is retained. Call [`wake`](Self::wake) before using the radio again.
    pub fn sleep(&mut self) -> Result<(), BusError> {
        self.set_mode(OperatingMode::Sleep)
    }

    /// Puts the chip into standby and waits for the oscillator to settle.
    ///
    /// Also the way to recover a radio left transmitting after a
    /// [`TxError::Timeout`](crate::TxError::Timeout), or to stop listening.
    pub fn wake(&mut self) -> Result<(), BusError> {
        self.set_mode(OperatingMode::Standby)?;
        self.delay.delay_ms(MODE_SETTLE_MS);
        Ok(())
    }

    /// Sets the PA_BOOST output power in dBm.
    ///
    /// Levels outside 2..=17 dBm are clamped. Only the PA configuration register is
    /// written; no mode change is needed.
    pub fn set_transmit_power(&mut self, dbm: i8) -> Result<(), BusError> {
        self.device.write_register(PaConfig::pa_boost(dbm))?;
        self.config.tx_power_dbm = dbm.clamp(PA_BOOST_MIN_DBM, PA_BOOST_MAX_DBM);
        Ok(())
    }

    /// Sets the network sync word.
    ///
    /// Both ends of a link must use the same value. A receiver drops packets with a
    /// different sync word before raising any interrupt, so a mismatch looks exactly
    /// like an idle channel: [`poll_received`](Self::poll_received) keeps returning
    /// [`ReceiveOutcome::NoPacket`].
    pub fn set_sync_word(&mut self, word: u8) -> Result<(), BusError> {
        self.device.write_register(SyncWord { value: word })?;
        self.config.sync_word = word;
        Ok(())
    }

    /// Retunes the carrier frequency.
    ///
    /// The chip must not be transmitting or receiving; call [`wake`](Self::wake) first
    /// if it is. The RSSI offset used for [`LinkQuality`] follows the new band.
    pub fn set_frequency(&mut self, frequency: Frequency) -> Result<(), BusError> {
        self.write_frequency(frequency)?;
        self.config.frequency = frequency;
        Ok(())
    }

    /// Reads the mode the chip is actually in.
    ///
    /// After a completed transmission the chip returns to standby by itself, so this can
    /// differ from [`mode`](Self::mode) after a transmit timeout.
    pub fn chip_mode(&mut self) -> Result<OpMode, BusError> {
        self.device.read_register()
    }

    /// Current RSSI on the channel in dBm.
    ///
    /// Only meaningful while listening; useful to check the channel is clear before
    /// transmitting.
    pub fn current_rssi(&mut self) -> Result<i16, BusError> {
        let rssi: RssiValue = self.device.read_register()?;
        Ok(link::rssi_dbm(rssi.raw, self.config.frequency))
    }

    /// Puts the chip to sleep and hands back the bus, pins and delay.
    ///
    /// If the sleep command fails the chip may still be awake; the peripherals are
    /// handed back with the error either way.
    #[allow(clippy::type_complexity)]
    pub fn release(
        mut self,
    ) -> Result<
        Peripherals<SPI, CS, RESET, DELAY>,
        (BusError, Peripherals<SPI, CS, RESET, DELAY>),
    > {
        match self.sleep() {
            Ok(()) => Ok(self.into_peripherals()),
            Err(err) => Err((err, self.into_peripherals())),
        }
    }
}

impl<SPI, CS, RESET, DELAY> Radio<SPI, CS, RESET, DELAY> {
    fn into_peripherals(self) -> Peripherals<SPI, CS, RESET, DELAY> {
        let (spi, cs) = self.device.release();
        Peripherals {
            spi,
            cs,
            reset: self.reset,
            delay: self.delay,
        }
    }

    /// Mode last set by the driver
    pub fn mode(&self) -> OperatingMode {
        self.mode
    }

    /// Configuration currently applied, including later setter changes
    pub fn config(&self) -> &RadioConfig {
        &self.config
    }

    /// Signal quality of the last packet that passed its CRC check.
    ///
    /// Zero until the first packet arrives.
    pub fn link_quality(&self) -> LinkQuality {
        self.link_quality
    }
}
