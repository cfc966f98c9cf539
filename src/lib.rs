#![cfg_attr(not(test), no_std)]
//! SX1276/77/78 LoRa Radio Driver
//!
//! This crate turns a Semtech SX1276/77/78 sub-GHz transceiver into a point-to-point LoRa
//! packet radio. It configures the modulation, drives the chip's mode state machine,
//! moves payloads through the chip's FIFO and reports signal quality of received packets.
//!
//! # Features
//! - Frequency range: 137-1020 MHz (band depends on the part)
//! - LoRa modulation: SF7-12, BW 7.8-500 kHz, CR 4/5-4/8
//! - Output power: 2 to 17 dBm on PA_BOOST
//! - Blocking transmit bounded by a timeout
//! - Polled, non-blocking reception into a caller supplied buffer
//! - RSSI/SNR of the last good packet
//!
//! # Architecture
//! - [`device`]: register access over SPI, with the driver owning chip-select
//! - [`registers`]: typed register definitions
//! - [`config`]: carrier frequency and modulation parameters
//! - [`radio`]: the [`Radio`] handle with its transmit and receive paths
//! - [`link`]: RSSI and SNR conversion
//!
//! # Important Notes
//! - This is a raw packet radio. There is no LoRaWAN MAC, no frequency hopping and no
//!   duty-cycle enforcement; those belong to the caller.
//! - The chip holds one received packet at a time. A packet arriving before the
//!   previous one was polled replaces it.
//! - Sync words must match on both ends. A mismatch is indistinguishable from silence.
//! - The DIO0 interrupt line is not used; completion is detected by polling the
//!   interrupt flags register.
//!
//! # Example
//! ```ignore
//! use sx1278::{Radio, RadioConfig, ReceiveOutcome, DEFAULT_TX_TIMEOUT_MS};
//!
//! let mut radio = Radio::new(spi, cs, reset, delay, RadioConfig::default())
//!     .map_err(|(err, _peripherals)| err)?;
//!
//! radio.transmit(b"hello", DEFAULT_TX_TIMEOUT_MS)?;
//!
//! radio.start_listening()?;
//! let mut buffer = [0u8; 255];
//! loop {
//!     if let ReceiveOutcome::Packet { len, quality } = radio.poll_received(&mut buffer)? {
//!         handle(&buffer[..len], quality.rssi_dbm);
//!     }
//! }
//! ```

#[macro_use]
mod fmt;

pub mod config;
pub mod device;
pub mod error;
pub mod link;
pub mod radio;
pub mod registers;

pub use config::{Frequency, FrequencyError, RadioConfig};
pub use device::Device;
pub use error::{BusError, InitError, TxError};
pub use link::LinkQuality;
pub use radio::{OperatingMode, Peripherals, Radio, ReceiveOutcome, DEFAULT_TX_TIMEOUT_MS};
pub use registers::*;
