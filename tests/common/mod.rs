//! Register-level simulation of an SX127x for driving the radio without hardware.
#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, OutputPin};
use embedded_hal::spi::{self, ErrorKind, SpiBus};

const REG_FIFO: u8 = 0x00;
const REG_OP_MODE: u8 = 0x01;
const REG_LNA: u8 = 0x0C;
const REG_FIFO_ADDR_PTR: u8 = 0x0D;
const REG_FIFO_RX_CURRENT_ADDR: u8 = 0x10;
const REG_IRQ_FLAGS: u8 = 0x12;
const REG_RX_NB_BYTES: u8 = 0x13;
const REG_PKT_SNR_VALUE: u8 = 0x19;
const REG_PKT_RSSI_VALUE: u8 = 0x1A;
const REG_RSSI_VALUE: u8 = 0x1B;
const REG_VERSION: u8 = 0x42;

const MODE_MASK: u8 = 0x07;
const MODE_STANDBY: u8 = 0x01;
const MODE_TRANSMIT: u8 = 0x03;

const IRQ_RX_DONE: u8 = 0x40;
const IRQ_PAYLOAD_CRC_ERROR: u8 = 0x20;
const IRQ_VALID_HEADER: u8 = 0x10;
const IRQ_TX_DONE: u8 = 0x08;

/// FIFO offset the simulated demodulator stores packets at
pub const RX_PACKET_ADDRESS: u8 = 0x40;

/// One chip-select framed write as seen on the bus
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Write {
    pub address: u8,
    pub data: Vec<u8>,
}

struct Frame {
    header: Option<u8>,
    data: Vec<u8>,
    offset: u8,
}

struct ChipState {
    registers: [u8; 128],
    fifo: [u8; 256],
    version: u8,
    completes_transmissions: bool,
    fail_next_transfer: bool,
    chip_selected: bool,
    frame: Option<Frame>,
    writes: Vec<Write>,
    reset_levels: Vec<bool>,
}

impl ChipState {
    fn read(&mut self, address: u8) -> u8 {
        match address {
            REG_FIFO => {
                let pointer = self.registers[REG_FIFO_ADDR_PTR as usize];
                self.registers[REG_FIFO_ADDR_PTR as usize] = pointer.wrapping_add(1);
                self.fifo[pointer as usize]
            }
            REG_VERSION => self.version,
            _ => self.registers[address as usize & 0x7F],
        }
    }

    fn write(&mut self, address: u8, value: u8) {
        match address {
            REG_FIFO => {
                let pointer = self.registers[REG_FIFO_ADDR_PTR as usize];
                self.registers[REG_FIFO_ADDR_PTR as usize] = pointer.wrapping_add(1);
                self.fifo[pointer as usize] = value;
            }
            REG_IRQ_FLAGS => self.registers[REG_IRQ_FLAGS as usize] &= !value,
            REG_OP_MODE if value & MODE_MASK == MODE_TRANSMIT && self.completes_transmissions => {
                // The packet goes out instantly and the chip drops back to standby
                self.registers[REG_IRQ_FLAGS as usize] |= IRQ_TX_DONE;
                self.registers[REG_OP_MODE as usize] = (value & !MODE_MASK) | MODE_STANDBY;
            }
            _ => self.registers[address as usize & 0x7F] = value,
        }
    }

    fn next_address(frame: &mut Frame) -> u8 {
        let header = frame.header.unwrap_or_default() & 0x7F;
        let address = if header == REG_FIFO {
            REG_FIFO
        } else {
            header + frame.offset
        };
        frame.offset += 1;
        address
    }

    fn check_transfer(&mut self) -> Result<(), ErrorKind> {
        assert!(self.chip_selected, "SPI transfer without chip-select");
        if self.fail_next_transfer {
            self.fail_next_transfer = false;
            return Err(ErrorKind::Other);
        }
        Ok(())
    }
}

/// Simulated chip; clones share the same state.
#[derive(Clone)]
pub struct SimChip {
    state: Rc<RefCell<ChipState>>,
}

impl SimChip {
    pub fn new() -> Self {
        let mut registers = [0u8; 128];
        // power-on values the driver depends on
        registers[REG_OP_MODE as usize] = 0x09;
        registers[REG_LNA as usize] = 0x20;

        Self {
            state: Rc::new(RefCell::new(ChipState {
                registers,
                fifo: [0; 256],
                version: 0x12,
                completes_transmissions: true,
                fail_next_transfer: false,
                chip_selected: false,
                frame: None,
                writes: Vec::new(),
                reset_levels: Vec::new(),
            })),
        }
    }

    pub fn with_version(self, version: u8) -> Self {
        self.state.borrow_mut().version = version;
        self
    }

    /// Transmissions never raise TxDone.
    pub fn never_completes_transmissions(&self) {
        self.state.borrow_mut().completes_transmissions = false;
    }

    /// The next SPI operation fails with `ErrorKind::Other`.
    pub fn fail_next_transfer(&self) {
        self.state.borrow_mut().fail_next_transfer = true;
    }

    pub fn chip_select(&self) -> SimCs {
        SimCs {
            state: self.state.clone(),
        }
    }

    pub fn reset_pin(&self) -> SimReset {
        SimReset {
            state: self.state.clone(),
        }
    }

    pub fn register(&self, address: u8) -> u8 {
        self.state.borrow().registers[address as usize]
    }

    pub fn set_register(&self, address: u8, value: u8) {
        self.state.borrow_mut().registers[address as usize] = value;
    }

    pub fn fifo(&self, start: usize, len: usize) -> Vec<u8> {
        self.state.borrow().fifo[start..start + len].to_vec()
    }

    pub fn is_selected(&self) -> bool {
        self.state.borrow().chip_selected
    }

    pub fn reset_levels(&self) -> Vec<bool> {
        self.state.borrow().reset_levels.clone()
    }

    pub fn writes(&self) -> Vec<Write> {
        self.state.borrow().writes.clone()
    }

    /// Data of every write to `address`, oldest first.
    pub fn writes_to(&self, address: u8) -> Vec<Vec<u8>> {
        self.state
            .borrow()
            .writes
            .iter()
            .filter(|write| write.address == address)
            .map(|write| write.data.clone())
            .collect()
    }

    pub fn clear_writes(&self) {
        self.state.borrow_mut().writes.clear();
    }

    /// Behaves as if a packet was demodulated: FIFO content, length, signal registers
    /// and interrupt flags are updated.
    pub fn inject_packet(&self, payload: &[u8], rssi_raw: u8, snr_raw: i8, crc_error: bool) {
        let mut state = self.state.borrow_mut();
        let start = RX_PACKET_ADDRESS as usize;
        state.fifo[start..start + payload.len()].copy_from_slice(payload);
        state.registers[REG_FIFO_RX_CURRENT_ADDR as usize] = RX_PACKET_ADDRESS;
        state.registers[REG_RX_NB_BYTES as usize] = payload.len() as u8;
        state.registers[REG_PKT_RSSI_VALUE as usize] = rssi_raw;
        state.registers[REG_PKT_SNR_VALUE as usize] = snr_raw as u8;

        let mut flags = IRQ_RX_DONE | IRQ_VALID_HEADER;
        if crc_error {
            flags |= IRQ_PAYLOAD_CRC_ERROR;
        }
        state.registers[REG_IRQ_FLAGS as usize] |= flags;
    }

    pub fn set_channel_rssi(&self, raw: u8) {
        self.set_register(REG_RSSI_VALUE, raw);
    }
}

impl spi::ErrorType for SimChip {
    type Error = ErrorKind;
}

impl SpiBus<u8> for SimChip {
    fn read(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();
        state.check_transfer()?;
        let mut frame = state.frame.take().expect("no frame open");
        for word in words.iter_mut() {
            let address = ChipState::next_address(&mut frame);
            *word = state.read(address);
        }
        state.frame = Some(frame);
        Ok(())
    }

    fn write(&mut self, words: &[u8]) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();
        state.check_transfer()?;
        let mut frame = state.frame.take().expect("no frame open");
        for &word in words {
            if frame.header.is_none() {
                frame.header = Some(word);
                continue;
            }
            let address = ChipState::next_address(&mut frame);
            state.write(address, word);
            frame.data.push(word);
        }
        state.frame = Some(frame);
        Ok(())
    }

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> Result<(), Self::Error> {
        self.write(write)?;
        self.read(read)
    }

    fn transfer_in_place(&mut self, words: &mut [u8]) -> Result<(), Self::Error> {
        let written = words.to_vec();
        self.transfer(words, &written)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }
}

/// Chip-select line; framing is tracked in the shared chip state.
pub struct SimCs {
    state: Rc<RefCell<ChipState>>,
}

impl digital::ErrorType for SimCs {
    type Error = Infallible;
}

impl OutputPin for SimCs {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();
        assert!(!state.chip_selected, "chip-select asserted twice");
        state.chip_selected = true;
        state.frame = Some(Frame {
            header: None,
            data: Vec::new(),
            offset: 0,
        });
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        let mut state = self.state.borrow_mut();
        state.chip_selected = false;
        if let Some(frame) = state.frame.take() {
            if let Some(header) = frame.header.filter(|header| header & 0x80 != 0) {
                state.writes.push(Write {
                    address: header & 0x7F,
                    data: frame.data,
                });
            }
        }
        Ok(())
    }
}

/// Reset line; records every level driven.
pub struct SimReset {
    state: Rc<RefCell<ChipState>>,
}

impl digital::ErrorType for SimReset {
    type Error = Infallible;
}

impl OutputPin for SimReset {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.state.borrow_mut().reset_levels.push(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.state.borrow_mut().reset_levels.push(true);
        Ok(())
    }
}

/// Delay source that only advances a counter; clones share the counter.
#[derive(Clone, Default)]
pub struct VirtualClock {
    elapsed_ns: Rc<Cell<u64>>,
}

impl VirtualClock {
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ns.get() / 1_000_000
    }
}

impl DelayNs for VirtualClock {
    fn delay_ns(&mut self, ns: u32) {
        self.elapsed_ns.set(self.elapsed_ns.get() + u64::from(ns));
    }
}
