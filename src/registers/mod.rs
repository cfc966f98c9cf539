//! Register definitions for the SX1276/77/78 in LoRa mode
//! Taken from the SX1276/77/78/79 datasheet, rev. 7
//!
//! Every register is a typed value carrying its address; its fields document the
//! bit positions they occupy. All accesses go through [`Device`](crate::Device).

mod mode;
mod modem;
mod packet;
mod rf;
mod status;

pub use mode::*;
pub use modem::*;
pub use packet::*;
pub use rf::*;
pub use status::*;
