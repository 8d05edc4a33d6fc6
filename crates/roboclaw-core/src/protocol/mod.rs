//! Serial Protocol Communication
//!
//! Implements the RoboClaw packet serial protocol.
//!
//! Every command is framed as `[address, command, payload.., crc_hi, crc_lo]`
//! and answered by a single acknowledgment byte.

mod checksum;
pub mod commands;
mod error;
mod packet;
pub mod serial;
mod session;

pub use checksum::crc16;
pub use commands::{Command, MixedSpeedParams};
pub use error::ProtocolError;
pub use packet::{decode_i32_be, encode_i32_be, CommandFrame, FrameBuilder};
pub use serial::{SerialTransport, Transport};
pub use session::{CommandResult, ControllerSession, SessionConfig, SessionState};

/// Default bus address of a RoboClaw unit
pub const DEFAULT_ADDRESS: u8 = 0x80;

/// Default baud rate for packet serial mode
pub const DEFAULT_BAUD_RATE: u32 = 115200;

/// Default time to wait for the acknowledgment byte, in milliseconds
pub const DEFAULT_ACK_TIMEOUT_MS: u64 = 100;

/// Byte the controller sends back after accepting a frame
pub const ACK: u8 = 0xFF;

/// Address + command header length
pub const HEADER_LEN: usize = 2;

/// Trailing checksum length
pub const CRC_LEN: usize = 2;
