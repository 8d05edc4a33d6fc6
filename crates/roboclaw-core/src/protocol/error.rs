//! Protocol errors

use thiserror::Error;

/// Errors that can occur during protocol communication
#[derive(Error, Debug)]
pub enum ProtocolError {
    /// Error reported by the serial port driver
    #[error("Serial port error: {0}")]
    SerialError(String),

    /// Command issued without an open connection
    #[error("Not connected to controller")]
    NotConnected,

    /// Device could not be opened or configured
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Connect or attach on a connected session
    #[error("Already connected")]
    AlreadyConnected,

    /// The frame was only partially written
    #[error("Short write: {written} of {expected} bytes sent")]
    ShortWrite {
        /// Bytes accepted by the transport
        written: usize,
        /// Full frame length
        expected: usize,
    },

    /// No byte arrived within the acknowledgment timeout
    #[error("No acknowledgment from controller")]
    NoAcknowledgment,

    /// A byte other than the acknowledgment came back
    #[error("Controller rejected command: ack byte {0:#04x}")]
    Rejected(u8),

    /// Decoded frame checksum does not match its contents
    #[error("CRC mismatch: expected {expected:#06x}, got {actual:#06x}")]
    CrcMismatch {
        /// Checksum computed over the frame
        expected: u16,
        /// Checksum carried by the frame
        actual: u16,
    },

    /// Too short to be a frame
    #[error("Invalid frame")]
    InvalidFrame,

    /// Write or read failed
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<serialport::Error> for ProtocolError {
    fn from(e: serialport::Error) -> Self {
        ProtocolError::SerialError(e.to_string())
    }
}
