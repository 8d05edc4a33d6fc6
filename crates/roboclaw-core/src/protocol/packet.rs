//! Packet encoding/decoding
//!
//! Implements the packet serial frame format.
//!
//! Frame format:
//! - 1 byte: Unit address
//! - 1 byte: Command code
//! - N bytes: Payload
//! - 2 bytes: CRC16 (big-endian) of address + command + payload

use byteorder::{BigEndian, ByteOrder};

use super::{crc16, ProtocolError, CRC_LEN, HEADER_LEN};

/// An outbound command frame
///
/// Fields are only set through [`CommandFrame::new`] or a verified decode, so
/// the stored checksum always matches the bytes it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandFrame {
    address: u8,
    command: u8,
    payload: Vec<u8>,
    crc: u16,
}

impl CommandFrame {
    /// Create a new frame, computing its checksum
    pub fn new(address: u8, command: u8, payload: Vec<u8>) -> Self {
        let crc = calculate_crc(address, command, &payload);
        Self {
            address,
            command,
            payload,
            crc,
        }
    }

    /// Decode a frame from raw bytes and verify its checksum
    pub fn from_bytes(data: &[u8]) -> Result<Self, ProtocolError> {
        if data.len() < HEADER_LEN + CRC_LEN {
            return Err(ProtocolError::InvalidFrame);
        }

        let body_len = data.len() - CRC_LEN;
        let received_crc = BigEndian::read_u16(&data[body_len..]);
        let expected_crc = crc16(&data[..body_len]);

        if received_crc != expected_crc {
            return Err(ProtocolError::CrcMismatch {
                expected: expected_crc,
                actual: received_crc,
            });
        }

        Ok(Self {
            address: data[0],
            command: data[1],
            payload: data[HEADER_LEN..body_len].to_vec(),
            crc: received_crc,
        })
    }

    /// Unit address on the bus
    pub fn address(&self) -> u8 {
        self.address
    }

    /// Command code
    pub fn command(&self) -> u8 {
        self.command
    }

    /// Command parameters
    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// CRC16 over address, command and payload
    pub fn crc(&self) -> u16 {
        self.crc
    }

    /// Encode the frame to raw bytes
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.encoded_size());

        bytes.push(self.address);
        bytes.push(self.command);
        bytes.extend_from_slice(&self.payload);

        let mut crc_bytes = [0u8; CRC_LEN];
        BigEndian::write_u16(&mut crc_bytes, self.crc);
        bytes.extend_from_slice(&crc_bytes);

        bytes
    }

    /// Get the total encoded size
    pub fn encoded_size(&self) -> usize {
        HEADER_LEN + self.payload.len() + CRC_LEN
    }
}

/// Builder for constructing command frames
pub struct FrameBuilder {
    address: u8,
    command: u8,
    payload: Vec<u8>,
}

impl FrameBuilder {
    /// Start a frame for `command` addressed to `address`
    pub fn new(address: u8, command: u8) -> Self {
        Self {
            address,
            command,
            payload: Vec::new(),
        }
    }

    /// Add a signed 32-bit value (big-endian, two's complement)
    pub fn i32_be(mut self, value: i32) -> Self {
        self.payload.extend_from_slice(&encode_i32_be(value));
        self
    }

    /// Build the frame
    pub fn build(self) -> CommandFrame {
        CommandFrame::new(self.address, self.command, self.payload)
    }
}

/// Encode a signed value as four big-endian bytes
pub fn encode_i32_be(value: i32) -> [u8; 4] {
    let mut bytes = [0u8; 4];
    BigEndian::write_i32(&mut bytes, value);
    bytes
}

/// Reassemble a signed value from four big-endian bytes
pub fn decode_i32_be(bytes: [u8; 4]) -> i32 {
    BigEndian::read_i32(&bytes)
}

fn calculate_crc(address: u8, command: u8, payload: &[u8]) -> u16 {
    let mut body = Vec::with_capacity(HEADER_LEN + payload.len());
    body.push(address);
    body.push(command);
    body.extend_from_slice(payload);
    crc16(&body)
}
