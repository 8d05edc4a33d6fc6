//! CRC16 checksum used by packet serial mode
//!
//! RoboClaw uses CRC16-CCITT with polynomial 0x1021, a zero seed, MSB-first
//! processing and no final XOR. That is the catalogued CRC-16/XMODEM.

use crc::{Crc, CRC_16_XMODEM};

const CRC_XMODEM: Crc<u16> = Crc::<u16>::new(&CRC_16_XMODEM);

/// Calculate the checksum the controller expects over `data`
pub fn crc16(data: &[u8]) -> u16 {
    CRC_XMODEM.checksum(data)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Bitwise reference, one byte at a time
    fn crc16_reference(data: &[u8]) -> u16 {
        let mut crc: u16 = 0;
        for &b in data {
            crc ^= (b as u16) << 8;
            for _ in 0..8 {
                if crc & 0x8000 != 0 {
                    crc = (crc << 1) ^ 0x1021;
                } else {
                    crc <<= 1;
                }
            }
        }
        crc
    }

    #[test]
    fn test_check_value() {
        assert_eq!(crc16(b"123456789"), 0x31C3);
    }

    #[test]
    fn test_drive_vector() {
        assert_eq!(crc16(&[0x80, 37, 0, 0, 0, 100, 0, 0, 0, 0]), 0xA4DE);
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(crc16(&[]), 0);
    }

    #[test]
    fn test_deterministic() {
        let data = [0x80, 37, 0x00, 0x00, 0x03, 0xE8, 0xFF, 0xFF, 0xFC, 0x18];
        assert_eq!(crc16(&data), crc16(&data));
        assert_eq!(crc16(&data), 0x8290);
    }

    #[test]
    fn test_order_sensitive() {
        assert_eq!(crc16(&[0x80, 37]), 0x6F5F);
        assert_eq!(crc16(&[37, 0x80]), 0x689B);
    }

    #[test]
    fn test_matches_bitwise_reference() {
        let data: Vec<u8> = (0..=255u8).collect();
        for len in [1, 2, 7, 12, 64, 256] {
            assert_eq!(crc16(&data[..len]), crc16_reference(&data[..len]));
        }
    }
}
