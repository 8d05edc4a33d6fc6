//! Serial port handling
//!
//! Provides the byte-level transport used by [`ControllerSession`](super::ControllerSession).
//!
//! The session only needs two primitives, a single write and a single-byte
//! read, so they are expressed as the [`Transport`] trait. [`SerialTransport`]
//! is the implementation backed by a real serial device; tests install
//! in-memory fakes.

use serialport::SerialPort;
use std::io::{self, Read, Write};
use std::time::Duration;

use super::{ProtocolError, DEFAULT_ACK_TIMEOUT_MS};

/// Byte-level I/O with a controller
///
/// Closing is dropping: an implementation releases its handle in `Drop`.
pub trait Transport: Send {
    /// Write `buf` with a single write call, returning how many bytes were accepted
    fn write_bytes(&mut self, buf: &[u8]) -> io::Result<usize>;

    /// Read one byte, waiting at most `timeout`
    ///
    /// Returns `Ok(None)` when nothing arrived in time. A zero timeout polls once.
    fn read_byte(&mut self, timeout: Duration) -> io::Result<Option<u8>>;
}

/// Transport over an open serial device
pub struct SerialTransport {
    port: Box<dyn SerialPort>,
}

impl SerialTransport {
    /// Open `path`, configure it for packet serial and drop stale input
    pub fn open(path: &str, baud_rate: u32) -> Result<Self, ProtocolError> {
        let mut port = open_port(path, baud_rate)?;
        configure_port(port.as_mut())?;
        clear_input(port.as_mut())?;
        Ok(Self { port })
    }
}

impl Transport for SerialTransport {
    fn write_bytes(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.port.write(buf)
    }

    fn read_byte(&mut self, timeout: Duration) -> io::Result<Option<u8>> {
        if self.port.timeout() != timeout {
            self.port
                .set_timeout(timeout)
                .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;
        }

        let mut buf = [0u8; 1];
        match self.port.read(&mut buf) {
            Ok(0) => Ok(None),
            Ok(_) => Ok(Some(buf[0])),
            Err(ref e)
                if e.kind() == io::ErrorKind::TimedOut || e.kind() == io::ErrorKind::WouldBlock =>
            {
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }
}

/// Open a serial device for packet serial communication
///
/// The device is opened read/write without becoming the controlling terminal
/// and in raw mode; reads wait on `poll` up to the port timeout.
pub fn open_port(path: &str, baud_rate: u32) -> Result<Box<dyn SerialPort>, ProtocolError> {
    serialport::new(path, baud_rate)
        .timeout(Duration::from_millis(DEFAULT_ACK_TIMEOUT_MS))
        .open()
        .map_err(|e| ProtocolError::ConnectionFailed(format!("{}: {}", path, e)))
}

/// Configure a serial port as 8N1 with no flow control
pub fn configure_port(port: &mut dyn SerialPort) -> Result<(), ProtocolError> {
    port.set_data_bits(serialport::DataBits::Eight)?;
    port.set_parity(serialport::Parity::None)?;
    port.set_stop_bits(serialport::StopBits::One)?;
    port.set_flow_control(serialport::FlowControl::None)?;
    Ok(())
}

/// Discard any bytes received but not yet read
pub fn clear_input(port: &mut dyn SerialPort) -> Result<(), ProtocolError> {
    port.clear(serialport::ClearBuffer::Input)?;
    Ok(())
}
