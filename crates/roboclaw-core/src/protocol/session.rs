//! Connection management
//!
//! Handles the session lifecycle and the send-and-acknowledge exchange with
//! one controller unit.
//!
//! The wire protocol is strict request/response with no pipelining: a frame
//! is written, then exactly one acknowledgment byte is read before the next
//! frame may go out. Every I/O method takes `&mut self`, so a session can
//! never have two commands in flight. Share a session across threads only
//! behind a lock, and use one session per physical unit.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{
    commands::MixedSpeedParams, CommandFrame, ProtocolError, SerialTransport, Transport, ACK,
    DEFAULT_ACK_TIMEOUT_MS, DEFAULT_ADDRESS, DEFAULT_BAUD_RATE,
};

/// Outcome of a single command
pub type CommandResult = Result<(), ProtocolError>;

/// Session state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    /// Never connected
    Uninitialized,
    /// Connected and ready for commands
    Connected,
    /// Handle released after a previous connection
    Disconnected,
}

/// Session configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Unit address on the bus
    pub address: u8,
    /// Baud rate
    pub baud_rate: u32,
    /// How long to wait for the acknowledgment byte; 0 polls once
    pub ack_timeout_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS,
            baud_rate: DEFAULT_BAUD_RATE,
            ack_timeout_ms: DEFAULT_ACK_TIMEOUT_MS,
        }
    }
}

/// One logical connection to one controller unit
pub struct ControllerSession {
    /// Transport handle, present only while connected
    transport: Option<Box<dyn Transport>>,
    /// Current state
    state: SessionState,
    /// Session configuration
    config: SessionConfig,
    /// Device path given to the last `connect`
    device_path: Option<String>,
    /// Metrics: frames written, acknowledged and rejected
    tx_frames: u64,
    acked_frames: u64,
    failed_frames: u64,
}

impl ControllerSession {
    /// Create a new session (not yet connected)
    pub fn new(config: SessionConfig) -> Self {
        Self {
            transport: None,
            state: SessionState::Uninitialized,
            config,
            device_path: None,
            tx_frames: 0,
            acked_frames: 0,
            failed_frames: 0,
        }
    }

    /// Create a session for `address` at `baud_rate` with the default ack timeout
    pub fn with_address(address: u8, baud_rate: u32) -> Self {
        Self::new(SessionConfig {
            address,
            baud_rate,
            ..SessionConfig::default()
        })
    }

    /// Get the unit address
    pub fn address(&self) -> u8 {
        self.config.address
    }

    /// Get the configured baud rate
    pub fn baud_rate(&self) -> u32 {
        self.config.baud_rate
    }

    /// Get the session configuration
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Get the device path of the current or last serial connection
    ///
    /// `None` before the first `connect` and after `attach`, which has no path.
    pub fn device_path(&self) -> Option<&str> {
        self.device_path.as_deref()
    }

    /// Get current session state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Check whether commands may be sent
    pub fn is_connected(&self) -> bool {
        self.state == SessionState::Connected && self.transport.is_some()
    }

    /// Get cumulative (sent, acknowledged, failed) frame counters
    pub fn get_counters(&self) -> (u64, u64, u64) {
        (self.tx_frames, self.acked_frames, self.failed_frames)
    }

    /// Set the acknowledgment wait; takes effect on the next command
    pub fn set_ack_timeout(&mut self, timeout: Duration) {
        self.config.ack_timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
    }

    fn ack_timeout(&self) -> Duration {
        Duration::from_millis(self.config.ack_timeout_ms)
    }

    /// Open and configure the serial device at `path`
    ///
    /// On failure no handle is installed and the state is left unchanged.
    pub fn connect(&mut self, path: &str) -> Result<(), ProtocolError> {
        if self.is_connected() {
            return Err(ProtocolError::AlreadyConnected);
        }

        info!(
            path,
            address = self.config.address,
            baud = self.config.baud_rate,
            "connecting to controller"
        );

        let transport = match SerialTransport::open(path, self.config.baud_rate) {
            Ok(t) => t,
            Err(e) => {
                warn!(path, error = %e, "failed to connect");
                return Err(e);
            }
        };

        self.install(Box::new(transport), Some(path.to_string()));
        info!(path, "connected");
        Ok(())
    }

    /// Use an already open transport instead of a serial device
    pub fn attach(&mut self, transport: Box<dyn Transport>) -> Result<(), ProtocolError> {
        if self.is_connected() {
            return Err(ProtocolError::AlreadyConnected);
        }
        self.install(transport, None);
        debug!("transport attached");
        Ok(())
    }

    fn install(&mut self, transport: Box<dyn Transport>, path: Option<String>) {
        self.transport = Some(transport);
        self.device_path = path;
        self.state = SessionState::Connected;
    }

    /// Release the handle; a no-op when nothing is open
    pub fn disconnect(&mut self) {
        if self.transport.take().is_some() {
            info!(path = self.device_path.as_deref(), "disconnected");
            self.state = SessionState::Disconnected;
        }
    }

    /// Drive M1 and M2 with signed speeds
    ///
    /// Speeds are forwarded unchanged; the controller decides what is valid.
    pub fn drive(&mut self, speed_m1: i32, speed_m2: i32) -> CommandResult {
        self.send_frame(&MixedSpeedParams::new(speed_m1, speed_m2).to_frame(self.config.address))
    }

    /// Stop both motors (drive at zero speed, which brakes)
    pub fn stop(&mut self) -> CommandResult {
        self.send_frame(&MixedSpeedParams::stop().to_frame(self.config.address))
    }

    /// Send `command` with `payload` to this unit and wait for the acknowledgment
    pub fn send_command(&mut self, command: u8, payload: &[u8]) -> CommandResult {
        self.send_frame(&CommandFrame::new(
            self.config.address,
            command,
            payload.to_vec(),
        ))
    }

    /// Write one frame and read the single acknowledgment byte
    fn send_frame(&mut self, frame: &CommandFrame) -> CommandResult {
        let timeout = self.ack_timeout();
        let transport = self
            .transport
            .as_mut()
            .ok_or(ProtocolError::NotConnected)?;

        let bytes = frame.to_bytes();
        debug!(
            command = frame.command(),
            len = bytes.len(),
            "sending frame {:02x?}",
            bytes
        );

        self.tx_frames = self.tx_frames.saturating_add(1);
        let result = exchange(&mut **transport, &bytes, timeout);

        match &result {
            Ok(()) => {
                self.acked_frames = self.acked_frames.saturating_add(1);
                debug!(command = frame.command(), "acknowledged");
            }
            Err(e) => {
                self.failed_frames = self.failed_frames.saturating_add(1);
                warn!(command = frame.command(), error = %e, "command failed");
            }
        }

        result
    }
}

/// Write `bytes` in one call, then expect exactly [`ACK`]
fn exchange(transport: &mut dyn Transport, bytes: &[u8], timeout: Duration) -> CommandResult {
    let written = transport.write_bytes(bytes)?;
    if written != bytes.len() {
        return Err(ProtocolError::ShortWrite {
            written,
            expected: bytes.len(),
        });
    }

    match transport.read_byte(timeout)? {
        Some(ACK) => Ok(()),
        Some(other) => Err(ProtocolError::Rejected(other)),
        None => Err(ProtocolError::NoAcknowledgment),
    }
}

impl Default for ControllerSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl Drop for ControllerSession {
    fn drop(&mut self) {
        self.disconnect();
    }
}
