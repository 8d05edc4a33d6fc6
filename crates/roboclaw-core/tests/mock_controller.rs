//! End-to-end exchange against a simulated controller that checks every frame.

use roboclaw_core::protocol::{
    CommandFrame, ControllerSession, ProtocolError, SessionConfig, Transport, ACK,
};
use std::collections::VecDeque;
use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Simulated controller: answers `0xFF` to any well-formed 12-byte frame for
/// its address and `0x00` to anything else
struct MockController {
    address: u8,
    pending: VecDeque<u8>,
    received: Arc<Mutex<Vec<CommandFrame>>>,
}

impl MockController {
    fn new(address: u8) -> (Self, Arc<Mutex<Vec<CommandFrame>>>) {
        let received = Arc::new(Mutex::new(Vec::new()));
        let controller = Self {
            address,
            pending: VecDeque::new(),
            received: Arc::clone(&received),
        };
        (controller, received)
    }
}

impl Transport for MockController {
    fn write_bytes(&mut self, buf: &[u8]) -> io::Result<usize> {
        let reply = match CommandFrame::from_bytes(buf) {
            Ok(frame) if buf.len() == 12 && frame.address() == self.address => {
                self.received.lock().unwrap().push(frame);
                ACK
            }
            _ => 0x00,
        };
        self.pending.push_back(reply);
        Ok(buf.len())
    }

    fn read_byte(&mut self, _timeout: Duration) -> io::Result<Option<u8>> {
        Ok(self.pending.pop_front())
    }
}

/// Flips one bit of the next written frame before it reaches the controller
struct BitFlip<T> {
    inner: T,
    byte: usize,
    armed: bool,
}

impl<T: Transport> Transport for BitFlip<T> {
    fn write_bytes(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.armed && self.byte < buf.len() {
            self.armed = false;
            let mut corrupted = buf.to_vec();
            corrupted[self.byte] ^= 0x01;
            return self.inner.write_bytes(&corrupted);
        }
        self.inner.write_bytes(buf)
    }

    fn read_byte(&mut self, timeout: Duration) -> io::Result<Option<u8>> {
        self.inner.read_byte(timeout)
    }
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

#[test]
fn test_drive_acknowledged_by_controller() {
    init_tracing();
    let (controller, received) = MockController::new(0x80);
    let mut session = ControllerSession::with_address(0x80, 115200);
    session.attach(Box::new(controller)).unwrap();

    assert!(session.drive(1000, -1000).is_ok());

    let received = received.lock().unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].command(), 37);
    assert_eq!(
        received[0].payload().to_vec(),
        vec![0x00, 0x00, 0x03, 0xE8, 0xFF, 0xFF, 0xFC, 0x18]
    );
}

#[test]
fn test_corrupted_payload_rejected() {
    init_tracing();
    let (controller, received) = MockController::new(0x80);
    let mut session = ControllerSession::new(SessionConfig::default());
    session
        .attach(Box::new(BitFlip {
            inner: controller,
            byte: 5,
            armed: true,
        }))
        .unwrap();

    assert!(matches!(
        session.drive(1000, -1000),
        Err(ProtocolError::Rejected(0x00))
    ));
    assert!(received.lock().unwrap().is_empty());

    // Only the first frame was corrupted
    assert!(session.drive(1000, -1000).is_ok());
    assert_eq!(received.lock().unwrap().len(), 1);
}

#[test]
fn test_other_unit_address_ignored() {
    init_tracing();
    let (controller, _received) = MockController::new(0x81);
    let mut session = ControllerSession::default();
    session.attach(Box::new(controller)).unwrap();

    assert!(session.drive(1, 1).is_err());
}

#[test]
fn test_forward_reverse_stop_sequence() {
    init_tracing();
    let (controller, received) = MockController::new(0x80);
    let mut session = ControllerSession::default();
    session.attach(Box::new(controller)).unwrap();

    session.drive(1500, 1500).unwrap();
    session.drive(-1500, -1500).unwrap();
    session.stop().unwrap();
    session.disconnect();

    let payloads: Vec<Vec<u8>> = received
        .lock()
        .unwrap()
        .iter()
        .map(|f| f.payload().to_vec())
        .collect();
    assert_eq!(
        payloads,
        vec![
            vec![0, 0, 0x05, 0xDC, 0, 0, 0x05, 0xDC],
            vec![0xFF, 0xFF, 0xFA, 0x24, 0xFF, 0xFF, 0xFA, 0x24],
            vec![0; 8],
        ]
    );
    assert_eq!(session.get_counters(), (3, 3, 0));
}
