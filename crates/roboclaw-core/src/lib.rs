//! # RoboClaw Core Library
//!
//! Host-side driver for RoboClaw dual-motor speed controllers.

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

//!
//! This library provides:
//! - Packet serial framing with the controller's CRC16 checksum
//! - A serial transport configured for raw 8N1 communication
//! - A session type issuing commands and checking the single-byte acknowledgment
//!
//! ## Example
//!
//! ```rust,no_run
//! use roboclaw_core::protocol::{ControllerSession, SessionConfig};
//!
//! let mut session = ControllerSession::new(SessionConfig::default());
//! session.connect("/dev/ttyACM0")?;
//!
//! // Forward, then brake
//! session.drive(1500, 1500)?;
//! session.stop()?;
//!
//! session.disconnect();
//! # Ok::<(), roboclaw_core::protocol::ProtocolError>(())
//! ```

pub mod protocol;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::protocol::{
        CommandResult, ControllerSession, ProtocolError, SessionConfig, SessionState, Transport,
    };
}

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
