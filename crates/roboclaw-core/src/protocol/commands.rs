//! Protocol commands
//!
//! Defines the packet serial commands this driver issues.

use serde::{Deserialize, Serialize};

use super::{CommandFrame, FrameBuilder};

/// Packet serial commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Drive M1 and M2 with signed speeds in quadrature pulses per second (37)
    ///
    /// Send: `[address, 37, speed_m1(4), speed_m2(4), crc(2)]`, receive: `[0xFF]`.
    /// The sign selects the direction. Requires motor encoders.
    DriveMixedSpeed,
}

impl Command {
    /// Get the command code byte
    pub fn code(&self) -> u8 {
        match self {
            Command::DriveMixedSpeed => 37,
        }
    }
}

/// Parameters for [`Command::DriveMixedSpeed`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MixedSpeedParams {
    /// Motor 1 speed, forwarded as-is
    pub speed_m1: i32,
    /// Motor 2 speed, forwarded as-is
    pub speed_m2: i32,
}

impl MixedSpeedParams {
    /// Parameters for the given motor speeds
    pub fn new(speed_m1: i32, speed_m2: i32) -> Self {
        Self { speed_m1, speed_m2 }
    }

    /// Both motors at zero, which brakes them
    pub fn stop() -> Self {
        Self::default()
    }

    /// Build the frame for a unit at `address`
    pub fn to_frame(&self, address: u8) -> CommandFrame {
        FrameBuilder::new(address, Command::DriveMixedSpeed.code())
            .i32_be(self.speed_m1)
            .i32_be(self.speed_m2)
            .build()
    }
}
