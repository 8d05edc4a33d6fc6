//! RoboClaw Drive Demo
//!
//! Connects to a RoboClaw, drives both motors forward then in reverse,
//! brakes and disconnects. Requires motor encoders.
//!
//! Usage:
//!   cargo run --example drive_demo -- [OPTIONS] [PORT]
//!
//! Options:
//!   --port PORT       Serial port (default: /dev/ttyACM0)
//!   --baud RATE       Baud rate (default: 115200)
//!   --address ADDR    Unit address, decimal or 0x-prefixed hex (default: 0x80)
//!   --speed QPPS      Drive speed in encoder pulses per second (default: 1500)
//!   --hold MS         Time to hold each speed in ms (default: 5000)
//!
//! Set RUST_LOG=debug to see every frame on the wire.

use anyhow::{Context, Result};
use roboclaw_core::protocol::{
    ControllerSession, SessionConfig, DEFAULT_ADDRESS, DEFAULT_BAUD_RATE,
};
use std::time::Duration;
use tracing_subscriber::EnvFilter;

fn parse_address(s: &str) -> Option<u8> {
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => u8::from_str_radix(hex, 16).ok(),
        None => s.parse().ok(),
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args: Vec<String> = std::env::args().collect();

    let mut port_name = "/dev/ttyACM0".to_string();
    let mut config = SessionConfig::default();
    let mut speed = 1500i32;
    let mut hold_ms = 5000u64;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--port" | "-p" => {
                i += 1;
                if i < args.len() {
                    port_name = args[i].clone();
                }
            }
            "--baud" | "-b" => {
                i += 1;
                if i < args.len() {
                    config.baud_rate = args[i].parse().unwrap_or(DEFAULT_BAUD_RATE);
                }
            }
            "--address" | "-a" => {
                i += 1;
                if i < args.len() {
                    config.address = parse_address(&args[i]).unwrap_or(DEFAULT_ADDRESS);
                }
            }
            "--speed" | "-s" => {
                i += 1;
                if i < args.len() {
                    speed = args[i].parse().unwrap_or(1500);
                }
            }
            "--hold" => {
                i += 1;
                if i < args.len() {
                    hold_ms = args[i].parse().unwrap_or(5000);
                }
            }
            "--help" | "-h" => {
                print_help();
                return Ok(());
            }
            arg if !arg.starts_with('-') => {
                port_name = arg.to_string();
            }
            _ => {
                eprintln!("Unknown option: {}", args[i]);
            }
        }
        i += 1;
    }

    println!("Configuration:");
    println!("  Port:      {}", port_name);
    println!("  Baud rate: {}", config.baud_rate);
    println!("  Address:   {:#04x}", config.address);
    println!("  Speed:     {}", speed);
    println!();

    let mut session = ControllerSession::new(config);
    session
        .connect(&port_name)
        .with_context(|| format!("connecting to {}", port_name))?;

    let hold = Duration::from_millis(hold_ms);
    let reverse = speed.saturating_neg();
    for (label, m1, m2) in [("forward", speed, speed), ("reverse", reverse, reverse)] {
        match session.drive(m1, m2) {
            Ok(()) => println!("✓ {}", label),
            Err(e) => println!("❌ {}: {}", label, e),
        }
        std::thread::sleep(hold);
    }

    match session.stop() {
        Ok(()) => println!("✓ stop"),
        Err(e) => println!("❌ stop: {}", e),
    }

    std::thread::sleep(Duration::from_secs(1));
    session.disconnect();

    let (sent, acked, failed) = session.get_counters();
    println!();
    println!("Frames sent: {}, acknowledged: {}, failed: {}", sent, acked, failed);
    Ok(())
}

fn print_help() {
    println!("RoboClaw Drive Demo");
    println!();
    println!("Usage: drive_demo [OPTIONS] [PORT]");
    println!();
    println!("Options:");
    println!("  -p, --port PORT      Serial port (default: /dev/ttyACM0)");
    println!("  -b, --baud RATE      Baud rate (default: 115200)");
    println!("  -a, --address ADDR   Unit address (default: 0x80)");
    println!("  -s, --speed QPPS     Drive speed (default: 1500)");
    println!("      --hold MS        Time per step in ms (default: 5000)");
    println!("  -h, --help           Show this help");
}
