//! # Daydream Controller Protocol Module
//!
//! Decoding of the Daydream controller's BLE notification packets.
//!
//! This module handles:
//! - Bit-level field extraction from the 20-byte notification
//! - Scaling orientation, acceleration, gyro and touch values
//! - Button bit decoding

pub mod protocol;
pub mod decoder;
