//! # Daydream Protocol Constants
//!
//! Layout of the Daydream controller BLE notification packet.
//!
//! Fields are packed MSB-first across the packet:
//!
//! | Bits | Field |
//! |------|-------|
//! | 0-8 | Timestamp |
//! | 9-13 | Sequence number |
//! | 14-52 | Orientation X/Y/Z (13-bit signed each, rotation vector) |
//! | 53-91 | Acceleration X/Y/Z (13-bit signed each) |
//! | 92-130 | Gyro X/Y/Z (13-bit signed each) |
//! | 131-138 | Touch X (8-bit) |
//! | 139-146 | Touch Y (8-bit) |
//! | 147-151 | Buttons (byte 18, low 5 bits) |

use std::f32::consts::PI;

/// Minimum notification packet size
pub const DAYDREAM_PACKET_SIZE: usize = 20;

/// Timestamp field: bit offset and width
pub const TIMESTAMP_OFFSET: usize = 0;
pub const TIMESTAMP_BITS: usize = 9;

/// Sequence field: bit offset and width
pub const SEQUENCE_OFFSET: usize = 9;
pub const SEQUENCE_BITS: usize = 5;

/// Width of each signed motion field
pub const MOTION_FIELD_BITS: usize = 13;

/// First bit of the orientation X/Y/Z fields
pub const ORIENTATION_OFFSET: usize = 14;
/// First bit of the acceleration X/Y/Z fields
pub const ACCEL_OFFSET: usize = 53;
/// First bit of the gyro X/Y/Z fields
pub const GYRO_OFFSET: usize = 92;

/// Touch fields: bit offsets and width
pub const TOUCH_X_OFFSET: usize = 131;
pub const TOUCH_Y_OFFSET: usize = 139;
pub const TOUCH_BITS: usize = 8;

/// Byte holding the button bits
pub const BUTTON_BYTE: usize = 18;

/// Button bit masks within [`BUTTON_BYTE`]
pub const BUTTON_CLICK: u8 = 0x01;
pub const BUTTON_HOME: u8 = 0x02;
pub const BUTTON_APP: u8 = 0x04;
pub const BUTTON_VOLUME_MINUS: u8 = 0x08;
pub const BUTTON_VOLUME_PLUS: u8 = 0x10;

/// Largest magnitude of a 13-bit motion field
pub const MOTION_FIELD_RANGE: f32 = 4095.0;

/// Orientation scale: raw units to radians (rotation vector)
pub const ORIENTATION_SCALE: f32 = 2.0 * PI / MOTION_FIELD_RANGE;

/// Acceleration scale: raw units to m/s² (±8 g)
pub const ACCEL_SCALE: f32 = 8.0 * 9.8 / MOTION_FIELD_RANGE;

/// Gyro scale: raw units to rad/s (±2048 °/s)
pub const GYRO_SCALE: f32 = 2048.0 / 180.0 * PI / MOTION_FIELD_RANGE;

/// Touch scale: raw units to 0.0-1.0
pub const TOUCH_SCALE: f32 = 1.0 / 255.0;

/// Header fields of a notification packet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketHeader {
    /// Controller-side timestamp (wraps at 512)
    pub timestamp: u16,

    /// Packet sequence number (wraps at 32)
    pub sequence: u8,
}
