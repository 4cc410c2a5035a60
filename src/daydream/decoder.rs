//! # Daydream Packet Decoder
//!
//! Decodes BLE notification packets into [`RawControllerSnapshot`]s.

use nalgebra::{UnitQuaternion, Vector2, Vector3};

use super::protocol::*;
use crate::controller::state::{RawControllerSnapshot, RAW_CONNECTED};
use crate::error::{BridgeError, Result};

/// Reads `bits` bits (MSB-first) starting at bit `offset`.
fn read_bits(data: &[u8], offset: usize, bits: usize) -> u32 {
    (offset..offset + bits).fold(0u32, |acc, bit| {
        let byte = data[bit / 8];
        let value = (byte >> (7 - bit % 8)) & 1;
        (acc << 1) | u32::from(value)
    })
}

/// Reads a 13-bit two's-complement field.
fn read_signed(data: &[u8], offset: usize) -> i32 {
    let raw = read_bits(data, offset, MOTION_FIELD_BITS);
    ((raw << (32 - MOTION_FIELD_BITS)) as i32) >> (32 - MOTION_FIELD_BITS)
}

/// Reads three consecutive 13-bit signed fields and scales them.
fn read_vector(data: &[u8], offset: usize, scale: f32) -> Vector3<f32> {
    Vector3::new(
        read_signed(data, offset) as f32 * scale,
        read_signed(data, offset + MOTION_FIELD_BITS) as f32 * scale,
        read_signed(data, offset + 2 * MOTION_FIELD_BITS) as f32 * scale,
    )
}

fn check_length(data: &[u8]) -> Result<()> {
    if data.len() < DAYDREAM_PACKET_SIZE {
        return Err(BridgeError::Packet(format!(
            "Packet too short: expected {} bytes, got {}",
            DAYDREAM_PACKET_SIZE,
            data.len()
        )));
    }
    Ok(())
}

/// Decode the timestamp and sequence number of a packet
///
/// # Errors
///
/// Returns error if the packet is shorter than [`DAYDREAM_PACKET_SIZE`].
pub fn decode_header(data: &[u8]) -> Result<PacketHeader> {
    check_length(data)?;

    Ok(PacketHeader {
        timestamp: read_bits(data, TIMESTAMP_OFFSET, TIMESTAMP_BITS) as u16,
        sequence: read_bits(data, SEQUENCE_OFFSET, SEQUENCE_BITS) as u8,
    })
}

/// Decode a notification packet on top of the previous snapshot
///
/// Motion, touch and button fields come from the packet. Battery fields
/// are not part of the notification and carry over from `previous`.
/// A decoded packet always means the controller is connected.
///
/// # Arguments
///
/// * `data` - Notification payload (at least 20 bytes)
/// * `previous` - Snapshot produced by the previous packet
///
/// # Errors
///
/// Returns error if the packet is shorter than [`DAYDREAM_PACKET_SIZE`].
///
/// # Examples
///
/// ```
/// use daydream_bridge::controller::state::RawControllerSnapshot;
/// use daydream_bridge::daydream::decoder::decode_packet;
///
/// let mut packet = [0u8; 20];
/// packet[18] = 0x02; // home
///
/// let snapshot = decode_packet(&packet, &RawControllerSnapshot::default())?;
/// assert!(snapshot.home_button_state);
/// # Ok::<(), daydream_bridge::error::BridgeError>(())
/// ```
pub fn decode_packet(data: &[u8], previous: &RawControllerSnapshot) -> Result<RawControllerSnapshot> {
    check_length(data)?;

    let rotation_vector = read_vector(data, ORIENTATION_OFFSET, ORIENTATION_SCALE);
    let orientation = UnitQuaternion::from_scaled_axis(rotation_vector).into_inner();

    let touch_pos = Vector2::new(
        read_bits(data, TOUCH_X_OFFSET, TOUCH_BITS) as f32 * TOUCH_SCALE,
        read_bits(data, TOUCH_Y_OFFSET, TOUCH_BITS) as f32 * TOUCH_SCALE,
    );

    let buttons = data[BUTTON_BYTE];

    Ok(RawControllerSnapshot {
        connection_state: RAW_CONNECTED,
        orientation,
        accel: read_vector(data, ACCEL_OFFSET, ACCEL_SCALE),
        gyro: read_vector(data, GYRO_OFFSET, GYRO_SCALE),
        touch_pos,
        is_touching: touch_pos.x > 0.0 || touch_pos.y > 0.0,
        app_button_state: buttons & BUTTON_APP != 0,
        home_button_state: buttons & BUTTON_HOME != 0,
        click_button_state: buttons & BUTTON_CLICK != 0,
        plus_button_state: buttons & BUTTON_VOLUME_PLUS != 0,
        minus_button_state: buttons & BUTTON_VOLUME_MINUS != 0,
        supports_battery_status: previous.supports_battery_status,
        battery_level_percentage: previous.battery_level_percentage,
    })
}

#[cfg(test)]
pub(crate) mod test_packets {
    use super::*;

    /// Writes `bits` bits of `value` (MSB-first) starting at bit `offset`.
    pub fn write_bits(packet: &mut [u8], offset: usize, bits: usize, value: u32) {
        for i in 0..bits {
            let bit = offset + i;
            let set = (value >> (bits - 1 - i)) & 1 == 1;
            let mask = 1u8 << (7 - bit % 8);
            if set {
                packet[bit / 8] |= mask;
            } else {
                packet[bit / 8] &= !mask;
            }
        }
    }

    /// Writes a 13-bit signed value.
    pub fn write_signed(packet: &mut [u8], offset: usize, value: i32) {
        write_bits(packet, offset, MOTION_FIELD_BITS, (value as u32) & 0x1FFF);
    }

    /// Builds a packet with the given sequence number and button byte.
    pub fn packet(sequence: u8, buttons: u8) -> Vec<u8> {
        let mut data = vec![0u8; DAYDREAM_PACKET_SIZE];
        write_bits(&mut data, SEQUENCE_OFFSET, SEQUENCE_BITS, u32::from(sequence));
        data[BUTTON_BYTE] |= buttons;
        data
    }
}
