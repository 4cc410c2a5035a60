//! # Pose Conversion
//!
//! Converts driver orientations into the application frame and back and
//! forth between quaternions and Euler angles.
//!
//! ## Frames
//!
//! The driver reports orientation in a right-handed frame with Z pointing
//! backwards. The application frame is left-handed with Z pointing forward.
//! A rotation is moved between the two by reflecting its matrix through the
//! Z axis: `R' = S·R·S` with `S = diag(1, 1, -1)`.
//!
//! ## Euler Angles
//!
//! Euler angles are in degrees, each wrapped to `[0, 360)`, and compose as
//! `Ry(y) · Rx(x) · Rz(z)` (roll about Z first, then pitch about X, then yaw
//! about Y). Yaw is therefore always the heading about the vertical axis,
//! which is what the recenter gesture offsets.

use nalgebra::{Matrix3, Quaternion, Rotation3, UnitQuaternion, Vector3};

/// Quaternions shorter than this cannot be normalized reliably.
const MIN_QUATERNION_NORM: f32 = 1.0e-6;

/// `|sin(pitch)|` above which the decomposition treats pitch as ±90°.
const GIMBAL_LOCK_THRESHOLD: f32 = 0.999_999;

/// Converts a raw right-handed driver orientation into the left-handed
/// application frame.
///
/// A degenerate (near zero) quaternion yields the identity rotation.
///
/// # Examples
///
/// ```
/// use daydream_bridge::controller::pose::right_handed_to_left_handed;
/// use nalgebra::{Quaternion, UnitQuaternion};
///
/// let raw = Quaternion::identity();
/// assert_eq!(right_handed_to_left_handed(&raw), UnitQuaternion::identity());
/// ```
#[must_use]
pub fn right_handed_to_left_handed(raw: &Quaternion<f32>) -> UnitQuaternion<f32> {
    let Some(rotation) = UnitQuaternion::try_new(*raw, MIN_QUATERNION_NORM) else {
        return UnitQuaternion::identity();
    };

    let flip_z = Matrix3::from_diagonal(&Vector3::new(1.0, 1.0, -1.0));
    let reflected = flip_z * rotation.to_rotation_matrix().into_inner() * flip_z;

    UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix_unchecked(reflected))
}

/// Extracts Euler angles (degrees, `[0, 360)`) from an orientation.
#[must_use]
pub fn euler_angles(orientation: &UnitQuaternion<f32>) -> Vector3<f32> {
    let m = orientation.to_rotation_matrix().into_inner();
    let sin_pitch = (-m[(1, 2)]).clamp(-1.0, 1.0);
    let pitch = sin_pitch.asin();

    let (yaw, roll) = if sin_pitch.abs() < GIMBAL_LOCK_THRESHOLD {
        (m[(0, 2)].atan2(m[(2, 2)]), m[(1, 0)].atan2(m[(1, 1)]))
    } else {
        // Yaw and roll share an axis; fold everything into yaw.
        ((-m[(2, 0)]).atan2(m[(0, 0)]), 0.0)
    };

    Vector3::new(
        wrap_degrees(pitch.to_degrees()),
        wrap_degrees(yaw.to_degrees()),
        wrap_degrees(roll.to_degrees()),
    )
}

/// Builds an orientation from Euler angles in degrees.
///
/// Angles outside `[0, 360)` are accepted.
///
/// # Examples
///
/// ```
/// use daydream_bridge::controller::pose::{euler_angles, from_euler_angles};
/// use nalgebra::Vector3;
///
/// let q = from_euler_angles(&Vector3::new(0.0, 90.0, 0.0));
/// assert!((euler_angles(&q).y - 90.0).abs() < 1e-3);
/// ```
#[must_use]
pub fn from_euler_angles(euler: &Vector3<f32>) -> UnitQuaternion<f32> {
    let pitch = UnitQuaternion::from_axis_angle(&Vector3::x_axis(), euler.x.to_radians());
    let yaw = UnitQuaternion::from_axis_angle(&Vector3::y_axis(), euler.y.to_radians());
    let roll = UnitQuaternion::from_axis_angle(&Vector3::z_axis(), euler.z.to_radians());

    yaw * pitch * roll
}

/// Wraps an angle in degrees into `[0, 360)`.
#[must_use]
pub fn wrap_degrees(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360.0 for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}
