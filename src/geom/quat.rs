//! Unit quaternion rotations.
//!
//! Components are stored as `(x, y, z, w)` with `w` the real part. Rotation
//! helpers assume unit length; [`Quat::normalized`] falls back to
//! [`Quat::IDENTITY`] when the input has (near) zero magnitude.
//!
//! Euler angles use the intrinsic Z-Y-X order (yaw about Z, then pitch about
//! Y, then roll about X). The vector stores roll in `x`, pitch in `y` and yaw
//! in `z`.

use std::fmt;
use std::ops::Mul;

use serde::{Deserialize, Serialize};

use super::core::{MACHINE_EPSILON, Vec3};

/// Dot products above this count as the same orientation in [`Quat::angle`].
pub const QUAT_DOT_IDENTITY: f64 = 0.999_999;

/// `|dot|` above this makes `sin(theta)` too small to divide by in slerp.
const SLERP_LINEAR_THRESHOLD: f64 = 1.0 - 1e-6;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quat {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub w: f64,
}

impl Quat {
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64, w: f64) -> Self {
        Self { x, y, z, w }
    }

    #[must_use]
    pub const fn from_array(arr: [f64; 4]) -> Self {
        Self::new(arr[0], arr[1], arr[2], arr[3])
    }

    #[must_use]
    pub const fn to_array(self) -> [f64; 4] {
        [self.x, self.y, self.z, self.w]
    }

    /// Rotation of `degrees` around `axis`. A zero axis yields the identity.
    #[must_use]
    pub fn from_axis_angle(axis: Vec3, degrees: f64) -> Self {
        let Some(axis) = axis.try_normalized() else {
            return Self::IDENTITY;
        };
        let (s, c) = (degrees.to_radians() * 0.5).sin_cos();
        Self::new(axis.x * s, axis.y * s, axis.z * s, c)
    }

    /// Axis and angle (degrees, in `[0, 360]`) of this rotation.
    /// Rotations too close to the identity report `(Vec3::X, 0.0)`.
    #[must_use]
    pub fn to_axis_angle(self) -> (Vec3, f64) {
        let q = self.normalized();
        let w = q.w.clamp(-1.0, 1.0);
        let s = (1.0 - w * w).sqrt();
        if s < 1e-9 {
            return (Vec3::X, 0.0);
        }
        let axis = Vec3::new(q.x / s, q.y / s, q.z / s);
        (axis, (2.0 * w.acos()).to_degrees())
    }

    /// Build a rotation from Euler angles in radians (`x` roll, `y` pitch,
    /// `z` yaw), composed as `yaw * pitch * roll`.
    #[must_use]
    pub fn from_euler_radians(euler: Vec3) -> Self {
        let (sr, cr) = (euler.x * 0.5).sin_cos();
        let (sp, cp) = (euler.y * 0.5).sin_cos();
        let (sy, cy) = (euler.z * 0.5).sin_cos();

        let roll = Self::new(sr, 0.0, 0.0, cr);
        let pitch = Self::new(0.0, sp, 0.0, cp);
        let yaw = Self::new(0.0, 0.0, sy, cy);

        yaw.mul_quat(pitch).mul_quat(roll)
    }

    #[must_use]
    pub fn from_euler_degrees(euler: Vec3) -> Self {
        Self::from_euler_radians(Vec3::new(
            euler.x.to_radians(),
            euler.y.to_radians(),
            euler.z.to_radians(),
        ))
    }

    /// Shorthand for [`Quat::from_euler_degrees`].
    #[must_use]
    pub fn euler(x_degrees: f64, y_degrees: f64, z_degrees: f64) -> Self {
        Self::from_euler_degrees(Vec3::new(x_degrees, y_degrees, z_degrees))
    }

    /// Inverse of [`Quat::from_euler_radians`]. At the gimbal-lock boundary
    /// the pitch saturates to `±π/2`.
    #[must_use]
    pub fn to_euler_radians(self) -> Vec3 {
        let q = self;

        let sinr_cosp = 2.0 * (q.w * q.x + q.y * q.z);
        let cosr_cosp = 1.0 - 2.0 * (q.x * q.x + q.y * q.y);
        let roll = sinr_cosp.atan2(cosr_cosp);

        let sinp = 2.0 * (q.w * q.y - q.z * q.x);
        let pitch = if sinp.abs() >= 1.0 {
            std::f64::consts::FRAC_PI_2.copysign(sinp)
        } else {
            sinp.asin()
        };

        let siny_cosp = 2.0 * (q.w * q.z + q.x * q.y);
        let cosy_cosp = 1.0 - 2.0 * (q.y * q.y + q.z * q.z);
        let yaw = siny_cosp.atan2(cosy_cosp);

        Vec3::new(roll, pitch, yaw)
    }

    #[must_use]
    pub fn to_euler_degrees(self) -> Vec3 {
        let r = self.to_euler_radians();
        Vec3::new(r.x.to_degrees(), r.y.to_degrees(), r.z.to_degrees())
    }

    /// Rotation whose local +Z points along `forward` and whose local +Y lies
    /// in the plane spanned by `forward` and `up`.
    ///
    /// A zero `forward` yields the identity. When `forward` is parallel to
    /// `up` another world axis stands in for `up`.
    #[must_use]
    pub fn look_rotation(forward: Vec3, up: Vec3) -> Self {
        let Some(f) = forward.try_normalized() else {
            return Self::IDENTITY;
        };
        let r = up
            .cross(f)
            .try_normalized()
            .or_else(|| Vec3::UP.cross(f).try_normalized())
            .unwrap_or_else(|| Vec3::RIGHT.cross(f).normalized());
        let u = f.cross(r);

        // Columns of the rotation matrix are r, u, f.
        let (m00, m01, m02) = (r.x, u.x, f.x);
        let (m10, m11, m12) = (r.y, u.y, f.y);
        let (m20, m21, m22) = (r.z, u.z, f.z);

        let trace = m00 + m11 + m22;
        let q = if trace > 0.0 {
            let s = (trace + 1.0).sqrt() * 2.0;
            Self::new((m21 - m12) / s, (m02 - m20) / s, (m10 - m01) / s, 0.25 * s)
        } else if m00 > m11 && m00 > m22 {
            let s = (1.0 + m00 - m11 - m22).sqrt() * 2.0;
            Self::new(0.25 * s, (m01 + m10) / s, (m02 + m20) / s, (m21 - m12) / s)
        } else if m11 > m22 {
            let s = (1.0 + m11 - m00 - m22).sqrt() * 2.0;
            Self::new((m01 + m10) / s, 0.25 * s, (m12 + m21) / s, (m02 - m20) / s)
        } else {
            let s = (1.0 + m22 - m00 - m11).sqrt() * 2.0;
            Self::new((m02 + m20) / s, (m12 + m21) / s, 0.25 * s, (m10 - m01) / s)
        };
        q.normalized()
    }

    /// [`Quat::look_rotation`] with `Vec3::UP` as the up hint.
    #[must_use]
    pub fn look_rotation_forward(forward: Vec3) -> Self {
        Self::look_rotation(forward, Vec3::UP)
    }

    #[must_use]
    pub const fn dot(self, rhs: Self) -> f64 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z + self.w * rhs.w
    }

    #[must_use]
    pub const fn length_squared(self) -> f64 {
        self.dot(self)
    }

    #[must_use]
    pub fn length(self) -> f64 {
        self.length_squared().sqrt()
    }

    #[must_use]
    pub fn normalized(self) -> Self {
        let len = self.length();
        if len < MACHINE_EPSILON {
            return Self::IDENTITY;
        }
        Self::new(self.x / len, self.y / len, self.z / len, self.w / len)
    }

    #[must_use]
    pub const fn conjugate(self) -> Self {
        Self::new(-self.x, -self.y, -self.z, self.w)
    }

    /// Inverse of a unit quaternion (the conjugate).
    #[must_use]
    pub const fn inverse(self) -> Self {
        self.conjugate()
    }

    /// Hamilton product `self * rhs`: applies `rhs` first, then `self`.
    #[must_use]
    pub const fn mul_quat(self, rhs: Self) -> Self {
        Self {
            w: self.w * rhs.w - self.x * rhs.x - self.y * rhs.y - self.z * rhs.z,
            x: self.w * rhs.x + self.x * rhs.w + self.y * rhs.z - self.z * rhs.y,
            y: self.w * rhs.y + self.y * rhs.w + self.z * rhs.x - self.x * rhs.z,
            z: self.w * rhs.z + self.z * rhs.w + self.x * rhs.y - self.y * rhs.x,
        }
    }

    /// Rotate `v`; equivalent to the imaginary part of `q * (v, 0) * q⁻¹`.
    #[must_use]
    pub fn rotate_vec3(self, v: Vec3) -> Vec3 {
        let x2 = self.x * 2.0;
        let y2 = self.y * 2.0;
        let z2 = self.z * 2.0;

        let xx = self.x * x2;
        let yy = self.y * y2;
        let zz = self.z * z2;
        let xy = self.x * y2;
        let xz = self.x * z2;
        let yz = self.y * z2;
        let wx = self.w * x2;
        let wy = self.w * y2;
        let wz = self.w * z2;

        Vec3::new(
            (1.0 - (yy + zz)) * v.x + (xy - wz) * v.y + (xz + wy) * v.z,
            (xy + wz) * v.x + (1.0 - (xx + zz)) * v.y + (yz - wx) * v.z,
            (xz - wy) * v.x + (yz + wx) * v.y + (1.0 - (xx + yy)) * v.z,
        )
    }

    /// Angle between two orientations in degrees.
    #[must_use]
    pub fn angle(self, other: Self) -> f64 {
        let dot = self.dot(other);
        if dot > QUAT_DOT_IDENTITY {
            return 0.0;
        }
        (dot.abs().min(1.0).acos() * 2.0).to_degrees()
    }

    /// Normalized linear blend with `t` clamped to `[0, 1]`.
    #[must_use]
    pub fn lerp(self, rhs: Self, t: f64) -> Self {
        self.lerp_unclamped(rhs, t.clamp(0.0, 1.0))
    }

    #[must_use]
    pub fn lerp_unclamped(self, rhs: Self, t: f64) -> Self {
        let s = 1.0 - t;
        Self::new(
            s * self.x + t * rhs.x,
            s * self.y + t * rhs.y,
            s * self.z + t * rhs.z,
            s * self.w + t * rhs.w,
        )
        .normalized()
    }

    /// Spherical interpolation with `t` clamped to `[0, 1]`.
    #[must_use]
    pub fn slerp(self, rhs: Self, t: f64) -> Self {
        self.slerp_unclamped(rhs, t.clamp(0.0, 1.0))
    }

    /// Spherical interpolation along the shorter arc.
    ///
    /// When `self.dot(rhs) < 0` the blend runs toward `-rhs`, which differs
    /// from the plain `acos(dot)` formula but ends at the same orientation.
    /// Nearly parallel inputs (where `sin(theta)` vanishes) fall back to
    /// normalized linear interpolation.
    #[must_use]
    pub fn slerp_unclamped(self, rhs: Self, t: f64) -> Self {
        let mut dot = self.dot(rhs);
        let mut rhs = rhs;
        if dot < 0.0 {
            dot = -dot;
            rhs = Self::new(-rhs.x, -rhs.y, -rhs.z, -rhs.w);
        }

        if dot > SLERP_LINEAR_THRESHOLD {
            return self.lerp_unclamped(rhs, t);
        }

        let theta = dot.clamp(-1.0, 1.0).acos();
        let sin_theta = theta.sin();
        let wa = ((1.0 - t) * theta).sin() / sin_theta;
        let wb = (t * theta).sin() / sin_theta;

        Self::new(
            wa * self.x + wb * rhs.x,
            wa * self.y + wb * rhs.y,
            wa * self.z + wb * rhs.z,
            wa * self.w + wb * rhs.w,
        )
        .normalized()
    }

    /// Step from `from` toward `to` by at most `max_degrees_delta`.
    #[must_use]
    pub fn rotate_towards(from: Self, to: Self, max_degrees_delta: f64) -> Self {
        let angle = from.angle(to);
        if angle == 0.0 {
            return to;
        }
        from.slerp_unclamped(to, (max_degrees_delta / angle).min(1.0))
    }
}

impl Default for Quat {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl fmt::Display for Quat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}, {})", self.x, self.y, self.z, self.w)
    }
}

impl Mul for Quat {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self::Output {
        self.mul_quat(rhs)
    }
}

impl Mul<Vec3> for Quat {
    type Output = Vec3;
    fn mul(self, rhs: Vec3) -> Self::Output {
        self.rotate_vec3(rhs)
    }
}
