use std::fmt;
use std::ops::{Add, Div, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

/// Threshold below which a vector length counts as zero, also used for
/// approximate vector equality.
pub const VEC_EPSILON: f64 = 1e-5;

/// Smallest meaningful magnitude for projection and quaternion normalization guards.
pub const MACHINE_EPSILON: f64 = f64::EPSILON;

const RAD_TO_DEG: f64 = 180.0 / std::f64::consts::PI;

// ─────────────────────────────────────────────────────────────────────────────
// Vec3
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    /// Zero vector.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    pub const ONE: Self = Self::new(1.0, 1.0, 1.0);
    /// Unit vector along the X axis.
    pub const X: Self = Self::new(1.0, 0.0, 0.0);
    /// Unit vector along the Y axis.
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);
    /// Unit vector along the Z axis.
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);

    pub const FORWARD: Self = Self::new(0.0, 0.0, 1.0);
    pub const BACK: Self = Self::new(0.0, 0.0, -1.0);
    pub const RIGHT: Self = Self::new(1.0, 0.0, 0.0);
    pub const LEFT: Self = Self::new(-1.0, 0.0, 0.0);
    pub const UP: Self = Self::new(0.0, 1.0, 0.0);
    pub const DOWN: Self = Self::new(0.0, -1.0, 0.0);

    pub const POSITIVE_INFINITY: Self = Self::new(f64::INFINITY, f64::INFINITY, f64::INFINITY);
    pub const NEGATIVE_INFINITY: Self =
        Self::new(f64::NEG_INFINITY, f64::NEG_INFINITY, f64::NEG_INFINITY);

    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Create a Vec3 from an array.
    #[must_use]
    pub const fn from_array(arr: [f64; 3]) -> Self {
        Self::new(arr[0], arr[1], arr[2])
    }

    /// Convert to an array.
    #[must_use]
    pub const fn to_array(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    #[must_use]
    pub const fn dot(self, rhs: Self) -> f64 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    /// Right-handed cross product.
    #[must_use]
    pub const fn cross(self, rhs: Self) -> Self {
        Self {
            x: self.y * rhs.z - self.z * rhs.y,
            y: self.z * rhs.x - self.x * rhs.z,
            z: self.x * rhs.y - self.y * rhs.x,
        }
    }

    #[must_use]
    pub fn length(self) -> f64 {
        self.dot(self).sqrt()
    }

    #[must_use]
    pub const fn length_squared(self) -> f64 {
        self.dot(self)
    }

    /// Unit vector in the same direction, or [`Vec3::ZERO`] when the length
    /// does not exceed [`VEC_EPSILON`].
    #[must_use]
    pub fn normalized(self) -> Self {
        let len = self.length();
        if len > VEC_EPSILON {
            self.div_scalar(len)
        } else {
            Self::ZERO
        }
    }

    /// Like [`Vec3::normalized`] but reports degenerate input as `None`.
    #[must_use]
    pub fn try_normalized(self) -> Option<Self> {
        let len = self.length();
        (len > VEC_EPSILON).then(|| self.div_scalar(len))
    }

    #[must_use]
    pub fn distance(self, other: Self) -> f64 {
        self.sub(other).length()
    }

    #[must_use]
    pub const fn distance_squared(self, other: Self) -> f64 {
        self.sub(other).length_squared()
    }

    /// Unsigned angle between two vectors in degrees. Returns 0 when either
    /// vector is (nearly) zero length.
    #[must_use]
    pub fn angle(self, other: Self) -> f64 {
        let denom = (self.length_squared() * other.length_squared()).sqrt();
        if denom < VEC_EPSILON {
            return 0.0;
        }
        let cos = (self.dot(other) / denom).clamp(-1.0, 1.0);
        cos.acos() * RAD_TO_DEG
    }

    /// Linear interpolation with `t` clamped to `[0, 1]`.
    #[must_use]
    pub fn lerp(self, rhs: Self, t: f64) -> Self {
        self.lerp_unclamped(rhs, t.clamp(0.0, 1.0))
    }

    /// Linear interpolation; `t` outside `[0, 1]` extrapolates.
    /// Returns `self * (1 - t) + rhs * t`.
    #[must_use]
    pub fn lerp_unclamped(self, rhs: Self, t: f64) -> Self {
        Self::new(
            self.x + (rhs.x - self.x) * t,
            self.y + (rhs.y - self.y) * t,
            self.z + (rhs.z - self.z) * t,
        )
    }

    /// Projection of `self` onto `onto`. A target shorter than machine
    /// epsilon projects everything to zero.
    #[must_use]
    pub fn project(self, onto: Self) -> Self {
        let denom = onto.dot(onto);
        if denom < MACHINE_EPSILON {
            return Self::ZERO;
        }
        onto.mul_scalar(self.dot(onto) / denom)
    }

    /// Reflect a direction off the plane defined by `normal`.
    /// `normal` is expected to be unit length; it is not normalized here.
    #[must_use]
    pub fn reflect(self, normal: Self) -> Self {
        let k = -2.0 * normal.dot(self);
        normal.mul_scalar(k).add(self)
    }

    /// Rescale to `max_length` when longer than it, otherwise unchanged.
    #[must_use]
    pub fn clamp_length(self, max_length: f64) -> Self {
        let sq = self.length_squared();
        if sq > max_length * max_length {
            self.div_scalar(sq.sqrt()).mul_scalar(max_length)
        } else {
            self
        }
    }

    /// Approximate equality: squared distance below `VEC_EPSILON²`.
    #[must_use]
    pub fn approx_eq(self, other: Self) -> bool {
        self.distance_squared(other) < VEC_EPSILON * VEC_EPSILON
    }

    #[must_use]
    pub const fn mul_scalar(self, s: f64) -> Self {
        Self::new(self.x * s, self.y * s, self.z * s)
    }

    #[must_use]
    pub const fn div_scalar(self, s: f64) -> Self {
        Self::new(self.x / s, self.y / s, self.z / s)
    }

    /// Component-wise product.
    #[must_use]
    pub const fn mul_elem(self, rhs: Self) -> Self {
        Self::new(self.x * rhs.x, self.y * rhs.y, self.z * rhs.z)
    }

    #[must_use]
    pub const fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }

    #[must_use]
    pub const fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }

    #[must_use]
    pub const fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }

    /// Component-wise minimum.
    #[must_use]
    pub fn min(self, rhs: Self) -> Self {
        Self::new(self.x.min(rhs.x), self.y.min(rhs.y), self.z.min(rhs.z))
    }

    /// Component-wise maximum.
    #[must_use]
    pub fn max(self, rhs: Self) -> Self {
        Self::new(self.x.max(rhs.x), self.y.max(rhs.y), self.z.max(rhs.z))
    }

    /// Component-wise absolute value.
    #[must_use]
    pub fn abs(self) -> Self {
        Self::new(self.x.abs(), self.y.abs(), self.z.abs())
    }

    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Default for Vec3 {
    fn default() -> Self {
        Self::ZERO
    }
}

impl fmt::Display for Vec3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.x, self.y, self.z)
    }
}

impl From<[f64; 3]> for Vec3 {
    fn from(arr: [f64; 3]) -> Self {
        Self::from_array(arr)
    }
}

impl From<Vec3> for [f64; 3] {
    fn from(v: Vec3) -> Self {
        v.to_array()
    }
}

impl Add for Vec3 {
    type Output = Self;
    fn add(self, rhs: Self) -> Self::Output {
        Vec3::add(self, rhs)
    }
}

impl Sub for Vec3 {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self::Output {
        Vec3::sub(self, rhs)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Self;
    fn mul(self, rhs: f64) -> Self::Output {
        self.mul_scalar(rhs)
    }
}

impl Mul<Vec3> for f64 {
    type Output = Vec3;
    fn mul(self, rhs: Vec3) -> Self::Output {
        rhs.mul_scalar(self)
    }
}

impl Div<f64> for Vec3 {
    type Output = Self;
    fn div(self, rhs: f64) -> Self::Output {
        self.div_scalar(rhs)
    }
}

impl Neg for Vec3 {
    type Output = Self;
    fn neg(self) -> Self::Output {
        Vec3::neg(self)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tolerance
// ─────────────────────────────────────────────────────────────────────────────

/// Tolerance configuration for approximate comparisons.
///
/// - `Tolerance::VECTOR` - Vector equality and zero-length checks (1e-5)
/// - `Tolerance::DEFAULT` - General float comparisons in tests and diagnostics (1e-9)
/// - `Tolerance::ANGLE_DEGREES` - Angular round trips in degrees (1e-6)
/// - `Tolerance::LOOSE` - Coarse comparisons after long operation chains (1e-6)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tolerance {
    pub eps: f64,
}

impl Tolerance {
    /// Default tolerance (1e-9).
    pub const DEFAULT: Self = Self { eps: 1e-9 };

    /// Matches [`VEC_EPSILON`].
    pub const VECTOR: Self = Self { eps: VEC_EPSILON };

    pub const ANGLE_DEGREES: Self = Self { eps: 1e-6 };

    /// Loose tolerance for coarse comparisons (1e-6).
    pub const LOOSE: Self = Self { eps: 1e-6 };

    #[must_use]
    pub const fn new(eps: f64) -> Self {
        Self { eps }
    }

    #[must_use]
    pub const fn eps_squared(self) -> f64 {
        self.eps * self.eps
    }

    #[must_use]
    pub fn approx_eq_f64(self, a: f64, b: f64) -> bool {
        (a - b).abs() <= self.eps
    }

    #[must_use]
    pub fn approx_eq_vec3(self, a: Vec3, b: Vec3) -> bool {
        a.sub(b).length_squared() <= self.eps_squared()
    }

    /// Check if a vector is approximately zero (degenerate).
    #[must_use]
    pub fn is_zero_vec3(self, v: Vec3) -> bool {
        v.length_squared() <= self.eps_squared()
    }

    /// Rotations are equal when the quaternions match up to sign (`q` and
    /// `-q` describe the same orientation).
    #[must_use]
    pub fn approx_eq_quat(self, a: super::Quat, b: super::Quat) -> bool {
        let same = (a.x - b.x).abs() <= self.eps
            && (a.y - b.y).abs() <= self.eps
            && (a.z - b.z).abs() <= self.eps
            && (a.w - b.w).abs() <= self.eps;
        let flipped = (a.x + b.x).abs() <= self.eps
            && (a.y + b.y).abs() <= self.eps
            && (a.z + b.z).abs() <= self.eps
            && (a.w + b.w).abs() <= self.eps;
        same || flipped
    }
}

impl Default for Tolerance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
