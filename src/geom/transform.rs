use serde::{Deserialize, Serialize};

use super::core::Vec3;
use super::quat::Quat;

/// Rigid placement with non-uniform scale.
///
/// Model-space points map to world space as
/// `position + rotation * (scale ⊙ local)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    #[must_use]
    pub const fn new(position: Vec3, rotation: Quat, scale: Vec3) -> Self {
        Self {
            position,
            rotation,
            scale,
        }
    }

    #[must_use]
    pub const fn from_position(position: Vec3) -> Self {
        Self::new(position, Quat::IDENTITY, Vec3::ONE)
    }

    #[must_use]
    pub const fn with_rotation(self, rotation: Quat) -> Self {
        Self { rotation, ..self }
    }

    #[must_use]
    pub const fn with_scale(self, scale: Vec3) -> Self {
        Self { scale, ..self }
    }

    #[must_use]
    pub const fn with_uniform_scale(self, s: f64) -> Self {
        self.with_scale(Vec3::new(s, s, s))
    }

    /// Scale then rotate, without translating.
    #[must_use]
    pub fn apply_rotate_scale(&self, local: Vec3) -> Vec3 {
        self.rotation.rotate_vec3(local.mul_elem(self.scale))
    }

    #[must_use]
    pub fn apply_point(&self, local: Vec3) -> Vec3 {
        self.position + self.apply_rotate_scale(local)
    }
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
