//! Vector and rotation math plus point-in-mesh containment.

mod bounds;
mod containment;
mod core;
mod mesh;
mod plane;
mod quat;
mod transform;

pub use bounds::BoundingBox;
pub use containment::{
    ContainmentOptions, ContainmentProbe, PointContainment, PreparedHull, ProbeStats,
    ReferencePoint, point_in_mesh,
};
pub use self::core::{MACHINE_EPSILON, Tolerance, VEC_EPSILON, Vec3};
pub use mesh::{MeshError, TriMesh};
pub use plane::Plane;
pub use quat::{QUAT_DOT_IDENTITY, Quat};
pub use transform::Transform;

#[cfg(test)]
mod tests;
