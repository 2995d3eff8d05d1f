#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! Hand-rolled 3D vector, quaternion and plane math, and a point-in-mesh
//! containment test built on them.
//!
//! The [`geom`] module holds the math types and the containment engine,
//! [`exercises`] a small catalogue of vector exercises.

pub mod exercises;
pub mod geom;

pub use geom::{
    BoundingBox, ContainmentOptions, ContainmentProbe, MeshError, Plane, PointContainment, Quat,
    Transform, TriMesh, Vec3, point_in_mesh,
};
