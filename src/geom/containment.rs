//! Point-in-mesh containment for closed convex triangle meshes.
//!
//! A query runs in two stages:
//!
//! 1. The world-space bounding box of the mesh rejects far-away points in
//!    constant time ([`PointContainment::OutsideBounds`]).
//! 2. Every triangle contributes a supporting plane. The point is outside as
//!    soon as it lies on the outer side of any plane; otherwise it is inside.
//!
//! Planes are tested largest-first, which tends to find a separating face
//! sooner. The order never changes the answer.
//!
//! Stage 2 is the half-space intersection test for convex polytopes. For a
//! non-convex mesh it reports points in concave regions as outside even when
//! they are enclosed by the surface; [`PreparedHull::is_convex`] detects such
//! meshes.
//!
//! # Example
//!
//! ```
//! use hull_probe::geom::{ContainmentProbe, TriMesh, Transform, Vec3};
//!
//! let mut probe = ContainmentProbe::with_defaults(TriMesh::unit_cube()).unwrap();
//! assert!(probe.query(&Transform::IDENTITY, Vec3::ZERO).is_inside());
//! assert!(!probe.query(&Transform::IDENTITY, Vec3::new(10.0, 0.0, 0.0)).within_bounds());
//! ```

use serde::{Deserialize, Serialize};

use super::bounds::BoundingBox;
use super::core::{Tolerance, Vec3};
use super::mesh::{MeshError, TriMesh};
use super::plane::Plane;
use super::transform::Transform;

/// Which point decides the "outer" side of each face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ReferencePoint {
    /// The mean of the world-space vertices used by the triangles is an
    /// interior sample; a query point is outside a face when it is not on
    /// the centroid's side.
    #[default]
    Centroid,
    /// `transform.position + normal` is an exterior sample for each face; a
    /// query point is outside when it shares that sample's side. Only
    /// reliable when the mesh surrounds its local origin.
    TransformOrigin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainmentOptions {
    pub reference: ReferencePoint,
    /// Reject points outside the bounding box before testing planes.
    pub bounds_prefilter: bool,
    /// Test planes in descending order of triangle area.
    pub sort_by_weight: bool,
}

impl Default for ContainmentOptions {
    fn default() -> Self {
        Self {
            reference: ReferencePoint::Centroid,
            bounds_prefilter: true,
            sort_by_weight: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointContainment {
    Inside,
    /// Inside the bounding box but outside at least one face.
    Outside,
    /// Rejected by the bounding box.
    OutsideBounds,
}

impl PointContainment {
    #[must_use]
    pub const fn is_inside(self) -> bool {
        matches!(self, Self::Inside)
    }

    /// Whether the bounding-box test passed. Necessary but not sufficient
    /// for [`PointContainment::Inside`].
    #[must_use]
    pub const fn within_bounds(self) -> bool {
        !matches!(self, Self::OutsideBounds)
    }
}

/// World-space planes and bounds of a mesh under one transform.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedHull {
    transform: Transform,
    options: ContainmentOptions,
    /// World-space vertices that some triangle references.
    hull_vertices: Vec<Vec3>,
    bounds: BoundingBox,
    centroid: Vec3,
    planes: Vec<Plane>,
    degenerate_faces: usize,
}

impl PreparedHull {
    pub fn build(
        mesh: &TriMesh,
        transform: &Transform,
        options: ContainmentOptions,
    ) -> Result<Self, MeshError> {
        mesh.validate()?;
        Ok(Self::from_valid_mesh(mesh, transform, options))
    }

    fn from_valid_mesh(mesh: &TriMesh, transform: &Transform, options: ContainmentOptions) -> Self {
        let rotated_scaled = rotate_scale_vertices(&mesh.positions, transform);
        let bounds = BoundingBox::from_vertices(&rotated_scaled, transform.position)
            .unwrap_or(BoundingBox::new(transform.position, Vec3::ZERO));

        let world_vertices: Vec<Vec3> = rotated_scaled
            .into_iter()
            .map(|v| v + transform.position)
            .collect();
        let hull_vertices = referenced_vertices(&world_vertices, mesh);
        if hull_vertices.len() < world_vertices.len() {
            log::debug!(
                "{} of {} vertices are not used by any triangle",
                world_vertices.len() - hull_vertices.len(),
                world_vertices.len()
            );
        }
        let centroid = hull_vertices
            .iter()
            .fold(Vec3::ZERO, |acc, &v| acc + v)
            .div_scalar(hull_vertices.len().max(1) as f64);

        let face_count = mesh.triangle_count();
        let mut planes = build_planes(&world_vertices, &mesh.indices);
        let degenerate_faces = face_count - planes.len();
        if degenerate_faces > 0 {
            log::debug!("skipped {degenerate_faces} degenerate faces out of {face_count}");
        }
        if planes.is_empty() {
            log::warn!("mesh has no faces with area under {transform:?}, nothing is inside");
        }
        if options.sort_by_weight {
            planes.sort_by(|a, b| b.weight().total_cmp(&a.weight()));
        }

        log::debug!(
            "prepared hull: {} vertices, {} planes, bounds center {} size {}",
            hull_vertices.len(),
            planes.len(),
            bounds.center,
            bounds.size
        );

        Self {
            transform: *transform,
            options,
            hull_vertices,
            bounds,
            centroid,
            planes,
            degenerate_faces,
        }
    }

    #[must_use]
    pub fn classify(&self, point: Vec3) -> PointContainment {
        self.classify_counting(point).0
    }

    /// Classification plus the number of planes evaluated.
    fn classify_counting(&self, point: Vec3) -> (PointContainment, usize) {
        if self.options.bounds_prefilter && !self.bounds.contains(point) {
            log::trace!("{point} rejected by bounds");
            return (PointContainment::OutsideBounds, 0);
        }
        // A hull without a single face encloses no volume.
        if self.planes.is_empty() {
            return (PointContainment::Outside, 0);
        }

        for (tested, plane) in self.planes.iter().enumerate() {
            if self.is_outside_face(plane, point) {
                log::trace!("{point} outside face {tested} of {}", self.planes.len());
                return (PointContainment::Outside, tested + 1);
            }
        }
        (PointContainment::Inside, self.planes.len())
    }

    fn is_outside_face(&self, plane: &Plane, point: Vec3) -> bool {
        match self.options.reference {
            ReferencePoint::Centroid => !plane.same_side(self.centroid, point),
            ReferencePoint::TransformOrigin => {
                plane.same_side(self.transform.position + plane.normal(), point)
            }
        }
    }

    /// True when no vertex sits farther than `tol` beyond any face, taking
    /// the centroid's side as the inner side.
    #[must_use]
    pub fn is_convex(&self, tol: Tolerance) -> bool {
        self.planes.iter().all(|plane| {
            let outward = if plane.signed_distance(self.centroid) > 0.0 {
                -1.0
            } else {
                1.0
            };
            self.hull_vertices
                .iter()
                .all(|&v| plane.signed_distance(v) * outward <= tol.eps)
        })
    }

    #[must_use]
    pub const fn transform(&self) -> &Transform {
        &self.transform
    }

    #[must_use]
    pub const fn options(&self) -> ContainmentOptions {
        self.options
    }

    #[must_use]
    pub const fn bounds(&self) -> BoundingBox {
        self.bounds
    }

    #[must_use]
    pub const fn centroid(&self) -> Vec3 {
        self.centroid
    }

    #[must_use]
    pub fn hull_vertices(&self) -> &[Vec3] {
        &self.hull_vertices
    }

    /// Planes in test order.
    #[must_use]
    pub fn planes(&self) -> &[Plane] {
        &self.planes
    }

    #[must_use]
    pub const fn degenerate_face_count(&self) -> usize {
        self.degenerate_faces
    }
}

cfg_if::cfg_if! {
    if #[cfg(feature = "parallel")] {
        use rayon::prelude::*;

        fn rotate_scale_vertices(positions: &[[f64; 3]], transform: &Transform) -> Vec<Vec3> {
            positions
                .par_iter()
                .map(|&p| transform.apply_rotate_scale(Vec3::from_array(p)))
                .collect()
        }

        fn build_planes(world: &[Vec3], indices: &[u32]) -> Vec<Plane> {
            indices
                .par_chunks_exact(3)
                .filter_map(|tri| face_plane(world, tri))
                .collect()
        }
    } else {
        fn rotate_scale_vertices(positions: &[[f64; 3]], transform: &Transform) -> Vec<Vec3> {
            positions
                .iter()
                .map(|&p| transform.apply_rotate_scale(Vec3::from_array(p)))
                .collect()
        }

        fn build_planes(world: &[Vec3], indices: &[u32]) -> Vec<Plane> {
            indices
                .chunks_exact(3)
                .filter_map(|tri| face_plane(world, tri))
                .collect()
        }
    }
}

/// Vertices in first-use order, each once, skipping ones no triangle uses.
fn referenced_vertices(world: &[Vec3], mesh: &TriMesh) -> Vec<Vec3> {
    let mut seen = vec![false; world.len()];
    let mut used = Vec::with_capacity(world.len());
    for i in mesh.triangles().flatten() {
        if !seen[i] {
            seen[i] = true;
            used.push(world[i]);
        }
    }
    used
}

fn face_plane(world: &[Vec3], tri: &[u32]) -> Option<Plane> {
    Plane::try_from_points(
        world[tri[0] as usize],
        world[tri[1] as usize],
        world[tri[2] as usize],
    )
}

/// Counters for a [`ContainmentProbe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProbeStats {
    pub queries: usize,
    /// Queries that had to rebuild the hull for a new transform.
    pub rebuilds: usize,
    pub cache_hits: usize,
    pub bounds_rejections: usize,
    /// Total planes evaluated across all queries.
    pub plane_tests: usize,
}

impl ProbeStats {
    /// Fraction of queries served from the cached hull, 0.0 before any query.
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        if self.queries == 0 {
            0.0
        } else {
            self.cache_hits as f64 / self.queries as f64
        }
    }
}

/// Containment queries against one mesh, reusing the prepared hull while the
/// transform stays the same.
///
/// The probe owns its cache; use one probe per mesh instance.
#[derive(Debug, Clone)]
pub struct ContainmentProbe {
    mesh: TriMesh,
    options: ContainmentOptions,
    hull: Option<PreparedHull>,
    stats: ProbeStats,
}

impl ContainmentProbe {
    pub fn new(mesh: TriMesh, options: ContainmentOptions) -> Result<Self, MeshError> {
        mesh.validate()?;
        Ok(Self {
            mesh,
            options,
            hull: None,
            stats: ProbeStats::default(),
        })
    }

    pub fn with_defaults(mesh: TriMesh) -> Result<Self, MeshError> {
        Self::new(mesh, ContainmentOptions::default())
    }

    #[must_use]
    pub fn mesh(&self) -> &TriMesh {
        &self.mesh
    }

    #[must_use]
    pub const fn options(&self) -> ContainmentOptions {
        self.options
    }

    pub fn set_options(&mut self, options: ContainmentOptions) {
        if options != self.options {
            self.options = options;
            self.invalidate();
        }
    }

    /// Drop the cached hull; the next query rebuilds it.
    pub fn invalidate(&mut self) {
        self.hull = None;
    }

    /// Hull for `transform`, rebuilt only when the transform changed.
    pub fn prepare(&mut self, transform: &Transform) -> &PreparedHull {
        let hull = match self.hull.take() {
            Some(hull) if hull.transform == *transform => {
                self.stats.cache_hits += 1;
                hull
            }
            _ => {
                log::debug!("rebuilding hull for {transform:?}");
                self.stats.rebuilds += 1;
                PreparedHull::from_valid_mesh(&self.mesh, transform, self.options)
            }
        };
        self.hull.insert(hull)
    }

    pub fn query(&mut self, transform: &Transform, point: Vec3) -> PointContainment {
        let (result, tested) = self.prepare(transform).classify_counting(point);
        self.stats.queries += 1;
        self.stats.plane_tests += tested;
        if result == PointContainment::OutsideBounds {
            self.stats.bounds_rejections += 1;
        }
        result
    }

    #[must_use]
    pub const fn stats(&self) -> ProbeStats {
        self.stats
    }
}

/// One-shot query without caching.
pub fn point_in_mesh(
    mesh: &TriMesh,
    transform: &Transform,
    point: Vec3,
    options: ContainmentOptions,
) -> Result<PointContainment, MeshError> {
    Ok(PreparedHull::build(mesh, transform, options)?.classify(point))
}
