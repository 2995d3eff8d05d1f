use super::core::{Tolerance, Vec3};

/// Infinite plane through three points.
///
/// The normal follows the winding of the points: `(v2 - v1) × (v3 - v1)`,
/// normalized. Points with a strictly positive signed distance are on the
/// front side; points on the plane count as the back side.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    points: [Vec3; 3],
    normal: Vec3,
    distance: f64,
    weight: f64,
}

impl Plane {
    /// Build the plane through `v1`, `v2`, `v3`.
    ///
    /// Collinear points give a zero normal; such a plane puts every point on
    /// the back side. Use [`Plane::try_from_points`] to reject them instead.
    #[must_use]
    pub fn from_points(v1: Vec3, v2: Vec3, v3: Vec3) -> Self {
        let cross = (v2 - v1).cross(v3 - v1);
        let normal = cross.normalized();
        Self {
            points: [v1, v2, v3],
            normal,
            distance: normal.dot(v1),
            weight: cross.length(),
        }
    }

    #[must_use]
    pub fn try_from_points(v1: Vec3, v2: Vec3, v3: Vec3) -> Option<Self> {
        let plane = Self::from_points(v1, v2, v3);
        (!Tolerance::VECTOR.is_zero_vec3(plane.normal)).then_some(plane)
    }

    #[must_use]
    pub const fn normal(&self) -> Vec3 {
        self.normal
    }

    /// Offset from the origin along the normal (`normal · v1`).
    #[must_use]
    pub const fn distance(&self) -> f64 {
        self.distance
    }

    /// Twice the area of the defining triangle. Only used for ordering.
    #[must_use]
    pub const fn weight(&self) -> f64 {
        self.weight
    }

    #[must_use]
    pub const fn points(&self) -> [Vec3; 3] {
        self.points
    }

    #[must_use]
    pub fn signed_distance(&self, p: Vec3) -> f64 {
        self.normal.dot(p - self.points[0])
    }

    /// True when `p` is strictly in front of the plane.
    #[must_use]
    pub fn get_side(&self, p: Vec3) -> bool {
        self.signed_distance(p) > 0.0
    }

    /// True when `a` and `b` fall in the same half-space.
    #[must_use]
    pub fn same_side(&self, a: Vec3, b: Vec3) -> bool {
        self.get_side(a) == self.get_side(b)
    }

    #[must_use]
    pub fn closest_point(&self, p: Vec3) -> Vec3 {
        p - self.normal * self.signed_distance(p)
    }

    /// Same plane with the opposite orientation.
    #[must_use]
    pub fn flipped(&self) -> Self {
        let [v1, v2, v3] = self.points;
        Self::from_points(v1, v3, v2)
    }
}
