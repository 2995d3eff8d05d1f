use super::core::Vec3;

/// Axis-aligned box stored as center and full size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub center: Vec3,
    pub size: Vec3,
}

impl BoundingBox {
    #[must_use]
    pub const fn new(center: Vec3, size: Vec3) -> Self {
        Self { center, size }
    }

    /// Box around rotated+scaled (not yet translated) vertices, placed at
    /// `position`.
    ///
    /// The six axis extremes are located first and the size is measured
    /// between opposite extremes. The center is `position` shifted by the
    /// midpoint of the extremes, so meshes built around their local origin
    /// end up centered on `position`.
    #[must_use]
    pub fn from_vertices(rotated_scaled: &[Vec3], position: Vec3) -> Option<Self> {
        let mut iter = rotated_scaled.iter().copied();
        let first = iter.next()?;
        let (min, max) = iter.fold((first, first), |(min, max), v| (min.min(v), max.max(v)));

        let size = Vec3::new(
            distance_along(min.x, max.x),
            distance_along(min.y, max.y),
            distance_along(min.z, max.z),
        );
        let midpoint = (min + max) * 0.5;
        Some(Self::new(position + midpoint, size))
    }

    /// Box around points that are already in world space.
    #[must_use]
    pub fn from_points(points: &[Vec3]) -> Option<Self> {
        Self::from_vertices(points, Vec3::ZERO)
    }

    #[must_use]
    pub fn half_extents(self) -> Vec3 {
        self.size * 0.5
    }

    #[must_use]
    pub fn min(self) -> Vec3 {
        self.center - self.half_extents()
    }

    #[must_use]
    pub fn max(self) -> Vec3 {
        self.center + self.half_extents()
    }

    /// Inclusive on every face.
    #[must_use]
    pub fn contains(self, p: Vec3) -> bool {
        let min = self.min();
        let max = self.max();
        p.x >= min.x
            && p.x <= max.x
            && p.y >= min.y
            && p.y <= max.y
            && p.z >= min.z
            && p.z <= max.z
    }

    /// Grow the box by `amount` on every side.
    #[must_use]
    pub fn expand_by(self, amount: f64) -> Self {
        Self::new(self.center, self.size + Vec3::ONE * (2.0 * amount))
    }

    #[must_use]
    pub fn volume(self) -> f64 {
        self.size.x * self.size.y * self.size.z
    }
}

fn distance_along(lo: f64, hi: f64) -> f64 {
    (hi - lo).abs()
}
