//! Catalogue of small vector exercises.
//!
//! Each exercise combines two input vectors `a` and `b` into a result. Two of
//! them are animated by a time parameter that the caller advances with
//! [`VectorExercise::advance_time`].

use std::fmt;

use crate::geom::{Quat, Vec3};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VectorExercise {
    Sum,
    Difference,
    ComponentProduct,
    NegatedCross,
    Lerp,
    Max,
    Project,
    NormalizedSumTimesDistance,
    Reflect,
    LerpUnclamped,
}

impl VectorExercise {
    pub const ALL: [Self; 10] = [
        Self::Sum,
        Self::Difference,
        Self::ComponentProduct,
        Self::NegatedCross,
        Self::Lerp,
        Self::Max,
        Self::Project,
        Self::NormalizedSumTimesDistance,
        Self::Reflect,
        Self::LerpUnclamped,
    ];

    /// Exercise by its 1-based number.
    #[must_use]
    pub fn from_number(n: usize) -> Option<Self> {
        n.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }

    #[must_use]
    pub fn number(self) -> usize {
        Self::ALL.iter().position(|&e| e == self).unwrap_or(0) + 1
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Sum => "sum",
            Self::Difference => "difference",
            Self::ComponentProduct => "component_product",
            Self::NegatedCross => "negated_cross",
            Self::Lerp => "lerp",
            Self::Max => "max",
            Self::Project => "project",
            Self::NormalizedSumTimesDistance => "normalized_sum_times_distance",
            Self::Reflect => "reflect",
            Self::LerpUnclamped => "lerp_unclamped",
        }
    }

    /// Whether the result depends on `t`.
    #[must_use]
    pub const fn is_animated(self) -> bool {
        matches!(self, Self::Lerp | Self::LerpUnclamped)
    }

    #[must_use]
    pub fn evaluate(self, a: Vec3, b: Vec3, t: f64) -> Vec3 {
        match self {
            Self::Sum => a + b,
            Self::Difference => b - a,
            Self::ComponentProduct => a.mul_elem(b),
            Self::NegatedCross => -a.cross(b),
            Self::Lerp => a.lerp(b, t),
            Self::Max => a.max(b),
            Self::Project => a.project(b),
            Self::NormalizedSumTimesDistance => (a + b).normalized() * a.distance(b),
            Self::Reflect => a.reflect(b.normalized()),
            Self::LerpUnclamped => b.lerp_unclamped(a, t),
        }
    }

    /// Next value of the animation clock after `dt` seconds.
    ///
    /// `Lerp` restarts once the clock has passed 1, `LerpUnclamped` once it
    /// has reached 10. Static exercises keep the clock at 0.
    #[must_use]
    pub fn advance_time(self, t: f64, dt: f64) -> f64 {
        match self {
            Self::Lerp if t > 1.0 => 0.0,
            Self::LerpUnclamped if t >= 10.0 => 0.0,
            Self::Lerp | Self::LerpUnclamped => t + dt,
            _ => 0.0,
        }
    }
}

impl fmt::Display for VectorExercise {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}. {}", self.number(), self.name())
    }
}

/// Animation clock for one exercise.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExerciseClock {
    pub exercise: VectorExercise,
    pub t: f64,
}

impl ExerciseClock {
    #[must_use]
    pub const fn new(exercise: VectorExercise) -> Self {
        Self { exercise, t: 0.0 }
    }

    /// Advance by `dt` seconds and return the new time.
    pub fn tick(&mut self, dt: f64) -> f64 {
        self.t = self.exercise.advance_time(self.t, dt);
        self.t
    }

    #[must_use]
    pub fn evaluate(&self, a: Vec3, b: Vec3) -> Vec3 {
        self.exercise.evaluate(a, b, self.t)
    }
}

/// Rotate `v` by `degrees` around the Y axis.
#[must_use]
pub fn rotate_about_y(v: Vec3, degrees: f64) -> Vec3 {
    Quat::euler(0.0, degrees, 0.0) * v
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Tolerance;

    #[test]
    fn numbering_round_trips() {
        for exercise in VectorExercise::ALL {
            assert_eq!(VectorExercise::from_number(exercise.number()), Some(exercise));
        }
        assert_eq!(VectorExercise::from_number(0), None);
        assert_eq!(VectorExercise::from_number(11), None);
        assert_eq!(VectorExercise::Reflect.to_string(), "9. reflect");
    }

    #[test]
    fn static_exercises() {
        let a = Vec3::new(1.0, 0.0, 0.0);
        let b = Vec3::new(0.0, 2.0, 0.0);

        assert_eq!(VectorExercise::Sum.evaluate(a, b, 0.0), Vec3::new(1.0, 2.0, 0.0));
        assert_eq!(VectorExercise::Difference.evaluate(a, b, 0.0), Vec3::new(-1.0, 2.0, 0.0));
        assert_eq!(VectorExercise::ComponentProduct.evaluate(a, b, 0.0), Vec3::ZERO);
        assert_eq!(VectorExercise::NegatedCross.evaluate(a, b, 0.0), Vec3::new(0.0, 0.0, -2.0));
        assert_eq!(VectorExercise::Max.evaluate(a, b, 0.0), Vec3::new(1.0, 2.0, 0.0));
        assert_eq!(VectorExercise::Project.evaluate(a, b, 0.0), Vec3::ZERO);
        assert_eq!(VectorExercise::Reflect.evaluate(Vec3::new(1.0, -1.0, 0.0), b, 0.0), Vec3::new(1.0, 1.0, 0.0));

        let scaled = VectorExercise::NormalizedSumTimesDistance.evaluate(a, b, 0.0);
        assert!(Tolerance::LOOSE.approx_eq_f64(scaled.length(), 5.0_f64.sqrt()));
    }

    #[test]
    fn animated_exercises_follow_clock() {
        let a = Vec3::ZERO;
        let b = Vec3::new(10.0, 0.0, 0.0);

        assert_eq!(VectorExercise::Lerp.evaluate(a, b, 3.0), b);
        assert_eq!(VectorExercise::LerpUnclamped.evaluate(a, b, 3.0), Vec3::new(-20.0, 0.0, 0.0));

        assert_eq!(VectorExercise::Lerp.advance_time(0.5, 0.25), 0.75);
        assert_eq!(VectorExercise::Lerp.advance_time(1.0, 0.25), 1.25);
        assert_eq!(VectorExercise::Lerp.advance_time(1.25, 0.25), 0.0);
        assert_eq!(VectorExercise::LerpUnclamped.advance_time(9.5, 0.5), 10.0);
        assert_eq!(VectorExercise::LerpUnclamped.advance_time(10.0, 0.5), 0.0);
        assert_eq!(VectorExercise::Sum.advance_time(3.0, 1.0), 0.0);
    }

    #[test]
    fn clock_wraps_lerp_after_one() {
        let a = Vec3::ZERO;
        let b = Vec3::new(4.0, 0.0, 0.0);
        let mut clock = ExerciseClock::new(VectorExercise::Lerp);

        let times: Vec<f64> = (0..6).map(|_| clock.tick(0.5)).collect();
        assert_eq!(times, vec![0.5, 1.0, 1.5, 0.0, 0.5, 1.0]);
        assert_eq!(clock.evaluate(a, b), b);

        let mut still = ExerciseClock::new(VectorExercise::Max);
        assert_eq!(still.tick(0.5), 0.0);
    }

    #[test]
    fn quarter_turn_about_y() {
        let rotated = rotate_about_y(Vec3::new(10.0, 0.0, 0.0), 90.0);
        assert!(Tolerance::LOOSE.approx_eq_vec3(rotated, Vec3::new(0.0, 0.0, -10.0)));
    }
}
