//! 2D vector math for bone displacements and screen-space points.
//!
//! Screen space has y growing downward. Angles are measured as if y grew
//! upward, which is why [`Vector::rest_angle`] negates `y`.

use serde::{Deserialize, Serialize};
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

/// A displacement or point in the plane.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
}

impl Vector {
    pub const ZERO: Vector = Vector { x: 0.0, y: 0.0 };

    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean length.
    #[inline]
    pub fn magnitude(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Unit vector in the same direction. A zero-length vector stays zero.
    pub fn normalize(self) -> Self {
        let length = self.magnitude();
        if length == 0.0 || !length.is_finite() {
            return Vector::ZERO;
        }
        Self {
            x: self.x / length,
            y: self.y / length,
        }
    }

    #[inline]
    pub fn scale(self, n: f64) -> Self {
        Self {
            x: self.x * n,
            y: self.y * n,
        }
    }

    /// Rotate by `angle` radians (clockwise on screen).
    pub fn rotate(self, angle: f64) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self {
            x: self.x * cos - self.y * sin,
            y: self.x * sin + self.y * cos,
        }
    }

    /// Orientation of this vector with no formula applied: `atan2(-y, x)`.
    #[inline]
    pub fn rest_angle(self) -> f64 {
        (-self.y).atan2(self.x)
    }

    /// True when both components are within `eps` of `other`.
    pub fn approx_eq(self, other: Vector, eps: f64) -> bool {
        (self.x - other.x).abs() <= eps && (self.y - other.y).abs() <= eps
    }
}

impl Add for Vector {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl AddAssign for Vector {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vector {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl Mul<f64> for Vector {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        self.scale(rhs)
    }
}

impl Neg for Vector {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self {
            x: -self.x,
            y: -self.y,
        }
    }
}

impl std::iter::Sum for Vector {
    fn sum<I: Iterator<Item = Vector>>(iter: I) -> Self {
        iter.fold(Vector::ZERO, Add::add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn add_subtract_scale() {
        let a = Vector::new(1.0, 2.0);
        let b = Vector::new(3.0, -4.0);
        assert_eq!(a + b, Vector::new(4.0, -2.0));
        assert_eq!(a - b, Vector::new(-2.0, 6.0));
        assert_eq!(b * 2.0, Vector::new(6.0, -8.0));
        assert_eq!(b.magnitude(), 5.0);
    }

    #[test]
    fn normalize_zero_vector_is_zero() {
        assert_eq!(Vector::ZERO.normalize(), Vector::ZERO);
        let n = Vector::new(0.0, -8.0).normalize();
        assert!(n.approx_eq(Vector::new(0.0, -1.0), 1e-12));
    }

    #[test]
    fn rotate_quarter_turn_is_clockwise_on_screen() {
        let v = Vector::new(10.0, 0.0).rotate(FRAC_PI_2);
        assert!(v.approx_eq(Vector::new(0.0, 10.0), 1e-9), "{v:?}");
    }

    #[test]
    fn rest_angle_treats_up_as_positive() {
        assert_eq!(Vector::new(10.0, 0.0).rest_angle(), 0.0);
        let up = Vector::new(0.0, -10.0).rest_angle();
        assert!((up - FRAC_PI_2).abs() < 1e-12);
    }
}
