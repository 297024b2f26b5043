//! Quadric error matrices.
//!
//! A quadric `Q` encodes the sum of squared distances from a point to a set of
//! planes as `vᵀ Q v` with `v = [x, y, z, 1]`.

use std::ops::{Add, AddAssign, Mul};

use nalgebra::{Matrix3, Matrix4, Point3, Vector3};

use crate::error::{MeshError, Result};

/// Below this the 3x3 block is treated as singular.
const SINGULAR_EPSILON: f64 = 1e-10;

/// A symmetric 4x4 quadric, stored as its 10 unique entries.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Quadric {
    /// Upper triangle, row-major:
    /// | a b c d |
    /// | b e f g |
    /// | c f h i |
    /// | d g i j |
    data: [f64; 10],
}

impl Quadric {
    /// The zero quadric.
    pub fn zero() -> Self {
        Self { data: [0.0; 10] }
    }

    /// Quadric of the plane `ax + by + cz + d = 0`.
    ///
    /// `(a, b, c)` should be unit length for the error to be a squared distance.
    pub fn from_plane(a: f64, b: f64, c: f64, d: f64) -> Self {
        Self {
            data: [
                a * a,
                a * b,
                a * c,
                a * d,
                b * b,
                b * c,
                b * d,
                c * c,
                c * d,
                d * d,
            ],
        }
    }

    /// Quadric of the plane through `point` with unit `normal`.
    pub fn from_point_normal(point: &Point3<f64>, normal: &Vector3<f64>) -> Self {
        let d = -normal.dot(&point.coords);
        Self::from_plane(normal.x, normal.y, normal.z, d)
    }

    /// Evaluate `vᵀ Q v` at `p`.
    pub fn evaluate(&self, p: &Point3<f64>) -> f64 {
        let [a, b, c, d, e, f, g, h, i, j] = self.data;
        let (x, y, z) = (p.x, p.y, p.z);

        a * x * x
            + 2.0 * b * x * y
            + 2.0 * c * x * z
            + 2.0 * d * x
            + e * y * y
            + 2.0 * f * y * z
            + 2.0 * g * y
            + h * z * z
            + 2.0 * i * z
            + j
    }

    /// The full 4x4 matrix.
    pub fn to_matrix(&self) -> Matrix4<f64> {
        let [a, b, c, d, e, f, g, h, i, j] = self.data;
        Matrix4::new(
            a, b, c, d, //
            b, e, f, g, //
            c, f, h, i, //
            d, g, i, j,
        )
    }

    /// The point minimizing the error.
    ///
    /// Solves `A x = -b` where `A` is the upper-left 3x3 block and `b` the
    /// first three entries of the last column. Returns
    /// [`MeshError::SingularSystem`] when `|det A|` is too small for a unique
    /// solution.
    pub fn minimizer(&self) -> Result<Point3<f64>> {
        let [a, b, c, d, e, f, g, h, i, _] = self.data;
        let m = Matrix3::new(
            a, b, c, //
            b, e, f, //
            c, f, h,
        );

        if m.determinant().abs() < SINGULAR_EPSILON {
            return Err(MeshError::SingularSystem);
        }

        let rhs = Vector3::new(-d, -g, -i);
        m.lu()
            .solve(&rhs)
            .map(Point3::from)
            .ok_or(MeshError::SingularSystem)
    }
}

impl AddAssign for Quadric {
    fn add_assign(&mut self, other: Quadric) {
        for (lhs, rhs) in self.data.iter_mut().zip(other.data) {
            *lhs += rhs;
        }
    }
}

impl Add for Quadric {
    type Output = Quadric;

    fn add(mut self, other: Quadric) -> Quadric {
        self += other;
        self
    }
}

impl Mul<f64> for Quadric {
    type Output = Quadric;

    fn mul(mut self, weight: f64) -> Quadric {
        for entry in &mut self.data {
            *entry *= weight;
        }
        self
    }
}

impl std::iter::Sum for Quadric {
    fn sum<I: Iterator<Item = Quadric>>(iter: I) -> Quadric {
        iter.fold(Quadric::zero(), Add::add)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plane_distance() {
        // z = 1
        let q = Quadric::from_point_normal(&Point3::new(0.0, 0.0, 1.0), &Vector3::z());
        assert!(q.evaluate(&Point3::new(5.0, -3.0, 1.0)).abs() < 1e-12);
        assert!((q.evaluate(&Point3::new(0.0, 0.0, 3.0)) - 4.0).abs() < 1e-12);
    }

    #[test]
    fn test_matrix_form_matches_evaluate() {
        let q = Quadric::from_plane(0.6, 0.8, 0.0, -2.0);
        let p = Point3::new(1.0, 2.0, 3.0);
        let v = p.to_homogeneous();
        let expected = (v.transpose() * q.to_matrix() * v)[(0, 0)];
        assert!((q.evaluate(&p) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_three_planes_meet_in_a_point() {
        let corner = Point3::new(1.0, 2.0, 3.0);
        let q = Quadric::from_point_normal(&corner, &Vector3::x())
            + Quadric::from_point_normal(&corner, &Vector3::y())
            + Quadric::from_point_normal(&corner, &Vector3::z());

        let p = q.minimizer().unwrap();
        assert!((p - corner).norm() < 1e-9);
        assert!(q.evaluate(&p).abs() < 1e-12);
    }

    #[test]
    fn test_coplanar_is_singular() {
        let q = Quadric::from_point_normal(&Point3::origin(), &Vector3::z())
            + Quadric::from_point_normal(&Point3::new(1.0, 0.0, 0.0), &Vector3::z());
        assert!(matches!(q.minimizer(), Err(MeshError::SingularSystem)));
    }

    #[test]
    fn test_weight_scales_error() {
        let q = Quadric::from_point_normal(&Point3::origin(), &Vector3::y()) * 10.0;
        assert!((q.evaluate(&Point3::new(3.0, 2.0, -1.0)) - 40.0).abs() < 1e-12);
    }

    #[test]
    fn test_sum() {
        let planes = [Vector3::x(), Vector3::y()];
        let q: Quadric = planes
            .iter()
            .map(|n| Quadric::from_point_normal(&Point3::origin(), n))
            .sum();
        assert!((q.evaluate(&Point3::new(1.0, 1.0, 7.0)) - 2.0).abs() < 1e-12);
    }
}
