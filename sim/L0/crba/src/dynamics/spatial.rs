//! Spatial algebra for 6D motion and force vectors.
//!
//! Implements Featherstone's spatial vector algebra used by the CRBA passes,
//! forward kinematics and the kinetic-energy reference. Functions here are
//! pure math with no model or data dependencies.

use nalgebra::{
    Dyn, Isometry3, Matrix, Matrix3, Matrix6, Rotation3, U6, Unit, Vector3, Vector6,
    storage::{RawStorage, RawStorageMut},
};

use super::inertia::SpatialInertia;

/// 6D spatial vector: [angular (3), linear (3)].
///
/// Following Featherstone's convention:
/// - Motion vectors: [ω, v] (angular velocity, linear velocity)
/// - Force vectors: [τ, f] (torque, force)
pub type SpatialVector = Vector6<f64>;

#[inline]
fn angular(v: &SpatialVector) -> Vector3<f64> {
    Vector3::new(v[0], v[1], v[2])
}

#[inline]
fn linear(v: &SpatialVector) -> Vector3<f64> {
    Vector3::new(v[3], v[4], v[5])
}

#[inline]
fn stack(ang: &Vector3<f64>, lin: &Vector3<f64>) -> SpatialVector {
    SpatialVector::new(ang.x, ang.y, ang.z, lin.x, lin.y, lin.z)
}

/// Skew-symmetric matrix `[v]×` such that `[v]× w = v × w`.
#[inline]
#[must_use]
pub fn skew(v: &Vector3<f64>) -> Matrix3<f64> {
    Matrix3::new(0.0, -v.z, v.y, v.z, 0.0, -v.x, -v.y, v.x, 0.0)
}

/// Rigid placement `aMb`: the pose of frame `b` expressed in frame `a`.
///
/// `rotation` maps `b` coordinates into `a` coordinates and `translation` is
/// the origin of `b` in `a`. Acting with the transform moves spatial
/// quantities from frame `b` into frame `a`; the inverse actions go the
/// other way.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialTransform {
    /// Rotation from child to parent coordinates.
    pub rotation: Matrix3<f64>,
    /// Child origin in parent coordinates.
    pub translation: Vector3<f64>,
}

impl Default for SpatialTransform {
    fn default() -> Self {
        Self::identity()
    }
}

impl SpatialTransform {
    /// Identity placement.
    #[must_use]
    pub fn identity() -> Self {
        Self {
            rotation: Matrix3::identity(),
            translation: Vector3::zeros(),
        }
    }

    /// Placement from a rotation matrix and a translation.
    #[must_use]
    pub fn new(rotation: Matrix3<f64>, translation: Vector3<f64>) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    /// Pure translation.
    #[must_use]
    pub fn from_translation(translation: Vector3<f64>) -> Self {
        Self {
            rotation: Matrix3::identity(),
            translation,
        }
    }

    /// Pure rotation of `angle` radians about `axis`.
    #[must_use]
    pub fn from_axis_angle(axis: &Unit<Vector3<f64>>, angle: f64) -> Self {
        Self {
            rotation: Rotation3::from_axis_angle(axis, angle).into_inner(),
            translation: Vector3::zeros(),
        }
    }

    /// Placement from an `Isometry3` (quaternion + translation).
    #[must_use]
    pub fn from_isometry(iso: &Isometry3<f64>) -> Self {
        Self {
            rotation: iso.rotation.to_rotation_matrix().into_inner(),
            translation: iso.translation.vector,
        }
    }

    /// Compose two placements: `aMc = aMb * bMc`.
    #[must_use]
    pub fn compose(&self, other: &Self) -> Self {
        Self {
            rotation: self.rotation * other.rotation,
            translation: self.translation + self.rotation * other.translation,
        }
    }

    /// Inverse placement `bMa`.
    #[must_use]
    pub fn inverse(&self) -> Self {
        let rt = self.rotation.transpose();
        Self {
            rotation: rt,
            translation: -(rt * self.translation),
        }
    }

    /// Move a motion vector from the child frame into the parent frame.
    #[must_use]
    pub fn act_motion(&self, m: &SpatialVector) -> SpatialVector {
        let w = self.rotation * angular(m);
        let v = self.rotation * linear(m) + self.translation.cross(&w);
        stack(&w, &v)
    }

    /// Move a motion vector from the parent frame into the child frame.
    #[must_use]
    pub fn act_inv_motion(&self, m: &SpatialVector) -> SpatialVector {
        let rt = self.rotation.transpose();
        let w_parent = angular(m);
        let w = rt * w_parent;
        let v = rt * (linear(m) - self.translation.cross(&w_parent));
        stack(&w, &v)
    }

    /// Move a force vector from the child frame into the parent frame.
    #[must_use]
    pub fn act_force(&self, f: &SpatialVector) -> SpatialVector {
        let lin = self.rotation * linear(f);
        let ang = self.rotation * angular(f) + self.translation.cross(&lin);
        stack(&ang, &lin)
    }

    /// Move a spatial inertia from the child frame into the parent frame.
    #[must_use]
    pub fn act_inertia(&self, inertia: &SpatialInertia) -> SpatialInertia {
        SpatialInertia {
            mass: inertia.mass,
            com: self.rotation * inertia.com + self.translation,
            inertia: self.rotation * inertia.inertia * self.rotation.transpose(),
        }
    }

    /// Move every column of a 6-row force set into the parent frame.
    ///
    /// `src` and `dst` must have the same number of columns.
    pub fn act_force_set<S1, S2>(
        &self,
        src: &Matrix<f64, U6, Dyn, S1>,
        dst: &mut Matrix<f64, U6, Dyn, S2>,
    ) where
        S1: RawStorage<f64, U6, Dyn>,
        S2: RawStorageMut<f64, U6, Dyn>,
    {
        debug_assert_eq!(src.ncols(), dst.ncols());
        for k in 0..src.ncols() {
            let f: SpatialVector = src.column(k).into_owned();
            dst.set_column(k, &self.act_force(&f));
        }
    }

    /// Move every column of a 6-row motion set from the child frame into
    /// the parent frame, in place.
    pub fn act_motion_set<S>(&self, set: &mut Matrix<f64, U6, Dyn, S>)
    where
        S: RawStorageMut<f64, U6, Dyn>,
    {
        for k in 0..set.ncols() {
            let m: SpatialVector = set.column(k).into_owned();
            set.set_column(k, &self.act_motion(&m));
        }
    }

    /// 6×6 motion transform matrix `X` with `X * m == act_motion(m)`.
    #[must_use]
    pub fn motion_matrix(&self) -> Matrix6<f64> {
        let mut x = Matrix6::zeros();
        x.fixed_view_mut::<3, 3>(0, 0).copy_from(&self.rotation);
        x.fixed_view_mut::<3, 3>(3, 3).copy_from(&self.rotation);
        x.fixed_view_mut::<3, 3>(3, 0)
            .copy_from(&(skew(&self.translation) * self.rotation));
        x
    }
}

impl std::ops::Mul for SpatialTransform {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        self.compose(&rhs)
    }
}

impl std::ops::Mul<&SpatialTransform> for &SpatialTransform {
    type Output = SpatialTransform;

    fn mul(self, rhs: &SpatialTransform) -> SpatialTransform {
        self.compose(rhs)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Matrix6xX;

    fn sample() -> SpatialTransform {
        let axis = Unit::new_normalize(Vector3::new(0.3, -1.0, 0.5));
        SpatialTransform::from_translation(Vector3::new(0.2, -0.4, 1.1))
            * SpatialTransform::from_axis_angle(&axis, 0.7)
    }

    #[test]
    fn test_inverse_roundtrip() {
        let x = sample();
        let id = x * x.inverse();
        assert_relative_eq!(id.rotation, Matrix3::identity(), epsilon = 1e-12);
        assert_relative_eq!(id.translation, Vector3::zeros(), epsilon = 1e-12);
    }

    #[test]
    fn test_act_motion_matches_matrix() {
        let x = sample();
        let m = SpatialVector::new(0.1, 0.2, -0.3, 1.0, -2.0, 0.5);
        assert_relative_eq!(x.act_motion(&m), x.motion_matrix() * m, epsilon = 1e-12);
        assert_relative_eq!(x.act_inv_motion(&x.act_motion(&m)), m, epsilon = 1e-12);
    }

    #[test]
    fn test_act_force_is_dual_of_motion() {
        // Power is frame invariant: (X m) · (X* f) == m · f.
        let x = sample();
        let m = SpatialVector::new(0.4, -0.1, 0.9, 0.3, 0.0, -1.2);
        let f = SpatialVector::new(-1.0, 2.0, 0.5, 0.7, 0.1, -0.3);
        let power_child = m.dot(&f);
        let power_parent = x.act_motion(&m).dot(&x.act_force(&f));
        assert_relative_eq!(power_child, power_parent, epsilon = 1e-12);
    }

    #[test]
    fn test_act_force_set_columnwise() {
        let x = sample();
        let mut src = Matrix6xX::zeros(2);
        src.set_column(0, &SpatialVector::new(1.0, 0.0, 0.0, 0.0, 1.0, 0.0));
        src.set_column(1, &SpatialVector::new(0.0, 0.0, 2.0, 1.0, 0.0, -1.0));
        let mut dst = Matrix6xX::zeros(2);
        x.act_force_set(&src, &mut dst);
        for k in 0..2 {
            let col: SpatialVector = src.column(k).into_owned();
            let expected = x.act_force(&col);
            let got: SpatialVector = dst.column(k).into_owned();
            assert_relative_eq!(got, expected, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_skew_cross() {
        let a = Vector3::new(1.0, 2.0, 3.0);
        let b = Vector3::new(-0.5, 0.25, 4.0);
        assert_relative_eq!(skew(&a) * b, a.cross(&b), epsilon = 1e-12);
    }
}
