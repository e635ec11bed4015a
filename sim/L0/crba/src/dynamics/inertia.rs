//! Rigid-body spatial inertia.
//!
//! A [`SpatialInertia`] stores mass, center of mass and the rotational
//! inertia about the center of mass, all expressed in one reference frame.
//! Two inertias in the same frame combine by [`Add`](std::ops::Add), which
//! is how CRBA accumulates composite (subtree) inertias.

use nalgebra::{Matrix3, Matrix6, SymmetricEigen, Vector3};

use super::spatial::{SpatialVector, skew};

/// Tolerance used when classifying an inertia as physically valid.
const PHYSICAL_TOLERANCE: f64 = 1e-10;

/// Spatial inertia of a rigid body (or composite of bodies).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialInertia {
    /// Total mass (kg).
    pub mass: f64,
    /// Center of mass in the reference frame.
    pub com: Vector3<f64>,
    /// Rotational inertia about the center of mass (kg·m²).
    pub inertia: Matrix3<f64>,
}

impl Default for SpatialInertia {
    fn default() -> Self {
        Self::zero()
    }
}

impl SpatialInertia {
    /// Create from mass, center of mass and rotational inertia about the COM.
    #[must_use]
    pub fn new(mass: f64, com: Vector3<f64>, inertia: Matrix3<f64>) -> Self {
        Self { mass, com, inertia }
    }

    /// Zero inertia (massless frame).
    #[must_use]
    pub fn zero() -> Self {
        Self {
            mass: 0.0,
            com: Vector3::zeros(),
            inertia: Matrix3::zeros(),
        }
    }

    /// Inertia with a diagonal rotational inertia in the reference axes.
    #[must_use]
    pub fn from_diagonal(mass: f64, com: Vector3<f64>, diagonal: Vector3<f64>) -> Self {
        Self {
            mass,
            com,
            inertia: Matrix3::from_diagonal(&diagonal),
        }
    }

    /// Point mass located at `com`.
    #[must_use]
    pub fn point_mass(mass: f64, com: Vector3<f64>) -> Self {
        Self {
            mass,
            com,
            inertia: Matrix3::zeros(),
        }
    }

    /// Solid box with full side lengths `size`, centered at `com`.
    #[must_use]
    pub fn solid_box(mass: f64, com: Vector3<f64>, size: Vector3<f64>) -> Self {
        let k = mass / 12.0;
        let (x2, y2, z2) = (size.x * size.x, size.y * size.y, size.z * size.z);
        Self::from_diagonal(mass, com, Vector3::new(k * (y2 + z2), k * (x2 + z2), k * (x2 + y2)))
    }

    /// Rotational inertia about the reference-frame origin (parallel axis theorem).
    #[must_use]
    pub fn inertia_about_origin(&self) -> Matrix3<f64> {
        let c = skew(&self.com);
        self.inertia + self.mass * c * c.transpose()
    }

    /// 6×6 spatial inertia matrix about the frame origin:
    ///
    /// ```text
    /// I = [I_c + m[c]×[c]×ᵀ,  m[c]× ]
    ///     [m[c]×ᵀ,            m 1   ]
    /// ```
    #[must_use]
    pub fn matrix(&self) -> Matrix6<f64> {
        let mc = skew(&(self.mass * self.com));
        let mut out = Matrix6::zeros();
        out.fixed_view_mut::<3, 3>(0, 0)
            .copy_from(&self.inertia_about_origin());
        out.fixed_view_mut::<3, 3>(0, 3).copy_from(&mc);
        out.fixed_view_mut::<3, 3>(3, 0).copy_from(&mc.transpose());
        out.fixed_view_mut::<3, 3>(3, 3)
            .copy_from(&(Matrix3::identity() * self.mass));
        out
    }

    /// Spatial momentum `I * m` of a motion vector.
    ///
    /// `f = m(v - c × ω)`, `τ = I_c ω + c × f`.
    #[must_use]
    pub fn mul_motion(&self, m: &SpatialVector) -> SpatialVector {
        let w = Vector3::new(m[0], m[1], m[2]);
        let v = Vector3::new(m[3], m[4], m[5]);
        let f = self.mass * (v - self.com.cross(&w));
        let tau = self.inertia * w + self.com.cross(&f);
        SpatialVector::new(tau.x, tau.y, tau.z, f.x, f.y, f.z)
    }

    /// Kinetic energy `½ mᵀ I m` of a body moving with spatial velocity `m`.
    #[must_use]
    pub fn kinetic_energy(&self, m: &SpatialVector) -> f64 {
        0.5 * m.dot(&self.mul_motion(m))
    }

    /// Whether the inertia is physically realizable: non-negative mass and a
    /// symmetric rotational inertia with non-negative principal moments that
    /// satisfy the triangle inequality.
    #[must_use]
    pub fn is_physical(&self) -> bool {
        if !(self.mass >= 0.0) || !self.com.iter().all(|x| x.is_finite()) {
            return false;
        }
        let asym = (self.inertia - self.inertia.transpose()).abs().max();
        if !(asym <= PHYSICAL_TOLERANCE) {
            return false;
        }
        let eig = SymmetricEigen::new(self.inertia).eigenvalues;
        let (a, b, c) = (eig[0], eig[1], eig[2]);
        a >= -PHYSICAL_TOLERANCE
            && b >= -PHYSICAL_TOLERANCE
            && c >= -PHYSICAL_TOLERANCE
            && a + b >= c - PHYSICAL_TOLERANCE
            && a + c >= b - PHYSICAL_TOLERANCE
            && b + c >= a - PHYSICAL_TOLERANCE
    }
}

impl std::ops::Add for SpatialInertia {
    type Output = Self;

    /// Combine two inertias expressed in the same frame.
    fn add(self, other: Self) -> Self {
        let mass = self.mass + other.mass;
        if mass <= 0.0 {
            return Self {
                mass,
                com: Vector3::zeros(),
                inertia: self.inertia + other.inertia,
            };
        }
        let com = (self.mass * self.com + other.mass * other.com) / mass;
        let d = self.com - other.com;
        let coupling = self.mass * other.mass / mass;
        let shift = coupling * (Matrix3::identity() * d.norm_squared() - d * d.transpose());
        Self {
            mass,
            com,
            inertia: self.inertia + other.inertia + shift,
        }
    }
}

impl std::ops::AddAssign for SpatialInertia {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}
