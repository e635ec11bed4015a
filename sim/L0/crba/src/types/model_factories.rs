//! Factory methods for common mechanical systems.
//!
//! These constructors produce ready-to-use [`Model`] instances for canonical
//! test systems (pendulums, free bodies). Used by inline tests, the
//! integration tests and the benchmarks.

use nalgebra::Vector3;

use super::model::Model;
use crate::dynamics::{SpatialInertia, SpatialTransform};
use crate::joint::JointModel;

impl Model {
    /// Create an n-link serial pendulum (revolute joints only).
    ///
    /// This creates a serial chain of `n` links connected by revolute joints,
    /// all rotating around the Y axis. Each link has a point mass at its end,
    /// and each joint after the first sits at the end of the previous link.
    ///
    /// # Arguments
    /// * `n` - Number of links (must be >= 1)
    /// * `link_length` - Length of each link (meters)
    /// * `link_mass` - Mass of each link (kg)
    ///
    /// # Returns
    /// A `Model` with all links hanging straight down along -Z at q = 0.
    ///
    /// # Panics
    /// Panics if `n` is 0 (requires at least 1 link).
    ///
    /// # Example
    /// ```
    /// use sim_crba::{Model, crba};
    ///
    /// let model = Model::n_link_pendulum(3, 1.0, 1.0);
    /// let mut data = model.make_data();
    /// let q = model.neutral();
    /// let m = crba(&model, &mut data, &q).unwrap();
    /// assert_eq!(m.nrows(), 3);
    /// ```
    #[must_use]
    pub fn n_link_pendulum(n: usize, link_length: f64, link_mass: f64) -> Self {
        assert!(n >= 1, "n_link_pendulum requires at least 1 link");

        let mut model = Self::empty();
        model.name = format!("{n}-link pendulum");

        let link = Vector3::new(0.0, 0.0, -link_length);
        let mut parent = 0;
        for i in 0..n {
            let placement = if i == 0 {
                SpatialTransform::identity()
            } else {
                SpatialTransform::from_translation(link)
            };
            let id = model.push_joint(
                parent,
                JointModel::revolute_y(),
                placement,
                format!("link{}", i + 1),
            );
            model.body_inertia[id] = SpatialInertia::point_mass(link_mass, link);
            parent = id;
        }
        model
    }

    /// Create a double pendulum (2-link serial chain).
    ///
    /// Convenience wrapper around [`n_link_pendulum`](Self::n_link_pendulum).
    #[must_use]
    pub fn double_pendulum(link_length: f64, link_mass: f64) -> Self {
        Self::n_link_pendulum(2, link_length, link_mass)
    }

    /// Create a spherical pendulum (ball joint with a point mass below it).
    ///
    /// q is a unit quaternion `[w, x, y, z]`; the neutral configuration hangs
    /// straight down.
    #[must_use]
    pub fn spherical_pendulum(length: f64, mass: f64) -> Self {
        let mut model = Self::empty();
        model.name = "spherical pendulum".to_string();

        let id = model.push_joint(
            0,
            JointModel::Spherical,
            SpatialTransform::identity(),
            "ball".to_string(),
        );
        model.body_inertia[id] =
            SpatialInertia::point_mass(mass, Vector3::new(0.0, 0.0, -length));
        model
    }

    /// Create a single free-floating rigid body.
    ///
    /// The body's center of mass sits at the joint origin with principal
    /// moments `inertia` aligned to the body axes.
    #[must_use]
    pub fn free_body(mass: f64, inertia: Vector3<f64>) -> Self {
        let mut model = Self::empty();
        model.name = "free body".to_string();

        let id = model.push_joint(
            0,
            JointModel::FreeFlyer,
            SpatialTransform::identity(),
            "root".to_string(),
        );
        model.body_inertia[id] = SpatialInertia::from_diagonal(mass, Vector3::zeros(), inertia);
        model
    }
}
