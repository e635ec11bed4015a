//! Error types for model construction, joint kinematics and CRBA.
//!
//! Two families are kept apart: precondition violations (a malformed model,
//! a configuration of the wrong size, mismatched buffers) are detected
//! before any pass runs, while numerical degeneracies come out of a joint's
//! `calc` when its slice of the configuration leaves the joint's domain.

use thiserror::Error;

/// Errors describing a malformed or misused [`Model`](super::Model).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ModelError {
    /// A joint's parent index is not smaller than its own index.
    #[error("joint {joint} has parent {parent}; parents must precede their children")]
    ParentOrder {
        /// Offending joint.
        joint: usize,
        /// Its parent index.
        parent: usize,
    },

    /// A joint attached off the current branch, which would split a subtree's
    /// velocity indices into non-contiguous ranges.
    #[error("joint {joint} attaches to {parent}, which is not on the current branch; joints must be added depth-first")]
    BranchOrder {
        /// Offending joint.
        joint: usize,
        /// Its parent index.
        parent: usize,
    },

    /// A joint index that does not exist in the model.
    #[error("unknown joint index {index} (model has {njnt} joint slots)")]
    UnknownJoint {
        /// Requested index.
        index: usize,
        /// Number of joint slots, including the universe.
        njnt: usize,
    },

    /// The universe slot (index 0) was used where a moving joint is required.
    #[error("joint slot 0 is the universe and cannot carry a body")]
    UniverseJoint,

    /// A joint that contributes no degrees of freedom.
    #[error("joint `{name}` has no degrees of freedom")]
    NoDegreesOfFreedom {
        /// Name of the rejected joint.
        name: String,
    },

    /// A per-joint array whose length disagrees with `njnt`.
    #[error("model array `{field}` has length {actual}, expected {expected}")]
    ArrayLength {
        /// Field name.
        field: &'static str,
        /// Expected length.
        expected: usize,
        /// Actual length.
        actual: usize,
    },

    /// Precomputed index bookkeeping disagrees with the joint tree.
    #[error("joint {joint}: `{field}` is {actual}, expected {expected}")]
    IndexMismatch {
        /// Joint whose bookkeeping is inconsistent.
        joint: usize,
        /// Field name.
        field: &'static str,
        /// Expected value.
        expected: usize,
        /// Stored value.
        actual: usize,
    },
}

/// Numerical failures of a joint's kinematic update.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum JointError {
    /// An orientation-valued joint received a quaternion that is not unit norm.
    #[error("quaternion norm {norm} is not 1 (tolerance {tolerance})")]
    NonUnitQuaternion {
        /// Norm of the offending quaternion.
        norm: f64,
        /// Accepted deviation from 1.
        tolerance: f64,
    },

    /// The configuration slice does not match the joint's `nq`.
    #[error("joint expects {expected} configuration entries, got {actual}")]
    SegmentLength {
        /// The joint's `nq`.
        expected: usize,
        /// Length of the slice passed in.
        actual: usize,
    },
}

/// Errors returned by [`crba`](crate::crba) and the other per-configuration
/// algorithms.
#[derive(Debug, Error, Clone, PartialEq)]
#[non_exhaustive]
pub enum CrbaError {
    /// The model failed validation.
    #[error("invalid model: {0}")]
    InvalidModel(#[from] ModelError),

    /// The configuration vector length differs from `model.nq`.
    #[error("configuration has length {actual}, model expects nq = {expected}")]
    ConfigurationSize {
        /// `model.nq`.
        expected: usize,
        /// Length supplied.
        actual: usize,
    },

    /// The velocity vector length differs from `model.nv`.
    #[error("velocity has length {actual}, model expects nv = {expected}")]
    VelocitySize {
        /// `model.nv`.
        expected: usize,
        /// Length supplied.
        actual: usize,
    },

    /// The data buffers were created for a different model.
    #[error("data sized for njnt = {data_njnt}, nv = {data_nv}; model has njnt = {model_njnt}, nv = {model_nv}")]
    DataMismatch {
        /// Joint slots in the data.
        data_njnt: usize,
        /// Velocity dimension of the data.
        data_nv: usize,
        /// Joint slots in the model.
        model_njnt: usize,
        /// Velocity dimension of the model.
        model_nv: usize,
    },

    /// A configuration entry is NaN, infinite or beyond `MAX_VAL`.
    #[error("bad configuration value {value} at index {index}")]
    BadConfiguration {
        /// Position in the configuration vector.
        index: usize,
        /// The offending value.
        value: f64,
    },

    /// A batch was given a different number of configurations than it holds.
    #[error("batch holds {expected} data instances, got {actual} configurations")]
    BatchSize {
        /// Number of data instances.
        expected: usize,
        /// Number of configurations.
        actual: usize,
    },

    /// A joint's kinematic update failed.
    #[error("joint {joint}: {source}")]
    Joint {
        /// Index of the failing joint.
        joint: usize,
        /// Underlying joint error.
        #[source]
        source: JointError,
    },
}

impl CrbaError {
    /// Wrap a joint error with the index of the joint that raised it.
    #[must_use]
    pub fn joint(joint: usize, source: JointError) -> Self {
        Self::Joint { joint, source }
    }

    /// Whether this error is a violated precondition (bad model or inputs).
    #[must_use]
    pub fn is_precondition(&self) -> bool {
        !self.is_numerical()
    }

    /// Whether this error is a numerical degeneracy raised by a joint.
    #[must_use]
    pub fn is_numerical(&self) -> bool {
        matches!(self, Self::Joint { .. })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CrbaError::ConfigurationSize {
            expected: 7,
            actual: 6,
        };
        assert!(err.to_string().contains("nq = 7"));

        let err = CrbaError::from(ModelError::ParentOrder { joint: 2, parent: 3 });
        assert!(err.to_string().contains("parent 3"));

        let err = CrbaError::joint(
            4,
            JointError::NonUnitQuaternion {
                norm: 2.0,
                tolerance: 1e-6,
            },
        );
        assert!(err.to_string().starts_with("joint 4"));
    }

    #[test]
    fn test_error_predicates() {
        let err = CrbaError::joint(
            1,
            JointError::NonUnitQuaternion {
                norm: 0.5,
                tolerance: 1e-6,
            },
        );
        assert!(err.is_numerical());
        assert!(!err.is_precondition());

        let err = CrbaError::BadConfiguration {
            index: 0,
            value: f64::NAN,
        };
        assert!(err.is_precondition());
        assert!(!err.is_numerical());
    }
}
