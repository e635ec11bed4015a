//! Configuration for the CRBA entry points.
//!
//! Controls how much input checking runs before the passes and whether the
//! returned mass matrix is mirrored into a full symmetric matrix.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which part of the mass matrix the caller can rely on after a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum MassMatrixFill {
    /// Only the upper triangle is guaranteed; the strictly-lower triangle is
    /// unspecified.
    #[default]
    Upper,
    /// The upper triangle is mirrored into the lower triangle before
    /// returning.
    Symmetric,
}

/// Options for [`crba_with_config`](crate::crba_with_config).
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CrbaConfig {
    /// Output fill mode.
    pub fill: MassMatrixFill,
    /// Run [`Model::validate`](crate::Model::validate) before the passes.
    pub validate_model: bool,
    /// Reject NaN / infinite / diverged configuration entries.
    pub check_configuration: bool,
}

impl Default for CrbaConfig {
    fn default() -> Self {
        Self {
            fill: MassMatrixFill::Upper,
            validate_model: true,
            check_configuration: true,
        }
    }
}

impl CrbaConfig {
    /// Full symmetric output with all checks enabled.
    #[must_use]
    pub fn symmetric() -> Self {
        Self {
            fill: MassMatrixFill::Symmetric,
            ..Default::default()
        }
    }

    /// Skip model validation and configuration scanning.
    ///
    /// Sizes are still checked. Intended for hot loops over a model that has
    /// already been validated once.
    #[must_use]
    pub fn unchecked() -> Self {
        Self {
            validate_model: false,
            check_configuration: false,
            ..Default::default()
        }
    }

    /// Set the fill mode.
    #[must_use]
    pub fn fill(mut self, fill: MassMatrixFill) -> Self {
        self.fill = fill;
        self
    }

    /// Enable or disable model validation.
    #[must_use]
    pub fn validate_model(mut self, enabled: bool) -> Self {
        self.validate_model = enabled;
        self
    }

    /// Enable or disable configuration scanning.
    #[must_use]
    pub fn check_configuration(mut self, enabled: bool) -> Self {
        self.check_configuration = enabled;
        self
    }
}
