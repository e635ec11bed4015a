//! Batched CRBA: N independent configurations sharing one [`Model`].
//!
//! Every configuration gets its own [`Data`]; the model is shared read-only
//! behind an [`Arc`]. Evaluation is parallelized across CPU cores via rayon
//! when the `parallel` feature is enabled, with a sequential fallback when
//! disabled. Parallelism is across trees only; a single tree is always swept
//! sequentially.
//!
//! # Examples
//!
//! ```
//! use sim_crba::{BatchCrba, Model};
//! use std::sync::Arc;
//!
//! let model = Arc::new(Model::n_link_pendulum(3, 1.0, 0.1));
//! let mut batch = BatchCrba::new(model.clone(), 4);
//!
//! let configs: Vec<_> = (0..4)
//!     .map(|k| nalgebra::DVector::from_element(3, 0.1 * f64::from(k)))
//!     .collect();
//! let errors = batch.compute_all(&configs).unwrap();
//! assert!(errors.iter().all(Option::is_none));
//! assert_eq!(batch.mass_matrix(2).map(|m| m.nrows()), Some(3));
//! ```

use std::sync::Arc;

use nalgebra::{DMatrix, DVector};

use crate::dynamics::crba::crba_with_config;
use crate::types::{CrbaConfig, CrbaError, Data, Model};

/// N CRBA workspaces sharing one [`Model`].
///
/// # Single Model Constraint
///
/// All instances share the same [`Arc<Model>`] (same `nq`, `nv`, tree).
/// Batching different trees together is not supported.
#[derive(Debug, Clone)]
pub struct BatchCrba {
    model: Arc<Model>,
    data: Vec<Data>,
    config: CrbaConfig,
}

impl BatchCrba {
    /// Create a batch of `n` workspaces, each from [`Model::make_data()`].
    #[must_use]
    pub fn new(model: Arc<Model>, n: usize) -> Self {
        let data = (0..n).map(|_| model.make_data()).collect();
        Self {
            model,
            data,
            config: CrbaConfig::default(),
        }
    }

    /// Use `config` for every evaluation.
    #[must_use]
    pub fn with_config(mut self, config: CrbaConfig) -> Self {
        self.config = config;
        self
    }

    /// Number of workspaces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the batch is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Shared model reference.
    #[must_use]
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Workspace `i`, or `None` if `i >= len()`.
    #[must_use]
    pub fn data(&self, i: usize) -> Option<&Data> {
        self.data.get(i)
    }

    /// Mass matrix computed for workspace `i` by the last
    /// [`compute_all()`](Self::compute_all).
    #[must_use]
    pub fn mass_matrix(&self, i: usize) -> Option<&DMatrix<f64>> {
        self.data.get(i).map(|d| &d.mass_matrix)
    }

    /// Evaluate CRBA for `configs[i]` into workspace `i`, for every `i`.
    ///
    /// Returns per-workspace results: `None` = success, `Some(e)` = that
    /// configuration failed and its workspace contents are unspecified.
    ///
    /// # Determinism
    ///
    /// Output is independent of thread count and scheduling order. Each
    /// evaluation depends only on its own [`Data`] and the shared [`Model`].
    ///
    /// # Errors
    ///
    /// [`CrbaError::BatchSize`] if `configs.len() != len()`; no workspace is
    /// touched in that case.
    pub fn compute_all(
        &mut self,
        configs: &[DVector<f64>],
    ) -> Result<Vec<Option<CrbaError>>, CrbaError> {
        if configs.len() != self.data.len() {
            return Err(CrbaError::BatchSize {
                expected: self.data.len(),
                actual: configs.len(),
            });
        }
        let model = &self.model;
        let config = &self.config;
        tracing::trace!("batch crba: {} configurations", configs.len());

        #[cfg(feature = "parallel")]
        {
            use rayon::iter::{IndexedParallelIterator, IntoParallelRefMutIterator, ParallelIterator};
            Ok(self
                .data
                .par_iter_mut()
                .zip(configs)
                .map(|(data, q)| crba_with_config(model, data, q, config).err())
                .collect())
        }
        #[cfg(not(feature = "parallel"))]
        {
            Ok(self
                .data
                .iter_mut()
                .zip(configs)
                .map(|(data, q)| crba_with_config(model, data, q, config).err())
                .collect())
        }
    }
}
