use std::error::Error as StdError;

#[cfg(feature = "serde-derive")]
use serde::{Deserialize, Serialize};

use crate::{BatchOrigin, FieldSamples, UpdateFlags};

/// Identifies one batch of evaluation points: the points of a single cell or
/// a single face.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde-derive", derive(Serialize, Deserialize))]
pub struct Batch {
    /// Index of the cell or face within the evaluator's mesh.
    pub index: usize,
    pub origin: BatchOrigin,
}

impl Batch {
    /// Creates a batch for the points of cell `index`.
    #[must_use]
    pub fn cell(index: usize) -> Self {
        Self {
            index,
            origin: BatchOrigin::Cell,
        }
    }

    /// Creates a batch for the points of face `index`.
    #[must_use]
    pub fn face(index: usize) -> Self {
        Self {
            index,
            origin: BatchOrigin::Face,
        }
    }
}

/// Produces raw field samples for a batch of evaluation points.
///
/// This is the finite element side of the pipeline: it knows the mesh, the
/// basis functions and the solution vector. An evaluator must compute every
/// array covered by `flags` and may leave the others empty. It must never
/// supply normals for cell batches.
pub trait FieldEvaluator<const DIM: usize>: Sync {
    type Error: StdError + Send + Sync + 'static;

    /// Returns the number of components of the evaluated field.
    fn n_components(&self) -> usize;

    /// Evaluates the samples requested by `flags` at the points of `batch`.
    ///
    /// # Errors
    ///
    /// Returns [`Self::Error`] if the batch cannot be evaluated.
    fn evaluate(
        &self,
        batch: &Batch,
        flags: UpdateFlags,
    ) -> Result<FieldSamples<DIM>, Self::Error>;
}
