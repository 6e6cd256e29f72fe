use fieldpost_core::{
    Error, OutputBatch, Postprocessor, Result, ScalarSamples, UpdateFlags, VectorSamples,
};

/// Euclidean norm of a vector-valued field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Magnitude {
    name: String,
}

impl Magnitude {
    /// Creates a magnitude postprocessor whose output is called `name`.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Default for Magnitude {
    fn default() -> Self {
        Self::new("magnitude")
    }
}

impl<const DIM: usize> Postprocessor<DIM> for Magnitude {
    fn update_flags(&self) -> UpdateFlags {
        UpdateFlags::VALUES
    }

    fn names(&self) -> Vec<String> {
        vec![self.name.clone()]
    }

    fn n_output_variables(&self) -> usize {
        1
    }

    fn compute_vector(
        &self,
        samples: &VectorSamples<DIM>,
        computed: &mut OutputBatch<'_>,
    ) -> Result<()> {
        for (row, value) in computed.rows_mut().zip(&samples.values) {
            row[0] = value.norm();
        }
        Ok(())
    }
}

/// Norm of the gradient of a scalar field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GradientMagnitude;

impl<const DIM: usize> Postprocessor<DIM> for GradientMagnitude {
    fn update_flags(&self) -> UpdateFlags {
        UpdateFlags::GRADIENTS
    }

    fn names(&self) -> Vec<String> {
        vec!["gradient_magnitude".to_owned()]
    }

    fn n_output_variables(&self) -> usize {
        1
    }

    fn compute_scalar(
        &self,
        samples: &ScalarSamples<DIM>,
        computed: &mut OutputBatch<'_>,
    ) -> Result<()> {
        for (row, gradient) in computed.rows_mut().zip(&samples.gradients) {
            row[0] = gradient.norm();
        }
        Ok(())
    }
}

/// Laplacian of a scalar field, the trace of its Hessian.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Laplacian;

impl<const DIM: usize> Postprocessor<DIM> for Laplacian {
    fn update_flags(&self) -> UpdateFlags {
        UpdateFlags::HESSIANS
    }

    fn names(&self) -> Vec<String> {
        vec!["laplacian".to_owned()]
    }

    fn n_output_variables(&self) -> usize {
        1
    }

    fn compute_scalar(
        &self,
        samples: &ScalarSamples<DIM>,
        computed: &mut OutputBatch<'_>,
    ) -> Result<()> {
        for (row, hessian) in computed.rows_mut().zip(&samples.hessians) {
            row[0] = hessian.trace();
        }
        Ok(())
    }
}

/// Flux of a scalar field through a face, `∇u · n`.
///
/// Only meaningful on face batches. On cells the normals are empty and the
/// transform fails with [`Error::MissingNormals`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NormalFlux;

impl<const DIM: usize> Postprocessor<DIM> for NormalFlux {
    fn update_flags(&self) -> UpdateFlags {
        UpdateFlags::GRADIENTS | UpdateFlags::NORMALS
    }

    fn names(&self) -> Vec<String> {
        vec!["normal_flux".to_owned()]
    }

    fn n_output_variables(&self) -> usize {
        1
    }

    fn compute_scalar(
        &self,
        samples: &ScalarSamples<DIM>,
        computed: &mut OutputBatch<'_>,
    ) -> Result<()> {
        if samples.normals.len() != computed.n_points() {
            return Err(Error::MissingNormals);
        }
        let points = samples.gradients.iter().zip(&samples.normals);
        for (row, (gradient, normal)) in computed.rows_mut().zip(points) {
            row[0] = gradient.dot(normal);
        }
        Ok(())
    }
}
