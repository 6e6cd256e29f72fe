use fieldpost_core::{OutputBatch, Postprocessor, Result, Tensor1, UpdateFlags, VectorSamples};
use nalgebra::Matrix3;

use crate::{ParameterError, expect_components};

/// Stress invariants of an isotropic linear elastic solid, computed from the
/// gradient of its displacement field.
///
/// The small strain is the symmetric part of the displacement gradient and
/// the stress follows Hooke's law, `σ = λ tr(ε) I + 2μ ε`. Two-dimensional
/// fields are treated as plane strain, so `σ_zz = λ tr(ε)`.
///
/// Outputs are `von_mises` and `hydrostatic_stress` (mean normal stress,
/// positive in tension).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StressInvariants {
    lambda: f64,
    mu: f64,
}

impl StressInvariants {
    /// Creates the postprocessor from Young's modulus and Poisson's ratio.
    ///
    /// # Errors
    ///
    /// Returns a [`ParameterError`] unless `youngs_modulus` is positive and
    /// finite and `poissons_ratio` lies in `(-1, 0.5)`.
    pub fn new(
        youngs_modulus: f64,
        poissons_ratio: f64,
    ) -> std::result::Result<Self, ParameterError> {
        if !youngs_modulus.is_finite() || youngs_modulus <= 0.0 {
            return Err(ParameterError::YoungsModulus(youngs_modulus));
        }
        if !(poissons_ratio > -1.0 && poissons_ratio < 0.5) {
            return Err(ParameterError::PoissonsRatio(poissons_ratio));
        }

        let (e, nu) = (youngs_modulus, poissons_ratio);
        Ok(Self {
            lambda: e * nu / ((1.0 + nu) * (1.0 - 2.0 * nu)),
            mu: e / (2.0 * (1.0 + nu)),
        })
    }

    /// Lamé's first parameter λ.
    #[must_use]
    pub fn lame_lambda(&self) -> f64 {
        self.lambda
    }

    /// Shear modulus μ.
    #[must_use]
    pub fn shear_modulus(&self) -> f64 {
        self.mu
    }

    /// Returns the stress tensor for one point, embedded in three dimensions.
    fn stress<const DIM: usize>(&self, gradient: &[Tensor1<DIM>]) -> Matrix3<f64> {
        let mut strain = Matrix3::zeros();
        for i in 0..DIM {
            for j in 0..DIM {
                strain[(i, j)] = 0.5 * (gradient[i][j] + gradient[j][i]);
            }
        }
        strain * (2.0 * self.mu) + Matrix3::identity() * (self.lambda * strain.trace())
    }

    fn compute<const DIM: usize>(
        &self,
        samples: &VectorSamples<DIM>,
        computed: &mut OutputBatch<'_>,
    ) -> Result<()> {
        expect_components(DIM, samples.n_components)?;
        for (row, gradient) in computed.rows_mut().zip(&samples.gradients) {
            let stress = self.stress(gradient);
            let mean = stress.trace() / 3.0;
            let deviator = stress - Matrix3::identity() * mean;
            row[0] = (1.5 * deviator.norm_squared()).sqrt();
            row[1] = mean;
        }
        Ok(())
    }
}

/// Output names shared by the two- and three-dimensional implementations.
fn output_names() -> Vec<String> {
    vec!["von_mises".to_owned(), "hydrostatic_stress".to_owned()]
}

impl Postprocessor<2> for StressInvariants {
    fn update_flags(&self) -> UpdateFlags {
        UpdateFlags::GRADIENTS
    }

    fn names(&self) -> Vec<String> {
        output_names()
    }

    fn n_output_variables(&self) -> usize {
        2
    }

    fn compute_vector(
        &self,
        samples: &VectorSamples<2>,
        computed: &mut OutputBatch<'_>,
    ) -> Result<()> {
        self.compute(samples, computed)
    }
}

impl Postprocessor<3> for StressInvariants {
    fn update_flags(&self) -> UpdateFlags {
        UpdateFlags::GRADIENTS
    }

    fn names(&self) -> Vec<String> {
        output_names()
    }

    fn n_output_variables(&self) -> usize {
        2
    }

    fn compute_vector(
        &self,
        samples: &VectorSamples<3>,
        computed: &mut OutputBatch<'_>,
    ) -> Result<()> {
        self.compute(samples, computed)
    }
}
